// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Termcap database compiler with terminfo transcoding and the classic query calls

pub mod arena;
pub mod capability;
pub mod database;
pub mod expand;
pub mod legacy;
pub mod locate;
pub mod map;
pub mod parse;
pub mod resolve;
pub mod symbol;
pub mod transcode;

pub use capability::{Capability, Padding, Value};
pub use database::{Database, Stats};
pub use expand::ExpandContext;
pub use legacy::{StringArea, Termcap, tputs};
pub use locate::{locate, search_files};
pub use parse::Parser;
pub use resolve::{Capabilities, ValueRef};
pub use transcode::transcode;
