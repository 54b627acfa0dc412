// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The classic termcap calls on top of a database handle
//!
//! [`Termcap`] loads its database on the first [`Termcap::tgetent`] and keeps the
//! capabilities of the last terminal found there for the `tget*` queries. A failed load
//! is attempted again by the next call.

use std::path::PathBuf;

use crate::{
    database::Database,
    expand::{self, ExpandContext},
    locate,
    parse,
    resolve::{self, Capabilities},
};

/// Errors reported by [`Termcap`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No database file could be found
    #[error("Termcap database not found")]
    Locate(#[from] locate::Error),
    /// The database file could not be read or parsed
    #[error("Cannot load termcap database")]
    Load(#[from] parse::Error),
    #[error("Cannot resolve terminal")]
    Resolve(#[from] resolve::Error),
}

#[derive(Clone, Debug)]
enum Source {
    File(PathBuf),
    /// Use [`locate::locate`] at load time
    Search,
}

/// Caller-owned region receiving strings from [`Termcap::tgetstr`]
///
/// Each string is stored with a terminating NUL, and the cursor advances past it.
#[derive(Clone, Debug, Default)]
pub struct StringArea {
    buffer: Vec<u8>,
}

impl StringArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset at which the next string will be written
    pub fn cursor(&self) -> usize {
        self.buffer.len()
    }

    /// Everything written so far, NULs included
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn push(&mut self, string: &[u8]) -> &[u8] {
        let start = self.buffer.len();
        self.buffer.extend_from_slice(string);
        self.buffer.push(b'\0');
        &self.buffer[start..start + string.len()]
    }
}

/// Handle answering termcap queries for one terminal at a time
#[derive(Debug)]
pub struct Termcap {
    source: Source,
    database: Option<Database>,
    current: Option<Capabilities>,
    context: ExpandContext,
}

impl Termcap {
    /// Handle reading the given termcap file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File(path.into()))
    }

    /// Handle reading the file found by [`locate::locate`]
    pub fn from_env() -> Self {
        Self::with_source(Source::Search)
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            database: None,
            current: None,
            context: ExpandContext::new(),
        }
    }

    fn database(&mut self) -> Result<&Database, Error> {
        match &mut self.database {
            Some(database) => Ok(database),
            slot @ None => {
                let path = match &self.source {
                    Source::File(path) => path.clone(),
                    Source::Search => locate::locate()?,
                };
                Ok(slot.insert(Database::open(path)?))
            }
        }
    }

    /// Look up a terminal and make it the subject of later queries
    ///
    /// Returns `Ok(false)` if the database has no such terminal.
    pub fn tgetent(&mut self, name: &str) -> Result<bool, Error> {
        let resolved = match self.database()?.resolve(name) {
            Ok(capabilities) => Some(capabilities),
            Err(resolve::Error::TerminalNotFound(_)) => None,
            Err(err) => return Err(err.into()),
        };
        log::debug!(
            "termcap: tgetent {name}: {}",
            resolved.as_ref().map_or(0, Capabilities::len)
        );
        let found = resolved.is_some();
        self.current = resolved;
        Ok(found)
    }

    /// Capabilities of the terminal found by the last successful [`Termcap::tgetent`]
    pub const fn capabilities(&self) -> Option<&Capabilities> {
        self.current.as_ref()
    }

    pub fn tgetflag(&self, id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|capabilities| capabilities.flag(id))
    }

    /// Numeric capability, or -1 if it is absent or not a number
    pub fn tgetnum(&self, id: &str) -> i32 {
        self.current
            .as_ref()
            .and_then(|capabilities| capabilities.number(id))
            .unwrap_or(-1)
    }

    /// Copy a string capability into `area`
    ///
    /// Returns the copy without its NUL, or `None` if there is no area or no such string.
    pub fn tgetstr<'a>(&self, id: &str, area: Option<&'a mut StringArea>) -> Option<&'a [u8]> {
        let area = area?;
        let string = self.current.as_ref()?.string(id)?;
        Some(area.push(string))
    }

    /// Expand a cursor motion string, as `tparm(cap, row, col)`
    pub fn tgoto(&mut self, cap: &[u8], col: i32, row: i32) -> Result<Vec<u8>, expand::Error> {
        self.tparm(cap, &[row, col])
    }

    /// Expand a parameterized string
    pub fn tparm(&mut self, cap: &[u8], params: &[i32]) -> Result<Vec<u8>, expand::Error> {
        self.context.expand(cap, params)
    }
}

impl From<Database> for Termcap {
    fn from(database: Database) -> Self {
        Self {
            database: Some(database),
            ..Self::from_env()
        }
    }
}

/// Send `string` to `putc` one byte at a time
///
/// Padding directives are skipped without any delay, so `affected` has no effect. Output
/// stops at a NUL.
pub fn tputs(string: &[u8], _affected: i32, mut putc: impl FnMut(u8)) {
    let mut rest = string;
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'\0' {
            break;
        }
        if byte == b'$'
            && tail.first() == Some(&b'<')
            && let Some(end) = tail.iter().position(|&c| c == b'>')
        {
            rest = &tail[end + 1..];
            continue;
        }
        putc(byte);
        rest = tail;
    }
}
