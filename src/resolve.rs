// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolution of a terminal name into its flattened capabilities
//!
//! An entry may inherit from another one with `tc=name`. Resolution walks that chain from
//! the requested terminal outwards; a capability found earlier in the chain hides the same
//! key further along. String values are converted to terminfo syntax on the way.

use crate::{
    capability::{Capability, Value},
    database::Database,
    map::SymbolMap,
    symbol::{Symbol, SymbolTable, render_bytes},
    transcode,
};

/// Capability naming the entry to inherit from
const CHAIN_KEY: &[u8] = b"tc";

/// Errors reported by [`Database::resolve`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Terminal not found: {0}")]
    TerminalNotFound(String),
    /// The `tc` chain leads back to an entry already visited
    #[error("Circular inheritance through {0}")]
    CircularInheritance(String),
    #[error("Cannot convert capability {key}")]
    Transcode {
        key: String,
        #[source]
        source: transcode::Error,
    },
}

/// Borrowed value of a resolved capability
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueRef<'a> {
    Boolean,
    Number(i32),
    /// String in terminfo syntax
    String(&'a [u8]),
}

/// Flattened capabilities of one terminal
///
/// The value owns its strings, so it stays valid whatever happens to the database later.
#[derive(Clone, Debug, Default)]
pub struct Capabilities {
    symbols: SymbolTable,
    map: SymbolMap<Capability>,
}

impl Capabilities {
    fn value(&self, value: Value) -> ValueRef<'_> {
        match value {
            Value::Boolean => ValueRef::Boolean,
            Value::Number(number) => ValueRef::Number(number),
            Value::String { value, .. } => ValueRef::String(self.symbols.resolve(value)),
        }
    }

    pub fn get(&self, id: &str) -> Option<ValueRef<'_>> {
        let capability = self.map.get(&self.symbols, id.as_bytes())?;
        Some(self.value(capability.value))
    }

    /// Whether the boolean capability is present
    pub fn flag(&self, id: &str) -> bool {
        self.get(id) == Some(ValueRef::Boolean)
    }

    pub fn number(&self, id: &str) -> Option<i32> {
        match self.get(id)? {
            ValueRef::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn string(&self, id: &str) -> Option<&[u8]> {
        match self.get(id)? {
            ValueRef::String(string) => Some(string),
            _ => None,
        }
    }

    /// Capabilities with their keys, nearest entry first
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], ValueRef<'_>)> {
        self.map
            .iter()
            .map(|(key, capability)| (self.symbols.resolve(key), self.value(capability.value)))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Each capability as it would be written in a termcap entry
    pub fn render(&self) -> impl Iterator<Item = String> {
        self.map
            .iter()
            .map(|(_, capability)| capability.render(&self.symbols))
    }

    /// Copy a capability from `database` unless its key is already set
    fn inherit(&mut self, database: &Database, capability: &Capability) -> Result<(), Error> {
        let key = database.symbols.resolve(capability.key);
        if self.map.contains(&self.symbols, key) {
            return Ok(());
        }
        let value = match capability.value {
            Value::String { value, padding } => {
                let string = database.symbols.resolve(value);
                let converted =
                    transcode::transcode_parts(string, padding).map_err(|source| {
                        Error::Transcode {
                            key: render_bytes(key),
                            source,
                        }
                    })?;
                Value::String {
                    value: self.symbols.intern(&converted),
                    padding: None,
                }
            }
            value => value,
        };
        let key = self.symbols.intern(key);
        self.map.insert(&self.symbols, key, Capability { key, value });
        Ok(())
    }
}

impl PartialEq for Capabilities {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Capabilities {}

impl Database {
    /// Flatten the capabilities of `name` and every entry it inherits from
    pub fn resolve(&self, name: impl AsRef<[u8]>) -> Result<Capabilities, Error> {
        let name = name.as_ref();
        let mut index = self
            .entry_index(name)
            .ok_or_else(|| Error::TerminalNotFound(render_bytes(name)))?;
        let mut visited = vec![];
        let mut resolved = Capabilities::default();

        while let Some(entry) = self.entry(index) {
            visited.push(index);
            let mut chain: Option<Symbol> = None;
            for (_, capability) in entry.iter() {
                if self.symbols.resolve(capability.key) == CHAIN_KEY {
                    if let Value::String { value, .. } = capability.value {
                        chain = Some(value);
                    }
                    continue;
                }
                resolved.inherit(self, capability)?;
            }

            let Some(target) = chain else {
                break;
            };
            let target = self.symbols.resolve(target);
            match self.entry_index(target) {
                Some(next) if visited.contains(&next) => {
                    return Err(Error::CircularInheritance(render_bytes(target)));
                }
                Some(next) => index = next,
                None => {
                    log::warn!(
                        "termcap: {}: tc={} not found",
                        render_bytes(name),
                        render_bytes(target)
                    );
                    break;
                }
            }
        }

        Ok(resolved)
    }
}
