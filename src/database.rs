// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compiled termcap database

use std::{
    fmt,
    fs::File,
    io::{ErrorKind, Read},
    path::Path,
};

use crate::{
    arena::RecordBuffer,
    capability::Capability,
    map::SymbolMap,
    parse::{Error, Parser},
    symbol::SymbolTable,
};

/// Size of the chunks read from a database file
const READ_CHUNK: usize = 4096;

/// Capabilities of one entry, keyed by capability name
pub type Entry = SymbolMap<Capability>;

/// All entries of a termcap file and the names that refer to them
#[derive(Debug)]
pub struct Database {
    pub(crate) symbols: SymbolTable,
    /// Every terminal name and alias, mapped to an index into `entries`
    pub(crate) aliases: SymbolMap<usize>,
    pub(crate) entries: RecordBuffer<Entry>,
}

impl Database {
    pub(crate) fn empty() -> Self {
        Self {
            symbols: SymbolTable::new(),
            aliases: SymbolMap::default(),
            entries: RecordBuffer::default(),
        }
    }

    /// Start a new empty entry, returning its index
    pub(crate) fn new_entry(&mut self) -> usize {
        self.entries.add(Entry::default())
    }

    /// Parse termcap text held in memory
    pub fn parse(buffer: &[u8]) -> Result<Self, Error> {
        let mut parser = Parser::new();
        parser.feed(buffer)?;
        parser.finish()
    }

    /// Parse termcap text from a reader, chunk by chunk
    pub fn read(mut reader: impl Read) -> Result<Self, Error> {
        let mut parser = Parser::new();
        let mut buffer = [0u8; READ_CHUNK];
        loop {
            let count = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => count,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            parser.feed(&buffer[..count])?;
        }
        parser.finish()
    }

    /// Parse a termcap file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).inspect_err(|err| {
            log::error!("error opening {}: {err}", path.display());
        })?;
        let database = Self::read(file)?;
        log::info!(
            "termcap: loaded {}: {} names, {} entries",
            path.display(),
            database.aliases.len(),
            database.entries.count()
        );
        Ok(database)
    }

    /// Index of the entry declaring `name`
    pub fn entry_index(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        self.aliases.get(&self.symbols, name.as_ref()).copied()
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Table holding every name, key and string value of the database
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Terminal names with their entry indices, in file order
    pub fn names(&self) -> impl Iterator<Item = (&[u8], usize)> {
        self.aliases
            .iter()
            .map(|(name, index)| (self.symbols.resolve(name), *index))
    }

    pub fn stats(&self) -> Stats {
        Stats {
            aliases: self.aliases.len(),
            entries: self.entries.count(),
            capabilities: self.entries.iter().map(SymbolMap::len).sum(),
            entry_bytes: self.entries.size(),
            capability_bytes: self.entries.iter().map(SymbolMap::size).sum(),
            alias_bytes: self.aliases.size(),
            symbol_bytes: self.symbols.size(),
        }
    }
}

/// Counts and memory use of a [`Database`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub aliases: usize,
    pub entries: usize,
    pub capabilities: usize,
    pub entry_bytes: usize,
    pub capability_bytes: usize,
    pub alias_bytes: usize,
    pub symbol_bytes: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# data")?;
        writeln!(f, "| aliases  | {:7} |", self.aliases)?;
        writeln!(f, "| entries  | {:7} |", self.entries)?;
        writeln!(f, "| caps     | {:7} |", self.capabilities)?;
        writeln!(f, "# memory")?;
        writeln!(f, "| cap_list | {:7} |", self.entry_bytes)?;
        writeln!(f, "| cap_map  | {:7} |", self.capability_bytes)?;
        writeln!(f, "| term_map | {:7} |", self.alias_bytes)?;
        write!(f, "| str_tab  | {:7} |", self.symbol_bytes)
    }
}
