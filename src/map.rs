// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Insertion ordered map keyed by symbols
//!
//! Keys are hashed and compared by content, so every operation takes the [`SymbolTable`]
//! that owns the key symbols.

use std::{collections::HashMap, mem};

use crate::symbol::{Symbol, SymbolTable, hash_bytes};

#[derive(Clone, Debug)]
pub struct SymbolMap<V> {
    entries: Vec<(Symbol, V)>,
    /// Content hash to positions in `entries`
    buckets: HashMap<u64, Vec<usize>>,
}

impl<V> SymbolMap<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            buckets: HashMap::with_capacity(capacity),
        }
    }

    fn position(&self, table: &SymbolTable, hash: u64, key: &[u8]) -> Option<usize> {
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&position| table.resolve(self.entries[position].0) == key)
    }

    /// Look up by key content
    pub fn get(&self, table: &SymbolTable, key: &[u8]) -> Option<&V> {
        let position = self.position(table, hash_bytes(key), key)?;
        Some(&self.entries[position].1)
    }

    pub fn get_symbol(&self, table: &SymbolTable, key: Symbol) -> Option<&V> {
        self.get(table, table.resolve(key))
    }

    pub fn contains(&self, table: &SymbolTable, key: &[u8]) -> bool {
        self.get(table, key).is_some()
    }

    /// Insert at the end, or replace the value in place if the key is present
    ///
    /// Returns the replaced value.
    pub fn insert(&mut self, table: &SymbolTable, key: Symbol, value: V) -> Option<V> {
        let bytes = table.resolve(key);
        let hash = hash_bytes(bytes);
        if let Some(position) = self.position(table, hash, bytes) {
            return Some(mem::replace(&mut self.entries[position].1, value));
        }
        self.append(hash, key, value);
        None
    }

    /// Insert at the end unless the key is present, in which case nothing changes
    ///
    /// Returns whether the value was inserted.
    pub fn insert_new(&mut self, table: &SymbolTable, key: Symbol, value: V) -> bool {
        let bytes = table.resolve(key);
        let hash = hash_bytes(bytes);
        if self.position(table, hash, bytes).is_some() {
            return false;
        }
        self.append(hash, key, value);
        true
    }

    fn append(&mut self, hash: u64, key: Symbol, value: V) {
        self.buckets.entry(hash).or_default().push(self.entries.len());
        self.entries.push((key, value));
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &V)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate bytes used by entries and buckets
    pub fn size(&self) -> usize {
        self.entries.capacity() * mem::size_of::<(Symbol, V)>()
            + self.buckets.capacity() * mem::size_of::<(u64, Vec<usize>)>()
    }
}

impl<V> Default for SymbolMap<V> {
    fn default() -> Self {
        Self::with_capacity(crate::arena::RECORD_INIT_CAPACITY)
    }
}
