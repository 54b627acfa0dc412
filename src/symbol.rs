// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Interned byte strings
//!
//! A [`Symbol`] is an offset and a length into the byte arena of a [`SymbolTable`]. It
//! carries no reference to its table, so every access goes through the table that created
//! it. Symbols are never freed; the table only grows.

use std::{fmt::Write, hash::Hasher};

use crate::arena::ByteArena;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Handle to an interned byte string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Symbol {
    offset: u32,
    length: u32,
}

impl Symbol {
    pub const EMPTY: Self = Self {
        offset: 0,
        length: 0,
    };

    pub const fn len(self) -> usize {
        self.length as usize
    }

    pub const fn is_empty(self) -> bool {
        self.length == 0
    }

    const fn range(self) -> std::ops::Range<usize> {
        self.offset as usize..self.offset as usize + self.length as usize
    }
}

/// FNV-1a, the hash used for symbol keys
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher(u64);

impl Default for FnvHasher {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Hash the content of a byte string
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(bytes);
    hasher.finish()
}

/// Byte arena holding the content of every symbol it handed out
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    arena: ByteArena,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into the table
    pub fn intern(&mut self, bytes: &[u8]) -> Symbol {
        let offset = self.arena.append(bytes);
        Symbol {
            offset: offset as u32,
            length: bytes.len() as u32,
        }
    }

    /// Bytes of a symbol created by this table
    ///
    /// A symbol from another table yields whatever lies at its range, or an empty slice if
    /// the range is outside this table.
    pub fn resolve(&self, symbol: Symbol) -> &[u8] {
        self.arena.get(symbol.range()).unwrap_or_default()
    }

    /// Owned copy of the symbol bytes followed by a NUL
    pub fn materialize(&self, symbol: Symbol) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(symbol.len() + 1);
        bytes.extend_from_slice(self.resolve(symbol));
        bytes.push(b'\0');
        bytes
    }

    /// Printable form of the symbol, with termcap escapes for special bytes
    pub fn render(&self, symbol: Symbol) -> String {
        render_bytes(self.resolve(symbol))
    }

    /// Content hash, equal for symbols with equal bytes
    pub fn hash(&self, symbol: Symbol) -> u64 {
        hash_bytes(self.resolve(symbol))
    }

    /// Content equality, regardless of where each symbol is stored
    pub fn eq(&self, left: Symbol, right: Symbol) -> bool {
        left.length == right.length && self.resolve(left) == self.resolve(right)
    }

    /// Bytes used by interned data
    pub const fn size(&self) -> usize {
        self.arena.size()
    }
}

/// Escape bytes the way they are written in a termcap file
pub fn render_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            0x1b => out.push_str("\\E"),
            b'\\' => out.push_str("\\\\"),
            b'^' => out.push_str("\\^"),
            b':' => out.push_str("\\:"),
            b'.' => out.push_str("\\."),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            0x7f => out.push_str("^?"),
            0..0x20 => {
                out.push('^');
                out.push(char::from(b'@' + byte));
            }
            0x20..0x7f => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out
}

/// Describe a single byte for diagnostics, e.g. `'a' (#x61)` or `^C (#x03)`
pub fn describe_byte(byte: u8) -> String {
    let shown = match byte {
        0x1b => "\\E".to_string(),
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        0x08 => "\\b".to_string(),
        0x0c => "\\f".to_string(),
        0x7f => "^?".to_string(),
        0..0x20 => format!("^{}", char::from(b'@' + byte)),
        0x20..0x7f => format!("'{}'", char::from(byte)),
        _ => format!("'\\{byte:03o}'"),
    };
    format!("{shown} (#x{byte:02x})")
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn equal_content_equal_symbols() {
        let mut table = SymbolTable::new();
        let first = table.intern(b"vt100");
        let other = table.intern(b"xterm");
        let second = table.intern(b"vt100");
        assert_ne!(first, second);
        assert!(table.eq(first, second));
        assert!(!table.eq(first, other));
        assert_eq!(table.hash(first), table.hash(second));
    }

    #[test]
    fn fnv_reference_values() {
        assert_eq!(hash_bytes(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_bytes(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn materialize_appends_nul() {
        let mut table = SymbolTable::new();
        let symbol = table.intern(b"cl");
        assert_eq!(table.materialize(symbol), b"cl\0");
        assert_eq!(table.materialize(Symbol::default()), b"\0");
    }

    #[test]
    fn render_escapes() {
        assert_eq!(render_bytes(b"\x1b[%i%d;%dH"), "\\E[%i%d;%dH");
        assert_eq!(render_bytes(b"a:b.c^d\\"), "a\\:b\\.c\\^d\\\\");
        assert_eq!(render_bytes(b"\r\n\t\x08\x0c"), "\\r\\n\\t\\b\\f");
        assert_eq!(render_bytes(b"\x01\x7f\x00"), "^A^?^@");
        assert_eq!(render_bytes(b"\xe9"), "\\351");
    }

    #[test]
    fn describe() {
        assert_eq!(describe_byte(b'a'), "'a' (#x61)");
        assert_eq!(describe_byte(0x1b), "\\E (#x1b)");
        assert_eq!(describe_byte(3), "^C (#x03)");
        assert_eq!(describe_byte(0x7f), "^? (#x7f)");
    }

    #[test]
    fn foreign_symbol_out_of_range() {
        let mut big = SymbolTable::new();
        big.intern(&[b'x'; 100]);
        let far = big.intern(b"far");
        let small = SymbolTable::new();
        assert_eq!(small.resolve(far), b"");
    }

    proptest! {
        #[test]
        fn intern_materialize_round_trip(
            strings in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..50),
        ) {
            let mut table = SymbolTable::new();
            let symbols: Vec<Symbol> = strings.iter().map(|bytes| table.intern(bytes)).collect();
            for (bytes, symbol) in strings.iter().zip(symbols) {
                let mut expected = bytes.clone();
                expected.push(0);
                prop_assert_eq!(table.materialize(symbol), expected);
            }
        }
    }
}
