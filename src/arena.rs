// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Growable storage that never resizes in place
//!
//! Both buffers grow by allocating a fresh block of the next power of two and copying
//! the old contents over, so a block observed before a resize stays valid for the bounds
//! observed with it. Resizing installs the storage before the capacity when growing and
//! the capacity before the storage when shrinking. Mutation requires `&mut self`, which
//! makes these buffers single-writer; nothing here is published to other threads.

use std::{mem, ops::Range};

/// Initial number of slots in a [`RecordBuffer`]
pub const RECORD_INIT_CAPACITY: usize = 8;

/// Initial number of bytes in a [`ByteArena`]
pub const BYTES_INIT_CAPACITY: usize = 32;

/// Largest alignment honored by [`ByteArena::alloc`]
const MAX_ALIGN: usize = 8;

/// Round `value` up to a multiple of `align`, which must be a power of two
const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// Dense buffer of fixed-size records addressed by index
#[derive(Debug, Clone)]
pub struct RecordBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T: Default> RecordBuffer<T> {
    /// Create a buffer with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Reserve `count` contiguous default records, returning the index of the first
    pub fn alloc(&mut self, count: usize) -> usize {
        let index = self.slots.len();
        if index + count > self.capacity {
            self.resize(index + count);
        }
        self.slots.extend((0..count).map(|_| T::default()));
        index
    }

    /// Append one record, returning its index
    pub fn add(&mut self, record: T) -> usize {
        let index = self.alloc(1);
        self.slots[index] = record;
        index
    }

    /// Move the records into fresh storage sized to the least power of two `>= count`
    ///
    /// Records beyond the new capacity are dropped.
    pub fn resize(&mut self, count: usize) {
        let new_capacity = count.next_power_of_two();
        let mut slots = Vec::with_capacity(new_capacity);
        if new_capacity >= self.capacity {
            slots.append(&mut self.slots);
            // storage first when growing
            self.slots = slots;
            self.capacity = new_capacity;
        } else {
            let keep = self.slots.len().min(new_capacity);
            slots.extend(self.slots.drain(..keep));
            // bound first when shrinking
            self.capacity = new_capacity;
            self.slots = slots;
        }
    }
}

impl<T> RecordBuffer<T> {
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Number of records in use
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Number of records that fit before the next resize
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes occupied by the records in use
    pub fn size(&self) -> usize {
        self.slots.len() * mem::size_of::<T>()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

impl<T: Default> Default for RecordBuffer<T> {
    fn default() -> Self {
        Self::with_capacity(RECORD_INIT_CAPACITY)
    }
}

/// Bump allocator for variable length byte data
#[derive(Debug, Clone)]
pub struct ByteArena {
    data: Box<[u8]>,
    offset: usize,
}

impl ByteArena {
    /// Create an arena with `capacity` zeroed bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            offset: 0,
        }
    }

    /// Reserve `size` bytes aligned to `min(align, 8)`, returning the start offset
    ///
    /// The size is rounded up to the same alignment.
    pub fn alloc(&mut self, size: usize, align: usize) -> usize {
        let align = align.clamp(1, MAX_ALIGN).next_power_of_two();
        let start = align_up(self.offset, align);
        let end = start + align_up(size, align);
        if end > self.capacity() {
            self.resize(end);
        }
        self.offset = end;
        start
    }

    /// Copy `bytes` into the arena, returning their offset
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let start = self.alloc(bytes.len(), 1);
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        start
    }

    /// Rewind to the beginning without releasing storage
    pub const fn reset(&mut self) {
        self.offset = 0;
    }

    /// Move the contents into fresh storage sized to the least power of two `>= extent`
    ///
    /// The write offset is clamped to the new capacity.
    pub fn resize(&mut self, extent: usize) {
        let new_capacity = extent.next_power_of_two();
        let mut data = vec![0; new_capacity].into_boxed_slice();
        let keep = self.capacity().min(new_capacity);
        data[..keep].copy_from_slice(&self.data[..keep]);
        self.data = data;
        self.offset = self.offset.min(new_capacity);
    }

    /// Bytes allocated so far
    pub const fn size(&self) -> usize {
        self.offset
    }

    pub const fn is_empty(&self) -> bool {
        self.offset == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Allocated bytes in `range`, or `None` if it reaches past the write offset
    pub fn get(&self, range: Range<usize>) -> Option<&[u8]> {
        if range.end > self.offset {
            return None;
        }
        self.data.get(range)
    }

    /// All allocated bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.offset]
    }
}

impl Default for ByteArena {
    fn default() -> Self {
        Self::with_capacity(BYTES_INIT_CAPACITY)
    }
}
