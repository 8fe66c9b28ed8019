//! Untyped columnar storage for component data.
//!
//! This module implements [`Column`], a dense, type-erased container holding
//! fixed-size byte records. An archetype owns one column per component in
//! its signature; the store never interprets column contents beyond copying
//! them, which keeps the core free of any reflection machinery.
//!
//! # Storage model
//!
//! A column is backed by a `Vec<u64>`:
//!
//! ```text
//! words: [u64; ...]        -> viewed as bytes
//! row r occupies bytes [r * element_size, (r + 1) * element_size)
//! ```
//!
//! Backing the buffer with `u64` words rather than raw bytes guarantees the
//! buffer start is 8-byte aligned. Since Rust type layout guarantees
//! `size_of::<T>()` is a multiple of `align_of::<T>()`, every row offset is
//! then correctly aligned for any element type with alignment at most
//! [`COLUMN_ALIGN`], which is what allows the typed access layer to hand out
//! `&T` views into a column without copies.
//!
//! # Core operations
//!
//! - **Append**: [`Column::push`] and [`Column::push_from`] write a new row
//!   at the end, growing the backing buffer with doubling capacity.
//! - **Remove**: [`Column::swap_remove`] deletes a row in `O(1)` by moving
//!   the last row into the vacated slot. Columns are therefore always dense;
//!   there are no vacant rows to skip during iteration.
//!
//! These operations preserve dense packing but do **not** preserve row
//! order; callers are responsible for patching whatever metadata tracks the
//! relocated last row.
//!
//! [`COLUMN_ALIGN`]: crate::engine::types::COLUMN_ALIGN

/// A dense, type-erased column of fixed-size byte records.
///
/// ## Invariants
/// - Every row occupies exactly `element_size` bytes.
/// - Rows `0..len` are initialized; the backing buffer may be larger.
/// - The backing buffer start is 8-byte aligned.
#[derive(Debug)]
pub struct Column {
    element_size: usize,
    len: usize,
    words: Vec<u64>,
}

impl Column {
    /// Creates an empty column whose rows are `element_size` bytes wide.
    pub fn new(element_size: usize) -> Self {
        debug_assert!(element_size > 0, "zero-sized column element");
        Self {
            element_size,
            len: 0,
            words: Vec::new(),
        }
    }

    /// Returns the fixed byte size of one row.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Returns the number of rows currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the column holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte view over all initialized rows.
    #[inline]
    fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.len * self.element_size]
    }

    /// Mutable byte view over all initialized rows.
    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len * self.element_size;
        &mut bytemuck::cast_slice_mut(&mut self.words)[..end]
    }

    /// Returns the bytes of row `row`, or `None` if out of bounds.
    #[inline]
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.len {
            return None;
        }
        let start = row * self.element_size;
        Some(&self.bytes()[start..start + self.element_size])
    }

    /// Returns the bytes of row `row` mutably, or `None` if out of bounds.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [u8]> {
        if row >= self.len {
            return None;
        }
        let start = row * self.element_size;
        let size = self.element_size;
        Some(&mut self.bytes_mut()[start..start + size])
    }

    /// Grows the backing buffer so it can hold at least `rows` rows.
    fn ensure_rows(&mut self, rows: usize) {
        let words_needed = (rows * self.element_size + 7) / 8;
        if words_needed > self.words.len() {
            let grown = words_needed.max(self.words.len() * 2);
            self.words.resize(grown, 0);
        }
    }

    /// Appends one row copied from `value` and returns its row index.
    ///
    /// ## Panics
    /// Panics in debug builds if `value.len() != element_size`; the world
    /// validates lengths before data reaches a column.
    pub fn push(&mut self, value: &[u8]) -> usize {
        debug_assert_eq!(value.len(), self.element_size);
        let row = self.len;
        self.ensure_rows(row + 1);
        self.len += 1;
        let start = row * self.element_size;
        let size = self.element_size;
        self.bytes_mut()[start..start + size].copy_from_slice(value);
        row
    }

    /// Appends one row copied out of `source` at `source_row` and returns
    /// the new row index.
    ///
    /// Used during archetype migration to carry an entity's surviving
    /// component data into its destination column.
    pub fn push_from(&mut self, source: &Column, source_row: usize) -> usize {
        debug_assert_eq!(source.element_size, self.element_size);
        let value = match source.row(source_row) {
            Some(bytes) => bytes,
            None => unreachable!("migration source row out of bounds"),
        };
        let row = self.len;
        self.ensure_rows(row + 1);
        self.len += 1;
        let start = row * self.element_size;
        let size = self.element_size;
        self.bytes_mut()[start..start + size].copy_from_slice(value);
        row
    }

    /// Removes row `row` by moving the last row into its slot.
    ///
    /// Returns `true` if a row was relocated (i.e. `row` was not the last),
    /// in which case the caller must update whatever metadata referenced the
    /// former last row.
    pub fn swap_remove(&mut self, row: usize) -> bool {
        debug_assert!(row < self.len, "swap_remove out of bounds");
        let last = self.len - 1;
        let size = self.element_size;
        let moved = row != last;
        if moved {
            self.bytes_mut()
                .copy_within(last * size..(last + 1) * size, row * size);
        }
        self.len -= 1;
        moved
    }
}
