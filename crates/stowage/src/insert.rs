//! Positional insert, emplace, and erase.
//!
//! Insertion takes one of two paths:
//!
//! - **In place** (`len < capacity`): the new value is built first, so a
//!   failing constructor leaves the array untouched. It is then written to
//!   the first free slot and rotated into position; the tail shifts right
//!   by one and no slot is read after being overwritten.
//! - **Reallocating** (`len == capacity`): a block sized by the array's
//!   [`GrowthPolicy::next_capacity`](crate::GrowthPolicy::next_capacity) is
//!   acquired and the new value is built directly in its final slot before
//!   any element is relocated, so a failing constructor only discards the
//!   fresh block.

#![allow(unsafe_code)]

use std::convert::Infallible;

use stowage_raw::{RawStorage, StorageError};

use crate::array::DynArray;
use crate::error::ConstructError;

impl<T> DynArray<T> {
    /// Construct a value from `f` at `index`, shifting later elements right.
    ///
    /// Returns the index of the inserted element. On any error the array
    /// is exactly as before the call.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn try_emplace_with<E, F>(&mut self, index: usize, f: F) -> Result<usize, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        assert!(
            index <= self.len,
            "insertion index {index} out of bounds for length {}",
            self.len
        );

        if self.len < self.capacity() {
            let value = f().map_err(ConstructError::Element)?;
            self.push_within_capacity(value);
            self.as_mut_slice()[index..].rotate_right(1);
        } else {
            let new_capacity = self.policy.next_capacity(self.capacity())?;
            let mut fresh = RawStorage::try_with_capacity(new_capacity)?;
            let value = f().map_err(ConstructError::Element)?;
            fresh.slot_mut(index).write(value);
            self.relocate_into(fresh, Some(index));
            self.len += 1;
        }
        Ok(index)
    }

    /// Construct a value from `f` at `index`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`, on capacity overflow, or on allocation
    /// failure.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> usize
    where
        F: FnOnce() -> T,
    {
        self.try_emplace_with(index, || Ok::<T, Infallible>(f()))
            .unwrap_or_else(|err| err.raise())
    }

    /// Insert `value` at `index`, shifting later elements right.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, StorageError> {
        self.try_emplace_with(index, || Ok::<T, Infallible>(value))
            .map_err(ConstructError::into_storage)
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// ```
    /// # use stowage::DynArray;
    /// let mut array = DynArray::from([1, 3]);
    /// let at = array.insert(1, 2);
    /// assert_eq!(array[at], 2);
    /// assert_eq!(array, [1, 2, 3]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`, on capacity overflow, or on allocation
    /// failure.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace_with(index, || value)
    }

    /// Erase the element at `index`, shifting later elements left.
    ///
    /// Returns the index of the element now occupying the erased slot.
    /// `index == len()` behaves as [`pop_back`](Self::pop_back) and
    /// returns the new end.
    ///
    /// ```
    /// # use stowage::DynArray;
    /// let mut array = DynArray::from([1, 2, 3]);
    /// assert_eq!(array.erase(0), 0);
    /// assert_eq!(array, [2, 3]);
    /// assert_eq!(array.erase(2), 1);
    /// assert_eq!(array, [2]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn erase(&mut self, index: usize) -> usize {
        assert!(
            index <= self.len,
            "erase index {index} out of bounds for length {}",
            self.len
        );

        if index == self.len {
            drop(self.pop_back());
            return self.len;
        }
        drop(self.remove(index));
        index
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {index} out of bounds for length {}",
            self.len
        );

        self.as_mut_slice()[index..].rotate_left(1);
        self.len -= 1;
        // SAFETY: the removed element was rotated into slot `len`, which is
        // now outside the live range and read exactly once.
        unsafe { self.buf.read(self.len) }
    }
}
