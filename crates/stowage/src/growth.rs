//! Capacity growth, relocation, and resizing.
//!
//! # Relocation policy
//!
//! An element is moved into a new block when its relocation cannot fail,
//! and copied only when moving could fail midway. A Rust move is a bitwise
//! copy of the value's bytes that never runs user code, so relocation can
//! never fail: every growth path moves and none ever calls `Clone`. All
//! relocation goes through one routine, `DynArray::relocate_into`.

#![allow(unsafe_code)]

use std::ops::{Deref, DerefMut};

use stowage_raw::{RawStorage, StorageError};

use crate::array::DynArray;

impl<T> DynArray<T> {
    /// Grow the capacity to exactly `new_capacity`.
    ///
    /// `new_capacity` is an absolute target, not an increment. Does nothing
    /// if it does not exceed the current capacity; element addresses are
    /// then unchanged. On error the array is untouched.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), StorageError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let fresh = RawStorage::try_with_capacity(new_capacity)?;
        self.relocate_into(fresh, None);
        Ok(())
    }

    /// Grow the capacity to exactly `new_capacity`.
    ///
    /// ```
    /// # use stowage::DynArray;
    /// let mut array = DynArray::from([1, 2]);
    /// array.reserve(10);
    /// assert_eq!(array.capacity(), 10);
    /// array.reserve(4);
    /// assert_eq!(array.capacity(), 10);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow or allocation failure.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_reserve(new_capacity) {
            err.raise();
        }
    }

    /// Make room for `additional` more elements under the growth policy.
    ///
    /// A full array grows to at least `policy.next_capacity(capacity)`, so
    /// repeated small requests stay amortised O(1).
    pub(crate) fn try_grow_amortized(&mut self, additional: usize) -> Result<(), StorageError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(StorageError::CapacityOverflow { requested: usize::MAX })?;
        if required <= self.capacity() {
            return Ok(());
        }
        let target = self
            .policy
            .next_capacity(self.capacity())
            .map_or(required, |grown| grown.max(required));
        self.try_reserve(target)
    }

    /// Change the length to `new_len`, filling new slots from `f`.
    ///
    /// Growing reserves exactly `new_len` first. If `f` panics, the
    /// elements added by this call are dropped and the length restored.
    pub fn try_resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), StorageError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.try_reserve(new_len)?;
        let mut grown = self.rollback_on_unwind();
        while grown.len() < new_len {
            grown.push_within_capacity(f());
        }
        grown.commit();
        Ok(())
    }

    /// Change the length to `new_len`, filling new slots from `f`.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow or allocation failure.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if let Err(err) = self.try_resize_with(new_len, f) {
            err.raise();
        }
    }

    /// Change the length to `new_len`, filling new slots with defaults.
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), StorageError>
    where
        T: Default,
    {
        self.try_resize_with(new_len, T::default)
    }

    /// Change the length to `new_len`, filling new slots with defaults.
    ///
    /// ```
    /// # use stowage::DynArray;
    /// let mut array = DynArray::from([5, 6, 7]);
    /// array.resize(5);
    /// assert_eq!(array, [5, 6, 7, 0, 0]);
    /// array.resize(1);
    /// assert_eq!(array, [5]);
    /// assert_eq!(array.capacity(), 5);
    /// ```
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Drop every element past `len`. Does nothing if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = self.len;
        self.len = len;
        // SAFETY: slots [len, old_len) were live and are now outside the
        // live range, so each is dropped exactly once.
        unsafe {
            self.buf.drop_range(len..old_len);
        }
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Move every live element into `fresh` and adopt it as the storage.
    ///
    /// With `gap = Some(index)`, elements from `index` on land one slot to
    /// the right, leaving slot `index` for the caller (who has already
    /// constructed a value there). The old block is released with no
    /// element dropped: its values now live in `fresh`.
    pub(crate) fn relocate_into(&mut self, mut fresh: RawStorage<T>, gap: Option<usize>) {
        let len = self.len;
        let split = gap.unwrap_or(len);
        let shift = usize::from(gap.is_some());
        debug_assert!(split <= len && len + shift <= fresh.capacity());

        tracing::trace!(
            from = self.capacity(),
            to = fresh.capacity(),
            len,
            "relocating elements into new block"
        );

        // SAFETY: slots [0, len) of the old block are live; the target
        // slots of `fresh` are uninitialised and in bounds (checked above).
        // After the copy the old slots are never read or dropped again.
        unsafe {
            self.buf.relocate_to(0..split, &mut fresh, 0);
            self.buf.relocate_to(split..len, &mut fresh, split + shift);
        }
        self.buf.swap(&mut fresh);
    }

    /// Guard that truncates back to the current length if dropped before
    /// [`Rollback::commit`].
    pub(crate) fn rollback_on_unwind(&mut self) -> Rollback<'_, T> {
        let restore_len = self.len;
        Rollback {
            array: self,
            restore_len,
        }
    }
}

/// Restores an array's length on unwind. See
/// [`DynArray::rollback_on_unwind`].
pub(crate) struct Rollback<'a, T> {
    array: &'a mut DynArray<T>,
    restore_len: usize,
}

impl<T> Rollback<'_, T> {
    /// Keep everything added since the guard was taken.
    pub(crate) fn commit(mut self) {
        self.restore_len = self.array.len;
    }
}

impl<T> Deref for Rollback<'_, T> {
    type Target = DynArray<T>;

    fn deref(&self) -> &DynArray<T> {
        self.array
    }
}

impl<T> DerefMut for Rollback<'_, T> {
    fn deref_mut(&mut self) -> &mut DynArray<T> {
        self.array
    }
}

impl<T> Drop for Rollback<'_, T> {
    fn drop(&mut self) {
        self.array.truncate(self.restore_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_within_capacity_keeps_addresses() {
        let mut array = DynArray::with_capacity(8);
        array.push_back(1u32);
        array.push_back(2);
        let ptr = array.as_ptr();
        array.reserve(8);
        array.reserve(3);
        assert_eq!(array.capacity(), 8);
        assert_eq!(array.as_ptr(), ptr);
    }

    #[test]
    fn reserve_beyond_capacity_is_exact() {
        let mut array = DynArray::from([1, 2, 3]);
        array.reserve(7);
        assert_eq!(array.capacity(), 7);
        assert_eq!(array, [1, 2, 3]);
    }

    #[test]
    fn try_reserve_overflow_leaves_array_intact() {
        let mut array = DynArray::from([1u64, 2]);
        let err = array.try_reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, StorageError::CapacityOverflow { .. }));
        assert_eq!(array, [1, 2]);
        assert_eq!(array.capacity(), 2);
    }

    #[test]
    fn resize_grows_to_exact_capacity() {
        let mut array = DynArray::<String>::new();
        array.resize(3);
        assert_eq!(array.len(), 3);
        assert_eq!(array.capacity(), 3);
        assert!(array.iter().all(String::is_empty));
    }

    #[test]
    fn try_resize_grows_and_shrinks() {
        let mut array = DynArray::from([4u8]);
        assert_eq!(array.try_resize(3), Ok(()));
        assert_eq!(array, [4, 0, 0]);
        assert_eq!(array.try_resize(1), Ok(()));
        assert_eq!(array, [4]);
        assert!(matches!(
            array.try_resize(usize::MAX),
            Err(StorageError::CapacityOverflow { .. })
        ));
        assert_eq!(array, [4]);
    }

    #[test]
    fn amortized_growth_follows_policy_floor_and_request() {
        let mut array = DynArray::<u32>::new();
        array.try_grow_amortized(1).unwrap();
        assert_eq!(array.capacity(), 1);
        array.push_back(1);
        array.try_grow_amortized(1).unwrap();
        assert_eq!(array.capacity(), 2);
        array.try_grow_amortized(10).unwrap();
        assert_eq!(array.capacity(), 11);
        array.try_grow_amortized(10).unwrap();
        assert_eq!(array.capacity(), 11);
    }

    #[test]
    fn resize_with_uses_closure() {
        let mut next = 0;
        let mut array = DynArray::new();
        array.resize_with(4, || {
            next += 1;
            next
        });
        assert_eq!(array, [1, 2, 3, 4]);
    }

    #[test]
    fn resize_to_same_length_is_noop() {
        let mut array = DynArray::from([1, 2]);
        array.resize(2);
        assert_eq!(array, [1, 2]);
    }

    #[test]
    fn truncate_and_clear_keep_capacity() {
        let mut array = DynArray::from([1, 2, 3, 4]);
        array.truncate(10);
        assert_eq!(array.len(), 4);
        array.truncate(2);
        assert_eq!(array, [1, 2]);
        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 4);
    }

    #[test]
    fn rollback_guard_restores_length_unless_committed() {
        let mut array = DynArray::with_capacity(4);
        array.push_back(1);
        {
            let mut guard = array.rollback_on_unwind();
            guard.push_within_capacity(2);
        }
        assert_eq!(array, [1]);
        {
            let mut guard = array.rollback_on_unwind();
            guard.push_within_capacity(2);
            guard.commit();
        }
        assert_eq!(array, [1, 2]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reserve_preserves_values(
                values in proptest::collection::vec(any::<i64>(), 0..64),
                extra in 0usize..64,
            ) {
                let mut array: DynArray<i64> = values.iter().copied().collect();
                let target = array.capacity() + extra;
                array.reserve(target);
                prop_assert_eq!(array.capacity(), target);
                prop_assert_eq!(array.as_slice(), values.as_slice());
            }

            #[test]
            fn resize_matches_reference(
                start in 0usize..32,
                sizes in proptest::collection::vec(0usize..48, 1..10),
            ) {
                let mut array = DynArray::<u8>::with_len(start);
                let mut reference = vec![0u8; start];
                for (step, &size) in sizes.iter().enumerate() {
                    array.resize(size);
                    reference.resize(size, 0);
                    if let Some(last) = array.last_mut() {
                        *last = step as u8;
                        *reference.last_mut().unwrap() = step as u8;
                    }
                    prop_assert_eq!(array.as_slice(), reference.as_slice());
                    prop_assert!(array.capacity() >= array.len());
                }
            }
        }
    }
}
