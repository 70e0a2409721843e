//! The [`DynArray`] type: element lifecycle on top of [`RawStorage`].
//!
//! `DynArray` owns one [`RawStorage`] and a live count. Slots `[0, len)`
//! hold live elements; `[len, capacity)` are uninitialised. Every
//! operation that constructs elements into a fresh block builds the block
//! completely before adopting it, so a panicking or failing constructor
//! leaves the original array untouched.
//!
//! Growth lives in [`growth`](crate::growth), positional insert/erase in
//! [`insert`](crate::insert), owning iteration in [`iter`](crate::iter).

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::mem;
use std::ops::{Deref, DerefMut};

use stowage_raw::{GrowthPolicy, RawStorage, StorageError};

use crate::error::ConstructError;

/// A growable contiguous array.
///
/// # Reference invalidation
///
/// Any reallocating growth invalidates every reference into the array. A
/// positional insert that does not reallocate invalidates references at and
/// after the insertion point; an erase invalidates references at and after
/// the erased position. These rules are enforced at compile time: every
/// mutating operation takes `&mut self`, so no reference can survive it.
///
/// ```compile_fail
/// # use stowage::DynArray;
/// let mut array = DynArray::from([1, 2, 3]);
/// let first = &array[0];
/// array.push_back(4); // may reallocate
/// assert_eq!(*first, 1);
/// ```
///
/// ```compile_fail
/// # use stowage::DynArray;
/// let mut array = DynArray::from([1, 2, 3]);
/// let last = array.iter().last();
/// array.erase(0);
/// assert_eq!(last, Some(&3));
/// ```
///
/// # Preconditions
///
/// Indexing past `len`, inserting past `len`, and erasing past `len` panic.
/// [`get_unchecked`](Self::get_unchecked) keeps the unchecked contract and
/// only asserts in debug builds.
///
/// # Growth
///
/// Appends, inserts, and `extend` grow a full array by its
/// [`GrowthPolicy`] ([`GrowthPolicy::DOUBLING`] unless built with
/// [`with_policy`](Self::with_policy)). `reserve`, `resize`, and sized
/// construction allocate exactly what they are asked for.
pub struct DynArray<T> {
    pub(crate) buf: RawStorage<T>,
    pub(crate) len: usize,
    pub(crate) policy: GrowthPolicy,
}

impl<T> DynArray<T> {
    /// Create an empty array. Never allocates.
    pub const fn new() -> Self {
        Self::with_policy(GrowthPolicy::DOUBLING)
    }

    /// Create an empty array that grows by `policy`. Never allocates.
    ///
    /// ```
    /// # use stowage::{DynArray, GrowthPolicy};
    /// let policy = GrowthPolicy::new(3, 4).unwrap();
    /// let mut array = DynArray::with_policy(policy);
    /// array.push_back(1);
    /// assert_eq!(array.capacity(), 4);
    /// ```
    pub const fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            buf: RawStorage::new(),
            len: 0,
            policy,
        }
    }

    /// Create an empty array with room for exactly `capacity` elements.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        Ok(Self {
            buf: RawStorage::try_with_capacity(capacity)?,
            len: 0,
            policy: GrowthPolicy::DOUBLING,
        })
    }

    /// Create an empty array with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow or allocation failure.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: RawStorage::with_capacity(capacity),
            len: 0,
            policy: GrowthPolicy::DOUBLING,
        }
    }

    /// Create an array of `len` elements built by `f(index)`.
    ///
    /// Capacity equals `len`. If `f` fails or panics, every element built
    /// so far is dropped and the storage released before the failure
    /// reaches the caller.
    pub fn try_from_fn<E, F>(len: usize, mut f: F) -> Result<Self, ConstructError<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut array = Self::try_with_capacity(len)?;
        for index in 0..len {
            let value = f(index).map_err(ConstructError::Element)?;
            array.push_within_capacity(value);
        }
        Ok(array)
    }

    /// Create an array of `len` elements built by `f(index)`.
    pub fn from_fn<F>(len: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self::try_from_fn(len, |index| Ok::<T, Infallible>(f(index)))
            .unwrap_or_else(|err| err.raise())
    }

    /// Create an array of `len` default values with capacity exactly `len`.
    pub fn try_with_len(len: usize) -> Result<Self, StorageError>
    where
        T: Default,
    {
        Self::try_from_fn(len, |_| Ok::<T, Infallible>(T::default()))
            .map_err(ConstructError::into_storage)
    }

    /// Create an array of `len` default values with capacity exactly `len`.
    ///
    /// ```
    /// # use stowage::DynArray;
    /// let array = DynArray::<i32>::with_len(3);
    /// assert_eq!(array, [0, 0, 0]);
    /// assert_eq!(array.capacity(), 3);
    /// ```
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(len, |_| T::default())
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The rule used to grow a full array.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Number of elements the array can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live.
        unsafe { self.buf.live(0..self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots [0, len) are live.
        unsafe { self.buf.live_mut(0..self.len) }
    }

    /// Address of the first slot. Dangling when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index < len()`. Checked only in debug builds.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} out of bounds for length {}", self.len);
        // SAFETY: caller guarantees index < len, so the slot is live.
        unsafe { &*self.buf.address(index) }
    }

    /// Mutable element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index < len()`. Checked only in debug builds.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index {index} out of bounds for length {}", self.len);
        // SAFETY: caller guarantees index < len; `&mut self` is unique.
        unsafe { &mut *self.buf.address(index) }
    }

    /// Append `value`, growing by doubling when full.
    pub fn try_push_back(&mut self, value: T) -> Result<&mut T, StorageError> {
        self.try_emplace_back_with(|| Ok::<T, Infallible>(value))
            .map_err(ConstructError::into_storage)
    }

    /// Append `value`, growing by doubling when full.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow or allocation failure.
    pub fn push_back(&mut self, value: T) -> &mut T {
        self.emplace_back_with(|| value)
    }

    /// Construct a new last element from `f`, growing by doubling when full.
    ///
    /// Amortised O(1). Returns a reference to the new element.
    pub fn try_emplace_back_with<E, F>(&mut self, f: F) -> Result<&mut T, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let index = self.try_emplace_with(self.len, f)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Construct a new last element from `f`, growing by doubling when full.
    ///
    /// ```
    /// # use stowage::DynArray;
    /// let mut names = DynArray::new();
    /// names.emplace_back_with(|| String::from("left")).push('!');
    /// assert_eq!(names[0], "left!");
    /// ```
    pub fn emplace_back_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.try_emplace_back_with(|| Ok::<T, Infallible>(f()))
            .unwrap_or_else(|err| err.raise())
    }

    /// Remove the last element and return it, or `None` if empty. O(1).
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was the last live slot and is now outside the
        // live range, so it is read exactly once.
        Some(unsafe { self.buf.read(self.len) })
    }

    /// Exchange contents and growth policies with `other`. O(1); no
    /// element is touched.
    pub fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.policy, &mut other.policy);
    }

    /// Move the contents out, leaving an empty doubling array with no
    /// storage.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Write `value` into the first free slot.
    ///
    /// # Panics
    ///
    /// Panics if the array is full.
    pub(crate) fn push_within_capacity(&mut self, value: T) -> &mut T {
        let slot = self.buf.slot_mut(self.len).write(value);
        self.len += 1;
        slot
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: slots [0, len) are live; the storage releases the block
        // in its own drop afterwards.
        unsafe { self.buf.drop_range(0..self.len) }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    /// Copy with capacity exactly `len()`; no spare room. The growth
    /// policy is copied too.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        copy.policy = self.policy;
        for item in self.as_slice() {
            copy.push_within_capacity(item.clone());
        }
        copy
    }

    /// Copy-assign from `source`.
    ///
    /// When `source` does not fit in the current capacity, a full copy is
    /// built first and then swapped in, so a panicking `clone` leaves
    /// `self` untouched. Otherwise the overlapping prefix is clone-assigned
    /// in place and the tail is dropped or cloned onto the end, without
    /// reallocating. `self` keeps its own growth policy.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            copy.policy = self.policy;
            self.swap(&mut copy);
            return;
        }

        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source[..common]);
        if source.len < self.len {
            self.truncate(source.len);
        } else {
            let mut tail = self.rollback_on_unwind();
            for item in &source[common..] {
                tail.push_within_capacity(item.clone());
            }
            tail.commit();
        }
    }
}
