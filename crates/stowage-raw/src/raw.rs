//! Uninitialised slot storage.
//!
//! [`RawStorage`] owns a block sized for `capacity` values of `T` and
//! nothing else: it never constructs, reads, or drops a `T` on its own.
//! Which slots are live is the owner's business. Every `unsafe` operation
//! here carries a `# Safety` contract stated in terms of slot liveness.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::Range;
use std::ptr::{self, NonNull};
use std::slice;

use crate::error::StorageError;

/// A block of `capacity` uninitialised slots for values of type `T`.
///
/// The block is allocated iff `capacity > 0` and `T` is not zero-sized.
/// Otherwise the pointer is dangling (well-aligned, never dereferenced
/// for a non-zero-sized read) and no allocator call is ever made.
///
/// Not `Clone`: the storage cannot know which slots are live. The block
/// moves with the value, or is handed over by [`take`](Self::take) and
/// [`swap`](Self::swap).
pub struct RawStorage<T> {
    ptr: NonNull<T>,
    capacity: usize,
    /// Slots may hold `T` values whose drop obligations belong to the owner.
    _owns: PhantomData<T>,
}

// SAFETY: RawStorage is a uniquely owned block; sending or sharing it is
// exactly as safe as sending or sharing the `T` values it may hold.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: see above.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    /// Create an empty storage with capacity 0. Never allocates.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Acquire a block for exactly `capacity` slots.
    ///
    /// Capacity 0 (or a zero-sized `T`) makes no allocator call.
    ///
    /// # Errors
    ///
    /// [`StorageError::CapacityOverflow`] if `capacity * size_of::<T>()`
    /// exceeds `isize::MAX`; [`StorageError::AllocationFailed`] if the
    /// allocator returns null.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        let layout = Layout::array::<T>(capacity)
            .map_err(|_| StorageError::CapacityOverflow { requested: capacity })?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            tracing::debug!(
                requested_bytes = layout.size(),
                align = layout.align(),
                "slot storage allocation failed"
            );
            return Err(StorageError::allocation_failed(layout));
        };
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Acquire a block for exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; allocator failure goes through
    /// [`std::alloc::handle_alloc_error`].
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(storage) => storage,
            Err(err) => err.raise(),
        }
    }

    /// Number of slots in the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether an allocator call backs this storage.
    pub fn is_allocated(&self) -> bool {
        self.allocated_layout().is_some()
    }

    /// Size of the block in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.capacity * mem::size_of::<T>()
    }

    /// Start of the block.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable start of the block.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of slot `offset`.
    ///
    /// `offset == capacity` is legal and yields the one-past-the-end
    /// address, which must never be dereferenced. `offset > capacity`
    /// violates the precondition; this is checked in debug builds only.
    pub fn address(&self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "slot offset {offset} past end of storage with capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// All slots, as uninitialised views.
    pub fn slots(&self) -> &[MaybeUninit<T>] {
        // SAFETY: the block spans `capacity` slots of `T` (or `T` is
        // zero-sized and the pointer is dangling but aligned), and
        // `MaybeUninit<T>` places no requirement on the slot contents.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// All slots, as mutable uninitialised views.
    pub fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: as in `slots`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// The slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    pub fn slot(&self, index: usize) -> &MaybeUninit<T> {
        &self.slots()[index]
    }

    /// The mutable slot at `index`.
    ///
    /// Writing a value into a slot that already holds a live value leaks
    /// the old one; the owner tracks liveness.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    pub fn slot_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        &mut self.slots_mut()[index]
    }

    /// View the slots in `range` as live values.
    ///
    /// # Safety
    ///
    /// `range` must lie within `[0, capacity]` and every slot in it must
    /// hold a live value.
    pub unsafe fn live(&self, range: Range<usize>) -> &[T] {
        debug_assert!(range.start <= range.end && range.end <= self.capacity);
        // SAFETY: caller guarantees `range` is in bounds and initialised.
        unsafe { slice::from_raw_parts(self.address(range.start), range.len()) }
    }

    /// Mutable view of the slots in `range` as live values.
    ///
    /// # Safety
    ///
    /// Same contract as [`live`](Self::live).
    pub unsafe fn live_mut(&mut self, range: Range<usize>) -> &mut [T] {
        debug_assert!(range.start <= range.end && range.end <= self.capacity);
        // SAFETY: caller guarantees `range` is in bounds and initialised;
        // `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.address(range.start), range.len()) }
    }

    /// Move the value out of slot `index`, leaving the slot logically dead.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot must hold a live value, which the
    /// caller must afterwards treat as uninitialised.
    pub unsafe fn read(&self, index: usize) -> T {
        // SAFETY: caller guarantees the slot is live.
        unsafe { self.slot(index).assume_init_read() }
    }

    /// Run the destructors of the values in `range`.
    ///
    /// # Safety
    ///
    /// Every slot in `range` must be in bounds and hold a live value,
    /// which the caller must afterwards treat as uninitialised.
    pub unsafe fn drop_range(&mut self, range: Range<usize>) {
        debug_assert!(range.start <= range.end && range.end <= self.capacity);
        let tail = ptr::slice_from_raw_parts_mut(self.address(range.start), range.len());
        // SAFETY: caller guarantees every slot in range is live.
        unsafe { ptr::drop_in_place(tail) }
    }

    /// Bitwise-move the values in `src` into `dst` starting at `dst_start`.
    ///
    /// Relocation in Rust is a plain byte copy that cannot fail and never
    /// runs `Clone`, so a partially relocated state is impossible.
    ///
    /// # Safety
    ///
    /// Every slot in `src` must hold a live value; the destination slots
    /// `[dst_start, dst_start + src.len())` must be in bounds of `dst` and
    /// uninitialised. Afterwards the source slots are logically dead and
    /// the destination slots live.
    pub unsafe fn relocate_to(&self, src: Range<usize>, dst: &mut RawStorage<T>, dst_start: usize) {
        debug_assert!(src.start <= src.end && src.end <= self.capacity);
        debug_assert!(dst_start + src.len() <= dst.capacity);
        // SAFETY: two distinct storages never overlap; bounds per caller.
        unsafe {
            ptr::copy_nonoverlapping(self.address(src.start), dst.address(dst_start), src.len());
        }
    }

    /// Exchange blocks with `other`. O(1); no value is touched.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Transfer the block out, leaving an empty storage behind.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    fn allocated_layout(&self) -> Option<Layout> {
        // Cannot fail: the same layout was validated when the block was acquired.
        let layout = Layout::array::<T>(self.capacity).ok()?;
        (layout.size() != 0).then_some(layout)
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.allocated_layout() {
            // SAFETY: `ptr` came from `alloc::alloc` with this same layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T> std::fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawStorage")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
