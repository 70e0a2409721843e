//! Borrowing and owning iteration over a [`DynArray`].

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use stowage_raw::RawStorage;

use crate::array::DynArray;

/// An owning iterator over the elements of a [`DynArray`].
///
/// Holds the array's storage; slots `[head, tail)` are still live.
/// Elements not yielded are dropped with the iterator.
pub struct IntoIter<T> {
    buf: RawStorage<T>,
    head: usize,
    tail: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [head, tail) are live.
        unsafe { self.buf.live(self.head..self.tail) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }
        let index = self.head;
        self.head += 1;
        // SAFETY: slot `index` was live and has just left the live range.
        Some(unsafe { self.buf.read(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tail - self.head;
        (remaining, Some(remaining))
    }

    fn count(self) -> usize {
        self.len()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }
        self.tail -= 1;
        // SAFETY: slot `tail` was live and has just left the live range.
        Some(unsafe { self.buf.read(self.tail) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: slots [head, tail) are the only ones still live.
        unsafe { self.buf.drop_range(self.head..self.tail) }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        let tail = self.len;
        self.len = 0;
        IntoIter {
            buf: self.buf.take(),
            head: 0,
            tail,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_iter_yields_in_order() {
        let array = DynArray::from(["a".to_string(), "b".to_string(), "c".to_string()]);
        let collected: Vec<String> = array.into_iter().collect();
        assert_eq!(collected, ["a", "b", "c"]);
    }

    #[test]
    fn into_iter_from_both_ends() {
        let mut iter = DynArray::from([1, 2, 3, 4]).into_iter();
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.as_slice(), &[2, 3]);
        assert_eq!(iter.next_back(), Some(3));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn borrowing_iteration_sees_live_range_only() {
        let mut array = DynArray::with_capacity(10);
        array.push_back(1);
        array.push_back(2);
        for value in &mut array {
            *value *= 3;
        }
        let seen: Vec<_> = (&array).into_iter().copied().collect();
        assert_eq!(seen, [3, 6]);
    }

    #[test]
    fn empty_array_iterates_nothing() {
        let array = DynArray::<String>::new();
        assert_eq!(array.into_iter().count(), 0);
    }
}
