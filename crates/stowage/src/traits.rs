//! Comparison, hashing, formatting, and conversion impls for [`DynArray`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};
use std::slice::SliceIndex;

use crate::array::DynArray;

impl<T, I: SliceIndex<[T]>> Index<I> for DynArray<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynArray<T> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<DynArray<U>> for DynArray<T> {
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(err) = self.try_grow_amortized(lower) {
            err.raise();
        }
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = Self::with_capacity(N);
        for value in values {
            array.push_within_capacity(value);
        }
        array
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_ignores_capacity() {
        let mut roomy = DynArray::with_capacity(16);
        roomy.push_back(1);
        roomy.push_back(2);
        assert_eq!(roomy, DynArray::from([1, 2]));
        assert_ne!(roomy, DynArray::from([2, 1]));
    }

    #[test]
    fn hash_matches_slice_hash() {
        let array = DynArray::from([1u8, 2, 3]);
        assert_eq!(hash_of(&array), hash_of(&[1u8, 2, 3][..]));
    }

    #[test]
    fn debug_formats_as_list() {
        let array = DynArray::from([1, 2]);
        assert_eq!(format!("{array:?}"), "[1, 2]");
    }

    #[test]
    fn range_indexing_uses_live_elements() {
        let mut array = DynArray::from([1, 2, 3, 4]);
        assert_eq!(&array[1..3], &[2, 3]);
        array[0] = 9;
        assert_eq!(array[0], 9);
    }

    #[test]
    #[should_panic]
    fn index_past_len_panics_even_within_capacity() {
        let mut array = DynArray::with_capacity(4);
        array.push_back(1);
        assert_eq!(array[1], 0);
    }

    #[test]
    fn collect_and_extend() {
        let mut array: DynArray<u32> = (1..=3).collect();
        assert_eq!(array.capacity(), 3);
        array.extend([4, 5]);
        assert_eq!(array, [1, 2, 3, 4, 5]);
        assert_eq!(array.capacity(), 6);
    }

    #[test]
    fn repeated_single_extends_double_capacity() {
        let mut array = DynArray::new();
        let mut capacities = Vec::new();
        let mut reallocations = 0;
        for value in 0..1000u32 {
            let before = array.capacity();
            array.extend([value]);
            if array.capacity() != before {
                reallocations += 1;
            }
            if capacities.len() < 8 {
                capacities.push(array.capacity());
            }
        }
        assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8]);
        assert_eq!(reallocations, 11);
        assert_eq!(array.len(), 1000);
        assert_eq!(array[999], 999);
    }
}
