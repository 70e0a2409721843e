//! Growth policy parameters.

use crate::error::StorageError;

/// Capacity growth rule applied when an append or insert finds the
/// storage full.
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Multiplier applied to the current capacity.
    ///
    /// Default: 2. Must be at least 2 so that appends stay amortised O(1).
    factor: usize,

    /// Capacity chosen when growing from an empty storage.
    ///
    /// Default: 1. Must be at least 1.
    min_non_zero_capacity: usize,
}

impl GrowthPolicy {
    /// Default growth multiplier.
    pub const DEFAULT_FACTOR: usize = 2;

    /// Default first capacity when growing from zero.
    pub const MIN_NON_ZERO_CAPACITY: usize = 1;

    /// Capacity doubling with a floor of one slot.
    ///
    /// Growing from empty by single appends yields 1, 2, 4, 8, ...
    pub const DOUBLING: Self = Self {
        factor: Self::DEFAULT_FACTOR,
        min_non_zero_capacity: Self::MIN_NON_ZERO_CAPACITY,
    };

    /// Create a policy with a custom factor and floor.
    ///
    /// Returns `None` if `factor < 2` or `min_non_zero_capacity == 0`.
    pub const fn new(factor: usize, min_non_zero_capacity: usize) -> Option<Self> {
        if factor < 2 || min_non_zero_capacity == 0 {
            return None;
        }
        Some(Self {
            factor,
            min_non_zero_capacity,
        })
    }

    /// Growth multiplier.
    pub const fn factor(&self) -> usize {
        self.factor
    }

    /// Capacity chosen when growing from zero.
    pub const fn min_non_zero_capacity(&self) -> usize {
        self.min_non_zero_capacity
    }

    /// Capacity to grow to from `current`.
    ///
    /// Returns `max(min_non_zero_capacity, factor * current)`, or
    /// [`StorageError::CapacityOverflow`] if the product overflows.
    pub fn next_capacity(&self, current: usize) -> Result<usize, StorageError> {
        let grown = current
            .checked_mul(self.factor)
            .ok_or(StorageError::CapacityOverflow { requested: current })?;
        Ok(grown.max(self.min_non_zero_capacity))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DOUBLING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_sequence_from_empty() {
        let policy = GrowthPolicy::default();
        let mut cap = 0;
        let mut seen = Vec::new();
        for _ in 0..5 {
            cap = policy.next_capacity(cap).unwrap();
            seen.push(cap);
        }
        assert_eq!(seen, [1, 2, 4, 8, 16]);
    }

    #[test]
    fn custom_floor_applies_only_from_small_capacities() {
        let policy = GrowthPolicy::new(2, 4).unwrap();
        assert_eq!(policy.next_capacity(0).unwrap(), 4);
        assert_eq!(policy.next_capacity(1).unwrap(), 4);
        assert_eq!(policy.next_capacity(8).unwrap(), 16);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert!(GrowthPolicy::new(1, 1).is_none());
        assert!(GrowthPolicy::new(2, 0).is_none());
        assert!(GrowthPolicy::new(3, 1).is_some());
    }

    #[test]
    fn overflow_is_reported() {
        let result = GrowthPolicy::DOUBLING.next_capacity(usize::MAX / 2 + 1);
        assert!(matches!(result, Err(StorageError::CapacityOverflow { .. })));
    }
}
