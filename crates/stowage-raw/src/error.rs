//! Storage-level error types.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// Errors that can occur while acquiring slot storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The requested slot count cannot be expressed as a valid allocation
    /// size (byte size exceeds `isize::MAX` or growth arithmetic overflowed).
    CapacityOverflow {
        /// Number of slots requested.
        requested: usize,
    },
    /// The allocator could not satisfy the request.
    AllocationFailed {
        /// Number of bytes requested.
        requested_bytes: usize,
        /// Alignment of the request in bytes.
        align: usize,
    },
}

impl StorageError {
    pub(crate) fn allocation_failed(layout: Layout) -> Self {
        Self::AllocationFailed {
            requested_bytes: layout.size(),
            align: layout.align(),
        }
    }

    /// The layout of the failed request, if this was an allocator failure.
    ///
    /// Infallible wrappers hand this to [`std::alloc::handle_alloc_error`].
    pub fn layout(&self) -> Option<Layout> {
        match self {
            Self::AllocationFailed {
                requested_bytes,
                align,
            } => Layout::from_size_align(*requested_bytes, *align).ok(),
            Self::CapacityOverflow { .. } => None,
        }
    }

    /// Abort the current operation the way the standard collections do:
    /// `handle_alloc_error` for allocator failures, a panic for overflow.
    pub fn raise(self) -> ! {
        match self.layout() {
            Some(layout) => std::alloc::handle_alloc_error(layout),
            None => panic!("{self}"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots requested")
            }
            Self::AllocationFailed {
                requested_bytes,
                align,
            } => {
                write!(
                    f,
                    "allocation failed: requested {requested_bytes} bytes with alignment {align}"
                )
            }
        }
    }
}

impl Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_carries_layout() {
        let layout = Layout::array::<u64>(16).unwrap();
        let err = StorageError::allocation_failed(layout);
        assert_eq!(err.layout(), Some(layout));
    }

    #[test]
    fn overflow_has_no_layout() {
        let err = StorageError::CapacityOverflow { requested: usize::MAX };
        assert_eq!(err.layout(), None);
    }

    #[test]
    fn display_mentions_sizes() {
        let err = StorageError::AllocationFailed {
            requested_bytes: 128,
            align: 8,
        };
        assert_eq!(
            err.to_string(),
            "allocation failed: requested 128 bytes with alignment 8"
        );
        let err = StorageError::CapacityOverflow { requested: 7 };
        assert_eq!(err.to_string(), "capacity overflow: 7 slots requested");
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn raise_panics_on_overflow() {
        StorageError::CapacityOverflow { requested: 1 }.raise();
    }
}
