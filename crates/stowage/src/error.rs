//! Errors from constructing operations.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

use stowage_raw::StorageError;

/// Failure of an operation that both acquires storage and constructs an
/// element.
///
/// Returned by the `try_*` constructing operations on
/// [`DynArray`](crate::DynArray). In every case the array is left exactly
/// as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructError<E> {
    /// Storage for the new element could not be acquired.
    Storage(StorageError),
    /// The element constructor returned an error.
    Element(E),
}

impl<E> ConstructError<E> {
    /// The element error, if the constructor failed.
    pub fn into_element(self) -> Option<E> {
        match self {
            Self::Element(err) => Some(err),
            Self::Storage(_) => None,
        }
    }
}

impl ConstructError<Infallible> {
    /// The storage error; an infallible constructor cannot fail otherwise.
    pub fn into_storage(self) -> StorageError {
        match self {
            Self::Storage(err) => err,
            Self::Element(never) => match never {},
        }
    }

    /// Abort as the standard collections do on allocation failure.
    pub fn raise(self) -> ! {
        self.into_storage().raise()
    }
}

impl<E> From<StorageError> for ConstructError<E> {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl<E: fmt::Display> fmt::Display for ConstructError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage: {err}"),
            Self::Element(err) => write!(f, "element construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for ConstructError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Element(err) => Some(err),
        }
    }
}
