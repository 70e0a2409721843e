//! A growable contiguous array with strong failure guarantees.
//!
//! [`DynArray`] keeps two concerns apart:
//!
//! ```text
//! DynArray<T>
//! ├── RawStorage<T>  (stowage-raw: an untyped block of `capacity` slots)
//! └── len            (slots [0, len) are live, the rest uninitialised)
//! ```
//!
//! The raw layer only allocates, addresses, and releases. `DynArray`
//! constructs, relocates, and drops elements inside the block.
//!
//! # Failure guarantees
//!
//! - Operations that build a fresh block (sized construction, `clone`,
//!   reallocating `clone_from`, `reserve`, reallocating insert/append)
//!   either succeed completely or leave the array exactly as it was.
//! - A failing or panicking element constructor never leaves a duplicate
//!   or leaked element behind.
//! - Allocation failure is reported by every `try_*` operation as a
//!   [`StorageError`]; the plain variants abort like the standard
//!   collections do.
//!
//! # Example
//!
//! ```
//! use stowage::DynArray;
//!
//! let mut array = DynArray::<i32>::with_len(3);
//! array.emplace_back_with(|| 5);
//! array.insert(1, 9);
//! array.erase(2);
//! assert_eq!(array, [0, 9, 0, 5]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod error;
pub mod growth;
pub mod insert;
pub mod iter;
mod traits;

// Public re-exports for the primary API surface.
pub use array::DynArray;
pub use error::ConstructError;
pub use iter::IntoIter;
pub use stowage_raw::{GrowthPolicy, RawStorage, StorageError};
