//! Untyped slot storage and growth policy for Stowage containers.
//!
//! This is the leaf crate with zero internal dependencies. It owns the
//! lowest layer of the container stack: a block of uninitialised slots
//! with no knowledge of which slots hold live values.
//!
//! # Layering
//!
//! ```text
//! DynArray<T>            (stowage: element lifecycle, growth, insert/erase)
//! └── RawStorage<T>      (this crate: allocate / address / release)
//!     └── std::alloc     (acquire / release primitive)
//! ```
//!
//! All `unsafe` in this crate lives in [`raw`]. Everything else is safe.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod raw;

pub use config::GrowthPolicy;
pub use error::StorageError;
pub use raw::RawStorage;
