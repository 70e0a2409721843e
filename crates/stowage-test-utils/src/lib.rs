//! Test utilities and instrumented element types for Stowage development.
//!
//! Provides [`Tracked`] elements backed by shared [`Counters`], a
//! deterministic construction budget for injecting panics, and
//! [`assert_panics`] for checking container state after an unwind.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::panic::{self, AssertUnwindSafe};

pub use fixtures::{failing_at, with_ambient, Counters, Refused, Tracked};

/// Run `f`, asserting that it panics. Returns the panic message.
///
/// The closure is wrapped in [`AssertUnwindSafe`]: tests inspect the
/// state left behind on purpose.
pub fn assert_panics<R>(f: impl FnOnce() -> R) -> String {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected a panic"),
        Err(payload) => {
            if let Some(message) = payload.downcast_ref::<&str>() {
                (*message).to_string()
            } else if let Some(message) = payload.downcast_ref::<String>() {
                message.clone()
            } else {
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_panic_message() {
        assert_eq!(assert_panics(|| panic!("boom")), "boom");
        let index = 3;
        assert_eq!(assert_panics(|| panic!("at {index}")), "at 3");
    }

    #[test]
    #[should_panic(expected = "expected a panic")]
    fn fails_when_nothing_panics() {
        assert_panics(|| 1);
    }
}
