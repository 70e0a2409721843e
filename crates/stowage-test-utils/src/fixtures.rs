//! Instrumented element fixtures.
//!
//! - [`Counters`]: shared construction / clone / drop tallies plus an
//!   optional construction budget that panics once exhausted.
//! - [`Tracked`]: an element that reports every clone, default
//!   construction, and drop to its [`Counters`].
//! - [`failing_at`]: wraps an element factory so it fails
//!   deterministically at a given index.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Sentinel for "no construction budget".
const UNLIMITED: usize = usize::MAX;

/// Shared tallies for [`Tracked`] elements.
#[derive(Debug)]
pub struct Counters {
    constructed: AtomicUsize,
    clones: AtomicUsize,
    drops: AtomicUsize,
    budget: AtomicUsize,
}

impl Counters {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            constructed: AtomicUsize::new(0),
            clones: AtomicUsize::new(0),
            drops: AtomicUsize::new(0),
            budget: AtomicUsize::new(UNLIMITED),
        })
    }

    /// Total elements constructed by any means (new, default, clone).
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Number of `clone` calls that succeeded.
    pub fn clones(&self) -> usize {
        self.clones.load(Ordering::SeqCst)
    }

    /// Number of elements dropped.
    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    /// Elements constructed and not yet dropped.
    pub fn live(&self) -> usize {
        self.constructed() - self.drops()
    }

    /// Allow `n` more clone/default constructions, then panic on the next.
    pub fn fail_after(&self, n: usize) {
        self.budget.store(n, Ordering::SeqCst);
    }

    /// Remove the construction budget.
    pub fn disarm(&self) {
        self.budget.store(UNLIMITED, Ordering::SeqCst);
    }

    fn spend(&self) {
        let left = self.budget.load(Ordering::SeqCst);
        if left == 0 {
            panic!("construction budget exhausted");
        }
        if left != UNLIMITED {
            self.budget.store(left - 1, Ordering::SeqCst);
        }
    }
}

thread_local! {
    static AMBIENT: RefCell<Option<Arc<Counters>>> = const { RefCell::new(None) };
}

/// Run `f` with `counters` as the target of [`Tracked::default`].
///
/// The previous ambient counters are restored even if `f` panics.
pub fn with_ambient<R>(counters: &Arc<Counters>, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<Arc<Counters>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            AMBIENT.with(|slot| *slot.borrow_mut() = self.0.take());
        }
    }

    let previous = AMBIENT.with(|slot| slot.replace(Some(Arc::clone(counters))));
    let _restore = Restore(previous);
    f()
}

/// An element that reports its lifecycle to shared [`Counters`].
pub struct Tracked {
    value: i32,
    counters: Arc<Counters>,
}

impl Tracked {
    /// Construct directly. Does not spend the construction budget.
    pub fn new(value: i32, counters: &Arc<Counters>) -> Self {
        counters.constructed.fetch_add(1, Ordering::SeqCst);
        Self {
            value,
            counters: Arc::clone(counters),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.counters.spend();
        self.counters.clones.fetch_add(1, Ordering::SeqCst);
        Self::new(self.value, &self.counters)
    }
}

impl Default for Tracked {
    /// Value 0, reported to the counters installed by [`with_ambient`].
    ///
    /// # Panics
    ///
    /// Panics outside [`with_ambient`], or when the budget is exhausted.
    fn default() -> Self {
        let counters = AMBIENT
            .with(|slot| slot.borrow().clone())
            .expect("Tracked::default called outside with_ambient");
        counters.spend();
        Self::new(0, &counters)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<i32> for Tracked {
    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// Error returned by factories wrapped with [`failing_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Refused {
    pub index: usize,
}

impl fmt::Display for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "construction refused at index {}", self.index)
    }
}

impl std::error::Error for Refused {}

/// Wrap `make` so it returns `Err(Refused)` for index `fail_index`.
pub fn failing_at<T, F>(fail_index: usize, mut make: F) -> impl FnMut(usize) -> Result<T, Refused>
where
    F: FnMut(usize) -> T,
{
    move |index| {
        if index == fail_index {
            Err(Refused { index })
        } else {
            Ok(make(index))
        }
    }
}
