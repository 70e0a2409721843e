//! Benchmark workloads for the Stowage containers.
//!
//! - [`filled`]: an array of `len` sequential values with exact capacity
//! - [`insert_positions`]: deterministic insertion indices via seed
//! - [`erase_positions`]: deterministic erase indices for a shrinking array

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use stowage::DynArray;

/// Build an array holding `0..len` with capacity exactly `len`.
pub fn filled(len: usize) -> DynArray<u64> {
    DynArray::from_fn(len, |i| i as u64)
}

/// Generate `n` insertion indices for an array that starts at `start_len`.
///
/// Index `i` is valid for an array of length `start_len + i`, so the whole
/// sequence can be replayed with `insert` without going out of bounds.
pub fn insert_positions(start_len: usize, n: usize, seed: u64) -> Vec<usize> {
    (0..n)
        .map(|i| {
            let bound = (start_len + i + 1) as u64;
            (mix(seed, i as u64) % bound) as usize
        })
        .collect()
}

/// Generate erase indices that drain an array of `len` elements.
///
/// Index `i` is valid for an array of length `len - i`.
pub fn erase_positions(len: usize, seed: u64) -> Vec<usize> {
    (0..len)
        .map(|i| {
            let bound = (len - i) as u64;
            (mix(seed, i as u64) % bound) as usize
        })
        .collect()
}

fn mix(seed: u64, i: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(i.wrapping_mul(1442695040888963407))
        .rotate_left(29)
}
