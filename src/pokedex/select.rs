//! Selection capability used to pick one of several candidates.
//!
//! Lookups stay deterministic; randomness enters only through the
//! [`Selector`] handed to the `choose_*` helpers.

use rand::Rng;

/// Picks one position out of `len` candidates.
pub trait Selector {
    /// Returns an index in `0..len`. Only called with `len > 0`.
    fn select(&mut self, len: usize) -> usize;
}

/// Uniform selection backed by the thread-local `rand` generator.
#[derive(Debug, Default)]
pub struct RandomSelector;

impl Selector for RandomSelector {
    fn select(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Always picks the same position, clamped to the candidate count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl Selector for FixedSelector {
    fn select(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
