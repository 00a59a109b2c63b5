//! A process-wide counter for how often [crate::genome::Genome::add_connection]
//! falls back to its "topology saturated" path: every legal edge is already
//! present, so the operator silently returns the genome unchanged rather
//! than raising an error (see the core's saturated-topology fallback).
//!
//! Kept as a thread-local counter, the same shape as
//! [crate::domain::random_provider], so [crate::genome::Population::next_generation]
//! doesn't need a saturation-tracking parameter threaded through every
//! reproduction call; a caller that wants the count per generation reads
//! and resets it once per [crate::genome::Genome::run] / `next_generation`
//! pair.

use std::cell::Cell;

thread_local! {
    static SATURATED: Cell<u32> = const { Cell::new(0) };
}

/// Records one saturated-topology fallback.
pub fn record() {
    SATURATED.with(|count| count.set(count.get() + 1));
}

/// Returns the count accumulated since the last call and resets it to zero.
pub fn take() -> u32 {
    SATURATED.with(|count| count.replace(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_resets_the_counter() {
        take();
        record();
        record();
        assert_eq!(take(), 2);
        assert_eq!(take(), 0);
    }
}
