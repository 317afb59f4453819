//! Deterministic random number generation.
//!
//! RULE: Nothing in the synthesizer may call any platform RNG.
//! All randomness flows through ColumnRng instances derived
//! from the single master seed of the dashboard session.
//!
//! Each generated column gets its own RNG stream, seeded deterministically
//! from (master_seed XOR slot_index). This means:
//!   - Adding a new column never changes existing columns' values.
//!   - Each column is fully reproducible in isolation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A deterministic RNG for a single generated column.
pub struct ColumnRng {
    inner: Pcg64Mcg,
}

impl ColumnRng {
    /// Create a column RNG from the master seed and a stable
    /// slot index. The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a usize in [lo, hi].
    pub fn between_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        assert!(lo <= hi, "lo must be <= hi");
        lo + self.next_u64_below((hi - lo + 1) as u64) as usize
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform choice from a slice. None for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_u64_below(items.len() as u64) as usize;
        items.get(idx)
    }

    /// One uppercase ASCII letter.
    pub fn uppercase_letter(&mut self) -> char {
        (b'A' + self.next_u64_below(26) as u8) as char
    }
}

/// All column RNGs for a single session, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_column(&self, slot: ColumnSlot) -> ColumnRng {
        ColumnRng::new(self.master_seed, slot as u64)
    }
}

/// Stable column slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every column's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum ColumnSlot {
    ActivityLabel = 0,
    Status = 1,
    CustomerId = 2,
    KeyEvent = 3,
    // Add new columns here — append only.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7).for_column(ColumnSlot::Status);
        let mut b = RngBank::new(7).for_column(ColumnSlot::Status);
        for _ in 0..32 {
            assert_eq!(a.next_u64_below(1000), b.next_u64_below(1000));
        }
    }

    #[test]
    fn slots_are_independent_streams() {
        let bank = RngBank::new(7);
        let mut status = bank.for_column(ColumnSlot::Status);
        let mut label = bank.for_column(ColumnSlot::ActivityLabel);
        let a: Vec<u64> = (0..16).map(|_| status.next_u64_below(1 << 40)).collect();
        let b: Vec<u64> = (0..16).map(|_| label.next_u64_below(1 << 40)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn between_inclusive_stays_in_bounds() {
        let mut rng = RngBank::new(99).for_column(ColumnSlot::ActivityLabel);
        for _ in 0..500 {
            let n = rng.between_inclusive(7, 10);
            assert!((7..=10).contains(&n), "out of range: {n}");
        }
    }

    #[test]
    fn pick_on_empty_slice_is_none() {
        let mut rng = RngBank::new(1).for_column(ColumnSlot::CustomerId);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }
}
