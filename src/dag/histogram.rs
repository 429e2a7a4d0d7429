//! Class histograms and their entropy.
//!
//! [`Histogram`] is the plain counting variant used everywhere a
//! distribution is stored or aggregated. [`EfficientHistogram`] additionally
//! caches per-bin `c * log2(c)` contributions and their running sum, so that
//! moving a single example in or out updates entropy in O(1) via
//! `H = log2(m) - S / m`. The threshold sweep relies on this to score every
//! candidate split in amortized constant time.

use crate::core::types::ClassLabel;
use serde::{Deserialize, Serialize};

/// `c * log2(c)`, with the 0 and 1 counts contributing nothing.
#[inline]
fn xlog2(count: u32) -> f64 {
    if count < 2 {
        0.0
    } else {
        let c = count as f64;
        c * c.log2()
    }
}

/// A class-count histogram with its total mass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<u32>,
    mass: u32,
}

impl Histogram {
    /// Creates an all-zero histogram with `len` bins.
    pub fn new(len: usize) -> Self {
        Histogram { bins: vec![0; len], mass: 0 }
    }

    /// Creates a histogram from raw bin counts.
    pub fn from_counts(bins: Vec<u32>) -> Self {
        let mass = bins.iter().sum();
        Histogram { bins, mass }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when the histogram has no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Count stored in bin `label`.
    pub fn get(&self, label: ClassLabel) -> u32 {
        self.bins[label]
    }

    /// Overwrites bin `label`, keeping the mass consistent.
    pub fn set(&mut self, label: ClassLabel, value: u32) {
        self.mass = self.mass - self.bins[label] + value;
        self.bins[label] = value;
    }

    /// Adds `delta` to bin `label`.
    pub fn add(&mut self, label: ClassLabel, delta: u32) {
        self.bins[label] += delta;
        self.mass += delta;
    }

    /// Increments bin `label` by one.
    pub fn add_one(&mut self, label: ClassLabel) {
        self.bins[label] += 1;
        self.mass += 1;
    }

    /// Decrements bin `label` by one.
    pub fn sub_one(&mut self, label: ClassLabel) {
        debug_assert!(self.bins[label] > 0);
        self.bins[label] -= 1;
        self.mass -= 1;
    }

    /// Zeroes every bin.
    pub fn reset(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0);
        self.mass = 0;
    }

    /// Adds every bin of `other` into this histogram.
    pub fn accumulate(&mut self, other: &Histogram) {
        debug_assert_eq!(self.bins.len(), other.bins.len());
        for (b, o) in self.bins.iter_mut().zip(&other.bins) {
            *b += o;
        }
        self.mass += other.mass;
    }

    /// Total number of counted examples.
    pub fn mass(&self) -> u32 {
        self.mass
    }

    /// Raw bin counts.
    pub fn counts(&self) -> &[u32] {
        &self.bins
    }

    /// Shannon entropy in bits. A histogram with mass below 1 carries no
    /// information and scores 0.
    pub fn entropy(&self) -> f64 {
        if self.mass < 1 {
            return 0.0;
        }
        let m = self.mass as f64;
        let mut h = 0.0;
        for &c in &self.bins {
            if c > 0 {
                let p = c as f64 / m;
                h -= p * p.log2();
            }
        }
        h
    }

    /// `mass * entropy`, the summand of a weighted-average over slots.
    pub fn weighted_entropy(&self) -> f64 {
        if self.mass < 1 {
            return 0.0;
        }
        let m = self.mass as f64;
        m * m.log2() - self.bins.iter().map(|&c| xlog2(c)).sum::<f64>()
    }

    /// Weighted entropy of the virtual combination `self + other`, without
    /// materializing the sum.
    pub fn weighted_entropy_with(&self, other: &Histogram) -> f64 {
        debug_assert_eq!(self.bins.len(), other.bins.len());
        let mass = self.mass + other.mass;
        if mass < 1 {
            return 0.0;
        }
        let m = mass as f64;
        let s: f64 = self
            .bins
            .iter()
            .zip(&other.bins)
            .map(|(&a, &b)| xlog2(a + b))
            .sum();
        m * m.log2() - s
    }

    /// Weighted entropy of the virtual combination `self + o1 + o2`.
    pub fn weighted_entropy_with_two(&self, o1: &Histogram, o2: &Histogram) -> f64 {
        debug_assert_eq!(self.bins.len(), o1.bins.len());
        debug_assert_eq!(self.bins.len(), o2.bins.len());
        let mass = self.mass + o1.mass + o2.mass;
        if mass < 1 {
            return 0.0;
        }
        let m = mass as f64;
        let mut s = 0.0;
        for i in 0..self.bins.len() {
            s += xlog2(self.bins[i] + o1.bins[i] + o2.bins[i]);
        }
        m * m.log2() - s
    }

    /// Entropy of the virtual combination `self + other`.
    pub fn entropy_with(&self, other: &Histogram) -> f64 {
        let mass = self.mass + other.mass;
        if mass < 1 {
            return 0.0;
        }
        self.weighted_entropy_with(other) / mass as f64
    }

    /// Entropy of the virtual combination `self + o1 + o2`.
    pub fn entropy_with_two(&self, o1: &Histogram, o2: &Histogram) -> f64 {
        let mass = self.mass + o1.mass + o2.mass;
        if mass < 1 {
            return 0.0;
        }
        self.weighted_entropy_with_two(o1, o2) / mass as f64
    }

    /// Label of the fullest bin; ties resolve to the lowest label.
    pub fn argmax(&self) -> ClassLabel {
        let mut best = 0;
        let mut best_count = 0;
        for (label, &c) in self.bins.iter().enumerate() {
            if c > best_count {
                best = label;
                best_count = c;
            }
        }
        best
    }

    /// True when at most one bin is populated.
    pub fn is_pure(&self) -> bool {
        self.bins.iter().filter(|&&c| c > 0).count() <= 1
    }
}

/// Histogram with cached entropy terms for O(1) single-example moves.
///
/// Maintains `contributions[i] = bins[i] * log2(bins[i])` and their running
/// sum. `add_one`/`sub_one` recompute only the touched contribution, fully
/// deterministically, so an add followed by a sub restores the cached state
/// bit-for-bit in the bins and contributions (the sum accumulates at most
/// one rounding step per move).
#[derive(Debug, Clone)]
pub struct EfficientHistogram {
    bins: Vec<u32>,
    mass: u32,
    contributions: Vec<f64>,
    contribution_sum: f64,
}

impl EfficientHistogram {
    /// Creates an all-zero efficient histogram with `len` bins.
    pub fn new(len: usize) -> Self {
        EfficientHistogram {
            bins: vec![0; len],
            mass: 0,
            contributions: vec![0.0; len],
            contribution_sum: 0.0,
        }
    }

    /// Seeds the cached state from a plain histogram.
    pub fn from_histogram(hist: &Histogram) -> Self {
        let mut eff = EfficientHistogram::new(hist.len());
        eff.accumulate(hist);
        eff
    }

    /// Adds every bin of `hist`, refreshing the touched cache entries.
    pub fn accumulate(&mut self, hist: &Histogram) {
        debug_assert_eq!(self.bins.len(), hist.bins.len());
        for (i, &c) in hist.bins.iter().enumerate() {
            if c > 0 {
                self.bins[i] += c;
                self.refresh(i);
            }
        }
        self.mass += hist.mass;
    }

    /// Count stored in bin `label`.
    pub fn get(&self, label: ClassLabel) -> u32 {
        self.bins[label]
    }

    /// Total number of counted examples.
    pub fn mass(&self) -> u32 {
        self.mass
    }

    /// Moves one example of class `label` into the histogram.
    pub fn add_one(&mut self, label: ClassLabel) {
        self.bins[label] += 1;
        self.mass += 1;
        self.refresh(label);
    }

    /// Moves one example of class `label` out of the histogram.
    pub fn sub_one(&mut self, label: ClassLabel) {
        debug_assert!(self.bins[label] > 0);
        self.bins[label] -= 1;
        self.mass -= 1;
        self.refresh(label);
    }

    fn refresh(&mut self, label: ClassLabel) {
        let fresh = xlog2(self.bins[label]);
        self.contribution_sum += fresh - self.contributions[label];
        self.contributions[label] = fresh;
    }

    /// Shannon entropy in bits, from the cached contribution sum.
    pub fn entropy(&self) -> f64 {
        if self.mass < 1 {
            return 0.0;
        }
        let m = self.mass as f64;
        m.log2() - self.contribution_sum / m
    }

    /// `mass * entropy`, from the cached contribution sum.
    pub fn weighted_entropy(&self) -> f64 {
        if self.mass < 1 {
            return 0.0;
        }
        let m = self.mass as f64;
        m * m.log2() - self.contribution_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_histogram_has_zero_entropy() {
        let h = Histogram::new(4);
        assert_eq!(h.entropy(), 0.0);
        assert_eq!(h.weighted_entropy(), 0.0);
        assert_eq!(h.mass(), 0);
    }

    #[test]
    fn single_bin_has_zero_entropy() {
        let h = Histogram::from_counts(vec![0, 17, 0]);
        assert_relative_eq!(h.entropy(), 0.0, epsilon = 1e-12);
        assert!(h.is_pure());
    }

    #[test]
    fn two_equal_bins_have_one_bit() {
        let h = Histogram::from_counts(vec![8, 8]);
        assert_relative_eq!(h.entropy(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(h.weighted_entropy(), 16.0, epsilon = 1e-9);
        assert!(!h.is_pure());
    }

    #[test]
    fn uneven_bins_have_positive_entropy() {
        let h = Histogram::from_counts(vec![3, 1]);
        assert!(h.entropy() > 0.0);
        assert!(h.entropy() < 1.0);
    }

    #[test]
    fn set_and_add_keep_mass_consistent() {
        let mut h = Histogram::new(3);
        h.add(0, 5);
        h.add_one(2);
        h.set(0, 2);
        assert_eq!(h.counts(), &[2, 0, 1]);
        assert_eq!(h.mass(), 3);
        h.reset();
        assert_eq!(h.mass(), 0);
        assert_eq!(h.counts(), &[0, 0, 0]);
    }

    #[test]
    fn accumulate_sums_bins() {
        let mut a = Histogram::from_counts(vec![1, 2]);
        let b = Histogram::from_counts(vec![3, 4]);
        a.accumulate(&b);
        assert_eq!(a.counts(), &[4, 6]);
        assert_eq!(a.mass(), 10);
    }

    #[test]
    fn argmax_prefers_lowest_label_on_ties() {
        let h = Histogram::from_counts(vec![0, 5, 5, 2]);
        assert_eq!(h.argmax(), 1);
    }

    #[test]
    fn virtual_combination_matches_materialized_sum() {
        let a = Histogram::from_counts(vec![3, 0, 7]);
        let b = Histogram::from_counts(vec![1, 4, 2]);
        let c = Histogram::from_counts(vec![0, 0, 5]);

        let mut ab = a.clone();
        ab.accumulate(&b);
        assert_relative_eq!(
            a.weighted_entropy_with(&b),
            ab.weighted_entropy(),
            epsilon = 1e-9
        );
        assert_relative_eq!(a.entropy_with(&b), ab.entropy(), epsilon = 1e-9);

        let mut abc = ab.clone();
        abc.accumulate(&c);
        assert_relative_eq!(
            a.weighted_entropy_with_two(&b, &c),
            abc.weighted_entropy(),
            epsilon = 1e-9
        );
        assert_relative_eq!(a.entropy_with_two(&b, &c), abc.entropy(), epsilon = 1e-9);
    }

    #[test]
    fn efficient_matches_plain_entropy() {
        let h = Histogram::from_counts(vec![5, 0, 3, 12]);
        let eff = EfficientHistogram::from_histogram(&h);
        assert_relative_eq!(eff.entropy(), h.entropy(), epsilon = 1e-9);
        assert_relative_eq!(
            eff.weighted_entropy(),
            h.weighted_entropy(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn efficient_tracks_incremental_moves() {
        let mut eff = EfficientHistogram::new(3);
        let mut plain = Histogram::new(3);
        for label in [0, 1, 1, 2, 0, 1] {
            eff.add_one(label);
            plain.add_one(label);
            assert_relative_eq!(eff.entropy(), plain.entropy(), epsilon = 1e-9);
        }
        eff.sub_one(1);
        plain.sub_one(1);
        assert_relative_eq!(eff.entropy(), plain.entropy(), epsilon = 1e-9);
        assert_eq!(eff.mass(), plain.mass());
    }

    proptest! {
        #[test]
        fn add_then_sub_restores_state(
            counts in prop::collection::vec(0u32..50, 2..6),
            label in 0usize..6,
            moves in 1usize..20,
        ) {
            let label = label % counts.len();
            let base = Histogram::from_counts(counts);
            let mut eff = EfficientHistogram::from_histogram(&base);
            let before_entropy = eff.entropy();
            for _ in 0..moves {
                eff.add_one(label);
            }
            for _ in 0..moves {
                eff.sub_one(label);
            }
            prop_assert_eq!(eff.get(label), base.get(label));
            prop_assert_eq!(eff.mass(), base.mass());
            prop_assert!((eff.entropy() - before_entropy).abs() < 1e-9);
        }
    }
}
