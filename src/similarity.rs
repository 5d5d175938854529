//! Similarity metrics for binary encodings.
//!
//! Used by top-down reconstruction to find the bucket whose encoding best
//! matches an observed bit pattern, and handy for comparing two encoded
//! dates directly.

use crate::vector::Vector;

/// Available similarity metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Number of bits active in both vectors
    Overlap,
    /// Fraction of positions where the vectors agree
    Hamming,
    /// Shared active bits over the union of active bits
    Jaccard,
}

/// Similarity computation for binary vectors.
pub struct Similarity;

impl Similarity {
    /// Compute similarity using the specified metric.
    pub fn compute(a: &[u8], b: &[u8], metric: Metric) -> f64 {
        match metric {
            Metric::Overlap => Self::overlap(a, b) as f64,
            Metric::Hamming => Self::hamming(a, b),
            Metric::Jaccard => Self::jaccard(a, b),
        }
    }

    /// Count of positions active in both slices.
    ///
    /// This is the dot product of two binary vectors.
    pub fn overlap(a: &[u8], b: &[u8]) -> usize {
        assert_eq!(a.len(), b.len(), "Dimension mismatch in overlap");

        a.iter()
            .zip(b.iter())
            .filter(|(&x, &y)| x != 0 && y != 0)
            .count()
    }

    /// Hamming similarity: fraction of positions that agree.
    pub fn hamming(a: &[u8], b: &[u8]) -> f64 {
        assert_eq!(a.len(), b.len(), "Dimension mismatch in hamming");

        if a.is_empty() {
            return 1.0;
        }

        let matching = a
            .iter()
            .zip(b.iter())
            .filter(|(&x, &y)| (x != 0) == (y != 0))
            .count();

        matching as f64 / a.len() as f64
    }

    /// Jaccard similarity: |a ∧ b| / |a ∨ b|.
    pub fn jaccard(a: &[u8], b: &[u8]) -> f64 {
        assert_eq!(a.len(), b.len(), "Dimension mismatch in jaccard");

        let mut shared = 0;
        let mut union = 0;

        for (&x, &y) in a.iter().zip(b.iter()) {
            if x != 0 || y != 0 {
                union += 1;
                if x != 0 && y != 0 {
                    shared += 1;
                }
            }
        }

        if union == 0 {
            return 0.0;
        }

        shared as f64 / union as f64
    }

    /// Similarity between two full vectors.
    pub fn vectors(a: &Vector, b: &Vector, metric: Metric) -> f64 {
        Self::compute(a.data(), b.data(), metric)
    }
}
