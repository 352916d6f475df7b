//! Persistence Diagrams
//!
//! A persistence pair (b, d) represents a topological feature that is
//! "born" at filtration value b and "dies" at value d. Features that never
//! die within [0, ε_max] are essential and carry d = ∞.
//!
//! ## Interpretation
//!
//! - Long-lived features (large d-b) represent robust topological structure
//! - Short-lived features may be noise or transient phenomena
//! - The persistence diagram encodes the "topological fingerprint" of the data

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

/// A persistence pair [birth, death) in a homological dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistencePair {
    pub dimension: usize,
    pub birth: f64,
    pub death: f64,
}

impl PersistencePair {
    pub fn new(dimension: usize, birth: f64, death: f64) -> Self {
        debug_assert!(birth <= death, "birth {birth} after death {death}");
        Self { dimension, birth, death }
    }

    /// A feature that never dies
    pub fn essential(dimension: usize, birth: f64) -> Self {
        Self::new(dimension, birth, f64::INFINITY)
    }

    /// Lifetime of the feature (∞ for essential features)
    pub fn persistence(&self) -> f64 {
        if self.is_essential() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    /// Is this an essential feature (infinite persistence)?
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Descending persistence, then ascending birth, then ascending death
fn diagram_order(a: &PersistencePair, b: &PersistencePair) -> Ordering {
    b.persistence()
        .total_cmp(&a.persistence())
        .then(a.birth.total_cmp(&b.birth))
        .then(a.death.total_cmp(&b.death))
}

/// Persistence diagram: ordered pairs for each dimension
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PersistenceDiagram {
    pairs: BTreeMap<usize, Vec<PersistencePair>>,
}

impl PersistenceDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group pairs by dimension and order each group
    pub fn from_pairs(pairs: impl IntoIterator<Item = PersistencePair>) -> Self {
        let mut grouped: BTreeMap<usize, Vec<PersistencePair>> = BTreeMap::new();
        for pair in pairs {
            grouped.entry(pair.dimension).or_default().push(pair);
        }
        for group in grouped.values_mut() {
            group.sort_by(diagram_order);
        }
        Self { pairs: grouped }
    }

    /// Dimensions with at least one pair, ascending
    pub fn dimensions(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs.keys().copied()
    }

    /// Highest dimension with at least one pair
    pub fn max_dimension(&self) -> Option<usize> {
        self.pairs.keys().next_back().copied()
    }

    /// Pairs of dimension d in diagram order
    pub fn dim(&self, d: usize) -> &[PersistencePair] {
        self.pairs.get(&d).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finite pairs of dimension d
    pub fn finite(&self, d: usize) -> impl Iterator<Item = &PersistencePair> {
        self.dim(d).iter().filter(|p| !p.is_essential())
    }

    /// Essential pairs of dimension d
    pub fn essential(&self, d: usize) -> impl Iterator<Item = &PersistencePair> {
        self.dim(d).iter().filter(|p| p.is_essential())
    }

    /// All pairs, dimension by dimension
    pub fn iter(&self) -> impl Iterator<Item = &PersistencePair> {
        self.pairs.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.pairs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_persistence() {
        let p = PersistencePair::new(1, 1.0, 1.5);
        assert_eq!(p.persistence(), 0.5);
        assert!(!p.is_essential());

        let e = PersistencePair::essential(0, 0.0);
        assert!(e.is_essential());
        assert_eq!(e.persistence(), f64::INFINITY);
    }

    #[test]
    fn test_diagram_ordering() {
        let pd = PersistenceDiagram::from_pairs(vec![
            PersistencePair::new(0, 0.0, 1.0),
            PersistencePair::new(1, 1.0, 1.2),
            PersistencePair::essential(0, 0.0),
            PersistencePair::new(0, 0.0, 2.0),
            PersistencePair::new(0, 0.5, 1.5),
        ]);

        let h0: Vec<(f64, f64)> = pd.dim(0).iter().map(|p| (p.birth, p.death)).collect();
        assert_eq!(
            h0,
            vec![(0.0, f64::INFINITY), (0.0, 2.0), (0.0, 1.0), (0.5, 1.5)]
        );
        assert_eq!(pd.dim(1).len(), 1);
        assert!(pd.dim(2).is_empty());
        assert_eq!(pd.len(), 5);
        assert_eq!(pd.max_dimension(), Some(1));
        assert_eq!(pd.dimensions().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(pd.finite(0).count(), 3);
        assert_eq!(pd.essential(0).count(), 1);
    }

    #[test]
    fn test_empty_diagram() {
        let pd = PersistenceDiagram::new();
        assert!(pd.is_empty());
        assert_eq!(pd.max_dimension(), None);
        assert_eq!(pd.iter().count(), 0);
    }
}
