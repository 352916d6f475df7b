//! Exact Persistent Homology via Boundary Matrix Reduction
//!
//! Computes the persistence diagram of a filtered complex with the
//! standard algorithm over GF(2).
//!
//! ## Algorithm Overview
//!
//! 1. Sort simplices by (value, dimension, vertex tuple); this total order
//!    is the column order of the boundary matrix
//! 2. Column j holds the filtration indices of the facets of simplex j
//! 3. Reduce left to right: while low(j) equals low(i) for an earlier
//!    column i, add column i to column j (symmetric difference)
//! 4. A non-zero reduced column j pairs (low(j), j): the feature created
//!    by simplex low(j) is killed by simplex j. A zero column whose simplex
//!    is never a pivot creates an essential feature.
//!
//! low(j) is the largest row index present in column j, i.e. the
//! bottom-most non-zero entry. The fixed total order makes the pivots, and
//! therefore the whole diagram, deterministic.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::persistence::{PersistenceDiagram, PersistencePair};
use super::simplex::{FilteredComplex, Simplex};
use crate::cancel::{checkpoint, CancelToken};
use crate::error::{degenerate, Result};

/// Sparse column representation for boundary matrix
#[derive(Debug, Clone, Default)]
struct SparseColumn {
    /// Non-zero row indices
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the lowest (maximum) non-zero index
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    /// Flip one entry - addition of a single row in Z/2Z
    fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    /// XOR (symmetric difference) with another column - addition in Z/2Z
    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }
}

/// Boundary matrix reducer with optional cooperative cancellation
#[derive(Debug, Clone, Default)]
pub struct BoundaryReducer {
    cancel: Option<CancelToken>,
}

impl BoundaryReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `token` at every column boundary
    pub fn with_cancellation(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Compute the persistence diagram of `complex`.
    ///
    /// Fails with `DegenerateComplex` if the complex is not downward closed
    /// and with `Cancelled` if the token fires mid-reduction.
    pub fn reduce(&self, complex: &FilteredComplex) -> Result<PersistenceDiagram> {
        complex.check_downward_closure()?;

        let simplices = complex.filtration_order();
        let position: HashMap<&Simplex, usize> = simplices
            .iter()
            .enumerate()
            .map(|(idx, s)| (&s.simplex, idx))
            .collect();

        let m = simplices.len();
        let mut columns: Vec<SparseColumn> = Vec::with_capacity(m);
        let mut low_to_col: HashMap<usize, usize> = HashMap::new();
        let mut additions = 0usize;

        for (col_idx, simplex) in simplices.iter().enumerate() {
            checkpoint(self.cancel.as_ref())?;

            // Boundary of [v0, ..., vk] = sum of [v0, ..., v̂i, ..., vk]
            let mut column = SparseColumn::default();
            for facet in simplex.simplex.facets() {
                let row = *position.get(&facet).ok_or_else(|| {
                    degenerate(format!("face {facet} of {} is missing", simplex.simplex))
                })?;
                if row >= col_idx {
                    return Err(degenerate(format!(
                        "face {facet} does not precede {} in the filtration",
                        simplex.simplex
                    )));
                }
                column.toggle(row);
            }

            // Reduce column using previously reduced columns
            while let Some(low) = column.low() {
                match low_to_col.get(&low) {
                    Some(&pivot_col) => {
                        column.add_assign(&columns[pivot_col]);
                        additions += 1;
                    }
                    None => break,
                }
            }

            if let Some(low) = column.low() {
                low_to_col.insert(low, col_idx);
            }
            columns.push(column);
        }

        // Extract persistence pairs
        let mut pairs = Vec::with_capacity(m);
        let mut paired = vec![false; m];

        for (col_idx, column) in columns.iter().enumerate() {
            if let Some(low) = column.low() {
                let birth = simplices[low];
                let death = simplices[col_idx];
                paired[low] = true;
                paired[col_idx] = true;
                pairs.push(PersistencePair::new(birth.dimension(), birth.value, death.value));
            }
        }

        // Essential features (unpaired simplices that create homology)
        for (idx, simplex) in simplices.iter().enumerate() {
            if !paired[idx] && columns[idx].is_zero() {
                pairs.push(PersistencePair::essential(simplex.dimension(), simplex.value));
            }
        }

        debug!(
            columns = m,
            pairs = pairs.len(),
            column_additions = additions,
            "boundary matrix reduced"
        );

        Ok(PersistenceDiagram::from_pairs(pairs))
    }
}

/// Compute the persistence diagram of a filtered complex
pub fn compute_persistence(complex: &FilteredComplex) -> Result<PersistenceDiagram> {
    BoundaryReducer::new().reduce(complex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;
    use crate::topology::{DistanceMatrix, VietorisRips};
    use approx::assert_relative_eq;
    use ndarray::array;

    fn diagram(dm: ndarray::Array2<f64>, eps: f64, max_dim: usize) -> PersistenceDiagram {
        let dm = DistanceMatrix::from_matrix(dm).unwrap();
        let complex = VietorisRips::new(eps, max_dim)
            .build_from_distances(&dm, None)
            .unwrap();
        compute_persistence(&complex).unwrap()
    }

    #[test]
    fn test_two_points() {
        // Two points at distance 1
        let pd = diagram(array![[0.0, 1.0], [1.0, 0.0]], 2.0, 1);

        // H0: One interval from 0 to 1 (two components merge)
        // Plus one essential (final component)
        let finite: Vec<_> = pd.finite(0).collect();
        assert_eq!(finite.len(), 1);
        assert_relative_eq!(finite[0].birth, 0.0);
        assert_relative_eq!(finite[0].death, 1.0);
        assert_eq!(pd.essential(0).count(), 1);
        assert!(pd.dim(1).is_empty());
    }

    #[test]
    fn test_square_cycle() {
        // Square: edges 0-1, 1-2, 2-3, 3-0 of length 1
        // Diagonals 0-2, 1-3 of length sqrt(2)
        let s2 = 2.0_f64.sqrt();
        let dm = array![
            [0.0, 1.0, s2, 1.0],
            [1.0, 0.0, 1.0, s2],
            [s2, 1.0, 0.0, 1.0],
            [1.0, s2, 1.0, 0.0]
        ];

        let pd = diagram(dm, 2.0, 2);

        let h1: Vec<_> = pd.dim(1).iter().filter(|p| p.persistence() > 0.0).collect();
        assert_eq!(h1.len(), 1, "Square should have one H1 cycle");
        assert_relative_eq!(h1[0].birth, 1.0);
        assert_relative_eq!(h1[0].death, s2);
        assert_eq!(pd.essential(1).count(), 0);

        // H0: three merges at 1 and one surviving component
        assert_eq!(pd.finite(0).count(), 3);
        assert_eq!(pd.essential(0).count(), 1);
    }

    #[test]
    fn test_hollow_tetrahedron_void() {
        // Regular tetrahedron boundary: all six edges equal, capped at dim 2
        let dm = array![
            [0.0, 1.0, 1.0, 1.0],
            [1.0, 0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0, 0.0]
        ];

        let pd = diagram(dm.clone(), 1.5, 2);
        assert_eq!(pd.essential(2).count(), 1);

        // Filling the interior kills the void at the same scale
        let filled = diagram(dm, 1.5, 3);
        assert_eq!(filled.essential(2).count(), 0);
        assert_eq!(filled.dim(2).len(), 1);
        assert_relative_eq!(filled.dim(2)[0].persistence(), 0.0);
    }

    #[test]
    fn test_pair_count_matches_columns() {
        // Every simplex is either paired once or essential
        let dm = array![
            [0.0, 1.0, 2.0, 1.5],
            [1.0, 0.0, 1.2, 2.2],
            [2.0, 1.2, 0.0, 0.7],
            [1.5, 2.2, 0.7, 0.0]
        ];
        let dm = DistanceMatrix::from_matrix(dm).unwrap();
        let complex = VietorisRips::new(3.0, 3).build_from_distances(&dm, None).unwrap();
        let pd = compute_persistence(&complex).unwrap();

        let finite = pd.iter().filter(|p| !p.is_essential()).count();
        let essential = pd.iter().filter(|p| p.is_essential()).count();
        assert_eq!(2 * finite + essential, complex.len());
        // Full simplex on 4 points is contractible
        assert_eq!(essential, 1);
    }

    #[test]
    fn test_rejects_degenerate_complex() {
        let complex = FilteredComplex::from_simplices(
            vec![
                (Simplex::vertex(0), 0.0),
                (Simplex::vertex(1), 0.0),
                (Simplex::new(vec![0, 1, 2]).unwrap(), 1.0),
            ],
            2.0,
            2,
        );
        assert!(matches!(
            compute_persistence(&complex),
            Err(TopologyError::DegenerateComplex(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        let dm = DistanceMatrix::from_matrix(array![[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let complex = VietorisRips::new(2.0, 1).build_from_distances(&dm, None).unwrap();

        let token = CancelToken::new();
        let reducer = BoundaryReducer::new().with_cancellation(token.clone());
        assert!(reducer.reduce(&complex).is_ok());

        token.cancel();
        assert!(matches!(reducer.reduce(&complex), Err(TopologyError::Cancelled)));
    }
}
