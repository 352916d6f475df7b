//! Pairwise Distance Matrix
//!
//! The only geometric input the Vietoris-Rips construction needs is the
//! matrix D with D[i, j] = d(xᵢ, xⱼ). It is computed once per analysis on
//! the upper triangle and mirrored, so it is symmetric by construction and
//! has an exact zero diagonal.

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input, Result};

/// Tolerance used when validating a caller-supplied matrix for symmetry.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Point metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// L2 norm of the difference
    #[default]
    Euclidean,
    /// L1 norm of the difference
    Manhattan,
    /// L∞ norm of the difference
    Chebyshev,
}

impl Metric {
    /// Distance between two points of equal length
    pub fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        match self {
            Metric::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Metric::Manhattan => diffs.sum(),
            Metric::Chebyshev => diffs.fold(0.0, f64::max),
        }
    }
}

/// Symmetric N×N distance matrix with zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
}

impl DistanceMatrix {
    /// Compute distances for a list of points.
    ///
    /// Fails with `InvalidInput` when the list is empty, when points have
    /// different lengths, or when a coordinate is not finite.
    pub fn from_points(points: &[Vec<f64>], metric: Metric) -> Result<Self> {
        let array = points_to_array(points)?;
        Self::compute(&array, metric, false)
    }

    /// Compute distances for the rows of `points`.
    ///
    /// With `parallel` the upper-triangle rows are partitioned across the
    /// rayon pool; the result is identical to the sequential computation.
    pub fn compute(points: &Array2<f64>, metric: Metric, parallel: bool) -> Result<Self> {
        let n = points.nrows();
        if n < 1 {
            return Err(invalid_input("point cloud is empty"));
        }
        if let Some(bad) = points.iter().find(|v| !v.is_finite()) {
            return Err(invalid_input(format!("non-finite coordinate {bad}")));
        }

        let row = |i: usize| -> Vec<f64> {
            (i + 1..n)
                .map(|j| metric.distance(points.row(i), points.row(j)))
                .collect()
        };

        let upper: Vec<Vec<f64>> = if parallel {
            (0..n).into_par_iter().map(row).collect()
        } else {
            (0..n).map(row).collect()
        };

        let mut values = Array2::<f64>::zeros((n, n));
        for (i, tail) in upper.into_iter().enumerate() {
            for (offset, d) in tail.into_iter().enumerate() {
                let j = i + 1 + offset;
                // Finite coordinates can still overflow the metric
                if !d.is_finite() {
                    return Err(invalid_input(format!(
                        "distance between points {i} and {j} overflows to {d}"
                    )));
                }
                values[[i, j]] = d;
                values[[j, i]] = d;
            }
        }

        Ok(Self { values })
    }

    /// Accept a precomputed matrix after validating it.
    ///
    /// The matrix must be square, non-empty, finite, non-negative, have a
    /// zero diagonal and be symmetric up to a small tolerance. The upper
    /// triangle is mirrored so the stored matrix is exactly symmetric.
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows < 1 {
            return Err(invalid_input("distance matrix is empty"));
        }
        if rows != cols {
            return Err(invalid_input(format!(
                "distance matrix must be square, got {rows}x{cols}"
            )));
        }

        let mut values = matrix;
        for i in 0..rows {
            if values[[i, i]] != 0.0 {
                return Err(invalid_input(format!("non-zero diagonal at {i}")));
            }
            for j in i + 1..rows {
                let (upper, lower) = (values[[i, j]], values[[j, i]]);
                if !upper.is_finite() || upper < 0.0 {
                    return Err(invalid_input(format!(
                        "invalid distance {upper} at ({i}, {j})"
                    )));
                }
                if (upper - lower).abs() > SYMMETRY_TOLERANCE {
                    return Err(invalid_input(format!(
                        "asymmetric distances at ({i}, {j}): {upper} vs {lower}"
                    )));
                }
                values[[j, i]] = upper;
            }
        }

        Ok(Self { values })
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }
}

/// Pack a list of points into an N×d array, checking shared dimensionality.
pub fn points_to_array(points: &[Vec<f64>]) -> Result<Array2<f64>> {
    let first = points
        .first()
        .ok_or_else(|| invalid_input("point cloud is empty"))?;
    let dim = first.len();

    let mut flat = Vec::with_capacity(points.len() * dim);
    for (idx, p) in points.iter().enumerate() {
        if p.len() != dim {
            return Err(invalid_input(format!(
                "point {idx} has dimension {}, expected {dim}",
                p.len()
            )));
        }
        flat.extend_from_slice(p);
    }

    Array2::from_shape_vec((points.len(), dim), flat)
        .map_err(|e| invalid_input(format!("cannot shape point cloud: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_euclidean_triangle() {
        let points = vec![vec![0.0, 0.0], vec![3.0, 0.0], vec![0.0, 4.0]];
        let dm = DistanceMatrix::from_points(&points, Metric::Euclidean).unwrap();

        assert_eq!(dm.n_points(), 3);
        assert_relative_eq!(dm.get(0, 1), 3.0);
        assert_relative_eq!(dm.get(0, 2), 4.0);
        assert_relative_eq!(dm.get(1, 2), 5.0);
        for i in 0..3 {
            assert_eq!(dm.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(dm.get(i, j), dm.get(j, i));
            }
        }
    }

    #[test]
    fn test_other_metrics() {
        let points = array![[0.0, 0.0], [3.0, -4.0]];
        let l1 = DistanceMatrix::compute(&points, Metric::Manhattan, false).unwrap();
        let linf = DistanceMatrix::compute(&points, Metric::Chebyshev, false).unwrap();
        assert_relative_eq!(l1.get(0, 1), 7.0);
        assert_relative_eq!(linf.get(1, 0), 4.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let points = Array2::from_shape_fn((17, 3), |(i, d)| ((i * 7 + d * 3) % 11) as f64 * 0.37);
        let seq = DistanceMatrix::compute(&points, Metric::Euclidean, false).unwrap();
        let par = DistanceMatrix::compute(&points, Metric::Euclidean, true).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_single_point() {
        let dm = DistanceMatrix::from_points(&[vec![1.0, 2.0]], Metric::Euclidean).unwrap();
        assert_eq!(dm.n_points(), 1);
        assert_eq!(dm.get(0, 0), 0.0);
    }

    #[test]
    fn test_rejects_bad_points() {
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(
            DistanceMatrix::from_points(&empty, Metric::Euclidean),
            Err(TopologyError::InvalidInput(_))
        ));

        let ragged = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            DistanceMatrix::from_points(&ragged, Metric::Euclidean),
            Err(TopologyError::InvalidInput(_))
        ));

        let nan = vec![vec![0.0, f64::NAN]];
        assert!(matches!(
            DistanceMatrix::from_points(&nan, Metric::Euclidean),
            Err(TopologyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_overflowing_distances() {
        // Coordinates are finite but their squared difference is not
        let huge = vec![vec![0.0, 0.0], vec![1e308, 1e308]];
        for metric in [Metric::Euclidean, Metric::Manhattan] {
            assert!(matches!(
                DistanceMatrix::from_points(&huge, metric),
                Err(TopologyError::InvalidInput(_))
            ));
        }

        let opposite = array![[-1e308, 0.0], [1e308, 0.0]];
        assert!(matches!(
            DistanceMatrix::compute(&opposite, Metric::Chebyshev, true),
            Err(TopologyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_matrix_validation() {
        let ok = array![[0.0, 1.0], [1.0, 0.0]];
        assert!(DistanceMatrix::from_matrix(ok).is_ok());

        let asymmetric = array![[0.0, 1.0], [2.0, 0.0]];
        assert!(DistanceMatrix::from_matrix(asymmetric).is_err());

        let diagonal = array![[1.0, 1.0], [1.0, 0.0]];
        assert!(DistanceMatrix::from_matrix(diagonal).is_err());

        let negative = array![[0.0, -1.0], [-1.0, 0.0]];
        assert!(DistanceMatrix::from_matrix(negative).is_err());

        let rect = Array2::<f64>::zeros((2, 3));
        assert!(DistanceMatrix::from_matrix(rect).is_err());
    }
}
