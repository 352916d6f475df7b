//! Vietoris-Rips Complex Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Equivalently, VR_ε(X) is the clique complex of the proximity graph
//! G_ε whose edges join points at distance ≤ ε. Each simplex enters the
//! filtration at its diameter (largest pairwise distance), so faces can
//! never enter after their cofaces.
//!
//! ## Clique Expansion
//!
//! k-simplices are grown from accepted (k-1)-simplices by appending a
//! vertex adjacent to every vertex already present. Only vertices beyond
//! the current largest index are tried, which produces each clique from
//! exactly one source; the canonical-form index of the complex still
//! rejects duplicates when candidate batches are merged.

use rayon::prelude::*;
use tracing::{debug, warn};

use super::distance::{DistanceMatrix, Metric};
use super::simplex::{FilteredComplex, Simplex};
use crate::cancel::{checkpoint, CancelToken};
use crate::error::{invalid_config, Result, TopologyError};

/// Default cap on the total number of simplices
pub const DEFAULT_MAX_SIMPLICES: usize = 250_000;

/// Frontier simplices extended per rayon worker between cap checks
const PARALLEL_SOURCES_PER_THREAD: usize = 16;

/// Vietoris-Rips filtration builder
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Maximum filtration value
    epsilon_max: f64,
    /// Largest simplex dimension to enumerate
    max_dimension: usize,
    /// Hard cap on the total simplex count
    max_simplices: usize,
    /// Generate extension candidates on the rayon pool
    parallel: bool,
}

/// Proximity graph G_ε as sorted adjacency lists
struct ProximityGraph<'a> {
    distances: &'a DistanceMatrix,
    epsilon: f64,
    neighbors: Vec<Vec<usize>>,
}

impl<'a> ProximityGraph<'a> {
    fn new(distances: &'a DistanceMatrix, epsilon: f64) -> Self {
        let n = distances.n_points();
        let neighbors = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i && distances.get(i, j) <= epsilon)
                    .collect()
            })
            .collect();
        Self { distances, epsilon, neighbors }
    }

    #[inline]
    fn adjacent(&self, i: usize, j: usize) -> bool {
        i != j && self.distances.get(i, j) <= self.epsilon
    }

    /// All cofaces of `simplex` obtained by appending a larger vertex,
    /// with their filtration values
    fn extensions(&self, simplex: &Simplex, value: f64) -> Vec<(Simplex, f64)> {
        let vertices = simplex.vertices();
        let last = match vertices.last() {
            Some(&v) => v,
            None => return Vec::new(),
        };

        self.neighbors[last]
            .iter()
            .copied()
            .filter(|&v| v > last)
            .filter(|&v| vertices.iter().all(|&u| self.adjacent(u, v)))
            .map(|v| {
                let diameter = vertices
                    .iter()
                    .map(|&u| self.distances.get(u, v))
                    .fold(value, f64::max);
                (simplex.extended(v), diameter)
            })
            .collect()
    }
}

impl VietorisRips {
    pub fn new(epsilon_max: f64, max_dimension: usize) -> Self {
        Self {
            epsilon_max,
            max_dimension,
            max_simplices: DEFAULT_MAX_SIMPLICES,
            parallel: false,
        }
    }

    pub fn with_max_simplices(mut self, max_simplices: usize) -> Self {
        self.max_simplices = max_simplices;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn epsilon_max(&self) -> f64 {
        self.epsilon_max
    }

    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    /// Build the filtered complex of a point cloud under the Euclidean metric
    pub fn build(&self, points: &[Vec<f64>]) -> Result<FilteredComplex> {
        let distances = DistanceMatrix::from_points(points, Metric::Euclidean)?;
        self.build_from_distances(&distances, None)
    }

    /// Build the filtered complex from precomputed distances
    pub fn build_from_distances(
        &self,
        distances: &DistanceMatrix,
        cancel: Option<&CancelToken>,
    ) -> Result<FilteredComplex> {
        self.validate()?;

        let n = distances.n_points();
        let mut complex = FilteredComplex::with_bounds(self.epsilon_max, self.max_dimension);

        // 0-simplices (vertices) - all born at time 0
        self.admit(n)?;
        for i in 0..n {
            complex.insert(Simplex::vertex(i), 0.0);
        }
        if self.max_dimension == 0 {
            debug!(simplices = complex.len(), "vertices only");
            return Ok(complex);
        }

        let graph = ProximityGraph::new(distances, self.epsilon_max);

        // 1-simplices (edges) - born at their length
        let mut frontier: Vec<(Simplex, f64)> = Vec::new();
        for i in 0..n {
            checkpoint(cancel)?;
            for &j in graph.neighbors[i].iter().filter(|&&j| j > i) {
                let edge = Simplex::edge(i, j);
                let d = distances.get(i, j);
                if complex.insert(edge.clone(), d) {
                    self.admit(complex.len())?;
                    frontier.push((edge, d));
                }
            }
        }
        debug!(edges = frontier.len(), epsilon = self.epsilon_max, "proximity graph");

        // k-simplices by clique expansion
        for k in 2..=self.max_dimension {
            checkpoint(cancel)?;
            if frontier.is_empty() {
                break;
            }

            let mut next = Vec::new();
            if self.parallel {
                // Bounded batches keep at most chunk × N candidates alive
                // before the cap is checked again
                let chunk = rayon::current_num_threads().max(1) * PARALLEL_SOURCES_PER_THREAD;
                for sources in frontier.chunks(chunk) {
                    checkpoint(cancel)?;
                    let batches: Vec<Vec<(Simplex, f64)>> = sources
                        .par_iter()
                        .map(|(s, v)| graph.extensions(s, *v))
                        .collect();
                    for (simplex, value) in batches.into_iter().flatten() {
                        if complex.insert(simplex.clone(), value) {
                            self.admit(complex.len())?;
                            next.push((simplex, value));
                        }
                    }
                }
            } else {
                for (source, source_value) in &frontier {
                    checkpoint(cancel)?;
                    for (simplex, value) in graph.extensions(source, *source_value) {
                        if complex.insert(simplex.clone(), value) {
                            self.admit(complex.len())?;
                            next.push((simplex, value));
                        }
                    }
                }
            }

            debug!(dimension = k, simplices = next.len(), "clique expansion");
            frontier = next;
        }

        Ok(complex)
    }

    fn validate(&self) -> Result<()> {
        if !(self.epsilon_max > 0.0) {
            return Err(invalid_config(format!(
                "epsilon_max must be > 0, got {}",
                self.epsilon_max
            )));
        }
        if self.max_simplices == 0 {
            return Err(invalid_config("max_simplices must be at least 1"));
        }
        Ok(())
    }

    /// Fail once the running simplex count passes the cap
    fn admit(&self, count: usize) -> Result<()> {
        if count > self.max_simplices {
            warn!(
                count,
                cap = self.max_simplices,
                epsilon_max = self.epsilon_max,
                max_dimension = self.max_dimension,
                "simplex cap exceeded"
            );
            return Err(TopologyError::ComplexTooLarge {
                count,
                cap: self.max_simplices,
            });
        }
        Ok(())
    }
}
