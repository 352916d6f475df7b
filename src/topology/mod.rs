//! Topology Module: Vietoris-Rips Filtrations and Persistent Homology
//!
//! Implements the mathematical structures for topological data analysis:
//! - Pairwise distance matrices
//! - Vietoris-Rips filtration by clique expansion
//! - Exact persistent homology over GF(2) via boundary matrix reduction
//! - Betti numbers and entropy read off the persistence diagram
//!
//! ## Mathematical Background
//!
//! For a point cloud X we construct a filtration of simplicial complexes
//! VR_ε(X) indexed by the scale parameter ε ∈ [0, ε_max]. The persistent
//! homology tracks the birth and death of topological features (connected
//! components, loops, voids) across this filtration.

mod distance;
mod simplex;
mod vietoris_rips;
mod persistence;
mod reduction;
mod summary;

pub use distance::{DistanceMatrix, Metric, points_to_array};
pub use simplex::{FilteredComplex, FilteredSimplex, Simplex};
pub use vietoris_rips::{VietorisRips, DEFAULT_MAX_SIMPLICES};
pub use persistence::{PersistenceDiagram, PersistencePair};
pub use reduction::{BoundaryReducer, compute_persistence};
pub use summary::{BettiCurve, BettiNumbers};
