//! # TDA-Persistence
//!
//! Topological shape of point clouds across scales: Vietoris-Rips
//! filtrations, exact persistent homology over GF(2), and selection of the
//! features that persist long enough to be signal rather than noise.
//!
//! ## Methodology
//!
//! 1. **Distances**: pairwise metric on the point cloud
//!
//! 2. **Vietoris-Rips filtration**: every clique of the proximity graph
//!    G_ε becomes a simplex entering at its diameter, up to ε_max and a
//!    maximum simplex dimension
//!
//! 3. **Boundary matrix reduction**: the standard column algorithm yields
//!    birth/death pairs (β₀ components, β₁ loops, β₂ voids, ...)
//!
//! 4. **Feature selection**: pairs whose persistence d - b exceeds a
//!    threshold are ranked as significant
//!
//! ## Time Series
//!
//! A price (or any numeric) series is first embedded as a cloud of
//! sliding windows. Periodic motion shows up as a long-lived β₁ loop;
//! regime fragmentation shows up as long-lived β₀ components.
//!
//! ```no_run
//! use tda_persistence::{PipelineConfig, SlidingWindow, TopologyPipeline};
//!
//! # fn main() -> tda_persistence::Result<()> {
//! let prices = vec![100.0, 101.5, 99.8, 102.3, 101.1, 100.4, 103.0, 102.2];
//! let pipeline = TopologyPipeline::new(PipelineConfig::new(1.5, 2).with_threshold(0.3))?;
//! let report = pipeline.run_series(&SlidingWindow::new(3), &prices)?;
//! for f in &report.features {
//!     println!("H{} [{:.3}, {:.3})", f.dimension, f.birth, f.death);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Zomorodian & Carlsson, "Computing Persistent Homology" (2005)

pub mod cancel;
pub mod config;
pub mod embedding;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod topology;

pub use cancel::CancelToken;
pub use config::PipelineConfig;
pub use embedding::{Embedder, SlidingWindow};
pub use error::{Result, TopologyError};
pub use features::{select, FeatureSelector, TopologicalFeature};
pub use pipeline::{TopologyPipeline, TopologyReport};

// Re-exports from topology
pub use topology::{
    // Geometry
    DistanceMatrix,
    Metric,
    // Complex construction
    FilteredComplex,
    FilteredSimplex,
    Simplex,
    VietorisRips,
    // Persistence
    BoundaryReducer,
    PersistenceDiagram,
    PersistencePair,
    compute_persistence,
    // Summaries
    BettiCurve,
    BettiNumbers,
};
