//! Topology Pipeline
//!
//! ```text
//! points ─▶ DistanceMatrix ─▶ VietorisRips ─▶ BoundaryReducer
//!                                                   │
//!        features ◀─ FeatureSelector ◀─ PersistenceDiagram
//! ```
//!
//! Each stage owns its output and hands it forward; the first error stops
//! the run and is returned unchanged.

use ndarray::Array2;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::features::{FeatureSelector, TopologicalFeature};
use crate::topology::{
    points_to_array, BoundaryReducer, DistanceMatrix, PersistenceDiagram, VietorisRips,
};

/// Everything one analysis produces
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub n_points: usize,
    /// Simplex counts indexed by dimension
    pub simplex_counts: Vec<usize>,
    pub diagram: PersistenceDiagram,
    /// Significant features, ranked
    pub features: Vec<TopologicalFeature>,
}

#[derive(Debug, Clone)]
pub struct TopologyPipeline {
    config: PipelineConfig,
    cancel: Option<CancelToken>,
}

impl TopologyPipeline {
    /// Validate `config` and build a pipeline
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, cancel: None })
    }

    /// Honour `token` during clique expansion and reduction
    pub fn with_cancellation(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ranked significant features of a point cloud
    pub fn run(&self, points: &[Vec<f64>]) -> Result<Vec<TopologicalFeature>> {
        Ok(self.analyze(points)?.features)
    }

    /// Full analysis of a point cloud
    pub fn analyze(&self, points: &[Vec<f64>]) -> Result<TopologyReport> {
        let array = points_to_array(points)?;
        self.analyze_array(&array)
    }

    /// Full analysis of the rows of an N×d array
    pub fn analyze_array(&self, points: &Array2<f64>) -> Result<TopologyReport> {
        let distances = DistanceMatrix::compute(points, self.config.metric, self.config.parallel)?;
        self.analyze_distances(&distances)
    }

    /// Full analysis from precomputed distances
    pub fn analyze_distances(&self, distances: &DistanceMatrix) -> Result<TopologyReport> {
        let n_points = distances.n_points();
        let _span = info_span!(
            "topology_pipeline",
            n_points,
            epsilon_max = self.config.epsilon_max,
            max_dimension = self.config.max_dimension
        )
        .entered();

        let complex = VietorisRips::new(self.config.epsilon_max, self.config.max_dimension)
            .with_max_simplices(self.config.max_simplices)
            .with_parallel(self.config.parallel)
            .build_from_distances(distances, self.cancel.as_ref())?;
        let simplex_counts = complex.count_by_dimension();
        debug!(simplices = complex.len(), ?simplex_counts, "complex built");

        let mut reducer = BoundaryReducer::new();
        if let Some(token) = &self.cancel {
            reducer = reducer.with_cancellation(token.clone());
        }
        let diagram = reducer.reduce(&complex)?;
        drop(complex);

        let features = FeatureSelector::new(self.config.threshold)?
            .with_include_unbounded(self.config.include_unbounded)
            .select(&diagram);
        info!(
            pairs = diagram.len(),
            significant = features.len(),
            "persistence computed"
        );

        Ok(TopologyReport {
            n_points,
            simplex_counts,
            diagram,
            features,
        })
    }

    /// Embed a series, then analyse the resulting cloud
    pub fn run_series<E: Embedder + ?Sized>(
        &self,
        embedder: &E,
        series: &[f64],
    ) -> Result<TopologyReport> {
        let points = embedder.embed(series)?;
        debug!(samples = series.len(), points = points.len(), "series embedded");
        self.analyze(&points)
    }
}
