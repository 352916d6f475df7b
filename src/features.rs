//! Significant Feature Selection
//!
//! A feature is significant when its persistence exceeds a threshold:
//! short bars sit near the diagonal of the diagram and are treated as
//! noise. Essential features (death = ∞) always clear a finite threshold
//! unless the caller excludes unbounded features.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{invalid_config, Result};
use crate::topology::{PersistenceDiagram, PersistencePair};

/// A persistence pair above the selection threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopologicalFeature {
    pub dimension: usize,
    pub birth: f64,
    pub death: f64,
    pub persistence: f64,
}

impl TopologicalFeature {
    pub fn is_unbounded(&self) -> bool {
        self.death.is_infinite()
    }
}

impl From<&PersistencePair> for TopologicalFeature {
    fn from(pair: &PersistencePair) -> Self {
        Self {
            dimension: pair.dimension,
            birth: pair.birth,
            death: pair.death,
            persistence: pair.persistence(),
        }
    }
}

/// Descending persistence, then dimension, then birth, then death
fn feature_order(a: &TopologicalFeature, b: &TopologicalFeature) -> Ordering {
    b.persistence
        .total_cmp(&a.persistence)
        .then(a.dimension.cmp(&b.dimension))
        .then(a.birth.total_cmp(&b.birth))
        .then(a.death.total_cmp(&b.death))
}

/// Threshold filter over a persistence diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSelector {
    threshold: f64,
    include_unbounded: bool,
}

impl FeatureSelector {
    /// Keep features with persistence strictly above `threshold` (≥ 0)
    pub fn new(threshold: f64) -> Result<Self> {
        if !(threshold >= 0.0) {
            return Err(invalid_config(format!(
                "threshold must be >= 0, got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            include_unbounded: true,
        })
    }

    /// Whether essential (∞-death) features are reported
    pub fn with_include_unbounded(mut self, include: bool) -> Self {
        self.include_unbounded = include;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Ranked significant features; the diagram is left untouched
    pub fn select(&self, diagram: &PersistenceDiagram) -> Vec<TopologicalFeature> {
        let mut features: Vec<TopologicalFeature> = diagram
            .iter()
            .filter(|p| {
                if p.is_essential() {
                    self.include_unbounded
                } else {
                    p.persistence() > self.threshold
                }
            })
            .map(TopologicalFeature::from)
            .collect();
        features.sort_by(feature_order);
        features
    }
}

/// Select features above `threshold`, unbounded ones included
pub fn select(diagram: &PersistenceDiagram, threshold: f64) -> Result<Vec<TopologicalFeature>> {
    Ok(FeatureSelector::new(threshold)?.select(diagram))
}
