//! Pipeline configuration
//!
//! Every knob the core consumes lives in `PipelineConfig`. It can be built
//! in code with the `with_*` setters or loaded from JSON; missing fields
//! take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{invalid_config, Result};
use crate::topology::{Metric, DEFAULT_MAX_SIMPLICES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum VR epsilon
    pub epsilon_max: f64,
    /// Largest simplex dimension in the complex
    pub max_dimension: usize,
    /// Point metric
    pub metric: Metric,
    /// Minimum persistence for a feature to be reported (strict)
    pub threshold: f64,
    /// Report features that never die within [0, epsilon_max]
    pub include_unbounded: bool,
    /// Cap on the total simplex count
    pub max_simplices: usize,
    /// Use the rayon pool for distances and clique expansion
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            epsilon_max: 1.0,
            max_dimension: 2,
            metric: Metric::Euclidean,
            threshold: 0.5,
            include_unbounded: true,
            max_simplices: DEFAULT_MAX_SIMPLICES,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn new(epsilon_max: f64, max_dimension: usize) -> Self {
        Self {
            epsilon_max,
            max_dimension,
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_include_unbounded(mut self, include: bool) -> Self {
        self.include_unbounded = include;
        self
    }

    pub fn with_max_simplices(mut self, max_simplices: usize) -> Self {
        self.max_simplices = max_simplices;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon_max > 0.0) {
            return Err(invalid_config(format!(
                "epsilon_max must be > 0, got {}",
                self.epsilon_max
            )));
        }
        if !(self.threshold >= 0.0) {
            return Err(invalid_config(format!(
                "threshold must be >= 0, got {}",
                self.threshold
            )));
        }
        if self.max_simplices == 0 {
            return Err(invalid_config("max_simplices must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
