//! Diagram Summaries: Betti Numbers and Persistent Entropy
//!
//! The k-th Betti number βₖ counts the number of k-dimensional
//! "holes" alive at a given scale:
//!
//! - β₀: Number of connected components
//! - β₁: Number of 1-dimensional loops/cycles
//! - β₂: Number of 2-dimensional voids/cavities
//!
//! Read off an exact persistence diagram, βₖ(ε) is the number of pairs
//! of dimension k with birth ≤ ε < death.
//!
//! Persistent entropy H_P = -Σᵢ pᵢ log(pᵢ), with pᵢ = lᵢ / L over the
//! finite lifetimes lᵢ of one dimension, summarises how evenly persistence
//! is spread across features.

use serde::Serialize;

use super::persistence::PersistenceDiagram;

/// Betti numbers at a specific filtration value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BettiNumbers {
    /// Filtration scale
    pub epsilon: f64,
    /// βₖ indexed by dimension k
    pub betti: Vec<usize>,
}

impl BettiNumbers {
    /// Count features alive at `epsilon`
    pub fn at_scale(diagram: &PersistenceDiagram, epsilon: f64) -> Self {
        let top = diagram.max_dimension().map_or(0, |d| d + 1);
        let betti = (0..top)
            .map(|d| {
                diagram
                    .dim(d)
                    .iter()
                    .filter(|p| p.birth <= epsilon && epsilon < p.death)
                    .count()
            })
            .collect();
        Self { epsilon, betti }
    }

    /// βₖ (0 above the diagram's top dimension)
    pub fn beta(&self, k: usize) -> usize {
        self.betti.get(k).copied().unwrap_or(0)
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.betti.iter().sum()
    }

    /// Euler characteristic χ = β₀ - β₁ + β₂ - ...
    pub fn euler_characteristic(&self) -> i64 {
        self.betti
            .iter()
            .enumerate()
            .map(|(k, &b)| if k % 2 == 0 { b as i64 } else { -(b as i64) })
            .sum()
    }
}

/// Betti curve: Betti numbers sampled across [0, max_epsilon]
#[derive(Debug, Clone, Serialize)]
pub struct BettiCurve {
    pub values: Vec<BettiNumbers>,
}

impl BettiCurve {
    /// Sample `n_steps + 1` evenly spaced scales
    pub fn sample(diagram: &PersistenceDiagram, max_epsilon: f64, n_steps: usize) -> Self {
        let n_steps = n_steps.max(1);
        let values = (0..=n_steps)
            .map(|step| {
                let epsilon = max_epsilon * step as f64 / n_steps as f64;
                BettiNumbers::at_scale(diagram, epsilon)
            })
            .collect();
        Self { values }
    }

    /// (ε, βₖ) pairs
    pub fn curve(&self, k: usize) -> Vec<(f64, usize)> {
        self.values.iter().map(|b| (b.epsilon, b.beta(k))).collect()
    }

    /// Integrated βₖ (trapezoidal area under the curve)
    pub fn integrated(&self, k: usize) -> f64 {
        self.values
            .windows(2)
            .map(|w| {
                let de = w[1].epsilon - w[0].epsilon;
                de * (w[0].beta(k) + w[1].beta(k)) as f64 / 2.0
            })
            .sum()
    }
}

impl PersistenceDiagram {
    /// Finite lifetimes of dimension d
    fn lifetimes(&self, d: usize) -> impl Iterator<Item = f64> + '_ {
        self.finite(d).map(|p| p.persistence())
    }

    /// Total finite persistence in dimension d
    pub fn total_persistence(&self, d: usize) -> f64 {
        self.lifetimes(d).sum()
    }

    /// Largest finite persistence in dimension d
    pub fn max_persistence(&self, d: usize) -> f64 {
        self.lifetimes(d).fold(0.0, f64::max)
    }

    /// Persistent (Shannon) entropy over finite positive lifetimes
    pub fn persistence_entropy(&self, d: usize) -> f64 {
        let total = self.total_persistence(d);
        if total <= 0.0 {
            return 0.0;
        }

        self.lifetimes(d)
            .filter(|&l| l > 0.0)
            .map(|l| {
                let p = l / total;
                -p * p.ln()
            })
            .sum()
    }
}
