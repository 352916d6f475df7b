//! Simplices and Filtered Complexes
//!
//! A k-simplex is a set of k+1 distinct point indices. We store it in
//! canonical form (indices sorted ascending), so equality, hashing and
//! ordering all act on the same representation and finding a face takes a
//! single hash lookup.
//!
//! A filtered complex tags every simplex with the scale ε at which it
//! enters the filtration. It must be downward closed: each face of a
//! simplex is present at a value no larger than the simplex's own.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{degenerate, invalid_input, Result};

/// A simplex in canonical (sorted) vertex form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Simplex {
    vertices: Vec<usize>,
}

impl Simplex {
    /// Build a simplex from any ordering of distinct vertex indices
    pub fn new(mut vertices: Vec<usize>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(invalid_input("a simplex needs at least one vertex"));
        }
        vertices.sort_unstable();
        if vertices.windows(2).any(|w| w[0] == w[1]) {
            return Err(invalid_input(format!(
                "repeated vertex in simplex {vertices:?}"
            )));
        }
        Ok(Self { vertices })
    }

    /// 0-simplex
    pub fn vertex(v: usize) -> Self {
        Self { vertices: vec![v] }
    }

    /// 1-simplex {i, j}, i ≠ j
    pub(crate) fn edge(i: usize, j: usize) -> Self {
        debug_assert_ne!(i, j);
        Self { vertices: vec![i.min(j), i.max(j)] }
    }

    /// Append a vertex larger than every current vertex
    pub(crate) fn extended(&self, v: usize) -> Self {
        debug_assert!(self.vertices.last().map_or(true, |&last| v > last));
        let mut vertices = Vec::with_capacity(self.vertices.len() + 1);
        vertices.extend_from_slice(&self.vertices);
        vertices.push(v);
        Self { vertices }
    }

    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn contains(&self, v: usize) -> bool {
        self.vertices.binary_search(&v).is_ok()
    }

    /// Codimension-1 faces, i.e. the terms of the boundary ∂σ.
    /// Empty for a vertex.
    pub fn facets(&self) -> impl Iterator<Item = Simplex> + '_ {
        let n = if self.vertices.len() > 1 { self.vertices.len() } else { 0 };
        (0..n).map(move |skip| {
            let vertices = self
                .vertices
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &v)| v)
                .collect();
            Simplex { vertices }
        })
    }
}

impl fmt::Display for Simplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.vertices)
    }
}

/// A simplex with its filtration value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredSimplex {
    pub simplex: Simplex,
    pub value: f64,
}

impl FilteredSimplex {
    pub fn dimension(&self) -> usize {
        self.simplex.dimension()
    }

    /// Filtration order: value, then dimension, then vertex tuple
    pub fn filtration_cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then(self.dimension().cmp(&other.dimension()))
            .then_with(|| self.simplex.cmp(&other.simplex))
    }
}

/// Simplices of a Vietoris-Rips filtration up to ε_max and a maximum dimension
#[derive(Debug, Clone)]
pub struct FilteredComplex {
    simplices: Vec<FilteredSimplex>,
    index: HashMap<Simplex, usize>,
    epsilon_max: f64,
    max_dimension: usize,
}

impl FilteredComplex {
    pub(crate) fn with_bounds(epsilon_max: f64, max_dimension: usize) -> Self {
        Self {
            simplices: Vec::new(),
            index: HashMap::new(),
            epsilon_max,
            max_dimension,
        }
    }

    /// Assemble a complex from explicit simplices without validation.
    ///
    /// Repeated simplices keep their first value. Closure is checked later
    /// by the reducer; this exists for callers that build filtrations by
    /// other means.
    pub fn from_simplices(
        simplices: impl IntoIterator<Item = (Simplex, f64)>,
        epsilon_max: f64,
        max_dimension: usize,
    ) -> Self {
        let mut complex = Self::with_bounds(epsilon_max, max_dimension);
        for (simplex, value) in simplices {
            complex.insert(simplex, value);
        }
        complex
    }

    /// Insert unless already present; returns whether it was new
    pub(crate) fn insert(&mut self, simplex: Simplex, value: f64) -> bool {
        if self.index.contains_key(&simplex) {
            return false;
        }
        self.index.insert(simplex.clone(), self.simplices.len());
        self.simplices.push(FilteredSimplex { simplex, value });
        true
    }

    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Simplices in insertion order (dimension by dimension)
    pub fn iter(&self) -> impl Iterator<Item = &FilteredSimplex> {
        self.simplices.iter()
    }

    /// Filtration value of `simplex`, if present
    pub fn value_of(&self, simplex: &Simplex) -> Option<f64> {
        self.index.get(simplex).map(|&i| self.simplices[i].value)
    }

    pub fn contains(&self, simplex: &Simplex) -> bool {
        self.index.contains_key(simplex)
    }

    pub fn epsilon_max(&self) -> f64 {
        self.epsilon_max
    }

    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    /// Number of simplices per dimension, index = dimension
    pub fn count_by_dimension(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for s in &self.simplices {
            let d = s.dimension();
            if counts.len() <= d {
                counts.resize(d + 1, 0);
            }
            counts[d] += 1;
        }
        counts
    }

    /// Simplices sorted into filtration order
    pub fn filtration_order(&self) -> Vec<&FilteredSimplex> {
        let mut ordered: Vec<&FilteredSimplex> = self.simplices.iter().collect();
        ordered.sort_by(|a, b| a.filtration_cmp(b));
        ordered
    }

    /// Verify finite non-negative values and downward closure.
    ///
    /// Checking facets is enough: if every facet is present at a value no
    /// larger than its coface, induction covers all lower faces.
    pub fn check_downward_closure(&self) -> Result<()> {
        for s in &self.simplices {
            if !s.value.is_finite() || s.value < 0.0 {
                return Err(degenerate(format!(
                    "simplex {} has invalid filtration value {}",
                    s.simplex, s.value
                )));
            }
            for facet in s.simplex.facets() {
                match self.value_of(&facet) {
                    None => {
                        return Err(degenerate(format!(
                            "face {facet} of {} is missing",
                            s.simplex
                        )))
                    }
                    Some(v) if v > s.value => {
                        return Err(degenerate(format!(
                            "face {facet} enters at {v} after {} at {}",
                            s.simplex, s.value
                        )))
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;

    #[test]
    fn test_canonical_form() {
        let a = Simplex::new(vec![3, 1, 2]).unwrap();
        let b = Simplex::new(vec![2, 3, 1]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.vertices(), &[1, 2, 3]);
        assert_eq!(a.dimension(), 2);
        assert!(a.contains(2));
        assert!(!a.contains(0));
        assert_eq!(a.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_rejects_invalid_vertex_sets() {
        assert!(matches!(Simplex::new(vec![]), Err(TopologyError::InvalidInput(_))));
        assert!(matches!(Simplex::new(vec![1, 1]), Err(TopologyError::InvalidInput(_))));
    }

    #[test]
    fn test_facets() {
        let tri = Simplex::new(vec![0, 1, 2]).unwrap();
        let facets: Vec<Simplex> = tri.facets().collect();
        assert_eq!(
            facets,
            vec![Simplex::edge(1, 2), Simplex::edge(0, 2), Simplex::edge(0, 1)]
        );
        assert_eq!(Simplex::vertex(4).facets().count(), 0);
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut complex = FilteredComplex::with_bounds(1.0, 1);
        assert!(complex.insert(Simplex::vertex(0), 0.0));
        assert!(!complex.insert(Simplex::vertex(0), 0.5));
        assert_eq!(complex.len(), 1);
        assert_eq!(complex.value_of(&Simplex::vertex(0)), Some(0.0));
    }

    #[test]
    fn test_filtration_order_ties() {
        let complex = FilteredComplex::from_simplices(
            vec![
                (Simplex::edge(1, 2), 1.0),
                (Simplex::vertex(2), 0.0),
                (Simplex::edge(0, 1), 1.0),
                (Simplex::vertex(0), 0.0),
                (Simplex::vertex(1), 0.0),
            ],
            2.0,
            1,
        );
        let order: Vec<String> = complex
            .filtration_order()
            .iter()
            .map(|s| s.simplex.to_string())
            .collect();
        assert_eq!(order, vec!["[0]", "[1]", "[2]", "[0, 1]", "[1, 2]"]);
        assert_eq!(complex.count_by_dimension(), vec![3, 2]);
    }

    #[test]
    fn test_closure_violations() {
        let missing = FilteredComplex::from_simplices(
            vec![(Simplex::vertex(0), 0.0), (Simplex::edge(0, 1), 1.0)],
            2.0,
            1,
        );
        assert!(matches!(
            missing.check_downward_closure(),
            Err(TopologyError::DegenerateComplex(_))
        ));

        let late_face = FilteredComplex::from_simplices(
            vec![
                (Simplex::vertex(0), 0.0),
                (Simplex::vertex(1), 2.0),
                (Simplex::edge(0, 1), 1.0),
            ],
            2.0,
            1,
        );
        assert!(late_face.check_downward_closure().is_err());

        let nan = FilteredComplex::from_simplices(vec![(Simplex::vertex(0), f64::NAN)], 1.0, 0);
        assert!(nan.check_downward_closure().is_err());
    }
}
