//! Sliding-window embedding
//!
//! Window i is (x[i·s], x[i·s + 1], ..., x[i·s + w - 1]) for stride s and
//! window length w. With normalisation each window becomes
//! (x - mean) / std using the population standard deviation.

use serde::{Deserialize, Serialize};

use super::Embedder;
use crate::error::{invalid_input, Result};

/// Windows whose spread is below this are treated as constant
const FLAT_WINDOW_STD: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlidingWindow {
    /// Samples per window (= embedding dimension)
    pub window: usize,
    /// Step between window starts
    pub stride: usize,
    /// z-score each window
    pub normalize: bool,
}

impl SlidingWindow {
    /// Unit-stride, z-scored windows
    pub fn new(window: usize) -> Self {
        Self {
            window,
            stride: 1,
            normalize: true,
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    fn zscore(window: &[f64]) -> Vec<f64> {
        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();

        // Constant window: centre only
        if std < FLAT_WINDOW_STD {
            return vec![0.0; window.len()];
        }
        window.iter().map(|x| (x - mean) / std).collect()
    }
}

impl Embedder for SlidingWindow {
    fn embed(&self, series: &[f64]) -> Result<Vec<Vec<f64>>> {
        if self.window == 0 {
            return Err(invalid_input("window length must be at least 1"));
        }
        if self.stride == 0 {
            return Err(invalid_input("stride must be at least 1"));
        }
        if series.len() < self.window {
            return Err(invalid_input(format!(
                "series of length {} is shorter than the window {}",
                series.len(),
                self.window
            )));
        }
        if let Some(bad) = series.iter().find(|x| !x.is_finite()) {
            return Err(invalid_input(format!("non-finite sample {bad}")));
        }

        let points = series
            .windows(self.window)
            .step_by(self.stride)
            .map(|w| {
                if self.normalize {
                    Self::zscore(w)
                } else {
                    w.to_vec()
                }
            })
            .collect();
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;
    use approx::assert_relative_eq;

    #[test]
    fn test_raw_windows() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let points = SlidingWindow::new(3)
            .with_normalize(false)
            .embed(&series)
            .unwrap();
        assert_eq!(
            points,
            vec![vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0], vec![3.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_stride() {
        let series: Vec<f64> = (0..10).map(f64::from).collect();
        let points = SlidingWindow::new(4)
            .with_stride(3)
            .with_normalize(false)
            .embed(&series)
            .unwrap();
        let starts: Vec<f64> = points.iter().map(|p| p[0]).collect();
        assert_eq!(starts, vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_zscore_windows() {
        let series = [10.0, 12.0, 14.0, 100.0, 100.0, 100.0];
        let points = SlidingWindow::new(3).embed(&series).unwrap();

        let first = &points[0];
        let std = (8.0_f64 / 3.0).sqrt();
        assert_relative_eq!(first[0], -2.0 / std, epsilon = 1e-12);
        assert_relative_eq!(first[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(first[2], 2.0 / std, epsilon = 1e-12);

        // Constant window is centred, not divided by zero
        assert_eq!(points[3], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        let series = [1.0, 2.0];
        assert!(matches!(
            SlidingWindow::new(3).embed(&series),
            Err(TopologyError::InvalidInput(_))
        ));
        assert!(SlidingWindow::new(0).embed(&series).is_err());
        assert!(SlidingWindow::new(1).with_stride(0).embed(&series).is_err());
        assert!(SlidingWindow::new(1).embed(&[1.0, f64::INFINITY]).is_err());
    }
}
