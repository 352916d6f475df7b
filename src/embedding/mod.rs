//! Embedding Module: Time Series to Point Clouds
//!
//! The topology core consumes point clouds. A numeric series is turned
//! into one by an `Embedder`; the reference implementation slides a
//! fixed-length window over the series (a delay embedding with unit lag),
//! optionally z-scoring each window so that the cloud captures the shape
//! of local motion rather than the price level.

mod sliding_window;

pub use sliding_window::SlidingWindow;

use crate::error::Result;

/// Maps a numeric series to points of equal dimension
pub trait Embedder {
    fn embed(&self, series: &[f64]) -> Result<Vec<Vec<f64>>>;
}
