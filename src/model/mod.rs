//! Win classifier
//!
//! The recommendation engine only depends on the `WinPredictor` trait; the
//! burn MLP behind it is one interchangeable implementation.

pub mod mlp;

pub use mlp::{WinClassifier, WinModel, WinModelConfig};

/// A trained probabilistic binary classifier over encoded draft vectors.
///
/// `predict` returns the probability that team1 wins, in `[0, 1]`.
pub trait WinPredictor {
    fn predict(&self, features: &[f32]) -> f32;
}
