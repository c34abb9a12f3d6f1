//! Feature computation
//!
//! Smoothed pairwise win-rate statistics and the draft state encoder.

pub mod encoding;
pub mod stats;

pub use encoding::DraftEncoder;
pub use stats::DraftStatistics;
