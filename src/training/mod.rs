//! Model training
//!
//! Dataset assembly, the training loop, and diagnostic metrics.

pub mod metrics;
pub mod trainer;

pub use metrics::{accuracy, roc_auc, TrainingReport};
pub use trainer::{DraftDataset, WinTrainer};
