//! Win classifier training
//!
//! Encodes historical games into feature vectors and fits the MLP with
//! full-batch gradient descent and a binary cross-entropy loss. A
//! stratified fraction of examples is held out purely for diagnostics.

use burn::optim::{GradientsParams, Optimizer, SgdConfig};
use burn::tensor::activation::sigmoid;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::HeroRegistry;
use crate::features::{DraftEncoder, DraftStatistics};
use crate::model::{WinModel, WinModelConfig};
use crate::training::metrics::{accuracy, roc_auc, TrainingReport};
use crate::{DraftError, DraftState, MatchRecord, Result, TrainingConfig};

/// Encoded training examples
#[derive(Debug, Clone)]
pub struct DraftDataset {
    features: Vec<f32>,
    labels: Vec<f32>,
    dim: usize,
}

impl DraftDataset {
    /// Encode every record against the frozen registry and matrices
    pub fn from_records(
        records: &[MatchRecord],
        registry: &HeroRegistry,
        stats: &DraftStatistics,
    ) -> Self {
        let encoder = DraftEncoder::new(registry, stats);
        let dim = encoder.dim();
        let mut features = Vec::with_capacity(records.len() * dim);
        let mut labels = Vec::with_capacity(records.len());

        for record in records {
            let state = DraftState {
                team1_picks: record.team1_picks.clone(),
                team2_picks: record.team2_picks.clone(),
                team1_bans: record.team1_bans.clone(),
                team2_bans: record.team2_bans.clone(),
            };
            features.extend(encoder.encode(&state));
            labels.push(if record.team1_won { 1.0 } else { 0.0 });
        }

        DraftDataset {
            features,
            labels,
            dim,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn example(&self, idx: usize) -> (&[f32], f32) {
        (
            &self.features[idx * self.dim..(idx + 1) * self.dim],
            self.labels[idx],
        )
    }

    fn subset(&self, indices: &[usize]) -> DraftDataset {
        let mut features = Vec::with_capacity(indices.len() * self.dim);
        let mut labels = Vec::with_capacity(indices.len());
        for &idx in indices {
            let (f, l) = self.example(idx);
            features.extend_from_slice(f);
            labels.push(l);
        }
        DraftDataset {
            features,
            labels,
            dim: self.dim,
        }
    }

    /// Split into (train, holdout) with the holdout fraction drawn from
    /// each label class separately. Deterministic for a given seed.
    pub fn stratified_split(&self, holdout_fraction: f64, seed: u64) -> (DraftDataset, DraftDataset) {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut train_indices = Vec::new();
        let mut holdout_indices = Vec::new();

        for class in [1.0f32, 0.0] {
            let mut indices: Vec<usize> = (0..self.len())
                .filter(|&i| self.labels[i] == class)
                .collect();
            indices.shuffle(&mut rng);

            let holdout_count = (indices.len() as f64 * holdout_fraction).round() as usize;
            holdout_indices.extend_from_slice(&indices[..holdout_count]);
            train_indices.extend_from_slice(&indices[holdout_count..]);
        }

        (self.subset(&train_indices), self.subset(&holdout_indices))
    }

    fn to_tensors<B: burn::tensor::backend::Backend>(
        &self,
        device: &B::Device,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let x = Tensor::<B, 1>::from_floats(self.features.as_slice(), device)
            .reshape([self.len(), self.dim]);
        let y = Tensor::<B, 1>::from_floats(self.labels.as_slice(), device)
            .reshape([self.len(), 1]);
        (x, y)
    }
}

/// Full-batch trainer for the MLP win classifier
pub struct WinTrainer<B: AutodiffBackend> {
    device: B::Device,
    config: TrainingConfig,
}

impl<B: AutodiffBackend> WinTrainer<B>
where
    B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
    B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new(device: B::Device, config: TrainingConfig) -> Self {
        WinTrainer { device, config }
    }

    /// Fit a classifier on the dataset, returning the trained model and a
    /// diagnostic report from the stratified holdout.
    pub fn train(
        &self,
        dataset: &DraftDataset,
        model_config: WinModelConfig,
    ) -> Result<(WinModel<B>, TrainingReport)> {
        if dataset.is_empty() {
            return Err(DraftError::Data(
                "Cannot train on an empty dataset".to_string(),
            ));
        }

        let (train_set, holdout_set) =
            dataset.stratified_split(self.config.holdout_fraction, self.config.seed);
        let train_set = if train_set.is_empty() {
            log::warn!("Holdout split left no training examples; training on everything");
            dataset.clone()
        } else {
            train_set
        };

        log::info!(
            "Training on {} examples, {} held out for diagnostics",
            train_set.len(),
            holdout_set.len()
        );

        let mut model = WinModel::<B>::new(&self.device, model_config);
        let mut optimizer = SgdConfig::new().init();

        let (x_train, y_train) = train_set.to_tensors::<B>(&self.device);

        let mut final_loss = 0.0f32;
        for epoch in 0..self.config.epochs {
            let logits = model.forward(x_train.clone());
            let probs = sigmoid(logits);

            let loss = binary_cross_entropy(probs.clone(), y_train.clone());
            final_loss = loss.clone().into_scalar().elem();

            let grads = loss.backward();
            let grads_params = GradientsParams::from_grads(grads, &model);
            model = optimizer.step(self.config.learning_rate, model, grads_params);

            if epoch % 50 == 0 || epoch == self.config.epochs - 1 {
                log::info!(
                    "Epoch {}/{}: loss={:.4}",
                    epoch + 1,
                    self.config.epochs,
                    final_loss
                );
            }
        }

        // Diagnostics on the trained model
        let train_probs = self.predict_probs(&model, &train_set);
        let train_accuracy = accuracy(&train_probs, &train_set.labels);

        let (holdout_accuracy, holdout_auc) = if holdout_set.is_empty() {
            (None, None)
        } else {
            let probs = self.predict_probs(&model, &holdout_set);
            (
                Some(accuracy(&probs, &holdout_set.labels)),
                Some(roc_auc(&probs, &holdout_set.labels)),
            )
        };

        let report = TrainingReport {
            epochs: self.config.epochs,
            final_loss,
            train_accuracy,
            holdout_accuracy,
            holdout_auc,
        };
        log::info!("Training finished: {}", report);

        Ok((model, report))
    }

    fn predict_probs(&self, model: &WinModel<B>, dataset: &DraftDataset) -> Vec<f32> {
        let (x, _) = dataset.to_tensors::<B>(&self.device);
        let probs = sigmoid(model.forward(x));
        let data = probs.into_data();
        let slice: &[f32] = data.as_slice().unwrap_or(&[]);
        slice.to_vec()
    }
}

fn binary_cross_entropy<B: AutodiffBackend>(
    probs: Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let eps = 1e-7;
    let probs_clamped = probs.clamp(eps, 1.0 - eps);
    let loss = targets.clone().neg() * probs_clamped.clone().log()
        - (targets.neg() + 1.0) * (probs_clamped.neg() + 1.0).log();
    loss.mean()
}
