//! MLP win classifier
//!
//! Architecture: Input(6H+4) → Hidden1 → ReLU → Dropout
//!                           → Hidden2 → ReLU → Dropout
//!                           → win_head(1)

use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};

use crate::model::WinPredictor;
use crate::{DraftError, Result};

/// Configuration for the win classifier
#[derive(Debug, Clone)]
pub struct WinModelConfig {
    /// Input dimension (6H + 4 for registry size H)
    pub input_dim: usize,
    pub hidden1: usize,
    pub hidden2: usize,
    pub dropout: f64,
}

impl WinModelConfig {
    pub fn new(input_dim: usize) -> Self {
        WinModelConfig {
            input_dim,
            hidden1: 128,
            hidden2: 64,
            dropout: 0.1,
        }
    }

    pub fn from_model_config(input_dim: usize, config: &crate::ModelConfig) -> Self {
        WinModelConfig {
            input_dim,
            hidden1: config.hidden1,
            hidden2: config.hidden2,
            dropout: config.dropout,
        }
    }
}

/// A single hidden layer block: Linear → ReLU → Dropout
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize, dropout: f64) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear.forward(x);
        let x = relu(x);
        self.dropout.forward(x)
    }
}

/// Feed-forward win classifier over encoded draft vectors
#[derive(Module, Debug)]
pub struct WinModel<B: Backend> {
    hidden1: HiddenBlock<B>,
    hidden2: HiddenBlock<B>,
    win_head: Linear<B>,
}

impl<B: Backend> WinModel<B> {
    pub fn new(device: &B::Device, config: WinModelConfig) -> Self {
        WinModel {
            hidden1: HiddenBlock::new(device, config.input_dim, config.hidden1, config.dropout),
            hidden2: HiddenBlock::new(device, config.hidden1, config.hidden2, config.dropout),
            win_head: LinearConfig::new(config.hidden2, 1).init(device),
        }
    }

    /// Forward pass over a batch of encoded vectors.
    ///
    /// Returns win logits [batch, 1]; apply sigmoid for P(team1 wins).
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden1.forward(features);
        let x = self.hidden2.forward(x);
        self.win_head.forward(x)
    }

    /// Save model parameters to file (Burn adds the .mpk extension)
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| DraftError::Model(format!("Failed to save model {}: {}", path, e)))
    }

    /// Load model parameters from file. A missing or corrupt artifact is a
    /// fatal model error.
    pub fn load(device: &B::Device, path: &str, config: WinModelConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| DraftError::Model(format!("Failed to load model {}: {}", path, e)))?;

        let model = Self::new(device, config);
        Ok(model.load_record(record))
    }
}

/// Serving wrapper binding a trained model to its device
pub struct WinClassifier<B: Backend> {
    model: WinModel<B>,
    device: B::Device,
}

impl<B: Backend> WinClassifier<B> {
    pub fn new(model: WinModel<B>, device: B::Device) -> Self {
        WinClassifier { model, device }
    }

    /// Load a classifier from a saved artifact
    pub fn load(device: B::Device, path: &str, config: WinModelConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let model = WinModel::load(&device, path, config)?;
        Ok(Self::new(model, device))
    }
}

impl<B: Backend> WinPredictor for WinClassifier<B> {
    fn predict(&self, features: &[f32]) -> f32 {
        let input = Tensor::<B, 1>::from_floats(features, &self.device)
            .reshape([1, features.len()]);
        let logit = self.model.forward(input);
        sigmoid(logit).into_scalar().elem::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let config = WinModelConfig::new(28);
        let model = WinModel::<TestBackend>::new(&device, config);

        let input = Tensor::random(
            [4, 28],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let logits = model.forward(input);
        assert_eq!(logits.dims(), [4, 1]);
    }

    #[test]
    fn test_predict_is_probability() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let config = WinModelConfig::new(28);
        let model = WinModel::<TestBackend>::new(&device, config);
        let classifier = WinClassifier::new(model, device);

        let features = vec![0.5f32; 28];
        let p = classifier.predict(&features);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_predict_deterministic() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let config = WinModelConfig::new(28);
        let model = WinModel::<TestBackend>::new(&device, config);
        let classifier = WinClassifier::new(model, device);

        let features = vec![0.25f32; 28];
        assert_eq!(classifier.predict(&features), classifier.predict(&features));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let config = WinModelConfig::new(28);
        let model = WinModel::<TestBackend>::new(&device, config.clone());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model").to_string_lossy().to_string();
        model.save(&path).unwrap();

        let loaded = WinModel::<TestBackend>::load(&device, &path, config).unwrap();

        let features = vec![0.1f32; 28];
        let a = WinClassifier::new(model, device.clone()).predict(&features);
        let b = WinClassifier::new(loaded, device).predict(&features);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_is_model_error() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let err =
            WinModel::<TestBackend>::load(&device, "/nonexistent/model", WinModelConfig::new(28))
                .unwrap_err();
        assert!(matches!(err, DraftError::Model(_)));
    }
}
