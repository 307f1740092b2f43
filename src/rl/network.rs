//! Q-value network for the Snake agent
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 11] binary features
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: [batch, 3] Q-values (straight, turn right, turn left)
//! ```
//!
//! # Example
//!
//! ```rust
//! use snake_q::rl::QNetworkConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = QNetworkConfig::default().init::<Backend>(&device);
//!
//! let features = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(features);
//! assert_eq!(q_values.dims(), [4, 3]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};
use serde::{Deserialize, Serialize};

use super::features::{FEATURE_DIM, FeatureVector, features_to_tensor};
use crate::game::Action;

/// Configuration for the Q-network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QNetworkConfig {
    /// Number of input features (default: 11)
    pub input_size: usize,

    /// Width of the hidden layer (default: 256)
    pub hidden_size: usize,

    /// Number of actions (default: 3)
    pub output_size: usize,
}

impl QNetworkConfig {
    pub fn new(hidden_size: usize) -> Self {
        Self {
            input_size: FEATURE_DIM,
            hidden_size,
            output_size: Action::COUNT,
        }
    }

    /// Initialize the network with freshly sampled weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            hidden: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, self.output_size).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Two-layer fully connected Q-network
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    hidden: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: `[batch, 11]` features to `[batch, 3]` Q-values
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.hidden.forward(features));
        self.output.forward(x)
    }

    /// Q-values for a single feature vector
    pub fn predict(&self, features: &FeatureVector) -> [f32; 3] {
        let device = self.hidden.weight.val().device();
        let input = features_to_tensor::<B>(std::slice::from_ref(features), &device);
        let values: Vec<f32> = self
            .forward(input)
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");
        [values[0], values[1], values[2]]
    }
}

/// Index of the largest value; ties resolve to the lowest index
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_v), (i, &v)| {
            if v > best_v { (i, v) } else { (best, best_v) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::Autodiff;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use burn::tensor::{Distribution, TensorData};

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_forward_pass_shapes() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        for batch_size in [1, 4, 32] {
            let features = Tensor::zeros([batch_size, FEATURE_DIM], &device);
            assert_eq!(network.forward(features).dims(), [batch_size, 3]);
        }
    }

    #[test]
    fn test_predict_matches_forward() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);
        let features = FeatureVector([1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0]);

        let predicted = network.predict(&features);
        let batch = features_to_tensor::<TestBackend>(&[features], &device);
        let data: TensorData = network.forward(batch).into_data();
        let forward = data.as_slice::<f32>().unwrap();

        for i in 0..3 {
            assert!((predicted[i] - forward[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gradient_flow() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestAutodiffBackend>(&device);

        let features = Tensor::ones([2, FEATURE_DIM], &device).require_grad();
        let loss = network.forward(features.clone()).sum();
        let gradients = loss.backward();

        assert!(
            features.grad(&gradients).is_some(),
            "Gradients should flow back to the input features"
        );
    }

    #[test]
    fn test_output_finite() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new(64).init::<TestBackend>(&device);

        let features = Tensor::random([8, FEATURE_DIM], Distribution::Uniform(0.0, 1.0), &device);
        let data: TensorData = network.forward(features).into_data();
        for &val in data.as_slice::<f32>().unwrap() {
            assert!(val.is_finite(), "Q-values should be finite, got: {}", val);
        }
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.6, 0.2]), 1);
        assert_eq!(argmax(&[-1.0, -2.0, -0.5]), 2);
        assert_eq!(argmax(&[0.0, 1.0, 0.0]), 1);
        assert_eq!(argmax(&[0.3, 0.3, 0.1]), 0);
    }
}
