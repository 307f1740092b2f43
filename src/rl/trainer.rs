//! Q-learning update step
//!
//! For every transition in a batch the target equals the current prediction
//! except at the taken action, which becomes
//!
//! ```text
//! q_new = r                          if done
//! q_new = r + γ * max_a Q(s', a)     otherwise
//! ```
//!
//! One Adam step then minimizes the mean squared error between prediction and
//! target, so only the taken action's value receives a gradient.

use burn::{
    module::AutodiffModule,
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{ElementConversion, Tensor, TensorData, backend::AutodiffBackend},
};

use super::features::{FeatureVector, features_to_tensor};
use super::memory::Transition;
use super::network::QNetwork;
use crate::game::Action;

/// Owns the optimizer and applies Q-learning updates to a [`QNetwork`]
pub struct QTrainer<B: AutodiffBackend> {
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    learning_rate: f64,
    gamma: f32,
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    pub fn new(learning_rate: f64, gamma: f32, device: B::Device) -> Self {
        Self {
            optim: AdamConfig::new().init(),
            learning_rate,
            gamma,
            device,
        }
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Perform one gradient step on a batch and return the loss.
    ///
    /// A single transition is a batch of one. An empty batch is a no-op.
    ///
    /// # Panics
    ///
    /// If the slices do not all have the same length, or if an action row is
    /// not a one-hot vector.
    pub fn train_step(
        &mut self,
        network: &mut QNetwork<B>,
        states: &[FeatureVector],
        actions: &[[f32; 3]],
        rewards: &[f32],
        next_states: &[FeatureVector],
        dones: &[bool],
    ) -> f32 {
        let n = states.len();
        assert!(
            actions.len() == n && rewards.len() == n && next_states.len() == n && dones.len() == n,
            "mismatched batch lengths: states={}, actions={}, rewards={}, next_states={}, dones={}",
            n,
            actions.len(),
            rewards.len(),
            next_states.len(),
            dones.len()
        );
        if n == 0 {
            return 0.0;
        }
        let taken: Vec<Action> = actions
            .iter()
            .enumerate()
            .map(|(i, row)| match Action::try_from(&row[..]) {
                Ok(action) => action,
                Err(e) => panic!("malformed action at batch row {}: {}", i, e),
            })
            .collect();

        // Bootstrapped values come from the pre-update network, without grad
        let next_q: Vec<f32> = network
            .valid()
            .forward(features_to_tensor::<B::InnerBackend>(next_states, &self.device))
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");

        let predicted = network.forward(features_to_tensor::<B>(states, &self.device));
        let predicted_values: Vec<f32> = predicted
            .clone()
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");

        let target_values = compute_targets(
            &predicted_values,
            &taken,
            rewards,
            &next_q,
            dones,
            self.gamma,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(target_values, [n, Action::COUNT]),
            &self.device,
        );

        let diff = predicted - targets;
        let loss = (diff.clone() * diff).mean();
        let loss_val = loss.clone().into_scalar().elem::<f32>();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &*network);
        *network = self
            .optim
            .step(self.learning_rate, network.clone(), grads);

        loss_val
    }

    /// Convenience wrapper over [`train_step`](Self::train_step) for stored transitions
    pub fn train_batch(&mut self, network: &mut QNetwork<B>, batch: &[Transition]) -> f32 {
        let states: Vec<FeatureVector> = batch.iter().map(|t| t.state).collect();
        let actions: Vec<[f32; 3]> = batch.iter().map(|t| t.action).collect();
        let rewards: Vec<f32> = batch.iter().map(|t| t.reward).collect();
        let next_states: Vec<FeatureVector> = batch.iter().map(|t| t.next_state).collect();
        let dones: Vec<bool> = batch.iter().map(|t| t.done).collect();

        self.train_step(network, &states, &actions, &rewards, &next_states, &dones)
    }
}

/// Q-learning targets, flattened row-major as `[batch, 3]`
///
/// `predicted` and `next_q` are flattened `[batch, 3]` network outputs for the
/// states and next states. Each row of the result copies `predicted` and
/// overwrites the entry of the action taken.
pub fn compute_targets(
    predicted: &[f32],
    actions: &[Action],
    rewards: &[f32],
    next_q: &[f32],
    dones: &[bool],
    gamma: f32,
) -> Vec<f32> {
    let width = Action::COUNT;
    let mut targets = predicted.to_vec();

    for i in 0..actions.len() {
        let row = i * width..(i + 1) * width;
        let q_new = if dones[i] {
            rewards[i]
        } else {
            let max_next = next_q[row.clone()]
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
            rewards[i] + gamma * max_next
        };
        targets[row.start + actions[i].index()] = q_new;
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::features::FEATURE_DIM;
    use crate::rl::network::QNetworkConfig;
    use burn::backend::Autodiff;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type TestBackend = Autodiff<NdArray<f32>>;

    fn features(seed: u8) -> FeatureVector {
        let mut f = [0u8; FEATURE_DIM];
        f[(seed as usize) % FEATURE_DIM] = 1;
        f[4] = 1;
        FeatureVector(f)
    }

    #[test]
    fn test_terminal_target_is_reward() {
        let predicted = [0.3, -0.2, 0.7];
        let next_q = [100.0, 100.0, 100.0];
        let targets = compute_targets(&predicted, &[Action::TurnRight], &[10.0], &next_q, &[true], 0.9);

        assert_eq!(targets, vec![0.3, 10.0, 0.7]);
    }

    #[test]
    fn test_non_terminal_target_adds_discounted_max() {
        let predicted = [0.0, 0.0, 0.0];
        let next_q = [1.0, 5.0, -2.0];
        let targets = compute_targets(&predicted, &[Action::Straight], &[0.0], &next_q, &[false], 0.9);

        assert!((targets[0] - 4.5).abs() < 1e-6);
        assert_eq!(targets[1], 0.0);
        assert_eq!(targets[2], 0.0);
    }

    #[test]
    fn test_batch_targets_only_touch_taken_actions() {
        let predicted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let next_q = [0.0, 0.0, 1.0, 2.0, 0.0, 0.0];
        let actions = [Action::TurnLeft, Action::Straight];
        let targets = compute_targets(&predicted, &actions, &[-10.0, 10.0], &next_q, &[true, false], 0.5);

        assert_eq!(targets, vec![1.0, 2.0, -10.0, 11.0, 5.0, 6.0]);
    }

    #[test]
    fn test_train_step_moves_prediction_toward_target() {
        let device = NdArrayDevice::default();
        let mut network = QNetworkConfig::default().init::<TestBackend>(&device);
        let mut trainer = QTrainer::<TestBackend>::new(0.001, 0.9, device);

        let state = features(1);
        let action = Action::TurnRight.one_hot();
        let before = network.valid().predict(&state)[1];
        let error_before = (before - 10.0).abs();

        for _ in 0..50 {
            trainer.train_step(&mut network, &[state], &[action], &[10.0], &[features(2)], &[true]);
        }

        let after = network.valid().predict(&state)[1];
        assert!(
            (after - 10.0).abs() < error_before,
            "prediction {} should approach 10 (was {})",
            after,
            before
        );
    }

    #[test]
    fn test_train_step_returns_finite_loss() {
        let device = NdArrayDevice::default();
        let mut network = QNetworkConfig::default().init::<TestBackend>(&device);
        let mut trainer = QTrainer::<TestBackend>::new(0.001, 0.9, device);

        let batch: Vec<Transition> = (0..8)
            .map(|i| Transition {
                state: features(i),
                action: Action::ALL[i as usize % 3].one_hot(),
                reward: [0.0, 10.0, -10.0][i as usize % 3],
                next_state: features(i + 1),
                done: i % 3 == 2,
            })
            .collect();

        let loss = trainer.train_batch(&mut network, &batch);
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let device = NdArrayDevice::default();
        let mut network = QNetworkConfig::default().init::<TestBackend>(&device);
        let mut trainer = QTrainer::<TestBackend>::new(0.001, 0.9, device);

        let state = features(0);
        let before = network.valid().predict(&state);
        let loss = trainer.train_batch(&mut network, &[]);

        assert_eq!(loss, 0.0);
        assert_eq!(network.valid().predict(&state), before);
    }

    #[test]
    #[should_panic(expected = "malformed action at batch row 1")]
    fn test_all_zero_action_row_panics() {
        let device = NdArrayDevice::default();
        let mut network = QNetworkConfig::default().init::<TestBackend>(&device);
        let mut trainer = QTrainer::<TestBackend>::new(0.001, 0.9, device);

        trainer.train_step(
            &mut network,
            &[features(0), features(1)],
            &[Action::Straight.one_hot(), [0.0, 0.0, 0.0]],
            &[0.0, 0.0],
            &[features(1), features(2)],
            &[false, false],
        );
    }

    #[test]
    #[should_panic(expected = "malformed action")]
    fn test_fractional_action_row_panics() {
        let device = NdArrayDevice::default();
        let mut network = QNetworkConfig::default().init::<TestBackend>(&device);
        let mut trainer = QTrainer::<TestBackend>::new(0.001, 0.9, device);

        trainer.train_step(
            &mut network,
            &[features(0)],
            &[[0.5, 0.5, 0.0]],
            &[10.0],
            &[features(1)],
            &[true],
        );
    }

    #[test]
    #[should_panic(expected = "mismatched batch lengths")]
    fn test_mismatched_lengths_panic() {
        let device = NdArrayDevice::default();
        let mut network = QNetworkConfig::default().init::<TestBackend>(&device);
        let mut trainer = QTrainer::<TestBackend>::new(0.001, 0.9, device);

        trainer.train_step(
            &mut network,
            &[features(0), features(1)],
            &[Action::Straight.one_hot()],
            &[0.0, 0.0],
            &[features(1), features(2)],
            &[false, false],
        );
    }
}
