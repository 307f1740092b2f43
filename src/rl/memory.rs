//! Experience replay memory
//!
//! A bounded FIFO of transitions. Once full, every push evicts the oldest
//! entry. Sampling is uniform without replacement.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::features::FeatureVector;

/// One environment step as seen by the learner
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: FeatureVector,
    /// One-hot action vector
    pub action: [f32; 3],
    pub reward: f32,
    pub next_state: FeatureVector,
    pub done: bool,
}

/// Fixed-capacity FIFO buffer of transitions.
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
    rng: StdRng,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    /// Memory with a deterministic sampling sequence
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        assert!(capacity > 0, "replay memory capacity must be positive");
        ReplayMemory {
            // Grow lazily; the default capacity is large
            buffer: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            rng,
        }
    }

    /// Add a transition. Evicts the oldest when full.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Up to `n` transitions chosen uniformly without replacement.
    ///
    /// When the memory holds `n` or fewer entries, all of them are returned.
    pub fn sample(&mut self, n: usize) -> Vec<Transition> {
        if self.buffer.len() <= n {
            return self.buffer.iter().cloned().collect();
        }
        index::sample(&mut self.rng, self.buffer.len(), n)
            .iter()
            .map(|i| self.buffer[i].clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::features::FEATURE_DIM;

    /// Transition tagged through its reward so entries are distinguishable
    fn transition(tag: usize) -> Transition {
        Transition {
            state: FeatureVector([0; FEATURE_DIM]),
            action: [1.0, 0.0, 0.0],
            reward: tag as f32,
            next_state: FeatureVector([1; FEATURE_DIM]),
            done: tag % 2 == 0,
        }
    }

    fn tags(batch: &[Transition]) -> Vec<usize> {
        let mut tags: Vec<usize> = batch.iter().map(|t| t.reward as usize).collect();
        tags.sort_unstable();
        tags
    }

    #[test]
    fn test_push_and_len() {
        let mut memory = ReplayMemory::new(10);
        assert!(memory.is_empty());

        memory.push(transition(0));
        assert_eq!(memory.len(), 1);

        for i in 1..10 {
            memory.push(transition(i));
        }
        assert_eq!(memory.len(), 10);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut memory = ReplayMemory::new(5);
        for i in 0..50 {
            memory.push(transition(i));
            assert!(memory.len() <= memory.capacity());
        }
        assert_eq!(memory.len(), 5);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut memory = ReplayMemory::with_seed(4, 3);
        for i in 0..5 {
            memory.push(transition(i));
        }

        // Oldest entry (0) is gone, the rest are in insertion order
        let kept: Vec<usize> = memory.iter().map(|t| t.reward as usize).collect();
        assert_eq!(kept, vec![1, 2, 3, 4]);

        for _ in 0..20 {
            assert!(!tags(&memory.sample(3)).contains(&0));
        }
    }

    #[test]
    fn test_sample_small_memory_returns_everything() {
        let mut memory = ReplayMemory::new(100);
        for i in 0..7 {
            memory.push(transition(i));
        }

        let batch = memory.sample(7);
        assert_eq!(tags(&batch), (0..7).collect::<Vec<_>>());

        let batch = memory.sample(1000);
        assert_eq!(batch.len(), 7);
        assert_eq!(batch[3], transition(3));
    }

    #[test]
    fn test_sample_without_replacement() {
        let mut memory = ReplayMemory::with_seed(100, 11);
        for i in 0..50 {
            memory.push(transition(i));
        }

        let batch = memory.sample(10);
        let mut t = tags(&batch);
        assert_eq!(t.len(), 10);
        t.dedup();
        assert_eq!(t.len(), 10);
    }

    #[test]
    fn test_sample_empty_memory() {
        let mut memory = ReplayMemory::new(10);
        assert!(memory.sample(5).is_empty());
    }
}
