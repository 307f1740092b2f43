//! Training statistics tracking
//!
//! Keeps the full score history (the data behind a score plot) alongside
//! rolling windows over recent episodes and loss values.

use std::collections::VecDeque;

/// Training statistics tracker
///
/// # Example
///
/// ```rust
/// use snake_q::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// assert!(stats.record_episode(5, 120));
/// assert!(!stats.record_episode(2, 40));
/// stats.record_loss(0.8);
///
/// assert_eq!(stats.record(), 5);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Score of every finished episode, in order
    scores: Vec<u32>,

    /// Cumulative mean score after each episode
    mean_scores: Vec<f32>,

    /// Sum of all scores
    total_score: u64,

    /// Best score so far
    record: u32,

    /// Recent episode scores (rolling window)
    recent_scores: VecDeque<u32>,

    /// Recent episode lengths in steps (rolling window)
    recent_lengths: VecDeque<usize>,

    /// Recent long-memory losses (rolling window)
    recent_losses: VecDeque<f32>,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker whose rolling averages cover `window_size` values
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            scores: Vec::new(),
            mean_scores: Vec::new(),
            total_score: 0,
            record: 0,
            recent_scores: VecDeque::with_capacity(window_size),
            recent_lengths: VecDeque::with_capacity(window_size),
            recent_losses: VecDeque::with_capacity(window_size),
            total_steps: 0,
            window_size,
        }
    }

    /// Record a finished episode
    ///
    /// Returns `true` when the score beats the previous record, which starts
    /// at zero.
    pub fn record_episode(&mut self, score: u32, length: usize) -> bool {
        let is_record = score > self.record;
        if is_record {
            self.record = score;
        }

        self.scores.push(score);
        self.total_score += score as u64;
        self.mean_scores
            .push(self.total_score as f32 / self.scores.len() as f32);

        Self::push_deque(&mut self.recent_scores, score, self.window_size);
        Self::push_deque(&mut self.recent_lengths, length, self.window_size);
        self.total_steps += length;

        is_record
    }

    /// Record the loss of a training update
    pub fn record_loss(&mut self, loss: f32) {
        Self::push_deque(&mut self.recent_losses, loss, self.window_size);
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Cumulative mean score after each episode
    pub fn mean_scores(&self) -> &[f32] {
        &self.mean_scores
    }

    pub fn record(&self) -> u32 {
        self.record
    }

    pub fn total_episodes(&self) -> usize {
        self.scores.len()
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Mean score over the whole run, 0.0 before the first episode
    pub fn mean_score(&self) -> f32 {
        self.mean_scores.last().copied().unwrap_or(0.0)
    }

    /// Mean score over the rolling window
    pub fn recent_mean_score(&self) -> f32 {
        if self.recent_scores.is_empty() {
            return 0.0;
        }
        self.recent_scores.iter().sum::<u32>() as f32 / self.recent_scores.len() as f32
    }

    /// Mean episode length over the rolling window
    pub fn recent_mean_length(&self) -> f32 {
        if self.recent_lengths.is_empty() {
            return 0.0;
        }
        self.recent_lengths.iter().sum::<usize>() as f32 / self.recent_lengths.len() as f32
    }

    /// Mean loss over the rolling window
    pub fn recent_mean_loss(&self) -> f32 {
        if self.recent_losses.is_empty() {
            return 0.0;
        }
        self.recent_losses.iter().sum::<f32>() / self.recent_losses.len() as f32
    }

    /// One-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Record: {} | Mean: {:.2} | Recent: {:.2} | Len: {:.1} | Loss: {:.4}",
            self.total_episodes(),
            self.total_steps,
            self.record,
            self.mean_score(),
            self.recent_mean_score(),
            self.recent_mean_length(),
            self.recent_mean_loss(),
        )
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
