use serde::{Deserialize, Serialize};

/// Accuracy within one topic, joined with the bank size for that topic so
/// clients can show "answered X of Y".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicStats {
    pub topic: String,
    pub answered: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub total_questions: u64,
}

/// Derived view over the answer-event ledger. Never stored; always the
/// result of a fold over the matching events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_answered: u64,
    pub correct_answered: u64,
    pub overall_accuracy: f64,
    pub topic_stats: Vec<TopicStats>,
    pub total_points: u64,
    pub level: u32,
    pub current_streak: u32,
}

impl ProgressStats {
    pub fn empty() -> Self {
        Self {
            total_answered: 0,
            correct_answered: 0,
            overall_accuracy: 0.0,
            topic_stats: Vec::new(),
            total_points: 0,
            level: 1,
            current_streak: 0,
        }
    }
}

/// Accuracy percentages are reported with one decimal place.
pub fn round_accuracy(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Square-root level curve: early levels come quickly, later ones need
/// disproportionately more points. Level never drops below 1.
pub fn level_for_points(total_points: u64) -> u32 {
    let level = (total_points as f64 / 100.0).sqrt().floor() as u32;
    level.max(1)
}
