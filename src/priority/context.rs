//! Priority context for rule evaluation.

use std::collections::HashMap;

/// Cross-run state passed to priority rules.
///
/// Holds the prior cycle's cumulative satisfaction scores (camper ID →
/// score). Participants missing from the map are treated as score `0.0`.
#[derive(Debug, Clone, Default)]
pub struct PriorityContext {
    /// Cumulative satisfaction from previous cycles.
    pub cumulative_scores: HashMap<String, f64>,
}

impl PriorityContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from a prior score map.
    pub fn with_scores(scores: HashMap<String, f64>) -> Self {
        Self {
            cumulative_scores: scores,
        }
    }

    /// Sets a single participant's cumulative score.
    pub fn with_score(mut self, participant_id: impl Into<String>, score: f64) -> Self {
        self.cumulative_scores.insert(participant_id.into(), score);
        self
    }

    /// Cumulative score for a participant (`0.0` if unknown).
    pub fn score(&self, participant_id: &str) -> f64 {
        self.cumulative_scores
            .get(participant_id)
            .copied()
            .unwrap_or(0.0)
    }
}
