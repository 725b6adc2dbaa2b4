//! Rule engine for multi-criteria participant ordering.
//!
//! Composes priority rules with configurable evaluation modes and a final
//! deterministic tie-break.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{PriorityContext, PriorityRule, RuleScore};
use crate::models::{Participant, ParticipantIdx, Roster};

/// How multiple rules are combined.
#[derive(Debug, Clone, Default)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Lexicographic by camper ID (default).
    #[default]
    ById,
    /// Keep preference-table row order.
    TableOrder,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn PriorityRule>,
    weight: f64,
}

/// A composable rule engine for participant prioritization.
///
/// With no rules, participants are served in camper-ID order.
///
/// # Example
/// ```
/// use u_allocate::priority::{rules, RuleEngine};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::LowestCumulativeScore)
///     .with_tie_breaker(rules::MissedFirstChoice);
/// assert_eq!(engine.rule_count(), 2);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::ById,
        }
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: PriorityRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Adds a tie-breaking rule (weight 0.0, used only in Sequential mode).
    pub fn with_tie_breaker<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Number of configured rules (tie-breakers included).
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Service order for a roster's participants (highest priority first).
    pub fn sort(&self, roster: &Roster, context: &PriorityContext) -> Vec<ParticipantIdx> {
        self.sort_indices(roster.participants(), context)
    }

    /// Sorts participants by priority (highest priority first).
    ///
    /// Returns indices into the given slice. The sort is stable. Scores
    /// compare by [`f64::total_cmp`], so NaN from a custom rule sorts last
    /// instead of breaking the order.
    pub fn sort_indices(
        &self,
        participants: &[Participant],
        context: &PriorityContext,
    ) -> Vec<ParticipantIdx> {
        let mut indices: Vec<usize> = (0..participants.len()).collect();

        match &self.mode {
            EvaluationMode::Sequential => {
                indices.sort_by(|&a, &b| {
                    self.compare_sequential(&participants[a], &participants[b], context)
                });
            }
            EvaluationMode::Weighted => {
                let scores: Vec<f64> = participants
                    .iter()
                    .map(|p| self.weighted_score(p, context))
                    .collect();
                indices.sort_by(|&a, &b| {
                    scores[a]
                        .total_cmp(&scores[b])
                        .then_with(|| self.break_tie(&participants[a], &participants[b]))
                });
            }
        }

        indices.into_iter().map(ParticipantIdx).collect()
    }

    /// Evaluates a single participant and returns scores from each rule.
    pub fn evaluate(&self, participant: &Participant, context: &PriorityContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(participant, context) * wr.weight)
            .collect()
    }

    fn compare_sequential(
        &self,
        a: &Participant,
        b: &Participant,
        context: &PriorityContext,
    ) -> Ordering {
        for wr in &self.rules {
            let score_a = wr.rule.evaluate(a, context);
            let score_b = wr.rule.evaluate(b, context);

            let ordering = score_a.total_cmp(&score_b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        self.break_tie(a, b)
    }

    fn break_tie(&self, a: &Participant, b: &Participant) -> Ordering {
        match &self.tie_breaker {
            TieBreaker::ById => a.id.cmp(&b.id),
            TieBreaker::TableOrder => Ordering::Equal,
        }
    }

    fn weighted_score(&self, participant: &Participant, context: &PriorityContext) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(participant, context) * wr.weight)
            .sum()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
