//! Built-in priority rules.
//!
//! # Score Convention
//! All rules return lower scores for participants who should be served
//! first.

use super::{PriorityContext, PriorityRule, RuleScore};
use crate::models::Participant;

/// Lowest cumulative satisfaction first.
///
/// Multi-cycle fairness: participants who were least satisfied in previous
/// cycles (lowest accumulated `1/rank`) are served first.
#[derive(Debug, Clone, Copy)]
pub struct LowestCumulativeScore;

impl PriorityRule for LowestCumulativeScore {
    fn name(&self) -> &'static str {
        "SCORE"
    }

    fn evaluate(&self, participant: &Participant, context: &PriorityContext) -> RuleScore {
        context.score(&participant.id)
    }

    fn description(&self) -> &'static str {
        "Lowest Cumulative Score"
    }
}

/// Missed-first-choice first.
///
/// Participants who did not receive their first choice last week are served
/// before those who did.
#[derive(Debug, Clone, Copy)]
pub struct MissedFirstChoice;

impl PriorityRule for MissedFirstChoice {
    fn name(&self) -> &'static str {
        "MISSED"
    }

    fn evaluate(&self, participant: &Participant, _context: &PriorityContext) -> RuleScore {
        if participant.missed_first_choice {
            0.0
        } else {
            1.0
        }
    }

    fn description(&self) -> &'static str {
        "Missed First Choice Last Week"
    }
}
