//! Participant priority rules and rule engine.
//!
//! The preference matcher and fallback assigner serve participants one at a
//! time; whoever is served first gets first pick of scarce seats. This
//! module decides that order with composable priority rules.
//!
//! # Usage
//!
//! ```
//! use u_allocate::priority::{rules, PriorityContext, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::MissedFirstChoice)
//!     .with_tie_breaker(rules::LowestCumulativeScore);
//!
//! let context = PriorityContext::new();
//! // let order = engine.sort(&roster, &context);
//! ```
//!
//! Every ordering ends with a deterministic tie-break, so identical rosters
//! always produce identical service orders.

mod context;
mod engine;
pub mod rules;

pub use context::PriorityContext;
pub use engine::{EvaluationMode, RuleEngine, TieBreaker};

use crate::models::Participant;
use std::fmt::Debug;

/// Score returned by a priority rule.
///
/// Lower scores = higher priority (served first).
pub type RuleScore = f64;

/// A rule that evaluates a participant's service priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for participants that should be served first.
pub trait PriorityRule: Send + Sync + Debug {
    /// Rule name (e.g., "SCORE", "MISSED").
    fn name(&self) -> &'static str;

    /// Evaluates a participant's priority given the run context.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, participant: &Participant, context: &PriorityContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
