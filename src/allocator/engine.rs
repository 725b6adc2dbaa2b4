//! Allocation driver.
//!
//! # Algorithm
//!
//! Periods are processed one at a time in cycle order, since the no-repeat
//! rule couples them through each participant's held activities. Per period:
//!
//! 1. Preference matching over every participant in service order.
//! 2. Viability reconciliation (fixed-point cancellation sweep).
//! 3. If anything was cancelled, a second matching pass for the re-queued
//!    participants over their remaining choices.
//! 4. Fallback placement for everyone still pending.
//!
//! A totality check then confirms every (participant, period) pair ended in
//! exactly one outcome before results are returned.
//!
//! # Complexity
//! O(p * (n * k + a^2 + n * a)) where p=periods, n=participants,
//! k=preference depth, a=activities.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, info_span};

use super::fallback::FallbackAssigner;
use super::matcher::PreferenceMatcher;
use super::reconcile::ViabilityReconciler;
use super::state::{PeriodState, WeekHoldings};
use super::CapacityLedger;
use crate::error::{AllocationError, ConsistencyError};
use crate::models::{Assignment, AssignmentSet, ParticipantIdx, Placement, Roster};
use crate::priority::{rules, PriorityContext, RuleEngine};
use crate::report::{AllocationReport, OutcomeReporter};
use crate::validation::validate_scores;

/// Greedy, priority-ordered allocator with bounded retry passes.
///
/// # Example
///
/// ```
/// use u_allocate::allocator::Allocator;
/// use u_allocate::models::{ActivityRow, PeriodMap, PreferenceRow, Roster};
///
/// let activities = vec![
///     ActivityRow::new("Soccer", 20, 0).offered_in(["Aleph"]),
///     ActivityRow::new("Art", 12, 0).offered_in(["Aleph"]),
/// ];
/// let preferences = vec![
///     PreferenceRow::new("C1").with_choices("Aleph", ["Art", "Soccer"]),
///     PreferenceRow::new("C2"),
/// ];
/// let roster = Roster::build(&activities, &preferences, &PeriodMap::new(["Aleph"])).unwrap();
///
/// let allocation = Allocator::new().with_seed(7).allocate(&roster).unwrap();
/// assert_eq!(allocation.assignments().len(), 2);
/// assert_eq!(allocation.assignments().get("C1", "Aleph").unwrap().activity(), Some("Art"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    seed: u64,
    rule_engine: Option<RuleEngine>,
    preference_depth: Option<u32>,
    prior_scores: Option<HashMap<String, f64>>,
}

impl Allocator {
    /// Creates a single-cycle allocator: seed 0, no depth limit, ID order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback PRNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets a rule engine for participant ordering.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = Some(engine);
        self
    }

    /// Limits how many ranks the matcher considers.
    pub fn with_preference_depth(mut self, depth: u32) -> Self {
        self.preference_depth = Some(depth);
        self
    }

    /// Enables multi-cycle mode with the previous cycle's cumulative scores.
    ///
    /// Without an explicit rule engine, participants are then served in
    /// ascending score order.
    pub fn with_prior_scores(mut self, scores: HashMap<String, f64>) -> Self {
        self.prior_scores = Some(scores);
        self
    }

    /// Configured seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Service order for a roster's participants.
    pub fn service_order(&self, roster: &Roster) -> Vec<ParticipantIdx> {
        let context = match &self.prior_scores {
            Some(scores) => PriorityContext::with_scores(scores.clone()),
            None => PriorityContext::new(),
        };
        match (&self.rule_engine, &self.prior_scores) {
            (Some(engine), _) => engine.sort(roster, &context),
            (None, Some(_)) => RuleEngine::new()
                .with_rule(rules::LowestCumulativeScore)
                .sort(roster, &context),
            (None, None) => RuleEngine::new().sort(roster, &context),
        }
    }

    /// Allocates every participant in every period.
    ///
    /// # Errors
    /// - [`AllocationError::Validation`] if a prior score is not finite.
    /// - [`AllocationError::Consistency`] if an engine invariant breaks.
    ///
    /// No partial result is returned.
    pub fn allocate(&self, roster: &Roster) -> Result<Allocation, AllocationError> {
        if let Some(scores) = &self.prior_scores {
            validate_scores(scores)?;
        }

        let _run = info_span!(
            "allocate",
            seed = self.seed,
            participants = roster.participant_count(),
            activities = roster.activity_count(),
            periods = roster.period_count()
        )
        .entered();
        info!("allocation started");

        let order = self.service_order(roster);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut ledger = CapacityLedger::new(roster);
        let mut week = WeekHoldings::new(roster.participant_count());
        let matcher = PreferenceMatcher::new(roster, self.preference_depth);
        let reconciler = ViabilityReconciler::new(roster);

        let mut periods = Vec::with_capacity(roster.period_count());
        for period in roster.period_indices() {
            let _span = info_span!("period", period = %roster.period(period).name).entered();
            let mut state = PeriodState::new(period, roster.participant_count());

            let matched = matcher.run(&order, &mut state, &mut week, &mut ledger);
            let cancelled = reconciler.reconcile(&mut state, &mut week, &mut ledger)?;
            let rematched = if cancelled.is_empty() {
                0
            } else {
                matcher.run(&order, &mut state, &mut week, &mut ledger)
            };
            let pending = state.pending_count();
            let fallback = FallbackAssigner::new(roster, self.preference_depth, &mut rng)
                .assign(&order, &mut state, &mut week, &mut ledger)?;

            info!(
                matched,
                cancelled = cancelled.len(),
                rematched,
                pending,
                fallback,
                "period allocated"
            );
            periods.push(state);
        }

        let assignments = finalize(roster, &periods)?;
        info!(assignments = assignments.len(), "allocation finished");

        Ok(Allocation {
            assignments,
            ledger,
            prior_scores: self.prior_scores.clone(),
            seed: self.seed,
        })
    }
}

/// Converts per-period working state into the assignment set, checking
/// that every pair has exactly one outcome.
fn finalize(roster: &Roster, periods: &[PeriodState]) -> Result<AssignmentSet, ConsistencyError> {
    let mut assignments = AssignmentSet::new();
    for participant in roster.participant_indices() {
        let id = &roster.participant(participant).id;
        for state in periods {
            let period_name = &roster.period(state.period).name;
            let seat = state.seats[participant.0];
            let reason = state.reasons[participant.0];

            let placement = match (seat, reason) {
                (Some(seat), None) => {
                    let activity = roster.activity(seat.activity).name.clone();
                    match seat.rank {
                        Some(rank) => Placement::Preference { activity, rank },
                        None => Placement::Fallback { activity },
                    }
                }
                (None, Some(reason)) => Placement::Unassigned { reason },
                _ => {
                    return Err(ConsistencyError::MissingOutcome {
                        participant: id.clone(),
                        period: period_name.clone(),
                    })
                }
            };

            let mut assignment = Assignment::new(id.clone(), period_name.clone(), placement);
            if let Some(cancelled) = state.displaced_from[participant.0] {
                assignment = assignment.with_displaced_from(roster.activity(cancelled).name.clone());
            }
            assignments.push(assignment);
        }
    }
    Ok(assignments)
}

/// Result of one allocation run.
#[derive(Debug, Clone)]
pub struct Allocation {
    assignments: AssignmentSet,
    ledger: CapacityLedger,
    prior_scores: Option<HashMap<String, f64>>,
    seed: u64,
}

impl Allocation {
    /// One assignment per (participant, period).
    pub fn assignments(&self) -> &AssignmentSet {
        &self.assignments
    }

    /// Final enrollment state.
    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    /// Seed the run used.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Consumes the allocation, returning the assignment set.
    pub fn into_assignments(self) -> AssignmentSet {
        self.assignments
    }

    /// Builds the outcome report. Includes updated cumulative scores when
    /// the run was in multi-cycle mode.
    pub fn report(&self, roster: &Roster) -> AllocationReport {
        let reporter = OutcomeReporter::new(roster, &self.ledger);
        match &self.prior_scores {
            Some(scores) => reporter.with_prior_scores(scores).report(&self.assignments),
            None => reporter.report(&self.assignments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityRow, AssignmentStatus, PeriodMap, PreferenceRow, UnassignedReason};

    fn periods() -> PeriodMap {
        PeriodMap::new(["Aleph", "Beth", "Gimmel"])
    }

    #[test]
    fn test_every_pair_gets_one_outcome() {
        let roster = Roster::build(
            &[
                ActivityRow::new("Soccer", 2, 0).offered_in(["Aleph", "Beth", "Gimmel"]),
                ActivityRow::new("Art", 1, 0).offered_in(["Aleph", "Beth"]),
            ],
            &[
                PreferenceRow::new("C1").with_choices("Aleph", ["Art"]),
                PreferenceRow::new("C2"),
                PreferenceRow::new("C3").with_choices("Beth", ["Soccer"]),
            ],
            &periods(),
        )
        .unwrap();

        let allocation = Allocator::new().allocate(&roster).unwrap();
        let set = allocation.assignments();
        assert_eq!(set.len(), 9);
        for p in roster.participants() {
            for period in roster.periods() {
                assert!(set.get(&p.id, &period.name).is_some());
            }
        }
        // Participant-major order
        assert_eq!(set.assignments[0].participant_id, "C1");
        assert_eq!(set.assignments[2].period, "Gimmel");
    }

    #[test]
    fn test_no_repeat_across_periods() {
        let roster = Roster::build(
            &[
                ActivityRow::new("Soccer", 5, 0).offered_in(["Aleph", "Beth", "Gimmel"]),
                ActivityRow::new("Art", 5, 0).offered_in(["Aleph", "Beth", "Gimmel"]),
            ],
            &[PreferenceRow::new("C1")
                .with_choices("Aleph", ["Soccer"])
                .with_choices("Beth", ["Soccer"])
                .with_choices("Gimmel", ["Soccer"])],
            &periods(),
        )
        .unwrap();

        let allocation = Allocator::new().allocate(&roster).unwrap();
        let set = allocation.assignments();
        assert_eq!(set.get("C1", "Aleph").unwrap().rank(), Some(1));
        assert_eq!(set.get("C1", "Beth").unwrap().activity(), Some("Art"));
        assert_eq!(set.get("C1", "Beth").unwrap().status(), AssignmentStatus::Fallback);
        let gimmel = set.get("C1", "Gimmel").unwrap();
        assert_eq!(
            gimmel.reason(),
            Some(UnassignedReason::NoPreferenceSatisfiable)
        );
    }

    #[test]
    fn test_displaced_participant_rematched_to_next_choice() {
        let roster = Roster::build(
            &[
                ActivityRow::new("Art", 12, 6).offered_in(["Aleph"]),
                ActivityRow::new("Chess", 4, 0).offered_in(["Aleph"]),
            ],
            &[PreferenceRow::new("C1").with_choices("Aleph", ["Art", "Chess"])],
            &PeriodMap::new(["Aleph"]),
        )
        .unwrap();

        let allocation = Allocator::new().allocate(&roster).unwrap();
        let a = allocation.assignments().get("C1", "Aleph").unwrap();
        assert_eq!(a.activity(), Some("Chess"));
        assert_eq!(a.rank(), Some(2));
        assert_eq!(a.displaced_from.as_deref(), Some("Art"));
        assert!(allocation.ledger().is_cancelled(
            roster.find_activity("Art").unwrap(),
            roster.find_period("Aleph").unwrap()
        ));
    }

    #[test]
    fn test_prior_scores_drive_order() {
        let roster = Roster::build(
            &[ActivityRow::new("Soccer", 1, 0).offered_in(["Aleph"])],
            &[
                PreferenceRow::new("C1").with_choices("Aleph", ["Soccer"]),
                PreferenceRow::new("C2").with_choices("Aleph", ["Soccer"]),
            ],
            &PeriodMap::new(["Aleph"]),
        )
        .unwrap();

        let single = Allocator::new().allocate(&roster).unwrap();
        assert_eq!(single.assignments().enrolled("Soccer", "Aleph"), vec!["C1"]);

        let scores = HashMap::from([("C1".to_string(), 3.0), ("C2".to_string(), 1.0)]);
        let multi = Allocator::new()
            .with_prior_scores(scores)
            .allocate(&roster)
            .unwrap();
        assert_eq!(multi.assignments().enrolled("Soccer", "Aleph"), vec!["C2"]);
    }

    #[test]
    fn test_non_finite_prior_score_rejected() {
        let roster = Roster::build(
            &[ActivityRow::new("Soccer", 1, 0).offered_in(["Aleph"])],
            &[PreferenceRow::new("C1"), PreferenceRow::new("C2")],
            &PeriodMap::new(["Aleph"]),
        )
        .unwrap();

        let scores = HashMap::from([("C2".to_string(), f64::NEG_INFINITY)]);
        let err = Allocator::new()
            .with_prior_scores(scores)
            .allocate(&roster)
            .unwrap_err();
        assert!(matches!(err, AllocationError::Validation(ref e) if e.len() == 1));
    }

    #[test]
    fn test_explicit_engine_overrides_scores() {
        let roster = Roster::build(
            &[ActivityRow::new("Soccer", 1, 0).offered_in(["Aleph"])],
            &[
                PreferenceRow::new("C1").with_choices("Aleph", ["Soccer"]),
                PreferenceRow::new("C2")
                    .with_missed_first_choice(true)
                    .with_choices("Aleph", ["Soccer"]),
            ],
            &PeriodMap::new(["Aleph"]),
        )
        .unwrap();

        let scores = HashMap::from([("C2".to_string(), 5.0)]);
        let allocation = Allocator::new()
            .with_prior_scores(scores)
            .with_rule_engine(RuleEngine::new().with_rule(rules::MissedFirstChoice))
            .allocate(&roster)
            .unwrap();
        assert_eq!(allocation.assignments().enrolled("Soccer", "Aleph"), vec!["C2"]);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let activities: Vec<_> = (0..5)
            .map(|i| ActivityRow::new(format!("H{i}"), 3, 0).offered_in(["Aleph", "Beth"]))
            .collect();
        let prefs: Vec<_> = (0..12).map(|i| PreferenceRow::new(format!("C{i:02}"))).collect();
        let roster = Roster::build(&activities, &prefs, &PeriodMap::new(["Aleph", "Beth"])).unwrap();

        let a = Allocator::new().with_seed(11).allocate(&roster).unwrap();
        let b = Allocator::new().with_seed(11).allocate(&roster).unwrap();
        assert_eq!(a.assignments(), b.assignments());
        assert_eq!(a.seed(), 11);
    }

    #[test]
    fn test_report_only_has_scores_in_multi_cycle() {
        let roster = Roster::build(
            &[ActivityRow::new("Soccer", 3, 0).offered_in(["Aleph"])],
            &[PreferenceRow::new("C1").with_choices("Aleph", ["Soccer"])],
            &PeriodMap::new(["Aleph"]),
        )
        .unwrap();

        let single = Allocator::new().allocate(&roster).unwrap();
        assert!(single.report(&roster).updated_scores.is_none());

        let multi = Allocator::new()
            .with_prior_scores(HashMap::new())
            .allocate(&roster)
            .unwrap();
        let scores = multi.report(&roster).updated_scores.unwrap();
        assert!((scores["C1"] - 1.0).abs() < 1e-10);
    }
}
