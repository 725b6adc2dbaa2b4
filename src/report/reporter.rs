//! Outcome reporter.
//!
//! Read-only aggregation over a finished run. Reporting twice on the same
//! inputs gives identical output.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::stats::{ActivityPeriodStats, AllocationSummary, FillStatus, SatisfactionHistogram};
use crate::allocator::CapacityLedger;
use crate::models::{AssignmentSet, AssignmentStatus, Placement, Roster, UnassignedReason};

/// One participant's outcome for one period, flattened for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub participant_id: String,
    pub period: String,
    pub activity: Option<String>,
    pub rank: Option<u32>,
    pub status: AssignmentStatus,
    pub reason: Option<UnassignedReason>,
    pub displaced_from: Option<String>,
}

/// Full report of an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// One row per (participant, period), participant-major.
    pub outcomes: Vec<OutcomeRow>,
    /// One entry per offered (activity, period), activity-major.
    pub activity_stats: Vec<ActivityPeriodStats>,
    pub histogram: SatisfactionHistogram,
    pub summary: AllocationSummary,
    /// Cumulative scores carried into the next cycle (multi-cycle mode).
    pub updated_scores: Option<BTreeMap<String, f64>>,
}

impl AllocationReport {
    /// Periods each participant was left without an activity, keyed by
    /// camper ID. Fully assigned participants are omitted.
    pub fn unassigned_slots(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut slots: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for row in self
            .outcomes
            .iter()
            .filter(|r| r.status == AssignmentStatus::Unassigned)
        {
            slots
                .entry(row.participant_id.as_str())
                .or_default()
                .push(row.period.as_str());
        }
        slots
    }

    /// Statistics for one activity in one period.
    pub fn stats_for(&self, activity: &str, period: &str) -> Option<&ActivityPeriodStats> {
        self.activity_stats
            .iter()
            .find(|s| s.activity == activity && s.period == period)
    }
}

/// Builds an [`AllocationReport`] from a roster, its final ledger and the
/// assignment set.
#[derive(Debug, Clone)]
pub struct OutcomeReporter<'a> {
    roster: &'a Roster,
    ledger: &'a CapacityLedger,
    prior_scores: Option<&'a HashMap<String, f64>>,
}

impl<'a> OutcomeReporter<'a> {
    /// Creates a single-cycle reporter.
    pub fn new(roster: &'a Roster, ledger: &'a CapacityLedger) -> Self {
        Self {
            roster,
            ledger,
            prior_scores: None,
        }
    }

    /// Enables updated cumulative scores, starting from `scores`.
    pub fn with_prior_scores(mut self, scores: &'a HashMap<String, f64>) -> Self {
        self.prior_scores = Some(scores);
        self
    }

    /// Aggregates the report.
    pub fn report(&self, assignments: &AssignmentSet) -> AllocationReport {
        let activity_stats = self.activity_stats();
        AllocationReport {
            outcomes: outcome_rows(assignments),
            histogram: histogram(assignments),
            summary: self.summary(assignments, &activity_stats),
            updated_scores: self.prior_scores.map(|prior| updated_scores(prior, assignments)),
            activity_stats,
        }
    }

    fn activity_stats(&self) -> Vec<ActivityPeriodStats> {
        let mut stats = Vec::new();
        for activity in self.roster.activity_indices() {
            for period in self.roster.period_indices() {
                if !self.ledger.is_offered(activity, period) {
                    continue;
                }
                let enrolled = self.ledger.enrolled(activity, period);
                let capacity = self.ledger.capacity(activity, period);
                let cancelled = self.ledger.is_cancelled(activity, period);
                let requested = self
                    .roster
                    .participants()
                    .iter()
                    .filter(|p| p.lists(period, activity))
                    .count() as u32;
                let fill_rate = if capacity > 0 {
                    enrolled as f64 / capacity as f64
                } else {
                    0.0
                };

                stats.push(ActivityPeriodStats {
                    activity: self.roster.activity(activity).name.clone(),
                    period: self.roster.period(period).name.clone(),
                    enrolled,
                    capacity,
                    minimum: self.ledger.minimum(activity, period),
                    cancelled,
                    requested,
                    free: self.ledger.remaining(activity, period),
                    fill_rate,
                    status: FillStatus::classify(enrolled, capacity, cancelled),
                });
            }
        }
        stats
    }

    fn summary(
        &self,
        assignments: &AssignmentSet,
        activity_stats: &[ActivityPeriodStats],
    ) -> AllocationSummary {
        let participants = self.roster.participant_count();
        let periods = self.roster.period_count();

        // (assigned, by preference) per camper ID, one pass over the set
        let mut tallies: HashMap<&str, (usize, usize)> = HashMap::with_capacity(participants);
        for assignment in assignments {
            let tally = tallies
                .entry(assignment.participant_id.as_str())
                .or_insert((0, 0));
            if assignment.is_assigned() {
                tally.0 += 1;
            }
            if assignment.status() == AssignmentStatus::Preference {
                tally.1 += 1;
            }
        }

        let mut per_participant = Vec::with_capacity(participants);
        let mut fully_assigned = 0;
        let mut no_preferences_met = 0;
        for participant in self.roster.participants() {
            let (assigned, by_preference) = tallies
                .get(participant.id.as_str())
                .copied()
                .unwrap_or((0, 0));
            if periods > 0 && assigned == periods {
                fully_assigned += 1;
            }
            if assigned > 0 && by_preference == 0 {
                no_preferences_met += 1;
            }
            per_participant.push(assigned);
        }

        let assigned_slots: usize = per_participant.iter().sum();
        let count_status = |status: FillStatus| {
            activity_stats
                .iter()
                .filter(|s| s.status == status)
                .count()
        };

        AllocationSummary {
            participants,
            total_slots: participants * periods,
            assigned_slots,
            fully_assigned,
            no_preferences_met,
            min_assignments: per_participant.iter().copied().min().unwrap_or(0),
            max_assignments: per_participant.iter().copied().max().unwrap_or(0),
            avg_assignments: if participants > 0 {
                assigned_slots as f64 / participants as f64
            } else {
                0.0
            },
            activities_not_full: count_status(FillStatus::NotFull),
            activities_empty: count_status(FillStatus::Empty),
            activities_cancelled: count_status(FillStatus::Cancelled),
        }
    }
}

fn outcome_rows(assignments: &AssignmentSet) -> Vec<OutcomeRow> {
    assignments
        .iter()
        .map(|a| OutcomeRow {
            participant_id: a.participant_id.clone(),
            period: a.period.clone(),
            activity: a.activity().map(str::to_string),
            rank: a.rank(),
            status: a.status(),
            reason: a.reason(),
            displaced_from: a.displaced_from.clone(),
        })
        .collect()
}

fn histogram(assignments: &AssignmentSet) -> SatisfactionHistogram {
    let mut histogram = SatisfactionHistogram::default();
    for assignment in assignments {
        match assignment.placement {
            Placement::Preference { rank, .. } => *histogram.by_rank.entry(rank).or_insert(0) += 1,
            Placement::Fallback { .. } => histogram.fallback += 1,
            Placement::Unassigned { .. } => histogram.unassigned += 1,
        }
    }
    histogram
}

/// `score += 1/rank` per preference placement; fallback and unassigned add
/// nothing. Participants absent from this run keep their prior score.
fn updated_scores(prior: &HashMap<String, f64>, assignments: &AssignmentSet) -> BTreeMap<String, f64> {
    let mut scores: BTreeMap<String, f64> = prior.iter().map(|(k, v)| (k.clone(), *v)).collect();
    for assignment in assignments {
        let entry = scores
            .entry(assignment.participant_id.clone())
            .or_insert(0.0);
        if let Some(rank) = assignment.rank() {
            *entry += 1.0 / rank as f64;
        }
    }
    scores
}
