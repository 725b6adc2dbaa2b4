//! Per-run bookkeeping shared by the allocation phases.

use std::collections::BTreeSet;

use super::CapacityLedger;
use crate::models::{ActivityIdx, ParticipantIdx, PeriodIdx, Roster, UnassignedReason};

/// A seat granted in the period being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Seat {
    pub activity: ActivityIdx,
    /// Rank achieved; `None` for fallback seats.
    pub rank: Option<u32>,
}

/// Activities each participant holds this week (no-repeat rule).
#[derive(Debug, Clone)]
pub(crate) struct WeekHoldings {
    held: Vec<BTreeSet<ActivityIdx>>,
}

impl WeekHoldings {
    pub fn new(participant_count: usize) -> Self {
        Self {
            held: vec![BTreeSet::new(); participant_count],
        }
    }

    #[inline]
    pub fn holds(&self, participant: ParticipantIdx, activity: ActivityIdx) -> bool {
        self.held[participant.0].contains(&activity)
    }

    pub fn hold(&mut self, participant: ParticipantIdx, activity: ActivityIdx) {
        self.held[participant.0].insert(activity);
    }

    pub fn drop_hold(&mut self, participant: ParticipantIdx, activity: ActivityIdx) {
        self.held[participant.0].remove(&activity);
    }
}

/// Working state of one period.
#[derive(Debug, Clone)]
pub(crate) struct PeriodState {
    pub period: PeriodIdx,
    pub seats: Vec<Option<Seat>>,
    pub displaced_from: Vec<Option<ActivityIdx>>,
    pub reasons: Vec<Option<UnassignedReason>>,
}

impl PeriodState {
    pub fn new(period: PeriodIdx, participant_count: usize) -> Self {
        Self {
            period,
            seats: vec![None; participant_count],
            displaced_from: vec![None; participant_count],
            reasons: vec![None; participant_count],
        }
    }

    /// Whether the participant still waits for a seat.
    #[inline]
    pub fn is_pending(&self, participant: ParticipantIdx) -> bool {
        self.seats[participant.0].is_none() && self.reasons[participant.0].is_none()
    }

    /// Number of participants still waiting.
    pub fn pending_count(&self) -> usize {
        (0..self.seats.len())
            .filter(|&i| self.is_pending(ParticipantIdx(i)))
            .count()
    }
}

/// Whether a rank falls within the configured preference depth.
#[inline]
pub(crate) fn within_depth(rank: u32, depth: Option<u32>) -> bool {
    match depth {
        Some(depth) => rank <= depth,
        None => true,
    }
}

/// Whether a participant may take a seat in `activity` this period,
/// capacity aside: offered, not cancelled, not held this week, open to
/// the participant's group.
pub(crate) fn may_join(
    roster: &Roster,
    ledger: &CapacityLedger,
    week: &WeekHoldings,
    participant: ParticipantIdx,
    activity: ActivityIdx,
    period: PeriodIdx,
) -> bool {
    ledger.is_offered(activity, period)
        && !ledger.is_cancelled(activity, period)
        && !week.holds(participant, activity)
        && roster
            .activity(activity)
            .admits_group(roster.participant(participant).group.as_deref())
}
