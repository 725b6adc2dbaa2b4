//! Aggregate statistics types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fill state of one (activity, period) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStatus {
    /// Every seat taken.
    Full,
    /// Running with free seats.
    NotFull,
    /// Offered, not cancelled, nobody enrolled.
    Empty,
    /// Cancelled for low enrollment.
    Cancelled,
}

impl FillStatus {
    pub(crate) fn classify(enrolled: u32, capacity: u32, cancelled: bool) -> Self {
        if cancelled {
            Self::Cancelled
        } else if enrolled >= capacity {
            Self::Full
        } else if enrolled == 0 {
            Self::Empty
        } else {
            Self::NotFull
        }
    }
}

/// Enrollment figures for one activity in one period it is offered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPeriodStats {
    pub activity: String,
    pub period: String,
    pub enrolled: u32,
    pub capacity: u32,
    pub minimum: u32,
    pub cancelled: bool,
    /// Participants who listed the activity for this period.
    pub requested: u32,
    /// Seats left (0 when cancelled).
    pub free: u32,
    /// `enrolled / capacity` (0.0..1.0).
    pub fill_rate: f64,
    pub status: FillStatus,
}

/// How assignments were resolved, counted over all (participant, period)
/// pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionHistogram {
    /// Preference placements per rank achieved.
    pub by_rank: BTreeMap<u32, usize>,
    pub fallback: usize,
    pub unassigned: usize,
}

impl SatisfactionHistogram {
    /// Preference placements across all ranks.
    pub fn preference_total(&self) -> usize {
        self.by_rank.values().sum()
    }

    /// Placements at the given rank.
    pub fn at_rank(&self, rank: u32) -> usize {
        self.by_rank.get(&rank).copied().unwrap_or(0)
    }

    /// Every counted pair.
    pub fn total(&self) -> usize {
        self.preference_total() + self.fallback + self.unassigned
    }
}

/// Run-level summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub participants: usize,
    /// `participants * periods`.
    pub total_slots: usize,
    pub assigned_slots: usize,
    /// Participants with an activity in every period.
    pub fully_assigned: usize,
    /// Participants with at least one placement, none of them by preference.
    pub no_preferences_met: usize,
    pub min_assignments: usize,
    pub max_assignments: usize,
    pub avg_assignments: f64,
    pub activities_not_full: usize,
    pub activities_empty: usize,
    pub activities_cancelled: usize,
}
