//! Capacity ledger.
//!
//! Owns the enrollment counter of every (activity, period) pair. All
//! enrollment changes go through [`CapacityLedger::try_admit`] and
//! [`CapacityLedger::release`]; other components only read counts.
//!
//! # Invariants
//! - `enrolled(a, p) <= capacity(a)` at all times.
//! - A cancelled pair never admits again, so its count never increases.
//! - Only admitted participants can be released.

use std::collections::BTreeSet;

use crate::error::ConsistencyError;
use crate::models::{ActivityIdx, ParticipantIdx, PeriodIdx, Roster};

#[derive(Debug, Clone)]
struct Slot {
    capacity: u32,
    minimum: u32,
    offered: bool,
    cancelled: bool,
    admitted: BTreeSet<ParticipantIdx>,
}

impl Slot {
    #[inline]
    fn enrolled(&self) -> u32 {
        self.admitted.len() as u32
    }
}

/// Live enrollment per (activity, period) pair.
///
/// One ledger belongs to exactly one allocation run. Concurrent runs must
/// each build their own from the roster.
#[derive(Debug, Clone)]
pub struct CapacityLedger {
    period_count: usize,
    slots: Vec<Slot>,
    activity_names: Vec<String>,
    period_names: Vec<String>,
    participant_ids: Vec<String>,
}

impl CapacityLedger {
    /// Creates an empty ledger for a roster: no admissions, nothing cancelled.
    pub fn new(roster: &Roster) -> Self {
        let period_count = roster.period_count();
        let mut slots = Vec::with_capacity(roster.activity_count() * period_count);
        for activity in roster.activities() {
            for period in roster.period_indices() {
                slots.push(Slot {
                    capacity: activity.capacity,
                    minimum: activity.minimum,
                    offered: activity.offers(period),
                    cancelled: false,
                    admitted: BTreeSet::new(),
                });
            }
        }

        Self {
            period_count,
            slots,
            activity_names: roster.activities().iter().map(|a| a.name.clone()).collect(),
            period_names: roster.periods().iter().map(|p| p.name.clone()).collect(),
            participant_ids: roster.participants().iter().map(|p| p.id.clone()).collect(),
        }
    }

    #[inline]
    fn slot(&self, activity: ActivityIdx, period: PeriodIdx) -> &Slot {
        &self.slots[activity.0 * self.period_count + period.0]
    }

    #[inline]
    fn slot_mut(&mut self, activity: ActivityIdx, period: PeriodIdx) -> &mut Slot {
        &mut self.slots[activity.0 * self.period_count + period.0]
    }

    /// Admits a participant if the pair is offered, not cancelled, below
    /// capacity, and the participant is not already admitted.
    ///
    /// Returns `false` with no mutation otherwise.
    pub fn try_admit(
        &mut self,
        activity: ActivityIdx,
        period: PeriodIdx,
        participant: ParticipantIdx,
    ) -> bool {
        let slot = self.slot_mut(activity, period);
        if !slot.offered || slot.cancelled || slot.enrolled() >= slot.capacity {
            return false;
        }
        slot.admitted.insert(participant)
    }

    /// Releases an admitted participant.
    ///
    /// # Errors
    /// [`ConsistencyError::ReleaseWithoutAdmission`] if the participant is
    /// not recorded as admitted to the pair.
    pub fn release(
        &mut self,
        activity: ActivityIdx,
        period: PeriodIdx,
        participant: ParticipantIdx,
    ) -> Result<(), ConsistencyError> {
        if self.slot_mut(activity, period).admitted.remove(&participant) {
            return Ok(());
        }
        Err(ConsistencyError::ReleaseWithoutAdmission {
            activity: self.activity_names[activity.0].clone(),
            period: self.period_names[period.0].clone(),
            participant: self.participant_ids[participant.0].clone(),
        })
    }

    /// Whether the pair runs below its minimum and is not yet cancelled.
    pub fn is_below_minimum(&self, activity: ActivityIdx, period: PeriodIdx) -> bool {
        let slot = self.slot(activity, period);
        slot.offered && !slot.cancelled && slot.enrolled() < slot.minimum
    }

    /// Marks the pair cancelled.
    ///
    /// Does not release anyone: the caller must release every admitted
    /// participant as part of the same step.
    pub fn cancel(&mut self, activity: ActivityIdx, period: PeriodIdx) {
        self.slot_mut(activity, period).cancelled = true;
    }

    /// Whether the pair is cancelled.
    pub fn is_cancelled(&self, activity: ActivityIdx, period: PeriodIdx) -> bool {
        self.slot(activity, period).cancelled
    }

    /// Whether the activity is scheduled in the period.
    pub fn is_offered(&self, activity: ActivityIdx, period: PeriodIdx) -> bool {
        self.slot(activity, period).offered
    }

    /// Current enrollment count.
    pub fn enrolled(&self, activity: ActivityIdx, period: PeriodIdx) -> u32 {
        self.slot(activity, period).enrolled()
    }

    /// Activity capacity.
    pub fn capacity(&self, activity: ActivityIdx, period: PeriodIdx) -> u32 {
        self.slot(activity, period).capacity
    }

    /// Activity minimum.
    pub fn minimum(&self, activity: ActivityIdx, period: PeriodIdx) -> u32 {
        self.slot(activity, period).minimum
    }

    /// Seats left (zero when cancelled or not offered).
    pub fn remaining(&self, activity: ActivityIdx, period: PeriodIdx) -> u32 {
        let slot = self.slot(activity, period);
        if !slot.offered || slot.cancelled {
            return 0;
        }
        slot.capacity.saturating_sub(slot.enrolled())
    }

    /// Whether `try_admit` could currently succeed for a new participant.
    #[inline]
    pub fn has_room(&self, activity: ActivityIdx, period: PeriodIdx) -> bool {
        self.remaining(activity, period) > 0
    }

    /// Admitted participants in ascending roster order.
    pub fn admitted(&self, activity: ActivityIdx, period: PeriodIdx) -> Vec<ParticipantIdx> {
        self.slot(activity, period).admitted.iter().copied().collect()
    }

    /// Whether a participant is admitted to the pair.
    pub fn is_admitted(
        &self,
        activity: ActivityIdx,
        period: PeriodIdx,
        participant: ParticipantIdx,
    ) -> bool {
        self.slot(activity, period).admitted.contains(&participant)
    }
}
