//! Fallback assigner.
//!
//! Places participants still pending after preference matching and
//! reconciliation into any open activity with a free seat.
//!
//! # Algorithm
//!
//! For each pending participant in service order:
//! 1. Collect activities offered this period that are not cancelled, not
//!    held this week, open to the participant's group, and have room.
//! 2. Draw one uniformly from the collection with the run's seeded RNG.
//! 3. Admit via the ledger.
//!
//! An empty collection finalizes the participant as unassigned. The reason
//! depends on whether they listed any choice for the period.

use rand::Rng;
use tracing::debug;

use super::state::{may_join, within_depth, PeriodState, Seat, WeekHoldings};
use super::CapacityLedger;
use crate::error::ConsistencyError;
use crate::models::{ActivityIdx, ParticipantIdx, Roster, UnassignedReason};

/// Seeded random placement into remaining capacity.
#[derive(Debug)]
pub(crate) struct FallbackAssigner<'r, 'g, R: Rng> {
    roster: &'r Roster,
    depth: Option<u32>,
    rng: &'g mut R,
}

impl<'r, 'g, R: Rng> FallbackAssigner<'r, 'g, R> {
    pub fn new(roster: &'r Roster, depth: Option<u32>, rng: &'g mut R) -> Self {
        Self { roster, depth, rng }
    }

    /// Seats or finalizes every pending participant in `order`.
    ///
    /// Returns the number of participants seated.
    ///
    /// # Errors
    /// [`ConsistencyError::AdmissionRefused`] if the ledger rejects a seat
    /// the eligibility check reported free.
    pub fn assign(
        &mut self,
        order: &[ParticipantIdx],
        state: &mut PeriodState,
        week: &mut WeekHoldings,
        ledger: &mut CapacityLedger,
    ) -> Result<usize, ConsistencyError> {
        let period = state.period;
        let mut seated = 0;

        for &participant in order {
            if !state.is_pending(participant) {
                continue;
            }

            let eligible: Vec<ActivityIdx> = self
                .roster
                .activities_in(period)
                .filter(|&a| {
                    ledger.has_room(a, period)
                        && may_join(self.roster, ledger, week, participant, a, period)
                })
                .collect();

            if eligible.is_empty() {
                let reason = self.unassigned_reason(participant, state);
                debug!(
                    participant = %self.roster.participant(participant).id,
                    period = %self.roster.period(period).name,
                    %reason,
                    "left unassigned"
                );
                state.reasons[participant.0] = Some(reason);
                continue;
            }

            let activity = eligible[self.rng.random_range(0..eligible.len())];
            if !ledger.try_admit(activity, period, participant) {
                return Err(ConsistencyError::AdmissionRefused {
                    activity: self.roster.activity(activity).name.clone(),
                    period: self.roster.period(period).name.clone(),
                    participant: self.roster.participant(participant).id.clone(),
                });
            }
            debug!(
                participant = %self.roster.participant(participant).id,
                activity = %self.roster.activity(activity).name,
                candidates = eligible.len(),
                "seated by fallback"
            );
            state.seats[participant.0] = Some(Seat {
                activity,
                rank: None,
            });
            week.hold(participant, activity);
            seated += 1;
        }

        Ok(seated)
    }

    fn unassigned_reason(&self, participant: ParticipantIdx, state: &PeriodState) -> UnassignedReason {
        let listed = self
            .roster
            .participant(participant)
            .ranked_choices(state.period)
            .any(|(rank, _)| within_depth(rank, self.depth));
        if listed || state.displaced_from[participant.0].is_some() {
            UnassignedReason::NoPreferenceSatisfiable
        } else {
            UnassignedReason::NoActivityAvailable
        }
    }
}
