//! Preference matcher.
//!
//! # Algorithm
//!
//! For one period, in service order:
//! 1. Skip participants that already hold a seat or a final outcome.
//! 2. Walk the participant's ranked choices (blanks skipped, ranks literal).
//! 3. Skip choices not offered this period, cancelled, already held this
//!    week, or closed to the participant's group.
//! 4. The first successful `try_admit` ends the walk; the rank is recorded.
//!
//! Participants whose walk fails stay pending for the fallback assigner.
//!
//! # Complexity
//! O(n * k) ledger probes where n=participants, k=preference depth.

use tracing::debug;

use super::state::{may_join, within_depth, PeriodState, Seat, WeekHoldings};
use super::CapacityLedger;
use crate::models::{ParticipantIdx, Roster};

/// Walks ranked preferences and admits via the ledger.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PreferenceMatcher<'r> {
    roster: &'r Roster,
    depth: Option<u32>,
}

impl<'r> PreferenceMatcher<'r> {
    pub fn new(roster: &'r Roster, depth: Option<u32>) -> Self {
        Self { roster, depth }
    }

    /// Runs one matching pass over every pending participant in `order`.
    ///
    /// Returns the number of participants seated in this pass.
    pub fn run(
        &self,
        order: &[ParticipantIdx],
        state: &mut PeriodState,
        week: &mut WeekHoldings,
        ledger: &mut CapacityLedger,
    ) -> usize {
        let mut seated = 0;
        for &participant in order {
            if !state.is_pending(participant) {
                continue;
            }
            if let Some(seat) = self.match_participant(participant, state, week, ledger) {
                state.seats[participant.0] = Some(seat);
                week.hold(participant, seat.activity);
                seated += 1;
            }
        }
        seated
    }

    fn match_participant(
        &self,
        participant: ParticipantIdx,
        state: &PeriodState,
        week: &WeekHoldings,
        ledger: &mut CapacityLedger,
    ) -> Option<Seat> {
        let period = state.period;
        for (rank, activity) in self.roster.participant(participant).ranked_choices(period) {
            if !within_depth(rank, self.depth) {
                break;
            }
            if !may_join(self.roster, ledger, week, participant, activity, period) {
                continue;
            }
            if ledger.try_admit(activity, period, participant) {
                debug!(
                    participant = %self.roster.participant(participant).id,
                    activity = %self.roster.activity(activity).name,
                    rank,
                    "seated by preference"
                );
                return Some(Seat {
                    activity,
                    rank: Some(rank),
                });
            }
        }
        None
    }
}
