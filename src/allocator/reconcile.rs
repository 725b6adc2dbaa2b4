//! Viability reconciler.
//!
//! Cancels activities that failed to reach their minimum enrollment in a
//! period and returns their participants to the pending pool.
//!
//! # Algorithm
//!
//! Sweep every activity offered in the period; cancel each one below its
//! minimum and release all of its participants. Repeat the sweep until one
//! cancels nothing. Each activity can be cancelled at most once, so this
//! terminates after at most `activities + 1` sweeps. Cancelled activities
//! are never reinstated.

use tracing::info;

use super::state::{PeriodState, WeekHoldings};
use super::CapacityLedger;
use crate::error::ConsistencyError;
use crate::models::{ActivityIdx, Roster};

/// Cancels under-enrolled activities and re-queues their participants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ViabilityReconciler<'r> {
    roster: &'r Roster,
}

impl<'r> ViabilityReconciler<'r> {
    pub fn new(roster: &'r Roster) -> Self {
        Self { roster }
    }

    /// Runs the cancellation sweep for `state.period`.
    ///
    /// Returns the cancelled activities in cancellation order.
    ///
    /// # Errors
    /// Propagates ledger release failures.
    pub fn reconcile(
        &self,
        state: &mut PeriodState,
        week: &mut WeekHoldings,
        ledger: &mut CapacityLedger,
    ) -> Result<Vec<ActivityIdx>, ConsistencyError> {
        let period = state.period;
        let mut cancelled = Vec::new();

        loop {
            let mut swept = 0;
            for activity in self.roster.activities_in(period) {
                if !ledger.is_below_minimum(activity, period) {
                    continue;
                }

                let enrolled = ledger.enrolled(activity, period);
                ledger.cancel(activity, period);
                for participant in ledger.admitted(activity, period) {
                    ledger.release(activity, period, participant)?;
                    week.drop_hold(participant, activity);
                    state.seats[participant.0] = None;
                    state.displaced_from[participant.0] = Some(activity);
                }

                info!(
                    activity = %self.roster.activity(activity).name,
                    period = %self.roster.period(period).name,
                    enrolled,
                    minimum = ledger.minimum(activity, period),
                    "activity cancelled"
                );
                cancelled.push(activity);
                swept += 1;
            }
            if swept == 0 {
                break;
            }
        }

        Ok(cancelled)
    }
}
