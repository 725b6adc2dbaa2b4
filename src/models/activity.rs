//! Activity (hug) model.
//!
//! An activity is an offering participants are allocated to. It runs in a
//! subset of periods, seats at most `capacity` participants per period, and
//! only runs in a period if at least `minimum` participants enroll.
//!
//! # Lifecycle
//!
//! Capacity and minimum are immutable inputs. Whether an activity is
//! cancelled in a given period is allocation-time state owned by the
//! [`CapacityLedger`](crate::allocator::CapacityLedger), not an attribute.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::PeriodIdx;

/// Group label meaning "open to every group".
pub const OPEN_GROUP: &str = "All";

/// One row of the activity table, as supplied by the ingestion layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRow {
    /// Activity name (unique within the table).
    pub name: String,
    /// Maximum simultaneous participants per period.
    pub capacity: u32,
    /// Participants required for the activity to run in a period.
    pub minimum: u32,
    /// Canonical names of the periods this activity is offered in.
    pub periods: Vec<String>,
    /// Eligible participant group. `None` or `"All"` = everyone.
    pub group: Option<String>,
}

impl ActivityRow {
    /// Creates a row offered in no periods yet.
    pub fn new(name: impl Into<String>, capacity: u32, minimum: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            minimum,
            periods: Vec::new(),
            group: None,
        }
    }

    /// Adds the periods this activity is offered in.
    pub fn offered_in<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.periods.extend(periods.into_iter().map(Into::into));
        self
    }

    /// Restricts the activity to one participant group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// A validated activity within a [`Roster`](super::Roster).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity name.
    pub name: String,
    /// Maximum simultaneous participants per period (> 0).
    pub capacity: u32,
    /// Minimum enrollment for the activity to run (≤ capacity).
    pub minimum: u32,
    /// Periods in which the activity is scheduled.
    pub offered: BTreeSet<PeriodIdx>,
    /// Eligible participant group; `None` = open to all.
    pub group: Option<String>,
}

impl Activity {
    /// Whether the activity is scheduled in `period`.
    #[inline]
    pub fn offers(&self, period: PeriodIdx) -> bool {
        self.offered.contains(&period)
    }

    /// Whether a participant of `group` may join.
    ///
    /// Open activities admit everyone, including ungrouped participants.
    /// Restricted activities admit only their own group (case-insensitive).
    pub fn admits_group(&self, group: Option<&str>) -> bool {
        match (&self.group, group) {
            (None, _) => true,
            (Some(required), Some(group)) => required.eq_ignore_ascii_case(group),
            (Some(_), None) => false,
        }
    }
}

/// Normalizes a group label: trims it and maps blanks and `"All"` to `None`.
pub(crate) fn normalize_group(group: Option<&str>) -> Option<String> {
    let group = group?.trim();
    if group.is_empty() || group.eq_ignore_ascii_case(OPEN_GROUP) {
        None
    } else {
        Some(group.to_string())
    }
}
