//! Assignment (solution) model.
//!
//! An allocation run produces exactly one [`Assignment`] per
//! (participant, period) pair. Each ends in one of three states: placed by
//! preference (with the rank achieved), placed by fallback, or unassigned
//! with a diagnostic [`UnassignedReason`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a (participant, period) pair was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Placed in one of the participant's ranked choices.
    Preference,
    /// Placed in an open activity by the seeded fallback draw.
    Fallback,
    /// No activity could be given.
    Unassigned,
}

/// Why a participant ended a period without an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// The participant listed choices, all full, cancelled or excluded, and
    /// no fallback seat remained.
    NoPreferenceSatisfiable,
    /// The participant listed no choices and no fallback seat remained.
    NoActivityAvailable,
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPreferenceSatisfiable => f.write_str("no preference satisfiable"),
            Self::NoActivityAvailable => f.write_str("no activity available"),
        }
    }
}

/// Terminal state of one (participant, period) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Placement {
    /// Granted ranked choice `rank` (1-based, literal list position).
    Preference { activity: String, rank: u32 },
    /// Placed by fallback.
    Fallback { activity: String },
    /// Left unassigned.
    Unassigned { reason: UnassignedReason },
}

/// One participant's outcome for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Camper ID.
    pub participant_id: String,
    /// Period name.
    pub period: String,
    /// Final placement.
    pub placement: Placement,
    /// Activity the participant was first admitted to before it was
    /// cancelled for low enrollment, if any.
    pub displaced_from: Option<String>,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(
        participant_id: impl Into<String>,
        period: impl Into<String>,
        placement: Placement,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            period: period.into(),
            placement,
            displaced_from: None,
        }
    }

    /// Records the cancelled activity the participant was displaced from.
    pub fn with_displaced_from(mut self, activity: impl Into<String>) -> Self {
        self.displaced_from = Some(activity.into());
        self
    }

    /// Resolution status.
    pub fn status(&self) -> AssignmentStatus {
        match self.placement {
            Placement::Preference { .. } => AssignmentStatus::Preference,
            Placement::Fallback { .. } => AssignmentStatus::Fallback,
            Placement::Unassigned { .. } => AssignmentStatus::Unassigned,
        }
    }

    /// Assigned activity, if any.
    pub fn activity(&self) -> Option<&str> {
        match &self.placement {
            Placement::Preference { activity, .. } | Placement::Fallback { activity } => {
                Some(activity.as_str())
            }
            Placement::Unassigned { .. } => None,
        }
    }

    /// Rank achieved, for preference placements.
    pub fn rank(&self) -> Option<u32> {
        match self.placement {
            Placement::Preference { rank, .. } => Some(rank),
            _ => None,
        }
    }

    /// Reason, for unassigned outcomes.
    pub fn reason(&self) -> Option<UnassignedReason> {
        match self.placement {
            Placement::Unassigned { reason } => Some(reason),
            _ => None,
        }
    }

    /// Whether an activity was given.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        !matches!(self.placement, Placement::Unassigned { .. })
    }
}

/// All assignments of a run, ordered by participant (roster order) then
/// period (cycle order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSet {
    /// Assignments in participant-major order.
    pub assignments: Vec<Assignment>,
}

impl AssignmentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn push(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates all assignments.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Finds the assignment for a (participant, period) pair.
    pub fn get(&self, participant_id: &str, period: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.participant_id == participant_id && a.period == period)
    }

    /// Returns all assignments for a participant.
    pub fn for_participant(&self, participant_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.participant_id == participant_id)
            .collect()
    }

    /// Returns all participants placed in an activity during a period.
    pub fn enrolled(&self, activity: &str, period: &str) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|a| a.period == period && a.activity() == Some(activity))
            .map(|a| a.participant_id.as_str())
            .collect()
    }

    /// Returns all unassigned outcomes.
    pub fn unassigned(&self) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| !a.is_assigned())
            .collect()
    }

    /// Count of assignments with a given status.
    pub fn count_status(&self, status: AssignmentStatus) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.status() == status)
            .count()
    }
}

impl<'a> IntoIterator for &'a AssignmentSet {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
