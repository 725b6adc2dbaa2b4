//! Allocation domain models.
//!
//! Provides the input tables, the validated [`Roster`] built from them, and
//! the [`Assignment`] records an allocation run produces. Domain-agnostic
//! within preference allocation.
//!
//! # Domain Mappings
//!
//! | u-allocate | Summer camp | School electives | Conference |
//! |------------|-------------|------------------|------------|
//! | Participant | Camper | Student | Attendee |
//! | Activity | Hug | Elective | Workshop |
//! | Period | Aleph/Beth/Gimmel | Block | Session slot |
//! | Group | Age group | Grade band | Track |

mod activity;
mod assignment;
mod index;
mod participant;
mod period;
mod roster;

pub use activity::{Activity, ActivityRow, OPEN_GROUP};
pub use assignment::{Assignment, AssignmentSet, AssignmentStatus, Placement, UnassignedReason};
pub use index::{ActivityIdx, ParticipantIdx, PeriodIdx};
pub use participant::{Participant, PeriodChoices, PreferenceRow};
pub use period::{Period, PeriodMap};
pub use roster::Roster;
