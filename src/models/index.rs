//! Dense roster indices.
//!
//! A [`Roster`](super::Roster) stores periods, activities and participants in
//! vectors; these newtypes index into them so the allocation engine never
//! hashes names on its hot path.

use serde::{Deserialize, Serialize};

/// Position of a period within the roster's cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodIdx(pub usize);

/// Position of an activity within the roster's activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityIdx(pub usize);

/// Position of a participant within the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantIdx(pub usize);
