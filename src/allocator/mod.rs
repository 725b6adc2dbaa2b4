//! Allocation engine.
//!
//! Turns a validated [`Roster`](crate::models::Roster) into one assignment
//! per (participant, period).
//!
//! # Components
//!
//! - [`CapacityLedger`]: sole owner of enrollment counts.
//! - Preference matcher: walks ranked choices in service order.
//! - Viability reconciler: cancels activities below their minimum.
//! - Fallback assigner: seeded uniform draw among open activities.
//! - [`Allocator`]: runs the phases period by period.
//!
//! # Guarantees
//!
//! - No (activity, period) exceeds capacity.
//! - Every non-cancelled (activity, period) meets its minimum.
//! - No participant holds the same activity twice in one week.
//! - Same roster, configuration and seed give identical output.

mod engine;
mod fallback;
mod ledger;
mod matcher;
mod reconcile;
mod state;

pub use engine::{Allocation, Allocator};
pub use ledger::CapacityLedger;
