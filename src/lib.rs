//! Preference-driven activity allocation.
//!
//! Allocates participants to capacity-bounded activities across the fixed
//! periods of a cycle, honoring ranked per-period preferences.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Roster`, `Activity`, `Participant`,
//!   `Period`, `Assignment`, plus the raw input rows
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   activities, unmapped periods, minimum > capacity)
//! - **`priority`**: Composable rules producing the participant service order
//! - **`allocator`**: Capacity ledger, preference matching, viability
//!   cancellation, seeded fallback placement
//! - **`report`**: Outcome rows, per-activity statistics, satisfaction
//!   histogram, multi-cycle scores
//! - **`error`**: Fatal error taxonomy
//!
//! # Architecture
//!
//! The engine is a deterministic greedy allocator with bounded retry
//! passes, not a global optimizer. A run is a pure function of the roster,
//! the configuration and the seed; it performs no I/O and keeps no global
//! state. Input ingestion and export formats live outside this crate.
//!
//! # Example
//!
//! ```
//! use u_allocate::allocator::Allocator;
//! use u_allocate::models::{ActivityRow, PeriodMap, PreferenceRow, Roster};
//!
//! let activities = vec![
//!     ActivityRow::new("Art", 12, 6).offered_in(["Aleph"]),
//!     ActivityRow::new("Soccer", 20, 0).offered_in(["Aleph"]),
//! ];
//! let preferences: Vec<_> = (0..5)
//!     .map(|i| PreferenceRow::new(format!("C{i}")).with_choices("Aleph", ["Art"]))
//!     .collect();
//! let roster = Roster::build(&activities, &preferences, &PeriodMap::new(["Aleph"])).unwrap();
//!
//! let allocation = Allocator::new().with_seed(1).allocate(&roster).unwrap();
//! let report = allocation.report(&roster);
//! // Five is below Art's minimum of six: Art is cancelled, everyone lands in Soccer.
//! assert!(report.stats_for("Art", "Aleph").unwrap().cancelled);
//! assert_eq!(report.stats_for("Soccer", "Aleph").unwrap().enrolled, 5);
//! ```

pub mod allocator;
pub mod error;
pub mod models;
pub mod priority;
pub mod report;
pub mod validation;

pub use allocator::{Allocation, Allocator, CapacityLedger};
pub use error::{AllocationError, ConsistencyError};
pub use models::Roster;
pub use report::{AllocationReport, OutcomeReporter};
pub use validation::{ValidationError, ValidationErrorKind};
