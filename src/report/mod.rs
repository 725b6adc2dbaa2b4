//! Outcome reporting and allocation quality metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Enrolled / Free | Seats taken and left per (activity, period) |
//! | Requested | Participants listing the activity for the period |
//! | Fill Rate | enrolled / capacity |
//! | Satisfaction | Placements per rank achieved, fallback, unassigned |
//! | Fully Assigned | Participants with an activity every period |
//! | Cumulative Score | prior + Σ 1/rank over preference placements |

mod reporter;
mod stats;

pub use reporter::{AllocationReport, OutcomeReporter, OutcomeRow};
pub use stats::{ActivityPeriodStats, AllocationSummary, FillStatus, SatisfactionHistogram};
