//! Period model.
//!
//! A period is a fixed schedule block (e.g. "Aleph", "Beth", "Gimmel").
//! Periods have no attributes beyond their name and their position in the
//! weekly cycle.
//!
//! Preference tables often label periods differently from the activity table
//! (abbreviations, column prefixes). [`PeriodMap`] resolves those labels to
//! canonical period names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A schedule block within one allocation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Canonical period name.
    pub name: String,
}

impl Period {
    /// Creates a period.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered period list plus label aliases used by the preference table.
///
/// Every period name is implicitly a label for itself.
///
/// # Example
///
/// ```
/// use u_allocate::models::PeriodMap;
///
/// let map = PeriodMap::new(["Aleph", "Beth"]).with_label("A", "Aleph");
/// assert_eq!(map.resolve("A"), Some("Aleph"));
/// assert_eq!(map.resolve("Beth"), Some("Beth"));
/// assert_eq!(map.resolve("Gimmel"), None);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodMap {
    /// Canonical period names in cycle order.
    pub periods: Vec<String>,
    /// Preference-table label → canonical period name.
    pub labels: HashMap<String, String>,
}

impl PeriodMap {
    /// Creates a map over the given periods, in cycle order.
    pub fn new<I, S>(periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            periods: periods.into_iter().map(Into::into).collect(),
            labels: HashMap::new(),
        }
    }

    /// Adds a label alias for a period.
    pub fn with_label(mut self, label: impl Into<String>, period: impl Into<String>) -> Self {
        self.labels
            .insert(label.into().trim().to_string(), period.into());
        self
    }

    /// Resolves a preference-table label to a canonical period name.
    ///
    /// Explicit labels win over period names.
    /// Surrounding whitespace is ignored on both sides; the returned name
    /// is trimmed.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        let label = label.trim();
        if let Some(period) = self.labels.get(label) {
            return Some(period.trim());
        }
        self.periods
            .iter()
            .map(|p| p.trim())
            .find(|p| *p == label)
    }

    /// Position of a canonical period name in cycle order.
    pub fn position(&self, period: &str) -> Option<usize> {
        let period = period.trim();
        self.periods.iter().position(|p| p.trim() == period)
    }
}
