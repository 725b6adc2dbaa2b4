//! Input validation for allocation rosters.
//!
//! Checks structural integrity of the activity table, preference table and
//! period map before a [`Roster`](crate::models::Roster) is built. Detects:
//! - Duplicate IDs (activities, participants, periods)
//! - Minimum enrollment above capacity, zero capacity
//! - References to unknown activities or periods
//! - Preference labels with no period mapping
//! - Non-finite prior cumulative scores
//!
//! All problems are collected so the ingestion layer can report them in one
//! pass. Nothing is partially applied: a table that fails validation never
//! produces a roster.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::models::{ActivityRow, PeriodMap, PreferenceRow};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID or name.
    DuplicateId,
    /// An ID or name is empty.
    EmptyId,
    /// An activity's minimum exceeds its capacity.
    MinimumExceedsCapacity,
    /// An activity has zero capacity.
    ZeroCapacity,
    /// A preference names an activity absent from the activity table.
    UnknownActivity,
    /// An activity or label refers to a period not in the period map.
    UnknownPeriod,
    /// A preference label has no period mapping.
    UnmappedPeriod,
    /// A participant supplied two choice lists for the same period.
    DuplicatePeriodChoices,
    /// A prior cumulative score is NaN or infinite.
    InvalidScore,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input tables for an allocation run.
///
/// Checks:
/// 1. Period names are non-empty and unique; labels map to known periods
/// 2. Activity names are non-empty and unique
/// 3. Every activity has `capacity > 0` and `minimum <= capacity`
/// 4. Every activity is offered only in known periods
/// 5. Participant IDs are non-empty and unique
/// 6. Every preference label resolves to a period, at most once per row
/// 7. Every preferred activity exists in the activity table
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_tables(
    activities: &[ActivityRow],
    preferences: &[PreferenceRow],
    periods: &PeriodMap,
) -> ValidationResult {
    let mut errors = Vec::new();

    // Periods
    let mut period_names = HashSet::new();
    for name in &periods.periods {
        let name = name.trim();
        if name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Period with empty name",
            ));
        } else if !period_names.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate period: {name}"),
            ));
        }
    }
    let mut labels: Vec<_> = periods.labels.iter().collect();
    labels.sort();
    for (label, target) in labels {
        if !period_names.contains(target.trim()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPeriod,
                format!("Period label '{label}' maps to unknown period '{target}'"),
            ));
        }
    }

    // Activities
    let mut activity_names = HashSet::new();
    for row in activities {
        let name = row.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Activity with empty name",
            ));
            continue;
        }
        if !activity_names.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate activity: {name}"),
            ));
        }
        if row.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("Activity '{name}' has zero capacity"),
            ));
        }
        if row.minimum > row.capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::MinimumExceedsCapacity,
                format!(
                    "Activity '{name}' minimum {} exceeds capacity {}",
                    row.minimum, row.capacity
                ),
            ));
        }
        for period in &row.periods {
            if !period_names.contains(period.trim()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPeriod,
                    format!("Activity '{name}' is offered in unknown period '{period}'"),
                ));
            }
        }
    }

    // Participants
    let mut participant_ids = HashSet::new();
    for row in preferences {
        let id = row.participant_id.trim();
        if id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Preference row with empty participant ID",
            ));
            continue;
        }
        if !participant_ids.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate participant ID: {id}"),
            ));
        }

        let mut seen_periods = HashSet::new();
        for choices in &row.choices {
            match periods.resolve(&choices.label) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnmappedPeriod,
                    format!(
                        "Participant '{id}' has choices for unmapped period '{}'",
                        choices.label
                    ),
                )),
                Some(period) => {
                    if !seen_periods.insert(period) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::DuplicatePeriodChoices,
                            format!("Participant '{id}' lists choices for '{period}' twice"),
                        ));
                    }
                }
            }

            for activity in choices.ranked.iter().flatten() {
                if !activity_names.contains(activity.trim()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownActivity,
                        format!("Participant '{id}' prefers unknown activity '{activity}'"),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates prior cumulative scores for a multi-cycle run.
///
/// Every score must be finite. Offending IDs are reported in sorted order.
pub fn validate_scores(scores: &HashMap<String, f64>) -> ValidationResult {
    let mut invalid: Vec<_> = scores
        .iter()
        .filter(|(_, score)| !score.is_finite())
        .collect();
    invalid.sort_by(|a, b| a.0.cmp(b.0));

    if invalid.is_empty() {
        return Ok(());
    }
    Err(invalid
        .into_iter()
        .map(|(id, score)| {
            ValidationError::new(
                ValidationErrorKind::InvalidScore,
                format!("Participant '{id}' has non-finite prior score {score}"),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> PeriodMap {
        PeriodMap::new(["Aleph", "Beth", "Gimmel"]).with_label("A", "Aleph")
    }

    fn activities() -> Vec<ActivityRow> {
        vec![
            ActivityRow::new("Art", 12, 6).offered_in(["Aleph", "Beth"]),
            ActivityRow::new("Soccer", 20, 8).offered_in(["Aleph", "Beth", "Gimmel"]),
        ]
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        let prefs = vec![
            PreferenceRow::new("C1").with_choices("A", ["Art", "", "Soccer"]),
            PreferenceRow::new("C2").with_choices("Beth", ["Soccer"]),
        ];
        assert!(validate_tables(&activities(), &prefs, &periods()).is_ok());
    }

    #[test]
    fn test_minimum_exceeds_capacity() {
        let acts = vec![ActivityRow::new("Art", 5, 6).offered_in(["Aleph"])];
        let errors = validate_tables(&acts, &[], &periods()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::MinimumExceedsCapacity));
        assert!(errors[0].message.contains("Art"));
    }

    #[test]
    fn test_zero_capacity() {
        let acts = vec![ActivityRow::new("Art", 0, 0)];
        let errors = validate_tables(&acts, &[], &periods()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::ZeroCapacity));
    }

    #[test]
    fn test_duplicate_activity() {
        let acts = vec![ActivityRow::new("Art", 5, 1), ActivityRow::new("Art", 6, 1)];
        let errors = validate_tables(&acts, &[], &periods()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("activity")));
    }

    #[test]
    fn test_duplicate_participant() {
        let prefs = vec![PreferenceRow::new("C1"), PreferenceRow::new("C1")];
        let errors = validate_tables(&activities(), &prefs, &periods()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("C1")));
    }

    #[test]
    fn test_unknown_activity_reference() {
        let prefs = vec![PreferenceRow::new("C1").with_choices("Aleph", ["Archery"])];
        let errors = validate_tables(&activities(), &prefs, &periods()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UnknownActivity));
    }

    #[test]
    fn test_unmapped_period_label() {
        let prefs = vec![PreferenceRow::new("C1").with_choices("Dalet", ["Art"])];
        let errors = validate_tables(&activities(), &prefs, &periods()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UnmappedPeriod));
    }

    #[test]
    fn test_label_to_unknown_period() {
        let map = periods().with_label("D", "Dalet");
        let errors = validate_tables(&activities(), &[], &map).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UnknownPeriod));
    }

    #[test]
    fn test_activity_in_unknown_period() {
        let acts = vec![ActivityRow::new("Art", 5, 1).offered_in(["Dalet"])];
        let errors = validate_tables(&acts, &[], &periods()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UnknownPeriod));
    }

    #[test]
    fn test_same_period_twice() {
        let prefs = vec![PreferenceRow::new("C1")
            .with_choices("A", ["Art"])
            .with_choices("Aleph", ["Soccer"])];
        let errors = validate_tables(&activities(), &prefs, &periods()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicatePeriodChoices));
    }

    #[test]
    fn test_empty_ids() {
        let acts = vec![ActivityRow::new("  ", 5, 1)];
        let prefs = vec![PreferenceRow::new("")];
        let errors = validate_tables(&acts, &prefs, &periods()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::EmptyId)
                .count(),
            2
        );
    }

    #[test]
    fn test_period_names_compared_trimmed() {
        let map = PeriodMap::new(["Aleph", "Aleph ", "Beth"]);
        let errors = validate_tables(&[], &[], &map).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateId));
        assert!(errors[0].message.contains("period"));
    }

    #[test]
    fn test_padded_period_name_resolves() {
        let map = PeriodMap::new([" Aleph", "Beth"]).with_label("A", " Aleph ");
        let acts = vec![ActivityRow::new("Art", 5, 1).offered_in([" Aleph"])];
        let prefs = vec![
            PreferenceRow::new("C1").with_choices(" Aleph", ["Art"]),
            PreferenceRow::new("C2").with_choices("A", ["Art"]),
        ];
        assert!(validate_tables(&acts, &prefs, &map).is_ok());
    }

    #[test]
    fn test_non_finite_scores() {
        let scores = HashMap::from([
            ("C1".to_string(), 1.5),
            ("C2".to_string(), f64::NAN),
            ("C3".to_string(), f64::INFINITY),
        ]);
        let errors = validate_scores(&scores).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::InvalidScore));
        assert!(errors[0].message.contains("C2"));
        assert!(validate_scores(&HashMap::from([("C1".to_string(), 0.0)])).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let acts = vec![ActivityRow::new("Art", 5, 9)];
        let prefs = vec![PreferenceRow::new("C1").with_choices("Nowhere", ["Kayak"])];
        let errors = validate_tables(&acts, &prefs, &periods()).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
