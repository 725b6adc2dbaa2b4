//! Roster: the validated, normalized input to one allocation run.
//!
//! Built once from the activity table, preference table and period map.
//! After construction the roster is immutable; all allocation-time state
//! lives in the [`CapacityLedger`](crate::allocator::CapacityLedger) and the
//! engine's per-run bookkeeping.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use super::activity::normalize_group;
use super::{
    Activity, ActivityIdx, ActivityRow, Participant, ParticipantIdx, Period, PeriodIdx,
    PeriodMap, PreferenceRow,
};
use crate::error::AllocationError;
use crate::validation::validate_tables;

/// Validated activities, periods and participant preferences.
///
/// Only [`Roster::build`] creates a roster, so every roster has passed
/// validation. It serializes for export but does not deserialize.
///
/// # Example
///
/// ```
/// use u_allocate::models::{ActivityRow, PeriodMap, PreferenceRow, Roster};
///
/// let roster = Roster::build(
///     &[ActivityRow::new("Soccer", 20, 0).offered_in(["Aleph"])],
///     &[PreferenceRow::new("C1").with_choices("Aleph", ["Soccer"])],
///     &PeriodMap::new(["Aleph"]),
/// )
/// .unwrap();
/// assert_eq!(roster.participant_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    periods: Vec<Period>,
    activities: Vec<Activity>,
    participants: Vec<Participant>,
    #[serde(skip)]
    activity_lookup: HashMap<String, ActivityIdx>,
}

impl Roster {
    /// Validates the input tables and builds a roster.
    ///
    /// Fails with [`AllocationError::Validation`] carrying every detected
    /// problem; nothing is built from invalid input. Participants keep the
    /// preference table's row order; activities keep the activity table's.
    pub fn build(
        activity_rows: &[ActivityRow],
        preference_rows: &[PreferenceRow],
        period_map: &PeriodMap,
    ) -> Result<Self, AllocationError> {
        validate_tables(activity_rows, preference_rows, period_map)?;

        let periods: Vec<Period> = period_map
            .periods
            .iter()
            .map(|name| Period::new(name.trim()))
            .collect();
        let period_lookup: HashMap<&str, PeriodIdx> = periods
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.as_str(), PeriodIdx(i)))
            .collect();

        let activities: Vec<Activity> = activity_rows
            .iter()
            .map(|row| Activity {
                name: row.name.trim().to_string(),
                capacity: row.capacity,
                minimum: row.minimum,
                offered: row
                    .periods
                    .iter()
                    .filter_map(|p| period_lookup.get(p.trim()).copied())
                    .collect::<BTreeSet<_>>(),
                group: normalize_group(row.group.as_deref()),
            })
            .collect();
        let activity_lookup: HashMap<String, ActivityIdx> = activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), ActivityIdx(i)))
            .collect();

        let participants = preference_rows
            .iter()
            .map(|row| {
                let mut preferences = vec![Vec::new(); periods.len()];
                for choices in &row.choices {
                    let Some(period) = period_map
                        .resolve(&choices.label)
                        .and_then(|name| period_lookup.get(name))
                    else {
                        continue;
                    };
                    preferences[period.0] = rank_slots(
                        row.participant_id.trim(),
                        &periods[period.0].name,
                        &choices.ranked,
                        &activity_lookup,
                    );
                }
                Participant {
                    id: row.participant_id.trim().to_string(),
                    group: normalize_group(row.group.as_deref()),
                    missed_first_choice: row.missed_first_choice,
                    preferences,
                }
            })
            .collect();

        Ok(Self {
            periods,
            activities,
            participants,
            activity_lookup,
        })
    }

    /// Periods in cycle order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Activities in table order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Participants in table order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Number of periods.
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Number of activities.
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Number of participants.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Returns a period by index.
    pub fn period(&self, idx: PeriodIdx) -> &Period {
        &self.periods[idx.0]
    }

    /// Returns an activity by index.
    pub fn activity(&self, idx: ActivityIdx) -> &Activity {
        &self.activities[idx.0]
    }

    /// Returns a participant by index.
    pub fn participant(&self, idx: ParticipantIdx) -> &Participant {
        &self.participants[idx.0]
    }

    /// Period indices in cycle order.
    pub fn period_indices(&self) -> impl Iterator<Item = PeriodIdx> {
        (0..self.periods.len()).map(PeriodIdx)
    }

    /// Activity indices in table order.
    pub fn activity_indices(&self) -> impl Iterator<Item = ActivityIdx> {
        (0..self.activities.len()).map(ActivityIdx)
    }

    /// Participant indices in table order.
    pub fn participant_indices(&self) -> impl Iterator<Item = ParticipantIdx> {
        (0..self.participants.len()).map(ParticipantIdx)
    }

    /// Activities scheduled in a period, in table order.
    pub fn activities_in(&self, period: PeriodIdx) -> impl Iterator<Item = ActivityIdx> + '_ {
        self.activity_indices()
            .filter(move |&a| self.activity(a).offers(period))
    }

    /// Looks up an activity by name.
    pub fn find_activity(&self, name: &str) -> Option<ActivityIdx> {
        self.activity_lookup.get(name).copied()
    }

    /// Looks up a period by name.
    pub fn find_period(&self, name: &str) -> Option<PeriodIdx> {
        self.periods.iter().position(|p| p.name == name).map(PeriodIdx)
    }

    /// Looks up a participant by camper ID.
    pub fn find_participant(&self, id: &str) -> Option<ParticipantIdx> {
        self.participants
            .iter()
            .position(|p| p.id == id)
            .map(ParticipantIdx)
    }
}

/// Resolves ranked activity names to indices, keeping blanks in place.
///
/// A repeated activity keeps its first rank; later repeats become blanks so
/// every remaining choice keeps its literal rank.
fn rank_slots(
    participant: &str,
    period: &str,
    ranked: &[Option<String>],
    lookup: &HashMap<String, ActivityIdx>,
) -> Vec<Option<ActivityIdx>> {
    let mut seen = BTreeSet::new();
    ranked
        .iter()
        .zip(1u32..)
        .map(|(cell, rank)| {
            let activity = lookup.get(cell.as_deref()?.trim()).copied()?;
            if seen.insert(activity) {
                Some(activity)
            } else {
                warn!(participant, period, rank, "duplicate choice blanked");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn activity_rows() -> Vec<ActivityRow> {
        vec![
            ActivityRow::new("Art", 12, 6).offered_in(["Aleph", "Beth"]),
            ActivityRow::new("Soccer", 20, 8)
                .offered_in(["Aleph", "Beth", "Gimmel"])
                .with_group("All"),
            ActivityRow::new("Drama", 10, 0)
                .offered_in(["Gimmel"])
                .with_group("Older"),
        ]
    }

    fn period_map() -> PeriodMap {
        PeriodMap::new(["Aleph", "Beth", "Gimmel"]).with_label("G", "Gimmel")
    }

    #[test]
    fn test_build_normalizes_tables() {
        let prefs = vec![
            PreferenceRow::new("C1")
                .with_group("Older")
                .with_choices("Aleph", ["Art", "", "Soccer"])
                .with_choices("G", ["Drama"]),
            PreferenceRow::new("C2"),
        ];
        let roster = Roster::build(&activity_rows(), &prefs, &period_map()).unwrap();

        assert_eq!(roster.period_count(), 3);
        assert_eq!(roster.activity_count(), 3);
        assert_eq!(roster.participant_count(), 2);

        let art = roster.find_activity("Art").unwrap();
        let soccer = roster.find_activity("Soccer").unwrap();
        let drama = roster.find_activity("Drama").unwrap();
        let c1 = roster.participant(ParticipantIdx(0));
        assert_eq!(c1.choices(PeriodIdx(0)), &[Some(art), None, Some(soccer)]);
        assert!(c1.choices(PeriodIdx(1)).is_empty());
        assert_eq!(c1.choices(PeriodIdx(2)), &[Some(drama)]);

        assert!(roster.activity(soccer).group.is_none());
        assert_eq!(roster.activity(drama).group.as_deref(), Some("Older"));
    }

    #[test]
    fn test_rank_is_literal_position() {
        let prefs =
            vec![PreferenceRow::new("C1").with_choices("Aleph", ["", "", "Soccer"])];
        let roster = Roster::build(&activity_rows(), &prefs, &period_map()).unwrap();
        let ranked: Vec<_> = roster
            .participant(ParticipantIdx(0))
            .ranked_choices(PeriodIdx(0))
            .collect();
        assert_eq!(ranked, vec![(3, roster.find_activity("Soccer").unwrap())]);
    }

    #[test]
    fn test_duplicate_choice_blanked() {
        let prefs = vec![PreferenceRow::new("C1").with_choices("Aleph", ["Art", "Art", "Soccer"])];
        let roster = Roster::build(&activity_rows(), &prefs, &period_map()).unwrap();
        let slots = roster.participant(ParticipantIdx(0)).choices(PeriodIdx(0));
        assert_eq!(slots.len(), 3);
        assert!(slots[0].is_some());
        assert!(slots[1].is_none());
        assert!(slots[2].is_some());
    }

    #[test]
    fn test_activities_in_period() {
        let roster = Roster::build(&activity_rows(), &[], &period_map()).unwrap();
        let names: Vec<_> = roster
            .activities_in(PeriodIdx(2))
            .map(|a| roster.activity(a).name.as_str())
            .collect();
        assert_eq!(names, vec!["Soccer", "Drama"]);
    }

    #[test]
    fn test_build_rejects_invalid_tables() {
        let acts = vec![ActivityRow::new("Art", 4, 6).offered_in(["Aleph"])];
        let prefs = vec![PreferenceRow::new("C1").with_choices("Aleph", ["Kayak"])];
        let err = Roster::build(&acts, &prefs, &period_map()).unwrap_err();
        match err {
            AllocationError::Validation(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::MinimumExceedsCapacity));
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::UnknownActivity));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_padded_period_names_build_one_period_each() {
        let map = PeriodMap::new([" Aleph", "Beth"]);
        let acts = vec![ActivityRow::new("Soccer", 5, 0).offered_in(["Aleph "])];
        let prefs = vec![PreferenceRow::new("C1").with_choices(" Aleph", ["Soccer"])];
        let roster = Roster::build(&acts, &prefs, &map).unwrap();

        assert_eq!(roster.periods()[0].name, "Aleph");
        let soccer = roster.find_activity("Soccer").unwrap();
        assert!(roster.activity(soccer).offers(PeriodIdx(0)));
        assert!(!roster.activity(soccer).offers(PeriodIdx(1)));
        assert_eq!(roster.participant(ParticipantIdx(0)).choices(PeriodIdx(0)), &[Some(soccer)]);

        let err = Roster::build(&acts, &prefs, &PeriodMap::new(["Aleph", "Aleph "])).unwrap_err();
        assert!(matches!(err, AllocationError::Validation(_)));
    }

    #[test]
    fn test_roster_serializes_for_export() {
        let prefs = vec![PreferenceRow::new("C1").with_choices("Aleph", ["Art"])];
        let roster = Roster::build(&activity_rows(), &prefs, &period_map()).unwrap();
        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json["activities"][0]["name"], "Art");
        assert_eq!(json["participants"][0]["id"], "C1");
        assert!(json.get("activity_lookup").is_none());
    }

    #[test]
    fn test_lookups() {
        let prefs = vec![PreferenceRow::new("C9")];
        let roster = Roster::build(&activity_rows(), &prefs, &period_map()).unwrap();
        assert_eq!(roster.find_period("Beth"), Some(PeriodIdx(1)));
        assert_eq!(roster.find_participant("C9"), Some(ParticipantIdx(0)));
        assert_eq!(roster.find_activity("Kayak"), None);
    }
}
