//! Participant (camper) model.
//!
//! A participant submits, for each period, an ordered list of activity
//! choices. Rank 1 is the most preferred. Lists may be shorter than the
//! preference depth and may contain blanks; blanks are skipped without
//! renumbering, so rank 3 always means "the third listed choice".

use serde::{Deserialize, Serialize};

use super::{ActivityIdx, PeriodIdx};

/// Ranked choices for one period label, as supplied by the ingestion layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodChoices {
    /// Period label as it appears in the preference table.
    pub label: String,
    /// Activity names by rank; `None` = blank cell.
    pub ranked: Vec<Option<String>>,
}

/// One row of the preference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRow {
    /// Camper ID (unique within the table).
    pub participant_id: String,
    /// Participant group (e.g. "Younger"). `None` = ungrouped.
    pub group: Option<String>,
    /// Whether the participant missed their first choice last week.
    pub missed_first_choice: bool,
    /// Ranked choices per period label.
    pub choices: Vec<PeriodChoices>,
}

impl PreferenceRow {
    /// Creates a row with no choices.
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            group: None,
            missed_first_choice: false,
            choices: Vec::new(),
        }
    }

    /// Adds ranked choices for a period label.
    ///
    /// Empty or whitespace-only cells are recorded as blanks, keeping the
    /// rank position of every later choice.
    pub fn with_choices<I, S>(mut self, label: impl Into<String>, ranked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ranked = ranked
            .into_iter()
            .map(|cell| {
                let cell = cell.as_ref().trim();
                (!cell.is_empty()).then(|| cell.to_string())
            })
            .collect();
        self.choices.push(PeriodChoices {
            label: label.into(),
            ranked,
        });
        self
    }

    /// Sets the participant group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Marks the participant as having missed their first choice last week.
    pub fn with_missed_first_choice(mut self, missed: bool) -> Self {
        self.missed_first_choice = missed;
        self
    }
}

/// A validated participant within a [`Roster`](super::Roster).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Unique camper ID.
    pub id: String,
    /// Participant group; `None` = ungrouped.
    pub group: Option<String>,
    /// Missed their first choice last week.
    pub missed_first_choice: bool,
    /// Ranked choices indexed by period position; `None` = blank rank.
    pub preferences: Vec<Vec<Option<ActivityIdx>>>,
}

impl Participant {
    /// Raw ranked slots for a period (blanks included).
    pub fn choices(&self, period: PeriodIdx) -> &[Option<ActivityIdx>] {
        self.preferences
            .get(period.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-blank choices for a period as `(rank, activity)`, ranks 1-based.
    pub fn ranked_choices(
        &self,
        period: PeriodIdx,
    ) -> impl Iterator<Item = (u32, ActivityIdx)> + '_ {
        self.choices(period)
            .iter()
            .zip(1u32..)
            .filter_map(|(slot, rank)| slot.map(|activity| (rank, activity)))
    }

    /// Whether the participant listed any choice for the period.
    pub fn has_choices(&self, period: PeriodIdx) -> bool {
        self.choices(period).iter().any(Option::is_some)
    }

    /// Whether `activity` appears among the period's choices.
    pub fn lists(&self, period: PeriodIdx, activity: ActivityIdx) -> bool {
        self.choices(period).contains(&Some(activity))
    }
}
