//! Property tests over generated camps.

use std::collections::HashSet;

use proptest::prelude::*;
use u_allocate::allocator::Allocator;
use u_allocate::models::{ActivityRow, Placement, PeriodMap, PreferenceRow, Roster};

const PERIODS: [&str; 3] = ["Aleph", "Beth", "Gimmel"];

type ActivitySeed = (u32, u32, u8);
type ParticipantSeed = Vec<Vec<Option<usize>>>;

fn build(activities: &[ActivitySeed], participants: &[ParticipantSeed]) -> Roster {
    let activity_rows: Vec<_> = activities
        .iter()
        .enumerate()
        .map(|(i, &(capacity, minimum, mask))| {
            let offered = PERIODS
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, p)| *p);
            ActivityRow::new(format!("H{i}"), capacity, minimum % (capacity + 1)).offered_in(offered)
        })
        .collect();

    let preference_rows: Vec<_> = participants
        .iter()
        .enumerate()
        .map(|(j, periods)| {
            let mut row = PreferenceRow::new(format!("C{j:02}"));
            for (period, choices) in PERIODS.iter().zip(periods) {
                let names: Vec<String> = choices
                    .iter()
                    .map(|c| match c {
                        Some(i) => format!("H{}", i % activities.len()),
                        None => String::new(),
                    })
                    .collect();
                row = row.with_choices(*period, names);
            }
            row
        })
        .collect();

    Roster::build(&activity_rows, &preference_rows, &PeriodMap::new(PERIODS))
        .expect("generated tables are valid")
}

fn camp() -> impl Strategy<Value = (Vec<ActivitySeed>, Vec<ParticipantSeed>)> {
    (
        proptest::collection::vec((1u32..=6, 0u32..=6, 1u8..8), 1..=5),
        proptest::collection::vec(
            proptest::collection::vec(
                proptest::collection::vec(proptest::option::of(0usize..5), 0..=4),
                PERIODS.len(),
            ),
            0..=20,
        ),
    )
}

proptest! {
    #[test]
    fn capacity_and_minimum_hold((activities, participants) in camp(), seed in any::<u64>()) {
        let roster = build(&activities, &participants);
        let allocation = Allocator::new().with_seed(seed).allocate(&roster).unwrap();
        let report = allocation.report(&roster);

        for stats in &report.activity_stats {
            prop_assert!(stats.enrolled <= stats.capacity);
            if stats.cancelled {
                prop_assert_eq!(stats.enrolled, 0);
            } else {
                prop_assert!(stats.enrolled >= stats.minimum);
            }
            let listed = allocation.assignments().enrolled(&stats.activity, &stats.period);
            prop_assert_eq!(listed.len() as u32, stats.enrolled);
        }
    }

    #[test]
    fn one_outcome_per_pair_and_no_repeats((activities, participants) in camp(), seed in any::<u64>()) {
        let roster = build(&activities, &participants);
        let allocation = Allocator::new().with_seed(seed).allocate(&roster).unwrap();
        let set = allocation.assignments();

        prop_assert_eq!(set.len(), roster.participant_count() * PERIODS.len());
        for participant in roster.participants() {
            let outcomes = set.for_participant(&participant.id);
            let periods: HashSet<_> = outcomes.iter().map(|a| a.period.as_str()).collect();
            prop_assert_eq!(periods.len(), PERIODS.len());

            let held: Vec<_> = outcomes.iter().filter_map(|a| a.activity()).collect();
            let distinct: HashSet<_> = held.iter().collect();
            prop_assert_eq!(distinct.len(), held.len());
        }
    }

    #[test]
    fn preference_ranks_match_listed_choices((activities, participants) in camp(), seed in any::<u64>()) {
        let roster = build(&activities, &participants);
        let allocation = Allocator::new().with_seed(seed).allocate(&roster).unwrap();

        for assignment in allocation.assignments() {
            if let Placement::Preference { activity, rank } = &assignment.placement {
                let participant = roster.find_participant(&assignment.participant_id).unwrap();
                let period = roster.find_period(&assignment.period).unwrap();
                let expected = roster.find_activity(activity).unwrap();
                let choices = roster.participant(participant).choices(period);
                prop_assert_eq!(choices[*rank as usize - 1], Some(expected));
            }
        }
    }

    #[test]
    fn unassigned_only_when_nothing_open((activities, participants) in camp(), seed in any::<u64>()) {
        let roster = build(&activities, &participants);
        let allocation = Allocator::new().with_seed(seed).allocate(&roster).unwrap();
        let set = allocation.assignments();
        let report = allocation.report(&roster);

        for unassigned in set.unassigned() {
            let elsewhere: HashSet<_> = set
                .for_participant(&unassigned.participant_id)
                .iter()
                .filter_map(|a| a.activity())
                .collect();
            for stats in report.activity_stats.iter().filter(|s| s.period == unassigned.period) {
                if stats.cancelled || elsewhere.contains(stats.activity.as_str()) {
                    continue;
                }
                prop_assert_eq!(stats.free, 0);
            }
        }
    }

    #[test]
    fn same_seed_same_allocation((activities, participants) in camp(), seed in any::<u64>()) {
        let roster = build(&activities, &participants);
        let first = Allocator::new().with_seed(seed).allocate(&roster).unwrap();
        let second = Allocator::new().with_seed(seed).allocate(&roster).unwrap();
        prop_assert_eq!(first.assignments(), second.assignments());
        prop_assert_eq!(first.report(&roster), second.report(&roster));
    }
}
