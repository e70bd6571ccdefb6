//! Property tests over small random acyclic instances

use dayplan::search::bfs::{self, EnumerateOptions};
use dayplan::search::capacity::{minimum_capacity, CapacityOutcome, CapacityQuery};
use dayplan::search::{solve, Algorithm, CapacityScheme, Problem, SharingPolicy};
use dayplan::{Task, TaskGraph, TaskId};
use proptest::prelude::*;

/// Costs plus a prerequisite mask over earlier tasks, so graphs are acyclic
fn tasks() -> impl Strategy<Value = Vec<(u32, Vec<bool>)>> {
    prop::collection::vec((1u32..=3, prop::collection::vec(any::<bool>(), 4)), 1..=4)
}

fn build(layout: &[(u32, Vec<bool>)]) -> TaskGraph {
    TaskGraph::from_tasks(layout.iter().enumerate().map(|(i, (cost, mask))| {
        let deps = (0..i)
            .filter(|j| mask[*j])
            .map(|j| TaskId::new(j as u32 + 1));
        Task::new(TaskId::new(i as u32 + 1), *cost).with_prerequisites(deps)
    }))
    .unwrap()
}

/// Uniform or per-class channels, each big enough for any task, with an
/// optional daily task limit
fn schemes() -> impl Strategy<Value = CapacityScheme> {
    let channels = prop_oneof![
        (1usize..=2, 3u32..=4)
            .prop_map(|(count, capacity)| CapacityScheme::uniform(count, capacity).unwrap()),
        (3u32..=4, 3u32..=4).prop_map(|(even, odd)| CapacityScheme::per_class(even, odd)),
    ];
    (channels, prop::option::of(1u32..=2))
        .prop_map(|(scheme, limit)| scheme.with_tasks_per_day(limit).unwrap())
}

fn policy(delayed: bool) -> SharingPolicy {
    if delayed {
        SharingPolicy::Delayed
    } else {
        SharingPolicy::Instant
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_strategy_finds_the_enumerated_optimum(
        layout in tasks(),
        scheme in schemes(),
        delayed in any::<bool>(),
    ) {
        let graph = build(&layout);
        let problem = Problem::new(&graph, &scheme, policy(delayed));
        let horizon = problem.default_horizon();

        let optimum = bfs::enumerate(problem, EnumerateOptions::new(horizon)).earliest_day();
        prop_assert!(optimum.is_some());

        for algorithm in Algorithm::ALL {
            let report = solve(problem, algorithm, horizon);
            prop_assert_eq!(report.day(), optimum, "{}", algorithm);
            let schedule = report.schedule().unwrap();
            prop_assert_eq!(schedule.validate(problem, horizon), Ok(()));
        }
    }

    #[test]
    fn enumerated_schedules_validate(
        layout in tasks(),
        scheme in schemes(),
        delayed in any::<bool>(),
    ) {
        let graph = build(&layout);
        let problem = Problem::new(&graph, &scheme, policy(delayed));
        let days = problem.default_horizon();

        let result = bfs::enumerate(problem, EnumerateOptions::new(days).with_limit(Some(200)));
        for schedule in &result.schedules {
            prop_assert_eq!(schedule.validate(problem, days), Ok(()));
        }
    }

    #[test]
    fn minimum_capacity_never_grows_with_the_deadline(
        layout in tasks(),
        channels in 1usize..=2,
        delayed in any::<bool>(),
    ) {
        let graph = build(&layout);
        let mut previous = u32::MAX;

        for deadline in 1..=layout.len() as u32 {
            let query = CapacityQuery {
                channels,
                deadline,
                policy: policy(delayed),
                algorithm: Algorithm::Astar,
                tasks_per_day: None,
            };
            let report = minimum_capacity(&graph, &query).unwrap();
            match report.outcome {
                CapacityOutcome::Found { capacity, .. } => {
                    prop_assert!(
                        capacity <= previous,
                        "deadline {} needs {} after {}",
                        deadline,
                        capacity,
                        previous
                    );
                    previous = capacity;
                }
                CapacityOutcome::Impossible { .. } => {
                    // A tighter deadline was impossible, so nothing to compare yet
                    prop_assert_eq!(previous, u32::MAX);
                }
            }
        }
    }
}
