//! A* search
//!
//! Nodes are ordered by `day + h`, where `h` is the [`Heuristic`] bound on
//! days still needed. Ties go to the node generated first. A state is only
//! kept if no state with the same progress was reached on the same or an
//! earlier day, and nodes whose bound already exceeds the day limit are never
//! queued.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::heuristic::Heuristic;
use super::outcome::SearchReport;
use super::state::{ProgressKey, SchedulingState};
use super::successor::SuccessorGenerator;
use super::tree::SearchTree;
use super::Problem;

/// Finds one earliest schedule within `max_day`
pub fn search(problem: Problem<'_>, max_day: u32) -> SearchReport {
    let gen = SuccessorGenerator::new(problem);
    let heuristic = Heuristic::new(problem);

    let initial = SchedulingState::initial(&problem);
    let Some(h) = heuristic.estimate(&initial) else {
        tracing::debug!("initial state cannot reach the goal");
        return SearchReport::no_solution(max_day, 0);
    };
    if initial.day + h > max_day {
        return SearchReport::no_solution(max_day, 0);
    }

    let mut best_day: HashMap<ProgressKey, u32> = HashMap::new();
    best_day.insert(initial.progress_key(), initial.day);

    let (mut tree, root) = SearchTree::with_root(initial);
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;
    frontier.push(Reverse((1 + h, seq, root)));
    let mut nodes_expanded = 0;

    while let Some(Reverse((_, _, node))) = frontier.pop() {
        let state = tree.state(node).clone();

        // Superseded by the same progress on an earlier day
        if best_day
            .get(&state.progress_key())
            .is_some_and(|day| *day < state.day)
        {
            continue;
        }
        nodes_expanded += 1;

        if state.is_goal() {
            tracing::debug!(
                day = state.day,
                nodes = nodes_expanded,
                generated = tree.len(),
                "A* search solved"
            );
            return SearchReport::solved(state.day, tree.schedule(node), nodes_expanded);
        }

        for mv in gen.moves(&state) {
            let next = gen.successor(&state, mv);
            if next.day > max_day {
                continue;
            }
            let key = next.progress_key();
            if best_day.get(&key).is_some_and(|day| *day <= next.day) {
                continue;
            }
            let Some(h) = heuristic.estimate(&next) else {
                continue;
            };
            let f = next.day.saturating_add(h);
            if f > max_day {
                continue;
            }

            best_day.insert(key, next.day);
            let child = tree.push(node, gen.entry(&state, mv), next);
            seq += 1;
            frontier.push(Reverse((f, seq, child)));
        }
    }

    tracing::debug!(max_day, nodes = nodes_expanded, "A* search exhausted");
    SearchReport::no_solution(max_day, nodes_expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::graph;
    use crate::search::{bfs, CapacityScheme, SharingPolicy};

    #[test]
    fn agrees_with_breadth_first() {
        let fixtures = [
            graph(&[(1, 1, &[]), (2, 1, &[]), (3, 2, &[]), (4, 2, &[])]),
            graph(&[(1, 2, &[]), (2, 1, &[1]), (3, 1, &[]), (4, 2, &[3])]),
            graph(&[(1, 1, &[]), (2, 1, &[1]), (3, 1, &[2]), (4, 1, &[])]),
        ];
        let schemes = [
            CapacityScheme::uniform(1, 2).unwrap(),
            CapacityScheme::uniform(2, 3).unwrap(),
            CapacityScheme::per_class(3, 3),
        ];

        for g in &fixtures {
            for scheme in &schemes {
                for policy in [SharingPolicy::Instant, SharingPolicy::Delayed] {
                    let problem = Problem::new(g, scheme, policy);
                    let expected = bfs::earliest(problem, 10);
                    let report = search(problem, 10);
                    assert_eq!(report.day(), expected.day(), "{scheme:?} {policy}");
                    if let Some(schedule) = report.schedule() {
                        assert_eq!(schedule.validate(problem, 10), Ok(()));
                    }
                }
            }
        }
    }

    #[test]
    fn deadline_prunes_everything() {
        let g = graph(&[(1, 1, &[]), (2, 1, &[1]), (3, 1, &[2])]);
        let scheme = CapacityScheme::uniform(2, 1).unwrap();
        let problem = Problem::new(&g, &scheme, SharingPolicy::Delayed);

        let report = search(problem, 2);
        assert_eq!(report.day(), None);
        // The root bound already exceeds the deadline
        assert_eq!(report.nodes_expanded, 0);

        assert_eq!(search(problem, 3).day(), Some(3));
    }

    #[test]
    fn unreachable_goal_has_no_solution() {
        let g = graph(&[(1, 1, &[2]), (2, 1, &[1])]);
        let scheme = CapacityScheme::uniform(1, 4).unwrap();
        let report = search(Problem::new(&g, &scheme, SharingPolicy::Instant), 50);
        assert_eq!(report.day(), None);
        assert_eq!(report.nodes_expanded, 0);
    }

    #[test]
    fn empty_graph_is_done_on_day_one() {
        let g = graph(&[]);
        let scheme = CapacityScheme::uniform(1, 1).unwrap();
        let report = search(Problem::new(&g, &scheme, SharingPolicy::Instant), 1);
        assert_eq!(report.day(), Some(1));
        assert!(report.schedule().unwrap().is_empty());
    }
}
