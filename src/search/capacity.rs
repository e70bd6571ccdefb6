//! Capacity optimization
//!
//! Both optimizers first try the query with unlimited capacity (the whole
//! remaining cost fits in one day). If even that misses the deadline, no
//! finite capacity will meet it and the scan is skipped.

use serde::Serialize;

use super::channel::{CapacityScheme, SchemeError};
use super::outcome::{Infeasibility, Outcome, SearchReport};
use super::schedule::Schedule;
use super::{feasible, Algorithm, Problem, SharingPolicy};
use crate::domain::{ChannelClass, TaskGraph};

/// Smallest uniform capacity meeting a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityQuery {
    pub channels: usize,
    pub deadline: u32,
    pub policy: SharingPolicy,
    pub algorithm: Algorithm,
    pub tasks_per_day: Option<u32>,
}

impl CapacityQuery {
    fn scheme(&self, capacity: u32) -> Result<CapacityScheme, SchemeError> {
        CapacityScheme::uniform(self.channels, capacity)?.with_tasks_per_day(self.tasks_per_day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CapacityOutcome {
    Found {
        capacity: u32,
        day: u32,
        schedule: Schedule,
    },

    /// No capacity meets the deadline; `reason` is set when the cause is structural
    Impossible {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<Infeasibility>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    #[serde(flatten)]
    pub outcome: CapacityOutcome,

    /// Summed over every search run
    pub nodes_expanded: u64,

    /// Capacities tried, the unlimited check included
    pub attempts: u32,
}

/// Cheapest per-class capacity pair meeting a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostQuery {
    pub deadline: u32,
    pub even_unit_cost: u32,
    pub odd_unit_cost: u32,
    pub policy: SharingPolicy,
    pub algorithm: Algorithm,
    pub tasks_per_day: Option<u32>,
}

impl CostQuery {
    fn scheme(&self, even: u32, odd: u32) -> Result<CapacityScheme, SchemeError> {
        CapacityScheme::per_class(even, odd).with_tasks_per_day(self.tasks_per_day)
    }

    fn cost(&self, even: u32, odd: u32) -> u64 {
        u64::from(even) * u64::from(self.even_unit_cost)
            + u64::from(odd) * u64::from(self.odd_unit_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CostOutcome {
    Found {
        even_capacity: u32,
        odd_capacity: u32,
        cost: u64,
        day: u32,
        schedule: Schedule,
    },

    Impossible {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<Infeasibility>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostReport {
    #[serde(flatten)]
    pub outcome: CostOutcome,
    pub nodes_expanded: u64,

    /// Pairs actually searched
    pub candidates_evaluated: u32,

    /// Pairs dropped because they could not beat the best cost
    pub candidates_skipped: u32,
}

fn clamp(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Scans capacities upwards and returns the first one that meets the deadline
pub fn minimum_capacity(
    graph: &TaskGraph,
    query: &CapacityQuery,
) -> Result<CapacityReport, SchemeError> {
    let unlimited = clamp(graph.total_cost()).max(1);
    let floor = graph.max_cost().max(1);

    let mut nodes_expanded = 0;
    let mut attempts = 0;
    let mut run = |capacity: u32| -> Result<SearchReport, SchemeError> {
        let scheme = query.scheme(capacity)?;
        let report = feasible(
            Problem::new(graph, &scheme, query.policy),
            query.algorithm,
            query.deadline,
        );
        nodes_expanded += report.nodes_expanded;
        attempts += 1;
        tracing::debug!(capacity, solved = report.is_solved(), "capacity attempt");
        Ok(report)
    };

    let fallback = match run(unlimited)?.outcome {
        Outcome::Solved { day, schedule } => CapacityOutcome::Found {
            capacity: unlimited,
            day,
            schedule,
        },
        Outcome::Infeasible { reason } => CapacityOutcome::Impossible { reason: Some(reason) },
        Outcome::NoSolution { .. } => CapacityOutcome::Impossible { reason: None },
    };

    let mut outcome = fallback;
    if matches!(outcome, CapacityOutcome::Found { .. }) {
        for capacity in floor..unlimited {
            if let Outcome::Solved { day, schedule } = run(capacity)?.outcome {
                outcome = CapacityOutcome::Found {
                    capacity,
                    day,
                    schedule,
                };
                break;
            }
        }
    }

    match &outcome {
        CapacityOutcome::Found { capacity, day, .. } => {
            tracing::info!(capacity, day, attempts, "minimum capacity found")
        }
        CapacityOutcome::Impossible { .. } => {
            tracing::info!(deadline = query.deadline, attempts, "no capacity meets the deadline")
        }
    }
    Ok(CapacityReport {
        outcome,
        nodes_expanded,
        attempts,
    })
}

/// Capacities worth trying for one class: none if it has no work, otherwise
/// from its largest task up to its whole workload
fn class_range(graph: &TaskGraph, class: ChannelClass) -> (u32, u32) {
    let total = clamp(graph.class_cost(class));
    if total == 0 {
        (0, 0)
    } else {
        (graph.max_class_cost(class), total)
    }
}

/// Searches the capacity grid for the cheapest pair that meets the deadline.
///
/// Cost is not monotone along the grid, so every pair is a candidate; only
/// pairs that already cost at least the running best are skipped.
pub fn minimum_cost(graph: &TaskGraph, query: &CostQuery) -> Result<CostReport, SchemeError> {
    let (even_floor, even_total) = class_range(graph, ChannelClass::Even);
    let (odd_floor, odd_total) = class_range(graph, ChannelClass::Odd);

    let mut report = CostReport {
        outcome: CostOutcome::Impossible { reason: None },
        nodes_expanded: 0,
        candidates_evaluated: 0,
        candidates_skipped: 0,
    };
    let run = |report: &mut CostReport, even: u32, odd: u32| -> Result<SearchReport, SchemeError> {
        let scheme = query.scheme(even, odd)?;
        let result = feasible(
            Problem::new(graph, &scheme, query.policy),
            query.algorithm,
            query.deadline,
        );
        report.nodes_expanded += result.nodes_expanded;
        report.candidates_evaluated += 1;
        Ok(result)
    };

    let mut best = match run(&mut report, even_total, odd_total)?.outcome {
        Outcome::Solved { day, schedule } => (even_total, odd_total, day, schedule),
        Outcome::Infeasible { reason } => {
            report.outcome = CostOutcome::Impossible { reason: Some(reason) };
            return Ok(report);
        }
        Outcome::NoSolution { .. } => {
            tracing::info!(deadline = query.deadline, "no capacity pair meets the deadline");
            return Ok(report);
        }
    };
    let mut best_cost = query.cost(even_total, odd_total);

    for even in even_floor..=even_total {
        for odd in odd_floor..=odd_total {
            if (even, odd) == (even_total, odd_total) {
                continue;
            }
            if query.cost(even, odd) >= best_cost {
                report.candidates_skipped += 1;
                // Larger odd capacities only cost more
                if query.odd_unit_cost > 0 {
                    report.candidates_skipped += odd_total - odd - u32::from(even == even_total);
                    break;
                }
                continue;
            }

            if let Outcome::Solved { day, schedule } = run(&mut report, even, odd)?.outcome {
                tracing::debug!(even, odd, cost = query.cost(even, odd), "cheaper capacity pair");
                best_cost = query.cost(even, odd);
                best = (even, odd, day, schedule);
            }
        }
    }

    let (even_capacity, odd_capacity, day, schedule) = best;
    tracing::info!(
        even_capacity,
        odd_capacity,
        cost = best_cost,
        evaluated = report.candidates_evaluated,
        skipped = report.candidates_skipped,
        "minimum cost found"
    );
    report.outcome = CostOutcome::Found {
        even_capacity,
        odd_capacity,
        cost: best_cost,
        day,
        schedule,
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::graph;

    fn capacity_query(deadline: u32) -> CapacityQuery {
        CapacityQuery {
            channels: 1,
            deadline,
            policy: SharingPolicy::Instant,
            algorithm: Algorithm::Astar,
            tasks_per_day: None,
        }
    }

    fn cost_query(deadline: u32, even_unit_cost: u32, odd_unit_cost: u32) -> CostQuery {
        CostQuery {
            deadline,
            even_unit_cost,
            odd_unit_cost,
            policy: SharingPolicy::Instant,
            algorithm: Algorithm::Astar,
            tasks_per_day: None,
        }
    }

    #[test]
    fn whole_workload_in_one_day() {
        let g = graph(&[(1, 2, &[]), (2, 2, &[]), (3, 3, &[])]);
        let report = minimum_capacity(&g, &capacity_query(1)).unwrap();

        match report.outcome {
            CapacityOutcome::Found { capacity, day, .. } => {
                assert_eq!(capacity, 7);
                assert_eq!(day, 1);
            }
            other => panic!("expected a capacity, got {other:?}"),
        }
        // Unlimited check, then 3 through 6
        assert_eq!(report.attempts, 5);
    }

    #[test]
    fn looser_deadline_needs_no_more_capacity() {
        let g = graph(&[(1, 2, &[]), (2, 1, &[1]), (3, 2, &[]), (4, 1, &[3]), (5, 3, &[])]);

        for algorithm in Algorithm::ALL {
            let mut previous = u32::MAX;
            for deadline in 1..=4 {
                let query = CapacityQuery {
                    algorithm,
                    ..capacity_query(deadline)
                };
                let CapacityOutcome::Found { capacity, schedule, .. } =
                    minimum_capacity(&g, &query).unwrap().outcome
                else {
                    panic!("deadline {deadline} should be reachable");
                };
                assert!(capacity <= previous, "{algorithm}: deadline {deadline}");
                let scheme = CapacityScheme::uniform(1, capacity).unwrap();
                let problem = Problem::new(&g, &scheme, SharingPolicy::Instant);
                assert_eq!(schedule.validate(problem, deadline), Ok(()));
                previous = capacity;
            }
        }
    }

    #[test]
    fn cycle_is_impossible_for_every_deadline() {
        let g = graph(&[(1, 1, &[2]), (2, 1, &[1])]);
        for deadline in [1, 5, 50] {
            let report = minimum_capacity(&g, &capacity_query(deadline)).unwrap();
            assert!(matches!(
                report.outcome,
                CapacityOutcome::Impossible { reason: Some(Infeasibility::Cycle { .. }) }
            ));
            assert_eq!(report.attempts, 1);
        }
    }

    #[test]
    fn daily_limit_makes_deadline_unreachable() {
        let g = graph(&[(1, 1, &[]), (2, 1, &[]), (3, 1, &[])]);
        let query = CapacityQuery {
            tasks_per_day: Some(1),
            ..capacity_query(2)
        };
        let report = minimum_capacity(&g, &query).unwrap();
        assert_eq!(report.outcome, CapacityOutcome::Impossible { reason: None });
    }

    #[test]
    fn zero_channels_is_an_error() {
        let g = graph(&[(1, 1, &[])]);
        let query = CapacityQuery {
            channels: 0,
            ..capacity_query(1)
        };
        assert_eq!(minimum_capacity(&g, &query).unwrap_err(), SchemeError::NoChannels);
    }

    #[test]
    fn cheapest_pair_trades_days_for_capacity() {
        // Even work: A2 and A4 of 2 each. Odd work: A1 of 3.
        let g = graph(&[(1, 3, &[]), (2, 2, &[]), (4, 2, &[])]);

        let relaxed = minimum_cost(&g, &cost_query(2, 1, 10)).unwrap();
        match relaxed.outcome {
            CostOutcome::Found {
                even_capacity,
                odd_capacity,
                cost,
                ..
            } => assert_eq!((even_capacity, odd_capacity, cost), (2, 3, 32)),
            other => panic!("expected a pair, got {other:?}"),
        }

        let tight = minimum_cost(&g, &cost_query(1, 1, 10)).unwrap();
        match tight.outcome {
            CostOutcome::Found {
                even_capacity,
                odd_capacity,
                cost,
                day,
                ..
            } => {
                assert_eq!((even_capacity, odd_capacity, cost), (4, 3, 34));
                assert_eq!(day, 1);
            }
            other => panic!("expected a pair, got {other:?}"),
        }
    }

    #[test]
    fn skipped_pairs_are_counted() {
        let g = graph(&[(1, 3, &[]), (2, 2, &[]), (4, 2, &[])]);
        let report = minimum_cost(&g, &cost_query(1, 1, 10)).unwrap();

        // Grid is even 2..=4 by odd 3..=3
        assert_eq!(report.candidates_evaluated + report.candidates_skipped, 3);
        assert!(report.candidates_evaluated >= 1);
    }

    #[test]
    fn empty_class_needs_no_capacity() {
        let g = graph(&[(2, 1, &[]), (4, 1, &[])]);
        let report = minimum_cost(&g, &cost_query(1, 5, 1)).unwrap();
        match report.outcome {
            CostOutcome::Found {
                even_capacity,
                odd_capacity,
                cost,
                ..
            } => assert_eq!((even_capacity, odd_capacity, cost), (2, 0, 10)),
            other => panic!("expected a pair, got {other:?}"),
        }
    }

    #[test]
    fn cost_outcome_serializes_with_status() {
        let report = CostReport {
            outcome: CostOutcome::Impossible { reason: None },
            nodes_expanded: 3,
            candidates_evaluated: 1,
            candidates_skipped: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "impossible");
        assert!(json.get("reason").is_none());
    }
}
