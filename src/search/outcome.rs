//! Search results
//!
//! Failure to find a schedule is a value, never an error: callers format
//! [`Outcome::NoSolution`] and [`Outcome::Infeasible`] like any other answer.

use serde::Serialize;
use std::fmt;

use super::schedule::Schedule;
use crate::domain::{ChannelClass, TaskId};

/// Why a query can never succeed, whatever the deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Infeasibility {
    /// A task costs more than any channel that accepts it can hold in a day
    OversizedTask { task: TaskId, cost: u32, capacity: u32 },

    /// A class has work left but no channel capacity at all
    NoCapacity { class: ChannelClass, remaining: u64 },

    /// These tasks sit on (or behind) a dependency cycle
    Cycle { tasks: Vec<TaskId> },
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::OversizedTask { task, cost, capacity } => write!(
                f,
                "task {} needs {} units but no channel holds more than {}",
                task, cost, capacity
            ),
            Infeasibility::NoCapacity { class, remaining } => write!(
                f,
                "{} tasks need {} units but {} capacity is zero",
                class, remaining, class
            ),
            Infeasibility::Cycle { tasks } => {
                let ids: Vec<String> = tasks.iter().map(|t| t.to_string()).collect();
                write!(f, "dependency cycle blocks {}", ids.join(", "))
            }
        }
    }
}

/// Answer to an earliest-day or feasibility query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every task is done by `day`
    Solved { day: u32, schedule: Schedule },

    /// No schedule finishes within `max_day` days
    NoSolution { max_day: u32 },

    /// No schedule exists at all
    Infeasible { reason: Infeasibility },
}

/// Outcome plus instrumentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    #[serde(flatten)]
    pub outcome: Outcome,

    /// States taken off the frontier (or recursive calls, for depth-first search)
    pub nodes_expanded: u64,
}

impl SearchReport {
    pub fn solved(day: u32, schedule: Schedule, nodes_expanded: u64) -> Self {
        Self {
            outcome: Outcome::Solved { day, schedule },
            nodes_expanded,
        }
    }

    pub fn no_solution(max_day: u32, nodes_expanded: u64) -> Self {
        Self {
            outcome: Outcome::NoSolution { max_day },
            nodes_expanded,
        }
    }

    pub fn infeasible(reason: Infeasibility) -> Self {
        Self {
            outcome: Outcome::Infeasible { reason },
            nodes_expanded: 0,
        }
    }

    /// Completion day, if solved
    pub fn day(&self) -> Option<u32> {
        match &self.outcome {
            Outcome::Solved { day, .. } => Some(*day),
            _ => None,
        }
    }

    /// Schedule, if solved
    pub fn schedule(&self) -> Option<&Schedule> {
        match &self.outcome {
            Outcome::Solved { schedule, .. } => Some(schedule),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, Outcome::Solved { .. })
    }
}

/// Every schedule found by an enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enumeration {
    pub schedules: Vec<Schedule>,
    pub nodes_expanded: u64,

    /// True when the enumeration stopped at its schedule cap
    pub truncated: bool,
}

impl Enumeration {
    /// Smallest completion day among the recorded schedules
    pub fn earliest_day(&self) -> Option<u32> {
        self.schedules.iter().filter_map(|s| s.last_day()).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accessors() {
        let report = SearchReport::solved(3, Schedule::default(), 10);
        assert!(report.is_solved());
        assert_eq!(report.day(), Some(3));
        assert!(report.schedule().is_some());

        let report = SearchReport::no_solution(4, 2);
        assert!(!report.is_solved());
        assert_eq!(report.day(), None);
    }

    #[test]
    fn infeasibility_messages() {
        let reason = Infeasibility::OversizedTask {
            task: TaskId::new(3),
            cost: 9,
            capacity: 4,
        };
        assert_eq!(reason.to_string(), "task A3 needs 9 units but no channel holds more than 4");

        let reason = Infeasibility::Cycle {
            tasks: vec![TaskId::new(1), TaskId::new(2)],
        };
        assert_eq!(reason.to_string(), "dependency cycle blocks A1, A2");
    }

    #[test]
    fn report_serializes_flat() {
        let report = SearchReport::no_solution(5, 7);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "no_solution");
        assert_eq!(json["max_day"], 5);
        assert_eq!(json["nodes_expanded"], 7);
    }
}
