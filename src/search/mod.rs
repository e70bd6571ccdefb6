//! # State-Space Search
//!
//! Finds schedules for a [`TaskGraph`] under a [`CapacityScheme`].
//!
//! ## Model
//!
//! A search walks [`SchedulingState`]s. From any state the
//! [`SuccessorGenerator`] offers one move per (ready task, channel with room)
//! pair, or, when no such pair exists, a single day-advance move that resets
//! every channel's usage. Under delayed sharing a channel only sees tasks other
//! channels finished on earlier days; the day advance is the overnight sync.
//!
//! ## Strategies
//!
//! | Strategy | Entry point | Result |
//! |----------|-------------|--------|
//! | Breadth-first, every path | [`bfs::enumerate`] | all schedules |
//! | Breadth-first, deduplicated | [`bfs::earliest`] | one earliest schedule |
//! | Depth-first, every path | [`dfs::enumerate`] | all schedules |
//! | Depth-first / branch-and-bound | [`dfs::search`] | best (or first) schedule |
//! | A* | [`astar::search`] | one earliest schedule |
//!
//! Every strategy takes a maximum day and reports [`Outcome::NoSolution`]
//! instead of searching past it, so cyclic or over-constrained inputs terminate.
//!
//! [`capacity`] wraps the strategies to find the smallest capacity, or the
//! cheapest two-class capacity pair, that meets a deadline.

mod channel;
mod state;
mod successor;
mod tree;
mod schedule;
mod outcome;
mod heuristic;
pub mod bfs;
pub mod dfs;
pub mod astar;
pub mod capacity;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::TaskGraph;

pub use channel::{CapacityScheme, Channel, SchemeError};
pub use state::{ProgressKey, SchedulingState};
pub use successor::{Move, SuccessorGenerator, Undo};
pub use schedule::{Schedule, ScheduleEntry, ScheduleViolation};
pub use outcome::{Enumeration, Infeasibility, Outcome, SearchReport};
pub use heuristic::Heuristic;

/// How completed work becomes visible to other channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SharingPolicy {
    /// A finished task is visible to every channel immediately
    #[default]
    Instant,
    /// A finished task is visible to other channels from the next day on
    Delayed,
}

impl SharingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharingPolicy::Instant => "instant",
            SharingPolicy::Delayed => "delayed",
        }
    }
}

impl fmt::Display for SharingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instant" => Ok(SharingPolicy::Instant),
            "delayed" => Ok(SharingPolicy::Delayed),
            other => Err(format!("unknown sharing policy '{}'", other)),
        }
    }
}

/// Search strategy used to answer a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Breadth-first search with state deduplication
    Bfs,
    /// Exhaustive depth-first search with backtracking
    Dfs,
    /// Depth-first branch-and-bound
    Dfbb,
    /// A* with an admissible day bound
    #[default]
    Astar,
}

impl Algorithm {
    /// All strategies in a stable order
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dfbb,
        Algorithm::Astar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dfbb => "dfbb",
            Algorithm::Astar => "astar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "dfbb" => Ok(Algorithm::Dfbb),
            "astar" | "a*" => Ok(Algorithm::Astar),
            other => Err(format!("unknown algorithm '{}'", other)),
        }
    }
}

/// Everything a strategy needs to know about one query
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    pub graph: &'a TaskGraph,
    pub scheme: &'a CapacityScheme,
    pub policy: SharingPolicy,
}

impl<'a> Problem<'a> {
    pub fn new(graph: &'a TaskGraph, scheme: &'a CapacityScheme, policy: SharingPolicy) -> Self {
        Self {
            graph,
            scheme,
            policy,
        }
    }

    /// Day horizon used when the caller gives no deadline.
    ///
    /// Every day either completes a task or is the last one of a dead end, so a
    /// solvable instance always finishes within one day per task.
    pub fn default_horizon(&self) -> u32 {
        u32::try_from(self.graph.len()).unwrap_or(u32::MAX).max(1)
    }

    /// Structural reasons the query can never be solved, whatever the deadline
    pub fn precheck(&self) -> Option<Infeasibility> {
        if let Some(reason) = self.scheme.check(self.graph) {
            return Some(reason);
        }
        if self.graph.is_cyclic() {
            return Some(Infeasibility::Cycle {
                tasks: self.graph.cycle_blocked_tasks(),
            });
        }
        None
    }
}

/// Finds the earliest completion day within `max_day` using one strategy.
///
/// Structural infeasibility is reported up front without searching.
pub fn solve(problem: Problem<'_>, algorithm: Algorithm, max_day: u32) -> SearchReport {
    if let Some(reason) = problem.precheck() {
        tracing::debug!(%reason, "query rejected before search");
        return SearchReport::infeasible(reason);
    }

    match algorithm {
        Algorithm::Bfs => bfs::earliest(problem, max_day),
        Algorithm::Dfs => dfs::search(problem, dfs::DfsOptions::exhaustive(max_day)),
        Algorithm::Dfbb => dfs::search(problem, dfs::DfsOptions::branch_and_bound(max_day)),
        Algorithm::Astar => astar::search(problem, max_day),
    }
}

/// Answers "can everything be done by `deadline`?" with the cheapest mode of
/// each strategy: depth-first variants stop at the first complete schedule.
pub fn feasible(problem: Problem<'_>, algorithm: Algorithm, deadline: u32) -> SearchReport {
    if let Some(reason) = problem.precheck() {
        return SearchReport::infeasible(reason);
    }

    match algorithm {
        Algorithm::Bfs => bfs::earliest(problem, deadline),
        Algorithm::Dfs => dfs::search(problem, dfs::DfsOptions::first_found(deadline)),
        Algorithm::Dfbb => dfs::search(
            problem,
            dfs::DfsOptions::branch_and_bound(deadline).stop_at_first(),
        ),
        Algorithm::Astar => astar::search(problem, deadline),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Task, TaskGraph, TaskId};

    /// Builds a graph from `(id, cost, prerequisites)` triples
    pub fn graph(tasks: &[(u32, u32, &[u32])]) -> TaskGraph {
        TaskGraph::from_tasks(tasks.iter().map(|(id, cost, deps)| {
            Task::new(TaskId::new(*id), *cost)
                .with_prerequisites(deps.iter().map(|d| TaskId::new(*d)))
        }))
        .unwrap()
    }
}
