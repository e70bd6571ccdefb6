//! Breadth-first search
//!
//! Two deliberately separate entry points:
//!
//! - [`enumerate`] keeps every path. Distinct action orders that reach the same
//!   state are recorded as distinct schedules.
//! - [`earliest`] deduplicates states and stops at the first goal. A path of
//!   `n` assignments ending on day `d` takes `n + d - 1` moves, so the first goal
//!   taken off the FIFO frontier has the smallest day.

use std::collections::{HashSet, VecDeque};

use super::outcome::{Enumeration, SearchReport};
use super::schedule::{Schedule, ScheduleEntry};
use super::state::SchedulingState;
use super::successor::SuccessorGenerator;
use super::tree::SearchTree;
use super::Problem;

/// Controls for full-path enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerateOptions {
    /// Paths past this day are dropped
    pub max_day: u32,

    /// Offer the day advance even when work is possible
    pub allow_idle: bool,

    /// Stop after recording this many schedules
    pub max_schedules: Option<usize>,
}

impl EnumerateOptions {
    pub fn new(max_day: u32) -> Self {
        Self {
            max_day,
            allow_idle: false,
            max_schedules: None,
        }
    }

    pub fn with_idle(mut self, allow_idle: bool) -> Self {
        self.allow_idle = allow_idle;
        self
    }

    pub fn with_limit(mut self, max_schedules: Option<usize>) -> Self {
        self.max_schedules = max_schedules;
        self
    }

    pub(crate) fn is_full(&self, recorded: usize) -> bool {
        self.max_schedules.is_some_and(|cap| recorded >= cap)
    }
}

/// Records every schedule that completes all tasks within the day bound
pub fn enumerate(problem: Problem<'_>, options: EnumerateOptions) -> Enumeration {
    let gen = SuccessorGenerator::new(problem).with_idle(options.allow_idle);
    let mut result = Enumeration::default();

    let mut queue: VecDeque<(SchedulingState, Vec<ScheduleEntry>)> = VecDeque::new();
    queue.push_back((SchedulingState::initial(&problem), Vec::new()));

    while let Some((state, path)) = queue.pop_front() {
        result.nodes_expanded += 1;

        if state.is_goal() {
            result.schedules.push(Schedule::from_entries(path));
            if options.is_full(result.schedules.len()) {
                result.truncated = true;
                break;
            }
            continue;
        }

        for mv in gen.moves(&state) {
            let next = gen.successor(&state, mv);
            if next.day > options.max_day {
                continue;
            }
            let mut next_path = path.clone();
            next_path.extend(gen.entry(&state, mv));
            queue.push_back((next, next_path));
        }
    }

    tracing::debug!(
        schedules = result.schedules.len(),
        nodes = result.nodes_expanded,
        truncated = result.truncated,
        "breadth-first enumeration finished"
    );
    result
}

/// Finds one earliest schedule, visiting each distinct state once
pub fn earliest(problem: Problem<'_>, max_day: u32) -> SearchReport {
    let gen = SuccessorGenerator::new(problem);
    let initial = SchedulingState::initial(&problem);

    let mut visited: HashSet<SchedulingState> = HashSet::new();
    visited.insert(initial.clone());

    let (mut tree, root) = SearchTree::with_root(initial);
    let mut queue = VecDeque::from([root]);
    let mut nodes_expanded = 0;

    while let Some(node) = queue.pop_front() {
        nodes_expanded += 1;
        let state = tree.state(node).clone();

        if state.is_goal() {
            tracing::debug!(day = state.day, nodes = nodes_expanded, "breadth-first search solved");
            return SearchReport::solved(state.day, tree.schedule(node), nodes_expanded);
        }

        for mv in gen.moves(&state) {
            let next = gen.successor(&state, mv);
            if next.day > max_day || visited.contains(&next) {
                continue;
            }
            visited.insert(next.clone());
            let child = tree.push(node, gen.entry(&state, mv), next);
            queue.push_back(child);
        }
    }

    tracing::debug!(max_day, nodes = nodes_expanded, "breadth-first search exhausted");
    SearchReport::no_solution(max_day, nodes_expanded)
}
