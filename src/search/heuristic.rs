//! Admissible lower bound for A*
//!
//! [`Heuristic::estimate`] returns the minimum number of days still needed
//! after the current one, or `None` when the goal is unreachable from the state.
//! It is the maximum of two independent bounds:
//!
//! - **Resource bound**: per class (and over all tasks), the remaining cost that
//!   does not fit into what is left of today's capacity, divided by the daily
//!   capacity available to that class, rounded up. A daily task limit adds the
//!   same bound over task counts.
//! - **Dependency bound**: along any chain of unfinished tasks, the part done on
//!   a single day fits in one day's worth of chain capacity (one channel under
//!   delayed sharing, since a dependent started the same day must run on the
//!   channel that finished its prerequisite; every channel under instant
//!   sharing). Greedily packing the heaviest chain into such segments gives the
//!   fewest days it can span.
//!
//! Both are lower bounds on the remaining days, so their maximum is too.

use super::state::SchedulingState;
use super::{Problem, SharingPolicy};
use crate::domain::ChannelClass;

#[derive(Debug, Clone)]
pub struct Heuristic<'a> {
    problem: Problem<'a>,

    /// Most chain cost that can be done within one day
    chain_capacity: u64,

    /// Some task can never be scheduled under this scheme
    unreachable: bool,
}

impl<'a> Heuristic<'a> {
    pub fn new(problem: Problem<'a>) -> Self {
        let scheme = problem.scheme;
        let chain_capacity = match problem.policy {
            SharingPolicy::Instant => scheme.total_capacity(),
            SharingPolicy::Delayed => u64::from(scheme.max_capacity()),
        };
        let unreachable = problem.graph.is_cyclic() || scheme.check(problem.graph).is_some();

        Self {
            problem,
            chain_capacity,
            unreachable,
        }
    }

    /// Lower bound on days needed after `state.day`; `None` if unreachable
    pub fn estimate(&self, state: &SchedulingState) -> Option<u32> {
        if state.is_goal() {
            return Some(0);
        }
        if self.unreachable {
            return None;
        }

        let resource = self.resource_bound(state)?;
        let dependency = self.dependency_bound(state);
        Some(resource.max(dependency))
    }

    fn resource_bound(&self, state: &SchedulingState) -> Option<u32> {
        let graph = self.problem.graph;
        let scheme = self.problem.scheme;

        let mut remaining = [0u64; 2];
        let mut remaining_total = 0u64;
        let mut remaining_count = 0u64;
        for task in graph.all_tasks().filter(|t| !state.completed.contains(*t)) {
            let cost = u64::from(graph.cost(task));
            remaining[graph.class(task).index()] += cost;
            remaining_total += cost;
            remaining_count += 1;
        }

        // Per class, then over every channel at once
        let mut pools: Vec<(u64, u64, u64)> = Vec::with_capacity(3);
        for class in ChannelClass::ALL {
            let (daily, left) = self.pool(state, |channel| scheme.accepts(channel, class));
            pools.push((remaining[class.index()], daily, left));
        }
        let (daily, left) = self.pool(state, |_| true);
        pools.push((remaining_total, daily, left));

        if let Some(limit) = scheme.tasks_per_day() {
            let limit = u64::from(limit);
            let left = limit.saturating_sub(u64::from(state.started_today));
            pools.push((remaining_count, limit, left));
        }

        let mut bound = 0u64;
        for (need, daily, left) in pools {
            if need == 0 {
                continue;
            }
            if daily == 0 {
                return None;
            }
            bound = bound.max(need.saturating_sub(left).div_ceil(daily));
        }
        Some(u32::try_from(bound).unwrap_or(u32::MAX))
    }

    /// Daily capacity and capacity left today over the channels picked by `filter`
    fn pool(&self, state: &SchedulingState, filter: impl Fn(usize) -> bool) -> (u64, u64) {
        let scheme = self.problem.scheme;
        (0..scheme.len())
            .filter(|channel| filter(*channel))
            .fold((0, 0), |(daily, left), channel| {
                let capacity = scheme.capacity(channel);
                (
                    daily + u64::from(capacity),
                    left + u64::from(capacity.saturating_sub(state.usage[channel])),
                )
            })
    }

    fn dependency_bound(&self, state: &SchedulingState) -> u32 {
        let graph = self.problem.graph;
        let Some(order) = graph.topological_order() else {
            return 0;
        };

        // Worst greedy packing of any chain ending at each task: (segments, fill of last)
        let mut packing: Vec<(u32, u64)> = vec![(0, 0); graph.len()];
        // Tasks on the longest chain ending at each task
        let mut length: Vec<u32> = vec![0; graph.len()];

        let mut segments = 0u32;
        let mut longest = 0u32;
        for &task in order {
            if state.completed.contains(task) {
                continue;
            }
            let cost = u64::from(graph.cost(task));
            let open = graph
                .prerequisites(task)
                .iter()
                .filter(|dep| !state.completed.contains(**dep));

            let mut worst: Option<(u32, u64)> = None;
            let mut chain = 0u32;
            for &dep in open {
                worst = worst.max(Some(packing[dep]));
                chain = chain.max(length[dep]);
            }

            packing[task] = match worst {
                Some((count, fill)) if fill + cost <= self.chain_capacity => (count, fill + cost),
                Some((count, _)) => (count + 1, cost),
                None => (1, cost),
            };
            length[task] = chain + 1;

            segments = segments.max(packing[task].0);
            longest = longest.max(length[task]);
        }

        let mut bound = segments.saturating_sub(1);
        if let Some(limit) = self.problem.scheme.tasks_per_day() {
            bound = bound.max(longest.div_ceil(limit).saturating_sub(1));
        }
        bound
    }
}
