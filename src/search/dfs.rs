//! Depth-first search
//!
//! One mutable state is walked in place. Each move is applied through a
//! [`Step`] guard that reverts it when the recursive call returns, so the
//! search allocates per schedule found rather than per node.

use std::ops::{Deref, DerefMut};

use super::bfs::EnumerateOptions;
use super::outcome::{Enumeration, SearchReport};
use super::schedule::{Schedule, ScheduleEntry};
use super::state::SchedulingState;
use super::successor::{Move, SuccessorGenerator, Undo};
use super::Problem;

/// How [`search`] explores and when it stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsOptions {
    /// Paths past this day are abandoned
    pub max_day: u32,

    /// Abandon paths that cannot beat the best day found so far
    pub branch_and_bound: bool,

    /// Stop at the first complete schedule
    pub first_only: bool,
}

impl DfsOptions {
    /// Explore every path within the day bound and keep the earliest
    pub fn exhaustive(max_day: u32) -> Self {
        Self {
            max_day,
            branch_and_bound: false,
            first_only: false,
        }
    }

    pub fn branch_and_bound(max_day: u32) -> Self {
        Self {
            branch_and_bound: true,
            ..Self::exhaustive(max_day)
        }
    }

    /// Any schedule within the day bound will do
    pub fn first_found(max_day: u32) -> Self {
        Self::exhaustive(max_day).stop_at_first()
    }

    pub fn stop_at_first(mut self) -> Self {
        self.first_only = true;
        self
    }
}

/// The state being walked plus the assignments that led to it
struct Scratch {
    state: SchedulingState,
    path: Vec<ScheduleEntry>,
}

impl Scratch {
    fn new(problem: &Problem<'_>) -> Self {
        Self {
            state: SchedulingState::initial(problem),
            path: Vec::new(),
        }
    }
}

/// One applied move; dropping it puts the scratch back
struct Step<'s> {
    scratch: &'s mut Scratch,
    undo: Option<Undo>,
    recorded: bool,
}

impl<'s> Step<'s> {
    fn take(scratch: &'s mut Scratch, gen: &SuccessorGenerator<'_>, mv: Move) -> Self {
        let entry = gen.entry(&scratch.state, mv);
        let recorded = entry.is_some();
        scratch.path.extend(entry);
        let undo = gen.apply(&mut scratch.state, mv);
        Self {
            scratch,
            undo: Some(undo),
            recorded,
        }
    }
}

impl Deref for Step<'_> {
    type Target = Scratch;

    fn deref(&self) -> &Scratch {
        self.scratch
    }
}

impl DerefMut for Step<'_> {
    fn deref_mut(&mut self) -> &mut Scratch {
        self.scratch
    }
}

impl Drop for Step<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            undo.revert(&mut self.scratch.state);
        }
        if self.recorded {
            self.scratch.path.pop();
        }
    }
}

struct SearchContext<'a> {
    gen: SuccessorGenerator<'a>,
    options: DfsOptions,
    best: Option<(u32, Schedule)>,
    nodes: u64,
    stop: bool,
}

impl SearchContext<'_> {
    fn visit(&mut self, scratch: &mut Scratch) {
        self.nodes += 1;

        let day = scratch.state.day;
        if day > self.options.max_day {
            return;
        }
        if self.options.branch_and_bound
            && self.best.as_ref().is_some_and(|(best, _)| day >= *best)
        {
            return;
        }

        if scratch.state.is_goal() {
            if self.best.as_ref().map_or(true, |(best, _)| day < *best) {
                tracing::trace!(day, nodes = self.nodes, "depth-first search improved");
                self.best = Some((day, Schedule::from_entries(scratch.path.clone())));
            }
            self.stop = self.options.first_only;
            return;
        }

        for mv in self.gen.moves(&scratch.state) {
            let mut step = Step::take(scratch, &self.gen, mv);
            self.visit(&mut step);
            if self.stop {
                break;
            }
        }
    }
}

/// Finds the earliest (or, with `first_only`, any) schedule within `max_day`
pub fn search(problem: Problem<'_>, options: DfsOptions) -> SearchReport {
    let mut ctx = SearchContext {
        gen: SuccessorGenerator::new(problem),
        options,
        best: None,
        nodes: 0,
        stop: false,
    };
    ctx.visit(&mut Scratch::new(&problem));

    tracing::debug!(
        best = ctx.best.as_ref().map(|(day, _)| *day),
        nodes = ctx.nodes,
        branch_and_bound = options.branch_and_bound,
        "depth-first search finished"
    );
    match ctx.best {
        Some((day, schedule)) => SearchReport::solved(day, schedule, ctx.nodes),
        None => SearchReport::no_solution(options.max_day, ctx.nodes),
    }
}

struct EnumerateContext<'a> {
    gen: SuccessorGenerator<'a>,
    options: EnumerateOptions,
    result: Enumeration,
}

impl EnumerateContext<'_> {
    fn visit(&mut self, scratch: &mut Scratch) {
        self.result.nodes_expanded += 1;

        if scratch.state.day > self.options.max_day {
            return;
        }
        if scratch.state.is_goal() {
            self.result
                .schedules
                .push(Schedule::from_entries(scratch.path.clone()));
            self.result.truncated = self.options.is_full(self.result.schedules.len());
            return;
        }

        for mv in self.gen.moves(&scratch.state) {
            let mut step = Step::take(scratch, &self.gen, mv);
            self.visit(&mut step);
            if self.result.truncated {
                break;
            }
        }
    }
}

/// Records every schedule within the day bound, in depth-first order
pub fn enumerate(problem: Problem<'_>, options: EnumerateOptions) -> Enumeration {
    let mut ctx = EnumerateContext {
        gen: SuccessorGenerator::new(problem).with_idle(options.allow_idle),
        options,
        result: Enumeration::default(),
    };
    ctx.visit(&mut Scratch::new(&problem));

    tracing::debug!(
        schedules = ctx.result.schedules.len(),
        nodes = ctx.result.nodes_expanded,
        truncated = ctx.result.truncated,
        "depth-first enumeration finished"
    );
    ctx.result
}
