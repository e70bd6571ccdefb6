//! Successor generation
//!
//! Moves are tried in a fixed order: tasks in graph order, and for each task
//! the channels in scheme order. The day-advance move comes last and is only
//! offered when nothing else is (unless idle moves are enabled).

use super::schedule::ScheduleEntry;
use super::state::SchedulingState;
use super::Problem;
use crate::domain::TaskSet;

/// A transition out of a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Do `task` on `channel` today
    Assign { task: usize, channel: usize },
    /// Start the next day: reset usage, sync knowledge
    AdvanceDay,
}

/// What [`SuccessorGenerator::apply`] changed, so it can be put back exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Undo {
    Assign {
        task: usize,
        channel: usize,
        cost: u32,
    },
    AdvanceDay {
        usage: Vec<u32>,
        started_today: u32,
        knowledge: Option<Vec<TaskSet>>,
    },
}

impl Undo {
    /// Restores `state` to what it was before the move
    pub fn revert(self, state: &mut SchedulingState) {
        match self {
            Undo::Assign {
                task,
                channel,
                cost,
            } => {
                state.completed.remove(task);
                state.usage[channel] -= cost;
                state.started_today -= 1;
                if let Some(knowledge) = state.knowledge.as_mut() {
                    knowledge[channel].remove(task);
                }
            }
            Undo::AdvanceDay {
                usage,
                started_today,
                knowledge,
            } => {
                state.day -= 1;
                state.usage = usage;
                state.started_today = started_today;
                state.knowledge = knowledge;
            }
        }
    }
}

/// Enumerates the legal moves from a state
#[derive(Debug, Clone, Copy)]
pub struct SuccessorGenerator<'a> {
    problem: Problem<'a>,
    allow_idle: bool,
}

impl<'a> SuccessorGenerator<'a> {
    pub fn new(problem: Problem<'a>) -> Self {
        Self {
            problem,
            allow_idle: false,
        }
    }

    /// Also offer the day advance when work is still possible today
    pub fn with_idle(mut self, allow_idle: bool) -> Self {
        self.allow_idle = allow_idle;
        self
    }

    /// True if `task` can be done on `channel` right now
    pub fn can_assign(&self, state: &SchedulingState, task: usize, channel: usize) -> bool {
        let graph = self.problem.graph;
        let scheme = self.problem.scheme;

        if state.completed.contains(task) || !scheme.accepts(channel, graph.class(task)) {
            return false;
        }
        if scheme
            .tasks_per_day()
            .is_some_and(|limit| state.started_today >= limit)
        {
            return false;
        }
        let fits = u64::from(state.usage[channel]) + u64::from(graph.cost(task))
            <= u64::from(scheme.capacity(channel));
        fits && graph.dependencies_satisfied(task, state.known_to(channel))
    }

    /// Every (task, channel) assignment legal today, in tie-break order
    pub fn assign_moves(&self, state: &SchedulingState) -> Vec<Move> {
        let mut moves = Vec::new();
        for task in self.problem.graph.all_tasks() {
            if state.completed.contains(task) {
                continue;
            }
            for channel in 0..self.problem.scheme.len() {
                if self.can_assign(state, task, channel) {
                    moves.push(Move::Assign { task, channel });
                }
            }
        }
        moves
    }

    /// Legal moves: assignments, then the day advance if allowed
    pub fn moves(&self, state: &SchedulingState) -> Vec<Move> {
        let mut moves = self.assign_moves(state);
        if moves.is_empty() || self.allow_idle {
            moves.push(Move::AdvanceDay);
        }
        moves
    }

    /// Applies a move in place and returns how to undo it
    pub fn apply(&self, state: &mut SchedulingState, mv: Move) -> Undo {
        match mv {
            Move::Assign { task, channel } => {
                let cost = self.problem.graph.cost(task);
                state.completed.insert(task);
                state.usage[channel] += cost;
                state.started_today += 1;
                if let Some(knowledge) = state.knowledge.as_mut() {
                    knowledge[channel].insert(task);
                }
                Undo::Assign {
                    task,
                    channel,
                    cost,
                }
            }
            Move::AdvanceDay => {
                let channels = state.usage.len();
                // Overnight sync: every channel learns everything finished so far
                let synced = state
                    .knowledge
                    .as_ref()
                    .map(|_| vec![state.completed.clone(); channels]);

                state.day += 1;
                Undo::AdvanceDay {
                    usage: std::mem::replace(&mut state.usage, vec![0; channels]),
                    started_today: std::mem::take(&mut state.started_today),
                    knowledge: std::mem::replace(&mut state.knowledge, synced),
                }
            }
        }
    }

    /// The state reached by `mv`, leaving `state` untouched
    pub fn successor(&self, state: &SchedulingState, mv: Move) -> SchedulingState {
        let mut next = state.clone();
        self.apply(&mut next, mv);
        next
    }

    /// Schedule entry recorded for `mv` taken from `state`
    pub fn entry(&self, state: &SchedulingState, mv: Move) -> Option<ScheduleEntry> {
        match mv {
            Move::Assign { task, channel } => Some(ScheduleEntry {
                day: state.day,
                channel,
                task: self.problem.graph.id(task),
            }),
            Move::AdvanceDay => None,
        }
    }
}
