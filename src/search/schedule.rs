//! Schedules and schedule validation
//!
//! A schedule is the ordered list of `(day, channel, task)` assignments along one
//! search path. [`Schedule::validate`] re-checks it from scratch against the
//! problem, independent of the search that produced it.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use super::{Problem, SharingPolicy};
use crate::domain::TaskId;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleViolation {
    #[error("Entry {index}: unknown task {task}")]
    UnknownTask { index: usize, task: TaskId },

    #[error("Entry {index}: unknown channel {channel}")]
    UnknownChannel { index: usize, channel: usize },

    #[error("Entry {index}: task {task} scheduled twice")]
    DuplicateTask { index: usize, task: TaskId },

    #[error("Entry {index}: day {day} comes after a later day")]
    OutOfOrder { index: usize, day: u32 },

    #[error("Entry {index}: day {day} is past the deadline")]
    PastDeadline { index: usize, day: u32 },

    #[error("Entry {index}: channel {channel} does not accept task {task}")]
    ClassMismatch { index: usize, task: TaskId, channel: usize },

    #[error("Entry {index}: task {task} starts before prerequisite {prerequisite} is visible")]
    PrerequisiteNotVisible {
        index: usize,
        task: TaskId,
        prerequisite: TaskId,
    },

    #[error("Day {day}: channel {channel} uses {used} of {capacity}")]
    CapacityExceeded {
        day: u32,
        channel: usize,
        used: u64,
        capacity: u32,
    },

    #[error("Day {day}: {count} tasks started, limit is {limit}")]
    DailyLimitExceeded { day: u32, count: u32, limit: u32 },

    #[error("Schedule leaves {0} tasks undone")]
    Incomplete(usize),
}

/// One assignment: `task` is done by `channel` on `day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScheduleEntry {
    pub day: u32,
    pub channel: usize,
    pub task: TaskId,
}

/// Ordered assignments from the initial state to a goal state
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Schedule(Vec<ScheduleEntry>);

impl Schedule {
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Day of the final assignment
    pub fn last_day(&self) -> Option<u32> {
        self.0.last().map(|e| e.day)
    }

    /// Assignments grouped by day, in schedule order within each day
    pub fn by_day(&self) -> BTreeMap<u32, Vec<&ScheduleEntry>> {
        let mut days: BTreeMap<u32, Vec<&ScheduleEntry>> = BTreeMap::new();
        for entry in &self.0 {
            days.entry(entry.day).or_default().push(entry);
        }
        days
    }

    /// Checks every rule a search is supposed to enforce.
    ///
    /// Under instant sharing a prerequisite must appear earlier in the
    /// schedule. Under delayed sharing it must be from an earlier day, or from
    /// the same day on the same channel.
    pub fn validate(&self, problem: Problem<'_>, max_day: u32) -> Result<(), ScheduleViolation> {
        let graph = problem.graph;
        let scheme = problem.scheme;

        // task position -> (day, channel) it was done
        let mut done: HashMap<usize, (u32, usize)> = HashMap::new();
        let mut usage: HashMap<(u32, usize), u64> = HashMap::new();
        let mut started: HashMap<u32, u32> = HashMap::new();
        let mut last_day = 0;

        for (index, entry) in self.0.iter().enumerate() {
            let pos = graph
                .position(&entry.task)
                .ok_or(ScheduleViolation::UnknownTask {
                    index,
                    task: entry.task,
                })?;

            if entry.channel >= scheme.len() {
                return Err(ScheduleViolation::UnknownChannel {
                    index,
                    channel: entry.channel,
                });
            }
            if entry.day > max_day {
                return Err(ScheduleViolation::PastDeadline {
                    index,
                    day: entry.day,
                });
            }
            if entry.day < last_day {
                return Err(ScheduleViolation::OutOfOrder {
                    index,
                    day: entry.day,
                });
            }
            last_day = entry.day;

            if done.contains_key(&pos) {
                return Err(ScheduleViolation::DuplicateTask {
                    index,
                    task: entry.task,
                });
            }
            if !scheme.accepts(entry.channel, graph.class(pos)) {
                return Err(ScheduleViolation::ClassMismatch {
                    index,
                    task: entry.task,
                    channel: entry.channel,
                });
            }

            for &dep in graph.prerequisites(pos) {
                let visible = match (done.get(&dep), problem.policy) {
                    (None, _) => false,
                    (Some(_), SharingPolicy::Instant) => true,
                    (Some(&(day, channel)), SharingPolicy::Delayed) => {
                        day < entry.day || channel == entry.channel
                    }
                };
                if !visible {
                    return Err(ScheduleViolation::PrerequisiteNotVisible {
                        index,
                        task: entry.task,
                        prerequisite: graph.id(dep),
                    });
                }
            }

            let used = usage.entry((entry.day, entry.channel)).or_default();
            *used += u64::from(graph.cost(pos));
            let capacity = scheme.capacity(entry.channel);
            if *used > u64::from(capacity) {
                return Err(ScheduleViolation::CapacityExceeded {
                    day: entry.day,
                    channel: entry.channel,
                    used: *used,
                    capacity,
                });
            }

            let count = started.entry(entry.day).or_default();
            *count += 1;
            if let Some(limit) = scheme.tasks_per_day() {
                if *count > limit {
                    return Err(ScheduleViolation::DailyLimitExceeded {
                        day: entry.day,
                        count: *count,
                        limit,
                    });
                }
            }

            done.insert(pos, (entry.day, entry.channel));
        }

        if done.len() != graph.len() {
            return Err(ScheduleViolation::Incomplete(graph.len() - done.len()));
        }
        Ok(())
    }
}
