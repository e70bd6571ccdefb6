//! Scheduling state
//!
//! The hashable snapshot of search progress. Equality is structural and
//! order-independent: two states reached through different action orderings
//! compare equal when the same tasks are done, on the same day, with the same
//! per-channel usage and knowledge.

use super::{Problem, SharingPolicy};
use crate::domain::TaskSet;

/// One node of the search space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchedulingState {
    /// Finished tasks
    pub completed: TaskSet,

    /// Current day, starting at 1
    pub day: u32,

    /// Effort consumed today, per channel
    pub usage: Vec<u32>,

    /// Tasks started today across all channels
    pub started_today: u32,

    /// Per-channel visible tasks; only tracked under delayed sharing
    pub knowledge: Option<Vec<TaskSet>>,
}

/// A state without its day.
///
/// Reaching the same progress on an earlier day is never worse, so A* keeps the
/// best day seen per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    completed: TaskSet,
    usage: Vec<u32>,
    started_today: u32,
    knowledge: Option<Vec<TaskSet>>,
}

impl SchedulingState {
    /// Nothing done, day 1, every channel idle
    pub fn initial(problem: &Problem<'_>) -> Self {
        let channels = problem.scheme.len();
        let knowledge = match problem.policy {
            SharingPolicy::Instant => None,
            SharingPolicy::Delayed => Some(vec![problem.graph.empty_set(); channels]),
        };

        Self {
            completed: problem.graph.empty_set(),
            day: 1,
            usage: vec![0; channels],
            started_today: 0,
            knowledge,
        }
    }

    /// Every task is done
    pub fn is_goal(&self) -> bool {
        self.completed.is_full()
    }

    /// Tasks `channel` may treat as finished
    pub fn known_to(&self, channel: usize) -> &TaskSet {
        match &self.knowledge {
            Some(knowledge) => &knowledge[channel],
            None => &self.completed,
        }
    }

    pub fn progress_key(&self) -> ProgressKey {
        ProgressKey {
            completed: self.completed.clone(),
            usage: self.usage.clone(),
            started_today: self.started_today,
            knowledge: self.knowledge.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::graph;
    use crate::search::CapacityScheme;
    use std::collections::HashSet;

    #[test]
    fn initial_state() {
        let g = graph(&[(1, 1, &[]), (2, 1, &[1])]);
        let scheme = CapacityScheme::uniform(3, 2).unwrap();

        let instant = SchedulingState::initial(&Problem::new(&g, &scheme, SharingPolicy::Instant));
        assert_eq!(instant.day, 1);
        assert_eq!(instant.usage, vec![0, 0, 0]);
        assert!(instant.knowledge.is_none());
        assert!(instant.completed.is_empty());
        assert!(!instant.is_goal());

        let delayed = SchedulingState::initial(&Problem::new(&g, &scheme, SharingPolicy::Delayed));
        assert_eq!(delayed.knowledge.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn known_to_follows_policy() {
        let g = graph(&[(1, 1, &[])]);
        let scheme = CapacityScheme::uniform(2, 1).unwrap();

        let mut instant =
            SchedulingState::initial(&Problem::new(&g, &scheme, SharingPolicy::Instant));
        instant.completed.insert(0);
        assert!(instant.known_to(1).contains(0));

        let mut delayed =
            SchedulingState::initial(&Problem::new(&g, &scheme, SharingPolicy::Delayed));
        delayed.completed.insert(0);
        assert!(!delayed.known_to(1).contains(0));
    }

    #[test]
    fn dedup_is_order_independent() {
        let g = graph(&[(1, 1, &[]), (2, 1, &[])]);
        let scheme = CapacityScheme::uniform(1, 2).unwrap();
        let start = SchedulingState::initial(&Problem::new(&g, &scheme, SharingPolicy::Instant));

        let mut a = start.clone();
        a.completed.insert(0);
        a.completed.insert(1);

        let mut b = start.clone();
        b.completed.insert(1);
        b.completed.insert(0);

        let mut seen = HashSet::new();
        assert!(seen.insert(a.clone()));
        assert!(!seen.insert(b));

        let mut later = a.clone();
        later.day = 2;
        assert_ne!(later, a);
        assert_eq!(later.progress_key(), a.progress_key());
    }
}
