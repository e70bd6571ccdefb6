//! Task domain model
//!
//! Tasks are the units of work being scheduled. Each one carries an effort cost,
//! paid out of a channel's daily capacity, and a list of direct prerequisites.

use serde::{Deserialize, Serialize};

use super::id::{ChannelClass, TaskId};

/// A unit of work with an effort cost and direct prerequisites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Effort consumed from a channel's daily capacity
    pub cost: u32,

    /// Tasks that must be finished before this one can start
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<TaskId>,
}

impl Task {
    /// Creates a task with no prerequisites
    pub fn new(id: TaskId, cost: u32) -> Self {
        Self {
            id,
            cost,
            prerequisites: Vec::new(),
        }
    }

    /// Builder-style helper for adding prerequisites
    pub fn with_prerequisites(mut self, prerequisites: impl IntoIterator<Item = TaskId>) -> Self {
        for dep in prerequisites {
            self.add_prerequisite(dep);
        }
        self
    }

    /// Adds a prerequisite, ignoring duplicates
    pub fn add_prerequisite(&mut self, dep: TaskId) -> bool {
        if self.prerequisites.contains(&dep) {
            return false;
        }
        self.prerequisites.push(dep);
        true
    }

    /// Returns the channel class this task is billed to
    pub fn class(&self) -> ChannelClass {
        self.id.class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_has_no_prerequisites() {
        let task = Task::new(TaskId::new(1), 3);
        assert_eq!(task.cost, 3);
        assert!(task.prerequisites.is_empty());
        assert_eq!(task.class(), ChannelClass::Odd);
    }

    #[test]
    fn duplicate_prerequisites_ignored() {
        let mut task = Task::new(TaskId::new(3), 1);
        assert!(task.add_prerequisite(TaskId::new(1)));
        assert!(!task.add_prerequisite(TaskId::new(1)));
        assert_eq!(task.prerequisites, vec![TaskId::new(1)]);
    }

    #[test]
    fn builder_keeps_order() {
        let task = Task::new(TaskId::new(4), 2)
            .with_prerequisites([TaskId::new(2), TaskId::new(1), TaskId::new(2)]);
        assert_eq!(task.prerequisites, vec![TaskId::new(2), TaskId::new(1)]);
    }

    #[test]
    fn serde_skips_empty_prerequisites() {
        let task = Task::new(TaskId::new(2), 5);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "A2", "cost": 5 }));
    }
}
