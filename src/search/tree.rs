//! Arena of generated states with parent links, so frontier entries stay
//! small and a schedule is rebuilt only for the goal.

use super::schedule::{Schedule, ScheduleEntry};
use super::state::SchedulingState;

#[derive(Debug)]
struct TreeNode {
    state: SchedulingState,
    parent: Option<usize>,
    entry: Option<ScheduleEntry>,
}

#[derive(Debug, Default)]
pub(crate) struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    pub fn with_root(state: SchedulingState) -> (Self, usize) {
        let tree = Self {
            nodes: vec![TreeNode {
                state,
                parent: None,
                entry: None,
            }],
        };
        (tree, 0)
    }

    /// Adds a child reached from `parent` by a move that recorded `entry`
    pub fn push(
        &mut self,
        parent: usize,
        entry: Option<ScheduleEntry>,
        state: SchedulingState,
    ) -> usize {
        self.nodes.push(TreeNode {
            state,
            parent: Some(parent),
            entry,
        });
        self.nodes.len() - 1
    }

    pub fn state(&self, node: usize) -> &SchedulingState {
        &self.nodes[node].state
    }

    /// Assignments on the path from the root to `node`
    pub fn schedule(&self, node: usize) -> Schedule {
        let mut entries = Vec::new();
        let mut cursor = Some(node);
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            entries.extend(node.entry);
            cursor = node.parent;
        }
        entries.reverse();
        Schedule::from_entries(entries)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
