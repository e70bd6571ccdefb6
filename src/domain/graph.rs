//! Dependency graph for tasks
//!
//! Immutable after construction. Tasks are addressed by their position in load
//! order, which is also the stable iteration order used by every search.
//! Cycles are recorded rather than rejected: a task on a cycle (or downstream of
//! one) can never be completed, and searches detect that through their bounds.
//! Uses petgraph for cycle and ordering analysis.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;
use std::ops::Range;
use thiserror::Error;

use super::id::{ChannelClass, TaskId};
use super::set::TaskSet;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Duplicate task: {0}")]
    DuplicateTask(TaskId),

    #[error("Task {task} depends on unknown task {prerequisite}")]
    UnknownPrerequisite { task: TaskId, prerequisite: TaskId },

    #[error("Task {0} has zero cost; costs must be positive")]
    ZeroCost(TaskId),
}

/// A read-only dependency graph over a fixed set of tasks
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,

    /// Map from TaskId to position
    index: HashMap<TaskId, usize>,

    /// Direct prerequisites by position, in declaration order
    prerequisites: Vec<Vec<usize>>,

    /// Edges run prerequisite -> task; node `i` is task position `i`
    graph: DiGraph<TaskId, ()>,

    /// Topological order, absent when the graph is cyclic
    order: Option<Vec<usize>>,

    /// Tasks on a cycle or depending (transitively) on one
    blocked_by_cycle: Vec<bool>,
}

impl TaskGraph {
    /// Builds a graph from tasks in load order
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, GraphError> {
        let tasks: Vec<Task> = tasks.into_iter().collect();
        let mut index = HashMap::with_capacity(tasks.len());
        let mut graph = DiGraph::with_capacity(tasks.len(), 0);

        // First pass: add all nodes
        for (pos, task) in tasks.iter().enumerate() {
            if task.cost == 0 {
                return Err(GraphError::ZeroCost(task.id));
            }
            if index.insert(task.id, pos).is_some() {
                return Err(GraphError::DuplicateTask(task.id));
            }
            graph.add_node(task.id);
        }

        // Second pass: add all edges
        let mut prerequisites = vec![Vec::new(); tasks.len()];
        for (pos, task) in tasks.iter().enumerate() {
            for dep in &task.prerequisites {
                let dep_pos = *index.get(dep).ok_or(GraphError::UnknownPrerequisite {
                    task: task.id,
                    prerequisite: *dep,
                })?;
                if prerequisites[pos].contains(&dep_pos) {
                    continue;
                }
                prerequisites[pos].push(dep_pos);
                graph.add_edge(NodeIndex::new(dep_pos), NodeIndex::new(pos), ());
            }
        }

        let order = toposort(&graph, None)
            .ok()
            .map(|nodes| nodes.into_iter().map(|n| n.index()).collect());
        let blocked_by_cycle = Self::cycle_closure(&graph);

        Ok(Self {
            tasks,
            index,
            prerequisites,
            graph,
            order,
            blocked_by_cycle,
        })
    }

    /// Marks every node on a cycle and everything reachable from one
    fn cycle_closure(graph: &DiGraph<TaskId, ()>) -> Vec<bool> {
        let mut blocked = vec![false; graph.node_count()];

        let on_cycle = tarjan_scc(graph).into_iter().filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        });

        for component in on_cycle {
            for start in component {
                if blocked[start.index()] {
                    continue;
                }
                let mut dfs = Dfs::new(graph, start);
                while let Some(node) = dfs.next(graph) {
                    blocked[node.index()] = true;
                }
            }
        }

        blocked
    }

    /// Returns the number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the graph holds no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All task positions in stable order
    pub fn all_tasks(&self) -> Range<usize> {
        0..self.tasks.len()
    }

    /// Tasks in load order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn id(&self, pos: usize) -> TaskId {
        self.tasks[pos].id
    }

    pub fn cost(&self, pos: usize) -> u32 {
        self.tasks[pos].cost
    }

    pub fn class(&self, pos: usize) -> ChannelClass {
        self.tasks[pos].class()
    }

    /// Direct prerequisites of a task
    pub fn prerequisites(&self, pos: usize) -> &[usize] {
        &self.prerequisites[pos]
    }

    /// Returns the position of a task, if present
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// True iff every prerequisite of `pos` is in `known`
    pub fn dependencies_satisfied(&self, pos: usize, known: &TaskSet) -> bool {
        self.prerequisites[pos].iter().all(|dep| known.contains(*dep))
    }

    /// Empty set sized for this graph
    pub fn empty_set(&self) -> TaskSet {
        TaskSet::empty(self.len())
    }

    /// Sum of all task costs
    pub fn total_cost(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.cost)).sum()
    }

    /// Sum of task costs billed to one class
    pub fn class_cost(&self, class: ChannelClass) -> u64 {
        self.tasks
            .iter()
            .filter(|t| t.class() == class)
            .map(|t| u64::from(t.cost))
            .sum()
    }

    /// Largest single task cost (0 for an empty graph)
    pub fn max_cost(&self) -> u32 {
        self.tasks.iter().map(|t| t.cost).max().unwrap_or(0)
    }

    /// Largest single task cost within a class (0 if the class is empty)
    pub fn max_class_cost(&self, class: ChannelClass) -> u32 {
        self.tasks
            .iter()
            .filter(|t| t.class() == class)
            .map(|t| t.cost)
            .max()
            .unwrap_or(0)
    }

    /// Returns true if any dependency cycle exists
    pub fn is_cyclic(&self) -> bool {
        self.order.is_none()
    }

    /// Tasks that can never complete because of a cycle, in load order
    pub fn cycle_blocked_tasks(&self) -> Vec<TaskId> {
        self.all_tasks()
            .filter(|pos| self.blocked_by_cycle[*pos])
            .map(|pos| self.id(pos))
            .collect()
    }

    /// Positions in topological order (prerequisites first), if acyclic
    pub fn topological_order(&self) -> Option<&[usize]> {
        self.order.as_deref()
    }

    /// Number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
