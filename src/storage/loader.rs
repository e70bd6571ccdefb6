//! Problem-file loader
//!
//! Line-oriented text format:
//!
//! ```text
//! % comment
//! N 2            channel count
//! K 3            daily capacity per channel
//! A 1 2 0        task A1, cost 2, no prerequisites
//! A 2 1 1 0      task A2, cost 1, needs A1
//! ```
//!
//! The `0` closing a task line ends its prerequisite list; anything after it
//! is ignored, and a missing `0` is tolerated. Prerequisites may refer to tasks
//! declared further down the file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::{GraphError, Task, TaskGraph, TaskId};

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Line {line}: task {task} already declared on line {first}")]
    DuplicateTask { line: usize, task: TaskId, first: usize },

    #[error("Line {line}: task {task} depends on unknown task {prerequisite}")]
    UnknownPrerequisite {
        line: usize,
        task: TaskId,
        prerequisite: TaskId,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A parsed problem description
#[derive(Debug, Clone)]
pub struct ProblemFile {
    /// From the `N` line, if present
    pub channels: Option<usize>,

    /// From the `K` line, if present
    pub capacity: Option<u32>,

    pub graph: TaskGraph,
}

impl ProblemFile {
    /// Reads and parses a problem file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem file: {}", path.display()))?;

        let problem = parse(&content)
            .with_context(|| format!("Failed to parse problem file: {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            tasks = problem.graph.len(),
            edges = problem.graph.edge_count(),
            "loaded problem file"
        );
        Ok(problem)
    }
}

fn syntax(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Syntax {
        line,
        message: message.into(),
    }
}

fn number<T: std::str::FromStr>(
    line: usize,
    what: &str,
    token: Option<&str>,
) -> Result<T, LoadError> {
    let token = token.ok_or_else(|| syntax(line, format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| syntax(line, format!("invalid {} '{}'", what, token)))
}

fn task_id(line: usize, token: &str) -> Result<TaskId, LoadError> {
    token.parse().map_err(|e: crate::domain::IdError| syntax(line, e.to_string()))
}

/// Parses problem text into a graph plus optional global parameters
pub fn parse(content: &str) -> Result<ProblemFile, LoadError> {
    let mut channels = None;
    let mut capacity = None;
    let mut tasks: Vec<(usize, Task)> = Vec::new();
    let mut declared: HashMap<TaskId, usize> = HashMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('%') {
            continue;
        }

        let mut parts = text.split_whitespace();
        let directive = parts.next().unwrap_or_default();
        match directive {
            "N" => {
                let count: usize = number(line, "channel count", parts.next())?;
                if count == 0 {
                    return Err(syntax(line, "channel count must be positive"));
                }
                channels = Some(count);
            }
            "K" => capacity = Some(number(line, "capacity", parts.next())?),
            "A" => {
                let token = parts.next().ok_or_else(|| syntax(line, "missing task id"))?;
                let id = task_id(line, token)?;
                let cost: u32 = number(line, "cost", parts.next())?;
                if cost == 0 {
                    return Err(syntax(line, format!("task {} must have a positive cost", id)));
                }

                let mut task = Task::new(id, cost);
                for token in parts {
                    if token == "0" {
                        break;
                    }
                    task.add_prerequisite(task_id(line, token)?);
                }

                if let Some(first) = declared.insert(id, line) {
                    return Err(LoadError::DuplicateTask {
                        line,
                        task: id,
                        first,
                    });
                }
                tasks.push((line, task));
            }
            other => {
                tracing::warn!(line, directive = other, "skipping unknown directive");
            }
        }
    }

    for (line, task) in &tasks {
        if let Some(missing) = task.prerequisites.iter().find(|dep| !declared.contains_key(*dep)) {
            return Err(LoadError::UnknownPrerequisite {
                line: *line,
                task: task.id,
                prerequisite: *missing,
            });
        }
    }

    let graph = TaskGraph::from_tasks(tasks.into_iter().map(|(_, task)| task))?;
    Ok(ProblemFile {
        channels,
        capacity,
        graph,
    })
}
