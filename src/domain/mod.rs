//! Domain models for dayplan
//!
//! Contains the task model and dependency graph without any I/O concerns.

mod id;
mod task;
mod set;
mod graph;

pub use id::{ChannelClass, IdError, TaskId};
pub use task::Task;
pub use set::TaskSet;
pub use graph::{GraphError, TaskGraph};
