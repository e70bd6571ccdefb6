//! Task identifiers and channel classes
//!
//! ID Format:
//! - Task IDs: `A{number}` (e.g., `A7`); the bare number (`7`) is accepted on input
//!
//! The channel class of a task is derived from the parity of its number, which is
//! how two-channel problems decide which resource pool pays for a task.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID format: expected 'A{{number}}' or '{{number}}', got '{0}'")]
    InvalidTaskId(String),

    #[error("Task number must be positive, got '{0}'")]
    ZeroTaskId(String),
}

/// Task ID in the format `A{number}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(u32);

impl TaskId {
    /// Creates a task ID from its number
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the numeric part of the ID
    pub fn number(&self) -> u32 {
        self.0
    }

    /// Returns the channel class this task is billed to
    pub fn class(&self) -> ChannelClass {
        ChannelClass::of(self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('A')
            .or_else(|| s.strip_prefix('a'))
            .unwrap_or(s);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdError::InvalidTaskId(s.to_string()));
        }

        let number: u32 = digits
            .parse()
            .map_err(|_| IdError::InvalidTaskId(s.to_string()))?;

        if number == 0 {
            return Err(IdError::ZeroTaskId(s.to_string()));
        }

        Ok(Self(number))
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

/// Resource pool a task is billed to in two-channel problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelClass {
    /// Even-numbered tasks
    Even,
    /// Odd-numbered tasks
    Odd,
}

impl ChannelClass {
    /// All classes in a stable order
    pub const ALL: [ChannelClass; 2] = [ChannelClass::Even, ChannelClass::Odd];

    /// Returns the class for a task number
    pub fn of(number: u32) -> Self {
        if number % 2 == 0 {
            ChannelClass::Even
        } else {
            ChannelClass::Odd
        }
    }

    /// Returns a stable index (0 for even, 1 for odd)
    pub fn index(&self) -> usize {
        match self {
            ChannelClass::Even => 0,
            ChannelClass::Odd => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelClass::Even => "even",
            ChannelClass::Odd => "odd",
        }
    }
}

impl fmt::Display for ChannelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
