//! dayplan - Day-by-day scheduling of dependent tasks under daily capacity
//!
//! Tasks have an effort cost and prerequisites. Channels refill a fixed
//! capacity every day. dayplan finds the earliest day all tasks can be done,
//! lists every schedule within a deadline, or finds the smallest (or cheapest)
//! capacity that meets one, under instant or delayed sharing of finished work.

pub mod domain;
pub mod search;
pub mod storage;
pub mod cli;

pub use domain::{ChannelClass, Task, TaskGraph, TaskId};
pub use search::{
    Algorithm, CapacityScheme, Outcome, Problem, Schedule, SearchReport, SharingPolicy,
};
