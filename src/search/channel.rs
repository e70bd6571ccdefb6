//! Channels and capacity schemes
//!
//! A channel is a scheduling lane that refills a fixed daily capacity. It may be
//! restricted to one [`ChannelClass`] (two-class problems bill even and odd
//! tasks to separate pools) or accept every task.

use serde::Serialize;
use thiserror::Error;

use super::outcome::Infeasibility;
use crate::domain::{ChannelClass, TaskGraph};

#[derive(Debug, Error, PartialEq)]
pub enum SchemeError {
    #[error("A capacity scheme needs at least one channel")]
    NoChannels,

    #[error("Daily task limit must be positive")]
    ZeroTaskLimit,
}

/// One scheduling lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Effort available per day
    pub capacity: u32,

    /// Restricts the channel to one class of tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ChannelClass>,
}

impl Channel {
    /// A channel that accepts every task
    pub fn open(capacity: u32) -> Self {
        Self {
            capacity,
            class: None,
        }
    }

    /// A channel that only accepts tasks of `class`
    pub fn dedicated(class: ChannelClass, capacity: u32) -> Self {
        Self {
            capacity,
            class: Some(class),
        }
    }

    pub fn accepts(&self, class: ChannelClass) -> bool {
        self.class.map_or(true, |c| c == class)
    }
}

/// The capacity values assigned to the channels for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityScheme {
    channels: Vec<Channel>,

    /// Maximum number of tasks started per day across all channels
    #[serde(skip_serializing_if = "Option::is_none")]
    tasks_per_day: Option<u32>,
}

impl CapacityScheme {
    pub fn new(channels: Vec<Channel>) -> Result<Self, SchemeError> {
        if channels.is_empty() {
            return Err(SchemeError::NoChannels);
        }
        Ok(Self {
            channels,
            tasks_per_day: None,
        })
    }

    /// `count` interchangeable channels with the same capacity
    pub fn uniform(count: usize, capacity: u32) -> Result<Self, SchemeError> {
        Self::new(vec![Channel::open(capacity); count])
    }

    /// One dedicated channel per class: channel 0 for even, channel 1 for odd
    pub fn per_class(even_capacity: u32, odd_capacity: u32) -> Self {
        Self {
            channels: vec![
                Channel::dedicated(ChannelClass::Even, even_capacity),
                Channel::dedicated(ChannelClass::Odd, odd_capacity),
            ],
            tasks_per_day: None,
        }
    }

    /// Caps the number of tasks started per day
    pub fn with_tasks_per_day(mut self, limit: Option<u32>) -> Result<Self, SchemeError> {
        if limit == Some(0) {
            return Err(SchemeError::ZeroTaskLimit);
        }
        self.tasks_per_day = limit;
        Ok(self)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn capacity(&self, channel: usize) -> u32 {
        self.channels[channel].capacity
    }

    pub fn tasks_per_day(&self) -> Option<u32> {
        self.tasks_per_day
    }

    pub fn accepts(&self, channel: usize, class: ChannelClass) -> bool {
        self.channels[channel].accepts(class)
    }

    /// Sum of all channel capacities
    pub fn total_capacity(&self) -> u64 {
        self.channels.iter().map(|c| u64::from(c.capacity)).sum()
    }

    /// Largest single channel capacity
    pub fn max_capacity(&self) -> u32 {
        self.channels.iter().map(|c| c.capacity).max().unwrap_or(0)
    }

    /// Daily capacity available to tasks of `class`
    pub fn class_capacity(&self, class: ChannelClass) -> u64 {
        self.channels
            .iter()
            .filter(|c| c.accepts(class))
            .map(|c| u64::from(c.capacity))
            .sum()
    }

    /// Largest single channel able to take a task of `class`
    pub fn max_class_capacity(&self, class: ChannelClass) -> u32 {
        self.channels
            .iter()
            .filter(|c| c.accepts(class))
            .map(|c| c.capacity)
            .max()
            .unwrap_or(0)
    }

    /// Returns the first task (in load order) that no channel can ever hold
    pub fn check(&self, graph: &TaskGraph) -> Option<Infeasibility> {
        for class in ChannelClass::ALL {
            let remaining = graph.class_cost(class);
            if remaining > 0 && self.class_capacity(class) == 0 {
                return Some(Infeasibility::NoCapacity { class, remaining });
            }
        }

        graph.tasks().iter().find_map(|task| {
            let capacity = self.max_class_capacity(task.class());
            (task.cost > capacity).then_some(Infeasibility::OversizedTask {
                task: task.id,
                cost: task.cost,
                capacity,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::graph;

    #[test]
    fn uniform_scheme() {
        let scheme = CapacityScheme::uniform(3, 4).unwrap();
        assert_eq!(scheme.len(), 3);
        assert_eq!(scheme.total_capacity(), 12);
        assert_eq!(scheme.max_capacity(), 4);
        assert!(scheme.accepts(2, ChannelClass::Even));
        assert!(scheme.accepts(2, ChannelClass::Odd));
    }

    #[test]
    fn no_channels_rejected() {
        assert_eq!(CapacityScheme::uniform(0, 4).unwrap_err(), SchemeError::NoChannels);
    }

    #[test]
    fn zero_task_limit_rejected() {
        let scheme = CapacityScheme::uniform(1, 1).unwrap();
        assert_eq!(
            scheme.with_tasks_per_day(Some(0)).unwrap_err(),
            SchemeError::ZeroTaskLimit
        );
    }

    #[test]
    fn per_class_channels() {
        let scheme = CapacityScheme::per_class(5, 2);
        assert!(scheme.accepts(0, ChannelClass::Even));
        assert!(!scheme.accepts(0, ChannelClass::Odd));
        assert!(scheme.accepts(1, ChannelClass::Odd));
        assert_eq!(scheme.class_capacity(ChannelClass::Even), 5);
        assert_eq!(scheme.max_class_capacity(ChannelClass::Odd), 2);
    }

    #[test]
    fn check_flags_oversized_task() {
        let g = graph(&[(1, 2, &[]), (2, 6, &[])]);
        let scheme = CapacityScheme::uniform(2, 5).unwrap();
        assert!(matches!(
            scheme.check(&g),
            Some(Infeasibility::OversizedTask { cost: 6, capacity: 5, .. })
        ));
    }

    #[test]
    fn check_flags_class_without_capacity() {
        let g = graph(&[(1, 2, &[]), (2, 1, &[])]);
        let scheme = CapacityScheme::per_class(3, 0);
        assert_eq!(
            scheme.check(&g),
            Some(Infeasibility::NoCapacity {
                class: ChannelClass::Odd,
                remaining: 2
            })
        );
    }

    #[test]
    fn check_allows_zero_capacity_for_empty_class() {
        let g = graph(&[(2, 3, &[]), (4, 1, &[2])]);
        let scheme = CapacityScheme::per_class(3, 0);
        assert_eq!(scheme.check(&g), None);
    }
}
