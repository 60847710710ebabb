//! Task (job) model.
//!
//! A task is a single unit of work submitted to the VM pool: it becomes
//! schedulable at `arrival_time` and runs for `burst_time` without preemption.
//!
//! # Time Representation
//! All times are integer time units relative to the simulation epoch (t=0).

use serde::{Deserialize, Serialize};

/// Where and when a task ran. Set exactly once, by [`VirtualMachine::assign`].
///
/// [`VirtualMachine::assign`]: super::VirtualMachine::assign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Time execution began.
    pub start_time: i64,
    /// Time execution finished (`start_time + burst_time`).
    pub completion_time: i64,
    /// VM that executed the task.
    pub vm_id: String,
}

/// Scheduling status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not yet assigned to a VM.
    Unscheduled,
    /// Assigned; placement is fixed.
    Scheduled,
}

/// A task to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Time the task becomes schedulable.
    pub arrival_time: i64,
    /// Execution time required.
    pub burst_time: i64,
    #[serde(default)]
    placement: Option<Placement>,
}

impl Task {
    /// Creates an unscheduled task.
    pub fn new(id: impl Into<String>, arrival_time: i64, burst_time: i64) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            burst_time,
            placement: None,
        }
    }

    /// Current scheduling status.
    pub fn status(&self) -> TaskStatus {
        match self.placement {
            Some(_) => TaskStatus::Scheduled,
            None => TaskStatus::Unscheduled,
        }
    }

    /// Whether the task has been placed on a VM.
    pub fn is_scheduled(&self) -> bool {
        self.placement.is_some()
    }

    /// Placement details, if scheduled.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Start time, if scheduled.
    pub fn start_time(&self) -> Option<i64> {
        self.placement.as_ref().map(|p| p.start_time)
    }

    /// Completion time, if scheduled.
    pub fn completion_time(&self) -> Option<i64> {
        self.placement.as_ref().map(|p| p.completion_time)
    }

    /// ID of the VM the task ran on, if scheduled.
    pub fn vm_id(&self) -> Option<&str> {
        self.placement.as_ref().map(|p| p.vm_id.as_str())
    }

    /// Waiting time: `start_time - arrival_time`, or 0 if unscheduled.
    pub fn waiting_time(&self) -> i64 {
        self.start_time()
            .map(|start| start - self.arrival_time)
            .unwrap_or(0)
    }

    /// Turnaround time: `completion_time - arrival_time`, or 0 if unscheduled.
    pub fn turnaround_time(&self) -> i64 {
        self.completion_time()
            .map(|end| end - self.arrival_time)
            .unwrap_or(0)
    }

    pub(crate) fn place(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new_is_unscheduled() {
        let task = Task::new("T1", 3, 5);
        assert_eq!(task.id, "T1");
        assert_eq!(task.arrival_time, 3);
        assert_eq!(task.burst_time, 5);
        assert_eq!(task.status(), TaskStatus::Unscheduled);
        assert!(task.start_time().is_none());
        assert!(task.completion_time().is_none());
        assert!(task.vm_id().is_none());
    }

    #[test]
    fn test_unscheduled_metrics_are_zero() {
        let task = Task::new("T1", 7, 4);
        assert_eq!(task.waiting_time(), 0);
        assert_eq!(task.turnaround_time(), 0);
    }

    #[test]
    fn test_scheduled_metrics() {
        let mut task = Task::new("T2", 1, 8);
        task.place(Placement {
            start_time: 4,
            completion_time: 12,
            vm_id: "VM2".into(),
        });

        assert_eq!(task.status(), TaskStatus::Scheduled);
        assert_eq!(task.vm_id(), Some("VM2"));
        assert_eq!(task.waiting_time(), 3);
        assert_eq!(task.turnaround_time(), 11);
    }

    #[test]
    fn test_deserialize_without_placement() {
        let task: Task =
            serde_json::from_str(r#"{"id":"T9","arrival_time":2,"burst_time":6}"#).unwrap();
        assert_eq!(task, Task::new("T9", 2, 6));
    }
}
