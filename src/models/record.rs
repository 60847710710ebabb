//! Per-task result record.
//!
//! Flat, serializable view of a scheduled task for reporting and export.

use serde::{Deserialize, Serialize};

use super::Task;

/// One row of the execution report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub arrival_time: i64,
    pub burst_time: i64,
    /// `None` if the task was never scheduled.
    pub start_time: Option<i64>,
    pub completion_time: Option<i64>,
    pub vm_id: Option<String>,
    pub waiting_time: i64,
    pub turnaround_time: i64,
}

impl TaskRecord {
    /// Snapshot of a task's current state.
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            arrival_time: task.arrival_time,
            burst_time: task.burst_time,
            start_time: task.start_time(),
            completion_time: task.completion_time(),
            vm_id: task.vm_id().map(str::to_string),
            waiting_time: task.waiting_time(),
            turnaround_time: task.turnaround_time(),
        }
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self::from_task(task)
    }
}
