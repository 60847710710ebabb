//! Virtual machine (worker) model.
//!
//! A VM executes one task at a time, to completion. It tracks when it is next
//! free, how long it has been busy, and which tasks it ran.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.5:
//! Multiple-Processor Scheduling

use serde::{Deserialize, Serialize};

use super::task::{Placement, Task};
use crate::error::SchedulerError;
use crate::validation::{ValidationError, ValidationErrorKind};

/// A virtual machine in the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualMachine {
    /// Unique VM identifier.
    pub id: String,
    available_time: i64,
    total_busy_time: i64,
    history: Vec<String>,
}

impl VirtualMachine {
    /// Creates an idle VM, free from t=0.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            available_time: 0,
            total_busy_time: 0,
            history: Vec::new(),
        }
    }

    /// Time at which the VM can start its next task.
    #[inline]
    pub fn available_time(&self) -> i64 {
        self.available_time
    }

    /// Total burst time executed so far.
    #[inline]
    pub fn total_busy_time(&self) -> i64 {
        self.total_busy_time
    }

    /// IDs of the tasks assigned to this VM, in assignment order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Number of tasks assigned so far.
    pub fn task_count(&self) -> usize {
        self.history.len()
    }

    /// Whether the VM has never been assigned a task.
    pub fn is_idle(&self) -> bool {
        self.available_time == 0 && self.total_busy_time == 0 && self.history.is_empty()
    }

    /// Clears all state so the VM can take part in a new run.
    pub fn reset(&mut self) {
        self.available_time = 0;
        self.total_busy_time = 0;
        self.history.clear();
    }

    /// Runs `task` on this VM as early as possible.
    ///
    /// The task starts once both the VM is free and the task has arrived:
    /// `start = max(available_time, arrival_time)`.
    ///
    /// # Errors
    /// `InvalidState` if the task was already placed, `InvalidInput` if the
    /// completion time or busy time would overflow. Nothing is mutated.
    pub fn assign(&mut self, task: &mut Task) -> Result<(i64, i64), SchedulerError> {
        if let Some(existing) = task.vm_id() {
            return Err(SchedulerError::InvalidState(format!(
                "task '{}' is already assigned to '{}'",
                task.id, existing
            )));
        }

        let start_time = self.available_time.max(task.arrival_time);
        let completion_time = start_time
            .checked_add(task.burst_time)
            .ok_or_else(|| time_overflow(task))?;
        let total_busy_time = self
            .total_busy_time
            .checked_add(task.burst_time)
            .ok_or_else(|| time_overflow(task))?;

        task.place(Placement {
            start_time,
            completion_time,
            vm_id: self.id.clone(),
        });

        self.available_time = completion_time;
        self.total_busy_time = total_busy_time;
        self.history.push(task.id.clone());

        Ok((start_time, completion_time))
    }

    /// Busy share of the makespan, as a percentage.
    ///
    /// Returns `0.0` when `makespan` is zero.
    pub fn utilization(&self, makespan: i64) -> f64 {
        if makespan == 0 {
            return 0.0;
        }
        self.total_busy_time as f64 / makespan as f64 * 100.0
    }
}

fn time_overflow(task: &Task) -> SchedulerError {
    SchedulerError::InvalidInput(vec![ValidationError::new(
        ValidationErrorKind::TimeOverflow,
        format!("Task '{}' would complete past the time range", task.id),
    )])
}
