//! Input validation for a simulation run.
//!
//! Checks the task batch and VM pool before scheduling. Detects:
//! - Empty task batch or VM pool
//! - Duplicate IDs
//! - Negative arrival times and non-positive burst times
//! - Tasks already placed and VMs carrying state from an earlier run
//! - Batches whose completion times could exceed `i64::MAX`
//!
//! All problems are collected and reported together.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Task, VirtualMachine};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// No tasks were supplied.
    EmptyTaskSet,
    /// No VMs were supplied.
    EmptyMachinePool,
    /// Two tasks or two VMs share the same ID.
    DuplicateId,
    /// A task arrives before t=0.
    NegativeArrival,
    /// A task has zero or negative burst time.
    NonPositiveBurst,
    /// A task already carries a placement.
    AlreadyScheduled,
    /// A VM has state left over from another run.
    MachineNotIdle,
    /// Completion times could exceed the representable time range.
    TimeOverflow,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the input of a simulation run.
///
/// Checks:
/// 1. At least one task and one VM
/// 2. No duplicate task IDs, no duplicate VM IDs
/// 3. `arrival_time >= 0` and `burst_time > 0` for every task
/// 4. No task is already scheduled
/// 5. Every VM is idle
/// 6. Latest arrival plus total burst fits in `i64`, which bounds every
///    completion time the run can produce
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tasks: &[Task], vms: &[VirtualMachine]) -> ValidationResult {
    let mut errors = Vec::new();

    if tasks.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTaskSet,
            "No tasks to schedule",
        ));
    }
    if vms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyMachinePool,
            "No virtual machines to schedule on",
        ));
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        if task.arrival_time < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeArrival,
                format!(
                    "Task '{}' has negative arrival time {}",
                    task.id, task.arrival_time
                ),
            ));
        }
        if task.burst_time <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveBurst,
                format!(
                    "Task '{}' has non-positive burst time {}",
                    task.id, task.burst_time
                ),
            ));
        }
        if let Some(vm_id) = task.vm_id() {
            errors.push(ValidationError::new(
                ValidationErrorKind::AlreadyScheduled,
                format!("Task '{}' is already scheduled on '{}'", task.id, vm_id),
            ));
        }
    }

    let mut vm_ids = HashSet::new();
    for vm in vms {
        if !vm_ids.insert(vm.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate VM ID: {}", vm.id),
            ));
        }
        if !vm.is_idle() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MachineNotIdle,
                format!(
                    "VM '{}' is not idle ({} task(s), available at {})",
                    vm.id,
                    vm.task_count(),
                    vm.available_time()
                ),
            ));
        }
    }

    if completion_bound(tasks).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::TimeOverflow,
            "Latest arrival plus total burst time exceeds the time range",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Upper bound on any completion time: latest arrival plus total burst.
///
/// `None` if the bound overflows.
fn completion_bound(tasks: &[Task]) -> Option<i64> {
    let total_burst = tasks
        .iter()
        .try_fold(0i64, |acc, t| acc.checked_add(t.burst_time.max(0)))?;
    let latest_arrival = tasks.iter().map(|t| t.arrival_time).max().unwrap_or(0);
    total_burst.checked_add(latest_arrival.max(0))
}
