//! Schedule quality metrics.
//!
//! Computes the run-level indicators from the final state of the tasks and
//! the VM pool.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Time the last VM becomes free |
//! | Utilization | busy_time / makespan × 100, per VM |
//! | Avg Utilization | Mean of per-VM utilization |
//! | Avg Waiting Time | Mean of start - arrival |
//! | Avg Turnaround Time | Mean of completion - arrival |
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Task, VirtualMachine};

/// Utilization of a single VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineUtilization {
    pub vm_id: String,
    /// Total burst time executed.
    pub busy_time: i64,
    /// Number of tasks executed.
    pub task_count: usize,
    /// Percentage of the makespan spent busy (0..=100).
    pub utilization: f64,
}

/// Run-level performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub makespan: i64,
    /// Per-VM utilization, in pool order.
    pub machines: Vec<MachineUtilization>,
    /// Mean utilization over all VMs (percentage).
    pub avg_utilization: f64,
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    /// Sum of busy time over all VMs, saturating at `i64::MAX`.
    pub total_busy_time: i64,
    pub task_count: usize,
}

impl ScheduleMetrics {
    /// Computes metrics from the final state of a run.
    ///
    /// Averages over an empty slice are reported as `0.0`.
    pub fn calculate(tasks: &[Task], vms: &[VirtualMachine], makespan: i64) -> Self {
        let machines: Vec<MachineUtilization> = vms
            .iter()
            .map(|vm| MachineUtilization {
                vm_id: vm.id.clone(),
                busy_time: vm.total_busy_time(),
                task_count: vm.task_count(),
                utilization: vm.utilization(makespan),
            })
            .collect();

        let avg_utilization = mean(machines.iter().map(|m| m.utilization), machines.len());
        let avg_waiting_time = mean(tasks.iter().map(|t| t.waiting_time() as f64), tasks.len());
        let avg_turnaround_time =
            mean(tasks.iter().map(|t| t.turnaround_time() as f64), tasks.len());

        Self {
            makespan,
            total_busy_time: machines
                .iter()
                .fold(0i64, |acc, m| acc.saturating_add(m.busy_time)),
            machines,
            avg_utilization,
            avg_waiting_time,
            avg_turnaround_time,
            task_count: tasks.len(),
        }
    }

    /// Utilization keyed by VM ID.
    pub fn utilization_by_vm(&self) -> HashMap<String, f64> {
        self.machines
            .iter()
            .map(|m| (m.vm_id.clone(), m.utilization))
            .collect()
    }

    /// Utilization of one VM, if present.
    pub fn utilization_of(&self, vm_id: &str) -> Option<f64> {
        self.machines
            .iter()
            .find(|m| m.vm_id == vm_id)
            .map(|m| m.utilization)
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}
