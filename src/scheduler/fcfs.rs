//! First-Come-First-Served list scheduler.
//!
//! # Algorithm
//!
//! 1. Sort tasks by `(arrival_time, id)` ascending.
//! 2. For each task in that order, pick the VM that becomes free soonest
//!    (first such VM in pool order) and run the task there as early as possible.
//! 3. Makespan = latest `available_time` across the pool.
//!
//! Tasks with the same arrival time are ordered by lexicographic ID. This
//! tie-break is part of the scheduling policy: changing it changes schedules.
//!
//! The VM choice ignores burst length, so makespan can exceed what an optimal
//! packing (e.g. longest-task-first) achieves. Order is defined by arrival,
//! not by load balance.
//!
//! # Complexity
//! O(n log n + n * m) with linear scan, O(n log n + n log m) with the heap,
//! where n=tasks, m=VMs.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

use std::collections::HashMap;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::metrics::ScheduleMetrics;
use super::selector::{MachineSelector, SelectionStrategy};
use crate::error::SchedulerError;
use crate::models::{Task, TaskRecord, VirtualMachine};
use crate::validation::validate_input;

/// Lifecycle of a scheduler. A scheduler runs exactly one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Input accepted, nothing done yet.
    Unscheduled,
    /// Tasks ordered by arrival.
    Sorted,
    /// Assignment loop running.
    Assigning,
    /// All tasks assigned, makespan fixed.
    Completed,
}

/// FCFS scheduler over a pool of identical VMs.
///
/// Owns the task batch and the VM pool for the duration of one run; use
/// [`into_parts`](Self::into_parts) to take them back afterwards.
///
/// # Example
///
/// ```
/// use fcfs_sim::models::{Task, VirtualMachine};
/// use fcfs_sim::scheduler::FcfsScheduler;
///
/// let tasks = vec![Task::new("T1", 0, 5), Task::new("T2", 1, 8)];
/// let vms = vec![VirtualMachine::new("VM1"), VirtualMachine::new("VM2")];
///
/// let mut scheduler = FcfsScheduler::new(tasks, vms).unwrap();
/// let makespan = scheduler.simulate().unwrap();
/// assert_eq!(makespan, 9);
///
/// let metrics = scheduler.metrics().unwrap();
/// assert_eq!(metrics.makespan, 9);
/// ```
#[derive(Debug, Clone)]
pub struct FcfsScheduler {
    tasks: Vec<Task>,
    vms: Vec<VirtualMachine>,
    makespan: i64,
    phase: Phase,
    selection: SelectionStrategy,
}

impl FcfsScheduler {
    /// Creates a scheduler after validating the input.
    ///
    /// # Errors
    /// `InvalidInput` listing every problem found; nothing is mutated.
    pub fn new(tasks: Vec<Task>, vms: Vec<VirtualMachine>) -> Result<Self, SchedulerError> {
        validate_input(&tasks, &vms)?;
        Ok(Self {
            tasks,
            vms,
            makespan: 0,
            phase: Phase::Unscheduled,
            selection: SelectionStrategy::default(),
        })
    }

    /// Sets the VM selection strategy.
    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// VM selection strategy used by `simulate`.
    pub fn selection(&self) -> SelectionStrategy {
        self.selection
    }

    /// Tasks, in arrival order once sorted.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// VM pool, in its original order.
    pub fn vms(&self) -> &[VirtualMachine] {
        &self.vms
    }

    /// Makespan; 0 until the run completes.
    pub fn makespan(&self) -> i64 {
        self.makespan
    }

    /// Orders tasks by `(arrival_time, id)`.
    ///
    /// # Errors
    /// `InvalidState` unless the scheduler is still `Unscheduled`.
    pub fn sort_tasks_by_arrival(&mut self) -> Result<(), SchedulerError> {
        self.expect_phase(Phase::Unscheduled, "sort tasks")?;

        self.tasks.sort_by(|a, b| {
            (a.arrival_time, a.id.as_str()).cmp(&(b.arrival_time, b.id.as_str()))
        });
        self.phase = Phase::Sorted;

        trace!(
            "FCFS order: {:?}",
            self.tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Runs the simulation and returns the makespan.
    ///
    /// Sorts first if that has not happened yet.
    ///
    /// # Errors
    /// `InvalidState` if the simulation already ran.
    pub fn simulate(&mut self) -> Result<i64, SchedulerError> {
        match self.phase {
            Phase::Unscheduled => self.sort_tasks_by_arrival()?,
            Phase::Sorted => {}
            phase => {
                return Err(SchedulerError::InvalidState(format!(
                    "cannot simulate: scheduler is {phase:?}"
                )))
            }
        }

        info!(
            "Scheduling {} task(s) on {} VM(s) ({:?})",
            self.tasks.len(),
            self.vms.len(),
            self.selection
        );
        self.phase = Phase::Assigning;

        let mut selector = MachineSelector::new(self.selection, &self.vms);
        for task in self.tasks.iter_mut() {
            let idx = selector.next(&self.vms).ok_or_else(|| {
                SchedulerError::InvalidState("no virtual machine to assign to".into())
            })?;
            let (start, end) = self.vms[idx].assign(task)?;
            selector.release(idx, &self.vms);

            debug!(
                "Task {}: arrival={}, burst={}, start={}, end={}, vm={}",
                task.id, task.arrival_time, task.burst_time, start, end, self.vms[idx].id
            );
        }

        self.makespan = self
            .vms
            .iter()
            .map(|vm| vm.available_time())
            .max()
            .unwrap_or(0);
        self.phase = Phase::Completed;

        info!("Simulation complete: makespan={}", self.makespan);
        Ok(self.makespan)
    }

    /// Computes run metrics. Read-only; repeated calls give identical results.
    ///
    /// # Errors
    /// `InvalidState` before the simulation completes.
    pub fn metrics(&self) -> Result<ScheduleMetrics, SchedulerError> {
        self.expect_phase(Phase::Completed, "compute metrics")?;
        Ok(ScheduleMetrics::calculate(
            &self.tasks,
            &self.vms,
            self.makespan,
        ))
    }

    /// Per-task records, in scheduling order.
    pub fn scheduling_data(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(TaskRecord::from_task).collect()
    }

    /// Tasks run by a VM, in execution order. Empty for an unknown VM.
    pub fn history(&self, vm_id: &str) -> Vec<&Task> {
        let Some(vm) = self.vms.iter().find(|vm| vm.id == vm_id) else {
            return Vec::new();
        };
        let by_id: HashMap<&str, &Task> =
            self.tasks.iter().map(|t| (t.id.as_str(), t)).collect();
        vm.history()
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect()
    }

    /// Gives back the tasks and VMs.
    pub fn into_parts(self) -> (Vec<Task>, Vec<VirtualMachine>) {
        (self.tasks, self.vms)
    }

    fn expect_phase(&self, expected: Phase, action: &str) -> Result<(), SchedulerError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SchedulerError::InvalidState(format!(
                "cannot {action}: scheduler is {:?}, expected {expected:?}",
                self.phase
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{random_tasks, sample_tasks, virtual_machines};

    fn run(tasks: Vec<Task>, vm_count: usize, selection: SelectionStrategy) -> FcfsScheduler {
        let mut scheduler = FcfsScheduler::new(tasks, virtual_machines("VM", vm_count))
            .unwrap()
            .with_selection(selection);
        scheduler.simulate().unwrap();
        scheduler
    }

    fn placement(s: &FcfsScheduler, id: &str) -> (String, i64, i64) {
        let t = s.tasks().iter().find(|t| t.id == id).unwrap();
        (
            t.vm_id().unwrap().to_string(),
            t.start_time().unwrap(),
            t.completion_time().unwrap(),
        )
    }

    #[test]
    fn test_reference_scenario() {
        let s = run(sample_tasks(), 3, SelectionStrategy::LinearScan);

        assert_eq!(placement(&s, "T1"), ("VM1".into(), 0, 5));
        assert_eq!(placement(&s, "T2"), ("VM2".into(), 1, 9));
        assert_eq!(placement(&s, "T3"), ("VM3".into(), 2, 5));
        assert_eq!(placement(&s, "T4"), ("VM1".into(), 5, 12));
        assert_eq!(placement(&s, "T5"), ("VM3".into(), 5, 9));
        assert_eq!(placement(&s, "T6"), ("VM2".into(), 9, 15));
        assert_eq!(s.makespan(), 15);

        let busy: Vec<i64> = s.vms().iter().map(|vm| vm.total_busy_time()).collect();
        assert_eq!(busy, vec![12, 14, 7]);

        let m = s.metrics().unwrap();
        assert!((m.avg_utilization - 33.0 / 45.0 * 100.0).abs() < 1e-10);
        assert!((m.avg_utilization - 73.33).abs() < 0.01);
        // waits: 0,0,0,2,1,4  turnarounds: 5,8,3,9,5,10
        assert!((m.avg_waiting_time - 7.0 / 6.0).abs() < 1e-10);
        assert!((m.avg_turnaround_time - 40.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_reference_scenario_with_heap() {
        let scan = run(sample_tasks(), 3, SelectionStrategy::LinearScan);
        let heap = run(sample_tasks(), 3, SelectionStrategy::MinHeap);
        assert_eq!(heap.selection(), SelectionStrategy::MinHeap);
        assert_eq!(scan.tasks(), heap.tasks());
        assert_eq!(scan.vms(), heap.vms());
    }

    #[test]
    fn test_history() {
        let s = run(sample_tasks(), 3, SelectionStrategy::LinearScan);
        let ids: Vec<&str> = s.history("VM2").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T2", "T6"]);
        assert!(s.history("VM9").is_empty());
    }

    #[test]
    fn test_sort_tie_break_by_id() {
        let tasks = vec![
            Task::new("b", 0, 1),
            Task::new("c", 2, 1),
            Task::new("a", 0, 1),
        ];
        let mut s = FcfsScheduler::new(tasks, virtual_machines("VM", 1)).unwrap();
        s.sort_tasks_by_arrival().unwrap();
        assert_eq!(s.phase(), Phase::Sorted);

        let ids: Vec<&str> = s.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_vm_sequential() {
        let tasks = vec![
            Task::new("T3", 2, 3),
            Task::new("T1", 0, 5),
            Task::new("T2", 1, 8),
        ];
        let s = run(tasks, 1, SelectionStrategy::LinearScan);

        let ends: Vec<i64> = s
            .tasks()
            .iter()
            .map(|t| t.completion_time().unwrap())
            .collect();
        assert_eq!(ends, vec![5, 13, 16]);
        assert_eq!(s.makespan(), 16);
        assert!((s.metrics().unwrap().avg_utilization - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_idle_gap() {
        let tasks = vec![Task::new("T1", 0, 2), Task::new("T2", 10, 2)];
        let s = run(tasks, 1, SelectionStrategy::LinearScan);
        assert_eq!(placement(&s, "T2"), ("VM1".into(), 10, 12));
        assert!((s.metrics().unwrap().avg_utilization - 4.0 / 12.0 * 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let err = FcfsScheduler::new(vec![], vec![]).unwrap_err();
        match err {
            SchedulerError::InvalidInput(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_time_overflow_rejected() {
        use crate::validation::ValidationErrorKind;

        let half = i64::MAX / 2 + 1;
        let batches = vec![
            vec![Task::new("T1", i64::MAX - 1, 5)],
            vec![Task::new("T1", 0, half), Task::new("T2", 0, half)],
        ];
        for tasks in batches {
            match FcfsScheduler::new(tasks, virtual_machines("VM", 2)).unwrap_err() {
                SchedulerError::InvalidInput(errors) => {
                    assert_eq!(errors[0].kind, ValidationErrorKind::TimeOverflow)
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_simulate_twice_rejected() {
        let mut s = run(sample_tasks(), 2, SelectionStrategy::LinearScan);
        let before = s.tasks().to_vec();
        assert!(matches!(
            s.simulate(),
            Err(SchedulerError::InvalidState(_))
        ));
        assert_eq!(s.tasks(), before.as_slice());
    }

    #[test]
    fn test_metrics_before_completion_rejected() {
        let s = FcfsScheduler::new(sample_tasks(), virtual_machines("VM", 2)).unwrap();
        assert!(matches!(s.metrics(), Err(SchedulerError::InvalidState(_))));
        assert_eq!(s.makespan(), 0);
    }

    #[test]
    fn test_sort_after_simulate_rejected() {
        let mut s = run(sample_tasks(), 2, SelectionStrategy::LinearScan);
        assert!(s.sort_tasks_by_arrival().is_err());
    }

    #[test]
    fn test_metrics_idempotent() {
        let s = run(sample_tasks(), 3, SelectionStrategy::LinearScan);
        assert_eq!(s.metrics().unwrap(), s.metrics().unwrap());
    }

    #[test]
    fn test_deterministic() {
        let a = run(random_tasks(40, 7, 30, 12), 4, SelectionStrategy::LinearScan);
        let b = run(random_tasks(40, 7, 30, 12), 4, SelectionStrategy::LinearScan);
        assert_eq!(a.scheduling_data(), b.scheduling_data());
    }

    #[test]
    fn test_random_invariants() {
        for seed in 0..20 {
            let tasks = random_tasks(30, seed, 25, 10);
            let total_burst: i64 = tasks.iter().map(|t| t.burst_time).sum();
            let s = run(tasks, 1 + (seed as usize % 5), SelectionStrategy::LinearScan);

            // Causality
            for t in s.tasks() {
                let start = t.start_time().unwrap();
                assert!(start >= t.arrival_time);
                assert_eq!(t.completion_time().unwrap(), start + t.burst_time);
            }

            // FCFS ordering
            for pair in s.tasks().windows(2) {
                assert!(pair[0].arrival_time <= pair[1].arrival_time);
            }

            // VM monotonicity: history runs back to back without overlap
            for vm in s.vms() {
                let runs = s.history(&vm.id);
                for pair in runs.windows(2) {
                    assert!(pair[0].completion_time() <= pair[1].start_time());
                }
            }

            // Conservation
            let total_busy: i64 = s.vms().iter().map(|vm| vm.total_busy_time()).sum();
            assert_eq!(total_busy, total_burst);

            // Makespan equality
            let max_available = s.vms().iter().map(|vm| vm.available_time()).max();
            let max_completion = s.tasks().iter().filter_map(|t| t.completion_time()).max();
            assert_eq!(Some(s.makespan()), max_available);
            assert_eq!(Some(s.makespan()), max_completion);

            // Utilization bound
            let m = s.metrics().unwrap();
            for mu in &m.machines {
                assert!((0.0..=100.0).contains(&mu.utilization));
            }
        }
    }

    #[test]
    fn test_heap_matches_scan_on_random_workloads() {
        for seed in 100..120 {
            let scan = run(random_tasks(50, seed, 40, 15), 6, SelectionStrategy::LinearScan);
            let heap = run(random_tasks(50, seed, 40, 15), 6, SelectionStrategy::MinHeap);
            assert_eq!(scan.scheduling_data(), heap.scheduling_data());
            assert_eq!(scan.makespan(), heap.makespan());
        }
    }

    #[test]
    fn test_into_parts() {
        let s = run(sample_tasks(), 3, SelectionStrategy::LinearScan);
        let (tasks, vms) = s.into_parts();
        assert_eq!(tasks.len(), 6);
        assert_eq!(vms.len(), 3);
        assert!(tasks.iter().all(|t| t.is_scheduled()));
    }
}
