//! First-Come-First-Served scheduling simulator for virtual machine pools.
//!
//! Schedules a fixed batch of tasks across identical VMs in arrival order,
//! always handing the next task to the VM that becomes free soonest, then
//! derives makespan, utilization, waiting and turnaround metrics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Placement`, `VirtualMachine`, `TaskRecord`
//! - **`scheduler`**: `FcfsScheduler`, VM selection strategies, `ScheduleMetrics`
//! - **`validation`**: Input integrity checks (empty sets, duplicate IDs, bad times)
//! - **`config`**: JSON simulation configuration and workload construction
//! - **`report`**: Text execution table, timeline and utilization charts, JSON export
//!
//! The simulation is deterministic, single-threaded and offline: no preemption,
//! priorities or dynamic arrivals.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod scheduler;
pub mod validation;

pub use error::SchedulerError;
