//! FCFS scheduler and run metrics.
//!
//! # Algorithm
//!
//! `FcfsScheduler` orders tasks by arrival and greedily hands each one to the
//! VM that becomes free soonest. It is a list-scheduling heuristic, not an
//! optimizer.
//!
//! # Metrics
//!
//! `ScheduleMetrics` computes makespan, per-VM utilization, and average
//! waiting and turnaround times.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

mod fcfs;
mod metrics;
mod selector;

pub use fcfs::{FcfsScheduler, Phase};
pub use metrics::{MachineUtilization, ScheduleMetrics};
pub use selector::{earliest_available, MachineSelector, SelectionStrategy};
