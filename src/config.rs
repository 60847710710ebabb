//! Simulation configuration and workload construction.
//!
//! A configuration is a JSON document; every field is optional:
//!
//! ```json
//! {
//!   "vm_count": 3,
//!   "vm_prefix": "VM",
//!   "selection": "linear_scan",
//!   "workload": { "kind": "random", "count": 20, "seed": 42 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SchedulerError;
use crate::models::{Task, VirtualMachine};
use crate::scheduler::{FcfsScheduler, SelectionStrategy};

/// Errors raised while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Task definition as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: String,
    #[serde(default)]
    pub arrival_time: i64,
    pub burst_time: i64,
}

impl From<&TaskSpec> for Task {
    fn from(spec: &TaskSpec) -> Self {
        Task::new(spec.id.clone(), spec.arrival_time, spec.burst_time)
    }
}

/// Source of the task batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Workload {
    /// The six-task reference batch.
    #[default]
    Sample,
    /// Tasks listed in the configuration.
    Explicit { tasks: Vec<TaskSpec> },
    /// Seeded pseudo-random batch.
    Random {
        count: usize,
        #[serde(default)]
        seed: u64,
        #[serde(default = "default_max_arrival")]
        max_arrival: i64,
        #[serde(default = "default_max_burst")]
        max_burst: i64,
    },
}

fn default_max_arrival() -> i64 {
    20
}

fn default_max_burst() -> i64 {
    10
}

impl Workload {
    /// Builds the task batch.
    pub fn tasks(&self) -> Vec<Task> {
        match self {
            Workload::Sample => sample_tasks(),
            Workload::Explicit { tasks } => tasks.iter().map(Task::from).collect(),
            Workload::Random {
                count,
                seed,
                max_arrival,
                max_burst,
            } => random_tasks(*count, *seed, *max_arrival, *max_burst),
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of VMs in the pool.
    pub vm_count: usize,
    /// VM IDs are `{vm_prefix}1..={vm_count}`.
    pub vm_prefix: String,
    pub selection: SelectionStrategy,
    pub workload: Workload,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vm_count: 3,
            vm_prefix: "VM".to_string(),
            selection: SelectionStrategy::LinearScan,
            workload: Workload::Sample,
        }
    }
}

impl SimulationConfig {
    /// Parses and checks a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural checks that serde cannot express.
    ///
    /// Task-level problems (bursts, duplicate IDs) are left to
    /// [`validate_input`](crate::validation::validate_input).
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.vm_count == 0 {
            return Err(ConfigError::Invalid("vm_count must be at least 1".into()));
        }
        if let Workload::Random { count: 0, .. } = self.workload {
            return Err(ConfigError::Invalid(
                "random workload needs a positive count".into(),
            ));
        }
        Ok(())
    }

    pub fn build_tasks(&self) -> Vec<Task> {
        self.workload.tasks()
    }

    pub fn build_machines(&self) -> Vec<VirtualMachine> {
        virtual_machines(&self.vm_prefix, self.vm_count)
    }

    /// Builds a validated scheduler for this configuration.
    pub fn build_scheduler(&self) -> Result<FcfsScheduler, SchedulerError> {
        Ok(FcfsScheduler::new(self.build_tasks(), self.build_machines())?
            .with_selection(self.selection))
    }
}

/// The six-task reference batch (video render jobs of varying length).
pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new("T1", 0, 5),
        Task::new("T2", 1, 8),
        Task::new("T3", 2, 3),
        Task::new("T4", 3, 7),
        Task::new("T5", 4, 4),
        Task::new("T6", 5, 6),
    ]
}

/// `count` idle VMs named `{prefix}1..={count}`.
pub fn virtual_machines(prefix: &str, count: usize) -> Vec<VirtualMachine> {
    (1..=count)
        .map(|i| VirtualMachine::new(format!("{prefix}{i}")))
        .collect()
}

/// Seeded pseudo-random batch `T1..T{count}`.
///
/// Arrivals are drawn from `0..=max_arrival`, bursts from `1..=max_burst`.
/// The same arguments always yield the same batch.
pub fn random_tasks(count: usize, seed: u64, max_arrival: i64, max_burst: i64) -> Vec<Task> {
    let mut rng = StdRng::seed_from_u64(seed);
    let max_arrival = max_arrival.max(0);
    let max_burst = max_burst.max(1);

    (1..=count)
        .map(|i| {
            let arrival = rng.random_range(0..=max_arrival);
            let burst = rng.random_range(1..=max_burst);
            Task::new(format!("T{i}"), arrival, burst)
        })
        .collect()
}
