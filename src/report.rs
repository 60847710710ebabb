//! Text and JSON reporting for a completed run.
//!
//! Renders the execution table, a per-VM timeline (Gantt view) and a
//! utilization bar chart as plain text, and exports the whole result as JSON.

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::models::{TaskRecord, VirtualMachine};
use crate::scheduler::{FcfsScheduler, ScheduleMetrics};

/// Maximum timeline width in characters; longer makespans are scaled down.
pub const GANTT_WIDTH: usize = 60;
/// Width of a 100 % utilization bar.
pub const BAR_WIDTH: usize = 40;

/// Utilization classification used by the bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilizationBand {
    /// At least 70 %.
    High,
    /// At least 40 %.
    Moderate,
    Low,
}

impl UtilizationBand {
    pub fn from_percentage(utilization: f64) -> Self {
        if utilization >= 70.0 {
            UtilizationBand::High
        } else if utilization >= 40.0 {
            UtilizationBand::Moderate
        } else {
            UtilizationBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UtilizationBand::High => "high",
            UtilizationBand::Moderate => "moderate",
            UtilizationBand::Low => "low",
        }
    }
}

/// Full result of a run, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Per-task rows, in scheduling order.
    pub tasks: Vec<TaskRecord>,
    pub metrics: ScheduleMetrics,
}

impl SimulationReport {
    /// Collects the records and metrics of a completed scheduler.
    pub fn from_scheduler(scheduler: &FcfsScheduler) -> Result<Self, SchedulerError> {
        Ok(Self {
            metrics: scheduler.metrics()?,
            tasks: scheduler.scheduling_data(),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Table, timeline, utilization chart and summary in one document.
    pub fn render_text(&self, vms: &[VirtualMachine]) -> String {
        [
            execution_table(&self.tasks),
            gantt_chart(&self.tasks, vms, self.metrics.makespan),
            utilization_chart(&self.metrics),
            summary(&self.metrics),
        ]
        .join("\n")
    }
}

fn rule(width: usize) -> String {
    "=".repeat(width)
}

fn opt(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

/// Task execution details, one row per task.
pub fn execution_table(records: &[TaskRecord]) -> String {
    let mut lines = vec![
        rule(70),
        "TASK EXECUTION DETAILS".to_string(),
        rule(70),
        format!(
            "{:<8} {:>7} {:>6} {:>6} {:>6} {:<6} {:>8} {:>10}",
            "Task", "Arrival", "Burst", "Start", "End", "VM", "Waiting", "Turnaround"
        ),
    ];
    for r in records {
        lines.push(format!(
            "{:<8} {:>7} {:>6} {:>6} {:>6} {:<6} {:>8} {:>10}",
            r.task_id,
            r.arrival_time,
            r.burst_time,
            opt(r.start_time),
            opt(r.completion_time),
            r.vm_id.as_deref().unwrap_or("-"),
            r.waiting_time,
            r.turnaround_time
        ));
    }
    lines.push(rule(70));
    lines.join("\n") + "\n"
}

/// `ceil(a / b)` for non-negative `a` and positive `b`, without overflow.
fn div_ceil(a: i64, b: i64) -> i64 {
    a / b + i64::from(a % b != 0)
}

/// Time units per timeline column.
fn gantt_scale(makespan: i64) -> i64 {
    div_ceil(makespan, GANTT_WIDTH as i64).max(1)
}

/// Per-VM timeline. Each task occupies the columns of its execution interval,
/// labelled with its ID where space allows; `.` marks idle time.
pub fn gantt_chart(records: &[TaskRecord], vms: &[VirtualMachine], makespan: i64) -> String {
    let scale = gantt_scale(makespan);
    let columns = div_ceil(makespan, scale).max(1) as usize;
    let name_width = vms.iter().map(|vm| vm.id.len()).max().unwrap_or(2).max(2);

    let mut lines = vec![format!(
        "Gantt chart (1 column = {scale} time unit{})",
        if scale == 1 { "" } else { "s" }
    )];

    for vm in vms {
        let mut row = vec!['.'; columns];
        for r in records.iter().filter(|r| r.vm_id.as_deref() == Some(vm.id.as_str())) {
            let (Some(start), Some(end)) = (r.start_time, r.completion_time) else {
                continue;
            };
            let from = ((start / scale) as usize).min(columns - 1);
            let to = ((end / scale) as usize).clamp(from + 1, columns);
            let width = to - from;
            let label: String = r.task_id.chars().take(width).collect();
            let segment = format!("{label:-^width$}");
            for (cell, ch) in row[from..to].iter_mut().zip(segment.chars()) {
                *cell = ch;
            }
        }
        lines.push(format!(
            "{:>name_width$} |{}|",
            vm.id,
            row.into_iter().collect::<String>()
        ));
    }

    let axis_end = makespan.to_string();
    let padding = columns.saturating_sub(axis_end.len());
    lines.push(format!(
        "{:>name_width$}  0{}{}",
        "",
        " ".repeat(padding.saturating_sub(1)),
        axis_end
    ));
    lines.push(format!("Makespan: {makespan}"));
    lines.join("\n") + "\n"
}

/// Horizontal utilization bars with band labels and the pool average.
pub fn utilization_chart(metrics: &ScheduleMetrics) -> String {
    let name_width = metrics
        .machines
        .iter()
        .map(|m| m.vm_id.len())
        .max()
        .unwrap_or(2)
        .max(2);

    let mut lines = vec!["Virtual machine utilization".to_string()];
    for m in &metrics.machines {
        let filled = ((m.utilization / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        lines.push(format!(
            "{:>name_width$} |{}{}| {:>6.2}% ({}/{} units, {})",
            m.vm_id,
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            m.utilization,
            m.busy_time,
            metrics.makespan,
            UtilizationBand::from_percentage(m.utilization).label()
        ));
    }
    lines.push(format!("Average: {:.2}%", metrics.avg_utilization));
    lines.join("\n") + "\n"
}

/// Headline metrics.
pub fn summary(metrics: &ScheduleMetrics) -> String {
    let mut lines = vec![
        rule(70),
        "PERFORMANCE METRICS".to_string(),
        rule(70),
        format!("Makespan: {} time units", metrics.makespan),
        "Virtual machine utilization:".to_string(),
    ];
    for m in &metrics.machines {
        lines.push(format!(
            "  {}: {:.2}% (busy {}/{} time units, {} task(s))",
            m.vm_id, m.utilization, m.busy_time, metrics.makespan, m.task_count
        ));
    }
    lines.push(format!(
        "  Average VM utilization: {:.2}%",
        metrics.avg_utilization
    ));
    lines.push(format!(
        "Average waiting time: {:.2} time units",
        metrics.avg_waiting_time
    ));
    lines.push(format!(
        "Average turnaround time: {:.2} time units",
        metrics.avg_turnaround_time
    ));
    lines.push(rule(70));
    lines.join("\n") + "\n"
}
