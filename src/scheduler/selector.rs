//! Soonest-free VM selection.
//!
//! Both strategies return the VM with the smallest `available_time`, breaking
//! ties by position in the pool (first minimum wins), so they produce the same
//! schedule. The heap keeps each pick at O(log m) for large pools.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::models::VirtualMachine;

/// How the next VM is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// O(m) scan over the pool for every task.
    #[default]
    LinearScan,
    /// Min-priority queue keyed by `(available_time, pool index)`.
    MinHeap,
}

/// Index of the VM free soonest; ties go to the lowest index.
///
/// Returns `None` for an empty pool.
pub fn earliest_available(vms: &[VirtualMachine]) -> Option<usize> {
    vms.iter()
        .enumerate()
        .min_by_key(|(_, vm)| vm.available_time())
        .map(|(idx, _)| idx)
}

/// Stateful selector used by the assignment loop.
///
/// Protocol: [`next`](Self::next) takes a VM out, the caller assigns a task to
/// it, then [`release`](Self::release) puts it back with its new availability.
#[derive(Debug, Clone)]
pub struct MachineSelector {
    strategy: SelectionStrategy,
    heap: BinaryHeap<Reverse<(i64, usize)>>,
}

impl MachineSelector {
    pub fn new(strategy: SelectionStrategy, vms: &[VirtualMachine]) -> Self {
        let heap = match strategy {
            SelectionStrategy::LinearScan => BinaryHeap::new(),
            SelectionStrategy::MinHeap => vms
                .iter()
                .enumerate()
                .map(|(idx, vm)| Reverse((vm.available_time(), idx)))
                .collect(),
        };
        Self { strategy, heap }
    }

    /// Picks the VM that should run the next task.
    pub fn next(&mut self, vms: &[VirtualMachine]) -> Option<usize> {
        match self.strategy {
            SelectionStrategy::LinearScan => earliest_available(vms),
            SelectionStrategy::MinHeap => self.heap.pop().map(|Reverse((_, idx))| idx),
        }
    }

    /// Returns a VM to the candidate set after an assignment.
    pub fn release(&mut self, idx: usize, vms: &[VirtualMachine]) {
        if self.strategy == SelectionStrategy::MinHeap {
            if let Some(vm) = vms.get(idx) {
                self.heap.push(Reverse((vm.available_time(), idx)));
            }
        }
    }
}
