// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scheduler input and output types.

use serde::{Deserialize, Serialize};

/// The part of an externally built subcircuit the scheduler needs.
///
/// Circuit contents are never inspected; `label` is carried through for
/// the caller's own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcircuitDescriptor {
    /// Partition this subcircuit came from
    pub partition_id: usize,
    /// Number of qubit slots the subcircuit occupies while running
    pub required_qubits: usize,
    /// Opaque caller-side handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SubcircuitDescriptor {
    pub fn new(partition_id: usize, required_qubits: usize) -> Self {
        Self {
            partition_id,
            required_qubits,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One executed subcircuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub node_id: usize,
    /// Partition id of the executed subcircuit
    pub subcircuit_id: usize,
    /// Base cost plus every gate duration
    pub elapsed: f64,
    pub slots_used: Vec<usize>,
}

/// Result of one [`execute_schedule`](super::QuantumScheduler::execute_schedule) drain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAnalysis {
    /// Logical clock delta over the whole drain
    pub total_execution_time: f64,
    pub circuits_executed: usize,
    /// `total_execution_time / max(1, circuits_executed)`
    pub average_circuit_time: f64,
    pub node_utilizations: Vec<f64>,
    /// `executed / max(1, executed + still_pending)`
    pub schedule_efficiency: f64,
    /// Items taken from the queue for this drain
    pub batch_size: usize,
    /// Items from this drain's batch that were re-queued
    pub still_pending: usize,
    /// Live queue length right after the drain, including work submitted
    /// while it ran
    pub queue_len: usize,
    pub completions: Vec<CompletionRecord>,
}
