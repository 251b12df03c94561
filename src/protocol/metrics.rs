// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Protocol metrics accumulator and summary.

use serde::{Deserialize, Serialize};

/// Raw per-operation metrics. Grows monotonically and is never pruned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMetrics {
    /// Elapsed logical time of each successful operation
    pub operation_times: Vec<f64>,
    /// Fidelity of each successful operation
    pub fidelities: Vec<f64>,
    /// Entanglement registry size when each operation completed
    pub entanglement_snapshots: Vec<usize>,
    /// Descriptions of failed operations
    pub errors: Vec<String>,
}

impl ProtocolMetrics {
    /// Record a successful operation.
    pub fn record(&mut self, elapsed: f64, fidelity: f64, registry_size: usize) {
        self.operation_times.push(elapsed);
        self.fidelities.push(fidelity);
        self.entanglement_snapshots.push(registry_size);
    }

    /// Record a failed operation.
    pub fn record_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Number of successful operations.
    pub fn len(&self) -> usize {
        self.operation_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operation_times.is_empty()
    }

    /// Summarize; `None` until at least one operation succeeded.
    pub fn summary(&self) -> Option<ProtocolSummary> {
        if self.operation_times.is_empty() {
            return None;
        }

        let (avg_time, std_time) = mean_std(&self.operation_times);
        let (avg_fidelity, _) = mean_std(&self.fidelities);
        let min_fidelity = self.fidelities.iter().copied().fold(f64::INFINITY, f64::min);
        let max_fidelity = self
            .fidelities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        Some(ProtocolSummary {
            avg_operation_time: avg_time,
            std_operation_time: std_time,
            avg_fidelity,
            min_fidelity,
            max_fidelity,
            total_operations: self.operation_times.len(),
            peak_entanglements: self.entanglement_snapshots.iter().copied().max().unwrap_or(0),
            error_count: self.errors.len(),
        })
    }
}

/// Mean and population standard deviation.
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Summary of all recorded protocol operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSummary {
    pub avg_operation_time: f64,
    pub std_operation_time: f64,
    pub avg_fidelity: f64,
    pub min_fidelity: f64,
    pub max_fidelity: f64,
    pub total_operations: usize,
    /// Largest registry snapshot seen (not de-duplicated)
    pub peak_entanglements: usize,
    pub error_count: usize,
}
