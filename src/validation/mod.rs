// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for configuration and scheduler submissions.

use crate::config::{NetworkConfig, SchedulerConfig, SimulationConfig};
use crate::error::{Result, ValidationError};
use crate::scheduler::SubcircuitDescriptor;

fn field_error(field: &str, message: impl Into<String>) -> crate::error::Error {
    ValidationError::Field {
        field: field.into(),
        message: message.into(),
    }
    .into()
}

/// Validate a non-negative, finite duration or latency.
fn validate_duration(field: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(field_error(field, "is NaN"));
    }
    if value.is_infinite() {
        return Err(field_error(field, "is infinite"));
    }
    if value < 0.0 {
        return Err(field_error(field, format!("must be non-negative, got {}", value)));
    }
    Ok(())
}

/// Validate a ratio in `[0, 1]`.
fn validate_unit_interval(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(field_error(field, format!("must be in [0, 1], got {}", value)));
    }
    Ok(())
}

/// Validate network construction parameters.
pub fn validate_network_config(config: &NetworkConfig) -> Result<()> {
    if config.num_nodes == 0 {
        return Err(field_error("num_nodes", "must be greater than 0"));
    }
    if config.qubits_per_node == 0 {
        return Err(field_error("qubits_per_node", "must be greater than 0"));
    }
    validate_duration("communication_latency", config.communication_latency)?;
    validate_duration("gate_execution_time", config.gate_execution_time)?;
    Ok(())
}

/// Validate simulation run parameters.
pub fn validate_simulation_config(config: &SimulationConfig) -> Result<()> {
    validate_unit_interval("fidelity_threshold", config.fidelity_threshold)?;
    validate_duration("latency_threshold", config.latency_threshold)?;
    validate_duration("resource_usage_ratio", config.resource_usage_ratio)?;
    Ok(())
}

/// Validate scheduler parameters.
pub fn validate_scheduler_config(config: &SchedulerConfig) -> Result<()> {
    validate_duration("base_execution_time", config.base_execution_time)?;
    validate_duration("gate_duration", config.gate_duration)?;
    if config.gate.is_controlled() {
        return Err(field_error(
            "gate",
            format!("scheduler gate must be single-qubit, got {}", config.gate),
        ));
    }
    Ok(())
}

/// Validate that a subcircuit asks for at least one qubit.
pub fn validate_required_qubits(descriptor: &SubcircuitDescriptor) -> Result<()> {
    if descriptor.required_qubits == 0 {
        return Err(field_error("required_qubits", "must be greater than 0"));
    }
    Ok(())
}

/// Validate a subcircuit descriptor against the largest node in the network.
///
/// A descriptor that no node could ever hold is still accepted by the
/// scheduler (it stays queued); this check is for callers that want to
/// reject such work up front. Zero-qubit descriptors are always rejected
/// by the scheduler itself.
pub fn validate_subcircuit(descriptor: &SubcircuitDescriptor, max_node_qubits: usize) -> Result<()> {
    validate_required_qubits(descriptor)?;
    if descriptor.required_qubits > max_node_qubits {
        return Err(ValidationError::ResourceLimit {
            resource: "required_qubits".into(),
            limit: max_node_qubits as u64,
            requested: descriptor.required_qubits as u64,
        }
        .into());
    }
    Ok(())
}
