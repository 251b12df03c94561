// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test fixtures.

use crate::network::{QuantumNetwork, SharedNetwork};
use crate::protocol::QuantumProtocols;
use crate::scheduler::{QuantumScheduler, SubcircuitDescriptor};

/// Fresh shared network with every slot available.
pub fn shared_network(num_nodes: usize, qubits_per_node: usize, latency: f64) -> SharedNetwork {
    QuantumNetwork::new(num_nodes, qubits_per_node, latency).into_shared()
}

/// Protocol engine over a fresh network.
pub fn test_protocols(
    num_nodes: usize,
    qubits_per_node: usize,
    latency: f64,
    seed: u64,
) -> QuantumProtocols {
    QuantumProtocols::new(shared_network(num_nodes, qubits_per_node, latency), seed)
}

/// Default-configured scheduler over a fresh network with 0.1 latency.
pub fn test_scheduler(num_nodes: usize, qubits_per_node: usize) -> QuantumScheduler {
    QuantumScheduler::new(shared_network(num_nodes, qubits_per_node, 0.1))
}

/// One descriptor per entry, partition id = position.
pub fn descriptors(required_qubits: &[usize]) -> Vec<SubcircuitDescriptor> {
    required_qubits
        .iter()
        .enumerate()
        .map(|(partition_id, &required)| SubcircuitDescriptor::new(partition_id, required))
        .collect()
}
