// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! The network: nodes, the shared logical clock and the entanglement registry.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::entanglement::{EntanglementPair, SlotRef};
use super::gate::GateKind;
use super::node::{QuantumNode, SlotResetPolicy};
use crate::config::NetworkConfig;
use crate::error::{NetworkError, Result};
use crate::validation;

/// Entanglement generation costs this multiple of one classical message.
pub const ENTANGLEMENT_LATENCY_FACTOR: f64 = 1.5;

/// A network shared between the protocol engine and the scheduler.
///
/// Every clock advance and registry append happens under this lock.
pub type SharedNetwork = Arc<Mutex<QuantumNetwork>>;

/// Read-only snapshot of network state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub node_count: usize,
    pub qubit_count: usize,
    /// Registry length (every pair ever created, not de-duplicated)
    pub active_entanglement_count: usize,
    pub total_operations: u64,
    pub node_utilizations: Vec<f64>,
    pub logical_time: f64,
}

/// A set of quantum nodes joined by a simulated classical channel.
///
/// Owns the single logical clock for the run. The clock only moves forward,
/// and only when an operation charges time to it.
#[derive(Debug, Clone)]
pub struct QuantumNetwork {
    nodes: Vec<QuantumNode>,
    communication_latency: f64,
    entanglement_pairs: Vec<EntanglementPair>,
    logical_time: f64,
}

impl QuantumNetwork {
    /// Create a network of `num_nodes` identical nodes.
    pub fn new(num_nodes: usize, qubits_per_node: usize, communication_latency: f64) -> Self {
        Self::with_reset_policy(
            num_nodes,
            qubits_per_node,
            communication_latency,
            SlotResetPolicy::default(),
        )
    }

    /// Create a network whose nodes use the given reset policy.
    pub fn with_reset_policy(
        num_nodes: usize,
        qubits_per_node: usize,
        communication_latency: f64,
        reset_policy: SlotResetPolicy,
    ) -> Self {
        let nodes = (0..num_nodes)
            .map(|id| QuantumNode::with_reset_policy(id, qubits_per_node, reset_policy))
            .collect();

        info!(
            nodes = num_nodes,
            qubits_per_node,
            latency = communication_latency,
            "Initialized quantum network"
        );

        Self {
            nodes,
            communication_latency,
            entanglement_pairs: Vec::new(),
            logical_time: 0.0,
        }
    }

    /// Build a network from validated configuration.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        validation::validate_network_config(config)?;
        Ok(Self::with_reset_policy(
            config.num_nodes,
            config.qubits_per_node,
            config.communication_latency,
            config.reset_policy,
        ))
    }

    /// Wrap in a [`SharedNetwork`] handle.
    pub fn into_shared(self) -> SharedNetwork {
        Arc::new(Mutex::new(self))
    }

    pub fn nodes(&self) -> &[QuantumNode] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: usize) -> std::result::Result<&QuantumNode, NetworkError> {
        let num_nodes = self.nodes.len();
        self.nodes
            .get(id)
            .ok_or(NetworkError::InvalidNode { node: id, num_nodes })
    }

    pub fn node_mut(&mut self, id: usize) -> std::result::Result<&mut QuantumNode, NetworkError> {
        let num_nodes = self.nodes.len();
        self.nodes
            .get_mut(id)
            .ok_or(NetworkError::InvalidNode { node: id, num_nodes })
    }

    pub fn communication_latency(&self) -> f64 {
        self.communication_latency
    }

    /// Current logical time.
    pub fn logical_time(&self) -> f64 {
        self.logical_time
    }

    /// Every entanglement pair registered so far, in creation order.
    pub fn entanglement_pairs(&self) -> &[EntanglementPair] {
        &self.entanglement_pairs
    }

    /// Charge `dt` to the logical clock and return the new time.
    ///
    /// Negative or non-finite increments are ignored so the clock stays
    /// monotonic.
    pub fn advance_clock(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.logical_time += dt;
        }
        self.logical_time
    }

    /// Entangle two slots on different nodes.
    ///
    /// Either registers the pair and advances the clock by
    /// `latency * 1.5`, or fails without touching anything. Slots that are
    /// already entangled or reserved are not checked; repeated calls stack
    /// registry entries.
    pub fn create_entanglement(
        &mut self,
        node_a: usize,
        slot_a: usize,
        node_b: usize,
        slot_b: usize,
    ) -> std::result::Result<f64, NetworkError> {
        if node_a == node_b {
            return Err(NetworkError::SameNodeEntanglement { node: node_a });
        }
        self.node(node_a)?.check_slot(slot_a)?;
        self.node(node_b)?.check_slot(slot_b)?;

        let elapsed = self.communication_latency * ENTANGLEMENT_LATENCY_FACTOR;
        self.advance_clock(elapsed);

        let first = SlotRef::new(node_a, slot_a);
        let second = SlotRef::new(node_b, slot_b);
        self.entanglement_pairs.push(EntanglementPair {
            first,
            second,
            created_at: self.logical_time,
        });
        self.nodes[node_a].set_entangled(slot_a, second);
        self.nodes[node_b].set_entangled(slot_b, first);

        info!(%first, %second, "Created entanglement");
        Ok(elapsed)
    }

    /// Execute a gate on one node and charge its duration to the clock.
    pub fn execute_gate(
        &mut self,
        node: usize,
        gate: GateKind,
        slots: &[usize],
        duration: f64,
    ) -> std::result::Result<f64, NetworkError> {
        let elapsed = self.node_mut(node)?.execute_gate(gate, slots, duration)?;
        self.advance_clock(elapsed);
        Ok(elapsed)
    }

    /// Reserve `count` slots on the lowest-id node that has that many free.
    ///
    /// Returns the node id and the reserved slots, or `None` (reserving
    /// nothing) if no node qualifies.
    pub fn reserve_first_fit(&mut self, count: usize) -> Option<(usize, Vec<usize>)> {
        self.nodes
            .iter_mut()
            .find_map(|node| node.reserve_slots(count).map(|slots| (node.id(), slots)))
    }

    /// Reset one slot according to the node's reset policy.
    pub fn reset_slot(&mut self, node: usize, slot: usize) -> std::result::Result<(), NetworkError> {
        self.node_mut(node)?.reset_slot(slot)
    }

    /// Snapshot of network statistics.
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            node_count: self.nodes.len(),
            qubit_count: self.nodes.iter().map(QuantumNode::num_slots).sum(),
            active_entanglement_count: self.entanglement_pairs.len(),
            total_operations: self.nodes.iter().map(QuantumNode::total_operations).sum(),
            node_utilizations: self.nodes.iter().map(QuantumNode::utilization).collect(),
            logical_time: self.logical_time,
        }
    }
}
