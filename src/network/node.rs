// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! A single quantum-processing node.
//!
//! A node owns a fixed pool of qubit slots, the set of slots not currently
//! held by in-flight work, and an append-only operation log. Qubit state is
//! an opaque token: nothing here simulates amplitudes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entanglement::SlotRef;
use super::gate::GateKind;
use crate::error::NetworkError;

/// Behavior of [`QuantumNode::reset_slot`] for out-of-range indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotResetPolicy {
    /// Reject with [`NetworkError::InvalidSlot`].
    #[default]
    Strict,
    /// Ignore the request.
    Lenient,
}

/// Opaque qubit state token.
///
/// Carries the id of the operation that last touched the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateToken(pub u64);

/// One addressable qubit position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QubitSlot {
    /// Opaque state (None = freshly reset)
    pub state: Option<StateToken>,
    /// Peer slot this one is entangled with, if any
    pub entangled_with: Option<SlotRef>,
    /// Last gate applied to this slot
    pub last_operation: Option<GateKind>,
}

/// Record of one executed gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Operation id (value of the node's counter when executed)
    pub id: u64,
    pub gate: GateKind,
    pub slots: Vec<usize>,
    /// Logical duration supplied by the caller
    pub duration: f64,
    pub node_id: usize,
}

/// A simulated quantum-processing unit.
#[derive(Debug, Clone)]
pub struct QuantumNode {
    id: usize,
    slots: Vec<QubitSlot>,
    available: BTreeSet<usize>,
    history: Vec<OperationRecord>,
    total_operations: u64,
    reset_policy: SlotResetPolicy,
}

impl QuantumNode {
    /// Create a node with `num_slots` unentangled, available slots.
    pub fn new(id: usize, num_slots: usize) -> Self {
        Self::with_reset_policy(id, num_slots, SlotResetPolicy::default())
    }

    /// Create a node with an explicit reset policy.
    pub fn with_reset_policy(id: usize, num_slots: usize, reset_policy: SlotResetPolicy) -> Self {
        debug!(node = id, slots = num_slots, "Initialized node");
        Self {
            id,
            slots: vec![QubitSlot::default(); num_slots],
            available: (0..num_slots).collect(),
            history: Vec::new(),
            total_operations: 0,
            reset_policy,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of qubit slots (N).
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[QubitSlot] {
        &self.slots
    }

    /// Look up a slot by index.
    pub fn slot(&self, index: usize) -> Result<&QubitSlot, NetworkError> {
        self.check_slot(index)?;
        Ok(&self.slots[index])
    }

    /// Indices of slots not currently held by in-flight work.
    pub fn available_slots(&self) -> &BTreeSet<usize> {
        &self.available
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// The append-only operation log.
    pub fn history(&self) -> &[OperationRecord] {
        &self.history
    }

    pub fn total_operations(&self) -> u64 {
        self.total_operations
    }

    pub fn reset_policy(&self) -> SlotResetPolicy {
        self.reset_policy
    }

    /// Fail with `InvalidSlot` if `index` is outside `[0, N)`.
    pub fn check_slot(&self, index: usize) -> Result<(), NetworkError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(NetworkError::InvalidSlot {
                node: self.id,
                slot: index,
                num_slots: self.slots.len(),
            })
        }
    }

    /// Execute a gate on the given slots.
    ///
    /// All indices are checked before anything is recorded, so a rejected
    /// call leaves the log and counter untouched. The duration is
    /// bookkeeping only and is returned unchanged.
    pub fn execute_gate(
        &mut self,
        gate: GateKind,
        slots: &[usize],
        duration: f64,
    ) -> Result<f64, NetworkError> {
        for &index in slots {
            self.check_slot(index)?;
        }

        self.total_operations += 1;
        let id = self.total_operations;
        for &index in slots {
            let slot = &mut self.slots[index];
            slot.state = Some(StateToken(id));
            slot.last_operation = Some(gate);
        }
        self.history.push(OperationRecord {
            id,
            gate,
            slots: slots.to_vec(),
            duration,
            node_id: self.id,
        });

        debug!(node = self.id, gate = %gate, slots = ?slots, "Executed gate");
        Ok(duration)
    }

    /// Ratio of logged operations to the operation counter.
    ///
    /// 0.0 before the first operation; 1.0 once the log and counter are
    /// populated (both grow together).
    pub fn utilization(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.len() as f64 / self.total_operations.max(1) as f64
    }

    /// Clear a slot's state and entanglement and return it to the pool.
    ///
    /// Out-of-range indices are rejected under [`SlotResetPolicy::Strict`]
    /// and ignored under [`SlotResetPolicy::Lenient`].
    pub fn reset_slot(&mut self, index: usize) -> Result<(), NetworkError> {
        if let Err(e) = self.check_slot(index) {
            return match self.reset_policy {
                SlotResetPolicy::Strict => Err(e),
                SlotResetPolicy::Lenient => {
                    debug!(node = self.id, slot = index, "Ignoring reset of invalid slot");
                    Ok(())
                }
            };
        }

        self.slots[index] = QubitSlot::default();
        self.available.insert(index);
        debug!(node = self.id, slot = index, "Reset slot");
        Ok(())
    }

    /// Take `count` available slots, lowest indices first.
    ///
    /// Returns `None` (and reserves nothing) if fewer than `count` are free.
    pub fn reserve_slots(&mut self, count: usize) -> Option<Vec<usize>> {
        if self.available.len() < count {
            return None;
        }
        let reserved: Vec<usize> = self.available.iter().take(count).copied().collect();
        for index in &reserved {
            self.available.remove(index);
        }
        Some(reserved)
    }

    /// Return slots to the available pool. Out-of-range indices are skipped.
    pub fn release_slots(&mut self, slots: &[usize]) {
        let num_slots = self.slots.len();
        self.available
            .extend(slots.iter().copied().filter(|&s| s < num_slots));
    }

    /// Set a slot's entanglement back-reference. Caller validates `index`.
    pub(crate) fn set_entangled(&mut self, index: usize, peer: SlotRef) {
        self.slots[index].entangled_with = Some(peer);
    }
}
