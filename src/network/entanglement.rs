// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Entanglement bookkeeping types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one qubit slot in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotRef {
    /// Node id
    pub node: usize,
    /// Slot index within the node
    pub slot: usize,
}

impl SlotRef {
    pub fn new(node: usize, slot: usize) -> Self {
        Self { node, slot }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node{}.Q{}", self.node, self.slot)
    }
}

/// A registered entanglement relation between slots on two different nodes.
///
/// The registry keeps every pair ever created for the run. Pairs are never
/// removed or de-duplicated, even when a later reset clears the slots'
/// back-references.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntanglementPair {
    pub first: SlotRef,
    pub second: SlotRef,
    /// Logical time at which the pair was registered.
    pub created_at: f64,
}

impl EntanglementPair {
    /// Whether this pair touches the given slot.
    pub fn involves(&self, slot: SlotRef) -> bool {
        self.first == slot || self.second == slot
    }
}
