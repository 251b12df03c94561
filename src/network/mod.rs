// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Node and network resource model.
//!
//! - [`QuantumNode`]: fixed pool of qubit slots plus an operation log
//! - [`QuantumNetwork`]: nodes, shared logical clock, entanglement registry
//! - [`GateKind`]: closed set of gate kinds

pub mod entanglement;
pub mod gate;
pub mod node;
pub mod quantum_network;

pub use entanglement::{EntanglementPair, SlotRef};
pub use gate::GateKind;
pub use node::{OperationRecord, QuantumNode, QubitSlot, SlotResetPolicy, StateToken};
pub use quantum_network::{
    NetworkStats, QuantumNetwork, SharedNetwork, ENTANGLEMENT_LATENCY_FACTOR,
};
