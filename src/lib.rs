// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Distributed Quantum Computing simulator
//!
//! Models a network of quantum-processing nodes joined by a classical
//! channel. Nodes expose fixed pools of qubit slots; cross-node work
//! consumes entanglement pairs and classical messages, and every step is
//! charged to one shared logical clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               Simulation                 │
//! ├────────────────────┬────────────────────┤
//! │  Protocol Engine   │     Scheduler      │
//! │  (teleport, CNOT)  │  (priority queue)  │
//! ├────────────────────┴────────────────────┤
//! │      QuantumNetwork (shared clock)       │
//! ├─────────────┬─────────────┬─────────────┤
//! │   Node 0    │   Node 1    │     ...     │
//! │  (slots)    │  (slots)    │             │
//! └─────────────┴─────────────┴─────────────┘
//! ```
//!
//! Durations are bookkeeping on the logical clock. Nothing sleeps.
//!
//! # Modules
//!
//! - [`network`]: Nodes, slot pools, entanglement registry, logical clock
//! - [`protocol`]: Teleportation and remote-gate protocols with metrics
//! - [`scheduler`]: Priority scheduling of subcircuits onto nodes
//! - [`analysis`]: Efficiency, bottlenecks and configuration comparison
//! - [`simulation`]: End-to-end runner producing a report
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod analysis;
pub mod config;
pub mod error;
pub mod network;
pub mod protocol;
pub mod scheduler;
pub mod simulation;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use network::{QuantumNetwork, SharedNetwork};
pub use protocol::QuantumProtocols;
pub use scheduler::QuantumScheduler;
pub use simulation::{Simulation, SimulationReport};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
