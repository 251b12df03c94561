// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum networking protocols.
//!
//! - [`QuantumProtocols`]: teleportation and remote gate state machines
//! - [`ProtocolMetrics`] / [`ProtocolSummary`]: per-operation metrics
//! - [`FidelityModel`]: bounded Gaussian fidelity proxy

pub mod engine;
pub mod metrics;
pub mod noise;

pub use engine::{ProtocolOutcome, QuantumProtocols};
pub use metrics::{ProtocolMetrics, ProtocolSummary};
pub use noise::FidelityModel;
