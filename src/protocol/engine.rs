// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Teleportation (TeleData) and remote gate (TeleGate) protocols.
//!
//! Each call runs a fixed linear sequence of stages against the shared
//! network, charging time to the logical clock at every stage. A failing
//! stage aborts the rest of the call; time already charged is kept.
//!
//! ```text
//! teleport:     entangle ─► measure ─► classical send ─► corrections
//!               1.5·L       0.05       L                  0.02 (+0.01/gate)
//!
//! remote CNOT:  entangle ─► local ops ─► classical send
//!               1.5·L       0.08         L
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::metrics::{ProtocolMetrics, ProtocolSummary};
use super::noise::FidelityModel;
use crate::error::{NetworkError, ProtocolError};
use crate::network::{GateKind, QuantumNetwork, SharedNetwork};

/// Time charged for the Bell measurement at the source.
pub const MEASUREMENT_TIME: f64 = 0.05;

/// Time charged for the correction stage, on top of any correction gates.
pub const CORRECTION_TIME: f64 = 0.02;

/// Duration of each X/Z correction gate.
pub const CORRECTION_GATE_DURATION: f64 = 0.01;

/// Local operations at both ends of a remote controlled gate.
pub const REMOTE_LOCAL_OPS_TIME: f64 = 0.08;

/// Result of one successful protocol call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolOutcome {
    /// Logical time consumed (clock after minus clock before)
    pub elapsed: f64,
    pub fidelity: f64,
}

/// Protocol engine bound to one shared network.
pub struct QuantumProtocols {
    network: SharedNetwork,
    rng: ChaCha8Rng,
    metrics: ProtocolMetrics,
    local_gate_duration: f64,
}

impl QuantumProtocols {
    /// Create an engine whose random draws are seeded with `seed`.
    pub fn new(network: SharedNetwork, seed: u64) -> Self {
        Self::with_rng(network, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create an engine with an explicit random source.
    pub fn with_rng(network: SharedNetwork, rng: ChaCha8Rng) -> Self {
        Self {
            network,
            rng,
            metrics: ProtocolMetrics::default(),
            local_gate_duration: CORRECTION_GATE_DURATION,
        }
    }

    /// Set the duration charged for local single-qubit gates.
    pub fn with_local_gate_duration(mut self, duration: f64) -> Self {
        self.local_gate_duration = duration;
        self
    }

    pub fn network(&self) -> &SharedNetwork {
        &self.network
    }

    /// Teleport the state of a source slot onto a target slot.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Teleportation`] wrapping the stage failure (same
    /// node, invalid node or invalid slot). The failure is also appended
    /// to the error log.
    pub fn teleport_qubit(
        &mut self,
        source_node: usize,
        source_slot: usize,
        target_node: usize,
        target_slot: usize,
    ) -> Result<ProtocolOutcome, ProtocolError> {
        let mut network = self.network.lock();
        let start = network.logical_time();

        info!(
            source_node,
            source_slot,
            target_node,
            target_slot,
            "Starting teleportation"
        );

        let stages = run_teleportation(
            &mut network,
            &mut self.rng,
            (source_node, source_slot),
            (target_node, target_slot),
        );

        match stages {
            Ok(()) => {
                let elapsed = network.logical_time() - start;
                let fidelity = FidelityModel::TELEPORTATION.sample(&mut self.rng);
                self.metrics
                    .record(elapsed, fidelity, network.entanglement_pairs().len());
                info!(elapsed, fidelity, "Teleportation completed");
                Ok(ProtocolOutcome { elapsed, fidelity })
            }
            Err(cause) => {
                let err = ProtocolError::Teleportation(cause);
                error!(error = %err, "Teleportation failed");
                self.metrics.record_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply a gate between a control slot and a target slot.
    ///
    /// Controlled gates consume an entanglement pair plus one classical
    /// message. Single-qubit gates run locally on the target only.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::RemoteGate`] wrapping the stage failure.
    pub fn remote_gate_operation(
        &mut self,
        control_node: usize,
        control_slot: usize,
        target_node: usize,
        target_slot: usize,
        gate: GateKind,
    ) -> Result<ProtocolOutcome, ProtocolError> {
        let mut network = self.network.lock();
        let start = network.logical_time();

        info!(
            gate = %gate,
            control_node,
            control_slot,
            target_node,
            target_slot,
            "Starting remote gate"
        );

        let (stages, model) = if gate.is_controlled() {
            let result = network
                .create_entanglement(control_node, control_slot, target_node, target_slot)
                .map(|_| {
                    network.advance_clock(REMOTE_LOCAL_OPS_TIME);
                    let latency = network.communication_latency();
                    network.advance_clock(latency);
                });
            (result, FidelityModel::REMOTE_GATE)
        } else {
            let result = network
                .execute_gate(target_node, gate, &[target_slot], self.local_gate_duration)
                .map(|_| ());
            (result, FidelityModel::LOCAL_GATE)
        };

        match stages {
            Ok(()) => {
                let elapsed = network.logical_time() - start;
                let fidelity = model.sample(&mut self.rng);
                self.metrics
                    .record(elapsed, fidelity, network.entanglement_pairs().len());
                info!(elapsed, fidelity, "Remote gate completed");
                Ok(ProtocolOutcome { elapsed, fidelity })
            }
            Err(cause) => {
                let err = ProtocolError::RemoteGate(cause);
                error!(error = %err, "Remote gate operation failed");
                self.metrics.record_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Summary of every recorded operation; `None` before the first success.
    pub fn summary(&self) -> Option<ProtocolSummary> {
        self.metrics.summary()
    }

    /// Raw accumulator, for external reporting.
    pub fn detailed_metrics(&self) -> &ProtocolMetrics {
        &self.metrics
    }
}

/// Teleportation stages 1-4. Stage 5 (bookkeeping) is done by the caller.
fn run_teleportation<R: Rng>(
    network: &mut QuantumNetwork,
    rng: &mut R,
    (source_node, source_slot): (usize, usize),
    (target_node, target_slot): (usize, usize),
) -> Result<(), NetworkError> {
    network.create_entanglement(source_node, source_slot, target_node, target_slot)?;

    network.advance_clock(MEASUREMENT_TIME);
    let bits: (bool, bool) = (rng.gen(), rng.gen());

    let latency = network.communication_latency();
    network.advance_clock(latency);

    if bits.1 {
        network.execute_gate(target_node, GateKind::X, &[target_slot], CORRECTION_GATE_DURATION)?;
    }
    if bits.0 {
        network.execute_gate(target_node, GateKind::Z, &[target_slot], CORRECTION_GATE_DURATION)?;
    }
    network.advance_clock(CORRECTION_TIME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{shared_network, test_protocols};
    use approx::assert_relative_eq;

    // =========================================================================
    // Teleportation
    // =========================================================================

    #[test]
    fn test_teleport_reference_scenario() {
        let mut protocols = test_protocols(2, 3, 0.1, 42);
        let outcome = protocols.teleport_qubit(0, 0, 1, 0).unwrap();

        // 0.15 + 0.05 + 0.1 + 0.02, plus 0-2 correction gates of 0.01
        assert!(outcome.elapsed >= 0.32 - 1e-9, "{}", outcome.elapsed);
        assert!(outcome.elapsed <= 0.34 + 1e-9, "{}", outcome.elapsed);
        assert!((0.94..=0.98).contains(&outcome.fidelity));

        let corrections = protocols.network().lock().node(1).unwrap().total_operations();
        assert_relative_eq!(
            outcome.elapsed,
            0.32 + 0.01 * corrections as f64,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_teleport_elapsed_equals_clock_delta() {
        let mut protocols = test_protocols(3, 2, 0.2, 7);
        let before = protocols.network().lock().logical_time();
        let outcome = protocols.teleport_qubit(2, 1, 0, 0).unwrap();
        let after = protocols.network().lock().logical_time();
        assert_relative_eq!(outcome.elapsed, after - before, epsilon = 1e-12);
    }

    #[test]
    fn test_teleport_registers_entanglement() {
        let mut protocols = test_protocols(2, 3, 0.1, 1);
        protocols.teleport_qubit(0, 2, 1, 1).unwrap();

        let network = protocols.network().lock();
        assert_eq!(network.entanglement_pairs().len(), 1);
        assert!(network.node(1).unwrap().slot(1).unwrap().entangled_with.is_some());
    }

    #[test]
    fn test_teleport_fidelity_band_many_calls() {
        let mut protocols = test_protocols(2, 3, 0.1, 99);
        for _ in 0..200 {
            let outcome = protocols.teleport_qubit(0, 0, 1, 0).unwrap();
            assert!(outcome.elapsed > 0.0);
            assert!(FidelityModel::TELEPORTATION.contains(outcome.fidelity));
        }
    }

    #[test]
    fn test_teleport_deterministic_with_seed() {
        let run = |seed| {
            let mut protocols = test_protocols(2, 3, 0.1, seed);
            (0..1000)
                .map(|_| protocols.teleport_qubit(0, 0, 1, 0).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn test_teleport_same_node_fails_and_logs() {
        let mut protocols = test_protocols(2, 3, 0.1, 0);
        let err = protocols.teleport_qubit(0, 0, 0, 1).unwrap_err();

        assert_eq!(
            err,
            ProtocolError::Teleportation(NetworkError::SameNodeEntanglement { node: 0 })
        );
        assert_eq!(protocols.detailed_metrics().errors.len(), 1);
        assert!(protocols.summary().is_none());
        assert_eq!(protocols.network().lock().logical_time(), 0.0);
    }

    #[test]
    fn test_teleport_invalid_slot_fails() {
        let mut protocols = test_protocols(2, 3, 0.1, 0);
        let err = protocols.teleport_qubit(0, 0, 1, 3).unwrap_err();
        assert!(matches!(
            err.cause(),
            NetworkError::InvalidSlot { node: 1, slot: 3, .. }
        ));
        assert_eq!(protocols.detailed_metrics().errors.len(), 1);
    }

    #[test]
    fn test_teleport_invalid_node_fails() {
        let mut protocols = test_protocols(2, 3, 0.1, 0);
        let err = protocols.teleport_qubit(0, 0, 4, 0).unwrap_err();
        assert!(matches!(err.cause(), NetworkError::InvalidNode { node: 4, .. }));
    }

    // =========================================================================
    // Remote gates
    // =========================================================================

    #[test]
    fn test_remote_cnot_timing() {
        let mut protocols = test_protocols(2, 3, 0.1, 5);
        let outcome = protocols
            .remote_gate_operation(0, 0, 1, 1, GateKind::Cnot)
            .unwrap();

        assert_relative_eq!(outcome.elapsed, 0.15 + 0.08 + 0.1, epsilon = 1e-9);
        assert!(FidelityModel::REMOTE_GATE.contains(outcome.fidelity));
        assert_eq!(protocols.network().lock().entanglement_pairs().len(), 1);
    }

    #[test]
    fn test_remote_cx_treated_as_controlled() {
        let mut protocols = test_protocols(2, 3, 0.1, 5);
        protocols
            .remote_gate_operation(1, 0, 0, 0, GateKind::Cx)
            .unwrap();
        assert_eq!(protocols.network().lock().entanglement_pairs().len(), 1);
    }

    #[test]
    fn test_remote_single_qubit_gate_is_local() {
        let mut protocols = test_protocols(2, 3, 0.1, 5);
        let outcome = protocols
            .remote_gate_operation(0, 0, 1, 2, GateKind::H)
            .unwrap();

        assert_relative_eq!(outcome.elapsed, CORRECTION_GATE_DURATION, epsilon = 1e-12);
        assert_eq!(outcome.fidelity, 0.98);

        let network = protocols.network().lock();
        assert!(network.entanglement_pairs().is_empty());
        let history = network.node(1).unwrap().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].gate, GateKind::H);
        assert_eq!(history[0].slots, vec![2]);
    }

    #[test]
    fn test_remote_single_qubit_gate_uses_configured_duration() {
        let mut protocols = test_protocols(2, 3, 0.1, 5).with_local_gate_duration(0.05);
        let outcome = protocols
            .remote_gate_operation(0, 0, 0, 1, GateKind::X)
            .unwrap();
        assert_relative_eq!(outcome.elapsed, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_remote_gate_failure_wrapped() {
        let mut protocols = test_protocols(2, 3, 0.1, 5);
        let err = protocols
            .remote_gate_operation(1, 0, 1, 1, GateKind::Cnot)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::RemoteGate(NetworkError::SameNodeEntanglement { node: 1 })
        ));

        let err = protocols
            .remote_gate_operation(0, 0, 1, 9, GateKind::Z)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::RemoteGate(NetworkError::InvalidSlot { .. })));
        assert_eq!(protocols.detailed_metrics().errors.len(), 2);
    }

    // =========================================================================
    // Metrics
    // =========================================================================

    #[test]
    fn test_metrics_empty_before_operations() {
        let protocols = test_protocols(2, 3, 0.1, 0);
        assert!(protocols.summary().is_none());
    }

    #[test]
    fn test_metrics_after_one_teleport() {
        let mut protocols = test_protocols(2, 3, 0.1, 11);
        let outcome = protocols.teleport_qubit(0, 0, 1, 0).unwrap();
        let summary = protocols.summary().unwrap();

        assert_eq!(summary.total_operations, 1);
        assert_eq!(summary.min_fidelity, outcome.fidelity);
        assert_eq!(summary.max_fidelity, outcome.fidelity);
        assert_eq!(summary.peak_entanglements, 1);
        assert_eq!(summary.error_count, 0);
    }

    #[test]
    fn test_metrics_mixed_operations() {
        let mut protocols = test_protocols(2, 3, 0.1, 3);
        protocols.teleport_qubit(0, 0, 1, 0).unwrap();
        protocols
            .remote_gate_operation(0, 1, 1, 1, GateKind::Cnot)
            .unwrap();
        let _ = protocols.teleport_qubit(0, 0, 0, 0);

        let summary = protocols.summary().unwrap();
        assert_eq!(summary.total_operations, 2);
        assert_eq!(summary.peak_entanglements, 2);
        assert_eq!(summary.error_count, 1);
    }

    #[test]
    fn test_engines_share_network_clock() {
        let network = shared_network(2, 3, 0.1);
        let mut a = QuantumProtocols::new(network.clone(), 1);
        let mut b = QuantumProtocols::new(network.clone(), 2);
        a.remote_gate_operation(0, 0, 1, 0, GateKind::Cnot).unwrap();
        b.remote_gate_operation(0, 1, 1, 1, GateKind::Cnot).unwrap();

        assert_relative_eq!(network.lock().logical_time(), 2.0 * 0.33, epsilon = 1e-9);
        assert_eq!(network.lock().entanglement_pairs().len(), 2);
    }
}
