// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end simulation runner.
//!
//! Wires one network, one protocol engine and one scheduler together from a
//! [`Config`], drives random protocol traffic and scheduling batches, and
//! produces a [`SimulationReport`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{recommendations, BottleneckThresholds, Bottlenecks, EfficiencyMetrics};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::network::{GateKind, NetworkStats, QuantumNetwork, SharedNetwork};
use crate::protocol::{ProtocolSummary, QuantumProtocols};
use crate::scheduler::{QuantumScheduler, ScheduleAnalysis, SubcircuitDescriptor};

/// Mixed into the run seed so endpoint selection and protocol noise draw
/// from independent streams.
const SELECTION_SEED_MIX: u64 = 0x517c_c1b7_2722_0a95;

/// Counts from one [`Simulation::run_protocol_simulation`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRunStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Everything known about a run, in one serializable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub protocol_summary: Option<ProtocolSummary>,
    pub network_stats: NetworkStats,
    /// Most recent scheduling drain, if any
    pub schedule_analysis: Option<ScheduleAnalysis>,
    pub efficiency: EfficiencyMetrics,
    pub bottlenecks: Bottlenecks,
    pub recommendations: Vec<String>,
}

pub struct Simulation {
    config: Config,
    network: SharedNetwork,
    protocols: QuantumProtocols,
    scheduler: QuantumScheduler,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Build a simulation. The configuration is validated first.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let seed = config.simulation.random_seed;
        let network = QuantumNetwork::from_config(&config.network)?.into_shared();
        let protocols = QuantumProtocols::new(network.clone(), seed)
            .with_local_gate_duration(config.network.gate_execution_time);
        let scheduler = QuantumScheduler::with_config(network.clone(), config.scheduler.clone());
        let rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1).wrapping_mul(SELECTION_SEED_MIX));

        info!(
            num_nodes = config.network.num_nodes,
            qubits_per_node = config.network.qubits_per_node,
            seed,
            "Simulation initialized"
        );

        Ok(Self {
            config,
            network,
            protocols,
            scheduler,
            rng,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn network(&self) -> &SharedNetwork {
        &self.network
    }

    pub fn protocols(&self) -> &QuantumProtocols {
        &self.protocols
    }

    pub fn scheduler(&self) -> &QuantumScheduler {
        &self.scheduler
    }

    /// Run `num_operations` teleportations followed by `num_operations / 2`
    /// remote CNOTs, each between two distinct random nodes.
    ///
    /// Individual failures are logged and counted, not returned.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the network has fewer than two nodes.
    pub fn run_protocol_simulation(&mut self, num_operations: usize) -> Result<ProtocolRunStats> {
        let num_nodes = self.config.network.num_nodes;
        if num_nodes < 2 {
            return Err(Error::Config(format!(
                "protocol simulation needs at least 2 nodes, got {}",
                num_nodes
            )));
        }

        info!(num_operations, "Running protocol simulation");
        let mut stats = ProtocolRunStats::default();

        for _ in 0..num_operations {
            let (source, target) = self.pick_endpoints();
            let result = self
                .protocols
                .teleport_qubit(source.0, source.1, target.0, target.1);
            stats.record(result.is_ok());
            if let Err(e) = result {
                warn!(error = %e, "Teleportation skipped");
            }
        }

        for _ in 0..num_operations / 2 {
            let (control, target) = self.pick_endpoints();
            let result = self.protocols.remote_gate_operation(
                control.0,
                control.1,
                target.0,
                target.1,
                GateKind::Cnot,
            );
            stats.record(result.is_ok());
            if let Err(e) = result {
                warn!(error = %e, "Remote gate skipped");
            }
        }

        info!(
            attempted = stats.attempted,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "Protocol simulation finished"
        );
        Ok(stats)
    }

    /// Schedule a batch at `priority` and drain the queue once.
    ///
    /// # Errors
    ///
    /// A validation error if any descriptor requires zero qubits.
    pub fn run_scheduling_simulation(
        &mut self,
        subcircuits: Vec<SubcircuitDescriptor>,
        priority: u32,
    ) -> Result<ScheduleAnalysis> {
        self.scheduler.schedule(subcircuits, priority)?;
        Ok(self.scheduler.execute_schedule())
    }

    /// Snapshot metrics and derive efficiency, bottlenecks and advice.
    pub fn analyze(&self) -> SimulationReport {
        let protocol_summary = self.protocols.summary();
        let network_stats = self.network.lock().stats();
        let thresholds = BottleneckThresholds::from(&self.config.simulation);

        let efficiency = EfficiencyMetrics::calculate(protocol_summary.as_ref(), &network_stats);
        let bottlenecks =
            Bottlenecks::detect(protocol_summary.as_ref(), &network_stats, &thresholds);

        SimulationReport {
            recommendations: recommendations(&bottlenecks),
            schedule_analysis: self.scheduler.history().pop(),
            protocol_summary,
            network_stats,
            efficiency,
            bottlenecks,
        }
    }

    /// Two `(node, slot)` pairs on different nodes.
    fn pick_endpoints(&mut self) -> ((usize, usize), (usize, usize)) {
        let num_nodes = self.config.network.num_nodes;
        let qubits = self.config.network.qubits_per_node;

        let source = self.rng.gen_range(0..num_nodes);
        let mut target = self.rng.gen_range(0..num_nodes - 1);
        if target >= source {
            target += 1;
        }

        (
            (source, self.rng.gen_range(0..qubits)),
            (target, self.rng.gen_range(0..qubits)),
        )
    }
}

impl ProtocolRunStats {
    fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
