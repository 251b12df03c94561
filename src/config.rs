// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the simulator.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. dqc.yaml file
//! 3. Environment variables (QUBITOS_DQC_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::Result;
use crate::network::{GateKind, SlotResetPolicy};
use crate::validation;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Network topology and timing
    #[serde(default)]
    pub network: NetworkConfig,

    /// Simulation run settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Scheduler settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["dqc.yaml", "dqc.yml", "/etc/qubitos/dqc.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("QUBITOS_DQC_NUM_NODES") {
            if let Ok(n) = val.parse() {
                self.network.num_nodes = n;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DQC_QUBITS_PER_NODE") {
            if let Ok(n) = val.parse() {
                self.network.qubits_per_node = n;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DQC_LATENCY") {
            if let Ok(latency) = val.parse() {
                self.network.communication_latency = latency;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DQC_RESET_POLICY") {
            match val.to_lowercase().as_str() {
                "strict" => self.network.reset_policy = SlotResetPolicy::Strict,
                "lenient" => self.network.reset_policy = SlotResetPolicy::Lenient,
                other => tracing::warn!(value = other, "Ignoring unknown QUBITOS_DQC_RESET_POLICY"),
            }
        }
        if let Ok(val) = env::var("QUBITOS_DQC_SEED") {
            if let Ok(seed) = val.parse() {
                self.simulation.random_seed = seed;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DQC_NUM_OPERATIONS") {
            if let Ok(n) = val.parse() {
                self.simulation.num_operations = n;
            }
        }
        if let Ok(val) = env::var("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_network_config(&self.network)?;
        validation::validate_simulation_config(&self.simulation)?;
        validation::validate_scheduler_config(&self.scheduler)?;
        Ok(())
    }
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of nodes
    #[serde(default = "default_num_nodes")]
    pub num_nodes: usize,

    /// Qubit slots per node
    #[serde(default = "default_qubits_per_node")]
    pub qubits_per_node: usize,

    /// Classical communication latency (logical time units)
    #[serde(default = "default_latency")]
    pub communication_latency: f64,

    /// Duration charged for a single local gate
    #[serde(default = "default_gate_execution_time")]
    pub gate_execution_time: f64,

    /// Behavior of out-of-range slot resets
    #[serde(default)]
    pub reset_policy: SlotResetPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_nodes: default_num_nodes(),
            qubits_per_node: default_qubits_per_node(),
            communication_latency: default_latency(),
            gate_execution_time: default_gate_execution_time(),
            reset_policy: SlotResetPolicy::default(),
        }
    }
}

fn default_num_nodes() -> usize {
    2
}

fn default_qubits_per_node() -> usize {
    3
}

fn default_latency() -> f64 {
    0.1
}

fn default_gate_execution_time() -> f64 {
    0.01
}

/// Simulation run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Teleportations per protocol run (remote gates run half as many)
    #[serde(default = "default_num_operations")]
    pub num_operations: usize,

    /// Seed for every stochastic draw
    #[serde(default = "default_seed")]
    pub random_seed: u64,

    /// Average fidelity below this is reported as a bottleneck
    #[serde(default = "default_fidelity_threshold")]
    pub fidelity_threshold: f64,

    /// Average operation time above this is reported as a bottleneck
    #[serde(default = "default_latency_threshold")]
    pub latency_threshold: f64,

    /// Entanglements above this fraction of total qubits is reported as a bottleneck
    #[serde(default = "default_resource_usage_ratio")]
    pub resource_usage_ratio: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_operations: default_num_operations(),
            random_seed: default_seed(),
            fidelity_threshold: default_fidelity_threshold(),
            latency_threshold: default_latency_threshold(),
            resource_usage_ratio: default_resource_usage_ratio(),
        }
    }
}

fn default_num_operations() -> usize {
    50
}

fn default_seed() -> u64 {
    42
}

fn default_fidelity_threshold() -> f64 {
    0.95
}

fn default_latency_threshold() -> f64 {
    0.2
}

fn default_resource_usage_ratio() -> f64 {
    0.6
}

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Priority used when a caller does not give one (lower runs sooner)
    #[serde(default = "default_priority")]
    pub default_priority: u32,

    /// Fixed cost charged per executed subcircuit
    #[serde(default = "default_base_execution_time")]
    pub base_execution_time: f64,

    /// Gate executed on each reserved slot
    #[serde(default = "default_scheduler_gate")]
    pub gate: GateKind,

    /// Duration of each scheduled gate
    #[serde(default = "default_gate_execution_time")]
    pub gate_duration: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            base_execution_time: default_base_execution_time(),
            gate: default_scheduler_gate(),
            gate_duration: default_gate_execution_time(),
        }
    }
}

fn default_priority() -> u32 {
    1
}

fn default_base_execution_time() -> f64 {
    0.1
}

fn default_scheduler_gate() -> GateKind {
    GateKind::H
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    // Env-var tests and `Config::load` share process-wide state.
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network.num_nodes, 2);
        assert_eq!(config.network.qubits_per_node, 3);
        assert_eq!(config.network.communication_latency, 0.1);
        assert_eq!(config.network.reset_policy, SlotResetPolicy::Strict);
        assert_eq!(config.simulation.num_operations, 50);
        assert_eq!(config.simulation.random_seed, 42);
        assert_eq!(config.scheduler.default_priority, 1);
        assert_eq!(config.scheduler.gate, GateKind::H);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut bad_config = Config::default();
        bad_config.network.num_nodes = 0;
        assert!(bad_config.validate().is_err());

        let mut bad_config = Config::default();
        bad_config.network.communication_latency = -0.5;
        assert!(bad_config.validate().is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let _guard = ENV_LOCK.lock();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
network:
  num_nodes: 4
  qubits_per_node: 5
  communication_latency: 0.25
  reset_policy: lenient
scheduler:
  gate: X
"#
        )
        .unwrap();

        let config = Config::load(Some(f.path())).unwrap();
        assert_eq!(config.network.num_nodes, 4);
        assert_eq!(config.network.qubits_per_node, 5);
        assert_eq!(config.network.communication_latency, 0.25);
        assert_eq!(config.network.reset_policy, SlotResetPolicy::Lenient);
        assert_eq!(config.scheduler.gate, GateKind::X);
        // Untouched sections keep their defaults
        assert_eq!(config.simulation.random_seed, 42);
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let _guard = ENV_LOCK.lock();
        let path = std::path::Path::new("/tmp/does_not_exist_qubitos_dqc_test.yaml");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.network.num_nodes, 2);
    }

    #[test]
    fn test_config_load_invalid_yaml() {
        let _guard = ENV_LOCK.lock();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{{{not: valid: yaml::::").unwrap();

        let result = Config::load(Some(f.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_override_topology() {
        let _guard = ENV_LOCK.lock();
        let mut config = Config::default();
        std::env::set_var("QUBITOS_DQC_NUM_NODES", "6");
        std::env::set_var("QUBITOS_DQC_QUBITS_PER_NODE", "8");
        config.apply_env_overrides();
        assert_eq!(config.network.num_nodes, 6);
        assert_eq!(config.network.qubits_per_node, 8);
        std::env::remove_var("QUBITOS_DQC_NUM_NODES");
        std::env::remove_var("QUBITOS_DQC_QUBITS_PER_NODE");
    }

    #[test]
    fn test_env_override_latency_and_seed() {
        let _guard = ENV_LOCK.lock();
        let mut config = Config::default();
        std::env::set_var("QUBITOS_DQC_LATENCY", "0.3");
        std::env::set_var("QUBITOS_DQC_SEED", "7");
        config.apply_env_overrides();
        assert_eq!(config.network.communication_latency, 0.3);
        assert_eq!(config.simulation.random_seed, 7);
        std::env::remove_var("QUBITOS_DQC_LATENCY");
        std::env::remove_var("QUBITOS_DQC_SEED");
    }

    #[test]
    fn test_env_override_reset_policy() {
        let _guard = ENV_LOCK.lock();
        let mut config = Config::default();
        std::env::set_var("QUBITOS_DQC_RESET_POLICY", "LENIENT");
        config.apply_env_overrides();
        assert_eq!(config.network.reset_policy, SlotResetPolicy::Lenient);

        std::env::set_var("QUBITOS_DQC_RESET_POLICY", "bogus");
        config.apply_env_overrides();
        assert_eq!(config.network.reset_policy, SlotResetPolicy::Lenient);
        std::env::remove_var("QUBITOS_DQC_RESET_POLICY");
    }

    #[test]
    fn test_env_override_unparseable_ignored() {
        let _guard = ENV_LOCK.lock();
        let mut config = Config::default();
        std::env::set_var("QUBITOS_DQC_NUM_OPERATIONS", "lots");
        config.apply_env_overrides();
        assert_eq!(config.simulation.num_operations, 50);
        std::env::remove_var("QUBITOS_DQC_NUM_OPERATIONS");
    }

    #[test]
    fn test_config_yaml_roundtrip_keeps_policy_lowercase() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("reset_policy: strict"));
        assert!(yaml.contains("gate: H"));
    }
}
