// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Post-run analysis of protocol metrics and network statistics.
//!
//! Everything here is a pure function of snapshots taken from a finished
//! run; nothing touches the live network.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::network::NetworkStats;
use crate::protocol::ProtocolSummary;

/// Floor applied to the average operation time before inverting it.
const MIN_OPERATION_TIME: f64 = 0.001;

// ============================================================================
// Efficiency
// ============================================================================

/// Raw efficiency figures plus their normalized `[0, 1]` scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    /// Operations per unit of logical time, `1 / avg_operation_time`
    pub communication_efficiency: f64,
    /// Entanglement pairs per qubit
    pub resource_utilization: f64,
    pub fidelity_efficiency: f64,
    /// Protocol operations per unit of logical time
    pub throughput: f64,
    pub scores: EfficiencyScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScores {
    pub communication: f64,
    pub resource: f64,
    pub fidelity: f64,
    pub throughput: f64,
    /// Weighted blend of the four scores
    pub overall: f64,
}

impl EfficiencyMetrics {
    pub fn calculate(summary: Option<&ProtocolSummary>, stats: &NetworkStats) -> Self {
        let avg_time = summary.map_or(0.0, |s| s.avg_operation_time);
        let communication_efficiency = 1.0 / avg_time.max(MIN_OPERATION_TIME);

        let resource_utilization = if stats.qubit_count == 0 {
            0.0
        } else {
            stats.active_entanglement_count as f64 / stats.qubit_count as f64
        };

        let fidelity_efficiency = summary.map_or(1.0, |s| s.avg_fidelity);

        let operations = summary.map_or(0, |s| s.total_operations);
        let throughput = if stats.logical_time > 0.0 {
            operations as f64 / stats.logical_time
        } else {
            0.0
        };

        let communication = (communication_efficiency / 10.0).min(1.0);
        let resource = resource_utilization.min(1.0);
        let fidelity = fidelity_efficiency;
        let throughput_score = (throughput / 5.0).min(1.0);
        let overall =
            0.3 * communication + 0.25 * resource + 0.3 * fidelity + 0.15 * throughput_score;

        Self {
            communication_efficiency,
            resource_utilization,
            fidelity_efficiency,
            throughput,
            scores: EfficiencyScores {
                communication,
                resource,
                fidelity,
                throughput: throughput_score,
                overall,
            },
        }
    }
}

// ============================================================================
// Configuration comparison
// ============================================================================

/// Snapshots from one finished run, keyed by configuration name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationResult {
    pub summary: Option<ProtocolSummary>,
    pub stats: NetworkStats,
}

/// Headline figures for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationScore {
    pub avg_operation_time: f64,
    pub avg_fidelity: f64,
    pub throughput: f64,
    pub resource_efficiency: f64,
    pub total_operations: usize,
}

impl ConfigurationScore {
    fn from_result(result: &ConfigurationResult) -> Self {
        let total_operations = result.summary.as_ref().map_or(0, |s| s.total_operations);
        Self {
            avg_operation_time: result.summary.as_ref().map_or(0.0, |s| s.avg_operation_time),
            avg_fidelity: result.summary.as_ref().map_or(0.0, |s| s.avg_fidelity),
            throughput: total_operations as f64 / result.stats.logical_time.max(1.0),
            resource_efficiency: result.stats.active_entanglement_count as f64
                / result.stats.qubit_count.max(1) as f64,
            total_operations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationComparison {
    pub scores: BTreeMap<String, ConfigurationScore>,
    /// Names, best first
    pub ranking: Vec<String>,
    pub best_config: Option<String>,
}

/// Rank configurations by fidelity (high first), then operation time (low
/// first), then throughput (high first). Remaining ties keep name order.
pub fn compare_configurations(
    results: &BTreeMap<String, ConfigurationResult>,
) -> ConfigurationComparison {
    let scores: BTreeMap<String, ConfigurationScore> = results
        .iter()
        .map(|(name, result)| (name.clone(), ConfigurationScore::from_result(result)))
        .collect();

    let mut ranked: Vec<(&String, &ConfigurationScore)> = scores.iter().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        b.avg_fidelity
            .total_cmp(&a.avg_fidelity)
            .then_with(|| a.avg_operation_time.total_cmp(&b.avg_operation_time))
            .then_with(|| b.throughput.total_cmp(&a.throughput))
    });
    let ranking: Vec<String> = ranked.into_iter().map(|(name, _)| name.clone()).collect();

    ConfigurationComparison {
        best_config: ranking.first().cloned(),
        scores,
        ranking,
    }
}

// ============================================================================
// Bottlenecks
// ============================================================================

/// Limits above (or below) which a run is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BottleneckThresholds {
    /// Average operation time ceiling
    pub latency: f64,
    /// Average fidelity floor
    pub fidelity: f64,
    /// Entanglements allowed per qubit
    pub resource_usage_ratio: f64,
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for BottleneckThresholds {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            latency: config.latency_threshold,
            fidelity: config.fidelity_threshold,
            resource_usage_ratio: config.resource_usage_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottlenecks {
    pub high_latency: bool,
    pub low_fidelity: bool,
    pub high_resource_usage: bool,
}

impl Bottlenecks {
    /// Flag bottlenecks. With no protocol summary only resource usage can trip.
    pub fn detect(
        summary: Option<&ProtocolSummary>,
        stats: &NetworkStats,
        thresholds: &BottleneckThresholds,
    ) -> Self {
        let (high_latency, low_fidelity) = match summary {
            Some(s) => (
                s.avg_operation_time > thresholds.latency,
                s.avg_fidelity < thresholds.fidelity,
            ),
            None => (false, false),
        };
        let high_resource_usage = stats.active_entanglement_count as f64
            > stats.qubit_count as f64 * thresholds.resource_usage_ratio;

        Self {
            high_latency,
            low_fidelity,
            high_resource_usage,
        }
    }

    pub fn any(&self) -> bool {
        self.high_latency || self.low_fidelity || self.high_resource_usage
    }
}

static LATENCY_ADVICE: [&str; 3] = [
    "Implement parallel entanglement distribution protocols",
    "Use entanglement purification to reduce retry attempts",
    "Optimize classical communication channels",
];

static FIDELITY_ADVICE: [&str; 3] = [
    "Implement quantum error correction codes",
    "Use entanglement purification techniques",
    "Increase resource allocation for fidelity-critical operations",
];

static RESOURCE_ADVICE: [&str; 3] = [
    "Implement dynamic resource allocation strategies",
    "Use entanglement recycling where possible",
    "Optimize circuit partitioning to reduce cross-partition operations",
];

static GENERAL_ADVICE: [&str; 3] = [
    "Use adaptive scheduling based on real-time network conditions",
    "Implement hybrid classical-quantum approaches for complex circuits",
    "Consider circuit compression techniques to reduce operation count",
];

/// Optimization advice for the flagged bottlenecks, general advice last.
pub fn recommendations(bottlenecks: &Bottlenecks) -> Vec<String> {
    let flagged = [
        (bottlenecks.high_latency, &LATENCY_ADVICE),
        (bottlenecks.low_fidelity, &FIDELITY_ADVICE),
        (bottlenecks.high_resource_usage, &RESOURCE_ADVICE),
    ];

    flagged
        .into_iter()
        .filter(|(hit, _)| *hit)
        .flat_map(|(_, advice)| advice.iter())
        .chain(GENERAL_ADVICE.iter())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn summary(avg_time: f64, avg_fidelity: f64, total: usize) -> ProtocolSummary {
        ProtocolSummary {
            avg_operation_time: avg_time,
            std_operation_time: 0.0,
            avg_fidelity,
            min_fidelity: avg_fidelity,
            max_fidelity: avg_fidelity,
            total_operations: total,
            peak_entanglements: 0,
            error_count: 0,
        }
    }

    fn stats(qubits: usize, entanglements: usize, time: f64) -> NetworkStats {
        NetworkStats {
            node_count: 2,
            qubit_count: qubits,
            active_entanglement_count: entanglements,
            total_operations: 0,
            node_utilizations: vec![0.0, 0.0],
            logical_time: time,
        }
    }

    // =========================================================================
    // Efficiency
    // =========================================================================

    #[test]
    fn test_efficiency_reference_values() {
        let s = summary(0.32, 0.96, 10);
        let metrics = EfficiencyMetrics::calculate(Some(&s), &stats(6, 3, 4.0));

        assert_relative_eq!(metrics.communication_efficiency, 1.0 / 0.32, epsilon = 1e-12);
        assert_relative_eq!(metrics.resource_utilization, 0.5);
        assert_relative_eq!(metrics.fidelity_efficiency, 0.96);
        assert_relative_eq!(metrics.throughput, 2.5);

        let scores = &metrics.scores;
        assert_relative_eq!(scores.communication, 0.3125, epsilon = 1e-12);
        assert_relative_eq!(scores.throughput, 0.5);
        let overall = 0.3 * 0.3125 + 0.25 * 0.5 + 0.3 * 0.96 + 0.15 * 0.5;
        assert_relative_eq!(scores.overall, overall, epsilon = 1e-12);
    }

    #[test]
    fn test_efficiency_without_operations() {
        let metrics = EfficiencyMetrics::calculate(None, &stats(6, 0, 0.0));
        assert_relative_eq!(metrics.communication_efficiency, 1000.0);
        assert_eq!(metrics.scores.communication, 1.0);
        assert_eq!(metrics.fidelity_efficiency, 1.0);
        assert_eq!(metrics.throughput, 0.0);
    }

    #[test]
    fn test_efficiency_scores_capped() {
        let s = summary(0.01, 0.99, 100);
        let metrics = EfficiencyMetrics::calculate(Some(&s), &stats(2, 10, 1.0));
        assert_eq!(metrics.scores.communication, 1.0);
        assert_eq!(metrics.scores.resource, 1.0);
        assert_eq!(metrics.scores.throughput, 1.0);
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    #[test]
    fn test_compare_ranks_by_fidelity_then_time() {
        let mut results = BTreeMap::new();
        results.insert(
            "slow".to_string(),
            ConfigurationResult {
                summary: Some(summary(0.5, 0.96, 10)),
                stats: stats(6, 2, 5.0),
            },
        );
        results.insert(
            "fast".to_string(),
            ConfigurationResult {
                summary: Some(summary(0.3, 0.96, 10)),
                stats: stats(6, 2, 3.0),
            },
        );
        results.insert(
            "noisy".to_string(),
            ConfigurationResult {
                summary: Some(summary(0.1, 0.90, 10)),
                stats: stats(6, 2, 1.0),
            },
        );

        let comparison = compare_configurations(&results);
        assert_eq!(comparison.ranking, vec!["fast", "slow", "noisy"]);
        assert_eq!(comparison.best_config.as_deref(), Some("fast"));
        assert_relative_eq!(comparison.scores["slow"].throughput, 2.0);
        assert_relative_eq!(comparison.scores["fast"].resource_efficiency, 2.0 / 6.0);
    }

    #[test]
    fn test_compare_throughput_floor_on_short_runs() {
        let mut results = BTreeMap::new();
        results.insert(
            "short".to_string(),
            ConfigurationResult {
                summary: Some(summary(0.3, 0.96, 4)),
                stats: stats(0, 0, 0.5),
            },
        );
        let comparison = compare_configurations(&results);
        assert_relative_eq!(comparison.scores["short"].throughput, 4.0);
        assert_eq!(comparison.scores["short"].resource_efficiency, 0.0);
    }

    #[test]
    fn test_compare_empty() {
        let comparison = compare_configurations(&BTreeMap::new());
        assert!(comparison.ranking.is_empty());
        assert!(comparison.best_config.is_none());
    }

    // =========================================================================
    // Bottlenecks and recommendations
    // =========================================================================

    #[test]
    fn test_detect_all_bottlenecks() {
        let s = summary(0.32, 0.9, 10);
        let found = Bottlenecks::detect(Some(&s), &stats(6, 4, 3.0), &BottleneckThresholds::default());
        assert!(found.high_latency);
        assert!(found.low_fidelity);
        // 4 > 6 * 0.6
        assert!(found.high_resource_usage);
    }

    #[test]
    fn test_detect_none() {
        let s = summary(0.1, 0.97, 10);
        let found = Bottlenecks::detect(Some(&s), &stats(6, 3, 3.0), &BottleneckThresholds::default());
        assert!(!found.any());
    }

    #[test]
    fn test_detect_without_summary() {
        let found = Bottlenecks::detect(None, &stats(6, 0, 0.0), &BottleneckThresholds::default());
        assert_eq!(found, Bottlenecks::default());
    }

    #[test]
    fn test_thresholds_from_config() {
        let config = SimulationConfig {
            latency_threshold: 0.5,
            ..SimulationConfig::default()
        };
        let thresholds = BottleneckThresholds::from(&config);
        assert_eq!(thresholds.latency, 0.5);
        assert_eq!(thresholds.fidelity, 0.95);
    }

    #[test]
    fn test_recommendations_general_only() {
        let recs = recommendations(&Bottlenecks::default());
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], "Use adaptive scheduling based on real-time network conditions");
    }

    #[test]
    fn test_recommendations_order() {
        let recs = recommendations(&Bottlenecks {
            high_latency: true,
            low_fidelity: false,
            high_resource_usage: true,
        });
        assert_eq!(recs.len(), 9);
        assert_eq!(recs[0], "Implement parallel entanglement distribution protocols");
        assert_eq!(recs[3], "Implement dynamic resource allocation strategies");
        assert_eq!(recs[8], "Consider circuit compression techniques to reduce operation count");
    }
}
