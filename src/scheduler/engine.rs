// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Priority scheduler placing subcircuits onto node slot pools.
//!
//! A drain works on a snapshot: [`QuantumScheduler::execute_schedule`]
//! swaps the live queue for an empty one before it starts, so work
//! submitted while a drain is running lands in the next drain. Each item
//! takes the network lock for its own placement and execution only.
//!
//! Draining is a single pass. An item that fits no node is pushed back at
//! `priority + 1` and stays queued for the next call. Slots are released
//! right after each item runs, so later items in the same pass see every
//! slot an earlier item used.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::queue::{PendingQueue, WorkItem};
use super::types::{CompletionRecord, ScheduleAnalysis, SubcircuitDescriptor};
use crate::config::SchedulerConfig;
use crate::error::{NetworkError, Result};
use crate::network::{QuantumNetwork, SharedNetwork};
use crate::validation;

/// Scheduler bound to one shared network.
pub struct QuantumScheduler {
    network: SharedNetwork,
    config: SchedulerConfig,
    pending: Mutex<PendingQueue>,
    next_sequence: AtomicU64,
    completed: Mutex<Vec<CompletionRecord>>,
    history: Mutex<Vec<ScheduleAnalysis>>,
}

impl QuantumScheduler {
    /// Create a scheduler with default settings.
    pub fn new(network: SharedNetwork) -> Self {
        Self::with_config(network, SchedulerConfig::default())
    }

    pub fn with_config(network: SharedNetwork, config: SchedulerConfig) -> Self {
        Self {
            network,
            config,
            pending: Mutex::new(PendingQueue::new()),
            next_sequence: AtomicU64::new(0),
            completed: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn network(&self) -> &SharedNetwork {
        &self.network
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Queue subcircuits under one priority and one submission time.
    ///
    /// Insertion order becomes the tie-break between equal keys. Returns
    /// the number of items queued.
    ///
    /// # Errors
    ///
    /// A validation error if any descriptor requires zero qubits. Nothing
    /// from the batch is queued in that case. Descriptors larger than every
    /// node are accepted and stay queued.
    pub fn schedule<I>(&self, subcircuits: I, priority: u32) -> Result<usize>
    where
        I: IntoIterator<Item = SubcircuitDescriptor>,
    {
        let subcircuits: Vec<SubcircuitDescriptor> = subcircuits.into_iter().collect();
        for subcircuit in &subcircuits {
            validation::validate_required_qubits(subcircuit)?;
        }

        let submitted_at = self.network.lock().logical_time();
        let mut pending = self.pending.lock();
        let mut count = 0;

        for subcircuit in subcircuits {
            let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
            pending.push(WorkItem {
                priority,
                submitted_at,
                sequence,
                subcircuit,
            });
            count += 1;
        }

        debug!(count, priority, submitted_at, "Scheduled subcircuits");
        Ok(count)
    }

    /// Queue subcircuits at the configured default priority.
    pub fn schedule_default<I>(&self, subcircuits: I) -> Result<usize>
    where
        I: IntoIterator<Item = SubcircuitDescriptor>,
    {
        self.schedule(subcircuits, self.config.default_priority)
    }

    /// Drain a snapshot of the queue once and report on it.
    pub fn execute_schedule(&self) -> ScheduleAnalysis {
        let mut batch = std::mem::take(&mut *self.pending.lock());
        let start = self.network.lock().logical_time();
        let batch_size = batch.len();

        info!(batch_size, "Executing schedule");

        let mut completions = Vec::new();
        let mut requeued = Vec::new();

        while let Some(item) = batch.pop() {
            match self.place(&item) {
                Ok(Some(record)) => completions.push(record),
                Ok(None) => {
                    debug!(
                        partition_id = item.subcircuit.partition_id,
                        required_qubits = item.subcircuit.required_qubits,
                        "No node has enough free slots, re-queueing"
                    );
                    requeued.push(item.requeued());
                }
                // Unreachable while node pools stay consistent
                Err(e) => {
                    error!(
                        partition_id = item.subcircuit.partition_id,
                        error = %e,
                        "Subcircuit execution failed, re-queueing"
                    );
                    requeued.push(item.requeued());
                }
            }
        }

        let still_pending = requeued.len();
        let queue_len = {
            let mut pending = self.pending.lock();
            for item in requeued {
                pending.push(item);
            }
            pending.len()
        };

        let (end, node_utilizations) = {
            let network = self.network.lock();
            (network.logical_time(), network.stats().node_utilizations)
        };

        let executed = completions.len();
        let total_execution_time = end - start;
        let analysis = ScheduleAnalysis {
            total_execution_time,
            circuits_executed: executed,
            average_circuit_time: total_execution_time / executed.max(1) as f64,
            node_utilizations,
            schedule_efficiency: executed as f64 / (executed + still_pending).max(1) as f64,
            batch_size,
            still_pending,
            queue_len,
            completions: completions.clone(),
        };

        info!(
            executed,
            still_pending,
            queue_len,
            total_execution_time,
            efficiency = analysis.schedule_efficiency,
            "Schedule drained"
        );

        self.completed.lock().extend(completions);
        self.history.lock().push(analysis.clone());
        analysis
    }

    /// Place and run one item. `Ok(None)` means no node currently fits it.
    fn place(&self, item: &WorkItem) -> std::result::Result<Option<CompletionRecord>, NetworkError> {
        let mut network = self.network.lock();

        let Some((node_id, slots)) = network.reserve_first_fit(item.subcircuit.required_qubits)
        else {
            return Ok(None);
        };

        let result = self.run_on_slots(&mut network, node_id, &slots);
        if let Ok(node) = network.node_mut(node_id) {
            node.release_slots(&slots);
        }
        let elapsed = result?;

        debug!(
            node = node_id,
            partition_id = item.subcircuit.partition_id,
            elapsed,
            "Executed subcircuit"
        );

        Ok(Some(CompletionRecord {
            node_id,
            subcircuit_id: item.subcircuit.partition_id,
            elapsed,
            slots_used: slots,
        }))
    }

    /// Charge the base cost and run the configured gate on each slot.
    ///
    /// The slots were just reserved from `node_id`'s own pool, so gate
    /// execution only fails if that pool disagrees with the node's slot
    /// count. Such a failure is logged and the item re-queued.
    fn run_on_slots(
        &self,
        network: &mut QuantumNetwork,
        node_id: usize,
        slots: &[usize],
    ) -> std::result::Result<f64, NetworkError> {
        let mut elapsed = self.config.base_execution_time;
        network.advance_clock(self.config.base_execution_time);

        for &slot in slots {
            elapsed += network.execute_gate(node_id, self.config.gate, &[slot], self.config.gate_duration)?;
        }
        Ok(elapsed)
    }

    /// Every completion recorded so far, across all drains.
    pub fn completed(&self) -> Vec<CompletionRecord> {
        self.completed.lock().clone()
    }

    /// Analyses of every drain so far, oldest first.
    pub fn history(&self) -> Vec<ScheduleAnalysis> {
        self.history.lock().clone()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Queued items in the order they would run.
    pub fn pending(&self) -> Vec<WorkItem> {
        self.pending.lock().to_sorted_vec()
    }
}
