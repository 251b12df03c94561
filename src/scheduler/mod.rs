// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Priority-based subcircuit scheduling.

mod engine;
mod queue;
mod types;

pub use engine::QuantumScheduler;
pub use queue::{PendingQueue, WorkItem};
pub use types::{CompletionRecord, ScheduleAnalysis, SubcircuitDescriptor};
