// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Synthetic fidelity model.
//!
//! Fidelity is a stochastic proxy, not a property of any simulated state:
//! a base value plus Gaussian noise, clamped to a fixed band.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Bounded Gaussian fidelity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FidelityModel {
    /// Mean fidelity
    pub base: f64,
    /// Standard deviation of the noise term (0 = deterministic)
    pub std_dev: f64,
    /// Lower clamp
    pub min: f64,
    /// Upper clamp
    pub max: f64,
}

impl FidelityModel {
    /// Teleportation: 0.96 ± N(0, 0.005), clamped to [0.94, 0.98].
    pub const TELEPORTATION: FidelityModel = FidelityModel {
        base: 0.96,
        std_dev: 0.005,
        min: 0.94,
        max: 0.98,
    };

    /// Remote controlled gate: 0.94 ± N(0, 0.02), clamped to [0.8, 1.0].
    pub const REMOTE_GATE: FidelityModel = FidelityModel {
        base: 0.94,
        std_dev: 0.02,
        min: 0.8,
        max: 1.0,
    };

    /// Local single-qubit gate: fixed 0.98.
    pub const LOCAL_GATE: FidelityModel = FidelityModel {
        base: 0.98,
        std_dev: 0.0,
        min: 0.98,
        max: 0.98,
    };

    /// Draw one fidelity value.
    ///
    /// Consumes exactly one normal sample when `std_dev > 0` and none
    /// otherwise, so the random stream stays aligned across runs.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let noise = match Normal::new(0.0, self.std_dev) {
            Ok(normal) if self.std_dev > 0.0 => normal.sample(rng),
            _ => 0.0,
        };
        (self.base + noise).clamp(self.min, self.max)
    }

    /// Whether `fidelity` lies inside this model's clamp band.
    pub fn contains(&self, fidelity: f64) -> bool {
        (self.min..=self.max).contains(&fidelity)
    }
}
