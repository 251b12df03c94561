// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gate kinds understood by the network.
//!
//! Circuit construction happens outside this crate; the network only needs
//! to know which gates are two-qubit controlled operations (and therefore
//! need entanglement when their operands live on different nodes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    /// Hadamard
    H,
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Phase (S)
    S,
    /// T gate
    T,
    /// Controlled-NOT
    Cnot,
    /// Controlled-X (alias of CNOT in most toolchains)
    Cx,
    /// Controlled-Z
    Cz,
}

impl GateKind {
    /// Whether this gate is a two-qubit controlled operation.
    pub fn is_controlled(self) -> bool {
        matches!(self, GateKind::Cnot | GateKind::Cx | GateKind::Cz)
    }

    /// Number of qubit operands.
    pub fn arity(self) -> usize {
        if self.is_controlled() {
            2
        } else {
            1
        }
    }

    /// Canonical gate name.
    pub fn as_str(self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Cnot => "CNOT",
            GateKind::Cx => "CX",
            GateKind::Cz => "CZ",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "H" => Ok(GateKind::H),
            "X" => Ok(GateKind::X),
            "Y" => Ok(GateKind::Y),
            "Z" => Ok(GateKind::Z),
            "S" => Ok(GateKind::S),
            "T" => Ok(GateKind::T),
            "CNOT" => Ok(GateKind::Cnot),
            "CX" => Ok(GateKind::Cx),
            "CZ" => Ok(GateKind::Cz),
            other => Err(format!("Unknown gate kind '{other}'")),
        }
    }
}
