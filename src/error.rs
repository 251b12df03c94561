// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the distributed quantum network.

use std::fmt;

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Node or network resource error
    Network(NetworkError),
    /// Protocol failure (teleportation or remote gate)
    Protocol(ProtocolError),
    /// Validation error
    Validation(ValidationError),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Network(e) => write!(f, "Network error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Network(e) => Some(e),
            Error::Protocol(e) => Some(e),
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::Network(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Node and network resource errors.
///
/// Raised synchronously by [`QuantumNode`](crate::network::QuantumNode) and
/// [`QuantumNetwork`](crate::network::QuantumNetwork) before any state is
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Node id out of range
    InvalidNode { node: usize, num_nodes: usize },
    /// Slot index out of range on a node
    InvalidSlot {
        node: usize,
        slot: usize,
        num_slots: usize,
    },
    /// Entanglement requested between two slots of the same node
    SameNodeEntanglement { node: usize },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::InvalidNode { node, num_nodes } => {
                write!(f, "Invalid node {} (network has {} nodes)", node, num_nodes)
            }
            NetworkError::InvalidSlot {
                node,
                slot,
                num_slots,
            } => write!(
                f,
                "Invalid slot {} on node {} (node has {} slots)",
                slot, node, num_slots
            ),
            NetworkError::SameNodeEntanglement { node } => write!(
                f,
                "Entanglement must be between different nodes (both on node {})",
                node
            ),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Protocol-level failures, wrapping the stage error that aborted the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Teleportation aborted
    Teleportation(NetworkError),
    /// Remote gate operation aborted
    RemoteGate(NetworkError),
}

impl ProtocolError {
    /// The stage error that caused the failure.
    pub fn cause(&self) -> &NetworkError {
        match self {
            ProtocolError::Teleportation(e) | ProtocolError::RemoteGate(e) => e,
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Teleportation(e) => write!(f, "Teleportation failed: {}", e),
            ProtocolError::RemoteGate(e) => write!(f, "Remote gate operation failed: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause())
    }
}

/// Validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // =========================================================================
    // Display
    // =========================================================================

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("no nodes".into());
        assert_eq!(e.to_string(), "Configuration error: no nodes");
    }

    #[test]
    fn test_network_error_display_invalid_node() {
        let e = NetworkError::InvalidNode {
            node: 5,
            num_nodes: 2,
        };
        assert_eq!(e.to_string(), "Invalid node 5 (network has 2 nodes)");
    }

    #[test]
    fn test_network_error_display_invalid_slot() {
        let e = NetworkError::InvalidSlot {
            node: 1,
            slot: 9,
            num_slots: 3,
        };
        assert_eq!(e.to_string(), "Invalid slot 9 on node 1 (node has 3 slots)");
    }

    #[test]
    fn test_network_error_display_same_node() {
        let e = NetworkError::SameNodeEntanglement { node: 0 };
        assert!(e.to_string().contains("different nodes"));
    }

    #[test]
    fn test_protocol_error_display_wraps_cause() {
        let e = ProtocolError::Teleportation(NetworkError::SameNodeEntanglement { node: 1 });
        assert!(e.to_string().starts_with("Teleportation failed: "));

        let e = ProtocolError::RemoteGate(NetworkError::InvalidNode {
            node: 3,
            num_nodes: 2,
        });
        assert_eq!(
            e.to_string(),
            "Remote gate operation failed: Invalid node 3 (network has 2 nodes)"
        );
    }

    #[test]
    fn test_validation_error_display_field() {
        let e = ValidationError::Field {
            field: "num_nodes".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(e.to_string(), "Field 'num_nodes': must be greater than 0");
    }

    #[test]
    fn test_validation_error_display_resource_limit() {
        let e = ValidationError::ResourceLimit {
            resource: "required_qubits".into(),
            limit: 3,
            requested: 8,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for required_qubits: limit=3, requested=8"
        );
    }

    // =========================================================================
    // source()
    // =========================================================================

    #[test]
    fn test_protocol_error_source_is_cause() {
        let cause = NetworkError::InvalidNode {
            node: 4,
            num_nodes: 2,
        };
        let e = ProtocolError::Teleportation(cause.clone());
        let src = e.source().unwrap();
        assert_eq!(src.to_string(), cause.to_string());
        assert_eq!(e.cause(), &cause);
    }

    #[test]
    fn test_error_source() {
        assert!(Error::Network(NetworkError::SameNodeEntanglement { node: 0 })
            .source()
            .is_some());
        assert!(Error::Io(std::io::Error::other("disk")).source().is_some());
        assert!(Error::Config("x".into()).source().is_none());
        assert!(Error::Serialization("x".into()).source().is_none());
    }

    // =========================================================================
    // From impls
    // =========================================================================

    #[test]
    fn test_from_network_error() {
        let e: Error = NetworkError::SameNodeEntanglement { node: 0 }.into();
        assert!(matches!(e, Error::Network(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let e: Error =
            ProtocolError::RemoteGate(NetworkError::SameNodeEntanglement { node: 0 }).into();
        assert!(matches!(e, Error::Protocol(ProtocolError::RemoteGate(_))));
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }
}
