//! Address Space Error Types
//!
//! This module defines the typed errors raised by the store, and their mapping
//! to OPC-UA status codes so protocol layers can answer clients without leaking
//! internal error details.

use crate::models::{NodeId, ValidationError};
use std::fmt;
use thiserror::Error;

/// Store operation errors
///
/// The store fails fast: an operation returning an error has not changed any
/// state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressSpaceError {
    /// `add_node` with an id that is already present; the existing entry is untouched
    #[error("Node already exists: {id}")]
    DuplicateNodeId { id: NodeId },

    /// The referenced node is not in the store
    #[error("Node not found: {id}")]
    NotFound { id: NodeId },

    /// A reference type argument does not identify a ReferenceType node
    #[error("Not a reference type: {id}")]
    InvalidReferenceType { id: NodeId },

    /// The node failed structural validation before publication
    #[error("Node validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

impl AddressSpaceError {
    /// Create a duplicate node id error
    pub fn duplicate(id: NodeId) -> Self {
        Self::DuplicateNodeId { id }
    }

    /// Create a node not found error
    pub fn not_found(id: NodeId) -> Self {
        Self::NotFound { id }
    }

    /// Create an invalid reference type error
    pub fn invalid_reference_type(id: NodeId) -> Self {
        Self::InvalidReferenceType { id }
    }

    /// Protocol status a client should receive for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateNodeId { .. } => StatusCode::BadNodeIdExists,
            Self::NotFound { .. } => StatusCode::BadNodeIdUnknown,
            Self::InvalidReferenceType { .. } => StatusCode::BadReferenceTypeIdInvalid,
            Self::ValidationFailed(ValidationError::ReferenceSourceMismatch { .. }) => {
                StatusCode::BadSourceNodeIdInvalid
            }
            Self::ValidationFailed(_) => StatusCode::BadNodeIdInvalid,
        }
    }
}

/// OPC-UA status codes produced by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StatusCode {
    BadNodeIdInvalid = 0x8033_0000,
    BadNodeIdUnknown = 0x8034_0000,
    BadReferenceTypeIdInvalid = 0x804C_0000,
    BadNodeIdExists = 0x805E_0000,
    BadSourceNodeIdInvalid = 0x8064_0000,
}

impl StatusCode {
    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusCode::BadNodeIdInvalid => "Bad_NodeIdInvalid",
            StatusCode::BadNodeIdUnknown => "Bad_NodeIdUnknown",
            StatusCode::BadReferenceTypeIdInvalid => "Bad_ReferenceTypeIdInvalid",
            StatusCode::BadNodeIdExists => "Bad_NodeIdExists",
            StatusCode::BadSourceNodeIdInvalid => "Bad_SourceNodeIdInvalid",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name(), self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ids;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AddressSpaceError::not_found(ids::SERVER).status_code(),
            StatusCode::BadNodeIdUnknown
        );
        assert_eq!(
            AddressSpaceError::duplicate(ids::SERVER).status_code().bits(),
            0x805E0000
        );
        assert_eq!(
            AddressSpaceError::invalid_reference_type(ids::ROOT_FOLDER).status_code(),
            StatusCode::BadReferenceTypeIdInvalid
        );
        assert_eq!(
            AddressSpaceError::from(ValidationError::NullNodeId).status_code(),
            StatusCode::BadNodeIdInvalid
        );
    }

    #[test]
    fn test_error_messages_name_the_node() {
        let err = AddressSpaceError::not_found(ids::OBJECTS_FOLDER);
        assert_eq!(err.to_string(), "Node not found: ns=0;i=85");
        assert_eq!(
            StatusCode::BadNodeIdUnknown.to_string(),
            "Bad_NodeIdUnknown (0x80340000)"
        );
    }
}
