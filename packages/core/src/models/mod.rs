//! Data Models
//!
//! This module contains the value types of the address space:
//!
//! - Identity types (`NodeId`, `ExpandedNodeId`, `QualifiedName`, `LocalizedText`)
//! - `Reference` - typed, directed edge recorded on its source node
//! - `Node` - identity, common attributes, class-specific payload and references
//! - `ids` - well-known identifiers of the standard namespace

pub mod ids;
mod node;
mod node_id;
mod reference;

pub use node::{
    MethodAttributes, Node, NodeAttributes, NodeClass, ObjectAttributes, ReferenceTypeAttributes,
    TypeAttributes, ValidationError, VariableAttributes, VariableTypeAttributes, ViewAttributes,
    ACCESS_LEVEL_CURRENT_READ, VALUE_RANK_SCALAR,
};
pub use node_id::{ExpandedNodeId, Identifier, LocalizedText, NodeId, NodeIdParseError, QualifiedName};
pub use reference::{BrowseDirection, Reference};
