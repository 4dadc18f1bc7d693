//! Node Data Structures
//!
//! This module defines the `Node` struct stored in the address space and its
//! class-specific attribute payloads.
//!
//! # Architecture
//!
//! - **Single Node type**: every node class (Object, Variable, ReferenceType, ...)
//!   is the same struct; the class lives in the [`NodeAttributes`] variant
//! - **Variant data, not inheritance**: generated types like `FolderType` or
//!   `ServerType` differ only in which attributes are legal, so they are plain
//!   payloads rather than separate Rust types
//! - **Own references only**: a node carries the references recorded on it; the
//!   inverse view is derived by the store
//!
//! # Examples
//!
//! ```rust
//! use uaspace_core::models::{ids, Node, NodeAttributes, NodeClass, QualifiedName, Reference};
//!
//! let mut root = Node::new(
//!     ids::ROOT_FOLDER,
//!     QualifiedName::new(0, "Root"),
//!     NodeAttributes::object(),
//! );
//! root.add_reference(Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER));
//! root.add_reference(Reference::forward(ids::ROOT_FOLDER, ids::HAS_TYPE_DEFINITION, ids::FOLDER_TYPE));
//!
//! assert_eq!(root.node_class(), NodeClass::Object);
//! assert_eq!(root.display_name.text, "Root");
//! assert!(root.validate().is_ok());
//! ```

use super::node_id::{LocalizedText, NodeId, QualifiedName};
use super::reference::Reference;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for Node construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Node id must not be null")]
    NullNodeId,

    #[error("Node {0} has an empty browse name")]
    EmptyBrowseName(NodeId),

    #[error("Reference recorded on node {node_id} declares source {source_id}")]
    ReferenceSourceMismatch { node_id: NodeId, source_id: NodeId },
}

/// OPC-UA node classes, with their protocol mask values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

impl NodeClass {
    pub fn mask(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Object => "Object",
            NodeClass::Variable => "Variable",
            NodeClass::Method => "Method",
            NodeClass::ObjectType => "ObjectType",
            NodeClass::VariableType => "VariableType",
            NodeClass::ReferenceType => "ReferenceType",
            NodeClass::DataType => "DataType",
            NodeClass::View => "View",
        }
    }

    /// Type-definition classes (ObjectType, VariableType, ReferenceType, DataType)
    pub fn is_type(self) -> bool {
        matches!(
            self,
            NodeClass::ObjectType
                | NodeClass::VariableType
                | NodeClass::ReferenceType
                | NodeClass::DataType
        )
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value rank of a scalar variable
pub const VALUE_RANK_SCALAR: i32 = -1;

/// `CurrentRead` access level bit
pub const ACCESS_LEVEL_CURRENT_READ: u8 = 0x01;

fn default_value_rank() -> i32 {
    VALUE_RANK_SCALAR
}

fn default_access_level() -> u8 {
    ACCESS_LEVEL_CURRENT_READ
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAttributes {
    #[serde(default)]
    pub event_notifier: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableAttributes {
    pub data_type: NodeId,

    #[serde(default = "default_value_rank")]
    pub value_rank: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_dimensions: Option<Vec<u32>>,

    #[serde(default = "default_access_level")]
    pub access_level: u8,

    #[serde(default = "default_access_level")]
    pub user_access_level: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_sampling_interval: Option<f64>,

    #[serde(default)]
    pub historizing: bool,

    /// Initial value; live values belong to the attribute service, not the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl VariableAttributes {
    /// Scalar, read-only variable of the given data type
    pub fn new(data_type: NodeId) -> Self {
        Self {
            data_type,
            value_rank: VALUE_RANK_SCALAR,
            array_dimensions: None,
            access_level: ACCESS_LEVEL_CURRENT_READ,
            user_access_level: ACCESS_LEVEL_CURRENT_READ,
            minimum_sampling_interval: None,
            historizing: false,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAttributes {
    #[serde(default)]
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableTypeAttributes {
    pub data_type: NodeId,

    #[serde(default = "default_value_rank")]
    pub value_rank: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_dimensions: Option<Vec<u32>>,

    #[serde(default)]
    pub is_abstract: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTypeAttributes {
    #[serde(default)]
    pub is_abstract: bool,

    #[serde(default)]
    pub symmetric: bool,

    /// Name of the edge when followed backwards (e.g. "OrganizedBy")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_name: Option<LocalizedText>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewAttributes {
    #[serde(default)]
    pub contains_no_loops: bool,

    #[serde(default)]
    pub event_notifier: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodAttributes {
    #[serde(default = "default_true")]
    pub executable: bool,

    #[serde(default = "default_true")]
    pub user_executable: bool,
}

impl Default for MethodAttributes {
    fn default() -> Self {
        Self {
            executable: true,
            user_executable: true,
        }
    }
}

/// Class-specific attributes; the variant determines the node class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeClass")]
pub enum NodeAttributes {
    Object(ObjectAttributes),
    Variable(VariableAttributes),
    Method(MethodAttributes),
    ObjectType(TypeAttributes),
    VariableType(VariableTypeAttributes),
    ReferenceType(ReferenceTypeAttributes),
    DataType(TypeAttributes),
    View(ViewAttributes),
}

impl NodeAttributes {
    pub fn object() -> Self {
        NodeAttributes::Object(ObjectAttributes::default())
    }

    pub fn variable(data_type: NodeId) -> Self {
        NodeAttributes::Variable(VariableAttributes::new(data_type))
    }

    pub fn method() -> Self {
        NodeAttributes::Method(MethodAttributes::default())
    }

    pub fn object_type(is_abstract: bool) -> Self {
        NodeAttributes::ObjectType(TypeAttributes { is_abstract })
    }

    pub fn data_type(is_abstract: bool) -> Self {
        NodeAttributes::DataType(TypeAttributes { is_abstract })
    }

    pub fn reference_type(
        is_abstract: bool,
        symmetric: bool,
        inverse_name: Option<LocalizedText>,
    ) -> Self {
        NodeAttributes::ReferenceType(ReferenceTypeAttributes {
            is_abstract,
            symmetric,
            inverse_name,
        })
    }

    pub fn node_class(&self) -> NodeClass {
        match self {
            NodeAttributes::Object(_) => NodeClass::Object,
            NodeAttributes::Variable(_) => NodeClass::Variable,
            NodeAttributes::Method(_) => NodeClass::Method,
            NodeAttributes::ObjectType(_) => NodeClass::ObjectType,
            NodeAttributes::VariableType(_) => NodeClass::VariableType,
            NodeAttributes::ReferenceType(_) => NodeClass::ReferenceType,
            NodeAttributes::DataType(_) => NodeClass::DataType,
            NodeAttributes::View(_) => NodeClass::View,
        }
    }

    /// IsAbstract attribute for type classes, `None` for instance classes
    pub fn is_abstract(&self) -> Option<bool> {
        match self {
            NodeAttributes::ObjectType(a) | NodeAttributes::DataType(a) => Some(a.is_abstract),
            NodeAttributes::VariableType(a) => Some(a.is_abstract),
            NodeAttributes::ReferenceType(a) => Some(a.is_abstract),
            _ => None,
        }
    }
}

/// A node of the address space
///
/// # Fields
///
/// - `id`: unique key in the store
/// - `browse_name` / `display_name` / `description`: common attributes
/// - `attributes`: class-specific payload (determines [`NodeClass`])
/// - `references`: edges recorded on this node, in declaration order
///
/// # Ownership
///
/// A `Node` is a builder until it is handed to
/// [`NodeManager::add_node`](crate::db::NodeManager::add_node). The store then
/// publishes it as an immutable `Arc<Node>`; changes go through remove + add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    pub browse_name: QualifiedName,

    pub display_name: LocalizedText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,

    #[serde(default)]
    pub write_mask: u32,

    #[serde(default)]
    pub user_write_mask: u32,

    #[serde(flatten)]
    pub attributes: NodeAttributes,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Node {
    /// Create a node with no references
    ///
    /// The display name defaults to the browse name in the "en" locale.
    pub fn new(id: NodeId, browse_name: QualifiedName, attributes: NodeAttributes) -> Self {
        let display_name = LocalizedText::english(browse_name.name.clone());
        Self {
            id,
            browse_name,
            display_name,
            description: None,
            write_mask: 0,
            user_write_mask: 0,
            attributes,
            references: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: LocalizedText) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = Some(description);
        self
    }

    pub fn node_class(&self) -> NodeClass {
        self.attributes.node_class()
    }

    /// Record a reference on this (not yet published) node
    pub fn add_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    pub fn add_references(&mut self, references: impl IntoIterator<Item = Reference>) {
        self.references.extend(references);
    }

    /// References of exactly the given type (no subtype matching)
    pub fn references_of_type<'a>(
        &'a self,
        reference_type_id: &'a NodeId,
    ) -> impl Iterator<Item = &'a Reference> + 'a {
        self.references
            .iter()
            .filter(move |r| &r.reference_type_id == reference_type_id)
    }

    /// Check structural rules before the node is published
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_null() {
            return Err(ValidationError::NullNodeId);
        }

        if self.browse_name.name.is_empty() {
            return Err(ValidationError::EmptyBrowseName(self.id.clone()));
        }

        if let Some(reference) = self.references.iter().find(|r| r.source_id != self.id) {
            return Err(ValidationError::ReferenceSourceMismatch {
                node_id: self.id.clone(),
                source_id: reference.source_id.clone(),
            });
        }

        Ok(())
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
