//! Declarative Bootstrap
//!
//! Builds an address space from a table of node declarations instead of
//! generated construction code. Each declaration describes one node and its
//! references; optional pieces name the capability they require and are
//! skipped when the [`CapabilityGate`] does not grant it.
//!
//! # Table format
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "id": "i=297",
//!       "browseName": "Default XML",
//!       "nodeClass": "Object",
//!       "requires": "Default XML",
//!       "references": [
//!         { "referenceType": "i=40", "target": "i=76" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Class-specific attributes sit next to `nodeClass` (e.g. `isAbstract`,
//! `dataType`). References default to `isForward: true`.
//!
//! # Load order
//!
//! Declarations are added in table order, which need not be topological:
//! targets may be declared after the nodes that reference them. Each node is
//! built completely before the single `add_node` call that publishes it.

use super::capabilities::{CapabilityGate, Encoding};
use super::error::BootstrapError;
use super::integrity::check_integrity;
use crate::config::AddressSpaceConfig;
use crate::db::NodeManager;
use crate::models::{ExpandedNodeId, LocalizedText, Node, NodeAttributes, NodeId, QualifiedName, Reference};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Standard-namespace core shipped with the crate
const STANDARD_NODES: &str = include_str!("../../data/standard_nodes.json");

fn default_forward() -> bool {
    true
}

/// One reference recorded on the declared node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDeclaration {
    pub reference_type: NodeId,

    pub target: ExpandedNodeId,

    #[serde(default = "default_forward")]
    pub is_forward: bool,

    /// Capability without which this reference is not recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Encoding>,
}

/// One node of a [`NodeTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDeclaration {
    pub id: NodeId,

    pub browse_name: QualifiedName,

    /// Defaults to the browse name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub attributes: NodeAttributes,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceDeclaration>,

    /// Capability without which the node is not constructed at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Encoding>,
}

impl NodeDeclaration {
    /// Whether `gate` allows this node to exist
    pub fn is_granted<G: CapabilityGate + ?Sized>(&self, gate: &G) -> bool {
        self.requires.map_or(true, |encoding| gate.grants(encoding))
    }

    /// Build the node with every granted reference
    ///
    /// Returns the node and the number of references left out by `gate`.
    pub fn build<G: CapabilityGate + ?Sized>(&self, gate: &G) -> (Node, usize) {
        let mut node = Node::new(
            self.id.clone(),
            self.browse_name.clone(),
            self.attributes.clone(),
        );
        if let Some(display_name) = &self.display_name {
            node = node.with_display_name(LocalizedText::english(display_name.clone()));
        }
        if let Some(description) = &self.description {
            node = node.with_description(LocalizedText::english(description.clone()));
        }

        let mut skipped = 0;
        for declaration in &self.references {
            if declaration.requires.is_some_and(|encoding| !gate.grants(encoding)) {
                skipped += 1;
                continue;
            }
            node.add_reference(Reference::new(
                self.id.clone(),
                declaration.reference_type.clone(),
                declaration.target.clone(),
                declaration.is_forward,
            ));
        }

        (node, skipped)
    }
}

/// Ordered list of node declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTable {
    pub nodes: Vec<NodeDeclaration>,
}

impl NodeTable {
    /// Parse and validate a JSON table
    pub fn from_json_str(json: &str) -> Result<Self, BootstrapError> {
        let table: NodeTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a JSON table file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BootstrapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BootstrapError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// The built-in standard-namespace core
    pub fn standard() -> Result<Self, BootstrapError> {
        Self::from_json_str(STANDARD_NODES)
    }

    /// Reject tables that could only partially load
    ///
    /// A table declaring the same id twice would fail half-way through
    /// `bulk_load`; catch it before anything is added.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for declaration in &self.nodes {
            if !seen.insert(&declaration.id) {
                return Err(BootstrapError::invalid_declaration(format!(
                    "node {} is declared more than once",
                    declaration.id
                )));
            }
        }
        Ok(())
    }

    /// Append the declarations of `other` (e.g. a vendor namespace)
    pub fn extend(&mut self, other: NodeTable) {
        self.nodes.extend(other.nodes);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Counts reported by [`bulk_load`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    /// Nodes published to the store
    pub added: usize,
    /// Declarations gated out entirely
    pub skipped_nodes: usize,
    /// References gated out on nodes that were added
    pub skipped_references: usize,
}

/// Load every declaration of `table` that `gate` allows into `manager`
///
/// A table declaring an id twice is rejected before anything is added.
/// Otherwise stops at the first store error; nodes added before it stay
/// published.
pub fn bulk_load<G: CapabilityGate + ?Sized>(
    manager: &NodeManager,
    table: &NodeTable,
    gate: &G,
) -> Result<LoadSummary, BootstrapError> {
    // Tables combined with `extend` have not been checked yet
    table.validate()?;

    let mut summary = LoadSummary::default();

    for declaration in &table.nodes {
        if !declaration.is_granted(gate) {
            tracing::debug!(
                "Skipping node {} ({}): capability not granted",
                declaration.id,
                declaration.browse_name
            );
            summary.skipped_nodes += 1;
            continue;
        }

        let (node, skipped_references) = declaration.build(gate);
        manager.add_node(node)?;
        summary.added += 1;
        summary.skipped_references += skipped_references;
    }

    tracing::info!(
        "Loaded {} node(s); gated out {} node(s) and {} reference(s)",
        summary.added,
        summary.skipped_nodes,
        summary.skipped_references
    );

    Ok(summary)
}

/// Build a store from `config` and load the standard table into it
pub fn bootstrap(config: &AddressSpaceConfig) -> Result<(NodeManager, LoadSummary), BootstrapError> {
    bootstrap_with(config, &NodeTable::standard()?)
}

/// Build a store from `config` and load `table` into it
///
/// Runs the integrity pass afterwards when the configuration asks for it; its
/// diagnostics are logged, never returned as errors.
pub fn bootstrap_with(
    config: &AddressSpaceConfig,
    table: &NodeTable,
) -> Result<(NodeManager, LoadSummary), BootstrapError> {
    config.validate().map_err(BootstrapError::InvalidConfig)?;

    let manager = NodeManager::with_capacity(config.initial_capacity, config.event_channel_capacity);
    let summary = bulk_load(&manager, table, &config.encodings)?;

    if config.check_integrity_after_load {
        check_integrity(&manager);
    }

    Ok((manager, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ids, NodeClass};
    use crate::services::EncodingCapabilities;

    const SMALL_TABLE: &str = r#"{
        "nodes": [
            {
                "id": "i=884",
                "browseName": "Range",
                "nodeClass": "DataType",
                "references": [
                    { "referenceType": "i=38", "target": "i=886", "requires": "Default Binary" },
                    { "referenceType": "i=38", "target": "i=885", "requires": "Default XML" }
                ]
            },
            {
                "id": "i=886",
                "browseName": "Default Binary",
                "nodeClass": "Object",
                "requires": "Default Binary"
            },
            {
                "id": "i=885",
                "browseName": "Default XML",
                "displayName": "XML encoding",
                "nodeClass": "Object",
                "requires": "Default XML"
            }
        ]
    }"#;

    #[test]
    fn test_declaration_parsing() {
        let table = NodeTable::from_json_str(SMALL_TABLE).unwrap();
        assert_eq!(table.len(), 3);

        let range = &table.nodes[0];
        assert_eq!(range.id, ids::RANGE);
        assert_eq!(range.attributes.node_class(), NodeClass::DataType);
        assert_eq!(range.references.len(), 2);
        assert!(range.references[0].is_forward);
        assert_eq!(range.references[1].requires, Some(Encoding::Xml));
        assert_eq!(table.nodes[2].display_name.as_deref(), Some("XML encoding"));
    }

    #[test]
    fn test_bulk_load_honours_gate() {
        let table = NodeTable::from_json_str(SMALL_TABLE).unwrap();
        let manager = NodeManager::new();
        let gate = EncodingCapabilities {
            xml: false,
            ..EncodingCapabilities::all()
        };

        let summary = bulk_load(&manager, &table, &gate).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                added: 2,
                skipped_nodes: 1,
                skipped_references: 1,
            }
        );
        assert!(!manager.contains_node(&NodeId::numeric(0, 885)));
        let range = manager.get_node(&ids::RANGE).unwrap();
        assert_eq!(range.references.len(), 1);
        assert_eq!(range.references[0].target_id, NodeId::numeric(0, 886));
    }

    #[test]
    fn test_build_uses_declared_names() {
        let table = NodeTable::from_json_str(SMALL_TABLE).unwrap();
        let (node, skipped) = table.nodes[2].build(&EncodingCapabilities::all());
        assert_eq!(skipped, 0);
        assert_eq!(node.browse_name.name, "Default XML");
        assert_eq!(node.display_name.text, "XML encoding");
        assert!(node.description.is_none());
    }

    #[test]
    fn test_duplicate_declarations_are_rejected_before_loading() {
        let json = r#"{ "nodes": [
            { "id": "i=85", "browseName": "Objects", "nodeClass": "Object" },
            { "id": "i=85", "browseName": "Objects", "nodeClass": "Object" }
        ] }"#;
        let err = NodeTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidDeclaration(_)));
    }

    #[test]
    fn test_extended_table_with_duplicate_id_adds_nothing() {
        let mut table = NodeTable::from_json_str(
            r#"{ "nodes": [
                { "id": "ns=1;i=1", "browseName": "1:Pump", "nodeClass": "Object" },
                { "id": "ns=1;i=2", "browseName": "1:Valve", "nodeClass": "Object" }
            ] }"#,
        )
        .unwrap();
        let vendor = NodeTable::from_json_str(
            r#"{ "nodes": [
                { "id": "ns=1;i=3", "browseName": "1:Tank", "nodeClass": "Object" },
                { "id": "ns=1;i=1", "browseName": "1:Pump", "nodeClass": "Object" }
            ] }"#,
        )
        .unwrap();
        table.extend(vendor);

        let manager = NodeManager::new();
        let err = bulk_load(&manager, &table, &EncodingCapabilities::all()).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidDeclaration(_)));
        assert!(manager.is_empty());

        let err = bootstrap_with(&AddressSpaceConfig::default(), &table).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidDeclaration(_)));
    }

    #[test]
    fn test_malformed_table_is_a_parse_error() {
        let err = NodeTable::from_json_str(r#"{ "nodes": [ { "id": "x=1" } ] }"#).unwrap_err();
        assert!(matches!(err, BootstrapError::Parse(_)));
    }

    #[test]
    fn test_bootstrap_rejects_invalid_config() {
        let config = AddressSpaceConfig {
            initial_capacity: 0,
            ..AddressSpaceConfig::default()
        };
        let err = bootstrap_with(&config, &NodeTable::default()).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidConfig(_)));
    }
}
