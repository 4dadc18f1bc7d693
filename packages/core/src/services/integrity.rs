//! Post-load integrity pass
//!
//! Referential integrity is only meaningful once a bulk load has finished. This
//! pass walks a snapshot of the store and reports references whose local
//! target was never added and references whose type is not a ReferenceType
//! node. Findings are diagnostics: dangling edges are expected for
//! capability-gated targets and for namespaces loaded later.

use crate::db::NodeManager;
use crate::models::{NodeClass, NodeId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// One integrity finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityDiagnostic {
    /// The local target of a reference is not in the store
    #[serde(rename_all = "camelCase")]
    DanglingReference {
        source_id: NodeId,
        reference_type_id: NodeId,
        target_id: NodeId,
    },

    /// The reference type is absent or not a ReferenceType node
    #[serde(rename_all = "camelCase")]
    UnknownReferenceType {
        source_id: NodeId,
        reference_type_id: NodeId,
    },
}

impl fmt::Display for IntegrityDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityDiagnostic::DanglingReference {
                source_id,
                reference_type_id,
                target_id,
            } => write!(
                f,
                "dangling reference {} --{}--> {}",
                source_id, reference_type_id, target_id
            ),
            IntegrityDiagnostic::UnknownReferenceType {
                source_id,
                reference_type_id,
            } => write!(
                f,
                "node {} uses unknown reference type {}",
                source_id, reference_type_id
            ),
        }
    }
}

/// Result of [`check_integrity`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub nodes_checked: usize,
    pub references_checked: usize,
    pub diagnostics: Vec<IntegrityDiagnostic>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn dangling_references(&self) -> impl Iterator<Item = &IntegrityDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, IntegrityDiagnostic::DanglingReference { .. }))
    }
}

/// Check every recorded reference of every node in `manager`
///
/// Nodes are visited in id order so reports are reproducible.
pub fn check_integrity(manager: &NodeManager) -> IntegrityReport {
    let mut nodes = manager.nodes();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let mut report = IntegrityReport {
        nodes_checked: nodes.len(),
        ..IntegrityReport::default()
    };
    let mut type_checks: HashMap<NodeId, bool> = HashMap::new();

    for node in &nodes {
        for reference in &node.references {
            report.references_checked += 1;

            let known_type = *type_checks
                .entry(reference.reference_type_id.clone())
                .or_insert_with(|| {
                    manager
                        .get_node(&reference.reference_type_id)
                        .map(|t| t.node_class() == NodeClass::ReferenceType)
                        .unwrap_or(false)
                });
            if !known_type {
                report.diagnostics.push(IntegrityDiagnostic::UnknownReferenceType {
                    source_id: node.id.clone(),
                    reference_type_id: reference.reference_type_id.clone(),
                });
            }

            // Targets on other servers or namespaces are out of reach
            let Some(target) = reference.local_target() else {
                continue;
            };
            if !manager.contains_node(target) {
                report.diagnostics.push(IntegrityDiagnostic::DanglingReference {
                    source_id: node.id.clone(),
                    reference_type_id: reference.reference_type_id.clone(),
                    target_id: target.clone(),
                });
            }
        }
    }

    for diagnostic in &report.diagnostics {
        tracing::warn!("Integrity: {}", diagnostic);
    }
    if report.is_clean() {
        tracing::info!(
            "Integrity check passed: {} node(s), {} reference(s)",
            report.nodes_checked,
            report.references_checked
        );
    } else {
        tracing::warn!(
            "Integrity check found {} issue(s) in {} node(s), {} reference(s)",
            report.diagnostics.len(),
            report.nodes_checked,
            report.references_checked
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ids, ExpandedNodeId, Node, NodeAttributes, QualifiedName, Reference};

    fn organizes_type() -> Node {
        Node::new(
            ids::ORGANIZES,
            QualifiedName::new(0, "Organizes"),
            NodeAttributes::reference_type(false, false, None),
        )
    }

    #[test]
    fn test_clean_store() {
        let manager = NodeManager::new();
        manager.add_node(organizes_type()).unwrap();
        let mut root = Node::new(ids::ROOT_FOLDER, QualifiedName::new(0, "Root"), NodeAttributes::object());
        root.add_reference(Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER));
        manager.add_node(root).unwrap();
        manager
            .add_node(Node::new(ids::OBJECTS_FOLDER, QualifiedName::new(0, "Objects"), NodeAttributes::object()))
            .unwrap();

        let report = check_integrity(&manager);

        assert!(report.is_clean());
        assert_eq!(report.nodes_checked, 3);
        assert_eq!(report.references_checked, 1);
    }

    #[test]
    fn test_dangling_and_unknown_type_reported() {
        let manager = NodeManager::new();
        manager.add_node(organizes_type()).unwrap();
        let mut root = Node::new(ids::ROOT_FOLDER, QualifiedName::new(0, "Root"), NodeAttributes::object());
        root.add_references([
            Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER),
            Reference::forward(ids::ROOT_FOLDER, ids::HAS_TYPE_DEFINITION, ids::ROOT_FOLDER),
            Reference::forward(
                ids::ROOT_FOLDER,
                ids::ORGANIZES,
                ExpandedNodeId::new(NodeId::numeric(0, 85), Some("urn:elsewhere".to_string()), 0),
            ),
        ]);
        manager.add_node(root).unwrap();

        let report = check_integrity(&manager);

        assert_eq!(report.references_checked, 3);
        assert_eq!(
            report.diagnostics,
            vec![
                IntegrityDiagnostic::DanglingReference {
                    source_id: ids::ROOT_FOLDER,
                    reference_type_id: ids::ORGANIZES,
                    target_id: ids::OBJECTS_FOLDER,
                },
                IntegrityDiagnostic::UnknownReferenceType {
                    source_id: ids::ROOT_FOLDER,
                    reference_type_id: ids::HAS_TYPE_DEFINITION,
                },
            ]
        );
        assert_eq!(report.dangling_references().count(), 1);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diagnostic = IntegrityDiagnostic::DanglingReference {
            source_id: ids::DATA_TYPES_FOLDER,
            reference_type_id: ids::ORGANIZES,
            target_id: ids::RANGE,
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "danglingReference");
        assert_eq!(json["targetId"], "ns=0;i=884");
        assert_eq!(
            diagnostic.to_string(),
            "dangling reference ns=0;i=90 --ns=0;i=35--> ns=0;i=884"
        );
    }
}
