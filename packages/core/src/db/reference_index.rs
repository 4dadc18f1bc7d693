//! Inverse Reference Index
//!
//! Answers "what points at me" without storing any edge twice. References are
//! only ever recorded on the node that declared them; this index is derived from
//! those records and keyed by the *other* endpoint.
//!
//! # Architecture
//!
//! The index maintains `peer_id → Vec<IndexedEdge>`. For a reference
//! `(S, T, X, is_forward)` recorded on `S` with a local target `X`, the entry at
//! `X` reads "from X's perspective there is a `T` edge to `S` with direction
//! `!is_forward`". This covers both declaration styles:
//!
//! - parent records `(P, Organizes, C, true)` → entry at `C`: inverse edge to `P`
//! - child records `(C, Organizes, P, false)` → entry at `P`: forward edge to `C`
//!
//! so Forward/Inverse browse results are the same whichever node owns the record.
//!
//! # Consistency
//!
//! The index is owned by the node table's lock and updated in the same critical
//! section as the table, so readers never see a node without its index entries
//! (or the reverse). Entries may exist for peers that are not (yet) in the table;
//! that is expected during bulk load and after removals.

use crate::models::{Node, NodeId, Reference};
use std::collections::HashMap;

/// One derived edge, expressed from the perspective of the indexed node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedEdge {
    /// Node that owns the reference record
    pub peer_id: NodeId,

    pub reference_type_id: NodeId,

    /// Direction as seen from the indexed node
    pub is_forward: bool,
}

impl IndexedEdge {
    fn derived_from(reference: &Reference) -> Self {
        Self {
            peer_id: reference.source_id.clone(),
            reference_type_id: reference.reference_type_id.clone(),
            is_forward: !reference.is_forward,
        }
    }

    /// Materialize as a reference recorded on `owner`
    pub fn to_reference(&self, owner: &NodeId) -> Reference {
        Reference::new(
            owner.clone(),
            self.reference_type_id.clone(),
            self.peer_id.clone(),
            self.is_forward,
        )
    }
}

/// Derived multimap of edges keyed by the non-owning endpoint
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    edges: HashMap<NodeId, Vec<IndexedEdge>>,
    len: usize,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: HashMap::with_capacity(capacity),
            len: 0,
        }
    }

    /// Index every local-target reference recorded on `node`
    pub fn insert_node(&mut self, node: &Node) {
        for reference in &node.references {
            if let Some(target) = reference.local_target() {
                self.edges
                    .entry(target.clone())
                    .or_default()
                    .push(IndexedEdge::derived_from(reference));
                self.len += 1;
            }
        }
    }

    /// Remove exactly the entries `insert_node` created for `node`
    pub fn remove_node(&mut self, node: &Node) {
        for reference in &node.references {
            let Some(target) = reference.local_target() else {
                continue;
            };
            let edge = IndexedEdge::derived_from(reference);

            if let Some(entries) = self.edges.get_mut(target) {
                if let Some(position) = entries.iter().position(|e| e == &edge) {
                    entries.remove(position);
                    self.len -= 1;
                }
                if entries.is_empty() {
                    self.edges.remove(target);
                }
            }
        }
    }

    /// Derived edges at `id`, in insertion order
    pub fn edges_at(&self, id: &NodeId) -> &[IndexedEdge] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of derived edges
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct nodes with at least one derived edge
    pub fn peer_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ids, ExpandedNodeId, NodeAttributes, QualifiedName};

    fn node_with(id: NodeId, references: Vec<Reference>) -> Node {
        let mut node = Node::new(id, QualifiedName::new(0, "N"), NodeAttributes::object());
        node.add_references(references);
        node
    }

    #[test]
    fn test_forward_record_indexes_inverse_edge_at_target() {
        let mut index = ReferenceIndex::new();
        let root = node_with(
            ids::ROOT_FOLDER,
            vec![Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER)],
        );
        index.insert_node(&root);

        assert_eq!(
            index.edges_at(&ids::OBJECTS_FOLDER),
            &[IndexedEdge {
                peer_id: ids::ROOT_FOLDER,
                reference_type_id: ids::ORGANIZES,
                is_forward: false,
            }]
        );
        assert!(index.edges_at(&ids::ROOT_FOLDER).is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_inverse_record_indexes_forward_edge_at_parent() {
        let mut index = ReferenceIndex::new();
        let child = node_with(
            ids::OBJECTS_FOLDER,
            vec![Reference::inverse(ids::OBJECTS_FOLDER, ids::ORGANIZES, ids::ROOT_FOLDER)],
        );
        index.insert_node(&child);

        let edges = index.edges_at(&ids::ROOT_FOLDER);
        assert_eq!(edges.len(), 1);
        assert!(edges[0].is_forward);
        assert_eq!(edges[0].peer_id, ids::OBJECTS_FOLDER);
        assert_eq!(
            edges[0].to_reference(&ids::ROOT_FOLDER),
            Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER)
        );
    }

    #[test]
    fn test_remote_targets_are_not_indexed() {
        let mut index = ReferenceIndex::new();
        let remote = ExpandedNodeId::new(NodeId::numeric(0, 85), None, 3);
        let node = node_with(
            ids::ROOT_FOLDER,
            vec![Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, remote)],
        );
        index.insert_node(&node);
        assert!(index.is_empty());

        index.remove_node(&node);
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_node_purges_only_its_own_entries() {
        let mut index = ReferenceIndex::new();
        let root = node_with(
            ids::ROOT_FOLDER,
            vec![
                Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER),
                Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::TYPES_FOLDER),
            ],
        );
        let server = node_with(
            ids::SERVER,
            vec![Reference::inverse(ids::SERVER, ids::ORGANIZES, ids::OBJECTS_FOLDER)],
        );
        index.insert_node(&root);
        index.insert_node(&server);
        assert_eq!(index.len(), 3);
        assert_eq!(index.peer_count(), 2);

        index.remove_node(&root);

        assert_eq!(index.len(), 1);
        assert!(index.edges_at(&ids::TYPES_FOLDER).is_empty());
        let remaining = index.edges_at(&ids::OBJECTS_FOLDER);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].peer_id, ids::SERVER);
    }

    #[test]
    fn test_duplicate_records_are_counted_separately() {
        let mut index = ReferenceIndex::new();
        let reference = Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER);
        let node = node_with(ids::ROOT_FOLDER, vec![reference.clone(), reference]);

        index.insert_node(&node);
        assert_eq!(index.edges_at(&ids::OBJECTS_FOLDER).len(), 2);

        index.remove_node(&node);
        assert!(index.is_empty());
        assert_eq!(index.peer_count(), 0);
    }
}
