//! NodeManager - The Address Space Store
//!
//! Authoritative keyed store of `Node` by `NodeId` and the concurrency boundary
//! for the whole address space.
//!
//! # Architecture
//!
//! - **Node table**: `HashMap<NodeId, Arc<Node>>`; published nodes are immutable
//! - **Reference index**: derived inverse edges ([`ReferenceIndex`]) kept next to
//!   the table under the same lock
//! - **Hierarchy resolver**: memoized subtype answers ([`ReferenceTypeHierarchy`])
//! - **Events**: `tokio::sync::broadcast` notifications after each change
//!
//! # Concurrency
//!
//! One `parking_lot::RwLock` guards the table and the index together. `add_node`
//! inserts the fully built node and its index entries in a single write critical
//! section, so readers observe a node with all of its references or not at all.
//! Reads (`get_node`, `browse`, `references`) take the read lock only long
//! enough to clone an `Arc` and the node's derived edges; iteration happens
//! without holding any lock. No operation performs I/O or waits on anything
//! other than this lock.
//!
//! The store is an explicit value: create one per server (or per test) and share
//! it with `Arc<NodeManager>`.
//!
//! # Examples
//!
//! ```rust
//! use uaspace_core::db::NodeManager;
//! use uaspace_core::models::{ids, BrowseDirection, Node, NodeAttributes, QualifiedName, Reference};
//!
//! # fn main() -> Result<(), uaspace_core::db::AddressSpaceError> {
//! let manager = NodeManager::new();
//!
//! let mut root = Node::new(ids::ROOT_FOLDER, QualifiedName::new(0, "Root"), NodeAttributes::object());
//! root.add_reference(Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER));
//! manager.add_node(root)?;
//! manager.add_node(Node::new(ids::OBJECTS_FOLDER, QualifiedName::new(0, "Objects"), NodeAttributes::object()))?;
//!
//! let children: Vec<_> = manager
//!     .browse(&ids::ROOT_FOLDER, &ids::ORGANIZES, false, BrowseDirection::Forward)?
//!     .map(|r| r.target_id)
//!     .collect();
//! assert_eq!(children, vec![ids::OBJECTS_FOLDER.expanded()]);
//!
//! let parents: Vec<_> = manager
//!     .browse(&ids::OBJECTS_FOLDER, &ids::ORGANIZES, false, BrowseDirection::Inverse)?
//!     .map(|r| r.target_id)
//!     .collect();
//! assert_eq!(parents, vec![ids::ROOT_FOLDER.expanded()]);
//! # Ok(())
//! # }
//! ```

use super::error::AddressSpaceError;
use super::events::AddressSpaceEvent;
use super::reference_index::{IndexedEdge, ReferenceIndex};
use super::reference_types::{HierarchySource, ReferenceTypeHierarchy};
use crate::models::{
    ids, BrowseDirection, ExpandedNodeId, Node, NodeClass, NodeId, Reference,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default capacity of the change-notification channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Node table plus derived index; always accessed under one lock
#[derive(Debug, Default)]
struct AddressSpace {
    nodes: HashMap<NodeId, Arc<Node>>,
    index: ReferenceIndex,
}

impl HierarchySource for AddressSpace {
    fn node_class(&self, id: &NodeId) -> Option<NodeClass> {
        self.nodes.get(id).map(|node| node.node_class())
    }

    fn supertypes(&self, id: &NodeId) -> Vec<NodeId> {
        let has_subtype = ids::HAS_SUBTYPE;
        let mut supertypes = Vec::new();

        if let Some(node) = self.nodes.get(id) {
            supertypes.extend(
                node.references_of_type(&has_subtype)
                    .filter(|r| r.is_inverse())
                    .filter_map(|r| r.local_target().cloned()),
            );
        }

        supertypes.extend(
            self.index
                .edges_at(id)
                .iter()
                .filter(|e| !e.is_forward && e.reference_type_id == has_subtype)
                .map(|e| e.peer_id.clone()),
        );

        supertypes
    }
}

/// Whether adding or removing `node` can change subtype answers
fn touches_hierarchy(node: &Node) -> bool {
    node.node_class() == NodeClass::ReferenceType
        || node
            .references
            .iter()
            .any(|r| r.reference_type_id == ids::HAS_SUBTYPE)
}

/// One edge yielded by [`Browse`], relative to the browsed node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResult {
    pub reference_type_id: NodeId,
    pub target_id: ExpandedNodeId,
    pub is_forward: bool,
}

/// Lazy browse over a snapshot of one node's edges
///
/// Yields the node's own records first (declaration order), then edges derived
/// from records on other nodes (insertion order). The same logical edge recorded
/// on both endpoints is yielded once.
#[derive(Debug)]
pub struct Browse {
    source: Arc<Node>,
    own_position: usize,
    derived: std::vec::IntoIter<IndexedEdge>,
    accepted_types: HashSet<NodeId>,
    direction: BrowseDirection,
    seen: HashSet<BrowseResult>,
}

impl Browse {
    /// The browsed node as it was when the browse started
    pub fn source(&self) -> &Arc<Node> {
        &self.source
    }

    fn wants(&self, reference_type_id: &NodeId, is_forward: bool) -> bool {
        self.direction.includes(is_forward) && self.accepted_types.contains(reference_type_id)
    }

    fn admit(&mut self, result: BrowseResult) -> Option<BrowseResult> {
        if self.seen.insert(result.clone()) {
            Some(result)
        } else {
            None
        }
    }
}

impl Iterator for Browse {
    type Item = BrowseResult;

    fn next(&mut self) -> Option<Self::Item> {
        while self.own_position < self.source.references.len() {
            let reference = &self.source.references[self.own_position];
            self.own_position += 1;

            if !self.wants(&reference.reference_type_id, reference.is_forward) {
                continue;
            }
            let result = BrowseResult {
                reference_type_id: reference.reference_type_id.clone(),
                target_id: reference.target_id.clone(),
                is_forward: reference.is_forward,
            };
            if let Some(result) = self.admit(result) {
                return Some(result);
            }
        }

        while let Some(edge) = self.derived.next() {
            if !self.wants(&edge.reference_type_id, edge.is_forward) {
                continue;
            }
            let result = BrowseResult {
                reference_type_id: edge.reference_type_id,
                target_id: edge.peer_id.into(),
                is_forward: edge.is_forward,
            };
            if let Some(result) = self.admit(result) {
                return Some(result);
            }
        }

        None
    }
}

/// Point-in-time counters (for debugging/monitoring)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpaceStats {
    /// Number of published nodes
    pub nodes: usize,
    /// References recorded on published nodes
    pub references: usize,
    /// Derived inverse edges in the index
    pub derived_edges: usize,
    /// Memoized subtype answers
    pub cached_subtype_pairs: usize,
}

/// The address space store
#[derive(Debug)]
pub struct NodeManager {
    space: RwLock<AddressSpace>,
    hierarchy: ReferenceTypeHierarchy,
    events: broadcast::Sender<AddressSpaceEvent>,
}

impl Default for NodeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeManager {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity(0, DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// Create an empty store pre-sized for `node_capacity` nodes
    ///
    /// `event_capacity` is the broadcast buffer per subscriber; slow subscribers
    /// observe `RecvError::Lagged` rather than slowing the store down.
    pub fn with_capacity(node_capacity: usize, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            space: RwLock::new(AddressSpace {
                nodes: HashMap::with_capacity(node_capacity),
                index: ReferenceIndex::with_capacity(node_capacity),
            }),
            hierarchy: ReferenceTypeHierarchy::new(),
            events,
        }
    }

    /// Subscribe to add/remove notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AddressSpaceEvent> {
        self.events.subscribe()
    }

    /// Publish a fully built node
    ///
    /// The node's references must be complete: the node and its derived index
    /// entries become visible in one step. Targets need not exist yet.
    ///
    /// # Errors
    ///
    /// - `DuplicateNodeId` if the id is already present (existing entry untouched)
    /// - `ValidationFailed` if the node fails [`Node::validate`]
    pub fn add_node(&self, node: Node) -> Result<(), AddressSpaceError> {
        node.validate()?;

        let id = node.id.clone();
        let node_class = node.node_class();
        let reference_count = node.references.len();
        let hierarchy_changed = touches_hierarchy(&node);

        {
            let mut space = self.space.write();
            if space.nodes.contains_key(&id) {
                return Err(AddressSpaceError::duplicate(id));
            }
            space.index.insert_node(&node);
            space.nodes.insert(id.clone(), Arc::new(node));

            // Under the write lock so no reader can memoize a stale answer afterwards
            if hierarchy_changed {
                self.hierarchy.invalidate();
            }
        }

        tracing::debug!(
            "Added {} node {} with {} reference(s)",
            node_class,
            id,
            reference_count
        );
        let _ = self
            .events
            .send(AddressSpaceEvent::NodeAdded { id, node_class });

        Ok(())
    }

    /// Get a published node
    pub fn get_node(&self, id: &NodeId) -> Result<Arc<Node>, AddressSpaceError> {
        self.space
            .read()
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| AddressSpaceError::not_found(id.clone()))
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.space.read().nodes.contains_key(id)
    }

    /// Remove a node and purge the index entries derived from its records
    ///
    /// References on other nodes that point at the removed node are left as they
    /// are; browsing from those nodes still yields the (now dangling) id.
    pub fn remove_node(&self, id: &NodeId) -> Result<Arc<Node>, AddressSpaceError> {
        let removed = {
            let mut space = self.space.write();
            let removed = space
                .nodes
                .remove(id)
                .ok_or_else(|| AddressSpaceError::not_found(id.clone()))?;
            space.index.remove_node(&removed);

            if touches_hierarchy(&removed) {
                self.hierarchy.invalidate();
            }
            removed
        };

        tracing::debug!("Removed {} node {}", removed.node_class(), id);
        let _ = self
            .events
            .send(AddressSpaceEvent::NodeRemoved { id: id.clone() });

        Ok(removed)
    }

    /// Browse the edges of `source_id` matching a reference type and direction
    ///
    /// With `include_subtypes`, edges whose type is a transitive HasSubtype
    /// descendant of `reference_type_id` also match; the query type must then be
    /// a ReferenceType node. Without it, only the exact type matches.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `source_id` is absent
    /// - `InvalidReferenceType` if `include_subtypes` and the query type is not a
    ///   ReferenceType node
    pub fn browse(
        &self,
        source_id: &NodeId,
        reference_type_id: &NodeId,
        include_subtypes: bool,
        direction: BrowseDirection,
    ) -> Result<Browse, AddressSpaceError> {
        let space = self.space.read();

        let source = space
            .nodes
            .get(source_id)
            .cloned()
            .ok_or_else(|| AddressSpaceError::not_found(source_id.clone()))?;

        if include_subtypes && space.node_class(reference_type_id) != Some(NodeClass::ReferenceType)
        {
            return Err(AddressSpaceError::invalid_reference_type(
                reference_type_id.clone(),
            ));
        }

        let derived = space.index.edges_at(source_id).to_vec();

        // Decide each distinct edge type once; iteration itself stays lazy
        let mut accepted_types = HashSet::new();
        let mut rejected_types = HashSet::new();
        let edge_types = source
            .references
            .iter()
            .map(|r| &r.reference_type_id)
            .chain(derived.iter().map(|e| &e.reference_type_id));

        for type_id in edge_types {
            if accepted_types.contains(type_id) || rejected_types.contains(type_id) {
                continue;
            }
            let matches = type_id == reference_type_id
                || (include_subtypes
                    && space.node_class(type_id) == Some(NodeClass::ReferenceType)
                    && matches!(
                        self.hierarchy
                            .is_subtype_or_equal(&*space, type_id, reference_type_id),
                        Ok(true)
                    ));
            if matches {
                accepted_types.insert(type_id.clone());
            } else {
                rejected_types.insert(type_id.clone());
            }
        }
        drop(space);

        tracing::trace!(
            "Browse {} type {} (subtypes: {}) {:?}: {} candidate edge(s)",
            source_id,
            reference_type_id,
            include_subtypes,
            direction,
            source.references.len() + derived.len()
        );

        Ok(Browse {
            source,
            own_position: 0,
            derived: derived.into_iter(),
            accepted_types,
            direction,
            seen: HashSet::new(),
        })
    }

    /// Every reference touching `id`, expressed from `id`'s perspective
    ///
    /// Own records come first, followed by edges derived from records on other
    /// nodes; an edge recorded on both endpoints appears once.
    pub fn references(&self, id: &NodeId) -> Result<Vec<Reference>, AddressSpaceError> {
        let space = self.space.read();
        let node = space
            .nodes
            .get(id)
            .ok_or_else(|| AddressSpaceError::not_found(id.clone()))?;

        let mut seen = HashSet::new();
        let references = node
            .references
            .iter()
            .cloned()
            .chain(space.index.edges_at(id).iter().map(|e| e.to_reference(id)))
            .filter(|r| seen.insert(r.clone()))
            .collect();

        Ok(references)
    }

    /// Subtype-aware reference type check, see [`ReferenceTypeHierarchy`]
    pub fn is_subtype_or_equal(
        &self,
        candidate: &NodeId,
        query: &NodeId,
    ) -> Result<bool, AddressSpaceError> {
        let space = self.space.read();
        self.hierarchy.is_subtype_or_equal(&*space, candidate, query)
    }

    pub fn len(&self) -> usize {
        self.space.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.space.read().nodes.is_empty()
    }

    /// Snapshot of all node ids (unordered)
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.space.read().nodes.keys().cloned().collect()
    }

    /// Snapshot of all published nodes (unordered)
    pub fn nodes(&self) -> Vec<Arc<Node>> {
        self.space.read().nodes.values().cloned().collect()
    }

    pub fn stats(&self) -> AddressSpaceStats {
        let space = self.space.read();
        AddressSpaceStats {
            nodes: space.nodes.len(),
            references: space.nodes.values().map(|n| n.references.len()).sum(),
            derived_edges: space.index.len(),
            cached_subtype_pairs: self.hierarchy.cached_pairs(),
        }
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "node_manager_test.rs"]
mod node_manager_test;
