//! ReferenceType Hierarchy Resolver
//!
//! Answers `is_subtype_or_equal(candidate, query)` for subtype-aware browsing.
//!
//! The hierarchy is not stored separately: it is read from the ReferenceType
//! nodes' own HasSubtype edges through a [`HierarchySource`]. The usual
//! convention is that the subtype records `(subtype, HasSubtype, supertype,
//! false)`; a supertype recording the forward edge works the same because the
//! source exposes normalized edges.
//!
//! Results are memoized per `(candidate, query)` pair. The hierarchy is static
//! after bootstrap; the store calls [`ReferenceTypeHierarchy::invalidate`] when
//! a ReferenceType node or a HasSubtype edge is added or removed.

use super::error::AddressSpaceError;
use crate::models::{NodeClass, NodeId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Read access to the node table needed to walk the hierarchy
pub trait HierarchySource {
    /// Node class of `id`, `None` if the node is absent
    fn node_class(&self, id: &NodeId) -> Option<NodeClass>;

    /// Direct supertypes of `id` (targets of inverse HasSubtype edges)
    fn supertypes(&self, id: &NodeId) -> Vec<NodeId>;
}

/// Memoizing subtype resolver
#[derive(Debug, Default)]
pub struct ReferenceTypeHierarchy {
    memo: Mutex<HashMap<(NodeId, NodeId), bool>>,
}

impl ReferenceTypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `candidate` equals `query` or transitively subtypes it
    ///
    /// # Errors
    ///
    /// `InvalidReferenceType` if either id is not a ReferenceType node in `source`.
    pub fn is_subtype_or_equal<S: HierarchySource + ?Sized>(
        &self,
        source: &S,
        candidate: &NodeId,
        query: &NodeId,
    ) -> Result<bool, AddressSpaceError> {
        for id in [candidate, query] {
            if source.node_class(id) != Some(NodeClass::ReferenceType) {
                return Err(AddressSpaceError::invalid_reference_type(id.clone()));
            }
        }

        if candidate == query {
            return Ok(true);
        }

        let key = (candidate.clone(), query.clone());
        if let Some(&cached) = self.memo.lock().get(&key) {
            return Ok(cached);
        }

        let result = Self::walk_up(source, candidate, query);
        self.memo.lock().insert(key, result);
        Ok(result)
    }

    /// Depth-first walk over declared supertypes; tolerates cycles
    fn walk_up<S: HierarchySource + ?Sized>(source: &S, candidate: &NodeId, query: &NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![candidate.clone()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for supertype in source.supertypes(&current) {
                if &supertype == query {
                    return true;
                }
                stack.push(supertype);
            }
        }

        false
    }

    /// Drop all memoized answers
    pub fn invalidate(&self) {
        self.memo.lock().clear();
    }

    /// Number of memoized pairs
    pub fn cached_pairs(&self) -> usize {
        self.memo.lock().len()
    }
}
