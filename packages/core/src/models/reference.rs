//! References between nodes

use super::node_id::{ExpandedNodeId, NodeId};
use serde::{Deserialize, Serialize};

/// A typed, directed edge recorded on its source node
///
/// `is_forward = false` records the edge from the child's perspective, e.g. a
/// ReferenceType node declaring `(subtype, HasSubtype, supertype, false)`. The
/// store normalizes both forms so browse results do not depend on which side
/// owns the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub source_id: NodeId,
    pub reference_type_id: NodeId,
    pub target_id: ExpandedNodeId,
    pub is_forward: bool,
}

impl Reference {
    pub fn new(
        source_id: NodeId,
        reference_type_id: NodeId,
        target_id: impl Into<ExpandedNodeId>,
        is_forward: bool,
    ) -> Self {
        Self {
            source_id,
            reference_type_id,
            target_id: target_id.into(),
            is_forward,
        }
    }

    /// Forward reference `source --type--> target`
    pub fn forward(
        source_id: NodeId,
        reference_type_id: NodeId,
        target_id: impl Into<ExpandedNodeId>,
    ) -> Self {
        Self::new(source_id, reference_type_id, target_id, true)
    }

    /// Inverse reference: `target --type--> source` recorded on `source`
    pub fn inverse(
        source_id: NodeId,
        reference_type_id: NodeId,
        target_id: impl Into<ExpandedNodeId>,
    ) -> Self {
        Self::new(source_id, reference_type_id, target_id, false)
    }

    pub fn is_inverse(&self) -> bool {
        !self.is_forward
    }

    /// Local target id, `None` for references leaving this server
    pub fn local_target(&self) -> Option<&NodeId> {
        self.target_id.local()
    }

    /// The same edge as seen from the target node
    ///
    /// Returns `None` when the target is not local.
    pub fn invert(&self) -> Option<Reference> {
        let target = self.local_target()?;
        Some(Reference {
            source_id: target.clone(),
            reference_type_id: self.reference_type_id.clone(),
            target_id: self.source_id.expanded(),
            is_forward: !self.is_forward,
        })
    }
}

/// Which edges a browse follows, relative to the browsed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrowseDirection {
    Forward,
    Inverse,
    Both,
}

impl BrowseDirection {
    pub fn includes(self, is_forward: bool) -> bool {
        match self {
            BrowseDirection::Forward => is_forward,
            BrowseDirection::Inverse => !is_forward,
            BrowseDirection::Both => true,
        }
    }
}
