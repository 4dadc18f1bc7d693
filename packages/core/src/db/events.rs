//! Address Space Events
//!
//! This module defines the change notifications emitted by `NodeManager` when
//! nodes are added or removed. Consumers (model-change events, subscription
//! bookkeeping, caches) subscribe without coupling to the store internals.
//!
//! # Architecture
//!
//! Events are emitted using tokio's broadcast channel, allowing multiple
//! subscribers to receive notifications asynchronously. Sending never blocks the
//! store; events are sent after the write lock has been released, so a
//! subscriber that reacts by reading the store sees the change.

use crate::models::{NodeClass, NodeId};
use serde::{Deserialize, Serialize};

/// Change notifications emitted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AddressSpaceEvent {
    /// A node (with all its references) was published
    #[serde(rename = "nodeAdded")]
    NodeAdded {
        id: NodeId,
        #[serde(rename = "nodeClass")]
        node_class: NodeClass,
    },

    /// A node was removed together with its derived index entries
    #[serde(rename = "nodeRemoved")]
    NodeRemoved { id: NodeId },
}

impl AddressSpaceEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            AddressSpaceEvent::NodeAdded { .. } => "node:added",
            AddressSpaceEvent::NodeRemoved { .. } => "node:removed",
        }
    }

    pub fn node_id(&self) -> &NodeId {
        match self {
            AddressSpaceEvent::NodeAdded { id, .. } | AddressSpaceEvent::NodeRemoved { id } => id,
        }
    }
}
