//! Store Layer
//!
//! This module holds the in-memory address space store:
//!
//! - `NodeManager` - keyed node table, browse and change notifications
//! - `ReferenceIndex` - derived inverse edges for "what points at me" queries
//! - `ReferenceTypeHierarchy` - memoized HasSubtype resolution
//! - `AddressSpaceError` / `StatusCode` - typed failures and their protocol codes
//!
//! # Architecture
//!
//! Nodes are published once, fully built, and never mutated in place. All
//! mutable state lives behind a single `RwLock` inside `NodeManager`, so the
//! node table and the derived index always change together.

mod error;
pub mod events;
mod node_manager;
mod reference_index;
mod reference_types;

pub use error::{AddressSpaceError, StatusCode};
pub use events::AddressSpaceEvent;
pub use node_manager::{
    AddressSpaceStats, Browse, BrowseResult, NodeManager, DEFAULT_EVENT_CHANNEL_CAPACITY,
};
pub use reference_index::{IndexedEdge, ReferenceIndex};
pub use reference_types::{HierarchySource, ReferenceTypeHierarchy};
