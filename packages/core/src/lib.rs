//! UaSpace Core - OPC-UA Address Space Store
//!
//! This crate provides the in-memory address space of an OPC-UA server: the
//! keyed node table, inverse reference resolution, subtype-aware browsing and
//! the declarative bootstrap of the standard namespace.
//!
//! # Architecture
//!
//! - **Immutable nodes**: a `Node` is fully built, then published once as `Arc<Node>`
//! - **Single source of edges**: references live on the node that recorded them;
//!   inverse lookups come from a derived index kept under the same lock
//! - **Explicit store**: `NodeManager` is a plain value shared by `Arc`, never a global
//! - **Data-driven bootstrap**: optional nodes are table rows gated by capabilities
//!
//! # Modules
//!
//! - [`models`] - Identity types, references, nodes and well-known ids
//! - [`db`] - The store (`NodeManager`), reference index and hierarchy resolver
//! - [`services`] - Capability gate, bulk loader and integrity pass
//! - [`config`] - `AddressSpaceConfig`

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::AddressSpaceConfig;
pub use db::{AddressSpaceError, BrowseResult, NodeManager};
pub use models::*;
pub use services::{bootstrap, BootstrapError, CapabilityGate, NodeTable};
