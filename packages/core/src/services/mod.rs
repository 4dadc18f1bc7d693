//! Store Services
//!
//! This module contains the collaborators that populate and check a store:
//!
//! - `CapabilityGate` - predicate deciding whether optional nodes are built
//! - `NodeTable` / `bulk_load` - declarative node tables and the generic loader
//! - `bootstrap` - store construction from `AddressSpaceConfig`
//! - `check_integrity` - post-load referential integrity diagnostics
//!
//! Services only use the public `NodeManager` API; they hold no state of their own.

pub mod bootstrap;
pub mod capabilities;
pub mod error;
pub mod integrity;

pub use bootstrap::{
    bootstrap, bootstrap_with, bulk_load, LoadSummary, NodeDeclaration, NodeTable,
    ReferenceDeclaration,
};
pub use capabilities::{CapabilityGate, Encoding, EncodingCapabilities};
pub use error::BootstrapError;
pub use integrity::{check_integrity, IntegrityDiagnostic, IntegrityReport};
