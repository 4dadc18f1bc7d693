//! Capability Gate
//!
//! Pure predicate consulted by the bulk loader to decide whether optional
//! nodes are constructed at all. A node that is gated out is never added; the
//! references other nodes record towards it stay behind as dangling edges and
//! are reported by the integrity pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional data type encodings a server may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "Default Binary")]
    Binary,
    #[serde(rename = "Default XML")]
    Xml,
    #[serde(rename = "Default JSON")]
    Json,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Binary, Encoding::Xml, Encoding::Json];

    /// Browse name of the DataTypeEncoding object for this encoding
    pub fn browse_name(self) -> &'static str {
        match self {
            Encoding::Binary => "Default Binary",
            Encoding::Xml => "Default XML",
            Encoding::Json => "Default JSON",
        }
    }

    pub fn from_browse_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.browse_name() == name)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.browse_name())
    }
}

/// Capability predicate
///
/// Recognized names are `"Default Binary"`, `"Default XML"` and
/// `"Default JSON"`; anything else is not granted.
pub trait CapabilityGate: Send + Sync {
    fn has_encoding(&self, name: &str) -> bool;

    fn grants(&self, encoding: Encoding) -> bool {
        self.has_encoding(encoding.browse_name())
    }
}

impl<F> CapabilityGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has_encoding(&self, name: &str) -> bool {
        self(name)
    }
}

/// Static set of supported encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingCapabilities {
    pub binary: bool,
    pub xml: bool,
    pub json: bool,
}

impl Default for EncodingCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl EncodingCapabilities {
    pub fn all() -> Self {
        Self {
            binary: true,
            xml: true,
            json: true,
        }
    }

    pub fn none() -> Self {
        Self {
            binary: false,
            xml: false,
            json: false,
        }
    }

    pub fn supports(&self, encoding: Encoding) -> bool {
        match encoding {
            Encoding::Binary => self.binary,
            Encoding::Xml => self.xml,
            Encoding::Json => self.json,
        }
    }
}

impl CapabilityGate for EncodingCapabilities {
    fn has_encoding(&self, name: &str) -> bool {
        Encoding::from_browse_name(name).is_some_and(|e| self.supports(e))
    }
}
