//! Identity Types
//!
//! Immutable value types that name things in the address space:
//!
//! - [`NodeId`] - namespace index plus a numeric, string, GUID or opaque identifier
//! - [`ExpandedNodeId`] - a `NodeId` that may point at another server or namespace URI
//! - [`QualifiedName`] - namespace-scoped browse name
//! - [`LocalizedText`] - display text with an optional locale
//!
//! # Textual Form
//!
//! All identity types round-trip through their `Display`/`FromStr` forms, which is
//! also how they are serialized:
//!
//! ```rust
//! use uaspace_core::models::{ExpandedNodeId, NodeId, QualifiedName};
//!
//! let root: NodeId = "ns=0;i=84".parse().unwrap();
//! assert_eq!(root, NodeId::numeric(0, 84));
//!
//! // The namespace prefix is optional and defaults to 0
//! let objects: NodeId = "i=85".parse().unwrap();
//! assert_eq!(objects.to_string(), "ns=0;i=85");
//!
//! let remote: ExpandedNodeId = "svr=1;nsu=urn:plant;s=Boiler".parse().unwrap();
//! assert!(!remote.is_local());
//!
//! let name: QualifiedName = "2:Temperature".parse().unwrap();
//! assert_eq!(name.namespace, 2);
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced while parsing the textual form of an identity type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeIdParseError {
    #[error("Missing ';' after namespace prefix in '{0}'")]
    MissingSeparator(String),

    #[error("Invalid namespace index in '{0}'")]
    InvalidNamespace(String),

    #[error("Invalid server index in '{0}'")]
    InvalidServerIndex(String),

    #[error("Unknown identifier type in '{0}'")]
    UnknownIdentifierType(String),

    #[error("Invalid {kind} identifier '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },
}

impl NodeIdParseError {
    fn invalid_identifier(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.into(),
        }
    }
}

/// The identifier part of a [`NodeId`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Uuid),
    Opaque(Vec<u8>),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={}", v),
            Identifier::String(v) => write!(f, "s={}", v),
            Identifier::Guid(v) => write!(f, "g={}", v),
            Identifier::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

impl FromStr for Identifier {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = match (s.get(..2), s.get(2..)) {
            (Some(kind), Some(value)) => (kind, value),
            _ => return Err(NodeIdParseError::UnknownIdentifierType(s.to_string())),
        };

        match kind {
            "i=" => value
                .parse::<u32>()
                .map(Identifier::Numeric)
                .map_err(|_| NodeIdParseError::invalid_identifier("numeric", value)),
            "s=" => Ok(Identifier::String(value.to_string())),
            "g=" => Uuid::parse_str(value)
                .map(Identifier::Guid)
                .map_err(|_| NodeIdParseError::invalid_identifier("guid", value)),
            "b=" => BASE64
                .decode(value)
                .map(Identifier::Opaque)
                .map_err(|_| NodeIdParseError::invalid_identifier("opaque", value)),
            _ => Err(NodeIdParseError::UnknownIdentifierType(s.to_string())),
        }
    }
}

/// Unique identifier of a node within a server
///
/// Two `NodeId`s are equal when both the namespace index and the identifier match.
/// The standard namespace (index 0) uses numeric identifiers exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Index into the server's namespace table
    pub namespace: u16,

    /// Identifier within the namespace
    pub identifier: Identifier,
}

impl NodeId {
    /// Create a numeric NodeId
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Create a string NodeId
    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    /// Create a GUID NodeId
    pub fn guid(namespace: u16, value: Uuid) -> Self {
        Self {
            namespace,
            identifier: Identifier::Guid(value),
        }
    }

    /// Create an opaque (ByteString) NodeId
    pub fn opaque(namespace: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace,
            identifier: Identifier::Opaque(value.into()),
        }
    }

    /// The null NodeId (`ns=0;i=0`)
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    pub fn is_null(&self) -> bool {
        self.namespace == 0
            && match &self.identifier {
                Identifier::Numeric(v) => *v == 0,
                Identifier::String(v) => v.is_empty(),
                Identifier::Guid(v) => v.is_nil(),
                Identifier::Opaque(v) => v.is_empty(),
            }
    }

    /// Numeric identifier value, if this is a numeric NodeId
    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Local ExpandedNodeId pointing at this node
    pub fn expanded(&self) -> ExpandedNodeId {
        ExpandedNodeId::from(self.clone())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns={};{}", self.namespace, self.identifier)
    }
}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns, identifier) = rest
                    .split_once(';')
                    .ok_or_else(|| NodeIdParseError::MissingSeparator(s.to_string()))?;
                let namespace = ns
                    .parse::<u16>()
                    .map_err(|_| NodeIdParseError::InvalidNamespace(s.to_string()))?;
                Ok(Self {
                    namespace,
                    identifier: identifier.parse()?,
                })
            }
            None => Ok(Self {
                namespace: 0,
                identifier: s.parse()?,
            }),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A NodeId that may live outside this server
///
/// References always carry an `ExpandedNodeId` target for protocol fidelity. A
/// target is local when it has no namespace URI and server index 0; only local
/// targets participate in inverse indexing and integrity checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    pub namespace_uri: Option<String>,
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// Create an ExpandedNodeId
    ///
    /// A namespace URI replaces the namespace index, which is then stored as 0.
    pub fn new(mut node_id: NodeId, namespace_uri: Option<String>, server_index: u32) -> Self {
        if namespace_uri.is_some() {
            node_id.namespace = 0;
        }
        Self {
            node_id,
            namespace_uri,
            server_index,
        }
    }

    pub fn is_local(&self) -> bool {
        self.server_index == 0 && self.namespace_uri.is_none()
    }

    /// The local NodeId, or `None` when this points outside the server
    pub fn local(&self) -> Option<&NodeId> {
        if self.is_local() {
            Some(&self.node_id)
        } else {
            None
        }
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self {
            node_id,
            namespace_uri: None,
            server_index: 0,
        }
    }
}

impl PartialEq<NodeId> for ExpandedNodeId {
    fn eq(&self, other: &NodeId) -> bool {
        self.local() == Some(other)
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        match &self.namespace_uri {
            Some(uri) => write!(f, "nsu={};{}", uri, self.node_id.identifier),
            None => write!(f, "{}", self.node_id),
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s;
        let mut server_index = 0;

        if let Some(after) = rest.strip_prefix("svr=") {
            let (svr, tail) = after
                .split_once(';')
                .ok_or_else(|| NodeIdParseError::MissingSeparator(s.to_string()))?;
            server_index = svr
                .parse::<u32>()
                .map_err(|_| NodeIdParseError::InvalidServerIndex(s.to_string()))?;
            rest = tail;
        }

        if let Some(after) = rest.strip_prefix("nsu=") {
            // Identifier follows the last ';' so URIs containing ';' still parse
            let (uri, identifier) = after
                .rsplit_once(';')
                .ok_or_else(|| NodeIdParseError::MissingSeparator(s.to_string()))?;
            return Ok(Self {
                node_id: NodeId {
                    namespace: 0,
                    identifier: identifier.parse()?,
                },
                namespace_uri: Some(uri.to_string()),
                server_index,
            });
        }

        Ok(Self {
            node_id: rest.parse()?,
            namespace_uri: None,
            server_index,
        })
    }
}

impl Serialize for ExpandedNodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpandedNodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Namespace-scoped name used for browse names and relative paths
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: u16, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = NodeIdParseError;

    /// Parses `<ns>:<name>`; a string without a numeric prefix is a name in namespace 0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((ns, name)) = s.split_once(':') {
            if !ns.is_empty() && ns.bytes().all(|b| b.is_ascii_digit()) {
                let namespace = ns
                    .parse::<u16>()
                    .map_err(|_| NodeIdParseError::InvalidNamespace(s.to_string()))?;
                return Ok(Self::new(namespace, name));
            }
        }
        Ok(Self::new(0, s))
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Human-readable text with an optional locale
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }

    /// Text in the "en" locale
    pub fn english(text: impl Into<String>) -> Self {
        Self::new("en", text)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_with_and_without_namespace() {
        assert_eq!("ns=0;i=84".parse::<NodeId>().unwrap(), NodeId::numeric(0, 84));
        assert_eq!("i=2253".parse::<NodeId>().unwrap(), NodeId::numeric(0, 2253));
        assert_eq!(
            "ns=3;i=15606".parse::<NodeId>().unwrap(),
            NodeId::numeric(3, 15606)
        );
    }

    #[test]
    fn test_parse_string_guid_and_opaque() {
        assert_eq!(
            "ns=2;s=Boiler.Temperature".parse::<NodeId>().unwrap(),
            NodeId::string(2, "Boiler.Temperature")
        );

        let guid = Uuid::new_v4();
        let parsed: NodeId = format!("ns=1;g={}", guid).parse().unwrap();
        assert_eq!(parsed, NodeId::guid(1, guid));

        let opaque = NodeId::opaque(4, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(opaque.to_string(), "ns=4;b=3q2+7w==");
        assert_eq!(opaque.to_string().parse::<NodeId>().unwrap(), opaque);
    }

    #[test]
    fn test_string_identifier_may_contain_semicolons() {
        let id: NodeId = "ns=2;s=a;b;c".parse().unwrap();
        assert_eq!(id, NodeId::string(2, "a;b;c"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "ns=0i=84".parse::<NodeId>(),
            Err(NodeIdParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "ns=x;i=84".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidNamespace(_))
        ));
        assert!(matches!(
            "ns=70000;i=1".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidNamespace(_))
        ));
        assert!(matches!(
            "i=abc".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidIdentifier { kind: "numeric", .. })
        ));
        assert!(matches!(
            "x=1".parse::<NodeId>(),
            Err(NodeIdParseError::UnknownIdentifierType(_))
        ));
        assert!("".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_null_node_id() {
        assert!(NodeId::null().is_null());
        assert!(NodeId::string(0, "").is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
        assert!(!NodeId::numeric(0, 84).is_null());
    }

    #[test]
    fn test_expanded_node_id_locality() {
        let local = NodeId::numeric(0, 85).expanded();
        assert!(local.is_local());
        assert_eq!(local.local(), Some(&NodeId::numeric(0, 85)));
        assert_eq!(local, NodeId::numeric(0, 85));
        assert_eq!(local.to_string(), "ns=0;i=85");

        let remote: ExpandedNodeId = "svr=2;nsu=urn:vendor:plant;i=7".parse().unwrap();
        assert!(!remote.is_local());
        assert_eq!(remote.local(), None);
        assert_eq!(remote.server_index, 2);
        assert_eq!(remote.namespace_uri.as_deref(), Some("urn:vendor:plant"));
        assert_eq!(remote.to_string(), "svr=2;nsu=urn:vendor:plant;i=7");
    }

    #[test]
    fn test_namespace_uri_replaces_namespace_index() {
        let remote = ExpandedNodeId::new(NodeId::numeric(2, 7), Some("urn:x".to_string()), 0);
        assert_eq!(remote.node_id, NodeId::numeric(0, 7));
        assert_eq!(remote.to_string(), "nsu=urn:x;i=7");

        let json = serde_json::to_string(&remote).unwrap();
        let back: ExpandedNodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, remote);
    }

    #[test]
    fn test_qualified_name_parsing() {
        assert_eq!(
            "Root".parse::<QualifiedName>().unwrap(),
            QualifiedName::new(0, "Root")
        );
        assert_eq!(
            "2:Temperature".parse::<QualifiedName>().unwrap(),
            QualifiedName::new(2, "Temperature")
        );
        // A non-numeric prefix is part of the name
        assert_eq!(
            "urn:thing".parse::<QualifiedName>().unwrap(),
            QualifiedName::new(0, "urn:thing")
        );
        assert_eq!(QualifiedName::new(0, "Default XML").to_string(), "0:Default XML");
    }

    #[test]
    fn test_identity_serialization_uses_text_form() {
        let json = serde_json::to_value(NodeId::numeric(0, 84)).unwrap();
        assert_eq!(json, serde_json::json!("ns=0;i=84"));

        let back: NodeId = serde_json::from_value(serde_json::json!("i=84")).unwrap();
        assert_eq!(back, NodeId::numeric(0, 84));

        let bad: Result<NodeId, _> = serde_json::from_value(serde_json::json!("nonsense"));
        assert!(bad.is_err());

        let text = LocalizedText::english("Objects");
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["locale"], "en");
        assert_eq!(json["text"], "Objects");
    }
}
