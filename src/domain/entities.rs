//! Domain entities: core data structures

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Opaque node identifier as issued by the API.
///
/// Integral ids become `Number`, whether the API sent `5`, `5.0` or `"5"`,
/// so the same node always maps to the same key. Anything else (text,
/// fractional or out of range numbers) is kept verbatim as `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}

struct NodeIdVisitor;

impl Visitor<'_> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a node id (number or string)")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
        Ok(NodeId::Number(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
        Ok(i64::try_from(v)
            .map(NodeId::Number)
            .unwrap_or_else(|_| NodeId::Text(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<NodeId, E> {
        // i64::MAX as f64 rounds up, hence the strict upper bound
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Ok(NodeId::Number(v as i64))
        } else {
            Ok(NodeId::Text(v.to_string()))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
        Ok(NodeId::from(v))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Number(n) => write!(f, "{n}"),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for NodeId {
    type Err = DomainError;

    /// Numeric input becomes `NodeId::Number`, anything else `NodeId::Text`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidNodeId(s.to_string()));
        }
        Ok(trimmed
            .parse::<i64>()
            .map(NodeId::Number)
            .unwrap_or_else(|_| NodeId::Text(trimmed.to_string())))
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Number(n)
    }
}

impl From<&str> for NodeId {
    /// Same normalization as deserialization, without trimming.
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map(NodeId::Number)
            .unwrap_or_else(|_| NodeId::Text(s.to_string()))
    }
}

/// A tree element as returned by the API.
///
/// Fields the client does not interpret are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// `None` marks a root node
    #[serde(default, alias = "parent_id")]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            title: Some(title.into()),
            extra: Map::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Payload for creating a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    /// `None` creates a root node
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An available display language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    /// Language tag, e.g. `en_US`
    pub locale: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Locale {
    /// Human readable name if the API sent one.
    pub fn label(&self) -> Option<&str> {
        self.extra.get("label").and_then(Value::as_str)
    }
}

/// Node id (string form) -> locale tag -> localized title.
///
/// The API sends `null` for titles it has no translation for.
pub type Translations = HashMap<String, HashMap<String, Option<String>>>;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Danger,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient user feedback; a new one replaces the previous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Load state of a node's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildrenState<'a> {
    /// Never fetched
    Unloaded,
    /// Fetched, the node has no children
    Empty,
    Loaded(&'a [Node]),
}

impl<'a> ChildrenState<'a> {
    pub fn from_cached(cached: Option<&'a Vec<Node>>) -> Self {
        match cached {
            None => ChildrenState::Unloaded,
            Some(children) if children.is_empty() => ChildrenState::Empty,
            Some(children) => ChildrenState::Loaded(children.as_slice()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self, ChildrenState::Unloaded)
    }
}
