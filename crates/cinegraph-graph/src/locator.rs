//! Re-locating a node's persisted row from its descriptor.
//!
//! Nodes carry no store identity, so a relationship endpoint is matched by
//! its labels plus its key field. The key must be unique among rows with
//! those labels for the match to hit exactly one row.

use std::fmt;

use cinegraph_core::{ident, IdentifierKind, Node, PropertyValue};

use crate::error::{GraphError, Result};

/// Labels plus the single property a node is matched on.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchKey {
    pub labels: Vec<String>,
    pub field: String,
    pub value: PropertyValue,
}

impl MatchKey {
    pub fn type_tag(&self) -> String {
        self.labels.join(":")
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.type_tag(), self.field, self.value)
    }
}

/// Extract the match key of `node`.
///
/// Fails fast on a node without properties rather than emitting a statement
/// with no key.
pub fn locate(node: &Node) -> Result<MatchKey> {
    let (field, value) = node
        .key()
        .ok_or(GraphError::Precondition("endpoint has no properties to match on"))?;
    ident::validate(IdentifierKind::PropertyKey, field)?;

    Ok(MatchKey {
        labels: node.labels().to_vec(),
        field: field.to_string(),
        value: value.clone(),
    })
}
