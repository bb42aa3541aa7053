//! The session collaborator contract and the rows it returns.
//!
//! Every executor function takes a [`GraphSession`] explicitly. The
//! neo4rs-backed [`GraphClient`](crate::GraphClient) and
//! [`Transaction`](crate::Transaction) implement it; tests substitute an
//! in-memory store.

use async_trait::async_trait;
use cinegraph_core::{Properties, PropertyValue};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{GraphError, Result};
use crate::statement::Statement;

/// Failure reported by a session. Never used for "zero rows".
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Neo4j driver error: {0}")]
    Driver(#[from] neo4rs::Error),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("statement rejected: {0}")]
    Rejected(String),
}

/// Executes one statement atomically and returns every row it produced.
#[async_trait]
pub trait GraphSession: Send + Sync {
    async fn execute(&self, statement: &Statement) -> std::result::Result<Vec<Row>, SessionError>;
}

// ── Records ──────────────────────────────────────────────────────

/// A node as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub labels: Vec<String>,
    pub properties: Properties,
}

/// A relationship as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipRecord {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: Properties,
}

/// One returned column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Node(NodeRecord),
    Relationship(RelationshipRecord),
    Value(PropertyValue),
}

/// A returned row: column name to value, in RETURN order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Field)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, field: Field) -> Self {
        self.columns.push((column.into(), field));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Field> {
        self.columns
            .iter()
            .find_map(|(c, f)| (c == column).then_some(f))
    }

    pub fn node(&self, column: &str) -> Option<&NodeRecord> {
        match self.get(column) {
            Some(Field::Node(n)) => Some(n),
            _ => None,
        }
    }

    pub fn relationship(&self, column: &str) -> Option<&RelationshipRecord> {
        match self.get(column) {
            Some(Field::Relationship(r)) => Some(r),
            _ => None,
        }
    }

    pub fn value(&self, column: &str) -> Option<&PropertyValue> {
        match self.get(column) {
            Some(Field::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Take a node column out of the row.
    pub(crate) fn take_node(&mut self, column: &str) -> Result<NodeRecord> {
        match self.take(column) {
            Some(Field::Node(n)) => Ok(n),
            _ => Err(GraphError::ResultShape(format!(
                "expected node in column '{column}'"
            ))),
        }
    }

    pub(crate) fn take_relationship(&mut self, column: &str) -> Result<RelationshipRecord> {
        match self.take(column) {
            Some(Field::Relationship(r)) => Ok(r),
            _ => Err(GraphError::ResultShape(format!(
                "expected relationship in column '{column}'"
            ))),
        }
    }

    fn take(&mut self, column: &str) -> Option<Field> {
        let idx = self.columns.iter().position(|(c, _)| c == column)?;
        Some(self.columns.remove(idx).1)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (c, f) in &self.columns {
            map.serialize_entry(c, f)?;
        }
        map.end()
    }
}

/// Run a statement, logging it and attaching it to any store failure.
pub(crate) async fn run<S>(session: &S, statement: Statement) -> Result<Vec<Row>>
where
    S: GraphSession + ?Sized,
{
    tracing::debug!(kind = %statement.kind(), statement = %statement.text(), "Executing statement");
    match session.execute(&statement).await {
        Ok(rows) => {
            tracing::debug!(kind = %statement.kind(), rows = rows.len(), "Statement complete");
            Ok(rows)
        }
        Err(source) => {
            let (statement, parameters) = statement.into_parts();
            Err(GraphError::Store {
                statement,
                parameters,
                source,
            })
        }
    }
}
