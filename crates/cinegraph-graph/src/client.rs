//! Neo4j connection management and the neo4rs-backed session.

use async_trait::async_trait;
use chrono::NaiveDate;
use cinegraph_core::{Credentials, Properties, PropertyValue};
use neo4rs::{BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Query};
use tokio::sync::Mutex;

use crate::error::{GraphError, Result};
use crate::session::{Field, GraphSession, NodeRecord, RelationshipRecord, Row, SessionError};
use crate::statement::{ColumnKind, Parameter, Statement};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database; the server default when `None`.
    pub database: Option<String>,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "cinegraph-dev".to_string(),
            database: None,
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

impl From<Credentials> for GraphConfig {
    fn from(creds: Credentials) -> Self {
        Self {
            uri: creds.uri,
            user: creds.username,
            password: creds.password,
            ..Default::default()
        }
    }
}

/// Thread-safe Neo4j client with connection pooling.
///
/// Each [`GraphSession::execute`] call runs in its own auto-commit
/// transaction. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j and verify the server answers queries.
    ///
    /// neo4rs connects lazily, so a `RETURN 1` ping forces the handshake
    /// and surfaces bad endpoints or credentials here.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size);
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;
        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Begin an explicit transaction spanning several statements.
    pub async fn begin(&self) -> Result<Transaction> {
        let txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| GraphError::transaction("begin", e))?;
        Ok(Transaction {
            txn: Mutex::new(txn),
        })
    }
}

#[async_trait]
impl GraphSession for GraphClient {
    async fn execute(&self, statement: &Statement) -> std::result::Result<Vec<Row>, SessionError> {
        let mut stream = self.graph.execute(to_query(statement)).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(decode_row(&row, statement)?);
        }
        Ok(rows)
    }
}

/// An open transaction. Statements run in submission order; nothing is
/// visible to other sessions until [`commit`](Self::commit).
pub struct Transaction {
    txn: Mutex<neo4rs::Txn>,
}

impl Transaction {
    pub async fn commit(self) -> Result<()> {
        self.txn
            .into_inner()
            .commit()
            .await
            .map_err(|e| GraphError::transaction("commit", e))
    }

    pub async fn rollback(self) -> Result<()> {
        self.txn
            .into_inner()
            .rollback()
            .await
            .map_err(|e| GraphError::transaction("rollback", e))
    }
}

#[async_trait]
impl GraphSession for Transaction {
    async fn execute(&self, statement: &Statement) -> std::result::Result<Vec<Row>, SessionError> {
        let mut txn = self.txn.lock().await;
        let mut stream = txn.execute(to_query(statement)).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push(decode_row(&row, statement)?);
        }
        Ok(rows)
    }
}

// ── Encoding ─────────────────────────────────────────────────────

fn to_query(statement: &Statement) -> Query {
    statement
        .parameters()
        .iter()
        .fold(neo4rs::query(statement.text()), |q, (name, param)| {
            let value = match param {
                Parameter::Value(v) => to_bolt(v),
                Parameter::Map(m) => to_bolt_map(m),
            };
            q.param(name, value)
        })
}

fn to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Null => BoltType::Null(BoltNull),
        PropertyValue::Boolean(b) => BoltType::from(*b),
        PropertyValue::Integer(i) => BoltType::from(*i),
        PropertyValue::Float(f) => BoltType::from(*f),
        PropertyValue::String(s) => BoltType::from(s.as_str()),
        PropertyValue::Date(d) => BoltType::from(*d),
        PropertyValue::List(items) => {
            BoltType::from(items.iter().map(to_bolt).collect::<Vec<BoltType>>())
        }
    }
}

fn to_bolt_map(props: &Properties) -> BoltType {
    let mut map = BoltMap::new();
    for (k, v) in props.iter() {
        map.put(BoltString::from(k), to_bolt(v));
    }
    BoltType::Map(map)
}

// ── Decoding ─────────────────────────────────────────────────────

fn decode_row(row: &neo4rs::Row, statement: &Statement) -> std::result::Result<Row, SessionError> {
    let mut out = Row::new();
    for &(column, kind) in statement.columns() {
        let field = match kind {
            ColumnKind::Node => {
                let node: neo4rs::Node = row.get(column).map_err(|e| decode_err(column, e))?;
                Field::Node(decode_node(&node)?)
            }
            ColumnKind::Relationship => {
                let rel: neo4rs::Relation = row.get(column).map_err(|e| decode_err(column, e))?;
                Field::Relationship(decode_relation(&rel)?)
            }
            ColumnKind::Value => {
                let raw: BoltType = row.get(column).map_err(|e| decode_err(column, e))?;
                Field::Value(from_bolt(raw)?)
            }
        };
        out = out.with(column, field);
    }
    Ok(out)
}

fn decode_node(node: &neo4rs::Node) -> std::result::Result<NodeRecord, SessionError> {
    let mut keys: Vec<String> = node.keys().into_iter().map(|k| k.to_string()).collect();
    keys.sort();

    let mut properties = Properties::new();
    for key in keys {
        let raw: BoltType = node.get(&key).map_err(|e| decode_err(&key, e))?;
        properties.insert(key, from_bolt(raw)?);
    }

    Ok(NodeRecord {
        labels: node.labels().into_iter().map(|l| l.to_string()).collect(),
        properties,
    })
}

fn decode_relation(rel: &neo4rs::Relation) -> std::result::Result<RelationshipRecord, SessionError> {
    let mut keys: Vec<String> = rel.keys().into_iter().map(|k| k.to_string()).collect();
    keys.sort();

    let mut properties = Properties::new();
    for key in keys {
        let raw: BoltType = rel.get(&key).map_err(|e| decode_err(&key, e))?;
        properties.insert(key, from_bolt(raw)?);
    }

    Ok(RelationshipRecord {
        rel_type: rel.typ().to_string(),
        properties,
    })
}

fn from_bolt(value: BoltType) -> std::result::Result<PropertyValue, SessionError> {
    Ok(match value {
        BoltType::Null(_) => PropertyValue::Null,
        BoltType::Boolean(b) => PropertyValue::Boolean(b.value),
        BoltType::Integer(i) => PropertyValue::Integer(i.value),
        BoltType::Float(f) => PropertyValue::Float(f.value),
        BoltType::String(s) => PropertyValue::String(s.value),
        BoltType::Date(d) => PropertyValue::Date(
            NaiveDate::try_from(&d).map_err(|e| decode_err("date", e))?,
        ),
        BoltType::List(list) => PropertyValue::List(
            list.value
                .into_iter()
                .map(from_bolt)
                .collect::<std::result::Result<_, _>>()?,
        ),
        other => {
            return Err(SessionError::Decode(format!(
                "unsupported property type: {other:?}"
            )))
        }
    })
}

fn decode_err(key: &str, e: impl std::fmt::Display) -> SessionError {
    SessionError::Decode(format!("'{key}': {e}"))
}
