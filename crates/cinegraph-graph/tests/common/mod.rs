//! In-memory stand-in for a graph store.
//!
//! Interprets each statement by its kind and bound parameters, with the
//! same matching semantics the store applies: a node matches a label set
//! when it carries every label, and a CREATE after MATCH runs once per
//! matched pair. Returned property keys are sorted.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use cinegraph_core::{Properties, PropertyValue};
use cinegraph_graph::statement::schema;
use cinegraph_graph::{
    Field, GraphSession, MatchKey, NodeRecord, RelationshipRecord, Row, SessionError, Statement,
    StatementKind,
};

struct StoredRel {
    from: usize,
    to: usize,
    record: RelationshipRecord,
}

#[derive(Default)]
struct State {
    nodes: Vec<NodeRecord>,
    rels: Vec<StoredRel>,
    executed: Vec<Statement>,
}

#[derive(Default)]
pub struct MemorySession {
    state: Mutex<State>,
    fail_with: Option<String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose store rejects every statement.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Every statement submitted so far, in order.
    pub fn executed(&self) -> Vec<Statement> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn nodes_with_label(&self, label: &str) -> Vec<NodeRecord> {
        self.state
            .lock()
            .unwrap()
            .nodes
            .iter()
            .filter(|n| n.labels.iter().any(|l| l == label))
            .cloned()
            .collect()
    }

    pub fn relationships(&self) -> Vec<RelationshipRecord> {
        self.state
            .lock()
            .unwrap()
            .rels
            .iter()
            .map(|r| r.record.clone())
            .collect()
    }
}

/// Keys come back sorted, as they do from the neo4rs decoder.
fn sorted(props: Option<&Properties>) -> Properties {
    let mut entries: Vec<(String, PropertyValue)> =
        props.cloned().unwrap_or_default().into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}

fn has_labels(node: &NodeRecord, labels: &[String]) -> bool {
    labels.iter().all(|l| node.labels.contains(l))
}

fn matching(nodes: &[NodeRecord], key: &MatchKey, value: Option<&PropertyValue>) -> Vec<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| has_labels(n, &key.labels) && n.properties.get(&key.field) == value)
        .map(|(i, _)| i)
        .collect()
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn execute(&self, statement: &Statement) -> Result<Vec<Row>, SessionError> {
        let mut state = self.state.lock().unwrap();
        state.executed.push(statement.clone());
        if let Some(message) = &self.fail_with {
            return Err(SessionError::Rejected(message.clone()));
        }

        let params = statement.parameters();
        let rows = match statement.kind() {
            StatementKind::CreateNode { labels } => {
                let record = NodeRecord {
                    labels: labels.clone(),
                    properties: sorted(params.map("properties")),
                };
                state.nodes.push(record.clone());
                vec![Row::new().with("n", Field::Node(record))]
            }
            StatementKind::CreateRelationship { from, to, rel_type } => {
                let properties = sorted(params.map("relProperties"));
                let froms = matching(&state.nodes, from, params.value("valA"));
                let tos = matching(&state.nodes, to, params.value("valB"));

                let mut rows = Vec::new();
                for &a in &froms {
                    for &b in &tos {
                        state.rels.push(StoredRel {
                            from: a,
                            to: b,
                            record: RelationshipRecord {
                                rel_type: rel_type.clone(),
                                properties: properties.clone(),
                            },
                        });
                        rows.push(
                            Row::new().with("type(r)", Field::Value(rel_type.as_str().into())),
                        );
                    }
                }
                rows
            }
            StatementKind::FindByField { label, field } => {
                let value = params.value("value");
                state
                    .nodes
                    .iter()
                    .filter(|n| n.labels.contains(label) && n.properties.get(field) == value)
                    .map(|n| Row::new().with("x", Field::Node(n.clone())))
                    .collect()
            }
            StatementKind::FindRating => {
                let user_id = params.value("userId");
                let movie_id = params.value("movieId");
                state
                    .rels
                    .iter()
                    .filter(|r| r.record.rel_type == schema::RATED)
                    .filter_map(|r| {
                        let (u, m) = (&state.nodes[r.from], &state.nodes[r.to]);
                        let hit = u.labels.iter().any(|l| l == schema::USER)
                            && m.labels.iter().any(|l| l == schema::MOVIE)
                            && u.properties.get(schema::USER_ID) == user_id
                            && m.properties.get(schema::MOVIE_ID) == movie_id;
                        hit.then(|| {
                            Row::new()
                                .with("u", Field::Node(u.clone()))
                                .with("r", Field::Relationship(r.record.clone()))
                                .with("m", Field::Node(m.clone()))
                        })
                    })
                    .collect()
            }
        };
        Ok(rows)
    }
}
