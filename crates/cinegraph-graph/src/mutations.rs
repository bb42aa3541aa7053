//! Write operations for the graph.
//!
//! Plain CREATE semantics: writing the same node twice yields two rows.

use cinegraph_core::{Node, Relationship};
use serde::Serialize;

use crate::error::Result;
use crate::locator;
use crate::queries::{NotFound, Outcome};
use crate::session::{run, GraphSession};
use crate::statement;

/// Acknowledgment of a write, with the number of rows the store returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub rows: usize,
}

/// Create one node row.
pub async fn create_node<S>(session: &S, node: &Node) -> Result<Ack>
where
    S: GraphSession + ?Sized,
{
    let rows = run(session, statement::create_node(node)).await?;
    tracing::debug!(labels = %node.type_tag(), "Created node");
    Ok(Ack { rows: rows.len() })
}

/// Create a relationship between the persisted rows of its two endpoints.
///
/// If either endpoint matches no row, nothing is written and the result is
/// [`Outcome::NotFound`]. If a key matches several rows, one edge is created
/// per matched pair and `Ack::rows` reports how many.
pub async fn create_relationship<S>(session: &S, rel: &Relationship<'_>) -> Result<Outcome<Ack>>
where
    S: GraphSession + ?Sized,
{
    let from = locator::locate(rel.from_node())?;
    let to = locator::locate(rel.to_node())?;
    let rows = run(session, statement::create_relationship(&from, &to, rel)).await?;

    if rows.is_empty() {
        tracing::debug!(from = %from, to = %to, rel_type = rel.rel_type(), "Endpoint not found");
        return Ok(Outcome::NotFound(NotFound::new(
            "relationship endpoints",
            [from.to_string(), to.to_string()],
        )));
    }
    if rows.len() > 1 {
        tracing::warn!(
            from = %from,
            to = %to,
            created = rows.len(),
            "Match key is not unique; created several relationships"
        );
    }
    Ok(Outcome::Found(Ack { rows: rows.len() }))
}
