//! Error types for the cinegraph-graph crate.

use cinegraph_core::ValidationError;
use thiserror::Error;

use crate::session::SessionError;
use crate::statement::Parameters;

/// Errors from building or executing graph statements.
///
/// A query that runs but matches nothing is not an error; see
/// [`Outcome::NotFound`](crate::Outcome::NotFound).
#[derive(Error, Debug)]
pub enum GraphError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("precondition failed: {0}")]
    Precondition(&'static str),

    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("store error: {source} (statement: {statement})")]
    Store {
        statement: String,
        parameters: Parameters,
        #[source]
        source: SessionError,
    },

    #[error("transaction {action} failed: {source}")]
    Transaction {
        action: &'static str,
        #[source]
        source: SessionError,
    },

    #[error("unexpected result shape: {0}")]
    ResultShape(String),
}

impl GraphError {
    pub(crate) fn transaction(action: &'static str, e: neo4rs::Error) -> Self {
        Self::Transaction {
            action,
            source: SessionError::Driver(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
