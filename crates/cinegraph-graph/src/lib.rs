//! cinegraph-graph: statement building and execution against Neo4j.
//!
//! Entities from `cinegraph-core` are rendered into parameterized Cypher
//! by [`statement`], endpoints are re-located by [`locator`], and the
//! [`mutations`] and [`queries`] functions run those statements on any
//! [`GraphSession`] the caller passes in.

pub mod client;
pub mod error;
pub mod locator;
pub mod mutations;
pub mod queries;
pub mod session;
pub mod statement;

pub use client::{GraphClient, GraphConfig, Transaction};
pub use error::GraphError;
pub use locator::MatchKey;
pub use mutations::{create_node, create_relationship, Ack};
pub use queries::{find_by_field, find_movie, find_user, find_user_rating, NotFound, Outcome, RatingMatch};
pub use session::{Field, GraphSession, NodeRecord, RelationshipRecord, Row, SessionError};
pub use statement::{Statement, StatementKind};
