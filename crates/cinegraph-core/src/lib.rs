//! cinegraph-core: entity model and shared types for the cinegraph client.
//!
//! This crate provides the types every other cinegraph crate builds on:
//! - Node and Relationship descriptors with construction-time validation
//! - Insertion-ordered property maps and property values
//! - Allow-list validation for labels, relationship types and keys
//! - Lookup selectors for users and movies
//! - Connection credentials

pub mod config;
pub mod error;
pub mod ident;
pub mod types;

pub use config::Credentials;
pub use error::{ConfigError, IdentifierKind, ValidationError};
pub use types::{
    MovieSelector, Node, NodeBuilder, Properties, PropertyValue, Relationship,
    RelationshipBuilder, UserSelector,
};
