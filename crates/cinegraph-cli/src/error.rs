//! Error types for the cinegraph-cli crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid property '{0}': expected key=value")]
    InvalidProperty(String),

    #[error("invalid list value '{0}': lists may not nest")]
    NestedList(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
