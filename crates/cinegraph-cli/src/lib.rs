//! cinegraph-cli: argument parsing for the `cinegraph` command-line client.

pub mod args;
pub mod error;
