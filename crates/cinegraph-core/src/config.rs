//! Connection credentials.
//!
//! Credentials are loaded from (in priority order):
//! 1. Environment variables (`CINEGRAPH__NEO4J__URI`, `..._USER`, `..._PASSWORD`)
//! 2. Config file (`cinegraph.toml`, `[neo4j]` section)
//!
//! or, alternatively, from a `NEO4J_URI=` / `NEO4J_USERNAME=` /
//! `NEO4J_PASSWORD=` auth file as exported by the Neo4j Aura console.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Endpoint and auth pair for a graph store.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub uri: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The `[neo4j]` section; every field may be missing until validated.
#[derive(Debug, Default, Deserialize)]
struct Neo4jSection {
    uri: Option<String>,
    user: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Load from `<file_prefix>.toml` (optional) overlaid by `CINEGRAPH__` env vars.
    pub fn load(file_prefix: &str) -> Result<Self, ConfigError> {
        Self::load_with_env(file_prefix, None)
    }

    /// [`load`](Self::load) reading variables from `env` instead of the
    /// process environment when given.
    fn load_with_env(
        file_prefix: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CINEGRAPH")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let section = match cfg.get::<Neo4jSection>("neo4j") {
            Ok(s) => s,
            Err(config::ConfigError::NotFound(_)) => Neo4jSection::default(),
            Err(e) => return Err(e.into()),
        };
        let creds = Self::from_parts(section.uri, section.user, section.password)?;
        tracing::debug!(uri = %creds.uri, user = %creds.username, "Loaded credentials");
        Ok(creds)
    }

    /// Read a `KEY=value` auth file.
    pub fn from_auth_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::AuthFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_auth(&contents)
    }

    /// Parse auth-file contents. Blank lines, `#` comments and unknown keys are ignored.
    pub fn parse_auth(contents: &str) -> Result<Self, ConfigError> {
        let (mut uri, mut username, mut password) = (None, None, None);
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = Some(value.trim().to_string());
            match key.trim() {
                "NEO4J_URI" => uri = value,
                "NEO4J_USERNAME" => username = value,
                "NEO4J_PASSWORD" => password = value,
                _ => {}
            }
        }
        Self::from_parts(uri, username, password)
    }

    fn from_parts(
        uri: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ConfigError> {
        let require = |v: Option<String>, name| {
            v.filter(|s| !s.is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };
        Ok(Self {
            uri: require(uri, "uri")?,
            username: require(username, "username")?,
            password: require(password, "password")?,
        })
    }
}
