use thiserror::Error;

/// Malformed caller input, detected before any statement is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("labels required")]
    LabelsRequired,

    #[error("properties required")]
    PropertiesRequired,

    #[error("endpoints required")]
    EndpointsRequired,

    #[error("type required")]
    TypeRequired,

    #[error("selector required")]
    SelectorRequired,

    #[error("ambiguous selector: supply exactly one of {first} or {second}")]
    AmbiguousSelector {
        first: &'static str,
        second: &'static str,
    },

    #[error("property key must not be empty")]
    EmptyPropertyKey,

    #[error("invalid {kind} '{value}': {reason}")]
    InvalidIdentifier {
        kind: IdentifierKind,
        value: String,
        reason: &'static str,
    },

    #[error("{kind} '{value}' is a reserved keyword")]
    ReservedKeyword { kind: IdentifierKind, value: String },

    #[error("key field '{0}' is not one of the node's properties")]
    UnknownKeyField(String),
}

/// What an identifier is used as inside statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Label,
    RelationshipType,
    PropertyKey,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Label => "label",
            Self::RelationshipType => "relationship type",
            Self::PropertyKey => "property key",
        };
        f.write_str(s)
    }
}

/// Errors while assembling connection credentials.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("failed to read auth file {path}: {source}")]
    AuthFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}
