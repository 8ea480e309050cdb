use thiserror::Error;

/// Invalid request options, rejected before any network access
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("versionRequirement is required")]
    MissingRequirement,

    #[error("cannot use both library and packageManager")]
    ConflictingTargets,

    #[error("either library or packageManager is required")]
    MissingTarget,

    #[error("invalid versionRequirement {0:?}")]
    InvalidRequirement(String),
}

/// Per-repository failure; logged and absorbed, never propagated
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckFault {
    #[error("{path} could not be parsed: {reason}")]
    Malformed { path: String, reason: String },

    #[error("{path} is a {kind}, expected a file")]
    WrongArtifactType { path: String, kind: String },

    #[error("{0}")]
    Unexpected(String),
}
