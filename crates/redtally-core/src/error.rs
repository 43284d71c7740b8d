use thiserror::Error;

/// Domain errors raised while interpreting caller input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The collection period is not one of `D`, `W`, `M` or `Y`.
    #[error("invalid collection period '{0}': expected one of D, W, M or Y")]
    InvalidPeriod(String),

    /// A game URL could not be parsed for normalization.
    #[error("malformed game URL '{url}': {reason}")]
    MalformedEntityUrl { url: String, reason: String },
}

/// Errors raised while loading configuration or the game registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read games file '{path}': {source}")]
    GamesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse games file: {0}")]
    GamesFileParse(#[from] serde_yaml::Error),

    #[error("games validation failed: {0}")]
    Validation(String),
}
