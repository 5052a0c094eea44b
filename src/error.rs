use thiserror::Error;

/// Errors surfaced to the orchestrator. Recoverable, per-record issues
/// (a malformed numeric field, a missed query, an unplaced pin) are not
/// modeled here; they are absorbed where they occur and logged.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse report at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to compile filter expression {expr:?}: {message}")]
    FilterParse { expr: String, message: String },

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
