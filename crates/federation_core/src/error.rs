use thiserror::Error;

#[derive(Debug, Error)]
pub enum FederationError {
    #[error("shared module `{name}` can not be resolved from `{specifier}`")]
    UnresolvedShared { name: String, specifier: String },
    #[error("exposed module `{name}` is malformed: {reason}")]
    MalformedExpose { name: String, reason: String },
    #[error("invalid federation options: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("fail to parse {file}: {message}")]
    Parse { file: String, message: String },
    #[error("overlapping edit at {start}..{end}")]
    OverlappingEdit { start: usize, end: usize },
}
