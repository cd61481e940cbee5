use thiserror::Error;

/// Structural errors raised while assembling the feature forest.
///
/// These abort the current assembly pass: they point at corrupt input that
/// cannot be patched locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate feature ID: {0}")]
    DuplicateId(String),

    #[error("Parent cycle detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("Unknown feature ID: {0}")]
    UnknownId(String),

    #[error("Feature {child} on '{child_seqid}' cannot be a child of {parent} on '{parent_seqid}'")]
    SeqidMismatch {
        child: String,
        child_seqid: String,
        parent: String,
        parent_seqid: String,
    },
}

/// Errors a pipeline stage can produce.
///
/// Must stay `Clone`: a terminated stage keeps returning the same error on every
/// subsequent pull.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Malformed record on line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    #[error("Unknown feature type '{feature_type}' on feature {feature}")]
    InvalidType { feature: String, feature_type: String },

    #[error("Invalid stage configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Record source failed: {0}")]
    Source(String),
}

impl From<std::io::Error> for StreamError {
    fn from(value: std::io::Error) -> Self {
        StreamError::Source(value.to_string())
    }
}
