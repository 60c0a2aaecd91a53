use thiserror::Error;

/// Canonical result for the schema core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The source document has a known keyword with the wrong shape.
    #[error("malformed schema at `{path}`: `{keyword}` must be {expected}")]
    MalformedSchema {
        path: String,
        keyword: String,
        expected: String,
    },

    /// A type model invariant was violated at construction.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// No mapping rule exists for the given type.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("flattened key `{key}` is produced by more than one property")]
    KeyCollision { key: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(path: &str, keyword: &str, expected: &str) -> Self {
        let path = if path.is_empty() { "/" } else { path };
        Error::MalformedSchema {
            path: path.to_string(),
            keyword: keyword.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn unsupported(kind: impl std::fmt::Display) -> Self {
        Error::UnsupportedType(kind.to_string())
    }
}
