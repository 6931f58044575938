use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl QueryError {
    /// Error raised when a result cannot be coerced into the requested destination
    pub fn shape_mismatch(found: &str, expected: &str) -> Self {
        Self::ShapeMismatch(format!("{} is not {}", found, expected))
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => QueryError::NotFound("query returned no rows".to_string()),
            sqlx::Error::ColumnNotFound(column) => {
                QueryError::DecodeError(format!("column not found: {}", column))
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                QueryError::DecodeError(err.to_string())
            }
            other => QueryError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::DecodeError(err.to_string())
    }
}
