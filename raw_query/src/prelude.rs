//! Convenience re-exports for common raw-query usage

// Query construction
pub use crate::substitution::NamedValue;
pub use crate::template::RawQuery;

// Execution
pub use crate::executor::{FromQueryRow, JsonRow, PgExecutor, PreparedQuery, QueryExecutor};
pub use crate::session::QuerySession;
pub use crate::PgSession;

// Results
pub use crate::output::QueryOutput;
pub use crate::pagination::Pagination;

// Diagnostics
pub use crate::diagnostics::{CallbackSink, DiagnosticsSink, QueryStage, TracingSink};

// Error types
pub use crate::errors::QueryError;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde_json::{json, Value};
