//! Raw Query - template assembly and pagination layer for PageHaus
//!
//! This crate turns raw SQL templates into data and count statements, runs
//! them concurrently against a `QueryExecutor`, and shapes the results into
//! pages.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod assembler;
pub mod diagnostics;
pub mod errors;
pub mod executor;
pub mod output;
pub mod pagination;
pub mod prelude;
pub mod session;
pub mod substitution;
pub mod template;

pub use assembler::{BuiltQuery, SqlAssembler};
pub use diagnostics::{CallbackSink, Diagnostic, DiagnosticsSink, QueryStage, TracingSink};
pub use errors::QueryError;
pub use executor::{FromQueryRow, JsonRow, PgExecutor, PreparedQuery, QueryExecutor};
pub use output::QueryOutput;
pub use pagination::Pagination;
pub use session::QuerySession;
pub use substitution::{substitute, NamedValue};
pub use template::RawQuery;

/// Session over the PostgreSQL executor
pub type PgSession = QuerySession<PgExecutor>;
