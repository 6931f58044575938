//! Convenience re-exports for common PageHaus usage
//!
//! # Example
//!
//! ```rust
//! use pagehaus::prelude::*;
//!
//! let query = RawQuery::new("SELECT * FROM users")
//!     .filter("age > $1", [18])
//!     .limit(20)
//!     .page(1);
//! assert!(query.build().data_sql.ends_with("LIMIT 20 OFFSET 0"));
//! ```

// Core PageHaus components
pub use crate::core::PageHaus;
pub use crate::errors::PageHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig};

// Query building, execution and results
pub use raw_query::prelude::*;

// Common external dependencies
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{FromRow, PgPool, Row};
