//! # PageHaus
//!
//! Raw SQL template assembly and concurrent pagination for PostgreSQL.
//!
//! A query starts as a SQL template. Predicates, `@name` substitutions,
//! ordering, grouping and paging are attached to it, and a session then runs
//! the data statement and its companion count statement concurrently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagehaus::prelude::*;
//!
//! #[derive(Debug, sqlx::FromRow)]
//! pub struct Order {
//!     pub id: i64,
//!     pub status: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "shop".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let haus = PageHaus::new(config).await?;
//!     let session = haus.session();
//!
//!     let query = haus
//!         .query("SELECT id, status FROM orders")
//!         .filter("status IN (@statuses)", Vec::<Value>::new())
//!         .where_named("statuses", vec!["paid", "shipped"])
//!         .filter("customer_id = $1", [42])
//!         .order_by(["id DESC"])
//!         .limit(20)
//!         .page(1);
//!
//!     let page = session.paginate_as::<Order>(&query).await;
//!     println!("{} of {} orders", page.records.map(|r| r.len()).unwrap_or(0), page.total_record);
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::PageHaus;
pub use errors::PageHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig};

// Re-export internal crates
pub use raw_query;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
