//! Execution capability
//!
//! `QueryExecutor` is the narrow seam through which statements reach the
//! database. `PgExecutor` implements it on top of a sqlx PostgreSQL pool.
//! An executor is shared by the count and data statements of one pagination
//! request, so implementations must tolerate concurrent use.

use crate::errors::QueryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgRow, PgTypeInfo};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

/// SQL text with its positional values
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    sql: String,
    values: Vec<Value>,
}

impl PreparedQuery {
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Runs raw SQL with positional bindings
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Row type produced by this executor
    type Row: Send;

    /// Fetch every row of the result set
    async fn fetch_all(&self, query: &PreparedQuery) -> Result<Vec<Self::Row>, QueryError>;

    /// Fetch exactly one row; an empty result is `QueryError::NotFound`
    async fn fetch_one(&self, query: &PreparedQuery) -> Result<Self::Row, QueryError>;

    /// Fetch a single integer from the first column of the first row
    async fn fetch_count(&self, query: &PreparedQuery) -> Result<i64, QueryError>;
}

/// Decode a destination value from an executor row
pub trait FromQueryRow<R>: Sized {
    fn from_query_row(row: &R) -> Result<Self, QueryError>;
}

impl<T> FromQueryRow<PgRow> for T
where
    T: for<'r> sqlx::FromRow<'r, PgRow>,
{
    fn from_query_row(row: &PgRow) -> Result<Self, QueryError> {
        Ok(T::from_row(row)?)
    }
}

impl<T> FromQueryRow<Value> for T
where
    T: DeserializeOwned,
{
    fn from_query_row(row: &Value) -> Result<Self, QueryError> {
        Ok(serde_json::from_value(row.clone())?)
    }
}

/// Row decoded from the single JSON column produced by `RawQuery::wrap_json(true)`
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRow<T>(pub T);

impl<T> JsonRow<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<'r, T> sqlx::FromRow<'r, PgRow> for JsonRow<T>
where
    T: DeserializeOwned + 'r,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let sqlx::types::Json(value) = row.try_get::<sqlx::types::Json<T>, _>(0)?;
        Ok(JsonRow(value))
    }
}

/// PostgreSQL executor backed by a sqlx pool
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// NULL sent with an unspecified type so PostgreSQL infers it from context
struct UntypedNull;

impl sqlx::Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl<'q> sqlx::Encode<'q, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

/// How a JSON string is sent to PostgreSQL
#[derive(Debug, PartialEq)]
enum TextParam<'a> {
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Text(&'a str),
}

/// RFC 3339 timestamps bind as TIMESTAMPTZ and UUIDs as UUID; anything
/// else stays TEXT.
fn classify_text(text: &str) -> TextParam<'_> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        TextParam::Timestamp(timestamp.with_timezone(&Utc))
    } else if let Ok(uuid) = Uuid::parse_str(text) {
        TextParam::Uuid(uuid)
    } else {
        TextParam::Text(text)
    }
}

/// Bind JSON values by variant so plain scalars reach PostgreSQL with their
/// native types; arrays and objects are sent as JSONB.
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(UntypedNull),
        Value::Bool(flag) => query.bind(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                query.bind(int)
            } else if let Some(float) = number.as_f64() {
                query.bind(float)
            } else {
                query.bind(sqlx::types::Json(value))
            }
        }
        Value::String(text) => match classify_text(text) {
            TextParam::Timestamp(timestamp) => query.bind(timestamp),
            TextParam::Uuid(uuid) => query.bind(uuid),
            TextParam::Text(text) => query.bind(text),
        },
        Value::Array(_) | Value::Object(_) => query.bind(sqlx::types::Json(value)),
    }
}

fn bind_all<'q>(query: &'q PreparedQuery) -> Query<'q, Postgres, PgArguments> {
    crate::debug_log!("binding {} positional values", query.values().len());
    query
        .values()
        .iter()
        .fold(sqlx::query(query.sql()), bind_value)
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    type Row = PgRow;

    async fn fetch_all(&self, query: &PreparedQuery) -> Result<Vec<PgRow>, QueryError> {
        let rows = bind_all(query).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn fetch_one(&self, query: &PreparedQuery) -> Result<PgRow, QueryError> {
        let row = bind_all(query).fetch_one(&self.pool).await?;
        Ok(row)
    }

    async fn fetch_count(&self, query: &PreparedQuery) -> Result<i64, QueryError> {
        let row = bind_all(query).fetch_one(&self.pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}
