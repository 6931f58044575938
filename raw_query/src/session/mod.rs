//! Query session
//!
//! A `QuerySession` ties an executor to a diagnostics sink and runs built
//! queries. Pagination runs the count statement concurrently with the data
//! execution and joins both before computing the result. There is no
//! cancellation and no retry: a hung count blocks the call.

use crate::assembler::BuiltQuery;
use crate::diagnostics::{Diagnostic, DiagnosticsSink, QueryStage, TracingSink};
use crate::errors::QueryError;
use crate::executor::{FromQueryRow, PreparedQuery, QueryExecutor};
use crate::output::QueryOutput;
use crate::pagination::Pagination;
use crate::template::RawQuery;
use config::QueryConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;


pub struct QuerySession<E: QueryExecutor> {
    executor: E,
    sink: Arc<dyn DiagnosticsSink>,
    config: QueryConfig,
}

impl<E: QueryExecutor> std::fmt::Debug for QuerySession<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySession")
            .field("config", &self.config)
            .finish()
    }
}

impl<E: QueryExecutor> QuerySession<E> {
    /// Create a session reporting to `tracing`
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            sink: Arc::new(TracingSink),
            config: QueryConfig::default(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Paginate with a caller-supplied execution function.
    ///
    /// A failed data execution is reported to the sink and leaves `records`
    /// empty. A failed count is reported and treated as zero rows, so the
    /// metadata is computed from 0. Use `paginate_strict` to get either
    /// failure back as an error.
    pub async fn paginate<'a, T, F, Fut>(&'a self, query: &RawQuery, exec: F) -> Pagination<T>
    where
        F: FnOnce(&'a E, PreparedQuery) -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let page = query.normalized();
        let built = page.build();
        let data = exec(&self.executor, built.data_query());
        let (count, data) = self.join_page(&built, data).await;

        let pagination = Pagination::compute(count.unwrap_or(0), page.limit, page.page);
        match data {
            Ok(records) => pagination.with_records(records),
            Err(_) => pagination,
        }
    }

    /// Paginate, propagating count and data failures.
    ///
    /// Failures are still reported to the sink before being returned.
    pub async fn paginate_strict<'a, T, F, Fut>(
        &'a self,
        query: &RawQuery,
        exec: F,
    ) -> Result<Pagination<T>, QueryError>
    where
        F: FnOnce(&'a E, PreparedQuery) -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let page = query.normalized();
        let built = page.build();
        let data = exec(&self.executor, built.data_query());
        let (count, data) = self.join_page(&built, data).await;

        let total = count?;
        let records = data?;
        Ok(Pagination::compute(total, page.limit, page.page).with_records(records))
    }

    /// Paginate by decoding every row of the data statement into `T`
    pub async fn paginate_as<T>(&self, query: &RawQuery) -> Pagination<Vec<T>>
    where
        T: FromQueryRow<E::Row>,
    {
        let page = query.normalized();
        let built = page.build();
        let data_query = built.data_query();
        let data = async {
            let rows = self.executor.fetch_all(&data_query).await?;
            decode_rows::<_, T>(&rows)
        };
        let (count, data) = self.join_page(&built, data).await;

        let pagination = Pagination::compute(count.unwrap_or(0), page.limit, page.page);
        match data {
            Ok(records) => pagination.with_records(records),
            Err(_) => pagination,
        }
    }

    /// Run the count statement concurrently with `data` and wait for both.
    ///
    /// Both failures are reported here; callers decide whether to propagate.
    async fn join_page<T, Fut>(
        &self,
        built: &BuiltQuery,
        data: Fut,
    ) -> (Result<u64, QueryError>, Result<T, QueryError>)
    where
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let count_query = built.count_query();
        let data_sql = built.data_sql.as_str();

        self.log_statement(QueryStage::Count, count_query.sql(), built.values.len());
        self.log_statement(QueryStage::Data, data_sql, built.values.len());

        let count_future = self.timed(
            QueryStage::Count,
            count_query.sql(),
            self.executor.fetch_count(&count_query),
        );
        let data_future = self.timed(QueryStage::Data, data_sql, data);

        let (count, data) = tokio::join!(count_future, data_future);
        crate::trace_log!("count and data executions joined");

        let count = self
            .observe(QueryStage::Count, count_query.sql(), count)
            .map(|total| u64::try_from(total).unwrap_or(0));
        let data = self.observe(QueryStage::Data, data_sql, data);

        (count, data)
    }

    /// Run a caller-supplied execution function against the data statement.
    ///
    /// Errors are returned to the caller without being reported.
    pub async fn exec<'a, T, F, Fut>(
        &'a self,
        query: &RawQuery,
        exec: F,
    ) -> Result<QueryOutput<T>, QueryError>
    where
        F: FnOnce(&'a E, PreparedQuery) -> Fut,
        Fut: Future<Output = Result<QueryOutput<T>, QueryError>>,
    {
        let data_query = query.build().data_query();
        self.log_statement(QueryStage::Data, data_query.sql(), data_query.values().len());
        exec(&self.executor, data_query).await
    }

    /// `exec`, coerced into a single element
    pub async fn exec_one<'a, T, F, Fut>(
        &'a self,
        query: &RawQuery,
        exec: F,
    ) -> Result<T, QueryError>
    where
        F: FnOnce(&'a E, PreparedQuery) -> Fut,
        Fut: Future<Output = Result<QueryOutput<T>, QueryError>>,
    {
        self.exec(query, exec).await?.into_one()
    }

    /// `exec`, coerced into a collection
    pub async fn exec_many<'a, T, F, Fut>(
        &'a self,
        query: &RawQuery,
        exec: F,
    ) -> Result<Vec<T>, QueryError>
    where
        F: FnOnce(&'a E, PreparedQuery) -> Fut,
        Fut: Future<Output = Result<QueryOutput<T>, QueryError>>,
    {
        self.exec(query, exec).await?.into_many()
    }

    /// Scan the full result set into `T` rows
    pub async fn scan<T>(&self, query: &RawQuery) -> Result<Vec<T>, QueryError>
    where
        T: FromQueryRow<E::Row>,
    {
        let data_query = query.build().data_query();
        self.log_statement(QueryStage::Scan, data_query.sql(), data_query.values().len());

        let result = async {
            let rows = self.executor.fetch_all(&data_query).await?;
            decode_rows::<_, T>(&rows)
        };
        let result = self.timed(QueryStage::Scan, data_query.sql(), result).await;
        self.observe(QueryStage::Scan, data_query.sql(), result)
    }

    /// Scan a single row into `T`
    pub async fn scan_row<T>(&self, query: &RawQuery) -> Result<T, QueryError>
    where
        T: FromQueryRow<E::Row>,
    {
        let data_query = query.build().data_query();
        self.log_statement(QueryStage::ScanRow, data_query.sql(), data_query.values().len());

        let result = async {
            let row = self.executor.fetch_one(&data_query).await?;
            T::from_query_row(&row)
        };
        let result = self.timed(QueryStage::ScanRow, data_query.sql(), result).await;
        self.observe(QueryStage::ScanRow, data_query.sql(), result)
    }

    /// Report a failed result to the sink and pass it through
    fn observe<R>(
        &self,
        stage: QueryStage,
        sql: &str,
        result: Result<R, QueryError>,
    ) -> Result<R, QueryError> {
        if let Err(error) = &result {
            self.sink.report(Diagnostic::new(stage, sql, error));
        }
        result
    }

    fn log_statement(&self, stage: QueryStage, sql: &str, bindings: usize) {
        if self.config.log_statements {
            tracing::debug!(
                stage = %stage,
                sql = %sql,
                bindings,
                "executing statement"
            );
        }
    }

    async fn timed<R, Fut>(&self, stage: QueryStage, sql: &str, future: Fut) -> R
    where
        Fut: Future<Output = R>,
    {
        let start = Instant::now();
        let output = future.await;

        let threshold = self.config.slow_query_threshold_ms;
        if threshold > 0 {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            if elapsed_ms >= threshold {
                tracing::warn!(
                    target: "pagehaus::slow_query",
                    stage = %stage,
                    elapsed_ms,
                    sql = %sql,
                    "slow query"
                );
            }
        }
        output
    }
}

fn decode_rows<R, T>(rows: &[R]) -> Result<Vec<T>, QueryError>
where
    T: FromQueryRow<R>,
{
    rows.iter().map(T::from_query_row).collect()
}
