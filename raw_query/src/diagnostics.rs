//! Diagnostics sink for execution errors
//!
//! Errors that the lenient pagination path swallows still reach a sink. The
//! default sink writes them to `tracing`; `CallbackSink` fans them out to
//! registered callbacks.

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Which execution produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStage {
    Count,
    Data,
    Scan,
    ScanRow,
}

impl QueryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStage::Count => "count",
            QueryStage::Data => "data",
            QueryStage::Scan => "scan",
            QueryStage::ScanRow => "scan_row",
        }
    }
}

impl std::fmt::Display for QueryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reported execution failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: QueryStage,
    pub sql: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: QueryStage, sql: &str, error: &QueryError) -> Self {
        Self {
            stage,
            sql: sql.to_string(),
            message: error.to_string(),
        }
    }
}

/// Receives execution errors
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::error!(
            stage = %diagnostic.stage,
            sql = %diagnostic.sql,
            error = %diagnostic.message,
            "query execution failed"
        );
    }
}

type DiagnosticCallback = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Sink that forwards each diagnostic to registered callbacks
pub struct CallbackSink {
    callbacks: RwLock<Vec<DiagnosticCallback>>,
}

impl std::fmt::Debug for CallbackSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSink")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl CallbackSink {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Add diagnostic callback
    pub fn add_callback<F>(&self, callback: F)
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push(Arc::new(callback));
        }
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for CallbackSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsSink for CallbackSink {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(callbacks) = self.callbacks.read() {
            for callback in callbacks.iter() {
                callback(&diagnostic);
            }
        }
    }
}
