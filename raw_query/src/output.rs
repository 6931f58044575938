//! Execution output shapes
//!
//! Execution functions may legitimately produce a single row or a collection
//! depending on the query. `QueryOutput` carries either, and the typed
//! conversions below reconcile it with the caller's destination.

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutput<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> QueryOutput<T> {
    /// Coerce into a single element.
    ///
    /// A non-empty collection yields its first element; an empty one is a
    /// shape mismatch.
    pub fn into_one(self) -> Result<T, QueryError> {
        match self {
            QueryOutput::One(item) => Ok(item),
            QueryOutput::Many(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| QueryError::shape_mismatch("empty collection", "a single element")),
        }
    }

    /// Coerce into a collection. A single element does not widen.
    pub fn into_many(self) -> Result<Vec<T>, QueryError> {
        match self {
            QueryOutput::Many(items) => Ok(items),
            QueryOutput::One(_) => Err(QueryError::shape_mismatch("a single element", "a collection")),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, QueryOutput::Many(_))
    }

    pub fn len(&self) -> usize {
        match self {
            QueryOutput::One(_) => 1,
            QueryOutput::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<Vec<T>> for QueryOutput<T> {
    fn from(items: Vec<T>) -> Self {
        QueryOutput::Many(items)
    }
}
