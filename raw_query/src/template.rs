//! Raw query template
//!
//! `RawQuery` holds a base SQL template together with the predicates,
//! named values, ordering, grouping and pagination parameters attached to it.
//! Every builder method consumes the query and returns a new one.

use crate::assembler::{BuiltQuery, SqlAssembler};
use crate::substitution::NamedValue;
use serde_json::Value;
use std::collections::BTreeMap;

/// Immutable raw SQL query configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    pub(crate) template: String,
    pub(crate) values: Vec<Value>,
    pub(crate) named_values: BTreeMap<String, NamedValue>,
    pub(crate) has_filter: bool,
    pub(crate) order_by: Option<String>,
    pub(crate) group_by: Option<String>,
    pub(crate) limit: u64,
    pub(crate) page: u64,
    pub(crate) wrap_json: bool,
}

impl RawQuery {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            values: Vec::new(),
            named_values: BTreeMap::new(),
            has_filter: false,
            order_by: None,
            group_by: None,
            limit: 0,
            page: 0,
            wrap_json: false,
        }
    }

    /// Add a predicate, combined with AND once a filter exists.
    ///
    /// `args` are appended to the positional values in order and must line up
    /// with the `$n` placeholders of the final statement.
    pub fn filter<I, V>(self, predicate: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_predicate("AND", predicate, args)
    }

    /// Add a predicate, combined with OR once a filter exists
    pub fn or_filter<I, V>(self, predicate: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_predicate("OR", predicate, args)
    }

    fn push_predicate<I, V>(mut self, connective: &str, predicate: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(args.into_iter().map(Into::into));

        if self.has_filter {
            self.template = format!("{} {} {}", self.template, connective, predicate);
        } else {
            self.template = format!("{} WHERE {}", self.template, predicate);
            self.has_filter = true;
        }
        self
    }

    /// Set the value substituted for `@name`, replacing any previous value
    pub fn where_named(mut self, name: impl Into<String>, value: impl Into<NamedValue>) -> Self {
        self.named_values.insert(name.into(), value.into());
        self
    }

    /// Set the ORDER BY columns. An empty list keeps the current ordering.
    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        if !columns.is_empty() {
            self.order_by = Some(columns.join(","));
        }
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.group_by = if column.is_empty() { None } else { Some(column) };
        self
    }

    /// Rows per page; 0 disables LIMIT/OFFSET
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// 1-based page number
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Emit one JSON document per row instead of plain columns
    pub fn wrap_json(mut self, wrap: bool) -> Self {
        self.wrap_json = wrap;
        self
    }

    /// Apply a reusable fragment to this query
    pub fn apply<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }

    /// Copy of this query with the page clamped to at least 1
    pub fn normalized(&self) -> Self {
        let mut query = self.clone();
        if query.page < 1 {
            query.page = 1;
        }
        query
    }

    /// Offset of the first row on the current page
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Assemble the data and count statements
    pub fn build(&self) -> BuiltQuery {
        SqlAssembler::assemble(self)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn named_values(&self) -> &BTreeMap<String, NamedValue> {
        &self.named_values
    }

    pub fn has_filter(&self) -> bool {
        self.has_filter
    }

    pub fn limit_value(&self) -> u64 {
        self.limit
    }

    pub fn page_value(&self) -> u64 {
        self.page
    }

    pub fn ordering(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn grouping(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn is_json_wrapped(&self) -> bool {
        self.wrap_json
    }
}
