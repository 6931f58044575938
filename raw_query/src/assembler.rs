//! Query assembly
//!
//! Turns a `RawQuery` into the final data statement and the companion count
//! statement. Named substitution is finished before any clause is appended,
//! so positional values only ever bind against fully rewritten text.

use crate::executor::PreparedQuery;
use crate::substitution::substitute;
use crate::template::RawQuery;
use serde_json::Value;

/// Output of assembling a `RawQuery`
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// Statement returning the requested page of rows
    pub data_sql: String,
    /// Substituted template plus GROUP BY; wrapped by `count_statement`
    pub count_sql: String,
    /// Positional values shared by both statements
    pub values: Vec<Value>,
}

impl BuiltQuery {
    /// `SELECT COUNT(1) FROM (<count_sql>) AS t`
    pub fn count_statement(&self) -> String {
        format!("SELECT COUNT(1) FROM ({}) AS t", self.count_sql)
    }

    pub fn data_query(&self) -> PreparedQuery {
        PreparedQuery::new(self.data_sql.clone(), self.values.clone())
    }

    pub fn count_query(&self) -> PreparedQuery {
        PreparedQuery::new(self.count_statement(), self.values.clone())
    }
}

pub struct SqlAssembler;

impl SqlAssembler {
    pub fn assemble(query: &RawQuery) -> BuiltQuery {
        let substituted = substitute(&query.template, &query.named_values);

        let count_sql = format!(
            "{}{}",
            substituted,
            Self::build_group_by_clause(query.group_by.as_deref())
        );

        let mut data_sql = count_sql.clone();
        data_sql.push_str(&Self::build_order_clause(query.order_by.as_deref()));
        data_sql.push_str(&Self::build_limit_clause(query.limit, query.page));

        if query.wrap_json {
            data_sql = Self::wrap_json(&data_sql);
        }

        BuiltQuery {
            data_sql,
            count_sql,
            values: query.values.clone(),
        }
    }

    /// Build GROUP BY clause
    pub fn build_group_by_clause(group_by: Option<&str>) -> String {
        match group_by {
            Some(column) if !column.is_empty() => format!(" GROUP BY {}", column),
            _ => "".to_string(),
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: Option<&str>) -> String {
        match order_by {
            Some(columns) if !columns.is_empty() => format!(" ORDER BY {}", columns),
            _ => "".to_string(),
        }
    }

    /// Build LIMIT/OFFSET clause
    ///
    /// LIMIT only when `limit > 0`; OFFSET whenever a page is set, with page 1
    /// always at offset 0.
    pub fn build_limit_clause(limit: u64, page: u64) -> String {
        let mut clause = String::new();

        if limit > 0 {
            clause.push_str(&format!(" LIMIT {}", limit));
        }

        if page > 0 {
            let offset = if page > 1 { (page - 1).saturating_mul(limit) } else { 0 };
            clause.push_str(&format!(" OFFSET {}", offset));
        }

        clause
    }

    pub fn wrap_json(sql: &str) -> String {
        format!(
            "WITH alias AS ({}) SELECT to_jsonb(row_to_json(alias)) AS alias FROM alias",
            sql
        )
    }
}
