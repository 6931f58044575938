//! Pagination result and arithmetic

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of records plus navigation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination<T> {
    pub has_next: bool,
    pub has_prev: bool,
    pub per_page: u64,
    pub next_page: u64,
    #[serde(rename = "current_page")]
    pub page: u64,
    pub prev_page: u64,
    pub offset: u64,
    /// `None` when the data execution failed
    pub records: Option<T>,
    pub total_record: u64,
    pub total_page: u64,
    pub metadata: Option<Value>,
}

impl<T> Pagination<T> {
    /// Compute navigation metadata for `total` matched rows.
    ///
    /// `page` below 1 is treated as 1. A `limit` of 0 means a single page
    /// holding every row. Pages past the end are not clamped.
    pub fn compute(total: u64, limit: u64, page: u64) -> Self {
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(limit);

        let (per_page, total_page) = if limit > 0 {
            (limit, total.div_ceil(limit))
        } else {
            (total, 1)
        };

        let has_prev = page > 1;
        let has_next = total_page > page;

        Self {
            has_next,
            has_prev,
            per_page,
            next_page: if has_next { page + 1 } else { page },
            page,
            prev_page: if has_prev { page - 1 } else { page },
            offset,
            records: None,
            total_record: total,
            total_page,
            metadata: None,
        }
    }

    pub fn with_records(mut self, records: T) -> Self {
        self.records = Some(records);
        self
    }

    /// Attach caller-defined metadata
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn map_records<U, F>(self, f: F) -> Pagination<U>
    where
        F: FnOnce(T) -> U,
    {
        Pagination {
            has_next: self.has_next,
            has_prev: self.has_prev,
            per_page: self.per_page,
            next_page: self.next_page,
            page: self.page,
            prev_page: self.prev_page,
            offset: self.offset,
            records: self.records.map(f),
            total_record: self.total_record,
            total_page: self.total_page,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Page = Pagination<Vec<i32>>;

    #[test]
    fn test_middle_page() {
        let p = Page::compute(25, 10, 2);

        assert_eq!(p.offset, 10);
        assert_eq!(p.total_page, 3);
        assert!(p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.next_page, 3);
        assert_eq!(p.prev_page, 1);
        assert_eq!(p.per_page, 10);
        assert_eq!(p.total_record, 25);
    }

    #[test]
    fn test_zero_limit_is_single_page() {
        let p = Page::compute(7, 0, 1);

        assert_eq!(p.total_page, 1);
        assert_eq!(p.per_page, 7);
        assert!(!p.has_next);
        assert_eq!(p.next_page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_empty_result() {
        let p = Page::compute(0, 10, 1);

        assert_eq!(p.offset, 0);
        assert_eq!(p.total_page, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
        assert_eq!(p.next_page, 1);
        assert_eq!(p.prev_page, 1);
    }

    #[test]
    fn test_page_below_one_normalized() {
        let p = Page::compute(30, 10, 0);

        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
        assert!(!p.has_prev);
        assert!(p.has_next);
    }

    #[test]
    fn test_last_page() {
        let p = Page::compute(30, 10, 3);

        assert!(!p.has_next);
        assert_eq!(p.next_page, 3);
        assert_eq!(p.prev_page, 2);
    }

    #[test]
    fn test_page_past_end_not_clamped() {
        let p = Page::compute(25, 10, 9);

        assert_eq!(p.page, 9);
        assert_eq!(p.offset, 80);
        assert_eq!(p.total_page, 3);
        assert!(!p.has_next);
        assert_eq!(p.next_page, 9);
        assert!(p.has_prev);
        assert_eq!(p.prev_page, 8);
    }

    #[test]
    fn test_total_page_is_ceiling() {
        for (total, limit, expected) in [(1, 10, 1), (10, 10, 1), (11, 10, 2), (99, 7, 15), (0, 3, 0)] {
            assert_eq!(Page::compute(total, limit, 1).total_page, expected);
        }
    }

    #[test]
    fn test_navigation_invariants() {
        for total in [0u64, 1, 9, 10, 11, 57] {
            for limit in [0u64, 1, 5, 10] {
                for page in 1u64..=8 {
                    let p = Page::compute(total, limit, page);
                    assert_eq!(p.has_next, p.total_page > p.page);
                    assert_eq!(p.has_prev, p.page > 1);
                    if !p.has_next {
                        assert_eq!(p.next_page, p.page);
                    }
                    if !p.has_prev {
                        assert_eq!(p.prev_page, p.page);
                    }
                    assert_eq!(p.offset, (page - 1) * limit);
                }
            }
        }
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let p = Page::compute(25, 10, 2)
            .with_records(vec![1, 2])
            .with_metadata(json!({"source": "report"}));
        let value = serde_json::to_value(&p).unwrap();

        assert_eq!(value["current_page"], json!(2));
        assert_eq!(value["total_record"], json!(25));
        assert_eq!(value["total_page"], json!(3));
        assert_eq!(value["has_next"], json!(true));
        assert_eq!(value["records"], json!([1, 2]));
        assert_eq!(value["metadata"]["source"], json!("report"));
        assert!(value.get("page").is_none());
    }

    #[test]
    fn test_map_records_keeps_metadata() {
        let p = Page::compute(3, 2, 1).with_records(vec![1, 2]);
        let mapped = p.map_records(|rows| rows.len());

        assert_eq!(mapped.records, Some(2));
        assert_eq!(mapped.total_page, 2);
        assert!(mapped.has_next);
    }
}
