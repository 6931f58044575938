//! Integration tests against a live PostgreSQL database
//!
//! Set `DATABASE_URL` to run them; without it every test returns early.
//! Each test works on its own table so they can run in parallel.

use pagehaus::prelude::*;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
}

async fn setup_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    Some(
        PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to database"),
    )
}

async fn seed_table(pool: &PgPool, table: &str, rows: i64) {
    cleanup_table(pool, table).await;
    sqlx::query(&format!(
        "CREATE TABLE {} (id BIGINT PRIMARY KEY, name TEXT NOT NULL, category TEXT NOT NULL)",
        table
    ))
    .execute(pool)
    .await
    .expect("Failed to create table");

    for i in 1..=rows {
        let category = if i % 2 == 0 { "even" } else { "odd" };
        sqlx::query(&format!(
            "INSERT INTO {} (id, name, category) VALUES ($1, $2, $3)",
            table
        ))
        .bind(i)
        .bind(format!("item_{}", i))
        .bind(category)
        .execute(pool)
        .await
        .expect("Failed to insert row");
    }
}

async fn cleanup_table(pool: &PgPool, table: &str) {
    let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .execute(pool)
        .await;
}

#[tokio::test]
async fn test_paginate_against_postgres() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    seed_table(&pool, "pagehaus_page_items", 25).await;

    let haus = PageHaus::from_pool(pool.clone());
    let query = haus
        .query("SELECT id, name, category FROM pagehaus_page_items")
        .filter("id > $1", [0])
        .order_by(["id"])
        .limit(10)
        .page(2);

    let page = haus.session().paginate_as::<Item>(&query).await;

    assert_eq!(page.total_record, 25);
    assert_eq!(page.total_page, 3);
    assert_eq!(page.offset, 10);
    let records = page.records.expect("records should be present");
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].id, 11);

    cleanup_table(&pool, "pagehaus_page_items").await;
}

#[tokio::test]
async fn test_named_list_substitution_against_postgres() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    seed_table(&pool, "pagehaus_named_items", 5).await;

    let haus = PageHaus::from_pool(pool.clone());
    let query = haus
        .query("SELECT id, name, category FROM pagehaus_named_items")
        .filter("name IN (@names)", Vec::<Value>::new())
        .where_named("names", vec!["item_2", "item_4"])
        .filter("category = $1", ["even"])
        .order_by(["id"]);

    let items: Vec<Item> = haus.session().scan(&query).await.unwrap();
    assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 4]);

    cleanup_table(&pool, "pagehaus_named_items").await;
}

#[tokio::test]
async fn test_group_by_counts_groups_against_postgres() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    seed_table(&pool, "pagehaus_grouped_items", 9).await;

    let haus = PageHaus::from_pool(pool.clone());
    let query = haus
        .query("SELECT category, COUNT(*) AS total FROM pagehaus_grouped_items")
        .group_by("category")
        .order_by(["category"])
        .limit(1);

    let page = haus
        .session()
        .paginate_strict(&query, |db, data| async move {
            let rows = db.fetch_all(&data).await?;
            rows.iter()
                .map(<(String, i64)>::from_query_row)
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .unwrap();

    assert_eq!(page.total_record, 2);
    assert_eq!(page.total_page, 2);
    assert_eq!(page.records.unwrap(), vec![("even".to_string(), 4)]);

    cleanup_table(&pool, "pagehaus_grouped_items").await;
}

#[tokio::test]
async fn test_wrap_json_against_postgres() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    seed_table(&pool, "pagehaus_json_items", 3).await;

    let haus = PageHaus::from_pool(pool.clone());
    let query = haus
        .query("SELECT id, name, category FROM pagehaus_json_items")
        .order_by(["id DESC"])
        .wrap_json(true);

    let rows: Vec<JsonRow<Item>> = haus.session().scan(&query).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0.name, "item_3");

    cleanup_table(&pool, "pagehaus_json_items").await;
}

#[tokio::test]
async fn test_scan_row_and_count_failure_against_postgres() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    seed_table(&pool, "pagehaus_row_items", 4).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::new(CallbackSink::new());
    let sink_seen = Arc::clone(&seen);
    sink.add_callback(move |d| sink_seen.lock().unwrap().push(d.stage));

    let haus = PageHaus::from_pool(pool.clone()).with_diagnostics(sink);
    let session = haus.session();

    let (total,): (i64,) = session
        .scan_row(&haus.query("SELECT COUNT(*) FROM pagehaus_row_items"))
        .await
        .unwrap();
    assert_eq!(total, 4);

    let broken = haus.query("SELECT * FROM pagehaus_missing_table").limit(2);
    let page = session.paginate_as::<Item>(&broken).await;
    assert_eq!(page.total_record, 0);
    assert!(page.records.is_none());

    let seen = seen.lock().unwrap();
    assert!(seen.contains(&QueryStage::Count));
    assert!(seen.contains(&QueryStage::Data));

    cleanup_table(&pool, "pagehaus_row_items").await;
}

#[tokio::test]
async fn test_typed_positional_values_against_postgres() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let table = "pagehaus_typed_items";
    cleanup_table(&pool, table).await;
    sqlx::query(&format!(
        "CREATE TABLE {} (id UUID PRIMARY KEY, at TIMESTAMPTZ NOT NULL, n INT, label TEXT NOT NULL)",
        table
    ))
    .execute(&pool)
    .await
    .expect("Failed to create table");
    sqlx::query(&format!(
        "INSERT INTO {} (id, at, n, label) VALUES \
         ('67e55044-10b1-426f-9247-bb680e5fe0c8', '2024-06-01T12:00:00Z', NULL, 'first'), \
         ('0b6a5c2e-3f0d-4a57-9d6e-1c2b3a4d5e6f', '2023-01-01T00:00:00Z', 3, 'second')",
        table
    ))
    .execute(&pool)
    .await
    .expect("Failed to insert rows");

    let session = PageHaus::from_pool(pool.clone()).session();
    let base = format!("SELECT label FROM {}", table);

    let (label,): (String,) = session
        .scan_row(&RawQuery::new(&base).filter("id = $1", ["67e55044-10b1-426f-9247-bb680e5fe0c8"]))
        .await
        .unwrap();
    assert_eq!(label, "first");

    let (label,): (String,) = session
        .scan_row(&RawQuery::new(&base).filter("at > $1", ["2024-01-01T00:00:00Z"]))
        .await
        .unwrap();
    assert_eq!(label, "first");

    let (label,): (String,) = session
        .scan_row(&RawQuery::new(&base).filter("n IS NOT DISTINCT FROM $1", [Value::Null]))
        .await
        .unwrap();
    assert_eq!(label, "first");

    let (label,): (String,) = session
        .scan_row(&RawQuery::new(&base).filter("label = $1", ["second"]))
        .await
        .unwrap();
    assert_eq!(label, "second");

    cleanup_table(&pool, table).await;
}
