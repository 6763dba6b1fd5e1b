//! Common test utilities and helpers

#![allow(dead_code)]

use chrono::NaiveDateTime;
use tablecmp::{Column, DataType, DefaultTable, TableMetadata, Value};

/// Route library logging to the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// USERS(id INTEGER primary key, name VARCHAR)
pub fn users(rows: &[(i64, &str)]) -> DefaultTable {
    let metadata = TableMetadata::new(
        "USERS",
        vec![
            Column::with_type("id", DataType::Integer).not_null(),
            Column::with_type("name", DataType::Varchar),
        ],
    )
    .with_primary_keys(["id"]);

    DefaultTable::from_rows(
        metadata,
        rows.iter()
            .map(|(id, name)| vec![Value::from(*id), Value::from(*name)])
            .collect(),
    )
    .expect("valid USERS rows")
}

/// ORDERS(id INTEGER primary key, amount DECIMAL, status VARCHAR)
pub fn orders(rows: &[(i64, f64, &str)]) -> DefaultTable {
    let metadata = TableMetadata::new(
        "ORDERS",
        vec![
            Column::with_type("id", DataType::Integer).not_null(),
            Column::with_type("amount", DataType::Decimal),
            Column::with_type("status", DataType::Varchar),
        ],
    )
    .with_primary_keys(["id"]);

    DefaultTable::from_rows(
        metadata,
        rows.iter()
            .map(|(id, amount, status)| {
                vec![Value::from(*id), Value::from(*amount), Value::from(*status)]
            })
            .collect(),
    )
    .expect("valid ORDERS rows")
}

/// Table of untyped text columns
pub fn text_table(name: &str, columns: &[&str], rows: &[&[&str]]) -> DefaultTable {
    let metadata = TableMetadata::new(name, columns.iter().map(|c| Column::new(*c)).collect());
    DefaultTable::from_rows(
        metadata,
        rows.iter()
            .map(|row| row.iter().map(|v| Value::from(*v)).collect())
            .collect(),
    )
    .expect("valid text rows")
}

pub fn timestamp(text: &str) -> Value {
    Value::DateTime(
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.3f").expect("valid timestamp"),
    )
}

/// Every permutation of `items`
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}
