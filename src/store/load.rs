// src/store/load.rs

use anyhow::{Context, Result};
use rusqlite::{params_from_iter, types::Value, Connection};
use thiserror::Error;
use tracing::info;

use crate::layout::{field_index, GHR_FIELDS};
use crate::process::{decode_fields, parse_rows};
use crate::store::tables::{self, TableSchema};

/// A bulk import aborts on the first row that does not fit the target
/// schema; there is no partial-failure handling, the transaction rolls back.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{table} row {row}: column {column} expected {expected}, got {value:?}")]
    TypeMismatch {
        table: &'static str,
        row: usize,
        column: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{table} row {row}: expected {expected} fields, got {got}")]
    FieldCount {
        table: &'static str,
        row: usize,
        expected: usize,
        got: usize,
    },
}

fn typed_value(
    raw: &str,
    column: &tables::Column,
    table: &'static str,
    row: usize,
) -> Result<Value, LoadError> {
    let trimmed = raw.trim();
    match column.ty {
        tables::ColumnType::Text => Ok(Value::Text(raw.to_string())),
        tables::ColumnType::Integer if trimmed.is_empty() => Ok(Value::Null),
        tables::ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| LoadError::TypeMismatch {
                table,
                row,
                column: column.name,
                expected: "INTEGER",
                value: raw.to_string(),
            }),
        tables::ColumnType::Real if trimmed.is_empty() => Ok(Value::Null),
        tables::ColumnType::Real => trimmed
            .parse::<f64>()
            .map(Value::Real)
            .map_err(|_| LoadError::TypeMismatch {
                table,
                row,
                column: column.name,
                expected: "REAL",
                value: raw.to_string(),
            }),
    }
}

/// Bulk-load delimited text into `schema`'s table, in file order, no
/// deduplication. The target table is dropped and recreated inside the load
/// transaction, so a re-run against the same input reproduces identical
/// contents.
pub fn load_delimited(
    conn: &mut Connection,
    schema: &TableSchema,
    text: &str,
    delimiter: u8,
    has_header: bool,
) -> Result<u64> {
    let rows = parse_rows(text, delimiter, has_header)
        .with_context(|| format!("parsing input for table {}", schema.name))?;

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {}; {};",
        schema.name,
        schema.create_sql()
    ))
    .with_context(|| format!("creating table {}", schema.name))?;

    let mut inserted = 0u64;
    {
        let mut stmt = tx.prepare(&schema.insert_sql())?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != schema.columns.len() {
                return Err(LoadError::FieldCount {
                    table: schema.name,
                    row: idx + 1,
                    expected: schema.columns.len(),
                    got: row.len(),
                }
                .into());
            }
            let values = row
                .iter()
                .zip(schema.columns)
                .map(|(raw, col)| typed_value(raw, col, schema.name, idx + 1))
                .collect::<Result<Vec<Value>, LoadError>>()?;
            stmt.execute(params_from_iter(values))
                .with_context(|| format!("inserting {} row {}", schema.name, idx + 1))?;
            inserted += 1;
        }
    }
    tx.commit()?;

    info!(table = schema.name, rows = inserted, "loaded table");
    Ok(inserted)
}

/// Load the fixed-width geographic header file.
///
/// Every line is decoded positionally (short lines truncate silently), the
/// derived identifiers are computed, and the row is inserted. Numeric
/// header fields that fail to parse abort the load.
pub fn load_ghr(conn: &mut Connection, text: &str) -> Result<u64> {
    let statefp = field_index("state").expect("state is mapped");
    let countyfp = field_index("county").expect("county is mapped");
    let cousub = field_index("cousub").expect("cousub is mapped");
    let placefp = field_index("place").expect("place is mapped");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS ghr; {};",
        tables::ghr_create_sql()
    ))
    .context("creating table ghr")?;

    let mut inserted = 0u64;
    {
        let mut stmt = tx.prepare(&tables::ghr_insert_sql())?;
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = decode_fields(line);

            let mut values = Vec::with_capacity(fields.len() + tables::GHR_DERIVED.len());
            for (spec, raw) in GHR_FIELDS.iter().zip(&fields) {
                let column = tables::Column {
                    name: spec.name,
                    ty: tables::ghr_column_type(spec.name),
                };
                values.push(typed_value(raw, &column, "ghr", idx + 1)?);
            }

            // Derived identifiers from the latest layout revision.
            values.push(concat_id(&[&fields[statefp], &fields[countyfp]]));
            values.push(concat_id(&[
                &fields[statefp],
                &fields[countyfp],
                &fields[cousub],
            ]));
            values.push(concat_id(&[&fields[statefp], &fields[placefp]]));
            values.push(concat_id(&[&fields[statefp], &fields[placefp]]));

            stmt.execute(params_from_iter(values))
                .with_context(|| format!("inserting ghr row {}", idx + 1))?;
            inserted += 1;
        }
    }
    tx.commit()?;

    info!(table = "ghr", rows = inserted, "loaded table");
    Ok(inserted)
}

/// A derived identifier is the concatenation of its parts; it is NULL when
/// any part is blank.
fn concat_id(parts: &[&String]) -> Value {
    if parts.iter().any(|p| p.is_empty()) {
        Value::Null
    } else {
        Value::Text(parts.iter().map(|p| p.as_str()).collect())
    }
}

/// Load file 02 of the national summary file (headerless, comma-delimited).
pub fn load_f02(conn: &mut Connection, text: &str) -> Result<u64> {
    load_delimited(conn, &tables::F02, text, b',', false)
}
