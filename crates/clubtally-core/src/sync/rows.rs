//! Generic row bridge between the local store and the sync engine.
//!
//! The engine is table-agnostic: rows travel as JSON objects keyed by column
//! name. Table and column identifiers always come from the fixed schema or
//! from a validated remote payload, never raw user input.

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::util::{now_rfc3339, parse_timestamp};

/// A row as exchanged with the sync engine: column name -> JSON value.
pub type RowData = Map<String, Value>;

/// Outcome of applying one remote row locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedChange {
    /// No local row existed; inserted as synced
    Inserted,
    /// Remote was strictly newer; local fields overwritten
    Updated,
    /// Local was as new or newer; left untouched
    Skipped,
}

/// Extract the integer identity from a row.
pub fn row_id(row: &RowData) -> Result<i64> {
    row.get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::InvalidInput("row is missing an integer 'id'".to_string()))
}

/// Extract the `updated_at` timestamp string from a row.
pub fn row_updated_at(row: &RowData) -> Result<&str> {
    row.get("updated_at")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidInput("row is missing 'updated_at'".to_string()))
}

/// Select all rows of `table` still awaiting a push, in id order.
///
/// `sync_status` is stripped from the payload; it is local bookkeeping and
/// must not travel to the remote store.
pub fn pending_rows(conn: &Connection, table: &str) -> Result<Vec<RowData>> {
    ensure_identifier(table)?;

    let sql = format!("SELECT * FROM {table} WHERE sync_status = 'pending' ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut data = RowData::new();
        for (index, name) in columns.iter().enumerate() {
            data.insert(name.clone(), sql_to_json(row.get_ref(index)?));
        }
        data.remove("sync_status");
        out.push(data);
    }

    Ok(out)
}

/// Fetch one row by id, including soft-deleted rows.
pub fn get_row(conn: &Connection, table: &str, id: i64) -> Result<Option<RowData>> {
    ensure_identifier(table)?;

    let sql = format!("SELECT * FROM {table} WHERE id = ?");
    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut rows = stmt.query(params![id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    let mut data = RowData::new();
    for (index, name) in columns.iter().enumerate() {
        data.insert(name.clone(), sql_to_json(row.get_ref(index)?));
    }
    Ok(Some(data))
}

/// Flip a row to `synced` after a successful push.
///
/// The flip is guarded by the `updated_at` value that was pushed: a local
/// edit racing the push leaves the row `pending` so the new state is pushed
/// next pass. Returns whether the flip happened.
pub fn mark_row_synced(
    conn: &Connection,
    table: &str,
    id: i64,
    pushed_updated_at: &str,
) -> Result<bool> {
    ensure_identifier(table)?;

    let sql = format!(
        "UPDATE {table}
         SET sync_status = 'synced'
         WHERE id = ? AND sync_status = 'pending' AND updated_at = ?"
    );
    let rows = conn.execute(&sql, params![id, pushed_updated_at])?;
    Ok(rows > 0)
}

/// Apply one remote row to the local store.
///
/// Missing locally -> inserted as `synced`. Present locally -> overwritten
/// (including `deleted_at`) only when the remote `updated_at` is strictly
/// later; ties favor local. The store rewrites `updated_at` on the applying
/// write like on any other mutation.
pub fn apply_remote_row(conn: &Connection, table: &str, row: &RowData) -> Result<AppliedChange> {
    ensure_identifier(table)?;

    let id = row_id(row)?;
    let remote_stamp = row_updated_at(row)?;
    let remote_ts = parse_timestamp(remote_stamp)?;

    let Some(local) = get_row(conn, table, id)? else {
        insert_remote_row(conn, table, id, row)?;
        return Ok(AppliedChange::Inserted);
    };

    let local_stamp = local
        .get("updated_at")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Database(format!("{table}[{id}] has no updated_at")))?;
    let local_ts = parse_timestamp(local_stamp)?;

    if remote_ts > local_ts {
        overwrite_local_row(conn, table, id, row)?;
        Ok(AppliedChange::Updated)
    } else {
        Ok(AppliedChange::Skipped)
    }
}

fn insert_remote_row(conn: &Connection, table: &str, id: i64, row: &RowData) -> Result<()> {
    let now = now_rfc3339();
    let mut columns = vec!["id".to_string()];
    let mut values = vec![SqlValue::Integer(id)];

    for (name, value) in row {
        if matches!(name.as_str(), "id" | "sync_status" | "updated_at") {
            continue;
        }
        ensure_identifier(name)?;
        columns.push(name.clone());
        values.push(json_to_sql(value)?);
    }

    if !row.contains_key("created_at") {
        columns.push("created_at".to_string());
        values.push(SqlValue::Text(now.clone()));
    }
    columns.push("updated_at".to_string());
    values.push(SqlValue::Text(now));
    columns.push("sync_status".to_string());
    values.push(SqlValue::Text("synced".to_string()));

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

fn overwrite_local_row(conn: &Connection, table: &str, id: i64, row: &RowData) -> Result<()> {
    let now = now_rfc3339();
    let mut assignments = Vec::new();
    let mut values = Vec::new();

    for (name, value) in row {
        if matches!(name.as_str(), "id" | "sync_status" | "updated_at" | "created_at") {
            continue;
        }
        ensure_identifier(name)?;
        assignments.push(format!("{name} = ?"));
        values.push(json_to_sql(value)?);
    }

    assignments.push("updated_at = ?".to_string());
    values.push(SqlValue::Text(now));
    assignments.push("sync_status = 'synced'".to_string());
    values.push(SqlValue::Integer(id));

    let sql = format!(
        "UPDATE {table} SET {} WHERE id = ?",
        assignments.join(", ")
    );
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// Validate a table/column identifier: lowercase snake_case only.
fn ensure_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid identifier: {name}")))
    }
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Number(n.into()),
        ValueRef::Real(n) => Number::from_f64(n).map_or(Value::Null, Value::Number),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::String(String::from_utf8_lossy(blob).into_owned()),
    }
}

fn json_to_sql(value: &Value) -> Result<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(flag) => Ok(SqlValue::Integer(i64::from(*flag))),
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                Ok(SqlValue::Integer(n))
            } else if let Some(n) = number.as_f64() {
                Ok(SqlValue::Real(n))
            } else {
                Err(Error::InvalidInput(format!("unrepresentable number: {number}")))
            }
        }
        Value::String(text) => Ok(SqlValue::Text(text.clone())),
        Value::Array(_) | Value::Object(_) => Err(Error::InvalidInput(
            "nested JSON values are not valid row fields".to_string(),
        )),
    }
}
