//! Row serialization to JSON
//!
//! Dynamic queries have no compile-time row type, so values are decoded by
//! Postgres type name. Primitive types map to their JSON counterparts;
//! everything else (uuid, timestamps, dates, numerics, unknown types) is
//! coerced to its string representation rather than dropped. Values outside
//! the handled list whose wire format is not UTF-8 text come back in
//! Postgres's `\x` hex literal form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Convert one row into a JSON object, preserving the query's declared
/// column order.
pub fn row_to_json(row: &PgRow) -> Map<String, Value> {
    let mut object = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), column_to_json(row, index));
    }
    object
}

fn column_to_json(row: &PgRow, index: usize) -> Value {
    let value_ref = match row.try_get_raw(index) {
        Ok(v) => v,
        Err(_) => return Value::Null,
    };

    if value_ref.is_null() {
        return Value::Null;
    }

    let type_name = value_ref.type_info().name().to_string();

    match type_name.as_str() {
        "BOOL" => {
            let v: Option<bool> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "INT2" => {
            let v: Option<i16> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "INT4" => {
            let v: Option<i32> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "INT8" => {
            let v: Option<i64> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "FLOAT4" => {
            let v: Option<f32> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "FLOAT8" => {
            let v: Option<f64> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "BPCHAR" => {
            let v: Option<String> = row.try_get(index).ok();
            serde_json::json!(v)
        }
        "UUID" => {
            let v: Option<uuid::Uuid> = row.try_get(index).ok();
            serde_json::json!(v.map(|u| u.to_string()))
        }
        "TIMESTAMPTZ" => {
            let v: Option<DateTime<Utc>> = row.try_get(index).ok();
            serde_json::json!(v.map(|t| t.to_string()))
        }
        "TIMESTAMP" => {
            let v: Option<NaiveDateTime> = row.try_get(index).ok();
            serde_json::json!(v.map(|t| t.to_string()))
        }
        "DATE" => {
            let v: Option<NaiveDate> = row.try_get(index).ok();
            serde_json::json!(v.map(|d| d.to_string()))
        }
        "NUMERIC" => {
            let v: Option<sqlx::types::BigDecimal> = row.try_get(index).ok();
            serde_json::json!(v.map(|d| d.to_string()))
        }
        "JSON" | "JSONB" => {
            let v: Option<Value> = row.try_get(index).ok();
            v.unwrap_or(Value::Null)
        }
        _ => {
            // Unknown type: fall back to the string representation, reading
            // the raw bytes directly when sqlx refuses the String decode.
            let v: Option<String> = row.try_get(index).ok();
            match v {
                Some(s) => Value::String(s),
                None => match row
                    .try_get_raw(index)
                    .ok()
                    .and_then(|raw| raw.as_bytes().ok().map(<[u8]>::to_vec))
                {
                    Some(bytes) => match String::from_utf8(bytes) {
                        Ok(s) => Value::String(s),
                        Err(e) => Value::String(bytea_literal(e.as_bytes())),
                    },
                    None => Value::String(format!("<{}>", type_name)),
                },
            }
        }
    }
}

/// Postgres hex literal form (`\xdeadbeef`) for binary payloads.
fn bytea_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytea_literal_hex_encodes() {
        assert_eq!(bytea_literal(&[0xde, 0xad, 0xbe, 0xef]), "\\xdeadbeef");
        assert_eq!(bytea_literal(&[0x00, 0x01]), "\\x0001");
        assert_eq!(bytea_literal(&[]), "\\x");
    }
}
