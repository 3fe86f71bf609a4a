/// Query Execution Module
///
/// This module executes opaque query strings against the open connection
/// and projects the typed result rows into JSON for printing. Queries are
/// never parsed or inspected here; bind parameters are forwarded as text
/// in the order they were given and the server coerces them.
use crate::core::Result;
use serde_json::{Map, Value};
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, Row};
use tracing::debug;

/// Executes `sql` with the given bind parameters and returns one JSON
/// object per row, keyed by column name.
pub async fn execute(client: &Client, sql: &str, params: &[String]) -> Result<Vec<Value>> {
    debug!(params = params.len(), "executing query");

    // Bind every parameter as TEXT, matching the untyped-string binding of
    // interactive clients; the server casts to the inferred column types.
    let types = vec![Type::TEXT; params.len()];
    let statement = client.prepare_typed(sql, &types).await?;

    let args: Vec<&(dyn ToSql + Sync)> =
        params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
    let rows = client.query(&statement, &args).await?;

    rows.iter().map(row_to_json).collect()
}

/// Renders a result set the way it is printed: an indented JSON array of
/// row objects.
pub fn render(rows: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

fn row_to_json(row: &Row) -> Result<Value> {
    let mut object = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), column_to_json(row, idx)?);
    }
    Ok(Value::Object(object))
}

/// Projects one typed column value into JSON. SQL NULL maps to JSON null
/// for every type; types without a native JSON shape are decoded as text,
/// and a column the driver cannot decode surfaces as a query error.
fn column_to_json(row: &Row, idx: usize) -> Result<Value> {
    let value = match *row.columns()[idx].type_() {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.map(Value::Bool),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| Value::from(i64::from(v))),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)?
            .map(|v| Value::from(i64::from(v))),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(Value::from),
        Type::OID => row
            .try_get::<_, Option<u32>>(idx)?
            .map(|v| Value::from(u64::from(v))),
        // Non-finite floats have no JSON representation and become null.
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| Value::from(f64::from(v))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(Value::from),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(idx)?.map(Value::String)
        }
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(idx)?,
        Type::UUID => row
            .try_get::<_, Option<uuid::Uuid>>(idx)?
            .map(|v| Value::String(v.to_string())),
        Type::TIMESTAMP => row
            .try_get::<_, Option<chrono::NaiveDateTime>>(idx)?
            .map(|v| Value::String(v.to_string())),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)?
            .map(|v| Value::String(v.to_rfc3339())),
        Type::DATE => row
            .try_get::<_, Option<chrono::NaiveDate>>(idx)?
            .map(|v| Value::String(v.to_string())),
        Type::TIME => row
            .try_get::<_, Option<chrono::NaiveTime>>(idx)?
            .map(|v| Value::String(v.to_string())),
        _ => row.try_get::<_, Option<String>>(idx)?.map(Value::String),
    };
    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_is_indented_array_of_objects() {
        let rows = vec![json!({"id": 1, "name": "alice"}), json!({"id": 2, "name": null})];
        let rendered = render(&rows).unwrap();
        assert!(rendered.starts_with("[\n"));
        assert!(rendered.contains("  {"));
        assert!(rendered.contains("\"name\": \"alice\""));
        assert!(rendered.contains("\"name\": null"));

        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_render_empty_result_set() {
        assert_eq!(render(&[]).unwrap(), "[]");
    }
}
