// 🔍 Query Runner
// Runs fixed read-only SQL against the loaded table and keeps the query text
// alongside the rows it produced.

use crate::config::{Currency, NAME_COLUMN};
use crate::error::EtlResult;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub query: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryOutput {
    /// First column of the first row, if any
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query Statement: {}", self.query)?;
        writeln!(f, "Query Result:")?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(format_value).collect();
            writeln!(f, "({})", cells.join(", "))?;
        }
        Ok(())
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => format!("'{}'", s),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Execute `sql` and fetch every row
pub fn run_query(conn: &Connection, sql: &str) -> EtlResult<QueryOutput> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<Result<Vec<_>, _>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(query = sql, rows = rows.len(), "query executed");

    Ok(QueryOutput {
        query: sql.to_string(),
        columns,
        rows,
    })
}

/// The three report queries, in run order: full dump, average GBP value,
/// first five names in table order.
pub fn canonical_queries(table: &str) -> Vec<String> {
    vec![
        format!("SELECT * FROM {}", table),
        format!("SELECT AVG({}) FROM {}", Currency::Gbp.column(), table),
        format!("SELECT {} FROM {} LIMIT 5", NAME_COLUMN, table),
    ]
}
