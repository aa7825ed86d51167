// 🗄️ Table Store
// Replaces the contents of one SQLite table with a ResultSet, inside a single
// transaction, then serves read queries against it.

use crate::config::{column_names, is_identifier};
use crate::error::{EtlError, EtlResult};
use crate::models::EnrichedRecord;
use crate::queries::{run_query, QueryOutput};
use rusqlite::{params, Connection};
use std::path::Path;

/// Destination for the ResultSet.
///
/// `replace_table` must leave exactly the given rows in `table`, or leave
/// the previous contents untouched on failure.
pub trait TableStore {
    fn replace_table(&mut self, table: &str, records: &[EnrichedRecord]) -> EtlResult<usize>;

    fn query(&self, sql: &str) -> EtlResult<QueryOutput>;

    fn close(self) -> EtlResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> EtlResult<Self> {
        let conn = Connection::open(path)?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> EtlResult<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableStore for SqliteStore {
    fn replace_table(&mut self, table: &str, records: &[EnrichedRecord]) -> EtlResult<usize> {
        let inserted = replace_table(&mut self.conn, table, records)?;

        let count = verify_count(&self.conn, table)?;
        if count != inserted as i64 {
            return Err(EtlError::Store(format!(
                "table {} holds {} rows after loading {}",
                table, count, inserted
            )));
        }

        Ok(inserted)
    }

    fn query(&self, sql: &str) -> EtlResult<QueryOutput> {
        run_query(&self.conn, sql)
    }

    fn close(self) -> EtlResult<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}

pub fn setup_database(conn: &Connection) -> EtlResult<()> {
    // WAL keeps readers off the writer during the replace
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(())
}

fn create_table_sql(table: &str) -> String {
    let [name, base, gbp, eur, inr] = column_names();
    format!(
        "CREATE TABLE {table} (
            {name} TEXT,
            {base} REAL,
            {gbp} REAL,
            {eur} REAL,
            {inr} REAL
        )"
    )
}

/// Drop-and-recreate `table` and bulk insert `records`, all in one
/// transaction. Prior rows never survive a successful call.
pub fn replace_table(
    conn: &mut Connection,
    table: &str,
    records: &[EnrichedRecord],
) -> EtlResult<usize> {
    if !is_identifier(table) {
        return Err(EtlError::Config(format!(
            "table name {:?} is not a plain SQL identifier",
            table
        )));
    }

    let tx = conn.transaction()?;

    tx.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
    tx.execute(&create_table_sql(table), [])?;

    let mut inserted = 0;
    {
        let [name, base, gbp, eur, inr] = column_names();
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} ({name}, {base}, {gbp}, {eur}, {inr})
             VALUES (?1, ?2, ?3, ?4, ?5)"
        ))?;

        for record in records {
            let [base_value, gbp_value, eur_value, inr_value] = record.numeric_columns();
            stmt.execute(params![record.name, base_value, gbp_value, eur_value, inr_value])?;
            inserted += 1;
        }
    }

    tx.commit()?;

    tracing::info!(table, rows = inserted, "table replaced");
    Ok(inserted)
}

pub fn verify_count(conn: &Connection, table: &str) -> EtlResult<i64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;

    Ok(count)
}
