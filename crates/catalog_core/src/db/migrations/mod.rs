//! Catalog schema steps and the runner that applies them.
//!
//! # Invariants
//! - Steps are ordered by `version`, starting at 1 without gaps.
//! - All pending steps share one transaction; a failing step leaves the
//!   file at its previous version.

use crate::db::{DbError, DbResult, CATALOG_TABLES};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "books_authors",
        sql: include_str!("0001_books_authors.sql"),
    },
    SchemaStep {
        version: 2,
        name: "tags",
        sql: include_str!("0002_tags.sql"),
    },
];

/// Schema version produced by the last known step.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Runs every step newer than the file's version, then checks the tables.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = current_user_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    if found < supported {
        let tx = conn.transaction()?;
        for step in SCHEMA_STEPS.iter().skip_while(|step| step.version <= found) {
            tx.execute_batch(step.sql)
                .and_then(|()| tx.pragma_update(None, "user_version", step.version))
                .map_err(|source| DbError::Migration {
                    version: step.version,
                    name: step.name,
                    source,
                })?;
            debug!(
                "event=db_migrate_step module=db status=ok version={} name={}",
                step.version, step.name
            );
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from_version={found} to_version={supported}");
    }

    verify_catalog_tables(conn)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Fails with the first entry of `CATALOG_TABLES` that does not exist.
pub fn verify_catalog_tables(conn: &Connection) -> DbResult<()> {
    let mut stmt =
        conn.prepare("SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);")?;
    for &table in CATALOG_TABLES {
        let present: bool = stmt.query_row([table], |row| row.get(0))?;
        if !present {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}
