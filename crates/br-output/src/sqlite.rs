//! SQLite trace backend (feature `sqlite`).
//!
//! Creates a single `trace.db` file in the configured output directory with
//! three tables: `events`, `agent_status` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::TraceWriter;
use crate::{AgentStatusRow, EventRow, OutputResult, TickSummaryRow};

/// Writes a population trace to an SQLite database.
pub struct SqliteTraceWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteTraceWriter {
    /// Open (or create) `trace.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("trace.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 tick     INTEGER NOT NULL,
                 agent_id INTEGER NOT NULL,
                 kind     TEXT    NOT NULL,
                 activity TEXT    NOT NULL,
                 behavior TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_status (
                 agent_id   INTEGER NOT NULL,
                 tick       INTEGER NOT NULL,
                 x          REAL    NOT NULL,
                 y          REAL    NOT NULL,
                 z          REAL    NOT NULL,
                 activities TEXT    NOT NULL,
                 running    TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick    INTEGER PRIMARY KEY,
                 expired INTEGER NOT NULL,
                 scans   INTEGER NOT NULL,
                 started INTEGER NOT NULL,
                 stopped INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl TraceWriter for SqliteTraceWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (tick, agent_id, kind, activity, behavior) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.agent_id, row.kind, row.activity, row.behavior])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_statuses(&mut self, rows: &[AgentStatusRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_status (agent_id, tick, x, y, z, activities, running) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick,
                    row.x,
                    row.y,
                    row.z,
                    row.activities,
                    row.running,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, expired, scans, started, stopped) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.tick, row.expired, row.scans, row.started, row.stopped],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
