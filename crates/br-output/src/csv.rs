//! CSV trace backend.
//!
//! Creates three files in the configured output directory:
//! - `events.csv`
//! - `agent_status.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{AgentStatusRow, EventRow, OutputResult, TickSummaryRow};

/// Writes a population trace to three CSV files.
pub struct CsvTraceWriter {
    events:    Writer<File>,
    statuses:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvTraceWriter {
    /// Create `dir` if needed, open the three CSV files and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["tick", "agent_id", "kind", "activity", "behavior"])?;

        let mut statuses = Writer::from_path(dir.join("agent_status.csv"))?;
        statuses.write_record(["agent_id", "tick", "x", "y", "z", "activities", "running"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "expired", "scans", "started", "stopped"])?;

        Ok(Self { events, statuses, summaries, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record([
                row.tick.to_string().as_str(),
                row.agent_id.to_string().as_str(),
                row.kind,
                row.activity.as_str(),
                row.behavior,
            ])?;
        }
        Ok(())
    }

    fn write_statuses(&mut self, rows: &[AgentStatusRow]) -> OutputResult<()> {
        for row in rows {
            self.statuses.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.activities.clone(),
                row.running.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.expired.to_string(),
            row.scans.to_string(),
            row.started.to_string(),
            row.stopped.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.statuses.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
