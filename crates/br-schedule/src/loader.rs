//! CSV timeline loader.
//!
//! # CSV format
//!
//! One row per forced activity.  `time` is a timeline position (ticks into
//! the cycle, or ticks since spawn); `activity` is a predefined activity name
//! (case-insensitive) or a raw integer id.
//!
//! ```csv
//! time,activity
//! 0,rest
//! 2000,work
//! 9000,meet
//! 11000,idle
//! 12000,rest
//! ```
//!
//! Rows may appear in any order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use br_core::ActivityId;

use crate::{ScheduleError, ScheduleResult, TimeBase, Timeline};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TimelineRecord {
    time:     u64,
    activity: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Timeline`] from a CSV file.
pub fn load_timeline_csv(path: &Path, base: TimeBase, baseline: ActivityId) -> ScheduleResult<Timeline> {
    let file = std::fs::File::open(path)?;
    load_timeline_reader(file, base, baseline)
}

/// Like [`load_timeline_csv`] but accepts any `Read` source.
pub fn load_timeline_reader<R: Read>(
    reader:   R,
    base:     TimeBase,
    baseline: ActivityId,
) -> ScheduleResult<Timeline> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut timeline = Timeline::new(base, baseline);

    for (line, result) in csv_reader.deserialize::<TimelineRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        if let TimeBase::Cyclical { period } = base {
            if row.time >= period {
                return Err(ScheduleError::Parse(format!(
                    "row {}: time {} is outside the cycle of {period} ticks",
                    line + 1,
                    row.time
                )));
            }
        }
        let activity = ActivityId::parse(&row.activity)
            .map_err(|e| ScheduleError::Parse(format!("row {}: {e}", line + 1)))?;
        timeline.add(row.time, activity);
    }

    Ok(timeline)
}
