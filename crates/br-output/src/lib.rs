//! `br-output` — trace writers for brain populations.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                          |
//! |-----------|---------|--------------------------------------------------------|
//! | *(none)*  | CSV     | `events.csv`, `agent_status.csv`, `tick_summaries.csv` |
//! | `sqlite`  | SQLite  | `trace.db`                                             |
//!
//! All backends implement [`TraceWriter`] and are driven by
//! [`TraceObserver`], which implements `br_brain::PopulationObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use br_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace")).unwrap();
//! let mut obs = TraceObserver::new(writer);
//! population.run(&world, &mut obs);
//! obs.take_error().map(|e| eprintln!("trace error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{AgentStatusRow, EventRow, TickSummaryRow};
pub use writer::TraceWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTraceWriter;
