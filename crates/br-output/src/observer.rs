//! `TraceObserver<W>` — bridges `PopulationObserver` to a `TraceWriter`.

use br_brain::{AgentStatus, BrainEvent, PopulationObserver, TickStats};
use br_core::{AgentId, Tick};

use crate::row::{AgentStatusRow, EventRow, TickSummaryRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`PopulationObserver`] that writes events, agent status snapshots and
/// tick summaries to any [`TraceWriter`] backend.
///
/// Events are buffered for the duration of a tick and written in one batch
/// at tick end.  Errors from the writer are stored internally because
/// observer methods have no return value.  After `population.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> PopulationObserver for TraceObserver<W> {
    fn on_event(&mut self, tick: Tick, agent: AgentId, event: &BrainEvent) {
        self.pending.push(EventRow {
            tick:     tick.0,
            agent_id: agent.0,
            kind:     event.kind(),
            activity: event.activity().to_string(),
            behavior: event.behavior().unwrap_or(""),
        });
    }

    fn on_tick_end(&mut self, tick: Tick, stats: TickStats) {
        if !self.pending.is_empty() {
            let result = self.writer.write_events(&self.pending);
            self.pending.clear();
            self.store_err(result);
        }
        let row = TickSummaryRow {
            tick:    tick.0,
            expired: stats.expired as u64,
            scans:   stats.scans as u64,
            started: stats.started as u64,
            stopped: stats.stopped as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[AgentStatus]) {
        let rows: Vec<AgentStatusRow> = agents
            .iter()
            .map(|status| AgentStatusRow {
                agent_id:   status.agent.0,
                tick:       tick.0,
                x:          status.position.x,
                y:          status.position.y,
                z:          status.position.z,
                activities: status
                    .activities
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(";"),
                running:    status.running.join(";"),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_statuses(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
