//! Plain data row types written by trace backends.

/// One brain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    pub agent_id: u32,
    /// `activity_entered`, `activity_left`, `behavior_started` or
    /// `behavior_stopped`.
    pub kind:     &'static str,
    pub activity: String,
    /// Empty for activity events.
    pub behavior: &'static str,
}

/// What one agent was doing at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStatusRow {
    pub agent_id:   u32,
    pub tick:       u64,
    pub x:          f64,
    pub y:          f64,
    pub z:          f64,
    /// `;`-separated active activity names.
    pub activities: String,
    /// `;`-separated running behavior paths.
    pub running:    String,
}

/// Population-wide counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:    u64,
    pub expired: u64,
    pub scans:   u64,
    pub started: u64,
    pub stopped: u64,
}
