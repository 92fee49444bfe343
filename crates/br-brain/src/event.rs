//! Things a brain reports about its own tick.

use br_core::ActivityId;

/// One observable change inside a brain during a tick.
///
/// Behavior events cover the behaviors registered directly in activity
/// groups; changes inside composites are visible through
/// [`Brain::running_behaviors`](crate::Brain::running_behaviors).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrainEvent {
    ActivityEntered { activity: ActivityId },
    ActivityLeft { activity: ActivityId },
    BehaviorStarted { activity: ActivityId, behavior: &'static str },
    BehaviorStopped { activity: ActivityId, behavior: &'static str },
}

impl BrainEvent {
    pub fn activity(&self) -> ActivityId {
        match *self {
            BrainEvent::ActivityEntered { activity }
            | BrainEvent::ActivityLeft { activity }
            | BrainEvent::BehaviorStarted { activity, .. }
            | BrainEvent::BehaviorStopped { activity, .. } => activity,
        }
    }

    /// Short machine-readable name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BrainEvent::ActivityEntered { .. } => "activity_entered",
            BrainEvent::ActivityLeft { .. } => "activity_left",
            BrainEvent::BehaviorStarted { .. } => "behavior_started",
            BrainEvent::BehaviorStopped { .. } => "behavior_stopped",
        }
    }

    /// The behavior name for behavior events.
    pub fn behavior(&self) -> Option<&'static str> {
        match *self {
            BrainEvent::BehaviorStarted { behavior, .. }
            | BrainEvent::BehaviorStopped { behavior, .. } => Some(behavior),
            _ => None,
        }
    }
}
