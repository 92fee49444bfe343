//! Host-facing traits.

use std::fmt;

use br_core::{AgentId, EntityId, Pos};

// ── EntityKind ────────────────────────────────────────────────────────────────

/// Host-defined category of a world entity ("hostile", "bed", "guard post").
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityKind(pub u16);

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}", self.0)
    }
}

// ── WorldQuery ────────────────────────────────────────────────────────────────

/// Read-only view of the host world.
///
/// Sensors and behaviors only ever see `&World`.  Hosts that tick brains on
/// several threads need their world type to be `Sync`.
pub trait WorldQuery {
    fn position_of(&self, entity: EntityId) -> Option<Pos>;

    fn kind_of(&self, entity: EntityId) -> Option<EntityKind>;

    /// Every entity within `radius` of `center` (inclusive), in no
    /// particular order.
    fn entities_within(&self, center: Pos, radius: f64) -> Vec<EntityId>;

    /// Whether `to` is visible from `from`.  Worlds without occlusion see
    /// everything.
    fn line_of_sight(&self, _from: Pos, _to: Pos) -> bool {
        true
    }

    /// Nearest entity of `kind` within `radius`, skipping `exclude`.
    ///
    /// Ties on distance go to the lower entity id.
    fn nearest_of_kind(
        &self,
        center:  Pos,
        radius:  f64,
        kind:    EntityKind,
        exclude: Option<EntityId>,
    ) -> Option<EntityId> {
        self.entities_within(center, radius)
            .into_iter()
            .filter(|&e| Some(e) != exclude && self.kind_of(e) == Some(kind))
            .filter_map(|e| self.position_of(e).map(|p| (p.distance_sq(center), e)))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, e)| e)
    }
}

// ── AgentBody ─────────────────────────────────────────────────────────────────

/// The host-side agent a brain drives.
pub trait AgentBody {
    fn agent_id(&self) -> AgentId;

    /// The agent's own entity in the world, if it has one.  Sensors use it to
    /// avoid perceiving the agent itself.
    fn entity(&self) -> Option<EntityId> {
        None
    }

    fn position(&self) -> Pos;
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Binds the world and agent types for one host integration.
///
/// Every generic scheduler type (`Behavior<H>`, `Brain<H>`, sensors) takes a
/// single `H: Host` parameter instead of carrying both types around.
pub trait Host: 'static {
    type World: WorldQuery + ?Sized;
    type Agent: AgentBody;
}
