//! `PointWorld` — positioned, kinded entities in an R-tree.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over `[x, y, z]` answers radius and nearest
//! queries.  Entity records live in a dense `Vec` indexed by `EntityId`;
//! removed entities leave a `None` hole so ids are never reused.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use br_core::{AgentId, EntityId, Pos};

use crate::{AgentBody, EntityKind, Host, WorldError, WorldQuery, WorldResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug)]
struct EntityEntry {
    point: [f64; 3],
    id:    EntityId,
}

impl RTreeObject for EntityEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EntityEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        Pos::from(self.point).distance_sq(Pos::from(*point))
    }
}

#[derive(Copy, Clone, Debug)]
struct EntityRecord {
    pos:  Pos,
    kind: EntityKind,
}

// ── PointWorld ────────────────────────────────────────────────────────────────

/// Minimal spatial world: every entity is a point with a kind.
///
/// # Example
///
/// ```
/// use br_core::Pos;
/// use br_world::{EntityKind, PointWorld, WorldQuery};
///
/// const HOSTILE: EntityKind = EntityKind(1);
///
/// let mut world = PointWorld::new();
/// let wolf = world.spawn(Pos::new(3.0, 4.0, 0.0), HOSTILE);
/// assert_eq!(world.nearest_of_kind(Pos::ORIGIN, 5.0, HOSTILE, None), Some(wolf));
/// assert_eq!(world.nearest_of_kind(Pos::ORIGIN, 4.9, HOSTILE, None), None);
/// ```
#[derive(Default)]
pub struct PointWorld {
    records: Vec<Option<EntityRecord>>,
    index:   RTree<EntityEntry>,
}

impl PointWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity and return its new id.
    pub fn spawn(&mut self, pos: Pos, kind: EntityKind) -> EntityId {
        let id = EntityId(self.records.len() as u32);
        self.records.push(Some(EntityRecord { pos, kind }));
        self.index.insert(EntityEntry { point: pos.to_array(), id });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> WorldResult<()> {
        let record = self
            .records
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(WorldError::EntityNotFound(id))?;
        self.index.remove(&EntityEntry { point: record.pos.to_array(), id });
        Ok(())
    }

    pub fn move_to(&mut self, id: EntityId, pos: Pos) -> WorldResult<()> {
        let record = self
            .records
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(WorldError::EntityNotFound(id))?;
        if record.pos == pos {
            return Ok(());
        }
        self.index.remove(&EntityEntry { point: record.pos.to_array(), id });
        record.pos = pos;
        self.index.insert(EntityEntry { point: pos.to_array(), id });
        Ok(())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.records.get(id.index()).is_some_and(Option::is_some)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entities of `kind`, in id order.
    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = EntityId> + '_ {
        self.records.iter().enumerate().filter_map(move |(i, r)| match r {
            Some(r) if r.kind == kind => Some(EntityId(i as u32)),
            _ => None,
        })
    }

    fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(id.index())?.as_ref()
    }
}

impl WorldQuery for PointWorld {
    fn position_of(&self, entity: EntityId) -> Option<Pos> {
        self.record(entity).map(|r| r.pos)
    }

    fn kind_of(&self, entity: EntityId) -> Option<EntityKind> {
        self.record(entity).map(|r| r.kind)
    }

    fn entities_within(&self, center: Pos, radius: f64) -> Vec<EntityId> {
        self.index
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|e| e.id)
            .collect()
    }

    fn nearest_of_kind(
        &self,
        center:  Pos,
        radius:  f64,
        kind:    EntityKind,
        exclude: Option<EntityId>,
    ) -> Option<EntityId> {
        // Nearest-neighbour iteration is distance-ordered, so the first
        // matching hit wins and everything past `radius` can be skipped.
        let radius_sq = radius * radius;
        let center = center.to_array();
        self.index
            .nearest_neighbor_iter_with_distance_2(&center)
            .take_while(|(_, d2)| *d2 <= radius_sq)
            .map(|(e, _)| e.id)
            .find(|&id| Some(id) != exclude && self.kind_of(id) == Some(kind))
    }
}

impl std::fmt::Debug for PointWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointWorld").field("entities", &self.len()).finish()
    }
}

// ── Body / PointHost ──────────────────────────────────────────────────────────

/// Plain agent body: an id, an optional world entity and a position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub id:     AgentId,
    pub entity: Option<EntityId>,
    pub pos:    Pos,
}

impl Body {
    pub fn new(id: AgentId, pos: Pos) -> Self {
        Self { id, entity: None, pos }
    }

    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Step up to `max_step` towards `target`; returns `true` on arrival.
    pub fn step_towards(&mut self, target: Pos, max_step: f64) -> bool {
        let dist = self.pos.distance(target);
        if dist <= max_step {
            self.pos = target;
            return true;
        }
        let t = max_step / dist;
        self.pos = Pos::new(
            self.pos.x + (target.x - self.pos.x) * t,
            self.pos.y + (target.y - self.pos.y) * t,
            self.pos.z + (target.z - self.pos.z) * t,
        );
        false
    }
}

impl AgentBody for Body {
    fn agent_id(&self) -> AgentId {
        self.id
    }

    fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    fn position(&self) -> Pos {
        self.pos
    }
}

/// [`Host`] for [`PointWorld`] + [`Body`].
#[derive(Copy, Clone, Debug, Default)]
pub struct PointHost;

impl Host for PointHost {
    type World = PointWorld;
    type Agent = Body;
}
