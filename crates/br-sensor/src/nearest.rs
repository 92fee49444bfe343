//! `NearestEntitySensor` — the nearest entity of one kind within range.

use br_core::{EntityId, Pos};
use br_memory::{MemoryId, MemoryKey};
use br_world::{AgentBody, EntityKind, Host, WorldQuery};

use crate::{SenseCtx, Sensor};

/// Cached result of the last full search.
#[derive(Copy, Clone, Debug)]
struct Memo {
    found:     Option<EntityId>,
    uses_left: u32,
}

/// Writes the nearest entity of `kind` within `radius` of the agent.
///
/// On every scan:
///
/// - `nearest` receives the closest matching entity, or is cleared;
/// - `present` (optional) is set to `true` on a hit and cleared on a miss;
/// - `visible` (optional) receives every matching entity in range, nearest
///   first, or is cleared.
///
/// With [`expire_after`](Self::expire_after) the written values carry a TTL
/// and misses leave them to expire instead of clearing them, which gives the
/// agent a short memory of things that just went out of sight.
///
/// With [`memoize`](Self::memoize) a search result is reused for up to that
/// many further scans.  A remembered hit is dropped early once the entity
/// leaves range or the world; a remembered miss is trusted until its uses run
/// out.  Use it for expensive worlds or to keep targets stable between
/// equidistant candidates.
pub struct NearestEntitySensor {
    kind:          EntityKind,
    radius:        f64,
    nearest:       MemoryKey<EntityId>,
    present:       Option<MemoryKey<bool>>,
    visible:       Option<MemoryKey<Vec<EntityId>>>,
    ttl:           Option<u64>,
    line_of_sight: bool,
    memo_uses:     u32,
    memo:          Option<Memo>,
}

impl NearestEntitySensor {
    pub fn new(kind: EntityKind, radius: f64, nearest: MemoryKey<EntityId>) -> Self {
        Self {
            kind,
            radius,
            nearest,
            present: None,
            visible: None,
            ttl: None,
            line_of_sight: false,
            memo_uses: 0,
            memo: None,
        }
    }

    pub fn flag_present(mut self, key: MemoryKey<bool>) -> Self {
        self.present = Some(key);
        self
    }

    pub fn list_visible(mut self, key: MemoryKey<Vec<EntityId>>) -> Self {
        self.visible = Some(key);
        self
    }

    pub fn expire_after(mut self, ticks: u64) -> Self {
        self.ttl = Some(ticks);
        self
    }

    /// Ignore entities the world reports as occluded.
    pub fn require_line_of_sight(mut self) -> Self {
        self.line_of_sight = true;
        self
    }

    pub fn memoize(mut self, scans: u32) -> Self {
        self.memo_uses = scans;
        self
    }

    fn accepts<W: WorldQuery + ?Sized>(&self, world: &W, from: Pos, entity: EntityId) -> bool {
        let Some(pos) = world.position_of(entity) else {
            return false;
        };
        world.kind_of(entity) == Some(self.kind)
            && from.within(pos, self.radius)
            && (!self.line_of_sight || world.line_of_sight(from, pos))
    }

    /// Matching entities in range, nearest first (ties by id).
    fn candidates<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        from:  Pos,
        me:    Option<EntityId>,
    ) -> Vec<EntityId> {
        let mut hits: Vec<(f64, EntityId)> = world
            .entities_within(from, self.radius)
            .into_iter()
            .filter(|&e| Some(e) != me && self.accepts(world, from, e))
            .filter_map(|e| world.position_of(e).map(|p| (p.distance_sq(from), e)))
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, e)| e).collect()
    }

    /// Consult the memo; `Some(result)` if it may be reused this scan.
    fn recall<W: WorldQuery + ?Sized>(&mut self, world: &W, from: Pos) -> Option<Option<EntityId>> {
        let memo = self.memo.as_mut()?;
        if memo.uses_left == 0 {
            self.memo = None;
            return None;
        }
        memo.uses_left -= 1;
        let found = memo.found;
        match found {
            Some(e) if !self.accepts(world, from, e) => {
                self.memo = None;
                None
            }
            _ => Some(found),
        }
    }
}

impl<H: Host> Sensor<H> for NearestEntitySensor {
    fn name(&self) -> &str {
        self.nearest.name()
    }

    fn memories_used(&self) -> Vec<MemoryId> {
        let mut ids = vec![self.nearest.id()];
        ids.extend(self.present.map(MemoryKey::id));
        ids.extend(self.visible.map(MemoryKey::id));
        ids
    }

    fn sense(&mut self, ctx: &mut SenseCtx<'_, H>) {
        let from = ctx.agent.position();
        let me = ctx.agent.entity();

        // The visible list always needs a full search; the memo only saves
        // work for the nearest-only configuration.
        let recalled = match self.visible {
            None => self.recall(ctx.world, from),
            Some(_) => None,
        };
        let (nearest, visible) = match recalled {
            Some(found) => (found, Vec::new()),
            None => {
                let visible = self.candidates(ctx.world, from, me);
                let nearest = visible.first().copied();
                if self.memo_uses > 0 {
                    self.memo = Some(Memo { found: nearest, uses_left: self.memo_uses });
                }
                (nearest, visible)
            }
        };

        let memory = &mut *ctx.memory;
        match nearest {
            Some(entity) => {
                memory.set_with(self.nearest, entity, self.ttl);
                if let Some(key) = self.present {
                    memory.set_with(key, true, self.ttl);
                }
            }
            None if self.ttl.is_none() => {
                memory.clear(self.nearest);
                if let Some(key) = self.present {
                    memory.clear(key);
                }
            }
            None => {}
        }
        if let Some(key) = self.visible {
            if !visible.is_empty() || self.ttl.is_none() {
                memory.set_with(key, visible, self.ttl);
            }
        }
    }
}

impl std::fmt::Debug for NearestEntitySensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearestEntitySensor")
            .field("kind", &self.kind)
            .field("radius", &self.radius)
            .field("nearest", &self.nearest.name())
            .finish_non_exhaustive()
    }
}
