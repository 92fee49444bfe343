//! Unit tests for br-world.

#[cfg(test)]
mod helpers {
    use br_core::{EntityId, Pos};

    use crate::{EntityKind, PointWorld};

    pub const HOSTILE: EntityKind = EntityKind(1);
    pub const TREE: EntityKind = EntityKind(2);

    /// Hostiles at x = 2, 5, 9 on a line; a tree at x = 1.
    pub fn line_world() -> (PointWorld, [EntityId; 4]) {
        let mut w = PointWorld::new();
        let h2 = w.spawn(Pos::new(2.0, 0.0, 0.0), HOSTILE);
        let h5 = w.spawn(Pos::new(5.0, 0.0, 0.0), HOSTILE);
        let h9 = w.spawn(Pos::new(9.0, 0.0, 0.0), HOSTILE);
        let t1 = w.spawn(Pos::new(1.0, 0.0, 0.0), TREE);
        (w, [h2, h5, h9, t1])
    }
}

// ── PointWorld ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod point_world {
    use br_core::{EntityId, Pos};

    use super::helpers::*;
    use crate::{WorldError, WorldQuery};

    #[test]
    fn spawn_assigns_sequential_ids() {
        let (w, ids) = line_world();
        assert_eq!(ids.map(|e| e.0), [0, 1, 2, 3]);
        assert_eq!(w.len(), 4);
        assert_eq!(w.kind_of(ids[3]), Some(TREE));
    }

    #[test]
    fn within_is_inclusive() {
        let (w, [h2, h5, _, t1]) = line_world();
        let mut hits = w.entities_within(Pos::ORIGIN, 5.0);
        hits.sort();
        assert_eq!(hits, vec![h2, h5, t1]);
    }

    #[test]
    fn nearest_of_kind_skips_other_kinds_and_excluded() {
        let (w, [h2, h5, _, _]) = line_world();
        assert_eq!(w.nearest_of_kind(Pos::ORIGIN, 10.0, HOSTILE, None), Some(h2));
        assert_eq!(w.nearest_of_kind(Pos::ORIGIN, 10.0, HOSTILE, Some(h2)), Some(h5));
        assert_eq!(w.nearest_of_kind(Pos::ORIGIN, 1.5, HOSTILE, None), None);
    }

    #[test]
    fn despawn_removes_from_queries() {
        let (mut w, [h2, h5, _, _]) = line_world();
        w.despawn(h2).unwrap();
        assert!(!w.contains(h2));
        assert_eq!(w.position_of(h2), None);
        assert_eq!(w.nearest_of_kind(Pos::ORIGIN, 10.0, HOSTILE, None), Some(h5));
        assert!(matches!(w.despawn(h2), Err(WorldError::EntityNotFound(_))));
    }

    #[test]
    fn move_to_updates_index() {
        let (mut w, [h2, h5, h9, _]) = line_world();
        w.move_to(h9, Pos::new(0.5, 0.0, 0.0)).unwrap();
        assert_eq!(w.nearest_of_kind(Pos::ORIGIN, 10.0, HOSTILE, None), Some(h9));
        assert!(!w.entities_within(Pos::new(9.0, 0.0, 0.0), 0.1).contains(&h9));
        assert_eq!(w.entities_of_kind(HOSTILE).collect::<Vec<_>>(), vec![h2, h5, h9]);
        assert!(w.move_to(EntityId(42), Pos::ORIGIN).is_err());
    }

    #[test]
    fn default_nearest_matches_rtree_nearest() {
        // Route through the trait's provided method via a thin wrapper.
        struct Plain<'a>(&'a crate::PointWorld);
        impl WorldQuery for Plain<'_> {
            fn position_of(&self, e: EntityId) -> Option<Pos> {
                self.0.position_of(e)
            }
            fn kind_of(&self, e: EntityId) -> Option<crate::EntityKind> {
                self.0.kind_of(e)
            }
            fn entities_within(&self, c: Pos, r: f64) -> Vec<EntityId> {
                self.0.entities_within(c, r)
            }
        }
        let (w, _) = line_world();
        let plain = Plain(&w);
        for x in [0.0, 3.4, 3.6, 7.5, 20.0] {
            let c = Pos::new(x, 0.0, 0.0);
            assert_eq!(
                plain.nearest_of_kind(c, 6.0, HOSTILE, None),
                w.nearest_of_kind(c, 6.0, HOSTILE, None),
                "x = {x}"
            );
        }
        assert!(plain.line_of_sight(Pos::ORIGIN, Pos::new(1.0, 1.0, 1.0)));
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod body {
    use br_core::{AgentId, EntityId, Pos};

    use crate::{AgentBody, Body};

    #[test]
    fn step_towards_clamps_and_arrives() {
        let mut b = Body::new(AgentId(0), Pos::ORIGIN);
        let target = Pos::new(10.0, 0.0, 0.0);
        assert!(!b.step_towards(target, 4.0));
        assert_eq!(b.pos, Pos::new(4.0, 0.0, 0.0));
        assert!(!b.step_towards(target, 4.0));
        assert!(b.step_towards(target, 4.0));
        assert_eq!(b.position(), target);
    }

    #[test]
    fn body_reports_entity() {
        let b = Body::new(AgentId(3), Pos::ORIGIN).with_entity(EntityId(7));
        assert_eq!(b.agent_id(), AgentId(3));
        assert_eq!(b.entity(), Some(EntityId(7)));
    }
}
