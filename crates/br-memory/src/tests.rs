use br_core::{EntityId, Tick};

use crate::*;

const TARGET: MemoryKey<EntityId> = MemoryKey::new("target");
const ALARMED: MemoryKey<bool> = MemoryKey::new("alarmed");
const VISIBLE: MemoryKey<Vec<EntityId>> = MemoryKey::new("visible");
const NOTE: MemoryKey<String> = MemoryKey::new("note");

// ── Basic access ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod access {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(4));
        assert_eq!(m.get(TARGET), Some(&EntityId(4)));
        assert!(m.has(TARGET));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn set_registers_and_clear_keeps_registration() {
        let mut m = MemoryStore::new();
        assert!(!m.is_registered(TARGET));
        m.set(TARGET, EntityId(1));
        m.clear(TARGET);
        assert!(m.is_registered(TARGET));
        assert!(!m.has(TARGET));
        assert_eq!(m.get(TARGET), None);
    }

    #[test]
    fn take_moves_value_out() {
        let mut m = MemoryStore::new();
        m.set(NOTE, "hello".to_owned());
        assert_eq!(m.take(NOTE).as_deref(), Some("hello"));
        assert!(!m.has(NOTE));
        assert_eq!(m.take(NOTE), None);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut m = MemoryStore::new();
        m.set(VISIBLE, vec![EntityId(1)]);
        m.get_mut(VISIBLE).unwrap().push(EntityId(2));
        assert_eq!(m.get(VISIBLE).map(Vec::len), Some(2));
    }

    #[test]
    fn set_opt_none_clears() {
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(1));
        m.set_opt(TARGET, None);
        assert!(!m.has(TARGET));
        m.set_opt(TARGET, Some(EntityId(2)));
        assert_eq!(m.get(TARGET), Some(&EntityId(2)));
    }

    #[test]
    fn empty_collection_clears_slot() {
        let mut m = MemoryStore::new();
        m.set(VISIBLE, vec![EntityId(3)]);
        m.set(VISIBLE, Vec::new());
        assert!(!m.has(VISIBLE));
        assert!(m.check(VISIBLE, MemoryStatus::Absent));
        assert!(m.is_registered(VISIBLE));
    }

    #[test]
    fn empty_string_is_a_value() {
        let mut m = MemoryStore::new();
        m.set(NOTE, String::new());
        assert!(m.has(NOTE));
    }

    #[test]
    #[should_panic(expected = "memory type mismatch")]
    fn wrong_type_panics() {
        const SAME_NAME: MemoryKey<u32> = MemoryKey::new("target");
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(1));
        let _ = m.get(SAME_NAME);
    }

    #[test]
    fn debug_lists_values_by_name() {
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(1));
        m.set_expiring(ALARMED, true, 5);
        let text = format!("{m:?}");
        assert!(text.find("alarmed").unwrap() < text.find("target").unwrap());
        assert!(text.contains("ttl 5"));
    }
}

// ── Conditions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod conditions {
    use super::*;

    #[test]
    fn unregistered_only_satisfies_absent() {
        let m = MemoryStore::new();
        assert!(m.check(TARGET, MemoryStatus::Absent));
        assert!(!m.check(TARGET, MemoryStatus::Present));
        assert!(!m.check(TARGET, MemoryStatus::Registered));
    }

    #[test]
    fn registered_empty_slot() {
        let mut m = MemoryStore::new();
        m.register(TARGET);
        assert!(m.check(TARGET, MemoryStatus::Absent));
        assert!(m.check(TARGET, MemoryStatus::Registered));
        assert!(!m.check(TARGET, MemoryStatus::Present));
    }

    #[test]
    fn present_value_is_also_registered() {
        let mut m = MemoryStore::new();
        m.set(ALARMED, false);
        assert!(m.check(ALARMED, MemoryStatus::Present));
        assert!(m.check(ALARMED, MemoryStatus::Registered));
        assert!(!m.check(ALARMED, MemoryStatus::Absent));
    }

    #[test]
    fn satisfies_requires_all() {
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(2));
        let reqs = [MemoryRequirement::present(TARGET), MemoryRequirement::absent(ALARMED)];
        assert!(m.satisfies(&reqs));
        m.set(ALARMED, true);
        assert!(!m.satisfies(&reqs));
        assert!(m.satisfies(&[]));
    }
}

// ── Expiry ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod expiry {
    use super::*;

    /// Run one expiry pass per tick from `from` through `to` inclusive.
    fn run(m: &mut MemoryStore, from: u64, to: u64) {
        for t in from..=to {
            m.expire_tick(Tick(t));
        }
    }

    #[test]
    fn ttl_window_is_half_open() {
        let mut m = MemoryStore::new();
        m.expire_tick(Tick(100));
        m.set_expiring(TARGET, EntityId(9), 5);
        run(&mut m, 101, 104);
        assert_eq!(m.get(TARGET), Some(&EntityId(9)));
        assert_eq!(m.ttl_remaining(TARGET), Some(1));
        m.expire_tick(Tick(105));
        assert_eq!(m.get(TARGET), None);
        assert!(m.is_registered(TARGET));
    }

    #[test]
    fn zero_ttl_is_never_readable() {
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(4));
        m.set_expiring(TARGET, EntityId(9), 0);
        assert_eq!(m.get(TARGET), None);
        assert!(!m.has(TARGET));
        assert!(m.is_registered(TARGET));
        assert_eq!(m.expirable_len(), 0);
    }

    #[test]
    fn expired_entries_leave_the_side_list() {
        let mut m = MemoryStore::new();
        m.set_expiring(TARGET, EntityId(1), 2);
        m.set_expiring(ALARMED, true, 10);
        assert_eq!(m.expirable_len(), 2);

        assert_eq!(m.expire_tick(Tick(0)), ExpiryPass { visited: 2, expired: 0 });
        assert_eq!(m.expire_tick(Tick(1)), ExpiryPass { visited: 2, expired: 1 });
        assert_eq!(m.expirable_len(), 1);
        assert_eq!(m.expire_tick(Tick(2)), ExpiryPass { visited: 1, expired: 0 });
    }

    #[test]
    fn permanent_overwrite_drops_from_list_and_keeps_value() {
        let mut m = MemoryStore::new();
        m.set_expiring(ALARMED, true, 3);
        m.set(ALARMED, true);
        let pass = m.expire_tick(Tick(0));
        assert_eq!(pass, ExpiryPass { visited: 1, expired: 0 });
        assert_eq!(m.expirable_len(), 0);
        run(&mut m, 1, 10);
        assert_eq!(m.get(ALARMED), Some(&true));
    }

    #[test]
    fn cleared_value_drops_from_list() {
        let mut m = MemoryStore::new();
        m.set_expiring(TARGET, EntityId(1), 3);
        m.clear(TARGET);
        m.expire_tick(Tick(0));
        assert_eq!(m.expirable_len(), 0);
    }

    #[test]
    fn rewrite_resets_ttl_without_duplicating_entry() {
        let mut m = MemoryStore::new();
        m.set_expiring(TARGET, EntityId(1), 3);
        run(&mut m, 0, 1);
        m.set_expiring(TARGET, EntityId(2), 3);
        assert_eq!(m.expirable_len(), 1);
        run(&mut m, 2, 4);
        assert_eq!(m.get(TARGET), None);
    }

    #[test]
    fn sparse_passes_count_elapsed_ticks() {
        let mut m = MemoryStore::new();
        m.expire_tick(Tick(0));
        m.set_expiring(TARGET, EntityId(1), 10);
        m.expire_tick(Tick(5));
        assert_eq!(m.ttl_remaining(TARGET), Some(5));
        m.expire_tick(Tick(10));
        assert!(!m.has(TARGET));
    }

    #[test]
    fn repeated_pass_same_tick_is_noop() {
        let mut m = MemoryStore::new();
        m.expire_tick(Tick(3));
        m.set_expiring(TARGET, EntityId(1), 1);
        m.expire_tick(Tick(4));
        assert!(!m.has(TARGET));

        m.set_expiring(TARGET, EntityId(1), 2);
        m.expire_tick(Tick(5));
        m.expire_tick(Tick(5));
        assert_eq!(m.ttl_remaining(TARGET), Some(1));
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod persist {
    use super::*;

    #[test]
    fn snapshot_skips_transient_keys_and_sorts() {
        let codecs = MemoryCodecs::new().with(TARGET).with(ALARMED);
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(8));
        m.set_expiring(ALARMED, true, 4);
        m.set(NOTE, "scratch".to_owned());

        let snap = m.snapshot(&codecs).unwrap();
        let keys: Vec<_> = snap.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["alarmed", "target"]);
        assert_eq!(snap.entries[0].ttl_remaining, Some(4));
        assert_eq!(snap.entries[1].ttl_remaining, None);
    }

    #[test]
    fn restore_round_trips_through_json_text() {
        let codecs = MemoryCodecs::new().with(TARGET).with(VISIBLE);
        let mut m = MemoryStore::new();
        m.set(TARGET, EntityId(8));
        m.set_expiring(VISIBLE, vec![EntityId(1), EntityId(2)], 6);

        let text = serde_json::to_string(&m.snapshot(&codecs).unwrap()).unwrap();
        let snap: MemorySnapshot = serde_json::from_str(&text).unwrap();

        let mut back = MemoryStore::new();
        back.restore(&snap, &codecs).unwrap();
        assert_eq!(back.get(TARGET), Some(&EntityId(8)));
        assert_eq!(back.get(VISIBLE), Some(&vec![EntityId(1), EntityId(2)]));
        assert_eq!(back.ttl_remaining(VISIBLE), Some(6));
        assert_eq!(back.expirable_len(), 1);
    }

    #[test]
    fn restore_unknown_key_fails() {
        let snap = MemorySnapshot {
            entries: vec![SavedMemory {
                key:           "mystery".into(),
                value:         serde_json::json!(1),
                ttl_remaining: None,
            }],
        };
        let err = MemoryStore::new().restore(&snap, &MemoryCodecs::new()).unwrap_err();
        assert!(matches!(err, MemoryError::UnknownKey(ref k) if k == "mystery"));
    }

    #[test]
    fn restore_bad_value_reports_codec_error() {
        let codecs = MemoryCodecs::new().with(ALARMED);
        let snap = MemorySnapshot {
            entries: vec![SavedMemory {
                key:           "alarmed".into(),
                value:         serde_json::json!("not a bool"),
                ttl_remaining: None,
            }],
        };
        let err = MemoryStore::new().restore(&snap, &codecs).unwrap_err();
        assert!(matches!(err, MemoryError::Codec { ref key, .. } if key == "alarmed"));
    }
}
