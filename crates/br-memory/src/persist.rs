//! Saving and restoring memories.
//!
//! Values are type-erased inside the store, so persistence needs a per-key
//! codec.  [`MemoryCodecs`] maps slot names to JSON encode/decode functions;
//! keys without a codec are transient and are skipped when taking a snapshot.
//!
//! ```rust
//! use br_memory::{MemoryCodecs, MemoryKey, MemoryStore};
//! use br_core::Tick;
//!
//! const HOME: MemoryKey<u32> = MemoryKey::new("home");
//!
//! let codecs = MemoryCodecs::new().with(HOME);
//! let mut store = MemoryStore::new();
//! store.set_expiring(HOME, 7, 100);
//! store.expire_tick(Tick(0));
//!
//! let snapshot = store.snapshot(&codecs).unwrap();
//! let mut restored = MemoryStore::new();
//! restored.restore(&snapshot, &codecs).unwrap();
//! assert_eq!(restored.get(HOME), Some(&7));
//! assert_eq!(restored.ttl_remaining(HOME), Some(99));
//! ```

use std::any::Any;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::key::ErasedValue;
use crate::{MemoryError, MemoryId, MemoryKey, MemoryResult, MemoryStore, MemoryValue};

type EncodeFn = fn(&dyn Any) -> serde_json::Result<serde_json::Value>;
type DecodeFn = fn(serde_json::Value) -> serde_json::Result<Box<dyn ErasedValue>>;

#[derive(Clone, Copy)]
struct Codec {
    id:     MemoryId,
    encode: EncodeFn,
    decode: DecodeFn,
}

fn encode<T: MemoryValue + Serialize>(value: &dyn Any) -> serde_json::Result<serde_json::Value> {
    let value = value.downcast_ref::<T>().ok_or_else(|| {
        <serde_json::Error as serde::ser::Error>::custom(format!(
            "stored value is not a {}",
            std::any::type_name::<T>()
        ))
    })?;
    serde_json::to_value(value)
}

fn decode<T: MemoryValue + DeserializeOwned>(
    value: serde_json::Value,
) -> serde_json::Result<Box<dyn ErasedValue>> {
    let value: T = serde_json::from_value(value)?;
    Ok(Box::new(value))
}

// ── MemoryCodecs ──────────────────────────────────────────────────────────────

/// Table of persistable memory keys.
#[derive(Clone, Default)]
pub struct MemoryCodecs {
    by_name: BTreeMap<&'static str, Codec>,
}

impl MemoryCodecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T>(mut self, key: MemoryKey<T>) -> Self
    where
        T: MemoryValue + Serialize + DeserializeOwned,
    {
        self.register(key);
        self
    }

    /// Make `key` persistable.  Re-registering a name replaces its codec.
    pub fn register<T>(&mut self, key: MemoryKey<T>)
    where
        T: MemoryValue + Serialize + DeserializeOwned,
    {
        self.by_name.insert(
            key.name(),
            Codec { id: key.id(), encode: encode::<T>, decode: decode::<T> },
        );
    }

    pub fn contains(&self, id: impl Into<MemoryId>) -> bool {
        self.by_name.contains_key(id.into().name())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl std::fmt::Debug for MemoryCodecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.by_name.keys()).finish()
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// One persisted memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedMemory {
    pub key:           String,
    pub value:         serde_json::Value,
    /// Remaining ticks at save time; `None` for values that never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_remaining: Option<u64>,
}

/// The persistable part of a memory store, sorted by key name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub entries: Vec<SavedMemory>,
}

impl MemorySnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MemoryStore {
    /// Capture every value whose key has a codec.
    pub fn snapshot(&self, codecs: &MemoryCodecs) -> MemoryResult<MemorySnapshot> {
        let mut entries = Vec::new();
        for (id, value, ttl) in self.iter_values() {
            let Some(codec) = codecs.by_name.get(id.name()) else {
                continue;
            };
            let json = (codec.encode)(value.as_any()).map_err(|source| MemoryError::Codec {
                key: id.name().to_owned(),
                source,
            })?;
            entries.push(SavedMemory { key: id.name().to_owned(), value: json, ttl_remaining: ttl });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(MemorySnapshot { entries })
    }

    /// Write every entry of `snapshot` into this store, overwriting existing
    /// values under the same keys.
    ///
    /// Fails on the first entry whose key has no codec or whose value does not
    /// decode; entries before it have already been applied.
    pub fn restore(&mut self, snapshot: &MemorySnapshot, codecs: &MemoryCodecs) -> MemoryResult<()> {
        for saved in &snapshot.entries {
            let codec = codecs
                .by_name
                .get(saved.key.as_str())
                .ok_or_else(|| MemoryError::UnknownKey(saved.key.clone()))?;
            let value = (codec.decode)(saved.value.clone()).map_err(|source| MemoryError::Codec {
                key: saved.key.clone(),
                source,
            })?;
            self.insert_erased(codec.id, value, saved.ttl_remaining);
        }
        tracing::debug!(restored = snapshot.len(), "memory snapshot restored");
        Ok(())
    }
}
