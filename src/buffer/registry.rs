//! Buffer registry (spec §4.A)
//!
//! Identity and metadata for every managed buffer. Exposes
//! `register`/`unregister`/`info`/`stats` plus stable iteration.
//!
//! Grounded on `panxinmiao-myth`'s `assets/storage.rs` (`StorageInner` +
//! `FxHashMap` lookup) for the map shape, generalized from "UUID → slotmap
//! key" to "opaque handle → buffer metadata". A typed `(id, generation)`
//! handle replaces the original `void**` indirection described in spec §9.

use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;

use super::alloc::AllocPolicy;
use super::manager::LockTokenInner;
use super::stream::StreamFactory;

/// Stable identity for a managed buffer.
///
/// Modeled as an opaque id plus a generation counter rather than the
/// original C++ `void**` indirection (spec §9): the manager may swap a
/// buffer's underlying region during dump/restore without invalidating the
/// handle, and a generation bump guards against a stale handle from a
/// destroyed-and-reused slot silently referring to the wrong buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    pub(crate) id: u64,
    pub(crate) generation: u32,
}

impl std::fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Buffer#{}.{}", self.id, self.generation)
    }
}

/// On-disk format of a dumped buffer's temp file (spec §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Other,
    Raw,
    RawZ,
}

/// A dumped buffer's backing file plus its format.
#[derive(Debug, Clone)]
pub struct DumpedFile {
    pub path: std::path::PathBuf,
    pub format: FileFormat,
    pub auto_delete: bool,
}

/// Metadata tracked for every registered buffer (spec §3 "Buffer").
pub struct BufferInfo {
    pub handle: BufferHandle,
    pub size: usize,
    pub loaded: bool,
    pub policy: Arc<dyn AllocPolicy>,
    pub last_access: u64,
    pub file: Option<DumpedFile>,
    pub user_stream_factory: bool,
    pub factory: Option<Arc<dyn StreamFactory>>,
    pub(crate) region: Option<Vec<u8>>,
    pub(crate) lock_token: Weak<LockTokenInner>,
}

impl BufferInfo {
    pub(crate) fn new(handle: BufferHandle, policy: Arc<dyn AllocPolicy>) -> Self {
        Self {
            handle,
            size: 0,
            loaded: false,
            policy,
            last_access: 0,
            file: None,
            user_stream_factory: false,
            factory: None,
            region: None,
            lock_token: Weak::new(),
        }
    }

    /// Number of outstanding lock tokens (I3: `lockCount > 0 ⇒ ¬dumpable`).
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.lock_token.strong_count()
    }

    #[must_use]
    pub fn is_dumpable(&self) -> bool {
        self.loaded && self.lock_count() == 0 && self.size > 0
    }
}

/// Aggregate stats returned by `BufferManager::stats` (spec §4.A, §6.1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStatsRaw {
    pub total_managed: usize,
    pub total_dumped: usize,
}

/// In-process registry: `handle → BufferInfo`.
///
/// Insertion order is irrelevant; iteration is stable under the manager's
/// single-worker serialization guarantee (spec §5), since the registry is
/// only ever mutated from within that worker.
pub struct Registry {
    slots: FxHashMap<u64, BufferInfo>,
    next_id: u64,
    generations: FxHashMap<u64, u32>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            slots: FxHashMap::default(),
            next_id: 1,
            generations: FxHashMap::default(),
        }
    }

    pub fn allocate_handle(&mut self) -> BufferHandle {
        let id = self.next_id;
        self.next_id += 1;
        let generation = *self.generations.entry(id).or_insert(0);
        BufferHandle { id, generation }
    }

    pub fn register(&mut self, handle: BufferHandle, policy: Arc<dyn AllocPolicy>) {
        self.slots
            .insert(handle.id, BufferInfo::new(handle, policy));
    }

    /// Removes a handle. Caller must have already asserted `lock_count() == 0`
    /// (spec: `unregister` panics if locked — see [`super::manager::BufferManager::unregister`]).
    pub fn unregister(&mut self, handle: BufferHandle) -> Option<BufferInfo> {
        let removed = self.slots.remove(&handle.id);
        if removed.is_some() {
            *self.generations.entry(handle.id).or_insert(0) += 1;
        }
        removed
    }

    pub fn get(&self, handle: BufferHandle) -> Option<&BufferInfo> {
        self.slots
            .get(&handle.id)
            .filter(|info| info.handle.generation == handle.generation)
    }

    pub fn get_mut(&mut self, handle: BufferHandle) -> Option<&mut BufferInfo> {
        self.slots
            .get_mut(&handle.id)
            .filter(|info| info.handle.generation == handle.generation)
    }

    pub fn contains(&self, handle: BufferHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferInfo> {
        self.slots.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BufferInfo> {
        self.slots.values_mut()
    }

    pub fn stats(&self) -> BufferStatsRaw {
        let mut stats = BufferStatsRaw::default();
        for info in self.slots.values() {
            stats.total_managed += info.size;
            if !info.loaded {
                stats.total_dumped += info.size;
            }
        }
        stats
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
