//! Dump policy (spec §4.C)
//!
//! Observes every lifecycle event after the manager has already updated the
//! registry. `refresh` is called when the policy itself is swapped in. A
//! policy may call back into the manager to request `dump(handle)`; it must
//! never call `restore` (restore is only triggered by `lock` on a dumped
//! buffer). Decisions are advisory — the manager may refuse per I3.
//!
//! Grounded on `panxinmiao-myth`'s `renderer/graph/transient_pool.rs`
//! `trim(max_idle_frames)` (the idle-bookkeeping + "evict everything past a
//! threshold" shape mirrored here by [`DumpValve`]/[`Barrier`]).

use super::registry::BufferHandle;

/// Narrow callback surface a dump policy uses to query/evict buffers.
///
/// Kept separate from `BufferManager` itself so policies can't accidentally
/// call `restore` or anything else outside their contract (spec §4.C).
pub trait DumpController {
    fn request_dump(&mut self, handle: BufferHandle);
    fn total_loaded_bytes(&self) -> usize;
    fn last_access(&self, handle: BufferHandle) -> Option<u64>;
    fn is_dumpable(&self, handle: BufferHandle) -> bool;
    /// All currently-dumpable handles, oldest `last_access` first.
    fn dumpable_by_lru(&self) -> Vec<BufferHandle>;
}

/// Capability set observed by the manager's serialization context (spec §5:
/// policies are always called from within the worker, so they may freely
/// mutate shared bookkeeping without additional locking).
pub trait DumpPolicy: Send + Sync {
    fn on_register(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_unregister(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_allocate(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_set(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_reallocate(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_destroy(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_lock(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_unlock(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_dump_success(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    fn on_restore_success(&self, _ctrl: &mut dyn DumpController, _handle: BufferHandle) {}
    /// Called once, synchronously, when this policy is installed.
    fn refresh(&self, _ctrl: &mut dyn DumpController) {}
    fn name(&self) -> &'static str;
}

/// Never evicts anything. The default policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverDump;

impl DumpPolicy for NeverDump {
    fn name(&self) -> &'static str {
        "never-dump"
    }
}

/// Evicts least-recently-used dumpable buffers whenever the total loaded
/// byte count exceeds `threshold`, checked after write-shaped events
/// (allocate/set/reallocate/unlock/register). One buffer at a time, oldest
/// first, stopping as soon as the manager is back under threshold.
#[derive(Debug, Clone, Copy)]
pub struct DumpValve {
    pub threshold: usize,
}

impl DumpValve {
    fn maybe_evict(&self, ctrl: &mut dyn DumpController) {
        for handle in ctrl.dumpable_by_lru() {
            if ctrl.total_loaded_bytes() <= self.threshold {
                break;
            }
            ctrl.request_dump(handle);
        }
    }
}

impl DumpPolicy for DumpValve {
    fn on_register(&self, ctrl: &mut dyn DumpController, _handle: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_allocate(&self, ctrl: &mut dyn DumpController, _handle: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_set(&self, ctrl: &mut dyn DumpController, _handle: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_reallocate(&self, ctrl: &mut dyn DumpController, _handle: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_unlock(&self, ctrl: &mut dyn DumpController, _handle: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_restore_success(&self, ctrl: &mut dyn DumpController, _handle: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn refresh(&self, ctrl: &mut dyn DumpController) {
        self.maybe_evict(ctrl);
    }
    fn name(&self) -> &'static str {
        "dump-valve"
    }
}

/// Like [`DumpValve`], but re-checks the threshold after *every* lifecycle
/// event, including lock/destroy/unregister — the strictest policy.
#[derive(Debug, Clone, Copy)]
pub struct Barrier {
    pub threshold: usize,
}

impl Barrier {
    fn maybe_evict(&self, ctrl: &mut dyn DumpController) {
        for handle in ctrl.dumpable_by_lru() {
            if ctrl.total_loaded_bytes() <= self.threshold {
                break;
            }
            ctrl.request_dump(handle);
        }
    }
}

impl DumpPolicy for Barrier {
    fn on_register(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_unregister(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_allocate(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_set(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_reallocate(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_destroy(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_lock(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_unlock(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_dump_success(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn on_restore_success(&self, ctrl: &mut dyn DumpController, _h: BufferHandle) {
        self.maybe_evict(ctrl);
    }
    fn refresh(&self, ctrl: &mut dyn DumpController) {
        self.maybe_evict(ctrl);
    }
    fn name(&self) -> &'static str {
        "barrier"
    }
}

/// Dumps a buffer unconditionally as soon as its last lock token is
/// dropped, regardless of total managed size.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysDumpAfterUnlock;

impl DumpPolicy for AlwaysDumpAfterUnlock {
    fn on_unlock(&self, ctrl: &mut dyn DumpController, handle: BufferHandle) {
        if ctrl.is_dumpable(handle) {
            ctrl.request_dump(handle);
        }
    }
    fn name(&self) -> &'static str {
        "always-dump-after-unlock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeCtrl {
        loaded: HashMap<BufferHandle, (usize, u64)>,
        dumped: Vec<BufferHandle>,
        locked: std::collections::HashSet<BufferHandle>,
    }

    impl DumpController for FakeCtrl {
        fn request_dump(&mut self, handle: BufferHandle) {
            if let Some((_, _)) = self.loaded.remove(&handle) {
                self.dumped.push(handle);
            }
        }
        fn total_loaded_bytes(&self) -> usize {
            self.loaded.values().map(|(s, _)| s).sum()
        }
        fn last_access(&self, handle: BufferHandle) -> Option<u64> {
            self.loaded.get(&handle).map(|(_, t)| *t)
        }
        fn is_dumpable(&self, handle: BufferHandle) -> bool {
            self.loaded.contains_key(&handle) && !self.locked.contains(&handle)
        }
        fn dumpable_by_lru(&self) -> Vec<BufferHandle> {
            let mut v: Vec<_> = self
                .loaded
                .iter()
                .filter(|(h, _)| !self.locked.contains(h))
                .map(|(h, (_, t))| (*h, *t))
                .collect();
            v.sort_by_key(|(_, t)| *t);
            v.into_iter().map(|(h, _)| h).collect()
        }
    }

    fn h(id: u64) -> BufferHandle {
        BufferHandle { id, generation: 0 }
    }

    #[test]
    fn dump_valve_evicts_lru_not_locked() {
        let mut ctrl = FakeCtrl {
            loaded: HashMap::from([
                (h(1), (1024 * 1024, 1)),
                (h(2), (1024 * 1024, 2)),
                (h(3), (1024 * 1024, 3)),
            ]),
            dumped: Vec::new(),
            locked: std::collections::HashSet::from([h(1)]),
        };
        let valve = DumpValve {
            threshold: 2 * 1024 * 1024,
        };
        valve.on_allocate(&mut ctrl, h(3));
        assert_eq!(ctrl.dumped, vec![h(2)]);
        assert!(ctrl.total_loaded_bytes() <= valve.threshold);
    }

    #[test]
    fn always_dump_after_unlock_dumps_unconditionally() {
        let mut ctrl = FakeCtrl {
            loaded: HashMap::from([(h(1), (16, 1))]),
            dumped: Vec::new(),
            locked: std::collections::HashSet::new(),
        };
        AlwaysDumpAfterUnlock.on_unlock(&mut ctrl, h(1));
        assert_eq!(ctrl.dumped, vec![h(1)]);
    }
}
