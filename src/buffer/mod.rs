//! Buffer manager (spec §4.A–E)
//!
//! A process-wide, thread-safe cache that tracks every large image/mesh
//! buffer, implements lock-based pinning, lazy I/O streaming, and a
//! pluggable dump-to-disk policy that evicts cold buffers under memory
//! pressure and restores them on demand.
//!
//! Grounded on `panxinmiao-myth`'s `assets/handle.rs` (strong/weak handle
//! pair → [`LockToken`]/`WeakLockToken`), `assets/storage.rs` (registry
//! shape), `resources/buffer.rs` (version-tracked guards), and
//! `renderer/graph/transient_pool.rs` (idle-frame eviction bookkeeping →
//! [`dump_policy::DumpValve`]).

mod alloc;
mod dump_policy;
mod global;
mod manager;
mod registry;
mod signal;
mod stream;

pub use alloc::{AlignedPolicy, AllocPolicy, ExternalPolicy, PlainPolicy, ZeroFillPolicy};
pub use dump_policy::{AlwaysDumpAfterUnlock, Barrier, DumpPolicy, DumpValve, NeverDump};
pub use global::default_manager;
pub use manager::{BufferManager, BufferStats, LoadingMode, LockToken, StreamInfo};
pub use registry::{BufferHandle, BufferInfo, FileFormat};
pub use signal::Signal;
pub use stream::{MemoryStreamFactory, RawFileStreamFactory, StreamFactory, UserStreamFactory};
