//! Process-wide default buffer manager (spec §9: "a process generally wants
//! exactly one buffer manager").
//!
//! Lazily started on first use, in a temp directory scoped to the process.
//! Never torn down — the worker thread and its dump directory are allowed
//! to leak past `main` exit, same as the teacher's own lazily-initialized
//! globals (`renderer/settings.rs`'s `OnceLock`-backed defaults).

use std::sync::OnceLock;

use super::manager::BufferManager;

static DEFAULT_MANAGER: OnceLock<BufferManager> = OnceLock::new();

/// Returns the process-wide [`BufferManager`], creating it on first call.
#[must_use]
pub fn default_manager() -> &'static BufferManager {
    DEFAULT_MANAGER.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("voxelkit-dump-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        BufferManager::new(dir)
    })
}
