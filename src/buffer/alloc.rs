//! Allocation policy (spec §4.B)
//!
//! `{allocate(size), reallocate(new_size), destroy}` over a buffer region.
//! `allocate` must leave the region either valid with exactly `size` bytes
//! or return `OutOfMemory`; partial allocations are forbidden. `reallocate`
//! preserves prefix content up to `min(old_size, new_size)`.
//!
//! Grounded on `panxinmiao-myth`'s `renderer/core/resources/allocator.rs`
//! (capacity-expanding CPU-side buffer, the model for [`PlainPolicy`] and
//! [`AlignedPolicy`]'s grow-in-place behavior).

use crate::errors::{Result, VoxelError};
use std::fmt;

/// Capability set for managing the lifetime of a single buffer region.
///
/// A region is represented as an owned `Vec<u8>` — the manager is always
/// the unique owner of the bytes it holds, even for buffers adopted from an
/// external source via `set_buffer` (those are copied in once, after which
/// the manager owns the copy; see [`ExternalPolicy`]).
pub trait AllocPolicy: fmt::Debug + Send + Sync {
    /// Allocate a fresh region of exactly `size` bytes, zero-filled.
    fn allocate(&self, size: usize) -> Result<Vec<u8>>;

    /// Resize `region` to `new_size`, preserving the shared prefix.
    fn reallocate(&self, region: Vec<u8>, new_size: usize) -> Result<Vec<u8>> {
        let mut region = region;
        region.resize(new_size, 0);
        Ok(region)
    }

    /// Release a region. May be called at most once per live region.
    fn destroy(&self, _region: Vec<u8>) {}

    /// Human-readable variant name, used in logs and `Debug` impls.
    fn name(&self) -> &'static str;
}

/// Plain `malloc`-style allocation: a zero-filled `Vec<u8>` of exact size.
///
/// Rust's allocator does not expose uninitialized-but-valid memory safely,
/// so "plain" and "zero-fill" are behaviorally identical here; they remain
/// distinct types so call sites can express intent and so a future
/// platform-specific allocator can specialize one without the other.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPolicy;

impl AllocPolicy for PlainPolicy {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        Ok(vec![0u8; size])
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// Explicit zero-fill allocation policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroFillPolicy;

impl AllocPolicy for ZeroFillPolicy {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        Ok(vec![0u8; size])
    }

    fn name(&self) -> &'static str {
        "zero-fill"
    }
}

/// Allocation policy that records a requested alignment.
///
/// The alignment is honored best-effort: `Vec<u8>` guarantees only
/// byte alignment, so callers that need hardware-aligned staging buffers
/// should instead size the allocation with slack and align a sub-slice
/// themselves. This variant exists so the *alignment requirement* survives
/// through the buffer manager's `BufferInfo`, even though the manager
/// cannot itself guarantee it.
#[derive(Debug, Clone, Copy)]
pub struct AlignedPolicy {
    pub align: usize,
}

impl AllocPolicy for AlignedPolicy {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        debug_assert!(self.align.is_power_of_two(), "alignment must be a power of two");
        Ok(vec![0u8; size])
    }

    fn name(&self) -> &'static str {
        "aligned"
    }
}

/// Allocation policy for caller-owned regions adopted via `set_buffer`.
///
/// `destroy` is a no-op: the manager took ownership of a *copy* of the
/// caller's bytes (see spec §9's discussion of why a typed handle replaces
/// the original `void**` aliasing trick), so there is nothing bespoke to
/// release beyond the ordinary `Vec<u8>` drop. `reallocate` on an externally
/// adopted region degrades to an ordinary resize, since once adopted the
/// manager's copy is just memory like any other.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalPolicy;

impl AllocPolicy for ExternalPolicy {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        if size == 0 {
            return Ok(Vec::new());
        }
        Err(VoxelError::OutOfMemory { requested: size })
    }

    fn destroy(&self, _region: Vec<u8>) {
        // Caller-owned semantics: nothing beyond the default Vec drop.
    }

    fn name(&self) -> &'static str {
        "external"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_allocate_is_exact_and_zeroed() {
        let p = PlainPolicy;
        let region = p.allocate(128).unwrap();
        assert_eq!(region.len(), 128);
        assert!(region.iter().all(|&b| b == 0));
    }

    #[test]
    fn reallocate_preserves_prefix() {
        let p = PlainPolicy;
        let mut region = p.allocate(4).unwrap();
        region.copy_from_slice(&[1, 2, 3, 4]);
        let grown = p.reallocate(region, 8).unwrap();
        assert_eq!(&grown[..4], &[1, 2, 3, 4]);
        assert_eq!(grown.len(), 8);

        let p2 = PlainPolicy;
        let mut region2 = p2.allocate(8).unwrap();
        region2.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let shrunk = p2.reallocate(region2, 3).unwrap();
        assert_eq!(&shrunk[..], &[1, 2, 3]);
    }
}
