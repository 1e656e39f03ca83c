//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`VoxelError`] covers every failure mode described in
//! the spec: allocation refusal, restore/stream failures, unknown handles,
//! missing codecs, unsupported encryption, and invalid arguments.
//!
//! `Locked` (spec §7) is intentionally not a variant here: attempting to
//! unregister or destroy a locked buffer is a programming bug, not a
//! recoverable condition, so it is a `debug_assert!`/panic at the call site.

use thiserror::Error;

/// The crate-wide error type.
#[derive(Error, Debug)]
pub enum VoxelError {
    /// An allocation policy refused to grow/shrink a buffer region.
    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// A restore read fewer bytes than the buffer's recorded size.
    #[error("short read while restoring buffer {handle:?}: expected {expected} bytes, got {got}")]
    ShortRead {
        /// The buffer handle being restored.
        handle: crate::buffer::BufferHandle,
        /// Expected byte count.
        expected: usize,
        /// Bytes actually read.
        got: usize,
    },

    /// A raw-file stream factory's backing path no longer resolves.
    #[error("dumped file moved or deleted: {0}")]
    FileMoved(std::path::PathBuf),

    /// The handle is not known to the buffer manager.
    #[error("buffer handle not managed: {0:?}")]
    NotManaged(crate::buffer::BufferHandle),

    /// No codec is registered for a session object's class name.
    #[error("no serializer registered for class `{0}`")]
    NoSerializer(String),

    /// A password was supplied but the container format cannot encrypt.
    #[error("encryption requested but unsupported by container format `{0}`")]
    EncryptionUnsupported(String),

    /// A zero sample count, malformed clipping box, or similar bad input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure in the session index tree.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip container failure.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Alias for `Result<T, VoxelError>`.
pub type Result<T> = std::result::Result<T, VoxelError>;
