#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! voxelkit
//!
//! Buffer management, session archiving, and GPU volume ray-casting for a
//! medical imaging platform.
//!
//! - [`buffer`]: thread-safe buffer manager with lock-based pinning, lazy
//!   I/O streaming, and pluggable dump-to-disk eviction.
//! - [`session`]: recursive encrypted serialization of an object graph
//!   into zip or filesystem containers with pluggable per-class codecs.
//! - [`volume`]: GPU volume ray-casting engine — proxy geometry, SAT/
//!   illumination pre-compute, pre-integration table, clipping box,
//!   ray-entry compositor, and the per-frame ray-caster orchestrator.

pub mod buffer;
pub mod errors;
pub mod session;
pub mod volume;

pub use errors::{Result, VoxelError};
