//! Session archive (spec §4.F)
//!
//! Recursive, UUID-keyed serialization of an object graph into either a
//! loose-file directory or a single zip container, with pluggable
//! per-class codecs and optional password-derived encryption.
//!
//! Grounded on `panxinmiao-myth`'s `resources/loaders/gltf/mod.rs` (graph
//! walk with a visited-set to collapse shared sub-resources → the
//! already-emitted-UUID stub handling in [`archive::serialize_node`]) and
//! `resources/loaders/mod.rs`'s format-dispatch enum (the model for
//! [`archive::Format`]).

mod archive;
mod codec;
mod crypto;
mod object;

pub use archive::{deserialize, serialize, Format};
pub use codec::{default_registry, BlobSink, BlobSource, CodecRegistry, Deserializer, Passthrough, Serializer};
pub use crypto::{pickle, EncryptionPolicy};
pub use object::SessionObject;
