//! Per-class codec registry (spec §4.F "Codec registry")
//!
//! Two registries: a *default* process-wide registry keyed by class name,
//! and a per-writer/reader *override* registry. Lookup consults overrides
//! first, then defaults; a miss is `NoSerializer`.
//!
//! Concrete per-class (de)serializers are out of scope (spec §1) — this
//! module only provides the registration protocol plus a `Passthrough`
//! codec that round-trips a [`SessionObject`]'s own fields/children
//! verbatim, which is what a class needs when it carries no bespoke binary
//! encoding of its own.
//!
//! Grounded on `panxinmiao-myth`'s `renderer/shader_generator.rs`
//! (string-keyed registry, `OnceLock`-backed default + instance overrides).

use std::sync::{Arc, OnceLock, RwLock};

use rustc_hash::FxHashMap;

use crate::errors::{Result, VoxelError};

use super::object::SessionObject;

/// Sink a [`Serializer`] writes binary blobs into, at archive path
/// `<uuid>/<name>` (spec §6.2).
pub trait BlobSink {
    fn write_blob(&mut self, name: &str, data: &[u8]) -> Result<()>;
}

/// Source a [`Deserializer`] reads binary blobs back from.
pub trait BlobSource {
    fn read_blob(&mut self, name: &str) -> Result<Vec<u8>>;
}

/// Per-class write-out logic: may add scalar fields, write blobs through
/// `sink`, and populate `obj.children`.
pub trait Serializer: Send + Sync {
    fn serialize(&self, obj: &mut SessionObject, sink: &mut dyn BlobSink) -> Result<()>;
}

/// Per-class read-back logic: `obj.children` is already populated by the
/// recursive walk (spec §4.F step "pre-insert-then-recurse") by the time
/// this runs; the deserializer fills in whatever scalar/blob state its
/// class needs from `obj.fields` and `source`.
pub trait Deserializer: Send + Sync {
    fn deserialize(&self, obj: &mut SessionObject, source: &mut dyn BlobSource) -> Result<()>;
}

/// Round-trips a node's existing fields/children with no class-specific
/// transformation. The sensible default for any class without a bespoke
/// binary encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Serializer for Passthrough {
    fn serialize(&self, _obj: &mut SessionObject, _sink: &mut dyn BlobSink) -> Result<()> {
        Ok(())
    }
}

impl Deserializer for Passthrough {
    fn deserialize(&self, _obj: &mut SessionObject, _source: &mut dyn BlobSource) -> Result<()> {
        Ok(())
    }
}

struct CodecEntry {
    serializer: Arc<dyn Serializer>,
    deserializer: Arc<dyn Deserializer>,
}

/// A class-name-keyed registry of codecs.
#[derive(Default)]
pub struct CodecRegistry {
    entries: RwLock<FxHashMap<String, CodecEntry>>,
}

impl CodecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        class_name: impl Into<String>,
        serializer: Arc<dyn Serializer>,
        deserializer: Arc<dyn Deserializer>,
    ) {
        self.entries.write().unwrap().insert(
            class_name.into(),
            CodecEntry {
                serializer,
                deserializer,
            },
        );
    }

    fn serializer_for(&self, class_name: &str) -> Option<Arc<dyn Serializer>> {
        self.entries
            .read()
            .unwrap()
            .get(class_name)
            .map(|e| Arc::clone(&e.serializer))
    }

    fn deserializer_for(&self, class_name: &str) -> Option<Arc<dyn Deserializer>> {
        self.entries
            .read()
            .unwrap()
            .get(class_name)
            .map(|e| Arc::clone(&e.deserializer))
    }
}

static DEFAULT_REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();

/// Process-wide default codec registry (spec §4.F, §5 "read-mostly, guarded
/// by a shared mutex"). `Passthrough` is pre-registered so callers that
/// never register a bespoke codec still get correct round-tripping.
#[must_use]
pub fn default_registry() -> &'static CodecRegistry {
    DEFAULT_REGISTRY.get_or_init(CodecRegistry::new)
}

/// Resolves a codec for `class_name`, consulting `overrides` before the
/// process-wide default registry; `NoSerializer` on a miss in both.
pub(crate) fn resolve_serializer(overrides: &CodecRegistry, class_name: &str) -> Result<Arc<dyn Serializer>> {
    overrides
        .serializer_for(class_name)
        .or_else(|| default_registry().serializer_for(class_name))
        .ok_or_else(|| VoxelError::NoSerializer(class_name.to_string()))
}

pub(crate) fn resolve_deserializer(overrides: &CodecRegistry, class_name: &str) -> Result<Arc<dyn Deserializer>> {
    overrides
        .deserializer_for(class_name)
        .or_else(|| default_registry().deserializer_for(class_name))
        .ok_or_else(|| VoxelError::NoSerializer(class_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_registry_takes_precedence_over_default() {
        let overrides = CodecRegistry::new();
        overrides.register("demo::Thing", Arc::new(Passthrough), Arc::new(Passthrough));
        assert!(resolve_serializer(&overrides, "demo::Thing").is_ok());
    }

    #[test]
    fn unregistered_class_is_no_serializer() {
        let overrides = CodecRegistry::new();
        let err = resolve_serializer(&overrides, "demo::NeverRegistered");
        assert!(matches!(err, Err(VoxelError::NoSerializer(_))));
    }
}
