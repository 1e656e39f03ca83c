//! Session objects (spec §3 "Session object", §4.F)
//!
//! A node in a DAG identified by a UUID. Both `children` and `fields` hold
//! nested sub-nodes — the original distinguishes "typed children a specific
//! class knows about" from "a generic, class-agnostic property bag", but
//! both are recursed identically during (de)serialization (spec §4.F step
//! 3). `scalars` are the only values written directly into the wire tree;
//! everything else is either a sub-node or a binary blob written through a
//! [`super::codec::BlobSink`].
//!
//! The DAG may share sub-nodes; cycles are not expected, but serialization
//! never recurses into an already-emitted UUID, so a cycle degrades to a
//! stub rather than a stack overflow (spec §9 "Cyclic references").
//!
//! Grounded on `panxinmiao-myth`'s `assets/storage.rs` (`FxHashMap<Uuid, H>`
//! lookup table, reused here as the serialize/deserialize UUID cache) and
//! `scene/node.rs` for the "DAG node with named children" shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A node in the session DAG.
///
/// `children`/`fields`/`scalars` are `BTreeMap`s (not `HashMap`) so
/// serialized trees are byte-stable across runs — useful for archive diffs
/// and for the round-trip tests in [`crate::session::archive`].
#[derive(Debug, Clone)]
pub struct SessionObject {
    pub uuid: Uuid,
    pub class_name: String,
    pub description: String,
    pub scalars: BTreeMap<String, Value>,
    pub children: BTreeMap<String, SessionObject>,
    pub fields: BTreeMap<String, SessionObject>,
    pub(crate) blobs: BTreeMap<String, Vec<u8>>,
}

impl SessionObject {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            class_name: class_name.into(),
            description: String::new(),
            scalars: BTreeMap::new(),
            children: BTreeMap::new(),
            fields: BTreeMap::new(),
            blobs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_uuid(class_name: impl Into<String>, uuid: Uuid) -> Self {
        Self {
            uuid,
            ..Self::new(class_name)
        }
    }

    pub fn set_scalar(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.scalars.insert(key.into(), value.into());
        self
    }

    pub fn set_blob(&mut self, key: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.blobs.insert(key.into(), bytes);
        self
    }

    pub fn add_child(&mut self, key: impl Into<String>, child: SessionObject) -> &mut Self {
        self.children.insert(key.into(), child);
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, field: SessionObject) -> &mut Self {
        self.fields.insert(key.into(), field);
        self
    }

    #[must_use]
    pub fn scalar(&self, key: &str) -> Option<&Value> {
        self.scalars.get(key)
    }

    #[must_use]
    pub fn blob(&self, key: &str) -> Option<&[u8]> {
        self.blobs.get(key).map(Vec::as_slice)
    }
}

/// On-the-wire tree node shape (spec §6.2): `{uuid, description, children?,
/// fields?, scalars?}`, or a bare `{uuid}` stub for an already-emitted node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireNode {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scalars: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, WireNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, WireNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blob_names: Vec<String>,
}

impl WireNode {
    pub(crate) fn is_stub(&self) -> bool {
        self.class_name.is_none() && self.children.is_empty() && self.fields.is_empty() && self.scalars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_and_field_insertion_is_stable_under_btreemap() {
        let mut root = SessionObject::new("sight::data::Composite");
        root.set_scalar("count", 3);
        root.add_child("a", SessionObject::new("sight::data::Image"));
        root.add_child("b", SessionObject::new("sight::data::Mesh"));
        let keys: Vec<_> = root.children.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(root.scalar("count").unwrap().as_i64(), Some(3));
    }
}
