//! Session encryption policy (spec §4.F "Password discipline", §6.3)
//!
//! Derives the per-node password actually handed to a codec from the
//! caller-supplied password, the node's UUID, and an [`EncryptionPolicy`].
//!
//! Grounded on `panxinmiao-myth`'s use of `xxhash-rust`'s `xxh3` for
//! fast, non-cryptographic hashing (`renderer/pipeline/cache.rs`'s
//! shader-option hash), reused here to derive per-node keys.

use uuid::Uuid;
use xxhash_rust::xxh3::xxh3_64;

/// How the password supplied to `serialize`/`deserialize` is turned into
/// the key passed to each node's codec (spec §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionPolicy {
    /// The raw password is reused for every node.
    #[default]
    Password,
    /// Each node gets `hash(password ++ uuid)` — a different key per node.
    Salted,
    /// As `Salted`, but a password is never optional: a build-time default
    /// or `hash(uuid)` is substituted when the caller supplies none.
    Forced,
}

/// Build-time default session password, settable via the
/// `VOXELKIT_DEFAULT_SESSION_PASSWORD` environment variable at compile
/// time. Absent by default.
fn build_time_default_password() -> Option<&'static str> {
    option_env!("VOXELKIT_DEFAULT_SESSION_PASSWORD")
}

fn salted_hash(password: &str, uuid: Uuid) -> String {
    let mut buf = Vec::with_capacity(password.len() + 16);
    buf.extend_from_slice(password.as_bytes());
    buf.extend_from_slice(uuid.as_bytes());
    format!("{:016x}", xxh3_64(&buf))
}

fn hash_uuid(uuid: Uuid) -> String {
    format!("{:016x}", xxh3_64(uuid.as_bytes()))
}

/// Derives the key passed to a node's codec. Returns `None` when the node
/// should be written/read unencrypted (only possible under
/// [`EncryptionPolicy::Password`]/[`EncryptionPolicy::Salted`] with no
/// password supplied); `Forced` always returns `Some`, falling back all the
/// way to `hash(uuid)` so it never fails (spec §4.F, §9).
#[must_use]
pub fn pickle(password: Option<&str>, uuid: Uuid, policy: EncryptionPolicy) -> Option<String> {
    match policy {
        EncryptionPolicy::Password => password.map(str::to_string),
        EncryptionPolicy::Salted => password.map(|p| salted_hash(p, uuid)),
        EncryptionPolicy::Forced => {
            let base = password.map(str::to_string).or_else(|| build_time_default_password().map(str::to_string));
            Some(base.map_or_else(|| hash_uuid(uuid), |p| salted_hash(&p, uuid)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy_reuses_raw_password() {
        let uuid = Uuid::new_v4();
        assert_eq!(pickle(Some("hunter2"), uuid, EncryptionPolicy::Password), Some("hunter2".to_string()));
        assert_eq!(pickle(None, uuid, EncryptionPolicy::Password), None);
    }

    #[test]
    fn salted_policy_differs_per_node() {
        let password = "hunter2";
        let a = pickle(Some(password), Uuid::new_v4(), EncryptionPolicy::Salted);
        let b = pickle(Some(password), Uuid::new_v4(), EncryptionPolicy::Salted);
        assert_ne!(a, b);
        assert!(a.is_some() && b.is_some());
    }

    #[test]
    fn forced_policy_never_returns_none() {
        let uuid = Uuid::new_v4();
        assert!(pickle(None, uuid, EncryptionPolicy::Forced).is_some());
        assert!(pickle(Some("x"), uuid, EncryptionPolicy::Forced).is_some());
    }
}
