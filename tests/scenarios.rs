//! End-to-end scenario tests spanning the buffer manager, the session
//! archive, and the ray-caster — one per numbered scenario in the design
//! document's testable-properties section.

use std::sync::Arc;

use tempfile::tempdir;
use voxelkit::buffer::{BufferManager, DumpValve, PlainPolicy};
use voxelkit::session::{deserialize, serialize, CodecRegistry, EncryptionPolicy, Format, Passthrough, SessionObject};
use voxelkit::volume::{compute_sample_distance, RayCaster, RendererOptions, ShaderVariantKey};
use voxelkit::VoxelError;

const MIB: usize = 1024 * 1024;

#[test]
fn dump_under_pressure_evicts_lru_not_locked_or_fresh() {
    pollster::block_on(async {
        let dir = tempdir().unwrap();
        let mgr = BufferManager::new(dir.path().to_path_buf());
        mgr.set_dump_policy(Arc::new(DumpValve { threshold: 2 * MIB })).await;

        let a = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(a, vec![0xAAu8; MIB]).await.unwrap();
        let b = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(b, vec![0xBBu8; MIB]).await.unwrap();
        let c = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(c, vec![0xCCu8; MIB]).await.unwrap();

        let token = mgr.lock(a).await.unwrap();

        let d = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(d, vec![0xDDu8; MIB]).await.unwrap();

        let stats = mgr.stats().await;
        assert_eq!(stats.total_managed, 4 * MIB);
        assert!((MIB..=2 * MIB).contains(&stats.total_dumped), "total_dumped was {}", stats.total_dumped);

        // A is locked, D was just written: neither may have been evicted.
        assert_eq!(mgr.peek(a).await.unwrap().unwrap(), vec![0xAAu8; MIB]);
        assert_eq!(mgr.peek(d).await.unwrap().unwrap(), vec![0xDDu8; MIB]);
        drop(token);
    });
}

#[test]
fn restore_on_lock_reads_back_prior_contents() {
    pollster::block_on(async {
        let dir = tempdir().unwrap();
        let mgr = BufferManager::new(dir.path().to_path_buf());
        mgr.set_dump_policy(Arc::new(DumpValve { threshold: 2 * MIB })).await;

        let a = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(a, vec![0xAAu8; MIB]).await.unwrap();
        let b = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(b, vec![0xBBu8; MIB]).await.unwrap();
        let c = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(c, vec![0xCCu8; MIB]).await.unwrap();
        let _a_lock = mgr.lock(a).await.unwrap();

        // Force b (or c) to be dumped, then lock it — lock must restore it
        // transparently.
        mgr.dump(b).await.unwrap();
        let token = mgr.lock(b).await.unwrap();
        assert_eq!(mgr.peek(b).await.unwrap().unwrap(), vec![0xBBu8; MIB]);
        drop(token);
    });
}

#[test]
fn swap_exchanges_sizes_and_contents() {
    pollster::block_on(async {
        let dir = tempdir().unwrap();
        let mgr = BufferManager::new(dir.path().to_path_buf());
        let x = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(x, vec![0xAAu8; 10]).await.unwrap();
        let y = mgr.register(Arc::new(PlainPolicy)).await;
        mgr.set_buffer(y, vec![0xBBu8; 20]).await.unwrap();

        mgr.swap(x, y).await.unwrap();

        let x_data = mgr.peek(x).await.unwrap().unwrap();
        assert_eq!(x_data, vec![0xBBu8; 20]);
        let y_data = mgr.peek(y).await.unwrap().unwrap();
        assert_eq!(y_data, vec![0xAAu8; 10]);
    });
}

#[test]
fn session_round_trip_preserves_shared_child_identity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.zip");

    let codecs = CodecRegistry::new();
    codecs.register("test::Thing", Arc::new(Passthrough), Arc::new(Passthrough));

    let shared = SessionObject::new("test::Thing");
    let shared_uuid = shared.uuid;
    let mut a = SessionObject::new("test::Thing");
    a.add_child("z", shared.clone());
    let mut b = SessionObject::new("test::Thing");
    b.add_child("z", shared);
    let mut root = SessionObject::new("test::Thing");
    root.add_child("a", a);
    root.add_child("b", b);

    serialize(&path, &root, Format::Zip, Some("p"), EncryptionPolicy::Password, &codecs).unwrap();
    let restored = deserialize(&path, Format::Zip, Some("p"), EncryptionPolicy::Password, &codecs).unwrap();

    let ra = &restored.children["a"];
    let rb = &restored.children["b"];
    assert_eq!(ra.children["z"].uuid, shared_uuid);
    assert_eq!(ra.children["z"].uuid, rb.children["z"].uuid);
}

#[test]
fn enabling_ambient_occlusion_changes_the_shader_variant() {
    let base = RendererOptions::default();
    let mut caster = RayCaster::new(base);
    let base_key = caster.variant_key();

    let mut with_ao = base;
    with_ao.ao.enabled = true;
    let changed = caster.apply_options(with_ao);

    assert!(changed, "enabling AO must register as a shader variant change");
    assert_ne!(caster.variant_key(), base_key);
    assert_eq!(caster.variant_key(), ShaderVariantKey::compute(&with_ao));
}

#[test]
fn setting_zero_samples_fails_and_leaves_state_unchanged() {
    let mut caster = RayCaster::new(RendererOptions::default());
    let before = caster.sample_distance();

    let err = caster.set_sampling(0, 0.0, 100.0, None, 0.0, 255.0);

    assert!(matches!(err, Err(VoxelError::InvalidArgument(_))));
    assert_eq!(caster.sample_distance(), before);
    // compute_sample_distance itself is only ever called with a validated
    // count; exercise it directly to document the contract the guard above
    // protects.
    assert!(compute_sample_distance(0.0, 100.0, 1) > 0.0);
}
