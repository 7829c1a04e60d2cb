use calcache::cache::{
    CalibrationBuffers, CalibrationStore, ExpiryPolicy, LiveConfig, SetupFingerprint,
};
use calcache::registry::ModelId;
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// Store holding `count` full-width color calibrations (5200 pixels x 3 channels)
fn setup_store(count: u32) -> CalibrationStore {
    let mut store = CalibrationStore::new();
    for i in 0..count {
        let mut fingerprint = SetupFingerprint::default();
        fingerprint.device.model = ModelId::CanonLide210;
        fingerprint.params.xres = 150 << i;
        let white: Vec<u8> = (0..31200).map(|j| (j % 251) as u8).collect();
        let dark: Vec<u8> = (0..31200).map(|j| (j % 13) as u8).collect();
        let buffers = CalibrationBuffers::new(5200, 3, 31200, white, dark).unwrap();
        store.record(fingerprint, LiveConfig::default(), buffers, Utc::now());
    }
    store
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for count in [1, 4] {
        let store = setup_store(count);
        group.bench_with_input(format!("{}_entries", count), &store, |b, store| {
            b.iter(|| black_box(store.to_bytes().unwrap()))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for count in [1, 4] {
        let bytes = setup_store(count).to_bytes().unwrap();
        group.bench_with_input(format!("{}_entries", count), &bytes, |b, bytes| {
            b.iter(|| black_box(CalibrationStore::load(bytes, ExpiryPolicy::never()).unwrap()))
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let store = setup_store(4);
    let mut fingerprint = SetupFingerprint::default();
    fingerprint.device.model = ModelId::CanonLide210;
    fingerprint.params.xres = 1200;
    let live = LiveConfig::default();

    c.bench_function("lookup_hit", |b| {
        b.iter(|| black_box(store.lookup(&fingerprint, &live)))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_lookup);
criterion_main!(benches);
