use calcache::cache::{
    CalibrationBuffers, CalibrationCache, CalibrationStore, CurrentSetup, DeviceIds, ExpiryPolicy,
    FileStorage, FrontendSnapshot, LiveConfig, LoadOutcome, RegisterSetting, SensorSnapshot,
    SetupFingerprint, SetupParams,
};
use calcache::registry::{
    AdcId, AsicType, ColorOrder, GpioId, ModelId, MotorId, ScanColorMode, ScanFlags, ScanMethod,
    SensorId,
};
use chrono::{Duration, TimeZone, Utc};
use tempfile::tempdir;

fn lide_210_fingerprint(xres: u32) -> SetupFingerprint {
    let device = DeviceIds {
        model: ModelId::CanonLide210,
        asic: AsicType::Gl124,
        sensor: SensorId::CisCanonLide210,
        adc: AdcId::CanonLide110,
        gpio: GpioId::CanonLide110,
        motor: MotorId::CanonLide110,
        sheetfed: false,
    };
    let params = SetupParams {
        xres,
        yres: xres,
        pixels: 5200,
        requested_pixels: 5200,
        lines: 1,
        depth: 16,
        channels: 3,
        scan_method: ScanMethod::Flatbed,
        scan_mode: ScanColorMode::ColorSinglePass,
        flags: ScanFlags::SINGLE_LINE.union(ScanFlags::CALIBRATION),
        ..SetupParams::default()
    };
    let current = CurrentSetup {
        pixels: 5200,
        xres,
        ..CurrentSetup::default()
    };
    SetupFingerprint::new(device, params, current)
}

fn live_config() -> LiveConfig {
    let frontend = FrontendSnapshot {
        id: AdcId::CanonLide110,
        registers: vec![RegisterSetting::new(0x00, 0x80), RegisterSetting::new(0x01, 0x02)],
        offset: [0x70, 0x72, 0x71],
        gain: [0x1a, 0x1c, 0x1b],
        ..FrontendSnapshot::default()
    };
    let sensor = SensorSnapshot {
        id: SensorId::CisCanonLide210,
        optical_res: 2400,
        sensor_pixels: 5200,
        exposure: [0x2c09, 0x22b8, 0x10f0],
        color_order: ColorOrder::default(),
        custom_regs: vec![RegisterSetting::new(0x16, 0x10)],
        ..SensorSnapshot::default()
    };
    LiveConfig::new(frontend, sensor)
}

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

#[test]
fn test_large_entry_survives_persist_and_reload() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::in_dir(dir.path(), "canon-lide-210");
    let fingerprint = lide_210_fingerprint(600);
    let white = pattern(31200, 7);
    let dark = pattern(31200, 200);
    let buffers = CalibrationBuffers::new(5200, 3, 31200, white.clone(), dark.clone()).unwrap();

    let mut cache = CalibrationCache::open(storage.clone(), ExpiryPolicy::never());
    assert_eq!(cache.outcome(), &LoadOutcome::Missing);
    cache.record(fingerprint.clone(), live_config(), buffers, Utc::now());
    cache.save().unwrap();

    let reopened = CalibrationCache::try_open(storage, ExpiryPolicy::never()).unwrap();
    assert_eq!(reopened.outcome(), &LoadOutcome::Loaded { entries: 1 });
    let found = reopened
        .lookup(&fingerprint, &live_config())
        .expect("entry should be found after reload");
    assert_eq!(found.pixel_count(), 5200);
    assert_eq!(found.channel_count(), 3);
    assert_eq!(found.average_size(), 31200);
    assert_eq!(found.white_average(), white.as_slice());
    assert_eq!(found.dark_average(), dark.as_slice());
}

#[test]
fn test_lookup_returns_matching_entry_only() {
    let f1 = lide_210_fingerprint(300);
    let f2 = lide_210_fingerprint(600);
    let f3 = lide_210_fingerprint(1200);
    let b1 = CalibrationBuffers::new(1, 1, 2, vec![1, 1], vec![0, 0]).unwrap();
    let b2 = CalibrationBuffers::new(1, 1, 2, vec![2, 2], vec![0, 0]).unwrap();

    let mut store = CalibrationStore::new();
    store.record(f1.clone(), live_config(), b1.clone(), Utc::now());
    store.record(f2.clone(), live_config(), b2.clone(), Utc::now());

    assert_eq!(store.lookup(&f1, &live_config()), Some(&b1));
    assert_eq!(store.lookup(&f2, &live_config()), Some(&b2));
    assert_eq!(store.lookup(&f3, &live_config()), None);
}

#[test]
fn test_changed_live_hardware_misses() {
    let fingerprint = lide_210_fingerprint(600);
    let buffers = CalibrationBuffers::new(1, 1, 1, vec![5], vec![1]).unwrap();
    let mut store = CalibrationStore::new();
    store.record(fingerprint.clone(), live_config(), buffers, Utc::now());

    let mut live = live_config();
    live.sensor.exposure[1] += 1;
    assert_eq!(store.lookup(&fingerprint, &live), None);

    let mut live = live_config();
    live.frontend.registers.push(RegisterSetting::new(0x02, 0x00));
    assert_eq!(store.lookup(&fingerprint, &live), None);
}

#[test]
fn test_record_replaces_same_fingerprint() {
    let fingerprint = lide_210_fingerprint(600);
    let old = CalibrationBuffers::new(1, 1, 1, vec![1], vec![0]).unwrap();
    let new = CalibrationBuffers::new(1, 1, 1, vec![2], vec![0]).unwrap();

    let mut store = CalibrationStore::new();
    store.record(fingerprint.clone(), live_config(), old, Utc::now());
    let replaced = store.record(fingerprint.clone(), live_config(), new.clone(), Utc::now());

    assert_eq!(replaced, 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.lookup(&fingerprint, &live_config()), Some(&new));
}

#[test]
fn test_expired_flatbed_entry_forces_recalibration() {
    let recorded = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let fingerprint = lide_210_fingerprint(600);
    let buffers = CalibrationBuffers::new(1, 1, 1, vec![1], vec![0]).unwrap();
    let mut store = CalibrationStore::with_policy(ExpiryPolicy::from_minutes(60));
    store.record(fingerprint.clone(), live_config(), buffers, recorded);

    let fresh = recorded + Duration::minutes(60);
    let stale = recorded + Duration::minutes(61);
    assert!(store.find_at(&fingerprint, &live_config(), fresh).is_some());
    assert!(store.find_at(&fingerprint, &live_config(), stale).is_none());

    let mut sheetfed = fingerprint.clone();
    sheetfed.device.sheetfed = true;
    let buffers = CalibrationBuffers::new(1, 1, 1, vec![1], vec![0]).unwrap();
    store.record(sheetfed.clone(), live_config(), buffers, recorded);
    assert!(store.find_at(&sheetfed, &live_config(), stale).is_some());

    assert_eq!(store.evict_expired(stale), 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_insertion_order_preserved_across_reload() {
    let mut store = CalibrationStore::new();
    for xres in [150, 300, 600, 1200] {
        let buffers = CalibrationBuffers::new(1, 1, 1, vec![xres as u8], vec![0]).unwrap();
        store.record(lide_210_fingerprint(xres), live_config(), buffers, Utc::now());
    }

    let reloaded = CalibrationStore::load(&store.to_bytes().unwrap(), ExpiryPolicy::never()).unwrap();
    let order: Vec<u32> = reloaded
        .entries()
        .iter()
        .map(|e| e.fingerprint().params.xres)
        .collect();
    assert_eq!(order, vec![150, 300, 600, 1200]);
    assert_eq!(reloaded, store);
}
