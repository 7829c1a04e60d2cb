use calcache::cache::{
    CalibrationBuffers, CalibrationCache, CalibrationStore, ExpiryPolicy, FileStorage,
    LiveConfig, LoadOutcome, SetupFingerprint, StoreError,
};
use calcache::codec::DecodeError;
use calcache::registry::ModelId;
use chrono::Utc;
use std::fs;
use tempfile::tempdir;

fn entry_store(count: u32) -> CalibrationStore {
    let mut store = CalibrationStore::new();
    for i in 0..count {
        let mut fingerprint = SetupFingerprint::default();
        fingerprint.device.model = ModelId::CanonLide110;
        fingerprint.params.xres = 300 * (i + 1);
        let buffers = CalibrationBuffers::new(4, 1, 4, vec![0xaa; 4], vec![0x11; 4]).unwrap();
        store.record(fingerprint, LiveConfig::default(), buffers, Utc::now());
    }
    store
}

#[test]
fn test_truncated_record_fails_whole_load() {
    let one = entry_store(1).to_bytes().unwrap();
    let two = entry_store(2).to_bytes().unwrap();
    assert!(two.len() > one.len());

    // Every cut strictly inside the second record must fail, never yield one entry.
    for cut in (one.len() + 1)..(two.len() - 1) {
        let result = CalibrationStore::load(&two[..cut], ExpiryPolicy::never());
        assert!(
            matches!(result, Err(StoreError::Decode(_))),
            "cut at {} of {} decoded: {:?}",
            cut,
            two.len(),
            result.map(|s| s.len())
        );
    }
}

#[test]
fn test_unknown_model_code_is_rejected() {
    let text = String::from_utf8(entry_store(1).to_bytes().unwrap()).unwrap();
    let (header, body) = text.split_once('\n').unwrap();
    let (_, rest) = body.split_once(' ').unwrap();
    let tampered = format!("{header}\n9999 {rest}");

    let result = CalibrationStore::load(tampered.as_bytes(), ExpiryPolicy::never());
    assert!(matches!(
        result,
        Err(StoreError::Decode(DecodeError::UnknownCode { code: 9999, .. }))
    ));
}

#[test]
fn test_buffer_length_mismatch_is_rejected() {
    let text = String::from_utf8(entry_store(1).to_bytes().unwrap()).unwrap();
    // Shrink the declared length of the white average.
    let tampered = text.replacen("4 aaaaaaaa", "3 aaaaaaaa", 1);
    assert_ne!(tampered, text);

    let result = CalibrationStore::load(tampered.as_bytes(), ExpiryPolicy::never());
    assert!(matches!(result, Err(StoreError::Decode(_))));
}

#[test]
fn test_foreign_and_empty_files_are_rejected() {
    let inputs: [&[u8]; 3] = [b"", b"not a calibration store", b"\xff\xfe binary"];
    for data in inputs {
        let result = CalibrationStore::load(data, ExpiryPolicy::never());
        assert!(
            matches!(
                result,
                Err(StoreError::UnsupportedFormat { .. }) | Err(StoreError::Decode(_))
            ),
            "unexpected result for {:?}",
            data
        );
    }
}

#[test]
fn test_version_mismatch_is_rejected() {
    let result = CalibrationStore::load(b"calcache-calibration 2\n", ExpiryPolicy::never());
    assert!(matches!(
        result,
        Err(StoreError::VersionMismatch {
            found: 2,
            expected: 1
        })
    ));
}

#[test]
fn test_resilient_open_recovers_from_corrupt_file() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::in_dir(dir.path(), "lide-110");
    let mut data = entry_store(2).to_bytes().unwrap();
    data.truncate(data.len() / 2);
    fs::write(storage.path(), &data).unwrap();

    assert!(CalibrationCache::try_open(storage.clone(), ExpiryPolicy::never()).is_err());

    let mut cache = CalibrationCache::open(storage.clone(), ExpiryPolicy::never());
    assert!(cache.store().is_empty());
    assert!(matches!(cache.outcome(), LoadOutcome::Discarded { .. }));

    // Recalibrating and saving replaces the corrupt file.
    let buffers = CalibrationBuffers::new(1, 1, 1, vec![1], vec![0]).unwrap();
    cache.record(
        SetupFingerprint::default(),
        LiveConfig::default(),
        buffers,
        Utc::now(),
    );
    cache.save().unwrap();

    let reopened = CalibrationCache::try_open(storage, ExpiryPolicy::never()).unwrap();
    assert_eq!(reopened.outcome(), &LoadOutcome::Loaded { entries: 1 });
}
