use easel_store::{FileStorage, PersistenceBridge, Snapshot, Storage};

fn gradient(width: u32, height: u32) -> Vec<u8> {
    (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| [x as u8 * 10, y as u8 * 10, 128, 255]))
        .collect()
}

#[test]
fn canvas_survives_a_new_bridge() {
    let dir = std::path::Path::new("target/test_storage/survives");
    let snap = Snapshot::encode(12, 8, &gradient(12, 8)).unwrap();

    {
        let mut bridge = PersistenceBridge::new(Box::new(FileStorage::new(dir)), "canvas_data");
        bridge.persist(&snap).unwrap();
    }

    let bridge = PersistenceBridge::new(Box::new(FileStorage::new(dir)), "canvas_data");
    let restored = bridge.restore().unwrap();
    assert_eq!(restored, snap);
    assert_eq!(restored.decode().unwrap().rgba, gradient(12, 8));
}

#[test]
fn truncated_file_is_treated_as_no_saved_state() {
    let dir = std::path::Path::new("target/test_storage/truncated");
    let mut storage = FileStorage::new(dir);
    storage.set("canvas_data", r#"{"schema_version":"1.0","width":2"#).unwrap();

    let bridge = PersistenceBridge::new(Box::new(storage), "canvas_data");
    assert!(bridge.restore().is_none());
}

#[test]
fn missing_directory_reads_as_empty() {
    let storage = FileStorage::new("target/test_storage/never_created");
    assert_eq!(storage.get("canvas_data").unwrap(), None);
}
