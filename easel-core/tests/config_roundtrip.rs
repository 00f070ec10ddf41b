use easel_core::{load_config, save_config, EaselConfig};

#[test]
fn config_roundtrip() {
    let config = EaselConfig {
        history_cap: 20,
        background: "#FAFAFA".into(),
        ..EaselConfig::default()
    };

    let path = std::path::Path::new("target/test_config/easel.json");
    save_config(path, &config).unwrap();
    let loaded = load_config(path).unwrap();

    assert_eq!(config, loaded);
    assert_eq!(loaded.background_color().to_hex(), "#fafafa");
}

#[test]
fn invalid_config_fails_to_load() {
    let path = std::path::Path::new("target/test_config/bad.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, r#"{ "min_brush_size": 9, "max_brush_size": 3 }"#).unwrap();

    assert!(load_config(path).is_err());
}
