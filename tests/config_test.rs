use flow_showroom::config::ViewerConfig;

#[test]
fn file_enables_a_disabled_variant() {
    let path = std::env::temp_dir().join(format!("flow-showroom-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        default_model = "mercedes"

        [[models]]
        name = "mercedes"
        url = "models/mercedes.glb"

        [framing.mercedes]
        position = [0.0, 4.0, 6.0]
        min_distance = 6.0
        max_distance = 25.0
        "#,
    )
    .unwrap();

    let config = ViewerConfig::load_from(&path);
    std::fs::remove_file(&path).ok();
    let config = config.unwrap();

    let enabled: Vec<_> = config.enabled_models().map(|m| m.name.as_str()).collect();
    assert_eq!(enabled, ["mercedes"]);
    let framing = config.framing.lookup("mercedes").unwrap();
    assert_eq!(framing.min_distance, 6.0);
    // A framing table in the file replaces the stock one.
    assert!(config.framing.lookup("porsche").is_none());
}

#[test]
fn malformed_file_is_an_error() {
    let path = std::env::temp_dir().join(format!("flow-showroom-bad-{}.toml", std::process::id()));
    std::fs::write(&path, "default_model = [").unwrap();
    let config = ViewerConfig::load_from(&path);
    std::fs::remove_file(&path).ok();
    assert!(config.is_err());
}
