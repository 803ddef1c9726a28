use std::sync::Mutex;

use tempfile::NamedTempFile;

use boxview::config::ViewerConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "BOXVIEW_CONFIG",
        "BOXVIEW_ENDPOINT",
        "BOXVIEW_TIMEOUT_SECS",
        "BOXVIEW_RESIZE_DEBOUNCE_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = ViewerConfig::load().expect("load config");
    assert_eq!(cfg.endpoint, "http://127.0.0.1:7860/detect");
    assert_eq!(cfg.timeout.as_secs(), 60);
    assert_eq!(cfg.resize_debounce.as_millis(), 150);

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let toml = r#"
        endpoint = "http://detector.local:9000/detect"
        timeout_secs = 30
        resize_debounce_ms = 250
    "#;
    std::io::Write::write_all(&mut file, toml.as_bytes()).expect("write config");

    std::env::set_var("BOXVIEW_CONFIG", file.path());
    std::env::set_var("BOXVIEW_TIMEOUT_SECS", "10");

    let cfg = ViewerConfig::load().expect("load config");
    assert_eq!(cfg.endpoint, "http://detector.local:9000/detect");
    assert_eq!(cfg.timeout.as_secs(), 10);
    assert_eq!(cfg.resize_debounce.as_millis(), 250);

    clear_env();
}

#[test]
fn rejects_invalid_endpoint_url() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("BOXVIEW_ENDPOINT", "not a url");
    assert!(ViewerConfig::load().is_err());

    clear_env();
}

#[test]
fn rejects_zero_timeout() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("BOXVIEW_TIMEOUT_SECS", "0");
    assert!(ViewerConfig::load().is_err());

    clear_env();
}

#[test]
fn rejects_non_numeric_debounce() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("BOXVIEW_RESIZE_DEBOUNCE_MS", "soon");
    assert!(ViewerConfig::load().is_err());

    clear_env();
}
