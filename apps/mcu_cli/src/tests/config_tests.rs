use super::{load_cookie_jar, load_settings_file, save_cookie_jar, Settings};

use std::{
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use shared::domain::CookieScope;

fn temp_root(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("mcu_cli_{label}_{suffix}"))
}

#[test]
fn missing_settings_file_keeps_defaults() {
    let root = temp_root("missing");
    assert_eq!(load_settings_file(&root.join("mcu.toml")), Settings::default());
}

#[test]
fn settings_file_overrides_defaults() {
    let root = temp_root("settings");
    fs::create_dir_all(&root).expect("temp root");
    let path = root.join("mcu.toml");
    fs::write(
        &path,
        r#"
server_url = "http://clinic.local:8080"
cookie_jar = "/tmp/jar.json"
referrer = "http://clinic.local:8080/login"
wait_for_dismissal = true
"#,
    )
    .expect("write settings");

    let settings = load_settings_file(&path);
    assert_eq!(settings.server_url, "http://clinic.local:8080");
    assert_eq!(settings.cookie_jar_path, PathBuf::from("/tmp/jar.json"));
    assert_eq!(
        settings.referrer.as_deref(),
        Some("http://clinic.local:8080/login")
    );
    assert!(settings.wait_for_dismissal);

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn unparsable_settings_file_is_ignored() {
    let root = temp_root("broken");
    fs::create_dir_all(&root).expect("temp root");
    let path = root.join("mcu.toml");
    fs::write(&path, "server_url = [").expect("write settings");

    assert_eq!(load_settings_file(&path), Settings::default());

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn cookie_jar_round_trips_and_creates_parent_dir() {
    let root = temp_root("jar");
    let path = root.join("data").join("cookies.json");

    assert!(load_cookie_jar(&path).expect("missing jar").is_empty());

    let mut jar = client_core::CookieJar::new();
    jar.set(CookieScope::User, "abc123");
    save_cookie_jar(&path, &jar).expect("save jar");
    assert!(root.join("data").exists());

    let restored = load_cookie_jar(&path).expect("load jar");
    assert_eq!(restored.get(CookieScope::User), Some("abc123"));

    fs::remove_dir_all(root).expect("cleanup");
}
