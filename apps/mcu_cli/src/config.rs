use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::CookieJar;

pub const SETTINGS_FILE: &str = "mcu.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub cookie_jar_path: PathBuf,
    pub referrer: Option<String>,
    pub wait_for_dismissal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            cookie_jar_path: PathBuf::from("./data/cookies.json"),
            referrer: None,
            wait_for_dismissal: false,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = load_settings_file(Path::new(SETTINGS_FILE));

    if let Ok(v) = std::env::var("MCU_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("MCU_COOKIE_JAR") {
        settings.cookie_jar_path = v.into();
    }
    if let Ok(v) = std::env::var("APP__COOKIE_JAR") {
        settings.cookie_jar_path = v.into();
    }

    if let Ok(v) = std::env::var("MCU_REFERRER") {
        settings.referrer = Some(v);
    }
    if let Ok(v) = std::env::var("APP__REFERRER") {
        settings.referrer = Some(v);
    }

    settings
}

fn load_settings_file(path: &Path) -> Settings {
    let mut settings = Settings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            return settings;
        }
    };

    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("cookie_jar").and_then(toml::Value::as_str) {
        settings.cookie_jar_path = v.into();
    }
    if let Some(v) = file_cfg.get("referrer").and_then(toml::Value::as_str) {
        settings.referrer = Some(v.to_string());
    }
    if let Some(v) = file_cfg.get("wait_for_dismissal").and_then(toml::Value::as_bool) {
        settings.wait_for_dismissal = v;
    }

    settings
}

pub fn load_cookie_jar(path: &Path) -> anyhow::Result<CookieJar> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(CookieJar::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read cookie jar '{}'", path.display()))
        }
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("cookie jar '{}' is not valid JSON", path.display()))
}

pub fn save_cookie_jar(path: &Path, jar: &CookieJar) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directory '{}' for cookie jar",
                parent.display()
            )
        })?;
    }
    let raw = serde_json::to_string_pretty(jar).context("failed to encode cookie jar")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write cookie jar '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
