use std::{fs, path::PathBuf, time::Duration};

use review_engine::{LlmSettings, Provider};
use serde::Deserialize;
use tracing::warn;

const CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub output_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub llm: LlmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            output_dir: PathBuf::from("outputs"),
            max_upload_bytes: 8 * 1024 * 1024,
            llm: LlmSettings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    output_dir: Option<String>,
    max_upload_bytes: Option<usize>,
    provider: Option<String>,
    model: Option<String>,
    ollama_host: Option<String>,
    timeout_seconds: Option<u64>,
}

/// Defaults, then `server.toml`, then `.env` and the process environment.
pub fn load_settings() -> Settings {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            warn!(%error, "ignoring unreadable .env file");
        }
    }
    let file = fs::read_to_string(CONFIG_FILE).ok();
    settings_from_sources(file.as_deref(), |key| std::env::var(key).ok())
}

pub(crate) fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(error) => warn!(%error, "ignoring invalid {CONFIG_FILE}"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }

    if let Some(v) = env("MAX_UPLOAD_BYTES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_upload_bytes = parsed;
        }
    }

    if let Some(v) = env("PROVIDER") {
        settings.llm.provider = Provider::from_name(&v);
    }
    if let Some(v) = env("MODEL") {
        settings.llm.model = v;
    }
    if let Some(v) = env("OPENAI_API_KEY") {
        settings.llm.openai_api_key = v;
    }
    if let Some(v) = env("GOOGLE_API_KEY") {
        settings.llm.google_api_key = v;
    }
    if let Some(v) = env("OLLAMA_HOST") {
        settings.llm.ollama_host = v;
    }
    if let Some(v) = env("OPENAI_BASE_URL") {
        settings.llm.openai_base_url = v;
    }
    if let Some(v) = env("GOOGLE_BASE_URL") {
        settings.llm.google_base_url = v;
    }

    if let Some(v) = env("TIMEOUT") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.llm.timeout = Duration::from_secs(parsed);
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.output_dir {
        settings.output_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.max_upload_bytes {
        settings.max_upload_bytes = v;
    }
    if let Some(v) = file_cfg.provider {
        settings.llm.provider = Provider::from_name(&v);
    }
    if let Some(v) = file_cfg.model {
        settings.llm.model = v;
    }
    if let Some(v) = file_cfg.ollama_host {
        settings.llm.ollama_host = v;
    }
    if let Some(v) = file_cfg.timeout_seconds {
        settings.llm.timeout = Duration::from_secs(v);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
