use super::{settings_from_sources, Settings};

use std::{collections::HashMap, path::PathBuf, time::Duration};

use review_engine::Provider;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_without_sources() {
    let settings = settings_from_sources(None, env_from(&[]));
    let defaults = Settings::default();

    assert_eq!(settings.server_bind, defaults.server_bind);
    assert_eq!(settings.output_dir, PathBuf::from("outputs"));
    assert_eq!(settings.max_upload_bytes, 8 * 1024 * 1024);
    assert_eq!(settings.llm.provider, Provider::OpenAi);
    assert_eq!(settings.llm.model, "gpt-4o-mini");
    assert_eq!(settings.llm.timeout, Duration::from_secs(60));
}

#[test]
fn file_settings_override_defaults() {
    let file = r#"
bind_addr = "0.0.0.0:9000"
output_dir = "reports"
provider = "ollama"
model = "llama3"
timeout_seconds = 5
"#;
    let settings = settings_from_sources(Some(file), env_from(&[]));

    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.output_dir, PathBuf::from("reports"));
    assert_eq!(settings.llm.provider, Provider::Ollama);
    assert_eq!(settings.llm.model, "llama3");
    assert_eq!(settings.llm.timeout, Duration::from_secs(5));
}

#[test]
fn env_overrides_file_and_prefixed_bind_wins() {
    let file = r#"bind_addr = "0.0.0.0:9000""#;
    let settings = settings_from_sources(
        Some(file),
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("PROVIDER", "google"),
            ("GOOGLE_API_KEY", "g-key"),
            ("OUTPUT_DIR", "/tmp/review-out"),
        ]),
    );

    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.llm.provider, Provider::Google);
    assert_eq!(settings.llm.google_api_key, "g-key");
    assert_eq!(settings.output_dir, PathBuf::from("/tmp/review-out"));
}

#[test]
fn unparsable_numbers_keep_previous_values() {
    let settings = settings_from_sources(
        None,
        env_from(&[("TIMEOUT", "soon"), ("MAX_UPLOAD_BYTES", "lots")]),
    );
    assert_eq!(settings.llm.timeout, Duration::from_secs(60));
    assert_eq!(settings.max_upload_bytes, 8 * 1024 * 1024);
}

#[test]
fn invalid_file_is_ignored() {
    let settings = settings_from_sources(Some("bind_addr = ["), env_from(&[]));
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}
