use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE_NAME: &str = "golden_batch.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub service_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".into(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientSettings {
    /// Applies command-line overrides and validates the resulting service url.
    pub fn with_overrides(
        mut self,
        service_url: Option<&str>,
        request_timeout_ms: Option<u64>,
    ) -> anyhow::Result<Self> {
        if let Some(v) = service_url {
            self.service_url = v.to_string();
        }
        if let Some(v) = request_timeout_ms {
            self.request_timeout = Duration::from_millis(v);
        }
        self.service_url = normalize_service_url(&self.service_url)?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    request_timeout_ms: Option<u64>,
}

pub fn load_settings() -> ClientSettings {
    let raw = settings_file_candidates()
        .into_iter()
        .find_map(|path| fs::read_to_string(path).ok());
    load_settings_with(raw.as_deref(), |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file, then environment overrides.
pub fn load_settings_with(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.service_url {
                    settings.service_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_ms {
                    settings.request_timeout = Duration::from_millis(v);
                }
            }
            Err(err) => tracing::warn!("ignoring invalid {SETTINGS_FILE_NAME}: {err}"),
        }
    }

    if let Some(v) = env("PREDICTION_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout = Duration::from_millis(parsed);
        }
    }

    settings
}

/// Checks that `raw` is an absolute http(s) URL and strips any trailing slash.
pub fn normalize_service_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("invalid service url '{raw}'"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow!(
                "service url must start with http:// or https:// (got {other}://)"
            ))
        }
    }
    if parsed.host_str().is_none() {
        return Err(anyhow!("service url '{raw}' has no host"));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![Path::new(SETTINGS_FILE_NAME).to_path_buf()];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("golden_batch").join(SETTINGS_FILE_NAME));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_local_service() {
        let settings = load_settings_with(None, env_from(&[]));
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.service_url, "http://localhost:5000");
    }

    #[test]
    fn file_values_apply_and_env_wins() {
        let file = r#"
            service_url = "http://plant-model:5000"
            request_timeout_ms = 2500
        "#;
        let settings = load_settings_with(Some(file), env_from(&[]));
        assert_eq!(settings.service_url, "http://plant-model:5000");
        assert_eq!(settings.request_timeout, Duration::from_millis(2500));

        let settings = load_settings_with(
            Some(file),
            env_from(&[
                ("PREDICTION_SERVICE_URL", "http://a:1"),
                ("APP__SERVICE_URL", "http://b:2"),
                ("APP__REQUEST_TIMEOUT_MS", "750"),
            ]),
        );
        assert_eq!(settings.service_url, "http://b:2");
        assert_eq!(settings.request_timeout, Duration::from_millis(750));
    }

    #[test]
    fn invalid_file_and_unparsable_timeout_are_ignored() {
        let settings = load_settings_with(
            Some("service_url = ["),
            env_from(&[("APP__REQUEST_TIMEOUT_MS", "soon")]),
        );
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn normalizes_service_url() {
        assert_eq!(
            normalize_service_url(" http://localhost:5000/ ").expect("valid"),
            "http://localhost:5000"
        );
        assert!(normalize_service_url("ftp://localhost").is_err());
        assert!(normalize_service_url("localhost:5000").is_err());
    }

    #[test]
    fn overrides_replace_loaded_values_and_validate() {
        let settings = ClientSettings::default()
            .with_overrides(Some("https://model.plant.local/"), Some(1500))
            .expect("valid overrides");
        assert_eq!(settings.service_url, "https://model.plant.local");
        assert_eq!(settings.request_timeout, Duration::from_millis(1500));

        let err = ClientSettings {
            service_url: "not a url".into(),
            ..ClientSettings::default()
        }
        .with_overrides(None, None)
        .expect_err("invalid url from env/file must be rejected");
        assert!(err.to_string().contains("invalid service url"), "{err}");
    }
}
