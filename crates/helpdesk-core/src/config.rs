//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys). Provides helpers to expand
//! `~` and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::settings::DEFAULT_STORAGE_KEY;

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name: env_name.to_string() };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The fully merged, typed configuration.
    pub fn app(&self) -> anyhow::Result<AppConfig> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract configuration: {}", e))
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let app = self.app()?;
        app.validate()?;
        match env {
            "prod" | "production" => {
                if app.delays.search_ms == 0 && app.delays.refresh_ms == 0 {
                    tracing::warn!("production config disables every simulated delay");
                }
            }
            "dev" | "development" => {}
            "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub settings: SettingsConfig,
    pub delays: DelayConfig,
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsConfig {
    pub path: String,
    pub storage_key: String,
}

/// Simulated latencies, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelayConfig {
    pub search_ms: u64,
    pub refresh_ms: u64,
    pub suggestions_ms: u64,
    pub typing_start_ms: u64,
    pub typing_reply_ms: u64,
    pub report_refresh_ms: u64,
    pub period_reload_ms: u64,
    /// Cancel an outstanding deferred update when a new one is scheduled.
    pub supersede: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    pub bar_height: f64,
    pub min_bar_height: f64,
    pub headroom: f64,
    pub line_width: f64,
    pub line_height: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings: SettingsConfig {
                path: "~/.config/helpdesk/storage.json".to_string(),
                storage_key: DEFAULT_STORAGE_KEY.to_string(),
            },
            delays: DelayConfig {
                search_ms: 500,
                refresh_ms: 1000,
                suggestions_ms: 1500,
                typing_start_ms: 1000,
                typing_reply_ms: 3000,
                report_refresh_ms: 1500,
                period_reload_ms: 500,
                supersede: true,
            },
            charts: ChartConfig {
                bar_height: 220.0,
                min_bar_height: 12.0,
                headroom: 1.1,
                line_width: 280.0,
                line_height: 150.0,
            },
        }
    }
}

impl DelayConfig {
    /// Every delay zeroed, same overlap policy.
    pub fn instant(&self) -> Self {
        Self {
            search_ms: 0,
            refresh_ms: 0,
            suggestions_ms: 0,
            typing_start_ms: 0,
            typing_reply_ms: 0,
            report_refresh_ms: 0,
            period_reload_ms: 0,
            supersede: self.supersede,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.settings.storage_key.trim().is_empty() {
            return Err(anyhow::anyhow!("settings.storage_key must not be empty"));
        }
        if !(self.charts.bar_height > 0.0 && self.charts.line_height > 0.0) {
            return Err(anyhow::anyhow!(
                "chart heights must be positive (bar {}, line {})",
                self.charts.bar_height,
                self.charts.line_height
            ));
        }
        if self.charts.line_width < 0.0 || self.charts.min_bar_height < 0.0 {
            return Err(anyhow::anyhow!("chart widths and minimum bar height must not be negative"));
        }
        if self.charts.headroom < 1.0 {
            return Err(anyhow::anyhow!("charts.headroom must be at least 1.0, got {}", self.charts.headroom));
        }
        Ok(())
    }

    /// Settings store location, expanded and anchored at `base` when relative.
    pub fn settings_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.settings.path)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_dashboard_timings() {
        let app = AppConfig::default();
        assert_eq!(app.delays.search_ms, 500);
        assert_eq!(app.delays.suggestions_ms, 1500);
        assert_eq!(app.settings.storage_key, "chatbot-settings");
        assert!(app.validate().is_ok());
    }

    #[test]
    fn files_and_env_layer_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[delays]\nsearch_ms = 50\n")?;
            jail.create_file("config.test.toml", "[charts]\nbar_height = 100.0\n")?;
            jail.set_env("APP_SETTINGS__STORAGE_KEY", "other-key");

            let config = Config::load_for_env("test").map_err(|e| e.to_string())?;
            let app = config.app().map_err(|e| e.to_string())?;
            assert_eq!(app.delays.search_ms, 50);
            assert_eq!(app.delays.refresh_ms, 1000);
            assert_eq!(app.charts.bar_height, 100.0);
            assert_eq!(app.settings.storage_key, "other-key");
            assert_eq!(config.get::<u64>("delays.typing_reply_ms").map_err(|e| e.to_string())?, 3000);
            Ok(())
        });
    }

    #[test]
    fn invalid_headroom_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[charts]\nheadroom = 0.5\n")?;
            assert!(Config::load_for_env("dev").is_err());
            Ok(())
        });
    }

    #[test]
    fn relative_settings_path_is_anchored() {
        let mut app = AppConfig::default();
        app.settings.path = "state/storage.json".to_string();
        let resolved = app.settings_path(Path::new("/srv/helpdesk"));
        assert_eq!(resolved, PathBuf::from("/srv/helpdesk/state/storage.json"));
    }
}
