use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::{Result, ScoutError};
use crate::models::CategoryHint;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub geocoder: GeocoderConfig,
    pub politeness: PolitenessConfig,
    pub engine: EngineConfig,
    pub sources: Vec<SourceConfig>,
}

/// Where the store credentials live. The values themselves come from the
/// environment (or `.env`), never from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url_env: String,
    pub key_env: String,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url_env: "SUPABASE_URL".to_string(),
            key_env: "SUPABASE_KEY".to_string(),
            table: "events".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub url: String,
    pub key: String,
}

impl StoreConfig {
    pub fn credentials(&self) -> Result<StoreCredentials> {
        Ok(StoreCredentials {
            url: read_env(&self.url_env)?,
            key: read_env(&self.key_env)?,
        })
    }
}

fn read_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ScoutError::MissingEnv {
            name: name.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub country_code: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            country_code: "tr".to_string(),
            timeout_secs: 5,
            user_agent: "event_radar_bot_v5_tr".to_string(),
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    pub write_delay_ms: u64,
    pub page_delay_ms: u64,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            write_delay_ms: 200,
            page_delay_ms: 2000,
        }
    }
}

impl PolitenessConfig {
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Offset of the venues' civil time from UTC. Start times are stored in
    /// that civil time without an offset.
    pub utc_offset_hours: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { utc_offset_hours: 3 }
    }
}

impl EngineConfig {
    /// Current wall-clock time in the venues' civil time
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc() + chrono::Duration::hours(self.utc_offset_hours)
    }
}

/// One listing page to scrape
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    /// Origin relative card links are resolved against; defaults to `url`
    pub base_origin: Option<String>,
    pub category: CategoryHint,
    pub card_selector: String,
    /// Render the page in headless Chrome instead of a plain fetch
    #[serde(default)]
    pub render: bool,
    #[serde(default = "default_link_keywords")]
    pub link_keywords: Vec<String>,
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
}

fn default_link_keywords() -> Vec<String> {
    vec!["etkinlik".to_string(), "bilet".to_string()]
}

fn default_min_text_len() -> usize {
    15
}

impl SourceConfig {
    pub fn base_url(&self) -> Result<Url> {
        let base = self.base_origin.as_deref().unwrap_or(&self.url);
        Ok(Url::parse(base)?)
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    fn validate(&self) -> Result<()> {
        for (i, source) in self.sources.iter().enumerate() {
            source.base_url()?;
            if self.sources[..i].iter().any(|s| s.name == source.name) {
                return Err(ScoutError::Config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        Ok(())
    }
}
