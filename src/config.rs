use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::clients::{darksky, eventbrite, geocode, tmdb, yelp};
use crate::constants::cache;
use crate::domain::ResourceKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Directory served for any path that is not an API route.
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            public_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite:` or `postgres://` connection string.
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    /// Create the tables on startup. Disable when the schema is managed elsewhere.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/city-explorer.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,

    pub api_key: String,
}

impl ProviderConfig {
    fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::with_base("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Outbound request timeout in seconds; 0 waits forever.
    pub request_timeout_seconds: u64,

    pub geocode: ProviderConfig,

    pub weather: ProviderConfig,

    pub events: ProviderConfig,

    pub movies: ProviderConfig,

    pub businesses: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            geocode: ProviderConfig::with_base(geocode::DEFAULT_BASE_URL),
            weather: ProviderConfig::with_base(darksky::DEFAULT_BASE_URL),
            events: ProviderConfig::with_base(eventbrite::DEFAULT_BASE_URL),
            movies: ProviderConfig::with_base(tmdb::DEFAULT_BASE_URL),
            businesses: ProviderConfig::with_base(yelp::DEFAULT_BASE_URL),
        }
    }
}

/// Freshness windows in milliseconds. An unset window means a cached batch
/// never expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_freshness_ms: Option<u64>,

    pub events_freshness_ms: Option<u64>,

    pub movies_freshness_ms: Option<u64>,

    pub businesses_freshness_ms: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_freshness_ms: Some(cache::WEATHER_FRESHNESS_MS),
            events_freshness_ms: None,
            movies_freshness_ms: None,
            businesses_freshness_ms: None,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn window_for(&self, kind: ResourceKind) -> Option<u64> {
        match kind {
            ResourceKind::Weather => self.weather_freshness_ms,
            ResourceKind::Events => self.events_freshness_ms,
            ResourceKind::Movies => self.movies_freshness_ms,
            ResourceKind::Businesses => self.businesses_freshness_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "city-explorer".to_string());

        Self {
            metrics_enabled: false,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads the first config file found (or defaults), then applies `.env`
    /// and process environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Environment variables take precedence over the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }

        let overrides: [(&str, &mut String); 8] = [
            ("DATABASE_URL", &mut self.database.url),
            ("PUBLIC_DIR", &mut self.server.public_dir),
            ("LOG_LEVEL", &mut self.general.log_level),
            ("GEOCODE_API_KEY", &mut self.providers.geocode.api_key),
            ("WEATHER_API_KEY", &mut self.providers.weather.api_key),
            ("EVENTBRITE_API_KEY", &mut self.providers.events.api_key),
            ("MOVIE_API_KEY", &mut self.providers.movies.api_key),
            ("YELP_API_KEY", &mut self.providers.businesses.api_key),
        ];

        for (key, slot) in overrides {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("city-explorer").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".city-explorer").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.database.url.trim().is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        Ok(())
    }

    /// Copy safe to print: API keys are masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for provider in [
            &mut copy.providers.geocode,
            &mut copy.providers.weather,
            &mut copy.providers.events,
            &mut copy.providers.movies,
            &mut copy.providers.businesses,
        ] {
            if !provider.api_key.is_empty() {
                provider.api_key = "********".to_string();
            }
        }
        copy
    }
}
