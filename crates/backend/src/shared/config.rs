use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShopifyConfig {
    /// Домен магазина, например `my-store.myshopify.com`
    #[serde(default)]
    pub store_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Файл-источник относительно текущей директории
    #[serde(default = "default_source_file")]
    pub source_file: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Минимальный интервал между запросами к API, 0 = без ограничения
    #[serde(default)]
    pub request_interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_file: default_source_file(),
            workers: default_workers(),
            request_interval_ms: 0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_version() -> String {
    "2025-01".to_string()
}

fn default_source_file() -> String {
    "products.csv".to_string()
}

fn default_workers() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[shopify]
store_url = ""
access_token = ""
api_version = "2025-01"

[sync]
source_file = "products.csv"
workers = 1
request_interval_ms = 0
timeout_secs = 30
"#;

impl ShopifyConfig {
    /// GraphQL endpoint Admin API: `https://{store}/admin/api/{version}/graphql.json`
    pub fn graphql_endpoint(&self) -> String {
        let store = self.store_url.trim().trim_end_matches('/');
        let base = if store.starts_with("http://") || store.starts_with("https://") {
            store.to_string()
        } else {
            format!("https://{}", store)
        };
        format!("{}/admin/api/{}/graphql.json", base, self.api_version)
    }

    /// Поля, без которых запросы к магазину заведомо не пройдут
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_url.trim().is_empty() {
            missing.push("SHOPIFY_STORE_URL");
        }
        if self.access_token.trim().is_empty() {
            missing.push("SHOPIFY_ACCESS_TOKEN");
        }
        missing
    }
}

impl Config {
    /// Переменные окружения перекрывают значения из файла
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SHOPIFY_STORE_URL") {
            self.shopify.store_url = v;
        }
        if let Some(v) = lookup("SHOPIFY_ACCESS_TOKEN") {
            self.shopify.access_token = v;
        }
        if let Some(v) = lookup("SHOPIFY_API_VERSION") {
            self.shopify.api_version = v;
        }
        if let Some(v) = lookup("SYNC_WORKERS").and_then(|v| v.parse().ok()) {
            self.sync.workers = v;
        }
    }
}

/// Load configuration from config.toml and the process environment
///
/// Search order:
/// 1. Next to the executable (copied there by build.rs)
/// 2. Current working directory
/// 3. Embedded default config
///
/// Environment variables are applied on top in every case.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match find_config_file() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Config>(&contents)
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", config_path.display(), e))?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            toml::from_str::<Config>(DEFAULT_CONFIG)?
        }
    };

    config.apply_env_overrides(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()));
    Ok(config)
}

fn find_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("config.toml"));
    }

    for path in candidates {
        if path.exists() {
            return Some(path);
        }
        tracing::debug!("config.toml not found at: {}", path.display());
    }
    None
}
