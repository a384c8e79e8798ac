use super::graphql_models::{GraphqlRequest, UserError};
use crate::shared::config::{ShopifyConfig, SyncConfig};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};

/// Ошибки вызова Shopify Admin API
#[derive(Debug, Error)]
pub enum ShopifyApiError {
    /// Не заданы реквизиты магазина (обнаруживается только при вызове)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Сетевая ошибка или не-2xx статус
    #[error("Transport error: {0}")]
    Transport(String),

    /// Конверт ответа содержит верхнеуровневый `errors`
    #[error("GraphQL errors: {0}")]
    Graphql(String),

    /// Ответ корректный, но мутация вернула `userErrors` / `mediaUserErrors`
    #[error("{}", format_user_errors(.0))]
    Domain(Vec<UserError>),

    /// Форма `data` не совпала с ожидаемой
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Domain,
}

impl ShopifyApiError {
    /// Domain: бизнес-валидация магазина, остальное относится к транспорту
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopifyApiError::Domain(_) => ErrorKind::Domain,
            _ => ErrorKind::Transport,
        }
    }
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Отправка одного GraphQL-конверта `{query, variables}` и получение `{data, errors?}`
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn post(&self, request: &GraphqlRequest) -> Result<Value, ShopifyApiError>;
}

/// Транспорт поверх reqwest
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
    store_url: String,
    access_token: String,
}

impl ReqwestTransport {
    pub fn new(config: &ShopifyConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.graphql_endpoint(),
            store_url: config.store_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Записать в лог-файл
    fn log_to_file(&self, message: &str) {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open("shopify_api_requests.log")
        {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}

#[async_trait]
impl GraphqlTransport for ReqwestTransport {
    async fn post(&self, request: &GraphqlRequest) -> Result<Value, ShopifyApiError> {
        if self.store_url.trim().is_empty() {
            return Err(ShopifyApiError::Config(
                "SHOPIFY_STORE_URL is not set".to_string(),
            ));
        }
        if self.access_token.trim().is_empty() {
            return Err(ShopifyApiError::Config(
                "SHOPIFY_ACCESS_TOKEN is not set".to_string(),
            ));
        }

        let body = serde_json::to_string(request)
            .map_err(|e| ShopifyApiError::Transport(format!("Cannot encode request: {}", e)))?;
        self.log_to_file(&format!(
            "=== REQUEST ===\nPOST {}\nX-Shopify-Access-Token: ****\nBody: {}",
            self.endpoint, body
        ));

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ShopifyApiError::Transport(e.to_string()))?;

        let status = response.status();
        self.log_to_file(&format!("Response status: {}", status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.log_to_file(&format!("ERROR Response body:\n{}", body));
            tracing::error!("Shopify API request failed: {}", body);
            return Err(ShopifyApiError::Transport(format!(
                "Shopify API request failed with status {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ShopifyApiError::Transport(e.to_string()))?;
        self.log_to_file(&format!("=== RESPONSE BODY ===\n{}\n", body));

        serde_json::from_str::<Value>(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            tracing::error!("Failed to parse Shopify API response. Error: {}", e);
            ShopifyApiError::Transport(format!(
                "Malformed response envelope: {}. Response: {}",
                e, preview
            ))
        })
    }
}

/// Ограничитель частоты: не чаще одного запроса за интервал
pub struct RequestPacer {
    interval: Mutex<Interval>,
}

impl RequestPacer {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval: Mutex::new(interval),
        }
    }

    pub async fn wait(&self) {
        self.interval.lock().await.tick().await;
    }
}

/// HTTP-клиент Shopify Admin GraphQL API
pub struct ShopifyApiClient {
    transport: Arc<dyn GraphqlTransport>,
    pacer: Option<RequestPacer>,
}

impl ShopifyApiClient {
    pub fn new(shopify: &ShopifyConfig, sync: &SyncConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(shopify, Duration::from_secs(sync.timeout_secs))?;
        let client = Self::with_transport(Arc::new(transport));
        Ok(match sync.request_interval_ms {
            0 => client,
            ms => client.with_pacing(Duration::from_millis(ms)),
        })
    }

    pub fn with_transport(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self {
            transport,
            pacer: None,
        }
    }

    pub fn with_pacing(mut self, period: Duration) -> Self {
        self.pacer = Some(RequestPacer::new(period));
        self
    }

    /// Выполнить запрос или мутацию и разобрать `data` в типизированный ответ
    pub async fn execute<V, T>(&self, query: &str, variables: &V) -> Result<T, ShopifyApiError>
    where
        V: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if let Some(pacer) = &self.pacer {
            pacer.wait().await;
        }

        let variables = serde_json::to_value(variables)
            .map_err(|e| ShopifyApiError::Transport(format!("Cannot encode variables: {}", e)))?;
        let request = GraphqlRequest {
            query: query.to_string(),
            variables,
        };

        let envelope = self.transport.post(&request).await?;
        let data = check_envelope(envelope)?;

        serde_json::from_value::<T>(data).map_err(|e| ShopifyApiError::Decode(e.to_string()))
    }
}

/// Двухуровневая проверка ответа:
/// 1. верхнеуровневый `errors` -> `Graphql`
/// 2. `userErrors` / `mediaUserErrors` в первом ключе `data` -> `Domain`
/// 3. иначе `data` без изменений
pub fn check_envelope(mut envelope: Value) -> Result<Value, ShopifyApiError> {
    if let Some(errors) = envelope.get("errors").filter(|e| !e.is_null()) {
        return Err(ShopifyApiError::Graphql(errors.to_string()));
    }

    let data = match envelope.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Value::Object(Default::default()),
        Some(data) => data,
    };

    if let Some(payload) = data
        .as_object()
        .and_then(|object| object.values().next())
        .and_then(Value::as_object)
    {
        for key in ["userErrors", "mediaUserErrors"] {
            let errors = match payload.get(key).and_then(Value::as_array) {
                Some(errors) if !errors.is_empty() => errors,
                _ => continue,
            };
            let parsed = serde_json::from_value::<Vec<UserError>>(Value::Array(errors.clone()))
                .map_err(|e| ShopifyApiError::Decode(format!("{}: {}", key, e)))?;
            return Err(ShopifyApiError::Domain(parsed));
        }
    }

    Ok(data)
}
