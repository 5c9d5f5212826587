// src/cache/remote.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteCacheError {
    #[error("Erro HTTP no cache remoto: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache remoto respondeu HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Comando rejeitado pelo cache remoto: {0}")]
    Command(String),

    #[error("Resposta inválida do cache remoto: {0}")]
    Json(#[from] serde_json::Error),
}

/// Camada remota do cache. Valores trafegam como texto JSON já serializado.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RemoteCacheError>;
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), RemoteCacheError>;
    async fn delete(&self, key: &str) -> Result<(), RemoteCacheError>;
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Cliente do KV via API REST de comandos (`["SET", key, value, "EX", ttl]`).
pub struct RestKvClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RestKvClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, RemoteCacheError> {
        // Sem timeout explícito: vale o padrão do reqwest.
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn command(&self, args: Value) -> Result<Option<Value>, RemoteCacheError> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteCacheError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CommandResponse = serde_json::from_slice(&response.bytes().await?)?;
        if let Some(message) = parsed.error {
            return Err(RemoteCacheError::Command(message));
        }

        Ok(parsed.result.filter(|v| !v.is_null()))
    }
}

#[async_trait]
impl RemoteStore for RestKvClient {
    async fn get(&self, key: &str) -> Result<Option<String>, RemoteCacheError> {
        let result = self.command(json!(["GET", key])).await?;

        Ok(result.map(|value| match value {
            Value::String(raw) => raw,
            other => other.to_string(),
        }))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), RemoteCacheError> {
        self.command(json!(["SET", key, value, "EX", ttl_secs.to_string()]))
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteCacheError> {
        self.command(json!(["DEL", key])).await?;
        Ok(())
    }
}
