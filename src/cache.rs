// src/cache.rs

//! Cache de respostas do servidor em duas camadas.
//!
//! A camada remota (KV via REST) é consultada primeiro; qualquer falha nela cai
//! para o mapa local do processo. Não há coerência entre processos: é um
//! acelerador best-effort, nunca fonte de verdade.

pub mod clock;
pub mod local;
pub mod remote;

use std::{future::Future, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use local::{CacheEnvelope, LocalCache};
pub use remote::{RemoteCacheError, RemoteStore, RestKvClient};

use crate::config::Environment;

#[derive(Clone)]
pub struct ServerCache {
    inner: Arc<Inner>,
}

struct Inner {
    remote: Option<Arc<dyn RemoteStore>>,
    local: LocalCache,
    environment: Environment,
}

impl ServerCache {
    pub fn new(
        remote: Option<Arc<dyn RemoteStore>>,
        clock: Arc<dyn Clock>,
        environment: Environment,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                local: LocalCache::new(clock),
                environment,
            }),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.inner.remote.is_some()
    }

    fn log_remote_failure(&self, op: &str, key: &str, error: &RemoteCacheError) {
        if self.inner.environment.is_production() {
            tracing::debug!(op, key, "Cache remoto indisponível, usando local: {}", error);
        } else {
            tracing::warn!(op, key, "Cache remoto indisponível, usando local: {}", error);
        }
    }

    /// Valor cru. `Some(Value::Null)` é um "nada" guardado de propósito, diferente de ausência.
    pub async fn get_value(&self, key: &str) -> Option<Value> {
        if let Some(remote) = &self.inner.remote {
            match remote.get(key).await {
                Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                    Ok(value) => return Some(value),
                    Err(e) => self.log_remote_failure("get", key, &e.into()),
                },
                Ok(None) => {}
                Err(e) => self.log_remote_failure("get", key, &e),
            }
        }

        self.inner.local.get(key)
    }

    pub async fn set_value(&self, key: &str, value: Value, ttl_secs: u64) {
        if let Some(remote) = &self.inner.remote {
            if let Err(e) = remote.set(key, &value.to_string(), ttl_secs).await {
                self.log_remote_failure("set", key, &e);
            }
        }

        self.inner.local.insert(key, value, ttl_secs);
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key).await?;

        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(key, "Entrada de cache com formato inesperado: {}", e);
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        match serde_json::to_value(value) {
            Ok(value) => self.set_value(key, value, ttl_secs).await,
            Err(e) => tracing::error!(key, "Falha ao serializar valor para o cache: {}", e),
        }
    }

    pub async fn delete(&self, key: &str) {
        if let Some(remote) = &self.inner.remote {
            if let Err(e) = remote.delete(key).await {
                self.log_remote_failure("delete", key, &e);
            }
        }

        self.inner.local.remove(key);
    }

    /// Read-through: devolve o valor em cache ou roda `loader` e guarda o `Ok`.
    /// Erros do loader não são cacheados. Sem single-flight: misses concorrentes
    /// recalculam cada um.
    pub async fn get_or_set<T, E, F, Fut>(&self, key: &str, ttl_secs: u64, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = loader().await?;
        self.set(key, &value, ttl_secs).await;
        Ok(value)
    }

    pub fn purge_expired(&self) -> usize {
        self.inner.local.purge_expired()
    }

    /// Esvazia a camada local. Chamado no desligamento do servidor.
    pub fn dispose(&self) {
        self.inner.local.clear();
    }
}
