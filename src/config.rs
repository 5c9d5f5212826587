// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    cache::{RemoteStore, RestKvClient, ServerCache, SystemClock},
    db::{PermissionSource, PgPermissionSource, RbacRepository, UserRepository},
    services::{auth::AuthService, permission_service::PermissionService, rbac_service::RbacService},
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PERMISSIONS_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub kv_rest_api_url: Option<String>,
    pub kv_rest_api_token: Option<String>,
    pub permissions_ttl_secs: u64,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Variável vazia conta como ausente
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let permissions_ttl_secs = match get("PERMISSIONS_CACHE_TTL_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PERMISSIONS_CACHE_TTL_SECS inválido: '{}'", raw))?,
            None => DEFAULT_PERMISSIONS_TTL_SECS,
        };

        let environment = match get("APP_ENV").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            kv_rest_api_url: get("KV_REST_API_URL"),
            kv_rest_api_token: get("KV_REST_API_TOKEN"),
            permissions_ttl_secs,
            environment,
        })
    }

    /// O tier remoto só liga com URL e token presentes.
    pub fn remote_cache_credentials(&self) -> Option<(&str, &str)> {
        match (&self.kv_rest_api_url, &self.kv_rest_api_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub cache: ServerCache,
    pub auth_service: AuthService,
    pub permission_service: PermissionService,
    pub rbac_service: RbacService,
    pub user_repo: UserRepository,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let remote: Option<Arc<dyn RemoteStore>> = match config.remote_cache_credentials() {
            Some((url, token)) => {
                tracing::info!("Cache remoto habilitado em {}", url);
                Some(Arc::new(RestKvClient::new(url, token)?))
            }
            None => {
                tracing::info!("Cache remoto não configurado, usando apenas o cache local");
                None
            }
        };
        let cache = ServerCache::new(remote, Arc::new(SystemClock), config.environment);

        let source = Arc::new(PgPermissionSource::new(
            UserRepository::new(db_pool.clone()),
            RbacRepository::new(db_pool.clone()),
        ));

        Ok(Self::from_parts(config, db_pool, cache, source))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(
        config: Config,
        db_pool: PgPool,
        cache: ServerCache,
        source: Arc<dyn PermissionSource>,
    ) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());

        let auth_service = AuthService::new(config.jwt_secret.clone());
        let permission_service =
            PermissionService::new(source, cache.clone(), config.permissions_ttl_secs);
        let rbac_service = RbacService::new(rbac_repo, db_pool.clone());

        Self {
            db_pool,
            config: Arc::new(config),
            cache,
            auth_service,
            permission_service,
            rbac_service,
            user_repo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/techtool"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.permissions_ttl_secs, 60);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.remote_cache_credentials().is_none());
    }

    #[test]
    fn remote_tier_needs_url_and_token() {
        let only_url = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/techtool"),
            ("JWT_SECRET", "segredo"),
            ("KV_REST_API_URL", "https://kv.example.com"),
        ]))
        .unwrap();
        assert!(only_url.remote_cache_credentials().is_none());

        let both = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/techtool"),
            ("JWT_SECRET", "segredo"),
            ("KV_REST_API_URL", "https://kv.example.com"),
            ("KV_REST_API_TOKEN", "tok"),
            ("APP_ENV", "Production"),
        ]))
        .unwrap();
        assert_eq!(
            both.remote_cache_credentials(),
            Some(("https://kv.example.com", "tok"))
        );
        assert!(both.environment.is_production());
    }

    #[test]
    fn missing_required_or_bad_ttl_fails() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "segredo")])).is_err());

        let bad_ttl = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/techtool"),
            ("JWT_SECRET", "segredo"),
            ("PERMISSIONS_CACHE_TTL_SECS", "sessenta"),
        ]));
        assert!(bad_ttl.is_err());
    }
}
