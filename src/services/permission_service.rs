// src/services/permission_service.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    cache::ServerCache,
    common::error::AppError,
    db::PermissionSource,
    models::{
        auth::Session,
        permissions::{
            build_permission_flags, Action, Permission, PermissionsBootstrap, PermissionsUser,
            Resource,
        },
    },
};

pub const PERMISSIONS_KEY_PREFIX: &str = "permissions:";

pub fn permissions_cache_key(email: &str) -> String {
    format!("{}{}", PERMISSIONS_KEY_PREFIX, email)
}

/// Atalho de admin: olha a string `users.role`, não a tabela `roles`.
/// Editar um cargo chamado "Admin" na tabela não muda nada para esses usuários.
/// Igualdade exata sem caixa, a mesma do `LOWER(me.role) = 'admin'` da policy de RLS.
pub fn is_admin_role(role: &str) -> bool {
    role.eq_ignore_ascii_case("admin")
}

#[derive(Clone)]
pub struct PermissionService {
    source: Arc<dyn PermissionSource>,
    cache: ServerCache,
    ttl_secs: u64,
}

impl PermissionService {
    pub fn new(source: Arc<dyn PermissionSource>, cache: ServerCache, ttl_secs: u64) -> Self {
        Self {
            source,
            cache,
            ttl_secs,
        }
    }

    /// Permissões efetivas do e-mail, memoizadas por `ttl_secs`.
    /// `None` (usuário inexistente) também é memoizado.
    pub async fn resolve(&self, email: &str) -> Result<Option<PermissionsUser>, AppError> {
        let key = permissions_cache_key(email);
        self.cache
            .get_or_set(&key, self.ttl_secs, || self.load(email))
            .await
    }

    async fn load(&self, email: &str) -> Result<Option<PermissionsUser>, AppError> {
        let Some(user) = self.source.find_user_by_email(email).await? else {
            return Ok(None);
        };

        let permissions = if is_admin_role(&user.role) {
            Permission::all()
        } else {
            match self.source.find_role_by_name(&user.role).await? {
                Some(role) => self.source.permissions_for_role(role.id).await?,
                // Cargo sem linha em `roles`: zero permissões, sem erro
                None => Vec::new(),
            }
        };

        Ok(Some(PermissionsUser {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            image: user.image,
            permissions,
        }))
    }

    pub fn require_auth(&self, session: Option<&Session>) -> Result<Session, AppError> {
        session.cloned().ok_or(AppError::Unauthorized)
    }

    pub async fn require_permission(
        &self,
        session: Option<&Session>,
        resource: Resource,
        action: Action,
    ) -> Result<Session, AppError> {
        let session = self.require_auth(session)?;

        let allowed = self
            .resolve(session.email())
            .await?
            .is_some_and(|user| user.has(resource, action));

        if !allowed {
            tracing::debug!(email = session.email(), %resource, %action, "Acesso negado");
            return Err(AppError::forbidden(resource, action));
        }

        Ok(session)
    }

    /// Payload `{user, flags, ts}` para o cliente.
    pub async fn bootstrap(&self, session: Option<&Session>) -> Result<PermissionsBootstrap, AppError> {
        let session = self.require_auth(session)?;

        let user = self
            .resolve(session.email())
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

        Ok(PermissionsBootstrap {
            flags: build_permission_flags(&user.permissions),
            user,
            ts: Utc::now().timestamp_millis(),
        })
    }
}
