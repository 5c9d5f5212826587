// src/db/permission_source.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RbacRepository, UserRepository},
    models::{auth::User, permissions::Permission, rbac::Role},
};

/// As três consultas que o resolvedor de permissões precisa.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Nome comparado sem diferenciar maiúsculas/minúsculas.
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;

    async fn permissions_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, AppError>;
}

#[derive(Clone)]
pub struct PgPermissionSource {
    user_repo: UserRepository,
    rbac_repo: RbacRepository,
}

impl PgPermissionSource {
    pub fn new(user_repo: UserRepository, rbac_repo: RbacRepository) -> Self {
        Self { user_repo, rbac_repo }
    }
}

#[async_trait]
impl PermissionSource for PgPermissionSource {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_email(email).await
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.rbac_repo.find_role_by_name(name).await
    }

    async fn permissions_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, AppError> {
        let rows = self.rbac_repo.permissions_for_role(role_id).await?;

        // Linha com texto desconhecido não derruba a resolução, só é ignorada
        let permissions = rows
            .iter()
            .filter_map(|row| match row.parse() {
                Ok(permission) => Some(permission),
                Err(reason) => {
                    tracing::warn!(%role_id, "Permissão ignorada: {}", reason);
                    None
                }
            })
            .collect();

        Ok(permissions)
    }
}
