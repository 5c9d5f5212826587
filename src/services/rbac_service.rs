// src/services/rbac_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RbacRepository,
    models::{
        permissions::Permission,
        rbac::{CreateRolePayload, PermissionRow, Role, RoleResponse, UpdateRolePayload},
    },
};

// Linhas com texto desconhecido são descartadas aqui também
fn parse_rows<'a>(rows: impl IntoIterator<Item = &'a PermissionRow>) -> Vec<Permission> {
    rows.into_iter().filter_map(|row| row.parse().ok()).collect()
}

fn dedup(permissions: &[Permission]) -> Vec<Permission> {
    let mut unique = Vec::with_capacity(permissions.len());
    for p in permissions {
        if !unique.contains(p) {
            unique.push(*p);
        }
    }
    unique
}

/// Gestão de cargos. Alterações NÃO invalidam o cache de permissões:
/// quem já está em cache vê a mudança só quando o TTL vencer.
#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    pool: PgPool,
}

impl RbacService {
    pub fn new(repo: RbacRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleResponse>, AppError> {
        let roles = self.repo.list_roles().await?;
        let ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        let rows = self.repo.permissions_for_roles(&ids).await?;

        let mut by_role: HashMap<Uuid, Vec<&PermissionRow>> = HashMap::new();
        for row in &rows {
            by_role.entry(row.role_id).or_default().push(row);
        }

        Ok(roles
            .into_iter()
            .map(|role| {
                let permissions = parse_rows(by_role.remove(&role.id).unwrap_or_default());
                RoleResponse { role, permissions }
            })
            .collect())
    }

    pub async fn get_role(&self, role_id: Uuid) -> Result<RoleResponse, AppError> {
        let role = self.find_role(role_id).await?;
        self.with_permissions(role).await
    }

    pub async fn create_role(&self, payload: CreateRolePayload) -> Result<RoleResponse, AppError> {
        let permissions = dedup(&payload.permissions);

        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria o Cargo
        let role = self
            .repo
            .create_role(&mut *tx, payload.name.trim(), payload.description.as_deref())
            .await?;

        // 3. Salva o Vínculo
        if !permissions.is_empty() {
            self.repo
                .assign_permissions(&mut *tx, role.id, &permissions)
                .await?;
        }

        // 4. Commit
        tx.commit().await?;

        tracing::info!(role = %role.name, count = permissions.len(), "Cargo criado");
        Ok(RoleResponse { role, permissions })
    }

    pub async fn update_role(
        &self,
        role_id: Uuid,
        payload: UpdateRolePayload,
    ) -> Result<RoleResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let role = self
            .repo
            .update_role(
                &mut *tx,
                role_id,
                payload.name.as_deref().map(str::trim),
                payload.description.as_deref(),
            )
            .await?
            .ok_or_else(role_not_found)?;

        // `permissions` presente substitui o conjunto inteiro
        if let Some(permissions) = payload.permissions.as_deref() {
            let permissions = dedup(permissions);
            self.repo.clear_permissions(&mut *tx, role_id).await?;
            if !permissions.is_empty() {
                self.repo
                    .assign_permissions(&mut *tx, role_id, &permissions)
                    .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(role = %role.name, "Cargo atualizado");
        self.with_permissions(role).await
    }

    pub async fn delete_role(&self, role_id: Uuid) -> Result<(), AppError> {
        // As linhas de `permissions` caem junto via ON DELETE CASCADE
        if !self.repo.delete_role(&self.pool, role_id).await? {
            return Err(role_not_found());
        }

        tracing::info!(%role_id, "Cargo removido");
        Ok(())
    }

    async fn find_role(&self, role_id: Uuid) -> Result<Role, AppError> {
        self.repo
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(role_not_found)
    }

    async fn with_permissions(&self, role: Role) -> Result<RoleResponse, AppError> {
        let rows = self.repo.permissions_for_role(role.id).await?;
        Ok(RoleResponse {
            permissions: parse_rows(&rows),
            role,
        })
    }
}

fn role_not_found() -> AppError {
    AppError::NotFound("Cargo não encontrado.".into())
}
