// src/db/rbac_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        permissions::Permission,
        rbac::{PermissionRow, Role},
    },
};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Casamento de nome sem diferenciar maiúsculas/minúsculas
    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM roles
            WHERE LOWER(name) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn find_role_by_id(&self, role_id: Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    // Linhas cruas (resource, action) de um cargo
    pub async fn permissions_for_role(&self, role_id: Uuid) -> Result<Vec<PermissionRow>, AppError> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT role_id, resource, action
            FROM permissions
            WHERE role_id = $1
            ORDER BY resource, action
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Para listar vários cargos sem N+1
    pub async fn permissions_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<PermissionRow>, AppError> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT role_id, resource, action
            FROM permissions
            WHERE role_id = ANY($1)
            ORDER BY resource, action
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create_role<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
    ) -> Result<Role, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Já existe um cargo com esse nome."))
    }

    // COALESCE mantém o valor atual quando o campo não veio no PATCH
    pub async fn update_role<'e, E>(
        &self,
        executor: E,
        role_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Role>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(role_id)
        .bind(name)
        .bind(description)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Já existe um cargo com esse nome."))
    }

    pub async fn delete_role<'e, E>(&self, executor: E, role_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn clear_permissions<'e, E>(&self, executor: E, role_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // Inserção em massa usando UNNEST para performance
    pub async fn assign_permissions<'e, E>(
        &self,
        executor: E,
        role_id: Uuid,
        permissions: &[Permission],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resources: Vec<&str> = permissions.iter().map(|p| p.resource.as_str()).collect();
        let actions: Vec<&str> = permissions.iter().map(|p| p.action.as_str()).collect();

        sqlx::query(
            r#"
            INSERT INTO permissions (role_id, resource, action)
            SELECT $1, r, a FROM UNNEST($2::text[], $3::text[]) AS t(r, a)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(resources)
        .bind(actions)
        .execute(executor)
        .await?;

        Ok(())
    }
}
