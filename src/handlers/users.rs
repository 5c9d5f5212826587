// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError},
    config::AppState,
    middleware::rbac::{PermUsersEdit, PermUsersView, RequirePermission},
    models::auth::{UpdateUserRolePayload, User},
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários visíveis para a sessão", body = Vec<User>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem a permissão users:view")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermUsersView>,
) -> Result<Json<Vec<User>>, AppError> {
    // Transação com RLS
    let mut tx = begin_rls_transaction(&app_state, guard.session()).await?;
    let users = app_state.user_repo.list_users(&mut *tx).await?;
    tx.commit().await?;

    Ok(Json(users))
}

// PATCH /api/users/{id}/role
// Como nos cargos, o cache de permissões do usuário só expira pelo TTL.
// Roda fora da transação de RLS: a policy de `users` filtra por users:view, e
// quem só tem users:edit não enxergaria o alvo. A autorização aqui é o guard.
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    tag = "Users",
    request_body = UpdateUserRolePayload,
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Usuário com o novo cargo", body = User),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Sem a permissão users:edit"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_user_role(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermUsersEdit>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRolePayload>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    let user = app_state
        .user_repo
        .update_role(&app_state.db_pool, user_id, payload.role.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

    tracing::info!(
        by = guard.session().email(),
        email = %user.email,
        role = %user.role,
        "Cargo do usuário alterado"
    );
    Ok(Json(user))
}
