// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{
        PermRolesCreate, PermRolesDelete, PermRolesEdit, PermRolesView, RequirePermission,
    },
    models::rbac::{CreateRolePayload, RoleResponse, UpdateRolePayload},
};

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "RBAC",
    responses(
        (status = 200, description = "Cargos com suas permissões", body = Vec<RoleResponse>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem a permissão roles:view")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesView>,
) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let roles = app_state.rbac_service.list_roles().await?;
    Ok(Json(roles))
}

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "RBAC",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = RoleResponse),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Sem a permissão roles:create"),
        (status = 409, description = "Nome de cargo já existe")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesCreate>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.rbac_service.create_role(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// GET /api/roles/{id}
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(
        ("id" = Uuid, Path, description = "ID do cargo")
    ),
    responses(
        (status = 200, description = "Cargo", body = RoleResponse),
        (status = 403, description = "Sem a permissão roles:view"),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesView>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<RoleResponse>, AppError> {
    let role = app_state.rbac_service.get_role(role_id).await?;
    Ok(Json(role))
}

// PATCH /api/roles/{id}
// Usuários já em cache só enxergam a mudança quando o TTL das permissões vencer.
#[utoipa::path(
    patch,
    path = "/api/roles/{id}",
    tag = "RBAC",
    request_body = UpdateRolePayload,
    params(
        ("id" = Uuid, Path, description = "ID do cargo")
    ),
    responses(
        (status = 200, description = "Cargo atualizado", body = RoleResponse),
        (status = 403, description = "Sem a permissão roles:edit"),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesEdit>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<RoleResponse>, AppError> {
    payload.validate()?;

    let role = app_state.rbac_service.update_role(role_id, payload).await?;
    Ok(Json(role))
}

// DELETE /api/roles/{id}
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(
        ("id" = Uuid, Path, description = "ID do cargo")
    ),
    responses(
        (status = 204, description = "Cargo removido"),
        (status = 403, description = "Sem a permissão roles:delete"),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesDelete>,
    Path(role_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.rbac_service.delete_role(role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
