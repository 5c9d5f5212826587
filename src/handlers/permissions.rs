// src/handlers/permissions.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::permissions::{PermissionCatalog, PermissionsBootstrap},
};

// GET /api/permissions (Para o frontend saber o que mostrar na tela de cargos)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Recursos e ações declarados", body = PermissionCatalog),
        (status = 401, description = "Não autenticado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_permissions(_session: CurrentSession) -> Json<PermissionCatalog> {
    Json(PermissionCatalog::default())
}

// GET /api/permissions/me
// O cliente guarda este payload para checagens otimistas; o servidor continua autoritativo.
#[utoipa::path(
    get,
    path = "/api/permissions/me",
    tag = "RBAC",
    responses(
        (status = 200, description = "Usuário, flags e timestamp", body = PermissionsBootstrap),
        (status = 401, description = "Não autenticado"),
        (status = 404, description = "Sessão sem usuário cadastrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_my_permissions(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<PermissionsBootstrap>, AppError> {
    let payload = app_state.permission_service.bootstrap(Some(&session)).await?;
    Ok(Json(payload))
}
