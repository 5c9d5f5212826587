// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Session};

// Decodifica o Bearer (se houver) e insere a `Session` nos "extensions".
// Token ausente ou inválido não barra a requisição: só fica sem sessão,
// e quem decide 401 é o guard da rota.
pub async fn session_layer(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();

    if let Some(Authorization(bearer)) = bearer {
        match app_state.auth_service.validate_token(bearer.token()) {
            Ok(session) => {
                request.extensions_mut().insert(session);
            }
            Err(_) => tracing::debug!("Token Bearer inválido, seguindo sem sessão"),
        }
    }

    next.run(request).await
}

// Extrator para obter a sessão autenticada diretamente nos handlers (requireAuth)
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        app_state
            .permission_service
            .require_auth(parts.extensions.get::<Session>())
            .map(CurrentSession)
    }
}
