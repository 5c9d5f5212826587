// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::session_layer};

pub fn router(app_state: AppState) -> Router {
    let permission_routes = Router::new()
        .route("/", get(handlers::permissions::list_permissions))
        .route("/me", get(handlers::permissions::get_my_permissions));

    let role_routes = Router::new()
        .route(
            "/",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route(
            "/{id}",
            get(handlers::rbac::get_role)
                .patch(handlers::rbac::update_role)
                .delete(handlers::rbac::delete_role),
        );

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users))
        .route("/{id}/role", patch(handlers::users::update_user_role));

    // A sessão é opcional aqui; cada handler decide via guard (401/403)
    let api_routes = Router::new()
        .nest("/permissions", permission_routes)
        .nest("/roles", role_routes)
        .nest("/users", user_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_layer,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
