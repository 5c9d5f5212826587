// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- RBAC ---
        handlers::permissions::list_permissions,
        handlers::permissions::get_my_permissions,
        handlers::rbac::list_roles,
        handlers::rbac::create_role,
        handlers::rbac::get_role,
        handlers::rbac::update_role,
        handlers::rbac::delete_role,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::update_user_role,
    ),
    components(
        schemas(
            // --- Permissões ---
            models::permissions::Resource,
            models::permissions::Action,
            models::permissions::Permission,
            models::permissions::PermissionsUser,
            models::permissions::PermissionFlags,
            models::permissions::PermissionsBootstrap,
            models::permissions::PermissionCatalog,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::CreateRolePayload,
            models::rbac::UpdateRolePayload,
            models::rbac::RoleResponse,

            // --- Users ---
            models::auth::User,
            models::auth::UpdateUserRolePayload,
        )
    ),
    tags(
        (name = "RBAC", description = "Controle de Acesso (Cargos e Permissões)"),
        (name = "Users", description = "Usuários e atribuição de cargo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
