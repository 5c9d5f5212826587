// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Session,
        permissions::{Action, Resource},
    },
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    const RESOURCE: Resource;
    const ACTION: Action;
}

/// 2. O Extractor (Guardião). Entrega a sessão já autorizada.
pub struct RequirePermission<T>(pub Session, PhantomData<T>);

impl<T> RequirePermission<T> {
    pub fn session(&self) -> &Session {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let session = app_state
            .permission_service
            .require_permission(parts.extensions.get::<Session>(), T::RESOURCE, T::ACTION)
            .await?;

        Ok(RequirePermission(session, PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission_def {
    ($name:ident, $resource:ident, $action:ident) => {
        pub struct $name;
        impl PermissionDef for $name {
            const RESOURCE: Resource = Resource::$resource;
            const ACTION: Action = Action::$action;
        }
    };
}

permission_def!(PermRolesView, Roles, View);
permission_def!(PermRolesCreate, Roles, Create);
permission_def!(PermRolesEdit, Roles, Edit);
permission_def!(PermRolesDelete, Roles, Delete);
permission_def!(PermUsersView, Users, View);
permission_def!(PermUsersEdit, Users, Edit);
