// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::not_blank;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "ana@techtool.dev")]
    pub email: String,

    pub name: Option<String>,

    // Texto livre, casado sem diferenciar maiúsculas com `roles.name`
    #[schema(example = "viewer")]
    pub role: String,

    pub image: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Identidade autenticada da requisição
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub name: Option<String>,
}

impl Session {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            user: SessionUser {
                email: email.into(),
                name,
            },
        }
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (e-mail do usuário)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// PATCH /api/users/{id}/role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRolePayload {
    #[validate(
        length(min = 1, max = 64, message = "O cargo deve ter entre 1 e 64 caracteres."),
        custom(function = "not_blank")
    )]
    #[schema(example = "viewer")]
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_role_is_rejected() {
        let payload = UpdateUserRolePayload { role: "   ".into() };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn padded_role_passes_validation() {
        let payload = UpdateUserRolePayload { role: " viewer ".into() };
        assert!(payload.validate().is_ok());
    }
}
