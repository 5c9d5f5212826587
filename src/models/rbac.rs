// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::validation::not_blank, models::permissions::Permission};

// O que sai do banco (Tabela roles)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Viewer")]
    pub name: String,

    #[schema(example = "Somente leitura de projetos e tickets")]
    pub description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Linha crua da tabela permissions. Texto livre no banco, validado ao converter.
#[derive(Debug, Clone, FromRow)]
pub struct PermissionRow {
    pub role_id: Uuid,
    pub resource: String,
    pub action: String,
}

impl PermissionRow {
    pub fn parse(&self) -> Result<Permission, String> {
        Ok(Permission::new(self.resource.parse()?, self.action.parse()?))
    }
}

// O Payload para criar um cargo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(
        length(min = 1, max = 64, message = "O nome do cargo deve ter entre 1 e 64 caracteres."),
        custom(function = "not_blank")
    )]
    #[schema(example = "Viewer")]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub permissions: Vec<Permission>,
}

// PATCH: campos ausentes ficam como estão; `permissions` presente substitui o conjunto inteiro
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    #[validate(
        length(min = 1, max = 64, message = "O nome do cargo deve ter entre 1 e 64 caracteres."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    pub permissions: Option<Vec<Permission>>,
}

// Resposta completa (Cargo + Lista de Permissões)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[serde(flatten)]
    pub role: Role,

    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str) -> CreateRolePayload {
        CreateRolePayload {
            name: name.into(),
            description: None,
            permissions: Vec::new(),
        }
    }

    fn rename(name: Option<&str>) -> UpdateRolePayload {
        UpdateRolePayload {
            name: name.map(Into::into),
            description: None,
            permissions: None,
        }
    }

    #[test]
    fn blank_role_names_are_rejected() {
        for name in ["", "   ", "\t\n"] {
            let errors = create(name).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("name"), "{:?}", name);
            assert!(rename(Some(name)).validate().is_err(), "{:?}", name);
        }
    }

    #[test]
    fn padded_role_names_are_accepted() {
        assert!(create("  qa  ").validate().is_ok());
        assert!(rename(Some(" qa")).validate().is_ok());
        // Ausente no PATCH: mantém o nome atual
        assert!(rename(None).validate().is_ok());
    }
}
