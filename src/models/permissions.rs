// src/models/permissions.rs

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Categorias de entidade sujeitas a controle de acesso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Projects,
    Tickets,
    Users,
    Roles,
    Settings,
    Assets,
    Clockify,
    Status,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Projects,
        Resource::Tickets,
        Resource::Users,
        Resource::Roles,
        Resource::Settings,
        Resource::Assets,
        Resource::Clockify,
        Resource::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Projects => "projects",
            Resource::Tickets => "tickets",
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Settings => "settings",
            Resource::Assets => "assets",
            Resource::Clockify => "clockify",
            Resource::Status => "status",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Recurso desconhecido: '{}'", s))
    }
}

/// Tipos de operação sobre um recurso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Manage,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Manage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Ação desconhecida: '{}'", s))
    }
}

/// Par (recurso, ação). Valor imutável.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Produto cartesiano completo de recursos x ações.
    pub fn all() -> Vec<Permission> {
        Resource::ALL
            .into_iter()
            .flat_map(|resource| {
                Action::ALL
                    .into_iter()
                    .map(move |action| Permission::new(resource, action))
            })
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Usuário com permissões efetivas. Derivado de `users.role` + tabela `permissions`,
/// nunca persistido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsUser {
    pub id: Uuid,

    #[schema(example = "ana@techtool.dev")]
    pub email: String,

    pub name: Option<String>,

    #[schema(example = "viewer")]
    pub role: String,

    pub image: Option<String>,

    pub permissions: Vec<Permission>,
}

impl PermissionsUser {
    pub fn has(&self, resource: Resource, action: Action) -> bool {
        self.permissions
            .iter()
            .any(|p| p.resource == resource && p.action == action)
    }
}

/// Testes de pertinência pré-calculados para renderização condicional no cliente.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    pub can_view_projects: bool,
    pub can_create_projects: bool,
    pub can_edit_projects: bool,
    pub can_delete_projects: bool,
    pub can_manage_projects: bool,

    pub can_view_tickets: bool,
    pub can_create_tickets: bool,
    pub can_edit_tickets: bool,
    pub can_delete_tickets: bool,
    pub can_manage_tickets: bool,

    pub can_view_users: bool,
    pub can_edit_users: bool,
    pub can_manage_users: bool,

    pub can_view_roles: bool,
    pub can_manage_roles: bool,

    pub can_manage_status: bool,
    pub can_manage_settings: bool,

    pub can_view_assets: bool,
    pub can_manage_assets: bool,

    pub can_view_clockify: bool,
    pub can_import_clockify: bool,

    pub can_access_settings: bool,
}

pub fn build_permission_flags(permissions: &[Permission]) -> PermissionFlags {
    use Action::*;
    use Resource::*;

    let set: HashSet<Permission> = permissions.iter().copied().collect();
    let has = |resource: Resource, action: Action| set.contains(&Permission::new(resource, action));
    let any = |resource: Resource, actions: &[Action]| actions.iter().any(|a| has(resource, *a));

    PermissionFlags {
        can_view_projects: has(Projects, View),
        can_create_projects: has(Projects, Create),
        can_edit_projects: has(Projects, Edit),
        can_delete_projects: has(Projects, Delete),
        can_manage_projects: has(Projects, Manage),

        can_view_tickets: has(Tickets, View),
        can_create_tickets: has(Tickets, Create),
        can_edit_tickets: has(Tickets, Edit),
        can_delete_tickets: has(Tickets, Delete),
        can_manage_tickets: has(Tickets, Manage),

        can_view_users: has(Users, View),
        can_edit_users: has(Users, Edit),
        can_manage_users: has(Users, Manage),

        can_view_roles: has(Roles, View),
        can_manage_roles: any(Roles, &[Create, Edit, Delete, Manage]),

        can_manage_status: has(Status, Manage),
        can_manage_settings: has(Settings, Manage),

        can_view_assets: has(Assets, View),
        can_manage_assets: any(Assets, &[Create, Edit, Delete, Manage]),

        can_view_clockify: has(Clockify, View),
        can_import_clockify: any(Clockify, &[Create, Manage]),

        can_access_settings: has(Users, View)
            || any(Roles, &[View, Edit, Create, Manage])
            || has(Status, Manage)
            || has(Settings, Manage),
    }
}

/// Payload que o cliente guarda no storage para checagens otimistas de UI.
/// Não é fronteira de segurança: o servidor sempre revalida.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionsBootstrap {
    pub user: PermissionsUser,
    pub flags: PermissionFlags,
    /// Epoch em milissegundos
    pub ts: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionCatalog {
    pub resources: Vec<Resource>,
    pub actions: Vec<Action>,
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self {
            resources: Resource::ALL.to_vec(),
            actions: Action::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_full_cross_product() {
        let all = Permission::all();
        assert_eq!(all.len(), 40);

        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 40);
        assert!(all.contains(&Permission::new(Resource::Status, Action::Manage)));
    }

    #[test]
    fn single_permission_sets_only_its_flag() {
        let flags = build_permission_flags(&[Permission::new(Resource::Tickets, Action::Edit)]);

        assert!(flags.can_edit_tickets);
        assert_eq!(
            flags,
            PermissionFlags {
                can_edit_tickets: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn settings_access_is_a_disjunction() {
        for perm in [
            Permission::new(Resource::Users, Action::View),
            Permission::new(Resource::Roles, Action::Create),
            Permission::new(Resource::Status, Action::Manage),
            Permission::new(Resource::Settings, Action::Manage),
        ] {
            assert!(build_permission_flags(&[perm]).can_access_settings, "{}", perm);
        }

        let flags = build_permission_flags(&[Permission::new(Resource::Roles, Action::Delete)]);
        assert!(!flags.can_access_settings);
        assert!(flags.can_manage_roles);
    }

    #[test]
    fn full_set_enables_every_flag() {
        let flags = build_permission_flags(&Permission::all());
        let json = serde_json::to_value(&flags).unwrap();

        let values = json.as_object().unwrap();
        assert_eq!(values.len(), 22);
        assert!(values.values().all(|v| v == &serde_json::Value::Bool(true)));
    }

    #[test]
    fn parses_db_text_case_insensitively() {
        assert_eq!("Tickets".parse::<Resource>().unwrap(), Resource::Tickets);
        assert_eq!(" MANAGE ".parse::<Action>().unwrap(), Action::Manage);
        assert!("invoices".parse::<Resource>().is_err());
    }

    #[test]
    fn serializes_lowercase_pairs() {
        let json = serde_json::to_value(Permission::new(Resource::Clockify, Action::View)).unwrap();
        assert_eq!(json, serde_json::json!({ "resource": "clockify", "action": "view" }));
    }
}
