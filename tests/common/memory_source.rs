use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use techtool::{
    db::PermissionSource,
    models::{auth::User, permissions::Permission, rbac::Role},
    AppError,
};

/// Fonte de permissões em memória, para rodar o resolver e o Router sem banco.
/// Conta as consultas feitas, o que permite verificar memoização e o atalho de admin.
#[derive(Default)]
pub struct InMemoryPermissionSource {
    users: DashMap<String, User>,
    roles: DashMap<Uuid, Role>,
    grants: DashMap<Uuid, Vec<Permission>>,
    user_lookups: AtomicUsize,
    role_lookups: AtomicUsize,
}

impl InMemoryPermissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, email: &str, role: &str) -> Self {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: None,
            role: role.to_string(),
            image: None,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        self.users.insert(email.to_string(), user);
        self
    }

    pub fn with_role(self, name: &str, permissions: &[Permission]) -> Self {
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        self.grants.insert(role.id, permissions.to_vec());
        self.roles.insert(role.id, role);
        self
    }

    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    pub fn role_lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionSource for InMemoryPermissionSource {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .roles
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .map(|r| r.value().clone()))
    }

    async fn permissions_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, AppError> {
        Ok(self
            .grants
            .get(&role_id)
            .map(|g| g.value().clone())
            .unwrap_or_default())
    }
}
