pub mod permissions;
pub mod rbac;
pub mod users;
