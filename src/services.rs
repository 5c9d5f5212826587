pub mod auth;
pub mod permission_service;
pub mod rbac_service;
