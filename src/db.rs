pub mod user_repo;
pub use user_repo::UserRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod permission_source;
pub use permission_source::{PermissionSource, PgPermissionSource};
