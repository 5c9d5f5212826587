//! Backend de controle de acesso do TechTool: resolução de permissões (RBAC),
//! cache de servidor em duas camadas e as rotas de gestão de cargos.

pub mod cache;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use common::error::{AppError, ErrorKind};
pub use config::{AppState, Config, Environment};
