//! Auth module: three-layer architecture (domain, repository, service).
//!
//! The catalog core only consumes [`domain::Actor`]; registration and
//! login live here so the HTTP layer stays a thin boundary.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use domain::Actor;
pub use service::AuthService;
