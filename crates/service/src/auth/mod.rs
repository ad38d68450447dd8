//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Covers password login, token issuing and resolving a bearer token back to its user.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
