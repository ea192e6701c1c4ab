//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Account sign-up and login for event owners, plus the session token
//! format shared with the web layer.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
