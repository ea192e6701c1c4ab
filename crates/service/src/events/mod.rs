//! Event CRUD and listings.

pub mod schedule;
pub mod domain;
pub mod service;

pub use service::*;
