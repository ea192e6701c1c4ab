//! Service layer providing the event hub's business operations on top of models.
//! - Separates business logic from data access and from the web layer.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod events;
pub mod registration;
#[cfg(test)]
pub mod test_support;
