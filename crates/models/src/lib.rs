//! SeaORM entities for events, participants and the accounts that own
//! events, with small entity-level helpers used by the service crate.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod event;
pub mod participant;
pub mod event_participant;

#[cfg(test)]
mod tests;
