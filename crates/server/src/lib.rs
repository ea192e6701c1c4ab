pub mod routes;
pub mod startup;
pub mod errors;
pub mod state;
pub mod session;
pub mod flash;
pub mod pages;

pub use startup::run;
