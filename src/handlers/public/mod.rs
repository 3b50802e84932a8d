// handlers/public/mod.rs - Account and service handlers
//
// Endpoints outside the per-collection data surface: account registration and
// credential checks, plus the service index and health probe.

pub mod auth;
pub mod service;

pub use auth::*;
pub use service::{health, root};
