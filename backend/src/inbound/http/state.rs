//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ProfileRegistration, UserRegistration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRegistration>,
    pub profiles: Arc<dyn ProfileRegistration>,
}

impl HttpState {
    /// Construct state from the two registration use-cases.
    pub fn new(users: Arc<dyn UserRegistration>, profiles: Arc<dyn ProfileRegistration>) -> Self {
        Self { users, profiles }
    }
}
