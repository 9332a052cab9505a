//! Driving port for creating users.
//!
//! Inbound adapters (HTTP handlers) call this port with the decoded request
//! body and receive either the persisted user or a domain [`Error`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User};

/// Decoded body of a user creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Name stored verbatim.
    pub name: String,
    /// Raw email address, validated by the use-case.
    pub email: String,
}

/// Domain use-case port for user creation.
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Validate and persist a new user.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;
}
