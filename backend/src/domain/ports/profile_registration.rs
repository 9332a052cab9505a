//! Driving port for creating the profile attached to a user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserId, UserProfile};

/// Decoded body of a profile creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    /// Identifier of the owning user.
    pub user_id: UserId,
    /// Profile label stored verbatim.
    pub profile_name: String,
}

/// Domain use-case port for profile creation.
#[async_trait]
pub trait ProfileRegistration: Send + Sync {
    /// Create the single profile owned by `request.user_id`.
    async fn create_profile(&self, request: CreateProfileRequest) -> Result<UserProfile, Error>;
}
