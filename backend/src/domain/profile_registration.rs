//! Profile creation use-case.
//!
//! The referential and uniqueness checks run inside the repository's
//! transaction; this service translates their outcomes into client-facing
//! errors: a missing user is a bad request, a second profile is a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CreateProfileRequest, ProfilePersistenceError, ProfileRegistration, ProfileRepository,
};
use crate::domain::{Error, NewProfile, UserProfile};

/// Profile registration service implementing the [`ProfileRegistration`] port.
#[derive(Clone)]
pub struct ProfileRegistrationService<R> {
    profiles: Arc<R>,
}

impl<R> ProfileRegistrationService<R> {
    /// Create a new service over the given repository.
    pub fn new(profiles: Arc<R>) -> Self {
        Self { profiles }
    }
}

fn map_profile_persistence_error(error: ProfilePersistenceError) -> Error {
    match error {
        ProfilePersistenceError::UserNotFound { user_id } => Error::invalid_request(
            "User not found",
        )
        .with_details(json!({
            "field": "user_id",
            "code": "user_not_found",
            "user_id": user_id,
        })),
        ProfilePersistenceError::ProfileAlreadyExists { user_id } => Error::conflict(
            "User already has a profile",
        )
        .with_details(json!({
            "code": "profile_already_exists",
            "user_id": user_id,
        })),
        ProfilePersistenceError::Connection { message }
        | ProfilePersistenceError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl<R> ProfileRegistration for ProfileRegistrationService<R>
where
    R: ProfileRepository,
{
    async fn create_profile(&self, request: CreateProfileRequest) -> Result<UserProfile, Error> {
        let CreateProfileRequest {
            user_id,
            profile_name,
        } = request;
        let new_profile = NewProfile {
            user_id,
            profile_name,
        };

        let profile = self
            .profiles
            .create_for_user(&new_profile)
            .await
            .map_err(map_profile_persistence_error)?;
        info!(profile_id = %profile.id(), %user_id, "profile created");
        Ok(profile)
    }
}
