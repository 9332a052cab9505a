//! Port abstraction for profile persistence adapters and their errors.
//!
//! Creating a profile touches both tables: the owning user is read, the
//! one-profile-per-user rule is checked, and the profile is inserted.
//! Adapters must run all three steps in one transaction and roll back on any
//! failure.

use async_trait::async_trait;

use crate::domain::{NewProfile, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfilePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query, mutation, or commit failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// The referenced user does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
        /// The user already owns a profile.
        ProfileAlreadyExists { user_id: UserId } => "user {user_id} already has a profile",
    }
}

/// Driven port for the `profiles` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create the profile for `profile.user_id` and return it joined with
    /// the owning user.
    ///
    /// Implementations must:
    /// - Fail with `UserNotFound` when the user row is absent.
    /// - Fail with `ProfileAlreadyExists` when the user already has a profile.
    /// - Leave no rows behind on any failure.
    async fn create_for_user(
        &self,
        profile: &NewProfile,
    ) -> Result<UserProfile, ProfilePersistenceError>;
}
