//! User creation use-case.
//!
//! Validates the email address before any storage work happens, then hands
//! the insert to the [`UserRepository`] port. Duplicate emails are not
//! singled out: the unique violation reaches the caller as a storage error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CreateUserRequest, UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{Error, NewUser, User, UserValidationError};

/// User registration service implementing the [`UserRegistration`] port.
#[derive(Clone)]
pub struct UserRegistrationService<R> {
    users: Arc<R>,
}

impl<R> UserRegistrationService<R> {
    /// Create a new service over the given repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_user_validation_error(error: UserValidationError) -> Error {
    match error {
        UserValidationError::InvalidEmail => Error::invalid_request("Invalid email format")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            Error::internal(message)
        }
    }
}

#[async_trait]
impl<R> UserRegistration for UserRegistrationService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let CreateUserRequest { name, email } = request;
        let new_user = NewUser::try_from_parts(name, email).map_err(map_user_validation_error)?;

        let user = self
            .users
            .create(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    //! Service behaviour against a mocked repository.
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, UserId};
    use rstest::rstest;

    fn request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_owned(),
            email: email.to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn creates_user_with_generated_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|new_user| new_user.name == "Ann" && new_user.email.as_ref() == "ann@example.com")
            .times(1)
            .returning(|new_user| Ok(new_user.clone().into_user(UserId::new(1))));
        let service = UserRegistrationService::new(Arc::new(repo));

        let user = service
            .create_user(request("Ann", "ann@example.com"))
            .await
            .expect("user created");

        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.name(), "Ann");
        assert_eq!(user.email().as_ref(), "ann@example.com");
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("a@b")]
    #[case("@nodomain.com")]
    #[tokio::test]
    async fn rejects_invalid_email_without_inserting(#[case] email: &str) {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let service = UserRegistrationService::new(Arc::new(repo));

        let error = service
            .create_user(request("Ann", email))
            .await
            .expect_err("invalid email");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Invalid email format");
        let details = error.details().expect("details present");
        assert_eq!(details["code"], "invalid_email");
    }

    #[rstest]
    #[case(
        UserPersistenceError::query("duplicate key value violates unique constraint \"users_email_key\""),
        ErrorCode::InternalError
    )]
    #[case(
        UserPersistenceError::connection("connection refused"),
        ErrorCode::InternalError
    )]
    #[tokio::test]
    async fn surfaces_storage_failures(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockUserRepository::new();
        let returned = failure.clone();
        repo.expect_create()
            .times(1)
            .returning(move |_| Err(returned.clone()));
        let service = UserRegistrationService::new(Arc::new(repo));

        let error = service
            .create_user(request("Ann", "ann@example.com"))
            .await
            .expect_err("storage failure");

        assert_eq!(error.code(), expected);
        let (UserPersistenceError::Query { message } | UserPersistenceError::Connection { message }) =
            failure;
        assert_eq!(error.message(), message);
    }
}
