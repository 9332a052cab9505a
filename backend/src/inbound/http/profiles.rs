//! Profiles API handlers.
//!
//! ```text
//! POST /profiles {"user_id":1,"profile_name":"gold"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::CreateProfileRequest;
use crate::domain::{Error, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /profiles`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateProfileBody {
    /// Identifier of the owning user.
    #[schema(example = 1)]
    pub user_id: i32,
    /// Profile label stored verbatim.
    #[schema(example = "gold")]
    pub profile_name: String,
}

impl From<CreateProfileBody> for CreateProfileRequest {
    fn from(value: CreateProfileBody) -> Self {
        Self {
            user_id: UserId::new(value.user_id),
            profile_name: value.profile_name,
        }
    }
}

/// Create the profile for an existing user.
///
/// The response embeds the owning user under `user_id`.
#[utoipa::path(
    post,
    path = "/profiles",
    request_body = CreateProfileBody,
    responses(
        (status = 200, description = "Profile created", body = UserProfile),
        (status = 400, description = "Invalid payload or unknown user", body = Error),
        (status = 409, description = "User already has a profile", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "createProfile"
)]
#[post("/profiles")]
pub async fn create_profile(
    state: web::Data<HttpState>,
    payload: web::Json<CreateProfileBody>,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state
        .profiles
        .create_profile(payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockProfileRepository, MockUserRepository, ProfilePersistenceError, UserRepository,
    };
    use crate::domain::{NewUser, ProfileRegistrationService, UserRegistrationService};
    use crate::inbound::http::json_config;
    use crate::test_support::InMemoryAccountStore;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state_over(store: Arc<InMemoryAccountStore>) -> HttpState {
        HttpState::new(
            Arc::new(UserRegistrationService::new(store.clone())),
            Arc::new(ProfileRegistrationService::new(store)),
        )
    }

    async fn post_profile(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(json_config())
                .service(create_profile),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/profiles")
            .set_json(&body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    async fn seeded_store() -> Arc<InMemoryAccountStore> {
        let store = Arc::new(InMemoryAccountStore::new());
        let user = NewUser::try_from_parts("Ada", "ada@example.com").expect("valid user");
        store.create(&user).await.expect("seed user");
        store
    }

    #[actix_web::test]
    async fn creates_profile_with_embedded_user() {
        let store = seeded_store().await;

        let (status, body) = post_profile(
            state_over(store),
            json!({ "user_id": 1, "profile_name": "gold" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": 1,
                "user_id": { "id": 1, "name": "Ada", "email": "ada@example.com" },
                "profile_name": "gold"
            })
        );
    }

    #[actix_web::test]
    async fn second_profile_conflicts() {
        let store = seeded_store().await;
        let body = json!({ "user_id": 1, "profile_name": "gold" });

        let (first, _) = post_profile(state_over(store.clone()), body.clone()).await;
        let (second, error) = post_profile(state_over(store.clone()), body).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(error["message"], "User already has a profile");
        assert_eq!(store.profile_count(), 1);
    }

    #[actix_web::test]
    async fn unknown_user_is_a_bad_request() {
        let store = Arc::new(InMemoryAccountStore::new());

        let (status, body) = post_profile(
            state_over(store.clone()),
            json!({ "user_id": 999, "profile_name": "gold" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User not found");
        assert_eq!(body["details"]["code"], "user_not_found");
        assert_eq!(store.profile_count(), 0);
    }

    #[rstest]
    #[case(json!({ "profile_name": "gold" }))]
    #[case(json!({ "user_id": "one", "profile_name": "gold" }))]
    #[case(json!({ "user_id": 1 }))]
    #[actix_web::test]
    async fn malformed_payloads_are_rejected(#[case] body: Value) {
        let store = seeded_store().await;

        let (status, error) = post_profile(state_over(store), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["message"], "Invalid request payload");
        assert_eq!(error["details"]["code"], "invalid_payload");
    }

    #[actix_web::test]
    async fn storage_failures_are_server_errors() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_create_for_user().times(1).returning(|_| {
            Err(ProfilePersistenceError::query(
                "relation \"profiles\" does not exist",
            ))
        });
        let state = HttpState::new(
            Arc::new(UserRegistrationService::new(Arc::new(
                MockUserRepository::new(),
            ))),
            Arc::new(ProfileRegistrationService::new(Arc::new(profiles))),
        );

        let (status, body) =
            post_profile(state, json!({ "user_id": 1, "profile_name": "gold" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
        assert_eq!(body["message"], "relation \"profiles\" does not exist");
    }
}
