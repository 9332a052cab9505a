//! Users API handlers.
//!
//! ```text
//! POST /users {"name":"Ada Lovelace","email":"ada@example.com"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::CreateUserRequest;
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /users`.
///
/// Unknown fields are ignored.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserBody {
    /// Name stored verbatim.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address; must match `local@domain.tld`.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(value: CreateUserBody) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

/// Create a user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use fitpass::inbound::http::users::create_user;
///
/// let app = App::new().service(create_user);
/// ```
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserBody,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid payload or email", body = Error),
        (status = 500, description = "Storage failure, including duplicate email", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.create_user(payload.into_inner().into()).await?;
    Ok(web::Json(user))
}
