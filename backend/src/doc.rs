//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the account endpoints, the health probes, and the
//! domain payload schemas. Swagger UI serves it at `/docs` in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, User, UserProfile};
use crate::inbound::http::profiles::CreateProfileBody;
use crate::inbound::http::users::CreateUserBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fitpass accounts API",
        description = "Create users and their single membership profile."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::profiles::create_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        UserProfile,
        Error,
        ErrorCode,
        CreateUserBody,
        CreateProfileBody
    )),
    tags(
        (name = "users", description = "User registration"),
        (name = "profiles", description = "Profile registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
