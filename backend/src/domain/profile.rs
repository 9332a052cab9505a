//! Profile data model and the composite profile creation response.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{User, UserId};

/// Primary key generated by the `profiles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i32);

impl ProfileId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw database identifier.
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command to insert the single profile owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    /// Owning user; must reference an existing row.
    pub user_id: UserId,
    /// Profile label stored verbatim.
    pub profile_name: String,
}

/// A persisted profile joined with its owning user.
///
/// Only built to shape the profile creation response. The owning user is
/// serialised under the `user_id` key, which clients already depend on:
///
/// ```json
/// {"id":1,"user_id":{"id":1,"name":"Ann","email":"ann@example.com"},"profile_name":"Runner"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(value_type = i32, example = 1)]
    id: ProfileId,
    #[serde(rename = "user_id")]
    user: User,
    #[schema(example = "gold")]
    profile_name: String,
}

impl UserProfile {
    /// Compose the response from the inserted profile and its owner.
    pub fn new(id: ProfileId, user: User, profile_name: impl Into<String>) -> Self {
        Self {
            id,
            user,
            profile_name: profile_name.into(),
        }
    }

    /// Database identifier of the profile.
    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// Owning user as looked up inside the creating transaction.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Profile label.
    pub fn profile_name(&self) -> &str {
        self.profile_name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn user_profile_nests_user_under_user_id_key() {
        let email = EmailAddress::new("ann@example.com").expect("valid email");
        let user = User::new(UserId::new(1), "Ann", email);
        let profile = UserProfile::new(ProfileId::new(7), user, "Runner");

        let value = serde_json::to_value(&profile).expect("serialise profile");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "user_id": { "id": 1, "name": "Ann", "email": "ann@example.com" },
                "profile_name": "Runner",
            })
        );
        assert!(value.get("user").is_none());
    }
}
