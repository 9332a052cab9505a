//! User data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The email address does not match `local@domain.tld`.
    #[error("email address must look like local@domain.tld")]
    InvalidEmail,
}

/// Primary key generated by the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw database identifier.
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Return whether `candidate` is a syntactically valid email address.
///
/// The accepted shape is an ASCII local part of letters, digits and
/// `._%+-`, an `@`, a domain of letters, digits, `.` and `-`, and a
/// top-level domain of at least two letters.
///
/// # Examples
/// ```
/// use fitpass::domain::is_valid_email;
///
/// assert!(is_valid_email("ann@example.com"));
/// assert!(!is_valid_email("a@b"));
/// ```
pub fn is_valid_email(candidate: &str) -> bool {
    email_regex().is_match(candidate)
}

/// Email address that passed [`is_valid_email`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted user.
///
/// Serialises as `{"id": 1, "name": "Ann", "email": "ann@example.com"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(value_type = i32, example = 1)]
    id: UserId,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
}

impl User {
    /// Build a user from its persisted parts.
    pub fn new(id: UserId, name: impl Into<String>, email: EmailAddress) -> Self {
        Self {
            id,
            name: name.into(),
            email,
        }
    }

    /// Database identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Name as supplied at creation.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Validated email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Validated command to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Name stored verbatim; only presence is required.
    pub name: String,
    /// Address that passed [`is_valid_email`].
    pub email: EmailAddress,
}

impl NewUser {
    /// Validate raw input into an insert command.
    ///
    /// # Examples
    /// ```
    /// use fitpass::domain::{NewUser, UserValidationError};
    ///
    /// assert!(NewUser::try_from_parts("Ann", "ann@example.com").is_ok());
    /// assert_eq!(
    ///     NewUser::try_from_parts("Ann", "not-an-email"),
    ///     Err(UserValidationError::InvalidEmail)
    /// );
    /// ```
    pub fn try_from_parts(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: name.into(),
            email: EmailAddress::new(email)?,
        })
    }

    /// Attach the generated identifier, producing the persisted user.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.name, self.email)
    }
}
