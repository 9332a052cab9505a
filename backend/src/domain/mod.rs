//! Domain primitives, ports, and services.
//!
//! Purpose: define strongly typed entities for users and their profile, the
//! ports that separate the domain from HTTP and PostgreSQL, and the services
//! implementing the two write use-cases.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - User, NewUser, EmailAddress: user identity and validation.
//! - UserProfile, NewProfile: profile creation command and response.
//! - UserRegistrationService, ProfileRegistrationService: use-case services.

pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_registration;
pub mod user;
pub mod user_registration;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile::{NewProfile, ProfileId, UserProfile};
pub use self::profile_registration::ProfileRegistrationService;
pub use self::user::{EmailAddress, NewUser, User, UserId, UserValidationError, is_valid_email};
pub use self::user_registration::UserRegistrationService;
