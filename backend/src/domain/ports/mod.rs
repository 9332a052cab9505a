//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod profile_registration;
mod profile_repository;
mod user_registration;
mod user_repository;

pub use profile_registration::{CreateProfileRequest, ProfileRegistration};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfilePersistenceError, ProfileRepository};
pub use user_registration::{CreateUserRequest, UserRegistration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
