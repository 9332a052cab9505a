//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ProfilePersistenceError, ProfileRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{NewProfile, NewUser, ProfileId, User, UserId, UserProfile};

#[derive(Debug, Default)]
struct AccountTables {
    users: BTreeMap<UserId, User>,
    profiles: BTreeMap<UserId, (ProfileId, String)>,
    next_user_id: i32,
    next_profile_id: i32,
}

/// In-memory stand-in for both driven ports.
///
/// Mirrors the PostgreSQL constraints: identifiers are sequential from 1,
/// emails are unique, and each user owns at most one profile. A rejected
/// insert leaves the tables untouched.
///
/// # Examples
/// ```ignore
/// use fitpass::domain::ports::UserRepository;
/// use fitpass::domain::NewUser;
/// use fitpass::test_support::InMemoryAccountStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryAccountStore::new();
/// let new_user = NewUser::try_from_parts("Ada", "ada@example.com").unwrap();
/// let user = store.create(&new_user).await.unwrap();
/// assert_eq!(user.id().as_i32(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    tables: Mutex<AccountTables>,
}

impl InMemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.tables.lock().map_or(0, |tables| tables.users.len())
    }

    /// Number of stored profiles.
    pub fn profile_count(&self) -> usize {
        self.tables.lock().map_or(0, |tables| tables.profiles.len())
    }

    fn tables(&self) -> Result<MutexGuard<'_, AccountTables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory account store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryAccountStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables().map_err(UserPersistenceError::connection)?;
        if tables
            .users
            .values()
            .any(|existing| existing.email() == &user.email)
        {
            return Err(UserPersistenceError::query(
                "duplicate key value violates unique constraint \"users_email_key\"",
            ));
        }

        tables.next_user_id += 1;
        let stored = user.clone().into_user(UserId::new(tables.next_user_id));
        tables.users.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables().map_err(UserPersistenceError::connection)?;
        Ok(tables.users.get(&id).cloned())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryAccountStore {
    async fn create_for_user(
        &self,
        profile: &NewProfile,
    ) -> Result<UserProfile, ProfilePersistenceError> {
        let mut tables = self.tables().map_err(ProfilePersistenceError::connection)?;
        let Some(user) = tables.users.get(&profile.user_id).cloned() else {
            return Err(ProfilePersistenceError::user_not_found(profile.user_id));
        };
        if tables.profiles.contains_key(&profile.user_id) {
            return Err(ProfilePersistenceError::profile_already_exists(
                profile.user_id,
            ));
        }

        tables.next_profile_id += 1;
        let id = ProfileId::new(tables.next_profile_id);
        tables
            .profiles
            .insert(profile.user_id, (id, profile.profile_name.clone()));
        Ok(UserProfile::new(id, user, profile.profile_name.clone()))
    }
}
