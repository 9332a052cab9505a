//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.
//!
//! Profile creation reads the owning user, checks for an existing profile,
//! and inserts the new row inside one transaction. The unique index on
//! `profiles(user_id)` catches a concurrent insert that slips past the
//! existence check; that violation is reported the same way as the check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ProfilePersistenceError, ProfileRepository};
use crate::domain::{NewProfile, ProfileId, User, UserId, UserProfile};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProfileRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{profiles, users};
use super::transaction::Transaction;

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfilePersistenceError {
    map_basic_pool_error(error, ProfilePersistenceError::connection)
}

fn map_diesel_error(error: DieselError) -> ProfilePersistenceError {
    map_basic_diesel_error(
        error,
        ProfilePersistenceError::query,
        ProfilePersistenceError::connection,
    )
}

/// Map failures of the profile insert, where constraint violations carry
/// domain meaning.
fn map_insert_error(error: DieselError, user_id: UserId) -> ProfilePersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ProfilePersistenceError::profile_already_exists(user_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ProfilePersistenceError::user_not_found(user_id)
        }
        other => map_diesel_error(other),
    }
}

fn row_to_owner(row: UserRow) -> Result<User, ProfilePersistenceError> {
    let id = row.id;
    User::try_from(row).map_err(|err| {
        ProfilePersistenceError::query(format!("stored user {id} is invalid: {err}"))
    })
}

async fn insert_profile(
    conn: &mut AsyncPgConnection,
    profile: &NewProfile,
) -> Result<UserProfile, ProfilePersistenceError> {
    let user_id = profile.user_id;

    let owner = users::table
        .find(user_id.as_i32())
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .ok_or_else(|| ProfilePersistenceError::user_not_found(user_id))?;

    let existing: Option<i32> = profiles::table
        .filter(profiles::user_id.eq(user_id.as_i32()))
        .select(profiles::id)
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    if existing.is_some() {
        return Err(ProfilePersistenceError::profile_already_exists(user_id));
    }

    let row = NewProfileRow {
        user_id: user_id.as_i32(),
        profile_name: profile.profile_name.as_str(),
    };
    let id = diesel::insert_into(profiles::table)
        .values(&row)
        .returning(profiles::id)
        .get_result::<i32>(conn)
        .await
        .map_err(|err| map_insert_error(err, user_id))?;

    Ok(UserProfile::new(
        ProfileId::new(id),
        row_to_owner(owner)?,
        profile.profile_name.clone(),
    ))
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn create_for_user(
        &self,
        profile: &NewProfile,
    ) -> Result<UserProfile, ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut tx = Transaction::begin(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let outcome = insert_profile(tx.connection(), profile).await;
        tx.finish(outcome, map_diesel_error).await
    }
}
