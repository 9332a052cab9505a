//! Idempotent schema creation run once before the server accepts traffic.
//!
//! There is no migration history: every statement is guarded with
//! `IF NOT EXISTS` so the bootstrap can run on every start. The unique index
//! on `profiles(user_id)` backs the one-profile-per-user rule against
//! concurrent inserts.

use diesel_async::RunQueryDsl;
use tracing::info;

use super::pool::{DbPool, PoolError};
use super::transaction::Transaction;

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL
)";

const CREATE_PROFILES_TABLE: &str = "CREATE TABLE IF NOT EXISTS profiles (
    id SERIAL PRIMARY KEY,
    user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    profile_name TEXT NOT NULL
)";

const CREATE_PROFILE_OWNER_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS profiles_user_id_key ON profiles (user_id)";

/// Statements applied by [`ensure_schema`], in order.
pub const SCHEMA_STATEMENTS: [&str; 3] = [
    CREATE_USERS_TABLE,
    CREATE_PROFILES_TABLE,
    CREATE_PROFILE_OWNER_INDEX,
];

/// Errors raised while creating the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No connection could be obtained.
    #[error("schema bootstrap could not connect: {0}")]
    Connection(#[from] PoolError),
    /// A DDL statement failed.
    #[error("schema bootstrap failed: {message}")]
    Statement { message: String },
}

impl SchemaError {
    fn statement(error: diesel::result::Error) -> Self {
        Self::Statement {
            message: error.to_string(),
        }
    }
}

/// Create the `users` and `profiles` tables when absent.
///
/// All statements run in one transaction, so a failure leaves the database
/// as it was.
///
/// # Errors
///
/// Returns [`SchemaError::Connection`] when no connection is available and
/// [`SchemaError::Statement`] when any DDL statement fails.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), SchemaError> {
    let mut conn = pool.get().await?;
    let mut tx = Transaction::begin(&mut conn)
        .await
        .map_err(SchemaError::statement)?;

    let mut outcome = Ok(());
    for statement in SCHEMA_STATEMENTS {
        outcome = diesel::sql_query(statement)
            .execute(tx.connection())
            .await
            .map(|_| ())
            .map_err(SchemaError::statement);
        if outcome.is_err() {
            break;
        }
    }

    tx.finish(outcome, SchemaError::statement).await?;
    info!("tables created or already exist");
    Ok(())
}
