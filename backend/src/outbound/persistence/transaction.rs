//! Scoped transactions over a single pooled connection.
//!
//! A [`Transaction`] is opened with [`Transaction::begin`], statements run
//! against [`Transaction::connection`], and the outcome of the unit of work
//! is handed to [`Transaction::finish`], which commits on `Ok` and rolls back
//! on `Err`. Writing each unit of work as a function returning `Result`
//! guarantees every exit path, early validation returns included, passes
//! through `finish`.
//!
//! A failed rollback is logged and the original error is returned, so the
//! caller always sees the first failure.

use diesel::result::Error as DieselError;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, TransactionManager};
use tracing::warn;

/// An open database transaction borrowing its connection.
pub(crate) struct Transaction<'c> {
    conn: &'c mut AsyncPgConnection,
}

impl<'c> Transaction<'c> {
    /// Issue `BEGIN` on `conn`.
    pub(crate) async fn begin(conn: &'c mut AsyncPgConnection) -> Result<Self, DieselError> {
        AnsiTransactionManager::begin_transaction(conn).await?;
        Ok(Self { conn })
    }

    /// Connection to run statements on; they execute in issue order.
    pub(crate) fn connection(&mut self) -> &mut AsyncPgConnection {
        &mut *self.conn
    }

    /// Commit when `outcome` is `Ok`, roll back otherwise.
    ///
    /// Commit failures are converted with `map_err` and returned in place of
    /// the value.
    pub(crate) async fn finish<T, E, M>(self, outcome: Result<T, E>, map_err: M) -> Result<T, E>
    where
        M: FnOnce(DieselError) -> E,
    {
        match outcome {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(self.conn)
                    .await
                    .map_err(map_err)?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) =
                    AnsiTransactionManager::rollback_transaction(self.conn).await
                {
                    warn!(error = %rollback_error, "transaction rollback failed");
                }
                Err(error)
            }
        }
    }
}
