//! Loyalty ledger: transaction-scoped point balance mutations.
//!
//! Every function here takes a `&mut PgConnection` borrowed from an
//! open transaction. Callers own the transaction boundary; the ledger
//! never commits, so a failure anywhere in the enclosing operation
//! rolls the balance change back with everything else.

use crate::storage;
use sqlx::PgConnection;
use staybook_core::types::UserId;
use staybook_core::{Error, Result};

/// Reads a user's balance under `FOR UPDATE`, locking the row until the
/// enclosing transaction ends.
///
/// Concurrent redemptions for the same user serialize on this lock, so
/// a read-then-debit pair can never both observe the same stale balance
/// (read-committed alone would allow exactly that race).
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no such user exists,
/// [`Error::Storage`] on query fault.
pub async fn balance_for_update(conn: &mut PgConnection, user_id: UserId) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT points FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id.as_uuid())
        .fetch_optional(conn)
        .await
        .map_err(|e| storage("Failed to lock point balance", e))?
        .ok_or(Error::NotFound("user"))
}

/// Credits earned points to a user's balance.
///
/// The single `UPDATE` takes its own row lock; no prior `FOR UPDATE`
/// read is needed because a credit cannot violate the non-negative
/// balance invariant.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no such user exists,
/// [`Error::Storage`] on query fault.
pub async fn credit_points(conn: &mut PgConnection, user_id: UserId, points: i64) -> Result<()> {
    let result = sqlx::query("UPDATE users SET points = points + $2 WHERE id = $1")
        .bind(user_id.as_uuid())
        .bind(points)
        .execute(conn)
        .await
        .map_err(|e| storage("Failed to credit points", e))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("user"));
    }

    Ok(())
}

/// Debits points from a balance previously read with
/// [`balance_for_update`] in the same transaction.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no such user exists,
/// [`Error::Storage`] on query fault (including the `points >= 0`
/// CHECK, which can only trip if the caller skipped the locked read).
pub async fn debit_points(conn: &mut PgConnection, user_id: UserId, points: i64) -> Result<()> {
    let result = sqlx::query("UPDATE users SET points = points - $2 WHERE id = $1")
        .bind(user_id.as_uuid())
        .bind(points)
        .execute(conn)
        .await
        .map_err(|e| storage("Failed to debit points", e))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("user"));
    }

    Ok(())
}
