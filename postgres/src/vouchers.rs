//! Voucher ledger: catalog plus per-user redemption state.
//!
//! Redemption is the symmetric half of the booking transaction: it
//! debits points and grants a consumable redemption row, atomically.

use crate::{loyalty, storage};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use staybook_core::types::{
    RedemptionId, RedemptionReceipt, UserId, VoucherDefinition, VoucherDraft, VoucherId,
    VoucherRedemption,
};
use staybook_core::{Error, Result};
use tracing::info;
use uuid::Uuid;

/// PostgreSQL-backed voucher catalog and redemption ledger.
#[derive(Clone)]
pub struct PgVoucherLedger {
    pool: PgPool,
}

impl PgVoucherLedger {
    /// Creates a ledger over the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists the voucher catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn list_catalog(&self) -> Result<Vec<VoucherDefinition>> {
        let rows = sqlx::query(
            "SELECT id, code, description, discount, point_cost, image_url
             FROM vouchers
             ORDER BY point_cost",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to list vouchers", e))?;

        rows.iter().map(voucher_from_row).collect()
    }

    /// Gets one voucher definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the voucher id is unknown,
    /// [`Error::Storage`] on query fault.
    pub async fn get_voucher(&self, voucher_id: VoucherId) -> Result<VoucherDefinition> {
        let row = sqlx::query(
            "SELECT id, code, description, discount, point_cost, image_url
             FROM vouchers
             WHERE id = $1",
        )
        .bind(voucher_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to get voucher", e))?
        .ok_or(Error::NotFound("voucher"))?;

        voucher_from_row(&row)
    }

    /// Inserts a voucher definition from an admin draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the code is already in the
    /// catalog, [`Error::Storage`] on any other query fault.
    pub async fn create_voucher(&self, draft: &VoucherDraft) -> Result<VoucherDefinition> {
        let id = VoucherId::new();
        let row = sqlx::query(
            "INSERT INTO vouchers (id, code, description, discount, point_cost, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, code, description, discount, point_cost, image_url",
        )
        .bind(id.as_uuid())
        .bind(&draft.code)
        .bind(&draft.description)
        .bind(draft.discount)
        .bind(draft.point_cost)
        .bind(draft.image_url.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Error::Validation("voucher code already exists".into());
                }
            }
            storage("Failed to create voucher", e)
        })?;

        voucher_from_row(&row)
    }

    /// Deletes a voucher definition and its redemptions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the voucher id is unknown,
    /// [`Error::Storage`] on query fault.
    pub async fn delete_voucher(&self, voucher_id: VoucherId) -> Result<()> {
        let result = sqlx::query("DELETE FROM vouchers WHERE id = $1")
            .bind(voucher_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to delete voucher", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("voucher"));
        }

        Ok(())
    }

    /// Redeems a voucher: debits the user's points and grants a usable
    /// redemption, atomically.
    ///
    /// The balance is read under `FOR UPDATE` inside the transaction;
    /// two concurrent redemptions for the same user serialize on that
    /// row lock, so both can never succeed when the balance only covers
    /// one. On any failure the transaction handle is dropped and sqlx
    /// rolls everything back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the voucher id is unknown,
    /// [`Error::InsufficientPoints`] if the balance does not cover the
    /// cost (no writes performed), [`Error::Storage`] on query fault.
    pub async fn redeem_voucher(
        &self,
        user_id: UserId,
        voucher_id: VoucherId,
    ) -> Result<RedemptionReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("Failed to start transaction", e))?;

        // The cost is read inside the transaction so a voucher deleted
        // concurrently surfaces as NotFound, not as a constraint fault
        // at the insert below.
        let point_cost =
            sqlx::query_scalar::<_, i64>("SELECT point_cost FROM vouchers WHERE id = $1")
                .bind(voucher_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| storage("Failed to get voucher", e))?
                .ok_or(Error::NotFound("voucher"))?;

        let balance = loyalty::balance_for_update(&mut *tx, user_id).await?;
        if balance < point_cost {
            return Err(Error::InsufficientPoints {
                required: point_cost,
                available: balance,
            });
        }

        loyalty::debit_points(&mut *tx, user_id, point_cost).await?;

        let redemption_id = RedemptionId::new();
        let row = sqlx::query(
            "INSERT INTO voucher_redemptions (id, user_id, voucher_id)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, voucher_id, is_used, redeemed_at",
        )
        .bind(redemption_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(voucher_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage("Failed to insert redemption", e))?;

        let redemption = redemption_from_row(&row)?;

        tx.commit()
            .await
            .map_err(|e| storage("Failed to commit redemption", e))?;

        info!(
            user_id = %user_id,
            voucher_id = %voucher_id,
            cost = point_cost,
            balance = balance - point_cost,
            "Voucher redeemed"
        );

        Ok(RedemptionReceipt {
            redemption,
            balance: balance - point_cost,
        })
    }

    /// Lists a user's redemptions, newest first, with their used flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn redemptions_for(&self, user_id: UserId) -> Result<Vec<VoucherRedemption>> {
        let rows = sqlx::query(
            "SELECT id, user_id, voucher_id, is_used, redeemed_at
             FROM voucher_redemptions
             WHERE user_id = $1
             ORDER BY redeemed_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to list redemptions", e))?;

        rows.iter().map(redemption_from_row).collect()
    }
}

fn voucher_from_row(row: &PgRow) -> Result<VoucherDefinition> {
    let id: Uuid = row.try_get("id").map_err(|e| storage("Bad voucher row", e))?;

    Ok(VoucherDefinition {
        id: VoucherId::from_uuid(id),
        code: row
            .try_get("code")
            .map_err(|e| storage("Bad voucher row", e))?,
        description: row
            .try_get("description")
            .map_err(|e| storage("Bad voucher row", e))?,
        discount: row
            .try_get("discount")
            .map_err(|e| storage("Bad voucher row", e))?,
        point_cost: row
            .try_get("point_cost")
            .map_err(|e| storage("Bad voucher row", e))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| storage("Bad voucher row", e))?,
    })
}

pub(crate) fn redemption_from_row(row: &PgRow) -> Result<VoucherRedemption> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| storage("Bad redemption row", e))?;
    let user_id: Uuid = row
        .try_get("user_id")
        .map_err(|e| storage("Bad redemption row", e))?;
    let voucher_id: Uuid = row
        .try_get("voucher_id")
        .map_err(|e| storage("Bad redemption row", e))?;
    let redeemed_at: DateTime<Utc> = row
        .try_get("redeemed_at")
        .map_err(|e| storage("Bad redemption row", e))?;

    Ok(VoucherRedemption {
        id: RedemptionId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        voucher_id: VoucherId::from_uuid(voucher_id),
        is_used: row
            .try_get("is_used")
            .map_err(|e| storage("Bad redemption row", e))?,
        redeemed_at,
    })
}
