//! Voucher catalog and redemption handlers.

use crate::auth::{RequireAdmin, SessionUser};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use staybook_core::types::{RedemptionReceipt, VoucherDefinition, VoucherDraft, VoucherId, VoucherRedemption};
use uuid::Uuid;

/// List the voucher catalog.
///
/// # Endpoint
///
/// `GET /api/vouchers`
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<VoucherDefinition>>, AppError> {
    let catalog = state.vouchers.list_catalog().await?;
    Ok(Json(catalog))
}

/// Exchange points for a voucher.
///
/// The point debit and redemption grant happen in one transaction; a
/// balance short of the cost leaves everything unchanged.
///
/// # Endpoint
///
/// `POST /api/vouchers/:id/redeem`
pub async fn redeem(
    State(state): State<AppState>,
    caller: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RedemptionReceipt>), AppError> {
    let receipt = state
        .vouchers
        .redeem_voucher(caller.user.id, VoucherId::from_uuid(id))
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// List the caller's redemptions, used and unused.
///
/// # Endpoint
///
/// `GET /api/vouchers/mine`
pub async fn mine(
    State(state): State<AppState>,
    caller: SessionUser,
) -> Result<Json<Vec<VoucherRedemption>>, AppError> {
    let redemptions = state.vouchers.redemptions_for(caller.user.id).await?;
    Ok(Json(redemptions))
}

/// Add a voucher to the catalog (admin).
///
/// # Endpoint
///
/// `POST /api/vouchers`
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(draft): Json<VoucherDraft>,
) -> Result<(StatusCode, Json<VoucherDefinition>), AppError> {
    check_draft(&draft)?;
    let voucher = state.vouchers.create_voucher(&draft).await?;

    tracing::info!(voucher_id = %voucher.id, admin = %admin.user.id, "Voucher created");
    Ok((StatusCode::CREATED, Json(voucher)))
}

/// Remove a voucher from the catalog (admin). Granted redemptions are
/// removed with it.
///
/// # Endpoint
///
/// `DELETE /api/vouchers/:id`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.vouchers.delete_voucher(VoucherId::from_uuid(id)).await?;

    tracing::info!(voucher_id = %id, admin = %admin.user.id, "Voucher deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn check_draft(draft: &VoucherDraft) -> Result<(), AppError> {
    if draft.code.trim().is_empty() {
        return Err(AppError::validation("code must not be empty"));
    }
    if draft.discount < 0 {
        return Err(AppError::validation("discount must not be negative"));
    }
    if draft.point_cost < 0 {
        return Err(AppError::validation("point_cost must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> VoucherDraft {
        VoucherDraft {
            code: "WELCOME10".to_string(),
            description: "10k off your first stay".to_string(),
            discount: 10_000,
            point_cost: 100,
            image_url: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(check_draft(&draft()).is_ok());
    }

    #[test]
    fn empty_code_is_rejected() {
        let mut d = draft();
        d.code = "  ".to_string();
        assert!(check_draft(&d).is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut d = draft();
        d.discount = -1;
        assert!(check_draft(&d).is_err());

        let mut d = draft();
        d.point_cost = -1;
        assert!(check_draft(&d).is_err());
    }
}
