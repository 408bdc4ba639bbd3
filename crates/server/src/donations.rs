//! Donation API endpoints

use api_types::donation::{DonationDetail, DonationNew, DonationView};
use axum::{Extension, Json, extract::State};
use engine::Donation;

use crate::{ServerError, server::ServerState, user};

fn view(donation: Donation) -> DonationView {
    DonationView {
        id: donation.id,
        full_amount: donation.funding.target_amount,
        comment: donation.comment,
        create_date: donation.funding.created_at,
    }
}

fn detail(donation: Donation) -> DonationDetail {
    DonationDetail {
        id: donation.id,
        user_id: donation.user_id,
        full_amount: donation.funding.target_amount,
        comment: donation.comment,
        invested_amount: donation.funding.invested_amount,
        fully_invested: donation.funding.fully_invested,
        create_date: donation.funding.created_at,
        close_date: donation.funding.closed_at,
    }
}

/// Handle requests for donating. The donation is spent on open projects at once.
pub async fn donation_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DonationNew>,
) -> Result<Json<DonationView>, ServerError> {
    let mut cmd = engine::DonationNew::new(user.username, payload.full_amount);
    cmd.comment = payload.comment;

    let donation = state.engine.new_donation(cmd).await?;
    Ok(Json(view(donation)))
}

/// Every donation with its allocation state (superuser only).
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DonationDetail>>, ServerError> {
    let donations = state.engine.donations(&user.username).await?;
    Ok(Json(donations.into_iter().map(detail).collect()))
}

/// Donations of the authenticated user.
pub async fn mine(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DonationView>>, ServerError> {
    let donations = state.engine.user_donations(&user.username).await?;
    Ok(Json(donations.into_iter().map(view).collect()))
}
