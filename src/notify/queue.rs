use crate::error::AppError;
use crate::models::listing::FoodListing;
use crate::state::AppState;

pub async fn enqueue_listing(state: &AppState, listing: FoodListing) -> Result<(), AppError> {
    state
        .listing_tx
        .send(listing)
        .await
        .map_err(|err| AppError::Internal(format!("notify queue send failed: {err}")))?;

    state.metrics.listings_pending_notify.inc();
    Ok(())
}
