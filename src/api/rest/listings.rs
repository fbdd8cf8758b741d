use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::countdown::time_remaining;
use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::listing::{Dietary, FoodListing};
use crate::models::profile::Role;
use crate::notify::queue::enqueue_listing;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings", post(create_listing))
        .route("/listings/:id", get(get_listing))
        .route("/listings/nearby/:profile_id", get(nearby_listings))
        .route("/sellers/:seller_id/listings", get(seller_listings))
        .route(
            "/sellers/:seller_id/listings/:id",
            delete(delete_listing),
        )
}

#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub seller_id: Uuid,
    pub dish_name: String,
    pub description: String,
    pub serves: u16,
    pub storage: String,
    pub dietary: Dietary,
    pub pickup_window_hours: u32,
}

/// Seller-dashboard view of a listing with its live countdown.
#[derive(Serialize)]
pub struct SellerListing {
    pub listing: FoodListing,
    pub time_left: String,
    pub available: bool,
}

/// Consumer-dashboard view: a listing within range, with distance to its
/// seller and the live countdown.
#[derive(Serialize)]
pub struct NearbyListing {
    pub listing: FoodListing,
    pub distance_km: f64,
    pub time_left: String,
    pub available: bool,
}

async fn create_listing(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Json<FoodListing>, AppError> {
    let seller_role = state
        .profiles
        .get(&payload.seller_id)
        .map(|entry| entry.value().role.clone())
        .ok_or_else(|| AppError::NotFound(format!("profile {} not found", payload.seller_id)))?;

    if seller_role != Role::Seller {
        return Err(AppError::Forbidden(
            "profile is not an approved seller".to_string(),
        ));
    }

    if payload.dish_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "dish name cannot be empty".to_string(),
        ));
    }

    if payload.serves == 0 {
        return Err(AppError::BadRequest("serves must be > 0".to_string()));
    }

    if payload.pickup_window_hours == 0 {
        return Err(AppError::BadRequest(
            "pickup window must be > 0".to_string(),
        ));
    }

    let listing = FoodListing {
        id: Uuid::new_v4(),
        seller_id: payload.seller_id,
        dish_name: payload.dish_name,
        description: payload.description,
        serves: payload.serves,
        storage: payload.storage,
        dietary: payload.dietary,
        pickup_window_hours: payload.pickup_window_hours,
        created_at: Utc::now(),
    };

    state.listings.insert(listing.id, listing.clone());
    update_seller_gauge(&state, payload.seller_id);
    enqueue_listing(&state, listing.clone()).await?;

    Ok(Json(listing))
}

async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodListing>, AppError> {
    let listing = state
        .listings
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("listing {} not found", id)))?;

    Ok(Json(listing.value().clone()))
}

async fn seller_listings(
    State(state): State<Arc<AppState>>,
    Path(seller_id): Path<Uuid>,
) -> Result<Json<Vec<SellerListing>>, AppError> {
    if !state.profiles.contains_key(&seller_id) {
        return Err(AppError::NotFound(format!(
            "profile {} not found",
            seller_id
        )));
    }

    let now = Utc::now();
    let mut listings: Vec<SellerListing> = state
        .listings
        .iter()
        .filter(|entry| entry.value().seller_id == seller_id)
        .map(|entry| {
            let listing = entry.value().clone();
            let time_left = time_remaining(listing.created_at, listing.pickup_window_hours, now);
            SellerListing {
                available: time_left.is_available(),
                time_left: time_left.to_string(),
                listing,
            }
        })
        .collect();
    listings.sort_by_key(|item| item.listing.created_at);

    Ok(Json(listings))
}

async fn nearby_listings(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Vec<NearbyListing>>, AppError> {
    let consumer_location = state
        .profiles
        .get(&profile_id)
        .map(|entry| entry.value().location.clone())
        .ok_or_else(|| AppError::NotFound(format!("profile {} not found", profile_id)))?;

    let now = Utc::now();
    let mut nearby = Vec::new();

    for entry in state.listings.iter() {
        let listing = entry.value();

        // Listings whose seller profile has vanished are skipped, not errors.
        let Some(seller) = state.profiles.get(&listing.seller_id) else {
            continue;
        };

        let distance_km = haversine_km(&consumer_location, &seller.value().location);
        if distance_km > state.nearby_radius_km {
            continue;
        }

        let time_left = time_remaining(listing.created_at, listing.pickup_window_hours, now);
        nearby.push(NearbyListing {
            listing: listing.clone(),
            distance_km,
            available: time_left.is_available(),
            time_left: time_left.to_string(),
        });
    }

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(Json(nearby))
}

async fn delete_listing(
    State(state): State<Arc<AppState>>,
    Path((seller_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<FoodListing>, AppError> {
    let owner = state
        .listings
        .get(&id)
        .map(|entry| entry.value().seller_id)
        .ok_or_else(|| AppError::NotFound(format!("listing {} not found", id)))?;

    if owner != seller_id {
        return Err(AppError::Forbidden(
            "listing belongs to another seller".to_string(),
        ));
    }

    let (_, listing) = state
        .listings
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("listing {} not found", id)))?;

    update_seller_gauge(&state, seller_id);
    Ok(Json(listing))
}

fn update_seller_gauge(state: &AppState, seller_id: Uuid) {
    let count = state
        .listings
        .iter()
        .filter(|entry| entry.value().seller_id == seller_id)
        .count();
    state
        .metrics
        .seller_active_listings
        .with_label_values(&[&seller_id.to_string()])
        .set(count as f64);
}
