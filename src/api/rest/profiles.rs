use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::notification::Notification;
use crate::models::profile::{GeoPoint, Profile, Role};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profiles", post(signup).get(list_profiles))
        .route("/profiles/:id", get(get_profile))
        .route("/profiles/:id/approve", post(approve_seller))
        .route("/profiles/:id/location", patch(update_location))
        .route("/profiles/:id/notifications", get(list_notifications))
}

/// Roles a signup may request; `seller` is stored as `pending` until an
/// admin approves it.
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedRole {
    Consumer,
    Seller,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub role: RequestedRole,
    pub location: GeoPoint,
    pub organization: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

fn validate_location(location: &GeoPoint) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&location.lat) {
        return Err(AppError::BadRequest(format!(
            "latitude {} out of range",
            location.lat
        )));
    }
    if !(-180.0..=180.0).contains(&location.lng) {
        return Err(AppError::BadRequest(format!(
            "longitude {} out of range",
            location.lng
        )));
    }
    Ok(())
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<Profile>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest("username cannot be empty".to_string()));
    }

    validate_location(&payload.location)?;

    let taken = state
        .profiles
        .iter()
        .any(|entry| entry.value().username == payload.username);
    if taken {
        return Err(AppError::Conflict(format!(
            "username {} is already taken",
            payload.username
        )));
    }

    let role = match payload.role {
        RequestedRole::Consumer => Role::Consumer,
        RequestedRole::Seller => Role::Pending,
    };

    let now = Utc::now();
    let profile = Profile {
        id: Uuid::new_v4(),
        username: payload.username,
        role,
        location: payload.location,
        organization: payload.organization,
        created_at: now,
        updated_at: now,
    };

    state.profiles.insert(profile.id, profile.clone());
    Ok(Json(profile))
}

async fn list_profiles(State(state): State<Arc<AppState>>) -> Json<Vec<Profile>> {
    let mut profiles: Vec<Profile> = state
        .profiles
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    profiles.sort_by_key(|profile| profile.created_at);
    Json(profiles)
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .profiles
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("profile {} not found", id)))?;

    Ok(Json(profile.value().clone()))
}

async fn approve_seller(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let mut profile = state
        .profiles
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("profile {} not found", id)))?;

    if profile.role != Role::Pending {
        return Err(AppError::Conflict(format!(
            "profile {} is not pending approval",
            id
        )));
    }

    profile.role = Role::Seller;
    profile.updated_at = Utc::now();

    Ok(Json(profile.clone()))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Profile>, AppError> {
    validate_location(&payload.location)?;

    let mut profile = state
        .profiles
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("profile {} not found", id)))?;

    profile.location = payload.location;
    profile.updated_at = Utc::now();

    Ok(Json(profile.clone()))
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, AppError> {
    if !state.profiles.contains_key(&id) {
        return Err(AppError::NotFound(format!("profile {} not found", id)));
    }

    let mut notifications: Vec<Notification> = state
        .notifications
        .iter()
        .filter(|entry| entry.value().recipient_id == id)
        .map(|entry| entry.value().clone())
        .collect();
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(notifications))
}
