use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::listing::FoodListing;
use crate::models::notification::Notification;
use crate::models::profile::{GeoPoint, Profile, Role};
use crate::state::AppState;

/// Drains the listing queue and fans a notification out to every consumer
/// within the nearby radius of the listing's seller.
pub async fn run_notifier(state: Arc<AppState>, mut listing_rx: mpsc::Receiver<FoodListing>) {
    info!("notification dispatcher started");

    while let Some(listing) = listing_rx.recv().await {
        state.metrics.listings_pending_notify.dec();

        let start = Instant::now();
        match notify_listing(&state, &listing) {
            Ok(delivered) => {
                let elapsed = start.elapsed().as_secs_f64();
                state
                    .metrics
                    .notify_latency_seconds
                    .with_label_values(&["success"])
                    .observe(elapsed);
                state
                    .metrics
                    .notifications_total
                    .with_label_values(&["success"])
                    .inc_by(delivered as u64);
                info!(listing_id = %listing.id, delivered, "listing notifications dispatched");
            }
            Err(err) => {
                let elapsed = start.elapsed().as_secs_f64();
                state
                    .metrics
                    .notify_latency_seconds
                    .with_label_values(&["error"])
                    .observe(elapsed);
                state
                    .metrics
                    .notifications_total
                    .with_label_values(&["error"])
                    .inc();
                error!(error = %err, listing_id = %listing.id, "failed to dispatch notifications");
            }
        }
    }

    warn!("notification dispatcher stopped: queue channel closed");
}

fn notify_listing(state: &AppState, listing: &FoodListing) -> Result<usize, AppError> {
    let seller_location = state
        .profiles
        .get(&listing.seller_id)
        .map(|entry| entry.value().location.clone())
        .ok_or_else(|| {
            AppError::NotFound(format!("seller profile {} not found", listing.seller_id))
        })?;

    let profiles: Vec<Profile> = state
        .profiles
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    let recipients = nearby_consumers(&profiles, &seller_location, state.nearby_radius_km);

    let mut delivered = 0;
    for (recipient_id, distance_km) in recipients {
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id,
            listing_id: listing.id,
            message: format!("{} available {distance_km:.1} km away", listing.dish_name),
            distance_km,
            created_at: Utc::now(),
        };

        state
            .notifications
            .insert(notification.id, notification.clone());
        let _ = state.notification_events_tx.send(notification);
        delivered += 1;
    }

    Ok(delivered)
}

/// Consumers within `radius_km` of `origin`, paired with their distance.
pub fn nearby_consumers(
    profiles: &[Profile],
    origin: &GeoPoint,
    radius_km: f64,
) -> Vec<(Uuid, f64)> {
    profiles
        .iter()
        .filter(|profile| profile.role == Role::Consumer)
        .filter_map(|profile| {
            let distance_km = haversine_km(&profile.location, origin);
            (distance_km <= radius_km).then_some((profile.id, distance_km))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::nearby_consumers;
    use crate::models::profile::{GeoPoint, Profile, Role};

    fn profile(id_seed: u128, role: Role, lat: f64, lng: f64) -> Profile {
        Profile {
            id: Uuid::from_u128(id_seed),
            username: format!("user-{id_seed}"),
            role,
            location: GeoPoint { lat, lng },
            organization: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn includes_consumers_within_radius_with_distance() {
        let origin = GeoPoint {
            lat: 52.52,
            lng: 13.405,
        };
        let profiles = vec![profile(1, Role::Consumer, 52.53, 13.41)];

        let recipients = nearby_consumers(&profiles, &origin, 10.0);

        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].0, Uuid::from_u128(1));
        assert!(recipients[0].1 > 0.0 && recipients[0].1 < 10.0);
    }

    #[test]
    fn excludes_consumers_beyond_radius() {
        let origin = GeoPoint {
            lat: 52.52,
            lng: 13.405,
        };
        let profiles = vec![profile(1, Role::Consumer, 48.8566, 2.3522)];

        let recipients = nearby_consumers(&profiles, &origin, 10.0);

        assert!(recipients.is_empty());
    }

    #[test]
    fn only_consumers_are_notified() {
        let origin = GeoPoint {
            lat: 52.52,
            lng: 13.405,
        };
        let profiles = vec![
            profile(1, Role::Seller, 52.52, 13.405),
            profile(2, Role::Pending, 52.52, 13.405),
            profile(3, Role::Admin, 52.52, 13.405),
            profile(4, Role::Consumer, 52.52, 13.405),
        ];

        let recipients = nearby_consumers(&profiles, &origin, 10.0);

        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].0, Uuid::from_u128(4));
    }
}
