use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::models::listing::FoodListing;
use crate::models::notification::Notification;
use crate::models::profile::Profile;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub profiles: DashMap<Uuid, Profile>,
    pub listings: DashMap<Uuid, FoodListing>,
    pub notifications: DashMap<Uuid, Notification>,
    pub listing_tx: mpsc::Sender<FoodListing>,
    pub notification_events_tx: broadcast::Sender<Notification>,
    pub metrics: Metrics,
    pub nearby_radius_km: f64,
}

impl AppState {
    pub fn new(
        listing_queue_size: usize,
        event_buffer_size: usize,
        nearby_radius_km: f64,
    ) -> (Self, mpsc::Receiver<FoodListing>) {
        let (listing_tx, listing_rx) = mpsc::channel(listing_queue_size);
        let (notification_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        (
            Self {
                profiles: DashMap::new(),
                listings: DashMap::new(),
                notifications: DashMap::new(),
                listing_tx,
                notification_events_tx,
                metrics: Metrics::new(),
                nearby_radius_km,
            },
            listing_rx,
        )
    }
}
