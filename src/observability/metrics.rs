use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub notifications_total: IntCounterVec,
    pub listings_pending_notify: IntGauge,
    pub notify_latency_seconds: HistogramVec,
    pub seller_active_listings: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Total notifications by outcome"),
            &["outcome"],
        )
        .expect("valid notifications_total metric");

        let listings_pending_notify = IntGauge::new(
            "listings_pending_notify",
            "Listings queued for notification dispatch",
        )
        .expect("valid listings_pending_notify metric");

        let notify_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "notify_latency_seconds",
                "Latency of notification dispatch in seconds",
            ),
            &["outcome"],
        )
        .expect("valid notify_latency_seconds metric");

        let seller_active_listings = GaugeVec::new(
            Opts::new("seller_active_listings", "Stored listings per seller"),
            &["seller_id"],
        )
        .expect("valid seller_active_listings metric");

        registry
            .register(Box::new(notifications_total.clone()))
            .expect("register notifications_total");
        registry
            .register(Box::new(listings_pending_notify.clone()))
            .expect("register listings_pending_notify");
        registry
            .register(Box::new(notify_latency_seconds.clone()))
            .expect("register notify_latency_seconds");
        registry
            .register(Box::new(seller_active_listings.clone()))
            .expect("register seller_active_listings");

        Self {
            registry,
            notifications_total,
            listings_pending_notify,
            notify_latency_seconds,
            seller_active_listings,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
