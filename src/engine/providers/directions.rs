//! Concrete `DirectionsProvider` over the Google Directions REST endpoint.
//! Grounded on `providers_core.py::DirectionsProvider`/`get_legs`; the
//! `google_maps` crate's pinned feature set (places-new + geocoding) does
//! not expose directions, so this goes directly through `reqwest` the same
//! way `google_places.rs` does for details enrichment.

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::providers::{DirectionsProvider, LegEstimate, Location};

const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

pub struct GoogleDirectionsProvider {
    api_key: String,
    http: reqwest::Client,
}

impl GoogleDirectionsProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        GoogleDirectionsProvider { api_key: api_key.into(), http: reqwest::Client::new() }
    }

    fn google_mode(mode: &str) -> &'static str {
        match mode {
            "bike" => "bicycling",
            "drive" => "driving",
            _ => "walking",
        }
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    legs: Vec<RouteLeg>,
    overview_polyline: Option<OverviewPolyline>,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct RouteLeg {
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Deserialize)]
struct ValueField {
    value: i64,
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsProvider {
    async fn leg(&self, origin: Location, destination: Location, mode: &str) -> LegEstimate {
        let resp = self
            .http
            .get(DIRECTIONS_URL)
            .query(&[
                ("key", self.api_key.clone()),
                ("origin", format!("{},{}", origin.lat, origin.lng)),
                ("destination", format!("{},{}", destination.lat, destination.lng)),
                ("mode", Self::google_mode(mode).to_string()),
            ])
            .send()
            .await
            .ok();

        let Some(resp) = resp else {
            return LegEstimate::default();
        };
        let Ok(parsed) = resp.json::<DirectionsResponse>().await else {
            return LegEstimate::default();
        };
        let Some(route) = parsed.routes.first() else {
            return LegEstimate::default();
        };
        let Some(leg) = route.legs.first() else {
            return LegEstimate::default();
        };
        LegEstimate {
            distance_m: leg.distance.as_ref().map(|d| d.value as f64).unwrap_or(0.0),
            duration_sec: leg.duration.as_ref().map(|d| d.value).unwrap_or(0),
            polyline: route.overview_polyline.as_ref().map(|p| p.points.clone()),
        }
    }
}
