//! Uniform interface over Places, Weather, and Directions (spec §4.1, §9).
//!
//! Each role is a capability-bounded trait; the engine depends only on the
//! trait, never on a concrete vendor. Tests use in-memory fakes.

pub mod cache;
pub mod directions;
pub mod google_places;
pub mod taxonomy;
pub mod weather;

use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::model::{Place, WeatherSnapshot};

#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Places search + details capability.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn nearby(
        &self,
        location: Location,
        radius_m: u32,
        provider_type: &str,
        keyword: Option<&str>,
    ) -> Vec<RawPlace>;

    async fn details(&self, place_id: &str) -> Option<RawPlace>;
}

/// Weather snapshot capability.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn snapshot(&self, location: Location) -> WeatherSnapshot;
}

/// Directions capability, one mode at a time.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn leg(&self, origin: Location, destination: Location, mode: &str) -> LegEstimate;
}

#[derive(Debug, Clone, Default)]
pub struct LegEstimate {
    pub distance_m: f64,
    pub duration_sec: i64,
    pub polyline: Option<String>,
}

/// Pre-normalization provider record, before category guessing is applied
/// against the slot's desired categories.
#[derive(Debug, Clone, Default)]
pub struct RawPlace {
    pub place_id: String,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<i64>,
    pub types: Vec<String>,
    pub opening_hours: Option<crate::engine::model::OpeningHours>,
    pub business_status: Option<crate::engine::model::BusinessStatus>,
    pub photo_reference: Option<String>,
}

/// Earth radius used throughout, meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub fn haversine_m(a: Location, b: Location) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lng - a.lng).to_radians();
    let x = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * x.sqrt().min(1.0).asin()
}

/// Facade combining the three provider roles with caching/fan-out/fault
/// tolerance, matching `providers_core.py::Providers`.
pub struct Providers {
    pub places: Arc<dyn PlacesProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub directions: Option<Arc<dyn DirectionsProvider>>,
    pub cache: Arc<cache::Cache>,
}

impl Providers {
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        weather: Arc<dyn WeatherProvider>,
        directions: Option<Arc<dyn DirectionsProvider>>,
        cache: Arc<cache::Cache>,
    ) -> Self {
        Providers { places, weather, directions, cache }
    }

    pub fn distance_m(&self, user_location: Location, place: &Place) -> f64 {
        haversine_m(user_location, Location { lat: place.lat, lng: place.lng })
    }

    fn normalize(raw: &RawPlace, preferred_categories: &[String]) -> Option<Place> {
        let (lat, lng) = match (raw.lat, raw.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return None,
        };
        let category = taxonomy::guess_category(&raw.types, preferred_categories);
        if category == "other" {
            return None;
        }
        Some(Place {
            place_id: raw.place_id.clone(),
            name: raw.name.clone(),
            lat,
            lng,
            rating: raw.rating,
            popularity: raw.user_ratings_total,
            types: raw.types.clone(),
            category,
            opening_hours: raw.opening_hours.clone(),
            business_status: raw.business_status,
            photo_reference: raw.photo_reference.clone(),
            is_indoor: Some(true),
            noise_level: None,
            tourist_density: 0,
            local_favorite: false,
        })
    }

    /// `candidates(...)`: bounded to the first 6 categories, deduplicated by
    /// `place_id`, optionally enriched via Details for the first
    /// `enrich_limit` results. Cache keyed by `(city, categories, radius)`;
    /// per-category provider failure is swallowed (partial result is
    /// acceptable) — the trait signature itself cannot fail, so "failure"
    /// here means an empty `nearby()` response.
    pub async fn candidates(
        &self,
        city: &str,
        user_location: Location,
        categories: &[String],
        radius_m: u32,
        enrich_opening_hours: bool,
        enrich_limit: usize,
    ) -> Vec<Place> {
        let cache_key = format!(
            "places:{city}:{}:{radius_m}:{enrich_opening_hours}",
            categories.iter().take(6).cloned().collect::<Vec<_>>().join(",")
        );
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(places) = serde_json::from_str::<Vec<Place>>(&cached) {
                return places;
            }
        }

        let mut seen = std::collections::HashSet::new();
        let mut normalized = Vec::new();

        for category in categories.iter().take(6) {
            let mapping = match taxonomy::CATEGORY_TO_GOOGLE.get(category.as_str()) {
                Some(m) => *m,
                None => continue,
            };
            self.cache.incr("metrics:places_api_calls");
            let raw = self
                .places
                .nearby(user_location, radius_m, mapping.provider_type, mapping.keyword)
                .await;
            if raw.is_empty() {
                self.cache.incr("metrics:places_api_failures");
            }
            for p in raw {
                if p.place_id.is_empty() || !seen.insert(p.place_id.clone()) {
                    continue;
                }
                if let Some(place) = Self::normalize(&p, categories) {
                    normalized.push(place);
                }
            }
        }

        if enrich_opening_hours {
            for place in normalized.iter_mut().take(enrich_limit) {
                if let Some(details) = self.places.details(&place.place_id).await {
                    if let Some(merged) = Self::normalize(&details, categories) {
                        place.opening_hours = merged.opening_hours;
                        place.types = merged.types;
                        place.business_status = merged.business_status;
                        place.category = merged.category;
                    }
                }
            }
        }

        let ttl = if enrich_opening_hours {
            std::time::Duration::from_secs(3600)
        } else {
            std::time::Duration::from_secs(900)
        };
        if let Ok(json) = serde_json::to_string(&normalized) {
            self.cache.set(cache_key, json, ttl);
        }

        normalized
    }

    pub async fn weather(&self, location: Location) -> WeatherSnapshot {
        let cache_key = format!("weather:{:.2}:{:.2}", location.lat, location.lng);
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(snapshot) = serde_json::from_str::<WeatherSnapshot>(&cached) {
                return snapshot;
            }
        }
        self.cache.incr("metrics:weather_api_calls");
        let snapshot = self.weather.snapshot(location).await;
        if let Ok(json) = serde_json::to_string(&snapshot) {
            self.cache.set(cache_key, json, std::time::Duration::from_secs(1800));
        }
        snapshot
    }

    pub async fn leg(&self, origin: Location, destination: Location, mode: &str) -> LegEstimate {
        let Some(directions) = &self.directions else {
            return LegEstimate::default();
        };
        let cache_key = format!(
            "directions:{:.5}:{:.5}:{:.5}:{:.5}:{mode}",
            origin.lat, origin.lng, destination.lat, destination.lng
        );
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok((distance_m, duration_sec, polyline)) =
                serde_json::from_str::<(f64, i64, Option<String>)>(&cached)
            {
                return LegEstimate { distance_m, duration_sec, polyline };
            }
        }
        let estimate = directions.leg(origin, destination, mode).await;
        if let Ok(json) =
            serde_json::to_string(&(estimate.distance_m, estimate.duration_sec, estimate.polyline.clone()))
        {
            self.cache.set(cache_key, json, std::time::Duration::from_secs(600));
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_distance() {
        let a = Location { lat: 48.137, lng: 11.575 };
        assert!(haversine_m(a, a) < 1e-6);
    }

    #[test]
    fn haversine_is_symmetric_and_positive() {
        let a = Location { lat: 48.137, lng: 11.575 };
        let b = Location { lat: 48.150, lng: 11.580 };
        assert!((haversine_m(a, b) - haversine_m(b, a)).abs() < 1e-6);
        assert!(haversine_m(a, b) > 0.0);
    }
}
