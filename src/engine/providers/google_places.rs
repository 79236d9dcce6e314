//! Concrete `PlacesProvider` over the Google Places REST endpoints.
//!
//! Grounded on the teacher's `agent/tools/research.rs::NearbySearchTool`
//! (client construction from `GOOGLE_MAPS_API_KEY`) and
//! `original_source/plans/engineV3/providers/google_places_provider.py`
//! (exact nearby-search/details URLs and field list). The crate's pinned
//! `places-new-nearby-search` feature only covers the Places (New) nearby
//! search; details enrichment still goes through the classic REST endpoint
//! directly via `reqwest`, matching the Python reference.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::engine::model::{BusinessStatus, DayTime, OpeningHours, OpeningPeriod};
use crate::engine::providers::{Location, PlacesProvider, RawPlace};

const NEARBY_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

pub struct GooglePlacesProvider {
    api_key: String,
    http: reqwest::Client,
    language: String,
}

impl GooglePlacesProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        GooglePlacesProvider { api_key: api_key.into(), http: reqwest::Client::new(), language: "en".into() }
    }

    fn parse_opening_hours(value: &Value) -> Option<OpeningHours> {
        let periods_raw = value.get("periods")?.as_array()?;
        let mut periods = Vec::new();
        for p in periods_raw {
            let open = p.get("open")?;
            let close = p.get("close")?;
            periods.push(OpeningPeriod {
                open: DayTime {
                    day: open.get("day")?.as_u64()? as u8,
                    time_hhmm: open.get("time")?.as_str()?.parse().ok()?,
                },
                close: DayTime {
                    day: close.get("day")?.as_u64()? as u8,
                    time_hhmm: close.get("time")?.as_str()?.parse().ok()?,
                },
            });
        }
        let weekday_text = value
            .get("weekday_text")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|t| t.as_str().map(String::from)).collect())
            .unwrap_or_default();
        Some(OpeningHours { periods, weekday_text })
    }

    fn parse_business_status(value: &Value) -> Option<BusinessStatus> {
        match value.get("business_status")?.as_str()? {
            "OPERATIONAL" => Some(BusinessStatus::Operational),
            "CLOSED_TEMPORARILY" => Some(BusinessStatus::ClosedTemporarily),
            "CLOSED_PERMANENTLY" => Some(BusinessStatus::ClosedPermanently),
            _ => None,
        }
    }

    fn parse_result(v: &Value) -> RawPlace {
        RawPlace {
            place_id: v.get("place_id").and_then(|x| x.as_str()).unwrap_or_default().to_string(),
            name: v.get("name").and_then(|x| x.as_str()).unwrap_or_default().to_string(),
            lat: v.pointer("/geometry/location/lat").and_then(|x| x.as_f64()),
            lng: v.pointer("/geometry/location/lng").and_then(|x| x.as_f64()),
            rating: v.get("rating").and_then(|x| x.as_f64()).map(|x| x as f32),
            user_ratings_total: v.get("user_ratings_total").and_then(|x| x.as_i64()),
            types: v
                .get("types")
                .and_then(|x| x.as_array())
                .map(|arr| arr.iter().filter_map(|t| t.as_str().map(String::from)).collect())
                .unwrap_or_default(),
            opening_hours: v.get("opening_hours").and_then(Self::parse_opening_hours),
            business_status: Self::parse_business_status(v),
            photo_reference: v
                .pointer("/photos/0/photo_reference")
                .and_then(|x| x.as_str())
                .map(String::from),
        }
    }
}

#[derive(Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    result: Option<Value>,
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn nearby(
        &self,
        location: Location,
        radius_m: u32,
        provider_type: &str,
        keyword: Option<&str>,
    ) -> Vec<RawPlace> {
        let mut req = self.http.get(NEARBY_URL).query(&[
            ("key", self.api_key.as_str()),
            ("location", &format!("{},{}", location.lat, location.lng)),
            ("radius", &radius_m.to_string()),
            ("language", &self.language),
            ("type", provider_type),
        ]);
        if let Some(kw) = keyword {
            req = req.query(&[("keyword", kw)]);
        }
        let Ok(resp) = req.send().await else {
            return Vec::new();
        };
        let Ok(parsed) = resp.json::<NearbyResponse>().await else {
            return Vec::new();
        };
        parsed.results.iter().map(Self::parse_result).collect()
    }

    async fn details(&self, place_id: &str) -> Option<RawPlace> {
        let fields = "place_id,name,geometry/location,types,rating,user_ratings_total,opening_hours,business_status";
        let resp = self
            .http
            .get(DETAILS_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("place_id", place_id),
                ("fields", fields),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .ok()?;
        let parsed = resp.json::<DetailsResponse>().await.ok()?;
        parsed.result.as_ref().map(Self::parse_result)
    }
}
