//! Concrete `WeatherProvider` over OpenWeatherMap, with the seasonal
//! fallback from spec.md §4.1 superseding the flatter fallback in
//! `original_source/plans/engineV3/providers/weather_provider.py` (noted in
//! SPEC_FULL.md §B — the redesigned fallback is authoritative).

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::engine::model::{Confidence, WeatherSnapshot};
use crate::engine::providers::{Location, WeatherProvider};
use crate::engine::temporal::seasonal_fallback;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct OpenWeatherProvider {
    api_key: String,
    http: reqwest::Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        OpenWeatherProvider { api_key: api_key.into(), http: reqwest::Client::new() }
    }
}

#[derive(Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmWeather>,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Deserialize)]
struct OwmWeather {
    main: String,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn snapshot(&self, location: Location) -> WeatherSnapshot {
        let result = self
            .http
            .get(OPENWEATHER_URL)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lng.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .ok();

        let Some(resp) = result else {
            return seasonal_fallback(&Utc::now());
        };
        let Ok(parsed) = resp.json::<OwmResponse>().await else {
            return seasonal_fallback(&Utc::now());
        };
        let condition = parsed.weather.first().map(|w| w.main.to_lowercase()).unwrap_or_default();
        WeatherSnapshot {
            temp: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            condition: condition.clone(),
            is_raining: condition.contains("rain"),
            is_snowing: condition.contains("snow"),
            confidence: Confidence::High,
        }
    }
}
