//! Core data model for a single plan build (spec §3).
//!
//! Every type here is built in memory during one `PlannerEngine::generate`
//! call and is never mutated by more than one worker at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized place candidate, as returned by the Places provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f32>,
    pub popularity: Option<i64>,
    pub types: Vec<String>,
    pub category: String,
    pub opening_hours: Option<OpeningHours>,
    pub business_status: Option<BusinessStatus>,
    pub photo_reference: Option<String>,
    pub is_indoor: Option<bool>,
    pub noise_level: Option<i32>,
    pub tourist_density: i32,
    pub local_favorite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessStatus {
    Operational,
    ClosedTemporarily,
    ClosedPermanently,
}

/// Day-of-week + HHMM clock time, Google convention (0 = Sunday).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time_hhmm: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub open: DayTime,
    pub close: DayTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    pub periods: Vec<OpeningPeriod>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// Raw weather as reported by (or synthesized for) the Weather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: f64,
    pub feels_like: f64,
    pub condition: String,
    pub is_raining: bool,
    pub is_snowing: bool,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Derived boolean-flag summary of a [`WeatherSnapshot`] (spec §3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherProfile {
    pub cold: bool,
    pub very_cold: bool,
    pub rain: bool,
    pub snow: bool,
    pub windy: bool,
    pub pleasant: bool,
    pub confidence: Confidence,
}

impl WeatherProfile {
    pub fn hostile(&self) -> bool {
        self.very_cold || self.rain || self.snow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    Anchor,
    Reward,
    Optional,
    Nice,
}

impl SlotRole {
    /// Priority used when shrinking a template: reward > anchor > nice > optional.
    pub fn retention_priority(self) -> u8 {
        match self {
            SlotRole::Reward => 0,
            SlotRole::Anchor => 1,
            SlotRole::Nice => 2,
            SlotRole::Optional => 3,
        }
    }
}

/// Immutable template element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSpec {
    pub slot_id: String,
    pub title: String,
    pub duration_min: i64,
    pub categories: Vec<String>,
    pub constraints: Vec<String>,
    pub role: SlotRole,
}

/// `SlotSpec` instantiated with a concrete time window for one build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub slot_id: String,
    pub title: String,
    pub role: SlotRole,
    pub duration_min: i64,
    pub categories: Vec<String>,
    pub constraints: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenStatus {
    pub is_open: Option<bool>,
    pub confidence: OpenConfidence,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedOption {
    pub place: Place,
    pub score: f64,
    pub distance_m: f64,
    pub open: Option<bool>,
    pub open_confidence: OpenConfidence,
    pub open_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilledSlot {
    pub slot: Slot,
    pub options: Vec<RankedOption>,
    pub selected_place_id: Option<String>,
    pub why_now: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub order_index: i32,
    pub slot_id: String,
    pub slot_title: String,
    pub slot_role: SlotRole,
    pub why_now: String,
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
    pub start: DateTime<Utc>,
    pub duration_min: i64,
    pub open_status_at_planned_time: Option<bool>,
    pub open_confidence: OpenConfidence,
    pub open_status_reason: String,
    pub opening_hours: Option<OpeningHours>,
    pub place_types: Vec<String>,
    pub business_status: Option<BusinessStatus>,
    pub rating: Option<f32>,
    pub popularity: Option<i64>,
    pub photo_reference: Option<String>,
}

impl Stop {
    pub fn hours_unknown(&self) -> bool {
        self.open_status_at_planned_time.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walk,
    Bike,
    Drive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegOption {
    pub mode: TravelMode,
    pub distance_m: f64,
    pub duration_sec: i64,
    pub polyline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub from_stop: i32,
    pub to_stop: i32,
    pub options: Vec<LegOption>,
    pub recommended_mode: TravelMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDebug {
    pub template: String,
    pub daypart: String,
    pub slot_count: usize,
    pub duration_hours: f64,
    pub energy_level: String,
    pub weather_confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub filled_slots: Vec<FilledSlot>,
    pub stops: Vec<Stop>,
    pub legs: Vec<Leg>,
    pub debug: PlanDebug,
}
