/*
 * src/http_models/plan.rs
 *
 * Request/response payloads for `/api/plans`.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

/// Request payload for POST `/api/plans`. Mirrors `engine::planner::GenerateInputs`.
#[derive(Debug, Deserialize, Clone, ToSchema)]
pub struct CreatePlanRequest {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    /// `chill|explore|food_tour|...` — free text, lower-cased and defaulted
    /// server-side (spec.md §6).
    #[serde(default)]
    pub intent: Option<String>,
    /// `now|later_today|tonight|tomorrow`.
    #[serde(default)]
    pub when_selection: Option<String>,
    /// `today|travel|date` — selects default duration and exact minute
    /// mapping for `when_selection` (SPEC_FULL.md §B).
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub discovery_mode: Option<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    /// 0-3 scale.
    #[serde(default)]
    pub energy: Option<i32>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub use_llm: bool,
}

/// API route response for POST `/api/plans` and GET `/api/plans/:id`.
#[derive(Debug, Serialize, ToSchema, ToResponse)]
pub struct PlanResponse {
    pub id: Uuid,
    pub status: String,
    pub start_time_utc: DateTime<Utc>,
    pub end_time_utc: DateTime<Utc>,
    pub stops: Vec<StopResponse>,
    pub legs: Vec<LegResponse>,
    pub weather_snapshot: Value,
    pub local_guide: Option<Value>,
    pub debug: Value,
    pub last_error_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, ToResponse)]
pub struct StopResponse {
    pub order_index: i32,
    pub slot_id: String,
    pub slot_title: String,
    pub slot_role: String,
    pub why_now: String,
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
    pub start_time_utc: DateTime<Utc>,
    pub duration_min: i32,
    pub open_status_at_planned_time: Option<bool>,
    pub open_confidence: String,
    pub rating: Option<f32>,
    pub popularity: Option<i64>,
    pub photo_reference: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, ToResponse)]
pub struct LegResponse {
    pub from_stop: Uuid,
    pub to_stop: Uuid,
    pub recommended_mode: String,
    pub recommended_duration_sec: i32,
    pub recommended_distance_m: i32,
}
