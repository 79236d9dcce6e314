use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Type;
use uuid::Uuid;

/// `status` column, mapped to Postgres `plan_status` (spec.md §6).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Type)]
#[sqlx(type_name = "plan_status")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
	Draft,
	Building,
	Ready,
	Active,
	Completed,
	Failed,
	Swapping,
}

/// Row model for the `plans` table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlanRow {
	pub id: Uuid,
	pub account_id: i32,
	pub status: PlanStatus,
	pub inputs_json: Value,
	pub start_time_utc: DateTime<Utc>,
	pub end_time_utc: DateTime<Utc>,
	pub weather_snapshot_json: Value,
	pub optimization_metadata: Value,
	pub last_error_code: Option<String>,
	pub last_error_context: Option<String>,
	pub generation_method: String,
	pub llm_attempts: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
