use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Row model for the `legs` table. `from_stop`/`to_stop` are `stops.id`
/// foreign keys; `modes_json` carries every `LegOption` the Directions
/// provider returned, `recommended_mode` is the one the engine picked.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LegRow {
	pub id: Uuid,
	pub plan_id: Uuid,
	pub from_stop: Uuid,
	pub to_stop: Uuid,
	pub modes_json: Value,
	pub recommended_mode: String,
	pub recommended_duration_sec: i32,
	pub recommended_distance_m: i32,
	pub created_at: DateTime<Utc>,
}
