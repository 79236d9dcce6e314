use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::model::{OpenConfidence, SlotRole};

/// Row model for the `stops` table. Mirrors `engine::model::Stop`
/// (spec §3) plus the persistence-only columns (`id`, `plan_id`).
/// `slot_role`/`open_confidence` are stored as plain text columns rather
/// than Postgres enums — they're read back and re-parsed with `serde_json`,
/// not filtered on in SQL.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StopRow {
	pub id: Uuid,
	pub plan_id: Uuid,
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
	pub open_status_reason: String,
	pub business_status: Option<String>,
	pub opening_hours_json: Option<Value>,
	pub place_types: Option<Value>,
	pub rating: Option<f32>,
	pub popularity: Option<i64>,
	pub photo_reference: Option<String>,
}

impl StopRow {
	pub fn from_stop(plan_id: Uuid, stop: &crate::engine::model::Stop) -> Self {
		StopRow {
			id: Uuid::new_v4(),
			plan_id,
			order_index: stop.order_index,
			slot_id: stop.slot_id.clone(),
			slot_title: stop.slot_title.clone(),
			slot_role: slot_role_str(stop.slot_role).to_string(),
			why_now: stop.why_now.clone(),
			place_id: stop.place_id.clone(),
			name: stop.name.clone(),
			lat: stop.lat,
			lng: stop.lng,
			category: stop.category.clone(),
			start_time_utc: stop.start,
			duration_min: stop.duration_min as i32,
			open_status_at_planned_time: stop.open_status_at_planned_time,
			open_confidence: open_confidence_str(stop.open_confidence).to_string(),
			open_status_reason: stop.open_status_reason.clone(),
			business_status: stop.business_status.map(|b| format!("{b:?}")),
			opening_hours_json: stop.opening_hours.as_ref().and_then(|h| serde_json::to_value(h).ok()),
			place_types: serde_json::to_value(&stop.place_types).ok(),
			rating: stop.rating,
			popularity: stop.popularity,
			photo_reference: stop.photo_reference.clone(),
		}
	}
}

fn slot_role_str(role: SlotRole) -> &'static str {
	match role {
		SlotRole::Anchor => "anchor",
		SlotRole::Reward => "reward",
		SlotRole::Optional => "optional",
		SlotRole::Nice => "nice",
	}
}

fn open_confidence_str(c: OpenConfidence) -> &'static str {
	match c {
		OpenConfidence::High => "high",
		OpenConfidence::Medium => "medium",
		OpenConfidence::Low => "low",
	}
}
