//! The orchestrator: `generate` ties templates, providers, scoring, the
//! selector, and stop ordering into one plan build (spec §4, §9).
//!
//! Grounded on `original_source/plans/engineV3/engine.py`'s
//! `V3PlannerEngine.generate`/`_build_slots`/`_rank_slots`/`_materialize_stops`.

use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use langchain_rust::language_models::llm::LLM;

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::model::{
    FilledSlot, Leg, PlanDebug, PlanResult, RankedOption, Slot, SlotSpec, Stop, WeatherSnapshot,
};
use crate::engine::optimizer::nearest_neighbor;
use crate::engine::providers::{Location, Providers};
use crate::engine::scorer::score_place_for_slot;
use crate::engine::selector::{self, SelectorContext};
use crate::engine::temporal::{daypart, open_status, weather_profile};
use crate::engine::templates::choose_template;

/// The slot ids `_build_slots` treats as outdoor and drops in hostile weather.
const OUTDOOR_SLOT_IDS: [&str; 4] = ["photo_stop", "walk", "viewpoint_walk", "scenic_walk"];

pub struct GenerateInputs {
    pub city: String,
    pub user_location: Location,
    pub intent: String,
    pub when_selection: String,
    pub discovery_mode: String,
    pub constraints: Vec<String>,
    /// 0-3 scale, mirrors the source's `energy` input.
    pub energy: i32,
    pub duration_hours: Option<f64>,
}

pub struct GenerateContext {
    pub dt_local: DateTime<Utc>,
    pub weather: Option<WeatherSnapshot>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

pub struct PlannerEngine {
    providers: Arc<Providers>,
    llm: Option<Arc<dyn LLM + Send + Sync>>,
}

impl PlannerEngine {
    pub fn new(providers: Arc<Providers>, llm: Option<Arc<dyn LLM + Send + Sync>>) -> Self {
        PlannerEngine { providers, llm }
    }

    pub async fn generate(&self, inputs: GenerateInputs, context: GenerateContext) -> EngineResult<PlanResult> {
        if inputs.city.trim().is_empty() {
            return Err(EngineError::InvalidInput("city_name/city is required".into()));
        }

        let intent = inputs.intent.trim().to_lowercase();
        let intent = if intent.is_empty() { "chill".to_string() } else { intent };
        let when = {
            let w = inputs.when_selection.trim().to_lowercase();
            if w.is_empty() { "now".to_string() } else { w }
        };
        let discovery_mode = {
            let d = inputs.discovery_mode.trim().to_lowercase();
            if d.is_empty() { "local".to_string() } else { d }
        };

        let energy_str = if inputs.energy <= 1 { "low" } else if inputs.energy >= 2 { "high" } else { "medium" };

        let start_time = context.start_time.unwrap_or(context.dt_local);
        let duration_hours = match context.end_time {
            Some(end) => {
                let hours = (end - start_time).num_seconds() as f64 / 3600.0;
                if hours.is_finite() && hours > 0.0 { hours } else { 4.0 }
            }
            None => inputs.duration_hours.unwrap_or(4.0),
        };

        let hour = context.dt_local.hour();
        let dp = daypart(&context.dt_local);

        let weather = match context.weather {
            Some(w) => w,
            None => self.providers.weather(inputs.user_location).await,
        };
        let wp = weather_profile(&weather);

        let (template_key, slot_specs) = choose_template(&intent, &when, hour, duration_hours, energy_str);

        let slots = Self::build_slots(context.dt_local, &slot_specs, wp.hostile(), wp.pleasant);

        let ranked_slots = self
            .rank_slots(&slots, &inputs.city, inputs.user_location, dp, &discovery_mode, &inputs.constraints)
            .await;

        let selector_ctx = SelectorContext {
            hour,
            daypart: dp.to_string(),
            feels_like: weather.feels_like,
            condition: weather.condition.clone(),
        };
        let filled_slots = selector::fill(&selector_ctx, ranked_slots, self.llm.as_ref()).await;

        let stops = Self::materialize_stops(&filled_slots);
        let stops = nearest_neighbor(stops);
        let legs: Vec<Leg> = Vec::new();

        let debug = PlanDebug {
            template: template_key,
            daypart: dp.to_string(),
            slot_count: filled_slots.len(),
            duration_hours,
            energy_level: energy_str.to_string(),
            weather_confidence: weather.confidence,
        };

        Ok(PlanResult { filled_slots, stops, legs, debug })
    }

    /// `_build_slots`: lays slots back-to-back from `dt_local + 5min`,
    /// dropping outdoor slots and nudging durations/categories in hostile
    /// or very-cold weather.
    fn build_slots(dt_local: DateTime<Utc>, slot_specs: &[SlotSpec], hostile: bool, pleasant: bool) -> Vec<Slot> {
        let mut cursor = dt_local + chrono::Duration::minutes(5);
        let mut slots = Vec::new();

        let mut climate_constraints: Vec<String> = Vec::new();
        if hostile {
            climate_constraints.push("indoor_only".into());
            climate_constraints.push("prefer_short_legs".into());
        }

        for spec in slot_specs {
            if OUTDOOR_SLOT_IDS.contains(&spec.slot_id.as_str()) && hostile {
                continue;
            }

            let mut duration = spec.duration_min;
            if hostile && matches!(spec.slot_id.as_str(), "shopping_cluster" | "explore_area") {
                duration = (duration as f64 * 0.75).round().max(60.0) as i64;
            }
            if pleasant && matches!(spec.slot_id.as_str(), "photo_stop" | "walk") {
                duration = (duration as f64 * 1.2).round() as i64;
            }

            let mut slot_constraints = spec.constraints.clone();
            for c in &climate_constraints {
                if !slot_constraints.contains(c) {
                    slot_constraints.push(c.clone());
                }
            }

            let mut categories = spec.categories.clone();
            if hostile && spec.slot_id == "drinks" {
                if let Some(pos) = categories.iter().position(|c| c == "hotel_bar") {
                    let bar = categories.remove(pos);
                    categories.insert(0, bar);
                }
            }

            let start = cursor;
            let end = cursor + chrono::Duration::minutes(duration);
            slots.push(Slot {
                slot_id: spec.slot_id.clone(),
                title: spec.title.clone(),
                role: spec.role,
                duration_min: duration,
                categories,
                constraints: slot_constraints,
                start,
                end,
            });
            cursor = end;
        }

        slots
    }

    /// `_rank_slots`: fetch candidates per slot, hard-filter confirmed
    /// closed, score and sort, keep the top 10.
    async fn rank_slots(
        &self,
        slots: &[Slot],
        city: &str,
        user_location: Location,
        dp: &str,
        discovery_mode: &str,
        constraints: &[String],
    ) -> Vec<(Slot, Vec<RankedOption>)> {
        let mut ranked = Vec::with_capacity(slots.len());

        for slot in slots {
            let mut slot_constraints = constraints.to_vec();
            for c in &slot.constraints {
                if !slot_constraints.contains(c) {
                    slot_constraints.push(c.clone());
                }
            }

            let candidates = self
                .providers
                .candidates(city, user_location, &slot.categories, 2500, true, 25)
                .await;

            let mut options: Vec<RankedOption> = Vec::new();
            for place in candidates {
                let status = open_status(&place, slot.start, slot.duration_min);
                if status.is_open == Some(false) {
                    continue;
                }
                let distance_m = self.providers.distance_m(user_location, &place);
                let score = score_place_for_slot(
                    &place,
                    &slot.categories,
                    dp,
                    discovery_mode,
                    &slot_constraints,
                    &status,
                    Some(distance_m),
                );
                options.push(RankedOption {
                    place,
                    score,
                    distance_m,
                    open: status.is_open,
                    open_confidence: status.confidence,
                    open_reason: status.reason,
                });
            }

            options.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            options.truncate(10);

            ranked.push((slot.clone(), options));
        }

        ranked
    }

    /// `_materialize_stops`: one `Stop` per slot that has a valid selection,
    /// skipping slots whose pick isn't actually among that slot's options.
    fn materialize_stops(filled_slots: &[FilledSlot]) -> Vec<Stop> {
        let mut stops = Vec::new();

        for (i, filled) in filled_slots.iter().enumerate() {
            let Some(chosen_id) = &filled.selected_place_id else { continue };
            let Some(chosen) = filled.options.iter().find(|o| &o.place.place_id == chosen_id) else { continue };
            let p = &chosen.place;

            stops.push(Stop {
                order_index: i as i32,
                slot_id: filled.slot.slot_id.clone(),
                slot_title: filled.slot.title.clone(),
                slot_role: filled.slot.role,
                why_now: filled.why_now.clone().unwrap_or_default(),
                place_id: p.place_id.clone(),
                name: p.name.clone(),
                lat: p.lat,
                lng: p.lng,
                category: p.category.clone(),
                start: filled.slot.start,
                duration_min: filled.slot.duration_min,
                open_status_at_planned_time: chosen.open,
                open_confidence: chosen.open_confidence,
                open_status_reason: chosen.open_reason.clone(),
                opening_hours: p.opening_hours.clone(),
                place_types: p.types.clone(),
                business_status: p.business_status,
                rating: p.rating,
                popularity: p.popularity,
                photo_reference: p.photo_reference.clone(),
            });
        }

        stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::SlotRole;

    fn spec(slot_id: &str, categories: &[&str]) -> SlotSpec {
        SlotSpec {
            slot_id: slot_id.into(),
            title: "t".into(),
            duration_min: 60,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            constraints: vec![],
            role: SlotRole::Anchor,
        }
    }

    #[test]
    fn build_slots_drops_outdoor_in_hostile_weather() {
        let specs = vec![spec("walk", &["park"]), spec("drinks", &["bar", "hotel_bar"])];
        let slots = PlannerEngine::build_slots(Utc::now(), &specs, true, false);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot_id, "drinks");
        assert!(slots[0].constraints.contains(&"indoor_only".to_string()));
        assert_eq!(slots[0].categories[0], "hotel_bar");
    }

    #[test]
    fn build_slots_back_to_back_with_no_gaps() {
        let specs = vec![spec("a", &["bar"]), spec("b", &["cafe"])];
        let slots = PlannerEngine::build_slots(Utc::now(), &specs, false, false);
        assert_eq!(slots[0].end, slots[1].start);
    }

    #[test]
    fn materialize_stops_skips_slots_without_valid_selection() {
        let slot = Slot {
            slot_id: "drinks".into(),
            title: "Drinks".into(),
            role: SlotRole::Anchor,
            duration_min: 60,
            categories: vec!["bar".into()],
            constraints: vec![],
            start: Utc::now(),
            end: Utc::now(),
        };
        let filled = vec![FilledSlot { slot, options: vec![], selected_place_id: Some("missing".into()), why_now: None }];
        let stops = PlannerEngine::materialize_stops(&filled);
        assert!(stops.is_empty());
    }
}
