//! Selector: deterministic fill with an optional LLM-backed strategy
//! (spec §4.5). The LLM is a strategy parameter, not core — any failure
//! resolves to the deterministic pick (spec.md §9).

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use langchain_rust::language_models::llm::LLM;

use crate::engine::model::{FilledSlot, RankedOption, Slot};

const WHY_MAX: usize = 50;

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Case analysis from spec.md §4.5, evaluated in order.
fn simple_why_now(feels_like: f64, condition: &str, daypart: &str) -> String {
    let text = if feels_like <= 5.0 {
        "Mejor indoor por fr\u{ed}o"
    } else if condition.contains("rain") || condition.contains("drizzle") {
        "Ideal para cubrirte"
    } else if daypart == "late" {
        "Abierto a esta hora"
    } else {
        "Buen timing"
    };
    truncate(text, WHY_MAX)
}

pub struct SelectorContext {
    pub hour: u32,
    pub daypart: String,
    pub feels_like: f64,
    pub condition: String,
}

/// Deterministic strategy: pick the highest-scored option per slot (options
/// arrive pre-sorted descending; ties keep input order because the sort
/// upstream is stable).
fn deterministic_fill(ctx: &SelectorContext, slot: Slot, options: Vec<RankedOption>) -> FilledSlot {
    let selected = options.first();
    let (selected_place_id, why_now) = match selected {
        Some(opt) => (
            Some(opt.place.place_id.clone()),
            Some(simple_why_now(ctx.feels_like, &ctx.condition, &ctx.daypart)),
        ),
        None => (None, None),
    };
    FilledSlot { slot, options, selected_place_id, why_now }
}

#[derive(Deserialize)]
struct LlmPick {
    slot_id: String,
    selected_place_id: String,
    why_now: String,
}

#[derive(Deserialize)]
struct LlmFillResponse {
    picks: Vec<LlmPick>,
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed)
        .strip_suffix("```")
        .unwrap_or(trimmed)
        .trim()
}

fn build_fill_prompt(ctx: &SelectorContext, slots: &[(Slot, Vec<RankedOption>)]) -> String {
    let slots_json: Vec<_> = slots
        .iter()
        .map(|(slot, options)| {
            let candidates: Vec<_> = options
                .iter()
                .take(5)
                .map(|o| json!({"place_id": o.place.place_id, "name": o.place.name, "category": o.place.category}))
                .collect();
            json!({
                "slot_id": slot.slot_id,
                "title": slot.title,
                "start": slot.start.to_rfc3339(),
                "duration_min": slot.duration_min,
                "candidates": candidates,
            })
        })
        .collect();

    let payload = json!({
        "context": {"daypart": ctx.daypart, "hour": ctx.hour, "weather": {"feels_like": ctx.feels_like, "condition": ctx.condition}},
        "slots": slots_json,
    });

    format!(
        "You pick exactly one place per slot from its candidate list. Never invent a place_id that \
         isn't in that slot's candidates. Keep why_now to at most {WHY_MAX} characters, in Spanish. \
         Respond with JSON only: {{\"picks\":[{{\"slot_id\":str,\"selected_place_id\":str,\"why_now\":str}}]}}.\n\n{payload}"
    )
}

/// Fill every ranked slot, trying the LLM strategy first (if provided) and
/// falling back to [`deterministic_fill`] per-slot on any parse/validation
/// failure. `ranked_slots` is `(slot, options sorted descending by score)`.
pub async fn fill(
    ctx: &SelectorContext,
    ranked_slots: Vec<(Slot, Vec<RankedOption>)>,
    llm: Option<&Arc<dyn LLM + Send + Sync>>,
) -> Vec<FilledSlot> {
    let Some(llm) = llm else {
        return ranked_slots
            .into_iter()
            .map(|(slot, options)| deterministic_fill(ctx, slot, options))
            .collect();
    };

    let prompt = build_fill_prompt(ctx, &ranked_slots);
    let llm_picks = match llm.invoke(&prompt).await {
        Ok(raw) => serde_json::from_str::<LlmFillResponse>(strip_code_fence(&raw)).ok(),
        Err(_) => None,
    };

    let Some(response) = llm_picks else {
        return ranked_slots
            .into_iter()
            .map(|(slot, options)| deterministic_fill(ctx, slot, options))
            .collect();
    };

    ranked_slots
        .into_iter()
        .map(|(slot, options)| {
            let pick = response.picks.iter().find(|p| p.slot_id == slot.slot_id);
            match pick {
                Some(p) if options.iter().any(|o| o.place.place_id == p.selected_place_id) => FilledSlot {
                    slot,
                    why_now: Some(truncate(&p.why_now, WHY_MAX)),
                    selected_place_id: Some(p.selected_place_id.clone()),
                    options,
                },
                _ => deterministic_fill(ctx, slot, options),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{BusinessStatus, OpenConfidence, SlotRole};
    use chrono::Utc;

    fn slot() -> Slot {
        Slot {
            slot_id: "drinks".into(),
            title: "Drinks".into(),
            role: SlotRole::Anchor,
            duration_min: 60,
            categories: vec!["bar".into()],
            constraints: vec![],
            start: Utc::now(),
            end: Utc::now(),
        }
    }

    fn option(place_id: &str, score: f64) -> RankedOption {
        RankedOption {
            place: crate::engine::model::Place {
                place_id: place_id.into(),
                name: "n".into(),
                lat: 0.0,
                lng: 0.0,
                rating: None,
                popularity: None,
                types: vec![],
                category: "bar".into(),
                opening_hours: None,
                business_status: Some(BusinessStatus::Operational),
                photo_reference: None,
                is_indoor: Some(true),
                noise_level: None,
                tourist_density: 0,
                local_favorite: false,
            },
            score,
            distance_m: 0.0,
            open: Some(true),
            open_confidence: OpenConfidence::High,
            open_reason: "open_for_slot".into(),
        }
    }

    #[tokio::test]
    async fn deterministic_picks_top_option() {
        let ctx = SelectorContext { hour: 21, daypart: "evening".into(), feels_like: 15.0, condition: "clear".into() };
        let ranked = vec![(slot(), vec![option("a", 10.0), option("b", 5.0)])];
        let filled = fill(&ctx, ranked, None).await;
        assert_eq!(filled[0].selected_place_id.as_deref(), Some("a"));
        assert!(filled[0].why_now.as_ref().unwrap().len() <= WHY_MAX);
    }

    #[test]
    fn why_now_cold_overrides_rain() {
        assert_eq!(simple_why_now(1.0, "rain", "evening"), "Mejor indoor por fr\u{ed}o");
    }

    #[test]
    fn why_now_rain_before_daypart() {
        assert_eq!(simple_why_now(15.0, "light rain", "late"), "Ideal para cubrirte");
    }

    #[test]
    fn why_now_late_daypart_fallback() {
        assert_eq!(simple_why_now(15.0, "clear", "late"), "Abierto a esta hora");
    }
}
