//! Plan generation task shell (spec.md §6, SPEC_FULL.md §A.7).
//!
//! Grounded on `original_source/plans/tasks.py::generate_plan_task`: load
//! inputs, build providers + optional LLM, run the engine, compute City DNA
//! and a local guide, build legs, persist everything in one transaction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use langchain_rust::language_models::llm::LLM;
use langchain_rust::llm::openai::{OpenAI, OpenAIModel};
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::engine::city_dna::CityDnaService;
use crate::engine::error::EngineError;
use crate::engine::metrics::METRICS;
use crate::engine::model::TravelMode;
use crate::engine::planner::{GenerateContext, GenerateInputs, PlannerEngine};
use crate::engine::providers::cache::Cache;
use crate::engine::providers::directions::GoogleDirectionsProvider;
use crate::engine::providers::google_places::GooglePlacesProvider;
use crate::engine::providers::weather::OpenWeatherProvider;
use crate::engine::providers::{Location, Providers};
use crate::sql_models::leg::LegRow;
use crate::sql_models::plan::PlanStatus;
use crate::sql_models::stop::StopRow;

const MAX_ATTEMPTS: u32 = 3;
const ERROR_CONTEXT_MAX: usize = 2000;

fn build_providers(config: &AppConfig) -> Providers {
    let places: Arc<dyn crate::engine::providers::PlacesProvider> =
        Arc::new(GooglePlacesProvider::new(config.google_maps_api_key.clone()));
    let weather: Arc<dyn crate::engine::providers::WeatherProvider> =
        Arc::new(OpenWeatherProvider::new(config.openweather_api_key.clone()));
    let directions: Arc<dyn crate::engine::providers::DirectionsProvider> =
        Arc::new(GoogleDirectionsProvider::new(config.google_maps_api_key.clone()));
    Providers::new(places, weather, Some(directions), Arc::new(Cache::new()))
}

fn build_llm(config: &AppConfig, use_llm: bool) -> Option<Arc<dyn LLM + Send + Sync>> {
    if !use_llm || config.openai_api_key.is_none() {
        return None;
    }
    Some(Arc::new(OpenAI::default().with_model(OpenAIModel::Gpt4oMini)))
}

fn local_dt(start_time_utc: chrono::DateTime<Utc>, timezone: &str) -> chrono::DateTime<Utc> {
    let tz: Tz = timezone.parse().unwrap_or(chrono_tz::Europe::Berlin);
    let local = start_time_utc.with_timezone(&tz);
    Utc.from_utc_datetime(&local.naive_local())
}

fn recommended_mode(walk_distance_m: f64, constraints: &[String]) -> TravelMode {
    if constraints.iter().any(|c| c == "no_walk") {
        TravelMode::Drive
    } else if walk_distance_m > 0.0 && walk_distance_m <= 1500.0 {
        TravelMode::Walk
    } else {
        TravelMode::Drive
    }
}

fn travel_mode_str(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "walk",
        TravelMode::Bike => "bike",
        TravelMode::Drive => "drive",
    }
}

/// One attempt at building a plan: fetch inputs, run the engine, persist.
/// Returns the engine's error code on failure so the caller can set
/// `last_error_code` without re-parsing anything.
async fn try_generate(pool: &PgPool, plan_id: Uuid, config: &AppConfig) -> Result<(), (String, String)> {
    let row = sqlx::query!(
        "SELECT inputs_json, start_time_utc, end_time_utc FROM plans WHERE id = $1",
        plan_id
    )
    .fetch_one(pool)
    .await
    .map_err(|e| ("Database".to_string(), e.to_string()))?;

    let inputs: Value = row.inputs_json;
    let city = inputs
        .get("city_name")
        .or_else(|| inputs.get("city"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let lat = inputs.pointer("/user_location/lat").and_then(Value::as_f64);
    let lng = inputs.pointer("/user_location/lng").and_then(Value::as_f64);
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(("InvalidInput".to_string(), "inputs_json missing user_location".to_string()));
    };
    let user_location = Location { lat, lng };

    let timezone = inputs.get("timezone").and_then(Value::as_str).unwrap_or("Europe/Berlin");
    let dt_local = local_dt(row.start_time_utc, timezone);

    let use_llm = inputs.get("use_llm").and_then(Value::as_bool).unwrap_or(false);
    let providers = Arc::new(build_providers(config));
    let llm = build_llm(config, use_llm);

    let weather = providers.weather(user_location).await;

    let engine = PlannerEngine::new(providers.clone(), llm.clone());
    let gen_inputs = GenerateInputs {
        city: city.clone(),
        user_location,
        intent: inputs.get("intent").and_then(Value::as_str).unwrap_or("chill").to_string(),
        when_selection: inputs.get("when_selection").and_then(Value::as_str).unwrap_or("now").to_string(),
        discovery_mode: inputs.get("discovery_mode").and_then(Value::as_str).unwrap_or("local").to_string(),
        constraints: inputs
            .get("constraints")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default(),
        energy: inputs.get("energy").and_then(Value::as_i64).unwrap_or(1) as i32,
        duration_hours: inputs.get("duration_hours").and_then(Value::as_f64),
    };
    let context = GenerateContext { dt_local, weather: Some(weather.clone()), start_time: Some(dt_local), end_time: None };

    let result = engine
        .generate(gen_inputs, context)
        .await
        .map_err(|e: EngineError| (e.code().to_string(), e.to_string()))?;

    let constraints: Vec<String> = inputs
        .get("constraints")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    let cache = Arc::new(Cache::new());
    let city_dna_service = CityDnaService::new(llm.clone(), cache);
    let city_dna = city_dna_service.get_city_dna(&city, "es").await;

    let options_by_slot: Vec<(String, Vec<String>)> = result
        .filled_slots
        .iter()
        .map(|f| (f.slot.slot_id.clone(), f.options.iter().map(|o| o.place.name.clone()).collect()))
        .collect();
    let local_guide = city_dna_service
        .build_local_guide(
            &city_dna,
            &inputs.get("intent").and_then(Value::as_str).unwrap_or("chill").to_string(),
            &[],
            &weather.condition,
            weather.feels_like,
            &options_by_slot,
        )
        .await;

    let generation_method = if use_llm { "llm" } else { "fallback" };

    let mut tx = pool.begin().await.map_err(|e| ("Database".to_string(), e.to_string()))?;

    sqlx::query!(
        "UPDATE plans SET status = 'building', last_error_code = NULL, last_error_context = NULL,
         weather_snapshot_json = $2, generation_method = $3,
         llm_attempts = llm_attempts + $4
         WHERE id = $1",
        plan_id,
        serde_json::to_value(&weather).unwrap_or(Value::Null),
        generation_method,
        if use_llm { 1_i32 } else { 0_i32 },
    )
    .execute(&mut *tx)
    .await
    .map_err(|e| ("Database".to_string(), e.to_string()))?;

    sqlx::query!("DELETE FROM stops WHERE plan_id = $1", plan_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ("Database".to_string(), e.to_string()))?;
    sqlx::query!("DELETE FROM legs WHERE plan_id = $1", plan_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ("Database".to_string(), e.to_string()))?;

    let metadata = json!({
        "debug": result.debug,
        "city_dna": city_dna,
        "guide": local_guide,
        "options_by_slot": options_by_slot,
    });
    sqlx::query!(
        "UPDATE plans SET optimization_metadata = $2 WHERE id = $1",
        plan_id,
        metadata
    )
    .execute(&mut *tx)
    .await
    .map_err(|e| ("Database".to_string(), e.to_string()))?;

    let mut stop_ids = Vec::with_capacity(result.stops.len());
    for stop in &result.stops {
        let row = StopRow::from_stop(plan_id, stop);
        sqlx::query!(
            "INSERT INTO stops (id, plan_id, order_index, slot_id, slot_title, slot_role, why_now,
             place_id, name, lat, lng, category, start_time_utc, duration_min,
             open_status_at_planned_time, open_confidence, open_status_reason,
             business_status, opening_hours_json, place_types, rating, popularity, photo_reference)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22,$23)",
            row.id, row.plan_id, row.order_index, row.slot_id, row.slot_title, row.slot_role, row.why_now,
            row.place_id, row.name, row.lat, row.lng, row.category, row.start_time_utc, row.duration_min,
            row.open_status_at_planned_time, row.open_confidence, row.open_status_reason,
            row.business_status, row.opening_hours_json, row.place_types, row.rating, row.popularity,
            row.photo_reference,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| ("Database".to_string(), e.to_string()))?;
        stop_ids.push(row.id);
    }

    for i in 0..stop_ids.len().saturating_sub(1) {
        let a = &result.stops[i];
        let b = &result.stops[i + 1];
        let origin = Location { lat: a.lat, lng: a.lng };
        let dest = Location { lat: b.lat, lng: b.lng };

        let mut modes = serde_json::Map::new();
        let mut walk_distance = 0.0;
        for mode in ["walk", "bike", "drive"] {
            let estimate = providers.leg(origin, dest, mode).await;
            if mode == "walk" {
                walk_distance = estimate.distance_m;
            }
            modes.insert(
                mode.to_string(),
                json!({ "distance_m": estimate.distance_m, "duration_sec": estimate.duration_sec, "polyline": estimate.polyline }),
            );
        }

        let mode = recommended_mode(walk_distance, &constraints);
        let mode_key = travel_mode_str(mode);
        let recommended = modes.get(mode_key).cloned().unwrap_or(json!({ "distance_m": 0, "duration_sec": 0 }));

        let leg = LegRow {
            id: Uuid::new_v4(),
            plan_id,
            from_stop: stop_ids[i],
            to_stop: stop_ids[i + 1],
            modes_json: Value::Object(modes),
            recommended_mode: mode_key.to_string(),
            recommended_duration_sec: recommended.get("duration_sec").and_then(Value::as_i64).unwrap_or(0) as i32,
            recommended_distance_m: recommended.get("distance_m").and_then(Value::as_f64).unwrap_or(0.0) as i32,
            created_at: Utc::now(),
        };

        sqlx::query!(
            "INSERT INTO legs (id, plan_id, from_stop, to_stop, modes_json, recommended_mode,
             recommended_duration_sec, recommended_distance_m, created_at)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)",
            leg.id, leg.plan_id, leg.from_stop, leg.to_stop, leg.modes_json, leg.recommended_mode,
            leg.recommended_duration_sec, leg.recommended_distance_m, leg.created_at,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| ("Database".to_string(), e.to_string()))?;
    }

    sqlx::query!("UPDATE plans SET status = 'ready' WHERE id = $1", plan_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ("Database".to_string(), e.to_string()))?;

    tx.commit().await.map_err(|e| ("Database".to_string(), e.to_string()))?;

    Ok(())
}

/// Up to 3 attempts with exponential backoff (1s, 2s, 4s); a terminal
/// failure marks the plan `failed` with a truncated error context.
pub async fn generate_plan(pool: &PgPool, plan_id: Uuid, config: &AppConfig) {
    let started = Instant::now();
    let mut last_err = ("Internal".to_string(), "unknown error".to_string());

    for attempt in 0..MAX_ATTEMPTS {
        match try_generate(pool, plan_id, config).await {
            Ok(()) => {
                METRICS.record_plan_generated();
                METRICS.add_generation_time_ms(started.elapsed().as_millis() as u64);
                info!(plan_id = %plan_id, "plan generated");
                return;
            }
            Err(e) => {
                warn!(plan_id = %plan_id, attempt, error = %e.1, "plan generation attempt failed");
                last_err = e;
                if attempt + 1 < MAX_ATTEMPTS {
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                }
            }
        }
    }

    METRICS.record_plan_generation_failed();
    error!(plan_id = %plan_id, code = %last_err.0, "plan generation failed terminally");

    let context: String = last_err.1.chars().take(ERROR_CONTEXT_MAX).collect();
    let _ = sqlx::query!(
        "UPDATE plans SET status = 'failed', last_error_code = $2, last_error_context = $3 WHERE id = $1",
        plan_id,
        last_err.0,
        context,
    )
    .execute(pool)
    .await;
}

pub async fn regenerate_plan(pool: &PgPool, plan_id: Uuid, config: &AppConfig) {
    generate_plan(pool, plan_id, config).await;
}

/// Stub per spec.md §9's open question: transitions status only, produces
/// no new schedule until the source defines swap semantics.
pub async fn swap_stop(pool: &PgPool, plan_id: Uuid, _stop_id: Uuid, _reason: &str) -> Result<(), sqlx::Error> {
    sqlx::query!("UPDATE plans SET status = $2 WHERE id = $1", plan_id, PlanStatus::Ready)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delay_replan(pool: &PgPool, plan_id: Uuid, _stop_id: Uuid, _delta_min: i32) -> Result<(), sqlx::Error> {
    sqlx::query!("UPDATE plans SET status = $2 WHERE id = $1", plan_id, PlanStatus::Ready)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn undo_swap(pool: &PgPool, plan_id: Uuid, _stop_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query!("UPDATE plans SET status = $2 WHERE id = $1", plan_id, PlanStatus::Ready)
        .execute(pool)
        .await?;
    Ok(())
}
