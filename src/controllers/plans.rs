/*
 * src/controllers/plans.rs
 *
 * File for Plan Controller API Endpoints
 *
 * Purpose:
 *   Serve plan-generation API requests. A thin adapter: map the request
 *   into `inputs_json`, insert a `draft` row, dispatch `tasks::generate_plan`,
 *   and read the result back out.
 *
 * Include:
 *   api_create_plan  - POST /api/plans     -> create a plan and run the engine
 *   api_get_plan      - GET  /api/plans/:id -> read back plan + stops + legs
 */

use axum::{Extension, Json, Router, extract::Path, routing::{get, post}};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiResult, AppError, PublicError};
use crate::http_models::plan::{CreatePlanRequest, LegResponse, PlanResponse, StopResponse};
use crate::middleware::{AuthUser, auth_middleware};
use crate::sql_models::leg::LegRow;
use crate::sql_models::plan::PlanStatus;
use crate::sql_models::stop::StopRow;
use crate::tasks;

/// Placeholder OpenAPI doc root for this controller's `/api/plans` nest;
/// handlers aren't yet annotated with `#[utoipa::path]`, so this carries no
/// paths of its own.
#[derive(OpenApi)]
#[openapi()]
pub struct PlansApiDoc;

/// Map `when_selection`/`mode` onto a concrete start time and default
/// duration, grounded on `original_source/plans/serializers.py::_map_when_to_time`.
/// `now` is the caller's current local time already converted to UTC.
fn map_when_to_start(now: DateTime<Utc>, when: &str, mode: &str) -> DateTime<Utc> {
    let at_hour = |h: u32, m: u32| -> DateTime<Utc> {
        now.date_naive()
            .and_hms_opt(h, m, 0)
            .and_then(|naive| naive.and_local_timezone(Utc).single())
            .unwrap_or(now)
    };

    match when {
        "now" => now,
        "later_today" => {
            let target = if mode == "today" { at_hour(16, 0) } else { at_hour(17, 0) };
            if target > now { target } else { now }
        }
        "tonight" => {
            let target = if mode == "date" { at_hour(19, 30) } else { at_hour(19, 0) };
            if target > now { target } else { now }
        }
        "tomorrow" => {
            let target_hour = if mode == "today" { 10 } else { 11 };
            let tomorrow = now + ChronoDuration::days(1);
            tomorrow
                .date_naive()
                .and_hms_opt(target_hour, 0, 0)
                .and_then(|naive| naive.and_local_timezone(Utc).single())
                .unwrap_or(tomorrow)
        }
        _ => now,
    }
}

fn default_duration_hours(mode: &str) -> f64 {
    match mode {
        "date" => 5.0,
        "travel" => 8.0,
        _ => 4.0,
    }
}

/// Create and generate a plan.
///
/// # Method
/// `POST /api/plans`
///
/// # Auth
/// Protected by `auth_middleware`, same private cookie as the account routes.
///
/// # Request Body
/// See [`CreatePlanRequest`]. `when_selection`/`mode` pick a default
/// `start_time`/`duration_hours` when not given explicitly.
///
/// # Responses
/// - `201 CREATED` - The generated plan, stops, and legs.
/// - `400 BAD_REQUEST` - Invalid input (e.g. missing `city`).
/// - `500 INTERNAL_SERVER_ERROR` - Internal error (private).
pub async fn api_create_plan(
    Extension(user): Extension<AuthUser>,
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<AppConfig>,
    Json(payload): Json<CreatePlanRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<PlanResponse>)> {
    info!(
        "HANDLER ->> /api/plans 'api_create_plan' - User ID: {}, City: {}",
        user.id, payload.city
    );

    if payload.city.trim().is_empty() {
        return Err(PublicError::BadRequest("city is required".to_string()).into());
    }

    let when = payload.when_selection.clone().unwrap_or_else(|| "now".to_string());
    let mode = payload.mode.clone().unwrap_or_else(|| "today".to_string());
    let now = Utc::now();
    let start_time = map_when_to_start(now, &when, &mode);
    let duration_hours = payload.duration_hours.unwrap_or_else(|| default_duration_hours(&mode));
    let end_time = start_time + ChronoDuration::minutes((duration_hours * 60.0).round() as i64);

    let inputs_json = json!({
        "city_name": payload.city,
        "user_location": { "lat": payload.lat, "lng": payload.lng },
        "intent": payload.intent.clone().unwrap_or_else(|| "chill".to_string()),
        "when_selection": when,
        "mode": mode,
        "discovery_mode": payload.discovery_mode.clone().unwrap_or_else(|| "local".to_string()),
        "constraints": payload.constraints,
        "energy": payload.energy.unwrap_or(1),
        "duration_hours": duration_hours,
        "use_llm": payload.use_llm,
        "timezone": "Europe/Berlin",
    });

    let plan_id = Uuid::new_v4();
    sqlx::query!(
        "INSERT INTO plans (id, account_id, status, inputs_json, start_time_utc, end_time_utc,
         weather_snapshot_json, optimization_metadata, generation_method, llm_attempts)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        plan_id,
        user.id,
        PlanStatus::Draft,
        inputs_json,
        start_time,
        end_time,
        json!({}),
        json!({}),
        "pending",
        0_i32,
    )
    .execute(&pool)
    .await
    .map_err(AppError::from)?;

    tasks::generate_plan(&pool, plan_id, &config).await;

    fetch_plan_response(&pool, plan_id).await
        .map(|resp| (axum::http::StatusCode::CREATED, Json(resp)))
}

/// Read back a plan with its stops and legs.
///
/// # Method
/// `GET /api/plans/:id`
///
/// # Auth
/// Protected by `auth_middleware`.
///
/// # Responses
/// - `200 OK` - The plan, stops, and legs.
/// - `404 NOT_FOUND` - No plan with that id for this account.
pub async fn api_get_plan(
    Extension(_user): Extension<AuthUser>,
    Extension(pool): Extension<PgPool>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<PlanResponse>> {
    fetch_plan_response(&pool, plan_id).await.map(Json)
}

async fn fetch_plan_response(pool: &PgPool, plan_id: Uuid) -> ApiResult<PlanResponse> {
    let plan = sqlx::query!(
        "SELECT id, status as \"status: PlanStatus\", start_time_utc, end_time_utc,
         weather_snapshot_json, optimization_metadata, last_error_code
         FROM plans WHERE id = $1",
        plan_id
    )
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)?
    .ok_or_else(|| PublicError::NotFound("plan not found".to_string()))?;

    let stop_rows = sqlx::query_as!(
        StopRow,
        r#"SELECT id, plan_id, order_index, slot_id, slot_title, slot_role, why_now,
           place_id, name, lat, lng, category, start_time_utc, duration_min,
           open_status_at_planned_time, open_confidence, open_status_reason,
           business_status, opening_hours_json, place_types, rating, popularity, photo_reference
           FROM stops WHERE plan_id = $1 ORDER BY order_index"#,
        plan_id
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::from)?;

    let leg_rows = sqlx::query_as!(
        LegRow,
        r#"SELECT id, plan_id, from_stop, to_stop, modes_json, recommended_mode,
           recommended_duration_sec, recommended_distance_m, created_at
           FROM legs WHERE plan_id = $1"#,
        plan_id
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::from)?;

    let stops = stop_rows
        .into_iter()
        .map(|r| StopResponse {
            order_index: r.order_index,
            slot_id: r.slot_id,
            slot_title: r.slot_title,
            slot_role: r.slot_role,
            why_now: r.why_now,
            place_id: r.place_id,
            name: r.name,
            lat: r.lat,
            lng: r.lng,
            category: r.category,
            start_time_utc: r.start_time_utc,
            duration_min: r.duration_min,
            open_status_at_planned_time: r.open_status_at_planned_time,
            open_confidence: r.open_confidence,
            rating: r.rating,
            popularity: r.popularity,
            photo_reference: r.photo_reference,
        })
        .collect();

    let legs = leg_rows
        .into_iter()
        .map(|r| LegResponse {
            from_stop: r.from_stop,
            to_stop: r.to_stop,
            recommended_mode: r.recommended_mode,
            recommended_duration_sec: r.recommended_duration_sec,
            recommended_distance_m: r.recommended_distance_m,
        })
        .collect();

    let local_guide = plan.optimization_metadata.get("guide").cloned();
    let debug = plan.optimization_metadata.get("debug").cloned().unwrap_or(json!({}));

    Ok(PlanResponse {
        id: plan.id,
        status: format!("{:?}", plan.status).to_lowercase(),
        start_time_utc: plan.start_time_utc,
        end_time_utc: plan.end_time_utc,
        stops,
        legs,
        weather_snapshot: plan.weather_snapshot_json,
        local_guide,
        debug,
        last_error_code: plan.last_error_code,
    })
}

pub fn plan_routes() -> Router {
    Router::new()
        .route("/", post(api_create_plan))
        .route("/{id}", get(api_get_plan))
        .route_layer(axum::middleware::from_fn(auth_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn now_selection_returns_now_unchanged() {
        let now = Utc::now();
        assert_eq!(map_when_to_start(now, "now", "today"), now);
    }

    #[test]
    fn later_today_does_not_move_backwards() {
        let now = Utc::now().date_naive().and_hms_opt(20, 0, 0).unwrap().and_utc();
        // 16:00/17:00 targets are already behind `now` at 20:00, so it stays put.
        assert_eq!(map_when_to_start(now, "later_today", "today"), now);
        assert_eq!(map_when_to_start(now, "later_today", "travel"), now);
    }

    #[test]
    fn later_today_jumps_forward_when_still_ahead() {
        let now = Utc::now().date_naive().and_hms_opt(9, 0, 0).unwrap().and_utc();
        assert_eq!(map_when_to_start(now, "later_today", "today").hour(), 16);
        assert_eq!(map_when_to_start(now, "later_today", "travel").hour(), 17);
    }

    #[test]
    fn tonight_respects_date_mode_half_hour() {
        let now = Utc::now().date_naive().and_hms_opt(9, 0, 0).unwrap().and_utc();
        let date_mode = map_when_to_start(now, "tonight", "date");
        assert_eq!((date_mode.hour(), date_mode.minute()), (19, 30));
        let other_mode = map_when_to_start(now, "tonight", "today");
        assert_eq!((other_mode.hour(), other_mode.minute()), (19, 0));
    }

    #[test]
    fn tomorrow_picks_mode_dependent_hour() {
        let now = Utc::now();
        let today_mode = map_when_to_start(now, "tomorrow", "today");
        assert_eq!(today_mode.hour(), 10);
        assert_eq!(today_mode.date_naive(), (now + ChronoDuration::days(1)).date_naive());

        let travel_mode = map_when_to_start(now, "tomorrow", "travel");
        assert_eq!(travel_mode.hour(), 11);
    }

    #[test]
    fn default_duration_hours_by_mode() {
        assert_eq!(default_duration_hours("today"), 4.0);
        assert_eq!(default_duration_hours("date"), 5.0);
        assert_eq!(default_duration_hours("travel"), 8.0);
        assert_eq!(default_duration_hours("anything_else"), 4.0);
    }
}
