//! Daypart, weather profile, category suitability, and opening-hours
//! evaluation (spec §4.2).

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::engine::model::{
    BusinessStatus, Confidence, OpenConfidence, OpenStatus, OpeningHours, Place, WeatherProfile,
    WeatherSnapshot,
};

/// Partition the local hour into named dayparts.
pub fn daypart(local: &DateTime<Utc>) -> &'static str {
    match local.hour() {
        6..=10 => "morning",
        11..=14 => "midday",
        15..=17 => "afternoon",
        18..=21 => "evening",
        _ => "late",
    }
}

pub fn weather_profile(snapshot: &WeatherSnapshot) -> WeatherProfile {
    let cold = snapshot.feels_like <= 8.0;
    let very_cold = snapshot.feels_like <= 2.0;
    let rain = snapshot.is_raining || snapshot.condition.contains("rain");
    let snow = snapshot.is_snowing || snapshot.condition.contains("snow");
    let windy = snapshot.condition.contains("wind");
    let pleasant = (10.0..=22.0).contains(&snapshot.feels_like) && !rain && !snow && !windy;
    WeatherProfile {
        cold,
        very_cold,
        rain,
        snow,
        windy,
        pleasant,
        confidence: snapshot.confidence,
    }
}

/// Categories with a daypart allow-list; categories absent here are always
/// suitable. Grounded verbatim on `time_rules.py::CATEGORY_DAYPART_ALLOWED`.
static CATEGORY_DAYPART_ALLOWED: Lazy<HashMap<&'static str, HashSet<&'static str>>> =
    Lazy::new(|| {
        let mut m: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        let set = |items: &[&'static str]| items.iter().copied().collect::<HashSet<_>>();
        for cat in ["bar", "cocktail_bar", "wine_bar", "hotel_bar"] {
            m.insert(cat, set(&["evening", "late"]));
        }
        m.insert("nightclub", set(&["late"]));
        m.insert("museum", set(&["morning", "midday", "afternoon"]));
        for cat in ["shopping_area", "boutique", "concept_store", "vintage"] {
            m.insert(cat, set(&["morning", "midday", "afternoon", "evening"]));
        }
        for cat in ["market", "bakery"] {
            m.insert(cat, set(&["morning", "midday", "afternoon"]));
        }
        m.insert("cafe", set(&["morning", "midday", "afternoon", "evening"]));
        m.insert("dessert", set(&["afternoon", "evening", "late"]));
        m.insert("late_food", set(&["late"]));
        m.insert("fast_food", set(&["midday", "afternoon", "evening", "late"]));
        m.insert("cinema", set(&["evening", "late", "afternoon"]));
        for cat in ["theater", "jazz_bar", "cultural_bar"] {
            m.insert(cat, set(&["evening", "late"]));
        }
        for cat in ["photo_spot", "viewpoint", "street_art"] {
            m.insert(cat, set(&["morning", "midday", "afternoon", "evening"]));
        }
        m
    });

pub fn suitability(category: &str, daypart: &str) -> bool {
    match CATEGORY_DAYPART_ALLOWED.get(category) {
        Some(allowed) => allowed.contains(daypart),
        None => true,
    }
}

/// Google's `day` convention: 0 = Sunday .. 6 = Saturday. `chrono`'s
/// `weekday()` is Monday = 0 .. Sunday = 6, so the conversion is `(w+1)%7`.
fn google_weekday(dt: &DateTime<Utc>) -> u32 {
    (dt.weekday().num_days_from_monday() + 1) % 7
}

fn at_day_time(reference: &DateTime<Utc>, day: u8, hhmm: u16) -> DateTime<Utc> {
    let ref_day = google_weekday(reference);
    let mut delta = i64::from(day) - i64::from(ref_day);
    if delta < 0 {
        delta += 7;
    }
    let hour = hhmm / 100;
    let minute = hhmm % 100;
    let base = reference.date_naive() + Duration::days(delta);
    let naive = base
        .and_hms_opt(u32::from(hour), u32::from(minute), 0)
        .expect("valid HHMM");
    Utc.from_utc_datetime(&naive)
}

/// Evaluate whether `place` is open across `[start, start+duration_min]`.
pub fn open_status(place: &Place, start: DateTime<Utc>, duration_min: i64) -> OpenStatus {
    match place.business_status {
        Some(BusinessStatus::ClosedPermanently) => {
            return OpenStatus {
                is_open: Some(false),
                confidence: OpenConfidence::High,
                reason: "permanently_closed".into(),
            };
        }
        Some(BusinessStatus::ClosedTemporarily) => {
            return OpenStatus {
                is_open: Some(false),
                confidence: OpenConfidence::High,
                reason: "temporarily_closed".into(),
            };
        }
        _ => {}
    }

    let hours: &OpeningHours = match &place.opening_hours {
        Some(h) if !h.periods.is_empty() => h,
        _ => {
            return OpenStatus {
                is_open: None,
                confidence: OpenConfidence::Low,
                reason: "hours_missing".into(),
            };
        }
    };

    let end = start + Duration::minutes(duration_min);
    // Consider the period anchored the week before and the week containing
    // `start` so an overnight period from the prior day is not missed.
    for week_offset in [-7i64, 0] {
        let anchor = start + Duration::days(week_offset);
        for period in &hours.periods {
            let open_dt = at_day_time(&anchor, period.open.day, period.open.time_hhmm);
            let mut close_dt = at_day_time(&anchor, period.close.day, period.close.time_hhmm);
            if close_dt <= open_dt {
                close_dt += Duration::days(1);
            }
            if open_dt <= start && end <= close_dt {
                return OpenStatus {
                    is_open: Some(true),
                    confidence: OpenConfidence::High,
                    reason: "open_for_slot".into(),
                };
            }
            if open_dt <= start && start < close_dt {
                return OpenStatus {
                    is_open: Some(true),
                    confidence: OpenConfidence::Medium,
                    reason: "open_but_closing_during_slot".into(),
                };
            }
        }
    }

    OpenStatus {
        is_open: Some(false),
        confidence: OpenConfidence::High,
        reason: "closed_for_slot".into(),
    }
}

pub fn seasonal_fallback(now: &DateTime<Utc>) -> WeatherSnapshot {
    let month = now.month();
    let (temp, condition) = match month {
        12 | 1 | 2 => (8.0, "cloudy"),
        3..=5 => (15.0, "partly cloudy"),
        6..=8 => (25.0, "clear"),
        _ => (12.0, "cloudy"),
    };
    WeatherSnapshot {
        temp,
        feels_like: temp,
        condition: condition.into(),
        is_raining: false,
        is_snowing: false,
        confidence: Confidence::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{DayTime, OpeningPeriod};

    fn snapshot(feels: f64, condition: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            temp: feels,
            feels_like: feels,
            condition: condition.into(),
            is_raining: condition.contains("rain"),
            is_snowing: condition.contains("snow"),
            confidence: Confidence::High,
        }
    }

    #[test]
    fn daypart_bands() {
        assert_eq!(daypart(&Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()), "morning");
        assert_eq!(daypart(&Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()), "midday");
        assert_eq!(daypart(&Utc.with_ymd_and_hms(2026, 1, 1, 16, 0, 0).unwrap()), "afternoon");
        assert_eq!(daypart(&Utc.with_ymd_and_hms(2026, 1, 1, 20, 0, 0).unwrap()), "evening");
        assert_eq!(daypart(&Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap()), "late");
        assert_eq!(daypart(&Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap()), "late");
    }

    #[test]
    fn profile_very_cold_rain() {
        let p = weather_profile(&snapshot(1.0, "rain"));
        assert!(p.very_cold);
        assert!(p.cold);
        assert!(p.rain);
        assert!(!p.pleasant);
    }

    fn place_with_period(open_day: u8, open_t: u16, close_day: u8, close_t: u16) -> Place {
        Place {
            place_id: "p1".into(),
            name: "Test".into(),
            lat: 0.0,
            lng: 0.0,
            rating: None,
            popularity: None,
            types: vec![],
            category: "bar".into(),
            opening_hours: Some(OpeningHours {
                periods: vec![OpeningPeriod {
                    open: DayTime { day: open_day, time_hhmm: open_t },
                    close: DayTime { day: close_day, time_hhmm: close_t },
                }],
                weekday_text: vec![],
            }),
            business_status: Some(BusinessStatus::Operational),
            photo_reference: None,
            is_indoor: Some(true),
            noise_level: None,
            tourist_density: 0,
            local_favorite: false,
        }
    }

    #[test]
    fn open_for_slot() {
        // Thursday 2026-01-01 is a Thursday -> google weekday 4.
        let day = 4u8;
        let place = place_with_period(day, 900, day, 1700);
        let start = at_day_time(&Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), day, 1000);
        let status = open_status(&place, start, 60);
        assert_eq!(status.is_open, Some(true));
        assert_eq!(status.reason, "open_for_slot");
    }

    #[test]
    fn closing_during_slot() {
        let day = 4u8;
        let place = place_with_period(day, 900, day, 1700);
        let start = at_day_time(&Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), day, 1630);
        let status = open_status(&place, start, 60);
        assert_eq!(status.is_open, Some(true));
        assert_eq!(status.reason, "open_but_closing_during_slot");
    }

    #[test]
    fn overnight_crossing() {
        let day = 4u8;
        let place = place_with_period(day, 2200, (day + 1) % 7, 200);
        let start = at_day_time(&Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), day, 2300);
        let status = open_status(&place, start, 60);
        assert_eq!(status.is_open, Some(true));
        assert_eq!(status.reason, "open_for_slot");
    }

    #[test]
    fn missing_hours() {
        let mut place = place_with_period(4, 900, 4, 1700);
        place.opening_hours = None;
        let status = open_status(&place, Utc::now(), 60);
        assert_eq!(status.is_open, None);
        assert_eq!(status.reason, "hours_missing");
    }

    #[test]
    fn permanently_closed_overrides_periods() {
        let mut place = place_with_period(4, 900, 4, 1700);
        place.business_status = Some(BusinessStatus::ClosedPermanently);
        let start = at_day_time(&Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), 4, 1000);
        let status = open_status(&place, start, 60);
        assert_eq!(status.is_open, Some(false));
        assert_eq!(status.reason, "permanently_closed");
    }
}
