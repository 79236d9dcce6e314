//! Deterministic scorer (spec §4.4). Pure function, no I/O.

use crate::engine::model::{OpenConfidence, OpenStatus, Place};
use crate::engine::temporal::suitability;

/// `score_place_for_slot`. `discovery_mode == "mixed"` is treated as
/// equivalent to `"tourist"` (flat +2) per spec.md §9's suggested
/// resolution for the source's unhandled third mode.
pub fn score_place_for_slot(
    place: &Place,
    slot_categories: &[String],
    daypart: &str,
    discovery_mode: &str,
    constraints: &[String],
    open_status: &OpenStatus,
    distance_m: Option<f64>,
) -> f64 {
    if open_status.is_open == Some(false) {
        return -10_000.0;
    }

    let mut score = 0.0;
    if open_status.is_open == Some(true) {
        score += 15.0;
        if open_status.confidence == OpenConfidence::Medium {
            score -= 5.0;
        }
    } else {
        score -= 3.0;
    }

    let category = place.category.trim();
    if slot_categories.iter().any(|c| c == category) {
        score += 30.0;
    } else {
        score += 5.0;
    }

    if !category.is_empty() && !suitability(category, daypart) {
        score -= 25.0;
    }

    let rating = place.rating.unwrap_or(0.0) as f64;
    let reviews = place.popularity.unwrap_or(0) as f64;
    score += rating.min(5.0) * 6.0;
    score += (reviews / 500.0).min(6.0) * 1.2;

    if discovery_mode == "local" {
        if place.tourist_density >= 2 {
            score -= 10.0;
        }
        if place.local_favorite {
            score += 8.0;
        }
    } else {
        score += 2.0;
    }

    if constraints.iter().any(|c| c == "indoor_only") && place.is_indoor == Some(false) {
        score -= 50.0;
    }
    if constraints.iter().any(|c| c == "quiet") {
        let noise = place.noise_level.unwrap_or(1);
        score -= (noise - 2).max(0) as f64 * 4.0;
    }
    if constraints.iter().any(|c| c == "no_walk") {
        if let Some(d) = distance_m {
            score -= (d / 200.0).min(15.0);
        }
    }

    if let Some(d) = distance_m {
        score -= (d / 300.0).min(10.0);
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::BusinessStatus;

    fn place() -> Place {
        Place {
            place_id: "p".into(),
            name: "n".into(),
            lat: 0.0,
            lng: 0.0,
            rating: Some(4.5),
            popularity: Some(200),
            types: vec![],
            category: "bar".into(),
            opening_hours: None,
            business_status: Some(BusinessStatus::Operational),
            photo_reference: None,
            is_indoor: Some(true),
            noise_level: Some(2),
            tourist_density: 0,
            local_favorite: false,
        }
    }

    fn status(open: Option<bool>) -> OpenStatus {
        OpenStatus { is_open: open, confidence: OpenConfidence::High, reason: "x".into() }
    }

    #[test]
    fn closed_is_hard_rejected() {
        let s = score_place_for_slot(&place(), &["bar".into()], "evening", "local", &[], &status(Some(false)), None);
        assert!(s <= -9000.0);
    }

    #[test]
    fn indoor_only_penalty_at_least_50() {
        let mut p = place();
        p.is_indoor = Some(false);
        let with_penalty = score_place_for_slot(&p, &["bar".into()], "evening", "local", &["indoor_only".into()], &status(Some(true)), None);
        let without = score_place_for_slot(&p, &["bar".into()], "evening", "local", &[], &status(Some(true)), None);
        assert!(without - with_penalty >= 50.0);
    }

    #[test]
    fn category_match_bonus_at_least_25() {
        let p = place();
        let matched = score_place_for_slot(&p, &["bar".into()], "evening", "local", &[], &status(Some(true)), None);
        let unmatched = score_place_for_slot(&p, &["museum".into()], "evening", "local", &[], &status(Some(true)), None);
        assert!(matched - unmatched >= 25.0);
    }

    #[test]
    fn mixed_mode_behaves_like_tourist() {
        let p = place();
        let mixed = score_place_for_slot(&p, &["bar".into()], "evening", "mixed", &[], &status(Some(true)), None);
        let tourist = score_place_for_slot(&p, &["bar".into()], "evening", "tourist", &[], &status(Some(true)), None);
        assert_eq!(mixed, tourist);
    }
}
