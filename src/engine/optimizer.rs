//! Nearest-neighbor stop ordering (spec §4.6, §9).
//!
//! Geographic scale is 1-3 km with N <= 7, so planar squared-distance
//! nearest-neighbor is the whole algorithm — no 2-opt, no Haversine. Loop
//! structure mirrors the teacher's `agent/tools/tsp.rs::nearest_neighbor_path`.

use crate::engine::model::Stop;

fn dist2(a: &Stop, b: &Stop) -> f64 {
    let dx = a.lat - b.lat;
    let dy = a.lng - b.lng;
    dx * dx + dy * dy
}

/// Reorders `stops` starting from `stops[0]`, repeatedly picking the
/// unvisited stop with minimal squared-distance to the last-placed one.
/// `order_index` is reassigned densely afterward.
pub fn nearest_neighbor(mut stops: Vec<Stop>) -> Vec<Stop> {
    if stops.len() <= 2 {
        for (i, s) in stops.iter_mut().enumerate() {
            s.order_index = i as i32;
        }
        return stops;
    }

    let mut remaining = stops.split_off(1);
    let mut ordered = stops;
    while !remaining.is_empty() {
        let last = ordered.last().unwrap();
        let (best_idx, _) = remaining
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| dist2(last, a).partial_cmp(&dist2(last, b)).unwrap())
            .unwrap();
        ordered.push(remaining.remove(best_idx));
    }

    for (i, s) in ordered.iter_mut().enumerate() {
        s.order_index = i as i32;
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{OpenConfidence, SlotRole};
    use chrono::Utc;

    fn stop(lat: f64, lng: f64) -> Stop {
        Stop {
            order_index: 0,
            slot_id: "s".into(),
            slot_title: "t".into(),
            slot_role: SlotRole::Anchor,
            why_now: "x".into(),
            place_id: format!("{lat},{lng}"),
            name: "n".into(),
            lat,
            lng,
            category: "bar".into(),
            start: Utc::now(),
            duration_min: 60,
            open_status_at_planned_time: Some(true),
            open_confidence: OpenConfidence::High,
            open_status_reason: "open_for_slot".into(),
            opening_hours: None,
            place_types: vec![],
            business_status: None,
            rating: None,
            popularity: None,
            photo_reference: None,
        }
    }

    #[test]
    fn orders_deterministically() {
        let stops = vec![stop(0.0, 0.0), stop(0.0, 3.0), stop(0.0, 1.0), stop(0.0, 2.0)];
        let ordered = nearest_neighbor(stops);
        let lngs: Vec<f64> = ordered.iter().map(|s| s.lng).collect();
        assert_eq!(lngs, vec![0.0, 1.0, 2.0, 3.0]);
        let idxs: Vec<i32> = ordered.iter().map(|s| s.order_index).collect();
        assert_eq!(idxs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn is_a_fixed_point() {
        let stops = vec![stop(0.0, 0.0), stop(0.0, 3.0), stop(0.0, 1.0), stop(0.0, 2.0)];
        let once = nearest_neighbor(stops);
        let twice = nearest_neighbor(once.clone());
        let ids_once: Vec<&str> = once.iter().map(|s| s.place_id.as_str()).collect();
        let ids_twice: Vec<&str> = twice.iter().map(|s| s.place_id.as_str()).collect();
        assert_eq!(ids_once, ids_twice);
    }
}
