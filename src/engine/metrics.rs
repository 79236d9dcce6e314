//! Process-wide plan-generation counters (SPEC_FULL.md §A.5).
//!
//! `places_api_calls`/`places_api_failures`/`weather_api_calls` live in the
//! shared `Cache` as `metrics:<name>` counters (`engine/providers/mod.rs`
//! already increments them there). The three plan-level counters below have
//! no natural home in the provider cache — they're set by the task shell
//! around one whole `PlannerEngine::generate` call — so they get their own
//! `once_cell::sync::Lazy` static of `AtomicU64` fields, the same idiom the
//! teacher uses for its single shared Google Maps client in
//! `agent/tools/research.rs`, applied here to counters instead of a client.

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;

#[derive(Default)]
pub struct Metrics {
    pub plan_generation_count: AtomicU64,
    pub plan_generation_failures: AtomicU64,
    pub plan_generation_time_ms: AtomicU64,
}

pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::default);

impl Metrics {
    pub fn record_plan_generated(&self) {
        self.plan_generation_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_plan_generation_failed(&self) {
        self.plan_generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_generation_time_ms(&self, millis: u64) {
        self.plan_generation_time_ms.fetch_add(millis, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plan_generation_count: self.plan_generation_count.load(Ordering::Relaxed),
            plan_generation_failures: self.plan_generation_failures.load(Ordering::Relaxed),
            plan_generation_time_ms: self.plan_generation_time_ms.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    pub plan_generation_count: u64,
    pub plan_generation_failures: u64,
    pub plan_generation_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_accumulate() {
        let m = Metrics::default();
        assert_eq!(m.snapshot().plan_generation_count, 0);
        m.record_plan_generated();
        m.record_plan_generated();
        m.record_plan_generation_failed();
        m.add_generation_time_ms(120);
        let snap = m.snapshot();
        assert_eq!(snap.plan_generation_count, 2);
        assert_eq!(snap.plan_generation_failures, 1);
        assert_eq!(snap.plan_generation_time_ms, 120);
    }
}
