use crate::core::error::Result;
use crate::core::plan::ScaleConfig;
use crate::core::tiers::{TierSchedule, generate_scale_tiers};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

type ScheduleKey = (ScaleConfig, u32);

/// Memoizes generated schedules by `(config, tier_count)`.
///
/// Generation is pure, so a cached schedule is indistinguishable from a fresh
/// one. Failed generations are not stored.
#[derive(Clone, Default)]
pub struct ScheduleCache {
    inner: Arc<Mutex<HashMap<ScheduleKey, Arc<TierSchedule>>>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, config: &ScaleConfig, tier_count: u32) -> Option<Arc<TierSchedule>> {
        let cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let value = cache.get(&(*config, tier_count)).cloned();
        if value.is_some() {
            debug!("Schedule cache HIT");
        } else {
            debug!("Schedule cache MISS");
        }
        value
    }

    pub fn get_or_generate(
        &self,
        config: &ScaleConfig,
        tier_count: u32,
    ) -> Result<Arc<TierSchedule>> {
        if let Some(schedule) = self.get(config, tier_count) {
            return Ok(schedule);
        }

        let schedule = Arc::new(generate_scale_tiers(config, tier_count)?);
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Schedule cache PUT");
        // A concurrent caller may have generated the same schedule already.
        let stored = cache
            .entry((*config, tier_count))
            .or_insert_with(|| Arc::clone(&schedule));
        Ok(Arc::clone(stored))
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
