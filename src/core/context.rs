/// Generation context — repeat avoidance and sentence agreement for one run.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::debug;

use crate::core::generator::GenerationError;
use crate::schema::agreement::Agreement;

/// How many recently drawn indices each category remembers.
pub const RECENT_CAPACITY: usize = 4;
/// Random redraws attempted before picking among the admissible indices.
pub const MAX_REDRAWS: usize = 8;
/// Values this short (in characters) are never recorded as used.
pub const MIN_TRACKED_CHARS: usize = 3;

/// Most recently drawn indices, per category, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RecentIndices {
    by_category: FxHashMap<String, VecDeque<usize>>,
}

impl RecentIndices {
    pub fn contains(&self, category: &str, index: usize) -> bool {
        self.by_category
            .get(category)
            .is_some_and(|recent| recent.contains(&index))
    }

    /// Remember `index`, evicting the oldest entry past capacity.
    pub fn record(&mut self, category: &str, index: usize) {
        let recent = self.by_category.entry(category.to_string()).or_default();
        recent.push_back(index);
        while recent.len() > RECENT_CAPACITY {
            recent.pop_front();
        }
    }

    pub fn recent(&self, category: &str) -> Vec<usize> {
        self.by_category
            .get(category)
            .map(|recent| recent.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Slot values already emitted during the run.
#[derive(Debug, Clone, Default)]
pub struct UsedDictionary {
    values: FxHashSet<String>,
}

impl UsedDictionary {
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn insert(&mut self, value: &str) {
        self.values.insert(value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Mutable state of a single `generate` call. A fresh context is created
/// for every top-level call and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub recent: RecentIndices,
    pub used: UsedDictionary,
    /// Agreement set by the protagonists of the current sentence.
    pub agreement: Agreement,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous sentence's agreement.
    pub fn begin_sentence(&mut self) {
        self.agreement = Agreement::default();
    }

    /// Draw an index into a pool of `len` candidates that is not among the
    /// category's recent indices.
    ///
    /// Redraws up to [`MAX_REDRAWS`] times, then picks uniformly among the
    /// admissible indices. A pool no larger than the recency window may have
    /// none left, in which case the last draw is accepted as is.
    pub fn draw_index(
        &mut self,
        category: &str,
        len: usize,
        rng: &mut StdRng,
    ) -> Result<usize, GenerationError> {
        if len == 0 {
            return Err(GenerationError::EmptyPool(category.to_string()));
        }

        let mut index = rng.gen_range(0..len);
        let mut attempts = 1;
        while self.recent.contains(category, index) && attempts < MAX_REDRAWS {
            index = rng.gen_range(0..len);
            attempts += 1;
        }

        if self.recent.contains(category, index) {
            let admissible: Vec<usize> = (0..len)
                .filter(|i| !self.recent.contains(category, *i))
                .collect();
            match admissible.choose(rng) {
                Some(&i) => index = i,
                None => debug!(category, len, "pool exhausted by recency window, repeating"),
            }
        }

        self.recent.record(category, index);
        Ok(index)
    }

    /// Draw a value with [`Self::draw_index`].
    pub fn draw_recent<'v>(
        &mut self,
        category: &str,
        values: &'v [String],
        rng: &mut StdRng,
    ) -> Result<&'v str, GenerationError> {
        let index = self.draw_index(category, values.len(), rng)?;
        Ok(values[index].as_str())
    }

    /// Draw a value that has not been emitted during this run.
    ///
    /// A value is accepted and recorded only when it is unused and longer
    /// than [`MIN_TRACKED_CHARS`]. Otherwise a single fallback draw is
    /// returned as is: it is neither checked nor recorded, so it may repeat.
    pub fn draw_unused<'v>(
        &mut self,
        pool: &str,
        values: &'v [String],
        rng: &mut StdRng,
    ) -> Result<&'v str, GenerationError> {
        let value = values
            .choose(rng)
            .ok_or_else(|| GenerationError::EmptyPool(pool.to_string()))?;

        if value.chars().count() > MIN_TRACKED_CHARS && !self.used.contains(value) {
            self.used.insert(value);
            return Ok(value);
        }

        let fallback = values
            .choose(rng)
            .ok_or_else(|| GenerationError::EmptyPool(pool.to_string()))?;
        debug!(pool, rejected = %value, fallback = %fallback, "value dictionary fallback");
        Ok(fallback)
    }
}
