use std::sync::Arc;

use dashmap::DashMap;

use crate::analytics::aggregator::EnrichedResult;

/// Latest enriched result per ticker.
///
/// Entries are replaced wholesale, never merged: a re-submitted ticker's
/// fresh result fully displaces the old one, so a stale valuation or
/// forensic draw can never be served alongside new data.
#[derive(Clone, Default)]
pub struct ResultStore {
    results: Arc<DashMap<String, Arc<EnrichedResult>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            results: Arc::new(DashMap::new()),
        }
    }

    pub fn replace(&self, result: Arc<EnrichedResult>) {
        self.results
            .insert(result.ticker().to_string(), result);
    }

    pub fn latest(&self, ticker: &str) -> Option<Arc<EnrichedResult>> {
        self.results.get(ticker).map(|entry| entry.value().clone())
    }

    pub fn tickers(&self) -> Vec<String> {
        self.results.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&self) {
        self.results.clear();
    }
}
