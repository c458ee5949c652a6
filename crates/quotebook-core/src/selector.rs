//! Random quote selection
//!
//! Picks a quote uniformly at random from the filtered collection and
//! remembers it in the session store so it can be shown again on startup.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Filter, Quote};
use crate::storage::{KeyValueStore, LAST_VIEWED_KEY};
use crate::store::QuoteStore;

/// Outcome of a pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// A quote was selected
    Quote(Quote),
    /// Nothing matches the filter
    NoQuotesAvailable,
}

impl Pick {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Pick::Quote(quote) => Some(quote),
            Pick::NoQuotesAvailable => None,
        }
    }
}

/// Random quote picker backed by the session store
pub struct Selector {
    session: Arc<dyn KeyValueStore>,
}

impl Selector {
    pub fn new(session: Arc<dyn KeyValueStore>) -> Self {
        Self { session }
    }

    /// Pick a random quote matching `filter` using the thread-local RNG
    pub fn pick(&self, quotes: &QuoteStore, filter: &Filter) -> Result<Pick> {
        self.pick_with(quotes, filter, &mut rand::thread_rng())
    }

    /// Pick a random quote matching `filter` using `rng`
    ///
    /// Every matching quote is equally likely. The chosen quote is recorded
    /// as the last viewed quote.
    pub fn pick_with<R: Rng>(
        &self,
        quotes: &QuoteStore,
        filter: &Filter,
        rng: &mut R,
    ) -> Result<Pick> {
        let candidates: Vec<&Quote> = quotes
            .quotes()
            .iter()
            .filter(|q| filter.matches(q))
            .collect();

        if candidates.is_empty() {
            debug!("No quotes match filter '{}'", filter);
            return Ok(Pick::NoQuotesAvailable);
        }

        let quote = candidates[rng.gen_range(0..candidates.len())].clone();
        self.record_last_viewed(&quote)?;
        Ok(Pick::Quote(quote))
    }

    /// Overwrite the last viewed quote
    pub fn record_last_viewed(&self, quote: &Quote) -> Result<()> {
        let json = serde_json::to_string(quote)?;
        self.session.set(LAST_VIEWED_KEY, &json)?;
        Ok(())
    }

    /// The last viewed quote of this session, if one was recorded
    pub fn restore_last_viewed(&self) -> Option<Quote> {
        let raw = match self.session.get(LAST_VIEWED_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read last viewed quote: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("Ignoring invalid last viewed quote: {}", e);
                None
            }
        }
    }
}
