use std::sync::Arc;

use crate::i18n::{Language, Phrase};
use crate::models::{BiblicalMessage, Reading};

use super::provider::{AdvisoryProvider, ReadingSummary};

// Set to true to log every absorbed provider failure
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Most recent readings summarized for an observation request.
pub const OBSERVATION_WINDOW: usize = 10;

/// Fetches advisory content and absorbs every provider failure into a fixed,
/// language-appropriate fallback. Callers always get a usable value.
pub struct AdvisoryFetcher {
    provider: Arc<dyn AdvisoryProvider>,
}

impl AdvisoryFetcher {
    pub fn new(provider: Arc<dyn AdvisoryProvider>) -> Self {
        Self { provider }
    }

    /// Observation over the newest readings (`readings` is most-recent-first).
    /// With no readings the provider is not called.
    pub async fn fetch_observation(&self, readings: &[Reading], language: Language) -> String {
        if readings.is_empty() {
            return language.phrase(Phrase::AddDataForAnalysis).to_string();
        }

        let summaries: Vec<ReadingSummary> = readings
            .iter()
            .take(OBSERVATION_WINDOW)
            .map(ReadingSummary::from)
            .collect();

        match self.provider.observe(&summaries, language).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                log_warn!("advisory provider returned an empty observation");
                unavailable(language)
            }
            Err(err) => {
                log_warn!("observation request failed: {err:#}");
                unavailable(language)
            }
        }
    }

    /// Offline returns the built-in verse without any network attempt.
    /// Online failures return the fixed fallback verse for `language`.
    pub async fn fetch_verse(&self, is_online: bool, language: Language) -> BiblicalMessage {
        if !is_online {
            return language.offline_verse();
        }

        match self.provider.verse(language).await {
            Ok(message) if message.is_complete() => message,
            Ok(_) => {
                log_warn!("advisory provider returned an incomplete verse");
                language.fallback_verse()
            }
            Err(err) => {
                log_warn!("verse request failed: {err:#}");
                language.fallback_verse()
            }
        }
    }
}

pub fn unavailable(language: Language) -> String {
    language.phrase(Phrase::InsightsUnavailable).to_string()
}
