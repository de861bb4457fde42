use std::sync::Arc;

use log::debug;
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::i18n::Language;
use crate::models::{BiblicalMessage, Reading};

use super::fetcher::{unavailable, AdvisoryFetcher};

// Set to false to silence refresh and discard logs
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// What the insights view shows. Each half carries its own loading flag and
/// generation; a response is applied only if its generation is still the
/// latest, so a slow earlier request never overwrites a newer one.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryState {
    pub observation: Option<String>,
    pub observation_loading: bool,
    pub verse: Option<BiblicalMessage>,
    pub verse_loading: bool,
    pub language: Language,
    #[serde(skip)]
    observation_generation: u64,
    #[serde(skip)]
    verse_generation: u64,
}

impl AdvisoryState {
    pub fn is_loading(&self) -> bool {
        self.observation_loading || self.verse_loading
    }
}

/// Everything a refresh depends on, captured at trigger time.
#[derive(Debug, Clone)]
pub struct AdvisoryInputs {
    pub readings: Vec<Reading>,
    pub is_online: bool,
    pub show_biblical_messages: bool,
    pub language: Language,
}

#[derive(Clone)]
pub struct AdvisoryController {
    fetcher: Arc<AdvisoryFetcher>,
    state: Arc<Mutex<AdvisoryState>>,
    updates: Arc<watch::Sender<AdvisoryState>>,
}

impl AdvisoryController {
    pub fn new(fetcher: AdvisoryFetcher) -> Self {
        let (updates, _) = watch::channel(AdvisoryState::default());
        Self {
            fetcher: Arc::new(fetcher),
            state: Arc::new(Mutex::new(AdvisoryState::default())),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AdvisoryState> {
        self.updates.subscribe()
    }

    pub async fn get_state(&self) -> AdvisoryState {
        self.state.lock().await.clone()
    }

    /// Starts a fresh observation request and, when enabled, a verse request.
    /// Both run independently; whatever is still in flight from an earlier
    /// refresh keeps running but its result is discarded.
    pub async fn refresh(&self, inputs: AdvisoryInputs) {
        let (observation_generation, verse_generation) = {
            let mut state = self.state.lock().await;
            state.language = inputs.language;

            state.observation_generation += 1;
            state.observation_loading = true;

            state.verse_generation += 1;
            if inputs.show_biblical_messages {
                state.verse_loading = true;
            } else {
                state.verse = None;
                state.verse_loading = false;
            }

            self.publish(&state);
            (
                state.observation_generation,
                inputs
                    .show_biblical_messages
                    .then_some(state.verse_generation),
            )
        };

        debug!(
            "advisory refresh: observation #{observation_generation}, verse {:?}, online={}",
            verse_generation, inputs.is_online
        );

        self.spawn_observation(observation_generation, &inputs);
        if let Some(generation) = verse_generation {
            self.spawn_verse(generation, inputs.is_online, inputs.language);
        }
    }

    fn spawn_observation(&self, generation: u64, inputs: &AdvisoryInputs) {
        let controller = self.clone();
        let fetcher = self.fetcher.clone();
        let readings = inputs.readings.clone();
        let language = inputs.language;
        let is_online = inputs.is_online;

        tokio::spawn(async move {
            // Offline there is nothing to ask; an empty store still gets the
            // add-data hint.
            let request = tokio::spawn(async move {
                if is_online || readings.is_empty() {
                    fetcher.fetch_observation(&readings, language).await
                } else {
                    unavailable(language)
                }
            });

            let text = request.await.unwrap_or_else(|err| {
                log_error!("observation task failed: {err}");
                unavailable(language)
            });
            controller.apply_observation(generation, text).await;
        });
    }

    fn spawn_verse(&self, generation: u64, is_online: bool, language: Language) {
        let controller = self.clone();
        let fetcher = self.fetcher.clone();

        tokio::spawn(async move {
            let request =
                tokio::spawn(async move { fetcher.fetch_verse(is_online, language).await });

            let verse = request.await.unwrap_or_else(|err| {
                log_error!("verse task failed: {err}");
                language.fallback_verse()
            });
            controller.apply_verse(generation, verse).await;
        });
    }

    async fn apply_observation(&self, generation: u64, text: String) -> bool {
        let mut state = self.state.lock().await;
        if state.observation_generation != generation {
            debug!(
                "discarding observation #{generation}; #{} is current",
                state.observation_generation
            );
            return false;
        }

        state.observation = Some(text);
        state.observation_loading = false;
        self.publish(&state);
        log_info!("observation #{generation} applied");
        true
    }

    async fn apply_verse(&self, generation: u64, verse: BiblicalMessage) -> bool {
        let mut state = self.state.lock().await;
        if state.verse_generation != generation {
            debug!(
                "discarding verse #{generation}; #{} is current",
                state.verse_generation
            );
            return false;
        }

        state.verse = Some(verse);
        state.verse_loading = false;
        self.publish(&state);
        log_info!("verse #{generation} applied");
        true
    }

    fn publish(&self, state: &AdvisoryState) {
        self.updates.send_replace(state.clone());
    }
}
