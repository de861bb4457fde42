use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch, Mutex};

use crate::advisory::{AdvisoryController, AdvisoryFetcher, AdvisoryProvider, AdvisoryState};
use crate::connectivity::ConnectivitySink;
use crate::i18n::{Language, Phrase};
use crate::intake::{pairing::simulate_pairing, DraftEdit, PairingController, RecordDraft};
use crate::models::{BiblicalMessage, Reading, VitalType};
use crate::navigation::View;
use crate::readings::{ChartSeries, DashboardView, ReadingStore};
use crate::settings::SettingsStore;

use super::events::AppEvent;
use super::state::{AppSnapshot, AppState, Intent};

// Set to false to silence dispatch and pairing logs
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const EVENT_BUFFER: usize = 64;

/// Insights view projection: placeholder text while loading, verse only
/// when enabled.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightsView {
    pub observation: String,
    pub observation_loading: bool,
    pub verse: Option<BiblicalMessage>,
    pub verse_loading: bool,
    pub show_biblical_messages: bool,
    pub disclaimer: &'static str,
}

/// Owner of the single [`AppState`]. Every mutation goes through
/// [`AppController::dispatch`], which holds the state lock for the whole
/// reduce-and-react step so effects are issued in intent order.
#[derive(Clone)]
pub struct AppController {
    state: Arc<Mutex<AppState>>,
    advisory: AdvisoryController,
    settings: Arc<SettingsStore>,
    pairing: Arc<Mutex<PairingController>>,
    events: broadcast::Sender<AppEvent>,
}

impl AppController {
    pub fn new(
        provider: Arc<dyn AdvisoryProvider>,
        settings: SettingsStore,
        readings: ReadingStore,
        is_online: bool,
    ) -> Self {
        let state = AppState::new(readings, &settings.get(), is_online);
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Self {
            state: Arc::new(Mutex::new(state)),
            advisory: AdvisoryController::new(AdvisoryFetcher::new(provider)),
            settings: Arc::new(settings),
            pairing: Arc::new(Mutex::new(PairingController::new())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    pub fn subscribe_advisory(&self) -> watch::Receiver<AdvisoryState> {
        self.advisory.subscribe()
    }

    pub async fn dispatch(&self, intent: Intent) -> Result<AppSnapshot> {
        let mut state = self.state.lock().await;
        let effects = state.reduce(intent)?;
        let snapshot = state.snapshot();

        if effects.persist_settings {
            let settings = state.settings();
            if let Err(err) = self.settings.update(|stored| *stored = settings) {
                log_error!("Failed to persist settings: {err:#}");
            }
        }

        if effects.stop_pairing {
            self.pairing.lock().await.stop();
        }

        if let Some((generation, vital_type)) = effects.start_pairing {
            self.spawn_pairing(generation, vital_type).await;
        }

        if let Some(reading) = effects.recorded {
            log_info!(
                "Recorded {} reading {} ({} {})",
                reading.vital_type(),
                reading.id(),
                reading.display_value(),
                reading.unit()
            );
            let _ = self.events.send(AppEvent::ReadingRecorded { reading });
        }

        if effects.changed {
            let _ = self.events.send(AppEvent::StateChanged {
                state: snapshot.clone(),
            });
        }

        if effects.refresh_advisory {
            self.advisory.refresh(state.advisory_inputs()).await;
        }

        Ok(snapshot)
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn navigate(&self, view: View) -> Result<AppSnapshot> {
        self.dispatch(Intent::Navigate { view }).await
    }

    pub async fn add_reading(&self, draft: RecordDraft) -> Result<AppSnapshot> {
        self.dispatch(Intent::AddReading { draft }).await
    }

    pub async fn save_record(&self, draft: RecordDraft) -> Result<AppSnapshot> {
        self.dispatch(Intent::SaveRecord { draft: Some(draft) }).await
    }

    /// Saves the draft being edited on the new-record view.
    pub async fn save_current_record(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::SaveRecord { draft: None }).await
    }

    pub async fn cancel_record(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::CancelRecord).await
    }

    pub async fn edit_draft(&self, edit: DraftEdit) -> Result<AppSnapshot> {
        self.dispatch(Intent::EditDraft { edit }).await
    }

    pub async fn toggle_biblical_messages(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::ToggleBiblicalMessages).await
    }

    pub async fn toggle_connectivity_simulation(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::ToggleConnectivitySimulation).await
    }

    pub async fn toggle_language(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::ToggleLanguage).await
    }

    pub async fn start_pairing(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::BeginPairing).await
    }

    pub async fn cancel_pairing(&self) -> Result<AppSnapshot> {
        self.dispatch(Intent::CancelPairing).await
    }

    /// Re-runs both advisory requests with the current state.
    pub async fn refresh_insights(&self) {
        let state = self.state.lock().await;
        self.advisory.refresh(state.advisory_inputs()).await;
    }

    pub async fn dashboard(&self) -> DashboardView {
        let state = self.state.lock().await;
        DashboardView::build(state.readings(), state.language())
    }

    pub async fn history(&self) -> Vec<Reading> {
        self.state.lock().await.readings().to_vec()
    }

    pub async fn charts(&self) -> ChartSeries {
        ChartSeries::glucose(self.state.lock().await.readings())
    }

    pub async fn insights(&self) -> InsightsView {
        let (language, show_biblical_messages) = {
            let state = self.state.lock().await;
            (state.language(), state.show_biblical_messages())
        };
        let advisory = self.advisory.get_state().await;
        build_insights(&advisory, language, show_biblical_messages)
    }

    pub async fn advisory_state(&self) -> AdvisoryState {
        self.advisory.get_state().await
    }

    async fn spawn_pairing(&self, generation: u64, vital_type: VitalType) {
        let cancel_token = self.pairing.lock().await.begin(generation);
        let controller = self.clone();

        tokio::spawn(async move {
            let (step_tx, mut step_rx) = mpsc::unbounded_channel();
            let simulation = tokio::spawn(simulate_pairing(vital_type, cancel_token, move |step| {
                let _ = step_tx.send(step);
            }));

            while let Some(step) = step_rx.recv().await {
                let language = controller.state.lock().await.language();
                let _ = controller.events.send(AppEvent::PairingStep {
                    step,
                    caption: step.caption().map(|phrase| language.phrase(phrase)),
                });
                controller
                    .apply_pairing(Intent::PairingProgress { generation, step })
                    .await;
            }

            match simulation.await {
                Ok(Some(sample)) => {
                    controller
                        .apply_pairing(Intent::PairingCompleted { generation, sample })
                        .await;
                }
                Ok(None) => {}
                Err(err) => log_error!("pairing simulation task failed: {err}"),
            }

            controller.pairing.lock().await.finish(generation);
        });
    }
}

impl AppController {
    /// Pairing updates only ever touch the draft and the step indicator, so
    /// they skip the rest of [`AppController::dispatch`].
    async fn apply_pairing(&self, intent: Intent) {
        let mut state = self.state.lock().await;
        match state.reduce(intent) {
            Ok(effects) if effects.changed => {
                let _ = self.events.send(AppEvent::StateChanged {
                    state: state.snapshot(),
                });
            }
            Ok(_) => {}
            Err(err) => log_warn!("pairing update not applied: {err:#}"),
        }
    }
}

#[async_trait]
impl ConnectivitySink for AppController {
    async fn set_online(&self, is_online: bool) {
        if let Err(err) = self.dispatch(Intent::SetConnectivity { online: is_online }).await {
            log_error!("Failed to apply connectivity change: {err:#}");
        }
    }
}

fn build_insights(
    advisory: &AdvisoryState,
    language: Language,
    show_biblical_messages: bool,
) -> InsightsView {
    let observation = if advisory.observation_loading {
        language.phrase(Phrase::AnalyzingPatterns).to_string()
    } else {
        advisory.observation.clone().unwrap_or_default()
    };

    InsightsView {
        observation,
        observation_loading: advisory.observation_loading,
        verse: advisory.verse.clone().filter(|_| show_biblical_messages),
        verse_loading: advisory.verse_loading,
        show_biblical_messages,
        disclaimer: language.phrase(Phrase::ObservationalDisclaimer),
    }
}
