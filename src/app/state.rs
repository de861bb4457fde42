use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::advisory::AdvisoryInputs;
use crate::i18n::Language;
use crate::intake::{self, DeviceSample, DraftEdit, PairingStep, RecordDraft};
use crate::models::{Reading, VitalType};
use crate::navigation::{View, ViewNavigator};
use crate::readings::ReadingStore;
use crate::settings::UserSettings;

/// The only ways app state changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    Navigate {
        view: View,
    },
    /// Records a draft directly, from any view.
    AddReading {
        draft: RecordDraft,
    },
    /// Save exit of the new-record view. Without a draft the one being
    /// edited is saved.
    SaveRecord {
        draft: Option<RecordDraft>,
    },
    CancelRecord,
    EditDraft {
        edit: DraftEdit,
    },
    ToggleBiblicalMessages,
    /// Flips the online flag by hand, for trying the offline experience.
    ToggleConnectivitySimulation,
    ToggleLanguage,
    SetConnectivity {
        online: bool,
    },
    BeginPairing,
    CancelPairing,
    PairingProgress {
        generation: u64,
        step: PairingStep,
    },
    PairingCompleted {
        generation: u64,
        sample: DeviceSample,
    },
}

/// Side effects the controller runs after an intent was applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub refresh_advisory: bool,
    pub persist_settings: bool,
    pub stop_pairing: bool,
    pub start_pairing: Option<(u64, VitalType)>,
    pub recorded: Option<Reading>,
    /// Something observable changed.
    pub changed: bool,
}

impl Effects {
    fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    fn refresh() -> Self {
        Self {
            refresh_advisory: true,
            changed: true,
            ..Self::default()
        }
    }
}

/// Process-wide application state. Mutated only through [`AppState::reduce`].
#[derive(Debug, Clone)]
pub struct AppState {
    is_online: bool,
    is_synced: bool,
    readings: ReadingStore,
    show_biblical_messages: bool,
    navigator: ViewNavigator,
    language: Language,
    draft: Option<RecordDraft>,
    pairing_step: PairingStep,
    pairing_generation: u64,
}

/// Serializable copy of [`AppState`] handed to views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub is_online: bool,
    pub is_synced: bool,
    pub readings: Vec<Reading>,
    pub show_biblical_messages: bool,
    pub current_view: View,
    pub language: Language,
    pub draft: Option<RecordDraft>,
    pub can_submit: bool,
    pub pairing_step: PairingStep,
}

impl AppState {
    pub fn new(readings: ReadingStore, settings: &UserSettings, is_online: bool) -> Self {
        Self {
            is_online,
            is_synced: true,
            readings,
            show_biblical_messages: settings.show_biblical_messages,
            navigator: ViewNavigator::new(),
            language: settings.language,
            draft: None,
            pairing_step: PairingStep::Idle,
            pairing_generation: 0,
        }
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn readings(&self) -> &ReadingStore {
        &self.readings
    }

    pub fn current_view(&self) -> View {
        self.navigator.current()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn show_biblical_messages(&self) -> bool {
        self.show_biblical_messages
    }

    pub fn draft(&self) -> Option<&RecordDraft> {
        self.draft.as_ref()
    }

    pub fn settings(&self) -> UserSettings {
        UserSettings {
            language: self.language,
            show_biblical_messages: self.show_biblical_messages,
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            is_online: self.is_online,
            is_synced: self.is_synced,
            readings: self.readings.to_vec(),
            show_biblical_messages: self.show_biblical_messages,
            current_view: self.navigator.current(),
            language: self.language,
            can_submit: self.draft.as_ref().map(RecordDraft::can_submit).unwrap_or(false),
            draft: self.draft.clone(),
            pairing_step: self.pairing_step,
        }
    }

    pub fn advisory_inputs(&self) -> AdvisoryInputs {
        AdvisoryInputs {
            readings: self.readings.to_vec(),
            is_online: self.is_online,
            show_biblical_messages: self.show_biblical_messages,
            language: self.language,
        }
    }

    /// Applies one intent. On `Err` the state is left untouched.
    pub fn reduce(&mut self, intent: Intent) -> Result<Effects> {
        match intent {
            Intent::Navigate { view } => Ok(self.navigate(view)),
            Intent::AddReading { draft } => self.record(draft),
            Intent::SaveRecord { draft } => {
                let draft = match draft {
                    Some(draft) => draft,
                    None => self
                        .draft
                        .clone()
                        .ok_or_else(|| anyhow!("no record is being edited"))?,
                };
                if !draft.can_submit() {
                    bail!("a value is required before saving a record");
                }
                let draft = self.navigator.save(draft)?;
                self.record(draft)
            }
            Intent::CancelRecord => {
                self.navigator.cancel()?;
                let mut effects = self.close_draft();
                effects.changed = true;
                Ok(effects)
            }
            Intent::EditDraft { edit } => {
                let language = self.language;
                let draft = self
                    .draft
                    .as_mut()
                    .ok_or_else(|| anyhow!("no record is being edited"))?;
                let mut edited = draft.clone();
                edited.apply(edit, language)?;
                *draft = edited;
                Ok(Effects::changed())
            }
            Intent::ToggleBiblicalMessages => {
                self.show_biblical_messages = !self.show_biblical_messages;
                Ok(Effects {
                    persist_settings: true,
                    ..Effects::refresh()
                })
            }
            Intent::ToggleConnectivitySimulation => {
                self.is_online = !self.is_online;
                Ok(Effects::refresh())
            }
            Intent::ToggleLanguage => {
                let previous = self.language;
                self.language = previous.toggle();
                if let Some(draft) = self.draft.as_mut() {
                    draft.translate_symptoms(previous, self.language);
                }
                Ok(Effects {
                    persist_settings: true,
                    ..Effects::refresh()
                })
            }
            Intent::SetConnectivity { online } => {
                if self.is_online == online {
                    return Ok(Effects::default());
                }
                self.is_online = online;
                Ok(Effects::refresh())
            }
            Intent::BeginPairing => {
                let vital_type = self
                    .draft
                    .as_ref()
                    .map(|draft| draft.vital_type)
                    .ok_or_else(|| anyhow!("pairing needs an open record"))?;
                self.pairing_generation += 1;
                self.pairing_step = PairingStep::Idle;
                Ok(Effects {
                    start_pairing: Some((self.pairing_generation, vital_type)),
                    ..Effects::changed()
                })
            }
            Intent::CancelPairing => {
                self.pairing_generation += 1;
                self.pairing_step = PairingStep::Idle;
                Ok(Effects {
                    stop_pairing: true,
                    ..Effects::changed()
                })
            }
            Intent::PairingProgress { generation, step } => {
                if generation != self.pairing_generation || self.pairing_step == step {
                    return Ok(Effects::default());
                }
                self.pairing_step = step;
                Ok(Effects::changed())
            }
            Intent::PairingCompleted { generation, sample } => {
                if generation != self.pairing_generation {
                    return Ok(Effects::default());
                }
                self.pairing_step = PairingStep::Idle;
                if let Some(draft) = self.draft.as_mut() {
                    draft.apply_sample(&sample);
                }
                Ok(Effects::changed())
            }
        }
    }

    fn navigate(&mut self, view: View) -> Effects {
        let previous = self.navigator.navigate(view);
        let mut effects = Effects::changed();

        if previous == View::NewRecord && view != View::NewRecord {
            effects = Effects {
                changed: true,
                ..self.close_draft()
            };
        } else if view == View::NewRecord && previous != View::NewRecord {
            self.draft = Some(RecordDraft::default());
        }
        effects
    }

    fn record(&mut self, draft: RecordDraft) -> Result<Effects> {
        let reading = intake::submit(
            draft,
            self.is_online,
            self.language,
            &mut self.readings,
            &mut self.navigator,
        )?;

        // a draft only exists while the new-record view is open
        let mut effects = if self.draft.is_some() {
            self.close_draft()
        } else {
            Effects::default()
        };
        effects.refresh_advisory = true;
        effects.changed = true;
        effects.recorded = Some(reading);
        Ok(effects)
    }

    /// Drops the open draft and any pairing run feeding it.
    fn close_draft(&mut self) -> Effects {
        self.draft = None;
        self.pairing_generation += 1;
        self.pairing_step = PairingStep::Idle;
        Effects {
            stop_pairing: true,
            ..Effects::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;

    fn state() -> AppState {
        AppState::new(ReadingStore::new(), &UserSettings::default(), true)
    }

    fn draft(vital_type: VitalType, value: &str) -> RecordDraft {
        RecordDraft {
            vital_type,
            value: value.into(),
            ..RecordDraft::default()
        }
    }

    #[test]
    fn initial_state() {
        let state = state();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.current_view, View::Dashboard);
        assert_eq!(snapshot.language, Language::Pt);
        assert!(snapshot.is_online && snapshot.is_synced && snapshot.show_biblical_messages);
        assert!(snapshot.readings.is_empty());
        assert!(snapshot.draft.is_none());
    }

    #[test]
    fn save_glucose_record_from_new_record_view() {
        let mut state = state();
        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();
        assert!(state.draft().is_some());

        let effects = state
            .reduce(Intent::SaveRecord {
                draft: Some(draft(VitalType::Glucose, "105")),
            })
            .unwrap();

        assert!(effects.refresh_advisory && effects.stop_pairing);
        let reading = effects.recorded.unwrap();
        assert_eq!(reading.unit(), "mg/dL");
        assert_eq!(reading.systolic(), None);
        assert_eq!(reading.mood(), Mood::Happy);
        assert!(reading.is_syncing());

        assert_eq!(state.current_view(), View::Dashboard);
        assert!(state.draft().is_none());
        assert_eq!(state.readings().all().next().map(Reading::id), Some(reading.id()));
    }

    #[test]
    fn saving_an_empty_draft_changes_nothing() {
        let mut state = state();
        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();

        assert!(state.reduce(Intent::SaveRecord { draft: None }).is_err());
        assert_eq!(state.current_view(), View::NewRecord);
        assert!(state.draft().is_some());
        assert!(state.readings().is_empty());
    }

    #[test]
    fn cancel_returns_to_dashboard_without_recording() {
        let mut state = state();
        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();
        state
            .reduce(Intent::EditDraft {
                edit: DraftEdit::SetValue { value: "99".into() },
            })
            .unwrap();

        let effects = state.reduce(Intent::CancelRecord).unwrap();
        assert!(!effects.refresh_advisory);
        assert!(effects.recorded.is_none());
        assert_eq!(state.current_view(), View::Dashboard);
        assert!(state.readings().is_empty());
        assert!(state.draft().is_none());
    }

    #[test]
    fn offline_readings_are_not_syncing() {
        let mut state = state();
        state.reduce(Intent::SetConnectivity { online: false }).unwrap();
        let effects = state
            .reduce(Intent::AddReading {
                draft: draft(VitalType::HeartRate, "70"),
            })
            .unwrap();
        assert!(!effects.recorded.unwrap().is_syncing());
    }

    #[test]
    fn unchanged_connectivity_has_no_effects() {
        let mut state = state();
        assert_eq!(
            state.reduce(Intent::SetConnectivity { online: true }).unwrap(),
            Effects::default()
        );
        assert!(state.reduce(Intent::SetConnectivity { online: false }).unwrap().refresh_advisory);
    }

    #[test]
    fn toggles_refresh_and_persist() {
        let mut state = state();
        let effects = state.reduce(Intent::ToggleLanguage).unwrap();
        assert!(effects.refresh_advisory && effects.persist_settings);
        assert_eq!(state.language(), Language::En);

        let effects = state.reduce(Intent::ToggleBiblicalMessages).unwrap();
        assert!(effects.persist_settings);
        assert!(!state.show_biblical_messages());

        let effects = state.reduce(Intent::ToggleConnectivitySimulation).unwrap();
        assert!(effects.refresh_advisory && !effects.persist_settings);
        assert!(!state.is_online());
    }

    #[test]
    fn edits_use_active_language_vocabulary() {
        let mut state = state();
        assert!(state
            .reduce(Intent::EditDraft {
                edit: DraftEdit::SetValue { value: "1".into() }
            })
            .is_err());

        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();
        let toggle = |symptom: &str| Intent::EditDraft {
            edit: DraftEdit::ToggleSymptom {
                symptom: symptom.into(),
            },
        };
        assert!(state.reduce(toggle("Headache")).is_err());
        state.reduce(toggle("Tontura")).unwrap();
        assert_eq!(state.draft().unwrap().symptoms, vec!["Tontura".to_string()]);
    }

    #[test]
    fn added_reading_with_unknown_symptom_is_rejected() {
        let mut state = state();
        let draft = RecordDraft {
            value: "100".into(),
            symptoms: vec!["Cholesterol".into(), String::new()],
            ..RecordDraft::default()
        };

        assert!(state.reduce(Intent::AddReading { draft }).is_err());
        assert!(state.readings().is_empty());
    }

    #[test]
    fn language_toggle_translates_open_draft_symptoms() {
        let mut state = state();
        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();
        let toggle = |symptom: &str| Intent::EditDraft {
            edit: DraftEdit::ToggleSymptom {
                symptom: symptom.into(),
            },
        };
        state.reduce(toggle("Fadiga")).unwrap();

        state.reduce(Intent::ToggleLanguage).unwrap();
        assert_eq!(state.draft().unwrap().symptoms, vec!["Fatigue".to_string()]);

        state.reduce(toggle("Fatigue")).unwrap();
        assert!(state.draft().unwrap().symptoms.is_empty());

        state.reduce(toggle("Nausea")).unwrap();
        state
            .reduce(Intent::EditDraft {
                edit: DraftEdit::SetValue { value: "98".into() },
            })
            .unwrap();
        let reading = state
            .reduce(Intent::SaveRecord { draft: None })
            .unwrap()
            .recorded
            .unwrap();
        assert_eq!(reading.symptoms(), ["Nausea".to_string()]);
    }

    #[test]
    fn stale_pairing_results_are_ignored() {
        let mut state = state();
        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();

        let effects = state.reduce(Intent::BeginPairing).unwrap();
        let (generation, vital_type) = effects.start_pairing.unwrap();
        assert_eq!(vital_type, VitalType::Glucose);

        state.reduce(Intent::CancelPairing).unwrap();
        state
            .reduce(Intent::PairingCompleted {
                generation,
                sample: DeviceSample::canned(VitalType::Glucose),
            })
            .unwrap();
        assert!(state.draft().unwrap().value.is_empty());

        let (generation, _) = state.reduce(Intent::BeginPairing).unwrap().start_pairing.unwrap();
        state
            .reduce(Intent::PairingProgress {
                generation,
                step: PairingStep::Found,
            })
            .unwrap();
        assert_eq!(state.snapshot().pairing_step, PairingStep::Found);

        state
            .reduce(Intent::PairingCompleted {
                generation,
                sample: DeviceSample::canned(VitalType::Glucose),
            })
            .unwrap();
        assert_eq!(state.draft().unwrap().value, "108");
        assert_eq!(state.snapshot().pairing_step, PairingStep::Idle);
        assert!(state.snapshot().can_submit);
    }

    #[test]
    fn leaving_new_record_drops_draft_and_stops_pairing() {
        let mut state = state();
        state.reduce(Intent::Navigate { view: View::NewRecord }).unwrap();
        state.reduce(Intent::BeginPairing).unwrap();

        let effects = state.reduce(Intent::Navigate { view: View::History }).unwrap();
        assert!(effects.stop_pairing);
        assert!(state.draft().is_none());
        assert!(state.reduce(Intent::BeginPairing).is_err());
    }
}
