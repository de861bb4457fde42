#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use glucatrack_lib::advisory::{AdvisoryProvider, ReadingSummary};
use glucatrack_lib::app::AppController;
use glucatrack_lib::i18n::Language;
use glucatrack_lib::models::{BiblicalMessage, Mood, Reading, VitalType};
use glucatrack_lib::readings::ReadingStore;
use glucatrack_lib::settings::{SettingsStore, UserSettings};

/// Provider whose answers, failures and latencies are set by the test.
#[derive(Default)]
pub struct ScriptedProvider {
    pub observe_calls: AtomicUsize,
    pub verse_calls: AtomicUsize,
    pub fail_observe: AtomicBool,
    pub empty_observe: AtomicBool,
    pub panic_observe: AtomicBool,
    pub fail_verse: AtomicBool,
    pub incomplete_verse: AtomicBool,
    observe_delays: Mutex<VecDeque<Duration>>,
    verse_delays: Mutex<VecDeque<Duration>>,
    last_summaries: Mutex<Vec<ReadingSummary>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Latency of the next observation calls, in call order.
    pub fn delay_observations(&self, delays: &[u64]) {
        self.observe_delays
            .lock()
            .unwrap()
            .extend(delays.iter().map(|ms| Duration::from_millis(*ms)));
    }

    pub fn delay_verses(&self, delays: &[u64]) {
        self.verse_delays
            .lock()
            .unwrap()
            .extend(delays.iter().map(|ms| Duration::from_millis(*ms)));
    }

    pub fn observe_calls(&self) -> usize {
        self.observe_calls.load(Ordering::SeqCst)
    }

    pub fn verse_calls(&self) -> usize {
        self.verse_calls.load(Ordering::SeqCst)
    }

    pub fn last_summaries(&self) -> Vec<ReadingSummary> {
        self.last_summaries.lock().unwrap().clone()
    }

    pub fn observation_text(count: usize, language: Language) -> String {
        format!("{count} readings observed ({})", language.as_str())
    }

    pub fn verse_for(language: Language) -> BiblicalMessage {
        BiblicalMessage::new(format!("Be still ({})", language.as_str()), "Psalm 46:10")
    }
}

#[async_trait]
impl AdvisoryProvider for ScriptedProvider {
    async fn observe(&self, summaries: &[ReadingSummary], language: Language) -> Result<String> {
        self.observe_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_summaries.lock().unwrap() = summaries.to_vec();

        let delay = self.observe_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.panic_observe.load(Ordering::SeqCst) {
            panic!("scripted provider panic");
        }
        if self.fail_observe.load(Ordering::SeqCst) {
            bail!("scripted network failure");
        }
        if self.empty_observe.load(Ordering::SeqCst) {
            return Ok("   ".to_string());
        }
        Ok(Self::observation_text(summaries.len(), language))
    }

    async fn verse(&self, language: Language) -> Result<BiblicalMessage> {
        self.verse_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.verse_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_verse.load(Ordering::SeqCst) {
            bail!("scripted parse failure");
        }
        if self.incomplete_verse.load(Ordering::SeqCst) {
            return Ok(BiblicalMessage::new("Be still.", ""));
        }
        Ok(Self::verse_for(language))
    }
}

pub fn reading(vital_type: VitalType, value: f64) -> Reading {
    Reading::new(vital_type, value, None, Mood::Happy, Vec::new(), true)
}

pub fn controller(provider: Arc<ScriptedProvider>) -> AppController {
    AppController::new(
        provider,
        SettingsStore::in_memory(UserSettings::default()),
        ReadingStore::new(),
        true,
    )
}
