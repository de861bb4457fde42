//! Timed simulation of pairing with a measuring device. Nothing here talks
//! to hardware: after a fixed sequence of steps a canned sample is produced.

use log::info;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;

use crate::i18n::Phrase;
use crate::models::VitalType;

const SCANNING_FOR: Duration = Duration::from_millis(2_000);
const FOUND_FOR: Duration = Duration::from_millis(1_500);
const PAIRING_FOR: Duration = Duration::from_millis(1_500);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PairingStep {
    #[default]
    Idle,
    Scanning,
    Found,
    Pairing,
}

impl PairingStep {
    pub fn next(self) -> PairingStep {
        match self {
            PairingStep::Idle => PairingStep::Scanning,
            PairingStep::Scanning => PairingStep::Found,
            PairingStep::Found => PairingStep::Pairing,
            PairingStep::Pairing => PairingStep::Idle,
        }
    }

    /// How long the step is shown before advancing. Idle does not advance
    /// on its own.
    pub fn dwell(self) -> Option<Duration> {
        match self {
            PairingStep::Idle => None,
            PairingStep::Scanning => Some(SCANNING_FOR),
            PairingStep::Found => Some(FOUND_FOR),
            PairingStep::Pairing => Some(PAIRING_FOR),
        }
    }

    pub fn caption(self) -> Option<Phrase> {
        match self {
            PairingStep::Idle => None,
            PairingStep::Scanning => Some(Phrase::ScanningBluetooth),
            PairingStep::Found => Some(Phrase::DeviceFound),
            PairingStep::Pairing => Some(Phrase::Pairing),
        }
    }
}

/// Values "received" from the simulated device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSample {
    pub vital_type: VitalType,
    pub value: f64,
    pub systolic: Option<f64>,
}

impl DeviceSample {
    pub fn canned(vital_type: VitalType) -> Self {
        let (value, systolic) = match vital_type {
            VitalType::Glucose => (108.0, None),
            VitalType::BloodPressure => (75.0, Some(115.0)),
            VitalType::HeartRate => (72.0, None),
            VitalType::Oxygen => (98.0, None),
            VitalType::Temperature => (36.6, None),
        };
        Self {
            vital_type,
            value,
            systolic,
        }
    }
}

/// Runs idle → scanning → found → pairing → idle, reporting every step.
/// Returns `None` if cancelled before the sequence completes; the last
/// reported step is always `Idle`.
pub async fn simulate_pairing<F>(
    vital_type: VitalType,
    cancel_token: CancellationToken,
    mut on_step: F,
) -> Option<DeviceSample>
where
    F: FnMut(PairingStep),
{
    let mut step = PairingStep::Idle.next();
    on_step(step);

    while let Some(dwell) = step.dwell() {
        tokio::select! {
            _ = time::sleep(dwell) => {
                step = step.next();
                on_step(step);
            }
            _ = cancel_token.cancelled() => {
                info!("pairing simulation cancelled during {:?}", step);
                on_step(PairingStep::Idle);
                return None;
            }
        }
    }

    Some(DeviceSample::canned(vital_type))
}

/// Owns the running simulation, if any. Starting again cancels the
/// previous run.
#[derive(Debug, Default)]
pub struct PairingController {
    active: Option<(u64, CancellationToken)>,
}

impl PairingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for run `generation`, cancelling whatever was running before.
    pub fn begin(&mut self, generation: u64) -> CancellationToken {
        self.stop();
        let token = CancellationToken::new();
        self.active = Some((generation, token.clone()));
        token
    }

    pub fn stop(&mut self) {
        if let Some((_, token)) = self.active.take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Called when run `generation` ended on its own. A newer run is left alone.
    pub fn finish(&mut self, generation: u64) {
        if matches!(self.active, Some((current, _)) if current == generation) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<PairingStep>>>, impl FnMut(PairingStep)) {
        let steps = Arc::new(Mutex::new(Vec::new()));
        let sink = steps.clone();
        (steps, move |step| sink.lock().unwrap().push(step))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_full_sequence_and_yields_canned_values() {
        let (steps, on_step) = recorder();
        let started = time::Instant::now();

        let sample = simulate_pairing(VitalType::BloodPressure, CancellationToken::new(), on_step).await;

        assert_eq!(started.elapsed(), Duration::from_millis(5_000));
        assert_eq!(
            *steps.lock().unwrap(),
            vec![
                PairingStep::Scanning,
                PairingStep::Found,
                PairingStep::Pairing,
                PairingStep::Idle
            ]
        );
        assert_eq!(
            sample,
            Some(DeviceSample {
                vital_type: VitalType::BloodPressure,
                value: 75.0,
                systolic: Some(115.0)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_returns_to_idle_without_sample() {
        let (steps, on_step) = recorder();
        let token = CancellationToken::new();
        let task = tokio::spawn(simulate_pairing(VitalType::Glucose, token.clone(), on_step));

        time::sleep(Duration::from_millis(2_500)).await;
        token.cancel();

        assert_eq!(task.await.unwrap(), None);
        assert_eq!(
            *steps.lock().unwrap(),
            vec![PairingStep::Scanning, PairingStep::Found, PairingStep::Idle]
        );
    }

    #[test]
    fn controller_cancels_previous_run() {
        let mut controller = PairingController::new();
        let first = controller.begin(1);
        let second = controller.begin(2);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        controller.finish(1);
        assert!(controller.is_running());

        controller.finish(2);
        assert!(!controller.is_running());
        assert!(!second.is_cancelled());

        let third = controller.begin(3);
        controller.stop();
        assert!(third.is_cancelled());
        assert!(!controller.is_running());
    }

    #[test]
    fn canned_glucose_value() {
        assert_eq!(DeviceSample::canned(VitalType::Glucose).value, 108.0);
        assert_eq!(DeviceSample::canned(VitalType::Glucose).systolic, None);
    }
}
