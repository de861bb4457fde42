use serde::Serialize;

use crate::advisory::AdvisoryState;
use crate::intake::PairingStep;
use crate::models::Reading;

use super::state::AppSnapshot;

/// Notifications pushed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AppEvent {
    #[serde(rename = "app-state-changed")]
    StateChanged { state: AppSnapshot },
    ReadingRecorded { reading: Reading },
    PairingStep {
        step: PairingStep,
        caption: Option<&'static str>,
    },
    #[serde(rename = "advisory-changed")]
    AdvisoryChanged { advisory: AdvisoryState },
}
