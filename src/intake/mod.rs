mod draft;
pub mod pairing;

use anyhow::Result;

use crate::i18n::Language;
use crate::models::Reading;
use crate::navigation::{View, ViewNavigator};
use crate::readings::ReadingStore;

pub use draft::{DraftEdit, RecordDraft};
pub use pairing::{DeviceSample, PairingController, PairingStep};

/// Turns a draft into a stored reading and returns to the dashboard.
///
/// Nothing is mutated when the draft cannot be submitted.
pub fn submit(
    draft: RecordDraft,
    is_online: bool,
    language: Language,
    store: &mut ReadingStore,
    navigator: &mut ViewNavigator,
) -> Result<Reading> {
    let reading = draft.into_reading(is_online, language)?;
    store.append(reading.clone())?;
    navigator.navigate(View::Dashboard);
    Ok(reading)
}
