use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::i18n::Language;
use crate::models::{BiblicalMessage, Reading};

/// Longest observation the provider is asked for.
pub const OBSERVATION_WORD_LIMIT: usize = 80;

/// External generative-text service behind the insights view.
///
/// Implementations report every failure as `Err`; deciding what the user
/// sees instead is the fetcher's job.
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Short, non-diagnostic observation about the given readings.
    async fn observe(&self, summaries: &[ReadingSummary], language: Language) -> Result<String>;

    /// Encouraging verse with its citation.
    async fn verse(&self, language: Language) -> Result<BiblicalMessage>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SummaryValue {
    Single(f64),
    /// `systolic/diastolic`
    Pressure(String),
}

/// Compact form of a reading sent to the provider.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReadingSummary {
    #[serde(rename = "t")]
    pub vital_type: &'static str,
    #[serde(rename = "v")]
    pub value: SummaryValue,
    #[serde(rename = "m")]
    pub mood: &'static str,
    #[serde(rename = "s")]
    pub symptoms: String,
}

impl From<&Reading> for ReadingSummary {
    fn from(reading: &Reading) -> Self {
        let value = if reading.systolic().is_some() {
            SummaryValue::Pressure(reading.display_value())
        } else {
            SummaryValue::Single(reading.value())
        };

        Self {
            vital_type: reading.vital_type().label(),
            value,
            mood: reading.mood().emoji(),
            symptoms: reading.symptoms().join(","),
        }
    }
}

pub fn observation_prompt(summaries: &[ReadingSummary], language: Language) -> Result<String> {
    let payload = serde_json::to_string(summaries)?;
    Ok(format!(
        "Briefly analyse (at most {OBSERVATION_WORD_LIMIT} words), answering in {}: {payload}. \
         Focus on observational trends only. Do not diagnose or suggest a diagnosis.",
        language.display_name()
    ))
}

pub fn verse_prompt(language: Language) -> String {
    format!(
        "Give one short, encouraging Bible verse in {}. Reply with the verse text and its reference.",
        language.display_name()
    )
}
