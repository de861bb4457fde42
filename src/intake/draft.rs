use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::models::{Mood, Reading, VitalType};

use super::pairing::DeviceSample;

/// Reading under construction on the new-record view. Values are kept as
/// the raw text the user typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(rename = "type")]
    pub vital_type: VitalType,
    pub value: String,
    pub systolic: String,
    pub mood_emoji: Mood,
    pub symptoms: Vec<String>,
}

/// Single edit applied to the draft held by the app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DraftEdit {
    #[serde(rename_all = "camelCase")]
    SetType { vital_type: VitalType },
    SetValue { value: String },
    SetSystolic { systolic: String },
    SetMood { mood: Mood },
    ToggleSymptom { symptom: String },
}

impl RecordDraft {
    pub fn new(vital_type: VitalType) -> Self {
        Self {
            vital_type,
            ..Self::default()
        }
    }

    /// Submission is only offered once a primary value was typed. No range
    /// or plausibility check is made on the number itself.
    pub fn can_submit(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Adds the tag if absent, removes it otherwise. Returns whether the tag
    /// is selected afterwards.
    pub fn toggle_symptom(&mut self, symptom: &str, language: Language) -> Result<bool> {
        if !language.symptom_vocabulary().contains(&symptom) {
            bail!("'{symptom}' is not a {} symptom tag", language.as_str());
        }

        if let Some(index) = self.symptoms.iter().position(|s| s == symptom) {
            self.symptoms.remove(index);
            Ok(false)
        } else {
            self.symptoms.push(symptom.to_string());
            Ok(true)
        }
    }

    pub fn apply(&mut self, edit: DraftEdit, language: Language) -> Result<()> {
        match edit {
            DraftEdit::SetType { vital_type } => self.vital_type = vital_type,
            DraftEdit::SetValue { value } => self.value = value,
            DraftEdit::SetSystolic { systolic } => self.systolic = systolic,
            DraftEdit::SetMood { mood } => self.mood_emoji = mood,
            DraftEdit::ToggleSymptom { symptom } => {
                self.toggle_symptom(&symptom, language)?;
            }
        }
        Ok(())
    }

    /// Copies a simulated device sample into the value fields. Samples taken
    /// for another vital type are ignored.
    pub fn apply_sample(&mut self, sample: &DeviceSample) -> bool {
        if sample.vital_type != self.vital_type {
            return false;
        }
        self.value = sample.value.to_string();
        if let Some(systolic) = sample.systolic {
            self.systolic = systolic.to_string();
        }
        true
    }

    /// Rewrites the selected tags into `to`'s vocabulary. Both vocabularies
    /// list the same symptoms in the same order; unknown tags are dropped.
    pub fn translate_symptoms(&mut self, from: Language, to: Language) {
        let source = from.symptom_vocabulary();
        let target = to.symptom_vocabulary();
        self.symptoms = self
            .symptoms
            .iter()
            .filter_map(|tag| source.iter().position(|known| *known == tag.as_str()))
            .filter_map(|index| target.get(index))
            .map(|tag| tag.to_string())
            .collect();
    }

    /// Builds the immutable reading. Unit, id and timestamp are derived here;
    /// `is_syncing` mirrors connectivity at this instant. Every symptom must
    /// come from `language`'s vocabulary.
    pub fn into_reading(self, is_online: bool, language: Language) -> Result<Reading> {
        if !self.can_submit() {
            bail!("a value is required before saving a record");
        }
        let vocabulary = language.symptom_vocabulary();
        if let Some(unknown) = self
            .symptoms
            .iter()
            .find(|tag| !vocabulary.contains(&tag.as_str()))
        {
            bail!("'{unknown}' is not a {} symptom tag", language.as_str());
        }

        let systolic = self
            .vital_type
            .has_systolic()
            .then(|| parse_number(&self.systolic));

        Ok(Reading::new(
            self.vital_type,
            parse_number(&self.value),
            systolic,
            self.mood_emoji,
            self.symptoms,
            is_online,
        ))
    }
}

/// Non-numeric input reads as zero.
fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
