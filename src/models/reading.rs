use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Mood, VitalType};

/// A recorded vital-sign measurement. Readings are immutable once created:
/// fields are private and only exposed through accessors.
///
/// For blood pressure `value` holds the diastolic figure and `systolic` the
/// systolic one; every other type has no systolic value.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    id: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    vital_type: VitalType,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    systolic: Option<f64>,
    unit: String,
    mood_emoji: Mood,
    symptoms: Vec<String>,
    is_syncing: bool,
}

impl Reading {
    pub fn new(
        vital_type: VitalType,
        value: f64,
        systolic: Option<f64>,
        mood: Mood,
        symptoms: Vec<String>,
        is_syncing: bool,
    ) -> Self {
        Self::recorded_at(Utc::now(), vital_type, value, systolic, mood, symptoms, is_syncing)
    }

    /// Same as [`Reading::new`] with an explicit creation instant.
    pub fn recorded_at(
        timestamp: DateTime<Utc>,
        vital_type: VitalType,
        value: f64,
        systolic: Option<f64>,
        mood: Mood,
        symptoms: Vec<String>,
        is_syncing: bool,
    ) -> Self {
        let systolic = if vital_type.has_systolic() {
            Some(systolic.unwrap_or(0.0))
        } else {
            None
        };

        let mut unique_symptoms: Vec<String> = Vec::with_capacity(symptoms.len());
        for symptom in symptoms {
            if !unique_symptoms.contains(&symptom) {
                unique_symptoms.push(symptom);
            }
        }

        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            vital_type,
            value,
            systolic,
            unit: vital_type.unit().to_string(),
            mood_emoji: mood,
            symptoms: unique_symptoms,
            is_syncing,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn vital_type(&self) -> VitalType {
        self.vital_type
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn systolic(&self) -> Option<f64> {
        self.systolic
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn mood(&self) -> Mood {
        self.mood_emoji
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    /// `systolic/diastolic` for blood pressure, the bare value otherwise.
    pub fn display_value(&self) -> String {
        match self.systolic {
            Some(systolic) => format!("{}/{}", systolic, self.value),
            None => format!("{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn systolic_dropped_for_non_pressure_types() {
        let reading = Reading::new(VitalType::HeartRate, 72.0, Some(120.0), Mood::Happy, vec![], true);
        assert_eq!(reading.systolic(), None);
        assert_eq!(reading.unit(), "BPM");
        assert_eq!(reading.display_value(), "72");
    }

    #[test]
    fn pressure_always_carries_systolic() {
        let reading = Reading::new(VitalType::BloodPressure, 80.0, None, Mood::Happy, vec![], false);
        assert_eq!(reading.systolic(), Some(0.0));

        let reading = Reading::new(VitalType::BloodPressure, 80.0, Some(120.0), Mood::Happy, vec![], false);
        assert_eq!(reading.display_value(), "120/80");
    }

    #[test]
    fn symptoms_are_deduplicated_in_order() {
        let reading = Reading::new(
            VitalType::Glucose,
            105.0,
            None,
            Mood::Happy,
            vec!["Fadiga".into(), "Dor".into(), "Fadiga".into()],
            false,
        );
        assert_eq!(reading.symptoms(), ["Fadiga".to_string(), "Dor".to_string()]);
    }

    #[test]
    fn ids_are_unique() {
        let a = Reading::new(VitalType::Glucose, 1.0, None, Mood::Happy, vec![], false);
        let b = Reading::new(VitalType::Glucose, 1.0, None, Mood::Happy, vec![], false);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serializes_with_type_and_unit() {
        let reading = Reading::new(VitalType::Temperature, 36.6, None, Mood::Feverish, vec![], true);
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["type"], "temperature");
        assert_eq!(json["unit"], "°C");
        assert_eq!(json["moodEmoji"], "🤒");
        assert_eq!(json["isSyncing"], true);
        assert!(json.get("systolic").is_none());
    }
}
