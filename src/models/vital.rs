use serde::{Deserialize, Serialize};

/// Closed set of vital-sign kinds a reading can record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum VitalType {
    #[default]
    Glucose,
    BloodPressure,
    HeartRate,
    Oxygen,
    Temperature,
}

impl VitalType {
    pub const ALL: [VitalType; 5] = [
        VitalType::Glucose,
        VitalType::BloodPressure,
        VitalType::HeartRate,
        VitalType::Oxygen,
        VitalType::Temperature,
    ];

    /// Canonical unit for readings of this type. A reading's unit is always
    /// derived from here and never taken from caller input.
    pub fn unit(&self) -> &'static str {
        match self {
            VitalType::Glucose => "mg/dL",
            VitalType::BloodPressure => "mmHg",
            VitalType::HeartRate => "BPM",
            VitalType::Oxygen => "%",
            VitalType::Temperature => "°C",
        }
    }

    /// Only blood pressure carries a second (systolic) value; its primary
    /// value is the diastolic one.
    pub fn has_systolic(&self) -> bool {
        matches!(self, VitalType::BloodPressure)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VitalType::Glucose => "Glucose",
            VitalType::BloodPressure => "Blood Pressure",
            VitalType::HeartRate => "Heart Rate",
            VitalType::Oxygen => "Oxygen",
            VitalType::Temperature => "Temperature",
        }
    }
}

pub fn unit_for(vital_type: VitalType) -> &'static str {
    vital_type.unit()
}

pub fn has_systolic(vital_type: VitalType) -> bool {
    vital_type.has_systolic()
}

impl std::fmt::Display for VitalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for VitalType {
    type Err = anyhow::Error;

    /// Accepts the serialized tag (`bloodPressure`) or the display label
    /// (`Blood Pressure`). Anything else is an integration error.
    fn from_str(value: &str) -> anyhow::Result<Self> {
        VitalType::ALL
            .into_iter()
            .find(|vital| {
                value == vital.label()
                    || serde_json::to_value(vital)
                        .ok()
                        .and_then(|tag| tag.as_str().map(|tag| tag == value))
                        .unwrap_or(false)
            })
            .ok_or_else(|| anyhow::anyhow!("unknown vital type '{value}'"))
    }
}
