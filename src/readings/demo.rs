use anyhow::Result;
use chrono::{Duration, Utc};

use crate::models::{Mood, Reading, VitalType};

use super::ReadingStore;

/// Two sample readings shown on a fresh install when demo mode is on.
pub fn demo_readings() -> Vec<Reading> {
    let now = Utc::now();
    vec![
        Reading::recorded_at(
            now - Duration::hours(1),
            VitalType::Glucose,
            105.0,
            None,
            Mood::Happy,
            Vec::new(),
            false,
        ),
        Reading::recorded_at(
            now - Duration::hours(2),
            VitalType::BloodPressure,
            80.0,
            Some(120.0),
            Mood::Neutral,
            vec!["Fadiga".to_string()],
            false,
        ),
    ]
}

/// Store pre-filled with [`demo_readings`], newest first.
pub fn seeded_store() -> Result<ReadingStore> {
    let mut store = ReadingStore::new();
    for reading in demo_readings().into_iter().rev() {
        store.append(reading)?;
    }
    Ok(store)
}
