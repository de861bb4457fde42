use std::collections::{HashSet, VecDeque};

use anyhow::{bail, Result};

use crate::models::{Reading, VitalType};

/// Append-only, most-recent-first collection of readings.
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    readings: VecDeque<Reading>,
    ids: HashSet<String>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at the head. Ids may never repeat for the lifetime of the store.
    pub fn append(&mut self, reading: Reading) -> Result<()> {
        if !self.ids.insert(reading.id().to_string()) {
            bail!("reading id '{}' already recorded", reading.id());
        }
        self.readings.push_front(reading);
        Ok(())
    }

    pub fn all(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn latest_of(&self, vital_type: VitalType) -> Option<&Reading> {
        self.readings
            .iter()
            .find(|reading| reading.vital_type() == vital_type)
    }

    pub fn recent(&self, n: usize) -> Vec<&Reading> {
        self.readings.iter().take(n).collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Reading> {
        self.readings.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;

    fn reading(vital_type: VitalType, value: f64) -> Reading {
        Reading::new(vital_type, value, None, Mood::Happy, Vec::new(), false)
    }

    #[test]
    fn all_is_reverse_call_order() {
        let mut store = ReadingStore::new();
        let first = reading(VitalType::Glucose, 1.0);
        let second = reading(VitalType::HeartRate, 2.0);
        let third = reading(VitalType::Glucose, 3.0);
        store.append(first.clone()).unwrap();
        store.append(second.clone()).unwrap();
        store.append(third.clone()).unwrap();

        let ids: Vec<&str> = store.all().map(Reading::id).collect();
        assert_eq!(ids, vec![third.id(), second.id(), first.id()]);
    }

    #[test]
    fn latest_of_returns_most_recent_match() {
        let mut store = ReadingStore::new();
        store.append(reading(VitalType::Glucose, 100.0)).unwrap();
        store.append(reading(VitalType::Oxygen, 97.0)).unwrap();
        store.append(reading(VitalType::Glucose, 120.0)).unwrap();

        assert_eq!(store.latest_of(VitalType::Glucose).map(Reading::value), Some(120.0));
        assert_eq!(store.latest_of(VitalType::Oxygen).map(Reading::value), Some(97.0));
        assert!(store.latest_of(VitalType::Temperature).is_none());
    }

    #[test]
    fn recent_caps_at_available_entries() {
        let mut store = ReadingStore::new();
        for value in 0..4 {
            store.append(reading(VitalType::HeartRate, value as f64)).unwrap();
        }

        let values: Vec<f64> = store.recent(2).into_iter().map(Reading::value).collect();
        assert_eq!(values, vec![3.0, 2.0]);
        assert_eq!(store.recent(10).len(), 4);
        assert!(ReadingStore::new().recent(3).is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut store = ReadingStore::new();
        let entry = reading(VitalType::Glucose, 90.0);
        store.append(entry.clone()).unwrap();
        assert!(store.append(entry).is_err());
        assert_eq!(store.len(), 1);
    }
}
