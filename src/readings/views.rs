//! Read-only projections of the reading store consumed by the views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::i18n::{Language, Phrase};
use crate::models::{Reading, VitalType};

use super::ReadingStore;

/// Card order on the dashboard.
pub const DASHBOARD_ORDER: [VitalType; 5] = [
    VitalType::Glucose,
    VitalType::BloodPressure,
    VitalType::HeartRate,
    VitalType::Temperature,
    VitalType::Oxygen,
];

const DASHBOARD_RECENT: usize = 3;
const CHART_POINTS: usize = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCard {
    pub vital_type: VitalType,
    pub unit: &'static str,
    pub display: String,
    pub latest: Option<Reading>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub cards: Vec<DashboardCard>,
    pub recent: Vec<Reading>,
}

impl DashboardView {
    pub fn build(store: &ReadingStore, language: Language) -> Self {
        let cards = DASHBOARD_ORDER
            .iter()
            .map(|&vital_type| {
                let latest = store.latest_of(vital_type).cloned();
                let display = latest
                    .as_ref()
                    .map(Reading::display_value)
                    .unwrap_or_else(|| language.phrase(Phrase::NoReading).to_string());
                DashboardCard {
                    vital_type,
                    unit: vital_type.unit(),
                    display,
                    latest,
                }
            })
            .collect();

        Self {
            cards,
            recent: store.recent(DASHBOARD_RECENT).into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Glucose trend: the most recent points, oldest first.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub vital_type: VitalType,
    pub unit: &'static str,
    pub points: Vec<ChartPoint>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
}

impl ChartSeries {
    pub fn glucose(store: &ReadingStore) -> Self {
        Self::for_type(store, VitalType::Glucose, CHART_POINTS)
    }

    pub fn for_type(store: &ReadingStore, vital_type: VitalType, limit: usize) -> Self {
        let mut points: Vec<ChartPoint> = store
            .all()
            .filter(|reading| reading.vital_type() == vital_type)
            .take(limit)
            .map(|reading| ChartPoint {
                timestamp: reading.timestamp(),
                value: reading.value(),
            })
            .collect();
        points.reverse();

        let values = points.iter().map(|point| point.value);
        let min = values.clone().reduce(f64::min);
        let max = values.clone().reduce(f64::max);
        let average = if points.is_empty() {
            None
        } else {
            Some(values.sum::<f64>() / points.len() as f64)
        };

        Self {
            vital_type,
            unit: vital_type.unit(),
            points,
            min,
            max,
            average,
        }
    }
}
