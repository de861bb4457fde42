use serde::{Deserialize, Serialize};

use crate::models::BiblicalMessage;

/// Active UI/advisory language. Portuguese is the default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }

    /// Language name as written in provider prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Pt => "Portuguese",
            Language::En => "English",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::Pt => Language::En,
            Language::En => Language::Pt,
        }
    }

    pub fn phrase(&self, phrase: Phrase) -> &'static str {
        phrase.text(*self)
    }

    /// Fixed symptom tags offered by the intake form.
    pub fn symptom_vocabulary(&self) -> &'static [&'static str] {
        match self {
            Language::Pt => &["Fadiga", "Tontura", "Dor de Cabeça", "Dor", "Náusea"],
            Language::En => &["Fatigue", "Dizziness", "Headache", "Pain", "Nausea"],
        }
    }

    /// Verse shown without touching the network while offline.
    pub fn offline_verse(&self) -> BiblicalMessage {
        match self {
            Language::Pt => BiblicalMessage::new("O Senhor é o meu pastor, nada me faltará.", "Salmos 23:1"),
            Language::En => BiblicalMessage::new("The Lord is my shepherd; I shall not want.", "Psalm 23:1"),
        }
    }

    /// Verse substituted when an online verse request fails.
    pub fn fallback_verse(&self) -> BiblicalMessage {
        match self {
            Language::Pt => BiblicalMessage::new("Seja forte e corajoso.", "Josué 1:9"),
            Language::En => BiblicalMessage::new("Be strong and courageous.", "Joshua 1:9"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            other => Err(anyhow::anyhow!("unsupported language tag '{other}'")),
        }
    }
}

/// Keys of the static phrase table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Phrase {
    Dashboard,
    History,
    Charts,
    Insights,
    Settings,
    NewRecord,
    Save,
    Cancel,
    ConnectDevice,
    ScanningBluetooth,
    DeviceFound,
    Pairing,
    AnalyzingPatterns,
    ObservationalDisclaimer,
    Online,
    Offline,
    AddDataForAnalysis,
    InsightsUnavailable,
    NoReading,
}

impl Phrase {
    pub fn text(self, language: Language) -> &'static str {
        use Language::{En, Pt};

        match (self, language) {
            (Phrase::Dashboard, Pt) => "Painel",
            (Phrase::Dashboard, En) => "Dashboard",
            (Phrase::History, Pt) => "Histórico",
            (Phrase::History, En) => "History",
            (Phrase::Charts, Pt) => "Gráficos",
            (Phrase::Charts, En) => "Charts",
            (Phrase::Insights, Pt) => "Observações",
            (Phrase::Insights, En) => "Insights",
            (Phrase::Settings, Pt) => "Configurações",
            (Phrase::Settings, En) => "Settings",
            (Phrase::NewRecord, Pt) => "Novo Registro",
            (Phrase::NewRecord, En) => "New Record",
            (Phrase::Save, Pt) => "Salvar",
            (Phrase::Save, En) => "Save",
            (Phrase::Cancel, Pt) => "Cancelar",
            (Phrase::Cancel, En) => "Cancel",
            (Phrase::ConnectDevice, Pt) => "Conectar dispositivo",
            (Phrase::ConnectDevice, En) => "Connect device",
            (Phrase::ScanningBluetooth, Pt) => "Procurando dispositivos...",
            (Phrase::ScanningBluetooth, En) => "Scanning for devices...",
            (Phrase::DeviceFound, Pt) => "Dispositivo encontrado",
            (Phrase::DeviceFound, En) => "Device found",
            (Phrase::Pairing, Pt) => "Pareando...",
            (Phrase::Pairing, En) => "Pairing...",
            (Phrase::AnalyzingPatterns, Pt) => "Analisando padrões...",
            (Phrase::AnalyzingPatterns, En) => "Analyzing patterns...",
            (Phrase::ObservationalDisclaimer, Pt) => {
                "Observações geradas por IA. Não substituem orientação médica."
            }
            (Phrase::ObservationalDisclaimer, En) => {
                "AI-generated observations. Not a substitute for medical advice."
            }
            (Phrase::Online, Pt) => "Online",
            (Phrase::Online, En) => "Online",
            (Phrase::Offline, Pt) => "Offline",
            (Phrase::Offline, En) => "Offline",
            (Phrase::AddDataForAnalysis, Pt) => "Adicione leituras para análise.",
            (Phrase::AddDataForAnalysis, En) => "Add readings for analysis.",
            (Phrase::InsightsUnavailable, Pt) => "Insights indisponíveis no momento.",
            (Phrase::InsightsUnavailable, En) => "Insights currently unavailable.",
            (Phrase::NoReading, _) => "--",
        }
    }
}
