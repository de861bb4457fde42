use serde::{Deserialize, Serialize};

/// Mood glyph attached to a reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Mood {
    #[default]
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😐")]
    Neutral,
    #[serde(rename = "😔")]
    Sad,
    #[serde(rename = "😫")]
    Exhausted,
    #[serde(rename = "🤢")]
    Nauseous,
    #[serde(rename = "🤒")]
    Feverish,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Exhausted,
        Mood::Nauseous,
        Mood::Feverish,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Neutral => "😐",
            Mood::Sad => "😔",
            Mood::Exhausted => "😫",
            Mood::Nauseous => "🤢",
            Mood::Feverish => "🤒",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.emoji())
    }
}
