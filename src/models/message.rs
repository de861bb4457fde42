use serde::{Deserialize, Serialize};

/// Devotional verse shown on the insights view. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BiblicalMessage {
    pub verse: String,
    pub reference: String,
}

impl BiblicalMessage {
    pub fn new(verse: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            verse: verse.into(),
            reference: reference.into(),
        }
    }

    /// Both fields must carry text for a provider payload to be usable.
    pub fn is_complete(&self) -> bool {
        !self.verse.trim().is_empty() && !self.reference.trim().is_empty()
    }
}
