use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::i18n::Phrase;
use crate::intake::RecordDraft;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    Dashboard,
    History,
    Charts,
    Insights,
    Settings,
    NewRecord,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::History,
        View::Charts,
        View::Insights,
        View::Settings,
        View::NewRecord,
    ];

    pub fn title(&self) -> Phrase {
        match self {
            View::Dashboard => Phrase::Dashboard,
            View::History => Phrase::History,
            View::Charts => Phrase::Charts,
            View::Insights => Phrase::Insights,
            View::Settings => Phrase::Settings,
            View::NewRecord => Phrase::NewRecord,
        }
    }
}

/// Current-view state machine. Every view can reach every other view;
/// `NewRecord` additionally exits through [`ViewNavigator::save`] or
/// [`ViewNavigator::cancel`], both landing on the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNavigator {
    current: View,
}

impl ViewNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Returns the view that was left.
    pub fn navigate(&mut self, view: View) -> View {
        std::mem::replace(&mut self.current, view)
    }

    /// Leaves `NewRecord` for the dashboard and hands the draft on to intake.
    pub fn save(&mut self, draft: RecordDraft) -> Result<RecordDraft> {
        self.ensure_on_new_record("save")?;
        self.current = View::Dashboard;
        Ok(draft)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_on_new_record("cancel")?;
        self.current = View::Dashboard;
        Ok(())
    }

    fn ensure_on_new_record(&self, action: &str) -> Result<()> {
        if self.current != View::NewRecord {
            bail!("cannot {action} a record from the {:?} view", self.current);
        }
        Ok(())
    }
}
