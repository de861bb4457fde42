//! JSON-lines command bridge between the presentation layer and the
//! controller. One [`Command`] per input line, one [`Response`] per output.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intake::{DraftEdit, RecordDraft};
use crate::navigation::View;

use super::controller::AppController;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    Snapshot,
    Dashboard,
    History,
    Charts,
    Insights,
    RefreshInsights,
    Navigate { view: View },
    AddReading { draft: RecordDraft },
    SaveRecord {
        #[serde(default)]
        draft: Option<RecordDraft>,
    },
    CancelRecord,
    EditDraft { edit: DraftEdit },
    StartPairing,
    CancelPairing,
    ToggleBiblicalMessages,
    ToggleConnectivitySimulation,
    ToggleLanguage,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self {
                ok: true,
                result: Some(value),
                error: None,
            },
            Err(err) => Self {
                ok: false,
                result: None,
                error: Some(format!("{err:#}")),
            },
        }
    }
}

pub async fn execute(controller: &AppController, command: Command) -> Result<Value> {
    let value = match command {
        Command::Snapshot => serde_json::to_value(controller.snapshot().await)?,
        Command::Dashboard => serde_json::to_value(controller.dashboard().await)?,
        Command::History => serde_json::to_value(controller.history().await)?,
        Command::Charts => serde_json::to_value(controller.charts().await)?,
        Command::Insights => serde_json::to_value(controller.insights().await)?,
        Command::RefreshInsights => {
            controller.refresh_insights().await;
            serde_json::to_value(controller.insights().await)?
        }
        Command::Navigate { view } => serde_json::to_value(controller.navigate(view).await?)?,
        Command::AddReading { draft } => {
            serde_json::to_value(controller.add_reading(draft).await?)?
        }
        Command::SaveRecord { draft } => {
            let snapshot = match draft {
                Some(draft) => controller.save_record(draft).await?,
                None => controller.save_current_record().await?,
            };
            serde_json::to_value(snapshot)?
        }
        Command::CancelRecord => serde_json::to_value(controller.cancel_record().await?)?,
        Command::EditDraft { edit } => serde_json::to_value(controller.edit_draft(edit).await?)?,
        Command::StartPairing => serde_json::to_value(controller.start_pairing().await?)?,
        Command::CancelPairing => serde_json::to_value(controller.cancel_pairing().await?)?,
        Command::ToggleBiblicalMessages => {
            serde_json::to_value(controller.toggle_biblical_messages().await?)?
        }
        Command::ToggleConnectivitySimulation => {
            serde_json::to_value(controller.toggle_connectivity_simulation().await?)?
        }
        Command::ToggleLanguage => serde_json::to_value(controller.toggle_language().await?)?,
    };
    Ok(value)
}

/// Parses and executes one input line. Malformed input becomes an error
/// response rather than ending the session.
pub async fn handle_line(controller: &AppController, line: &str) -> Response {
    let result = match serde_json::from_str::<Command>(line) {
        Ok(command) => execute(controller, command).await,
        Err(err) => Err(anyhow::Error::new(err).context("invalid command")),
    };
    Response::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VitalType;

    #[test]
    fn commands_parse_from_tagged_json() {
        let command: Command = serde_json::from_str(r#"{"command":"navigate","view":"newRecord"}"#).unwrap();
        assert_eq!(command, Command::Navigate { view: View::NewRecord });

        let command: Command = serde_json::from_str(r#"{"command":"saveRecord"}"#).unwrap();
        assert_eq!(command, Command::SaveRecord { draft: None });

        let command: Command = serde_json::from_str(
            r#"{"command":"addReading","draft":{"type":"bloodPressure","value":"80","systolic":"120"}}"#,
        )
        .unwrap();
        match command {
            Command::AddReading { draft } => {
                assert_eq!(draft.vital_type, VitalType::BloodPressure);
                assert_eq!(draft.systolic, "120");
                assert!(draft.symptoms.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }

        let command: Command = serde_json::from_str(
            r#"{"command":"editDraft","edit":{"op":"toggleSymptom","symptom":"Dor"}}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            Command::EditDraft {
                edit: DraftEdit::ToggleSymptom { symptom: "Dor".into() }
            }
        );
    }

    #[test]
    fn unknown_vital_type_is_rejected() {
        assert!(serde_json::from_str::<Command>(
            r#"{"command":"addReading","draft":{"type":"cholesterol","value":"1"}}"#
        )
        .is_err());
    }

    #[test]
    fn error_response_omits_result() {
        let response = Response::from_result(Err(anyhow::anyhow!("boom")));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "error": "boom"}));
    }
}
