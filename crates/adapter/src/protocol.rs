//! Protocol module - JSON message types for the renderer bridge
//!
//! Line-delimited JSON. Every message has a `type` tag and a `seq` number.

use serde::{Deserialize, Serialize};

use crate::core::{ActionOutcome, SessionSnapshot};
use crate::types::{BuildingId, SessionAction, TransitionError};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    pub client: ClientInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// One session operation requested by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl CommandMessage {
    /// Map the wire action onto a session action.
    ///
    /// `tick` is refused: the game loop owns the clock.
    pub fn to_action(&self) -> Result<SessionAction, ProtocolError> {
        let action = match self.action.as_str() {
            "start" => SessionAction::Start,
            "selectBuilding" => {
                let id = self
                    .building
                    .ok_or_else(|| ProtocolError::missing_field(self.seq, "building"))?;
                SessionAction::SelectBuilding(BuildingId(id))
            }
            "submitAnswer" => {
                let answer = self
                    .answer
                    .clone()
                    .ok_or_else(|| ProtocolError::missing_field(self.seq, "answer"))?;
                SessionAction::SubmitAnswer(answer)
            }
            "resolveAnswer" => SessionAction::ResolveAnswer,
            "abandonChallenge" => SessionAction::AbandonChallenge,
            "reset" => SessionAction::Reset,
            other => {
                return Err(ProtocolError {
                    seq: Some(self.seq),
                    code: ErrorCode::UnknownAction,
                    message: format!("unknown action: {}", other),
                })
            }
        };
        Ok(action)
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Ok,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    HandshakeRequired,
    UnknownAction,
    MissingField,
    StaleSeq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    Welcome {
        seq: u64,
        protocol_version: String,
    },
    Ack {
        seq: u64,
        status: AckStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Error {
        #[serde(default)]
        seq: Option<u64>,
        code: ErrorCode,
        message: String,
    },
    Observation {
        seq: u64,
        snapshot: SessionSnapshot,
    },
}

impl ServerMessage {
    pub fn welcome(seq: u64) -> Self {
        ServerMessage::Welcome {
            seq,
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Acknowledge a command with the session's verdict.
    pub fn ack(seq: u64, result: &Result<ActionOutcome, TransitionError>) -> Self {
        match result {
            Ok(_) => ServerMessage::Ack {
                seq,
                status: AckStatus::Ok,
                reason: None,
            },
            Err(e) => ServerMessage::Ack {
                seq,
                status: AckStatus::Rejected,
                reason: Some(e.code().to_string()),
            },
        }
    }

    pub fn observation(seq: u64, snapshot: SessionSnapshot) -> Self {
        ServerMessage::Observation { seq, snapshot }
    }

    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<ProtocolError> for ServerMessage {
    fn from(err: ProtocolError) -> Self {
        ServerMessage::Error {
            seq: err.seq,
            code: err.code,
            message: err.message,
        }
    }
}

/// A line the bridge could not act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    pub seq: Option<u64>,
    pub code: ErrorCode,
    pub message: String,
}

impl ProtocolError {
    pub fn new(seq: Option<u64>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            seq,
            code,
            message: message.into(),
        }
    }

    fn missing_field(seq: u64, field: &str) -> Self {
        Self::new(
            Some(seq),
            ErrorCode::MissingField,
            format!("missing field: {}", field),
        )
    }
}

/// Parse one inbound line.
///
/// On failure the `seq` is still recovered when the line is valid JSON, so
/// the error can be correlated by the client.
pub fn parse_client_line(line: &str) -> Result<ClientMessage, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(line)
        .map_err(|e| ProtocolError::new(None, ErrorCode::InvalidJson, e.to_string()))?;
    let seq = value.get("seq").and_then(|v| v.as_u64());
    serde_json::from_value(value)
        .map_err(|e| ProtocolError::new(seq, ErrorCode::InvalidJson, e.to_string()))
}

pub fn create_hello(seq: u64, name: &str, version: &str) -> ClientMessage {
    ClientMessage::Hello(HelloMessage {
        seq,
        client: ClientInfo {
            name: name.to_string(),
            version: version.to_string(),
        },
    })
}

pub fn create_command(seq: u64, action: &SessionAction) -> ClientMessage {
    let (building, answer) = match action {
        SessionAction::SelectBuilding(id) => (Some(id.0), None),
        SessionAction::SubmitAnswer(answer) => (None, Some(answer.clone())),
        _ => (None, None),
    };
    ClientMessage::Command(CommandMessage {
        seq,
        action: action.as_str().to_string(),
        building,
        answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hello_and_command() {
        let hello = parse_client_line(
            r#"{"type":"hello","seq":1,"client":{"name":"web","version":"0.1"}}"#,
        )
        .unwrap();
        assert_eq!(hello, create_hello(1, "web", "0.1"));

        let cmd = parse_client_line(r#"{"type":"command","seq":2,"action":"selectBuilding","building":4}"#)
            .unwrap();
        let ClientMessage::Command(cmd) = cmd else {
            panic!("expected command");
        };
        assert_eq!(cmd.to_action(), Ok(SessionAction::SelectBuilding(BuildingId(4))));
    }

    #[test]
    fn command_round_trips_through_builder() {
        let action = SessionAction::SubmitAnswer("Solar".into());
        let ClientMessage::Command(cmd) = create_command(9, &action) else {
            panic!("expected command");
        };
        assert_eq!(cmd.to_action(), Ok(action));
    }

    #[test]
    fn invalid_json_keeps_seq_when_possible() {
        let err = parse_client_line("{nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJson);
        assert_eq!(err.seq, None);

        let err = parse_client_line(r#"{"type":"teleport","seq":5}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJson);
        assert_eq!(err.seq, Some(5));
    }

    #[test]
    fn tick_and_unknown_actions_are_refused() {
        for action in ["tick", "fly"] {
            let cmd = CommandMessage {
                seq: 3,
                action: action.to_string(),
                building: None,
                answer: None,
            };
            assert_eq!(cmd.to_action().unwrap_err().code, ErrorCode::UnknownAction);
        }
    }

    #[test]
    fn missing_payload_is_reported() {
        let cmd = CommandMessage {
            seq: 3,
            action: "submitAnswer".into(),
            building: None,
            answer: None,
        };
        assert_eq!(cmd.to_action().unwrap_err().code, ErrorCode::MissingField);
    }

    #[test]
    fn rejected_ack_carries_reason() {
        let msg = ServerMessage::ack(7, &Err(TransitionError::ChallengeOpen));
        let v: serde_json::Value = serde_json::from_str(&msg.to_line().unwrap()).unwrap();
        assert_eq!(v["type"], "ack");
        assert_eq!(v["status"], "rejected");
        assert_eq!(v["reason"], "challenge_open");
    }
}
