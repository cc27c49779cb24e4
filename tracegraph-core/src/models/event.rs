use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;

use crate::error::TraceGraphError;

/// Kind of step recorded in a trace.
///
/// Wire strings outside the known set are kept verbatim in `Unknown` so a
/// newer backend never breaks rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    ModeTransition,
    ToolInvocation,
    PerspectiveIntegration,
    LlmCall,
    AgentRouting,
    FileOperation,
    Error,
    Unknown(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::ModeTransition => "MODE_TRANSITION",
            EventType::ToolInvocation => "TOOL_INVOCATION",
            EventType::PerspectiveIntegration => "PERSPECTIVE_INTEGRATION",
            EventType::LlmCall => "LLM_CALL",
            EventType::AgentRouting => "AGENT_ROUTING",
            EventType::FileOperation => "FILE_OPERATION",
            EventType::Error => "ERROR",
            EventType::Unknown(raw) => raw,
        }
    }

    /// Human label, e.g. `LLM CALL`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "MODE_TRANSITION" => EventType::ModeTransition,
            "TOOL_INVOCATION" => EventType::ToolInvocation,
            "PERSPECTIVE_INTEGRATION" => EventType::PerspectiveIntegration,
            "LLM_CALL" => EventType::LlmCall,
            "AGENT_ROUTING" => EventType::AgentRouting,
            "FILE_OPERATION" => EventType::FileOperation,
            "ERROR" => EventType::Error,
            _ => EventType::Unknown(raw),
        }
    }
}

impl From<&str> for EventType {
    fn from(raw: &str) -> Self {
        EventType::from(raw.to_string())
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded step of execution (a span).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub span_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub event_type: EventType,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl TraceEvent {
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    pub fn has_expandable_data(&self) -> bool {
        self.inputs.is_some() || self.outputs.is_some()
    }
}

/// One recorded execution of the assistant for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub session_id: String,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn from_json_str(s: &str) -> Result<Self, TraceGraphError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TraceGraphError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
