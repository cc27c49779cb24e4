use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceGraphError {
    #[error("Cycle detected in parent chain at span '{span_id}'")]
    CycleDetected { span_id: String },

    #[error("Trace parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceGraphError {
    pub(crate) fn cycle(span_id: impl Into<String>) -> Self {
        Self::CycleDetected {
            span_id: span_id.into(),
        }
    }
}
