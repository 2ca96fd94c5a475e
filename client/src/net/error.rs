//! Error taxonomy for remote calls.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Maximum length for response bodies carried in errors.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The request never produced an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
}

/// Failure of a call through the gateway or the identity API wrappers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Non-success status other than a handled unauthorized response.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// Success status but the body was not JSON of the expected shape.
    #[error("invalid JSON response: {0}")]
    Decode(String),

    /// JSON parsed but a required field was missing or empty.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_owned()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        };
        Self::Status { status, body }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `detail` message from a FastAPI error body, if present. Validation
    /// errors arrive as a list of `{ "msg": ... }` objects and are joined.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .collect::<Vec<_>>();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        }
    }

    /// Text suitable for an inline form message.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.detail().unwrap_or_else(|| self.to_string())
    }
}
