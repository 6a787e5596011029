//! JSON output rendering.
//!
//! Success and failure share one shape: a `status` field tagging the
//! variant, with the operation payload flattened alongside it on success
//! and a single `message` on error.

use serde::Serialize;

/// The one JSON document an invocation prints to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Report<T> {
    Success {
        #[serde(flatten)]
        body: T,
    },
    Error {
        message: String,
    },
}

impl<T: Serialize> Report<T> {
    pub fn success(body: T) -> Self {
        Report::Success { body }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Report::Error {
            message: message.into(),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|err| {
            serde_json::json!({
                "status": "error",
                "message": format!("Failed to render response: {err}"),
            })
            .to_string()
        })
    }
}
