use thiserror::Error;

/// Why an action did not reach its success branch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// 2xx response whose `result` was anything but `"success"`.
    #[error("rejected by server: {}", .message.as_deref().unwrap_or("<no message>"))]
    Rejected { message: Option<String> },
    /// Non-2xx response that still carried `result: "error"`.
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    TransportRejected { status: u16, message: Option<String> },
    /// Network error, non-2xx without an error body, or an unparsable body.
    #[error("transport failure: {detail}")]
    Transport { detail: String },
    /// Success marker present but the payload was missing fields.
    #[error("malformed success response: {detail}")]
    Malformed { detail: String },
    /// Deletion confirmed with no pending target.
    #[error("no deletion pending")]
    NothingPending,
}

impl FailureReason {
    /// Whether the failure carries a server verdict the user should see.
    pub fn is_surfaced(&self) -> bool {
        matches!(
            self,
            FailureReason::Rejected { .. } | FailureReason::TransportRejected { .. }
        )
    }

    /// Text for the error dialog: the server message verbatim when present.
    pub fn user_message(&self) -> String {
        match self {
            FailureReason::Rejected { message } | FailureReason::TransportRejected { message, .. } => {
                message.clone().unwrap_or_default()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult<T> {
    Success(T),
    Failure(FailureReason),
}

impl<T> ActionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::Failure(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<T, FailureReason> {
        match self {
            ActionResult::Success(value) => Ok(value),
            ActionResult::Failure(reason) => Err(reason),
        }
    }
}
