//! Error types for the LightNavi domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Configuration has its
//! own enum in `lightnavi-config`; this crate only owns the
//! recommendation-service boundary.

use thiserror::Error;

/// Failures of the outbound call to the recommendation service.
///
/// The dialogue orchestrator treats every variant the same way: it becomes a
/// visible apology turn. The variants exist so logs and `doctor` output can
/// say what actually went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("API error: {status_code} {message}")]
    Status { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_code_and_body() {
        let err = ServiceError::Status {
            status_code: 500,
            message: "OPENAI_API_KEYが設定されていません".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error: 500 OPENAI_API_KEYが設定されていません"
        );
    }

    #[test]
    fn network_error_keeps_cause() {
        let err = ServiceError::Network("connection refused".into());
        assert!(err.to_string().starts_with("Network error"));
        assert!(err.to_string().contains("connection refused"));
    }
}
