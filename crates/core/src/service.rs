//! RecommendationService trait — the seam to the external ranking backend.
//!
//! A service receives the full transcript plus the accumulated project
//! context and answers with one assistant message, optionally carrying its
//! reasoning, the search queries it issued, and ranked fixture candidates.
//! How candidates are found is opaque to this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ProjectContext;
use crate::error::ServiceError;
use crate::message::{Candidate, ConversationLog, Role, Turn};

/// A transcript entry as it goes over the wire: role and text only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for ServiceMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

/// One outbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// The whole transcript, oldest first
    pub messages: Vec<ServiceMessage>,

    /// The context after merging the latest utterance
    pub context: ProjectContext,
}

impl ServiceRequest {
    /// Bundle a transcript snapshot with the merged context.
    pub fn new(log: &ConversationLog, context: &ProjectContext) -> Self {
        Self {
            messages: log.iter().map(ServiceMessage::from).collect(),
            context: context.clone(),
        }
    }
}

/// The service's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_queries: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ServiceResponse {
    /// A bare text reply.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            thinking: None,
            search_queries: None,
            candidates: None,
            metadata: None,
        }
    }

    /// Number of candidates carried, zero when absent.
    pub fn candidate_count(&self) -> usize {
        self.candidates.as_ref().map_or(0, Vec::len)
    }
}

impl From<ServiceResponse> for Turn {
    fn from(response: ServiceResponse) -> Self {
        let mut turn = Turn::assistant(response.message);
        turn.reasoning = response.thinking;
        turn.candidates = response.candidates;
        turn.issued_queries = response.search_queries;
        turn.auxiliary = response.metadata;
        turn
    }
}

/// The core RecommendationService trait.
///
/// The dialogue orchestrator calls `recommend()` once per accepted utterance
/// without knowing whether it talks to HTTP or a scripted test double.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// A human-readable name for this service (e.g., "http").
    fn name(&self) -> &str;

    /// Send the transcript and context, get one reply.
    async fn recommend(
        &self,
        request: ServiceRequest,
    ) -> std::result::Result<ServiceResponse, ServiceError>;

    /// Health check — can we reach the service?
    async fn health_check(&self) -> std::result::Result<bool, ServiceError> {
        Ok(true)
    }
}
