//! The dialogue orchestrator — one session's request/response cycle.
//!
//! ```text
//!            begin(utterance)                resolve(result)
//!   Idle ─────────────────────▶ AwaitingResponse ─────────────▶ Idle
//!     ▲  empty / busy: ignored                                    │
//!     └───────────────────────────────────────────────────────────┘
//! ```
//!
//! `begin` does everything up to the outbound call: appends the user turn,
//! extracts and merges the context fragment, and hands back the request to
//! send. `resolve` records the reply, or an apology embedding the error, and
//! returns to `Idle`. `submit` runs both around a call to the configured
//! service. While a request is outstanding every new utterance is ignored,
//! so at most one call is ever in flight.

use std::sync::Arc;

use chrono::Utc;
use lightnavi_config::AppConfig;
use lightnavi_core::context::ProjectContext;
use lightnavi_core::error::ServiceError;
use lightnavi_core::event::{DomainEvent, EventBus};
use lightnavi_core::message::{ConversationLog, DEFAULT_WELCOME_MESSAGE, SessionId, Turn};
use lightnavi_core::service::{RecommendationService, ServiceRequest, ServiceResponse};
use tracing::{debug, info, warn};

use crate::context::extract;

/// Prefix of the assistant turn recorded when the service call fails.
pub const FAILURE_APOLOGY: &str = "申し訳ございません。エラーが発生しました";

/// Where the session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// Ready for the next utterance
    Idle,
    /// One request is outstanding
    AwaitingResponse,
}

/// Why an utterance (or a reply) was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The utterance was blank after trimming
    Empty,
    /// A request is already outstanding
    Busy,
    /// A reply arrived while no request was outstanding
    NotAwaiting,
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing changed
    Ignored(IgnoreReason),
    /// The service answered and its turn was appended
    Answered,
    /// The call failed and an apology turn was appended
    Failed(String),
}

/// Owns one session: transcript, accumulated context, and request state.
pub struct DialogueOrchestrator {
    session_id: SessionId,
    service: Arc<dyn RecommendationService>,
    welcome: String,
    log: ConversationLog,
    context: ProjectContext,
    state: DialogueState,
    event_bus: Arc<EventBus>,
}

impl DialogueOrchestrator {
    /// Create a session with the default welcome turn.
    pub fn new(service: Arc<dyn RecommendationService>, event_bus: Arc<EventBus>) -> Self {
        Self {
            session_id: SessionId::new(),
            service,
            welcome: DEFAULT_WELCOME_MESSAGE.into(),
            log: ConversationLog::default(),
            context: ProjectContext::default(),
            state: DialogueState::Idle,
            event_bus,
        }
    }

    /// Create a session using the configured welcome text.
    pub fn from_config(
        service: Arc<dyn RecommendationService>,
        event_bus: Arc<EventBus>,
        config: &AppConfig,
    ) -> Self {
        Self::new(service, event_bus).with_welcome(config.session.welcome_message.clone())
    }

    /// Replace the welcome turn. Only meaningful before the first utterance.
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self.log = ConversationLog::new(self.welcome.clone());
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// Whether a request is outstanding (the loading indicator).
    pub fn is_awaiting_response(&self) -> bool {
        self.state == DialogueState::AwaitingResponse
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    fn set_state(&mut self, state: DialogueState) {
        if self.state == state {
            return;
        }
        self.state = state;
        info!(session = %self.session_id, ?state, "Dialogue state changed");
        self.event_bus.publish(DomainEvent::StateChanged {
            session_id: self.session_id.to_string(),
            awaiting_response: state == DialogueState::AwaitingResponse,
            timestamp: Utc::now(),
        });
    }

    /// Accept an utterance and prepare the outbound request.
    ///
    /// On success the user turn is already in the log, the context is merged,
    /// and the session is awaiting a response; the caller must eventually
    /// pass the call's result to [`resolve`](Self::resolve).
    pub fn begin(&mut self, utterance: &str) -> Result<ServiceRequest, IgnoreReason> {
        let text = utterance.trim();
        if text.is_empty() {
            debug!(session = %self.session_id, "Ignoring empty utterance");
            return Err(IgnoreReason::Empty);
        }
        if self.is_awaiting_response() {
            debug!(session = %self.session_id, "Ignoring utterance while awaiting response");
            return Err(IgnoreReason::Busy);
        }

        self.log.append(Turn::user(text));
        self.event_bus.publish(DomainEvent::UtteranceAccepted {
            session_id: self.session_id.to_string(),
            content_preview: text.chars().take(50).collect(),
            timestamp: Utc::now(),
        });

        let fragment = extract(text);
        let updated_keys = self.context.apply(&fragment);
        debug!(session = %self.session_id, keys = ?updated_keys, "Context merged");
        self.event_bus.publish(DomainEvent::ContextUpdated {
            session_id: self.session_id.to_string(),
            updated_keys,
            timestamp: Utc::now(),
        });

        self.set_state(DialogueState::AwaitingResponse);
        Ok(ServiceRequest::new(&self.log, &self.context))
    }

    /// Record the outcome of the outstanding call and return to idle.
    pub fn resolve(&mut self, result: Result<ServiceResponse, ServiceError>) -> Submission {
        if !self.is_awaiting_response() {
            warn!(session = %self.session_id, "Reply arrived with no request outstanding");
            return Submission::Ignored(IgnoreReason::NotAwaiting);
        }

        let outcome = match result {
            Ok(response) => {
                let candidate_count = response.candidate_count();
                info!(session = %self.session_id, candidates = candidate_count, "Service answered");
                self.log.append(Turn::from(response));
                self.event_bus.publish(DomainEvent::ResponseReceived {
                    session_id: self.session_id.to_string(),
                    candidate_count,
                    timestamp: Utc::now(),
                });
                Submission::Answered
            }
            Err(e) => {
                let detail = e.to_string();
                warn!(session = %self.session_id, error = %detail, "Service call failed");
                self.log
                    .append(Turn::assistant(format!("{FAILURE_APOLOGY}: {detail}")));
                self.event_bus.publish(DomainEvent::ServiceFailed {
                    session_id: self.session_id.to_string(),
                    error_message: detail.clone(),
                    timestamp: Utc::now(),
                });
                Submission::Failed(detail)
            }
        };

        self.set_state(DialogueState::Idle);
        outcome
    }

    /// Run one full cycle: accept, call the service, record the reply.
    pub async fn submit(&mut self, utterance: &str) -> Submission {
        let request = match self.begin(utterance) {
            Ok(request) => request,
            Err(reason) => return Submission::Ignored(reason),
        };

        let result = self.service.recommend(request).await;
        self.resolve(result)
    }

    /// Start a fresh session: new id, welcome-only log, empty context.
    ///
    /// Refused while a request is outstanding.
    pub fn reset(&mut self) -> Result<(), IgnoreReason> {
        if self.is_awaiting_response() {
            return Err(IgnoreReason::Busy);
        }
        self.session_id = SessionId::new();
        self.log = ConversationLog::new(self.welcome.clone());
        self.context = ProjectContext::default();
        info!(session = %self.session_id, "Session reset");
        Ok(())
    }
}
