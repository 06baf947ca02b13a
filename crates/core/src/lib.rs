//! # LightNavi Core
//!
//! Domain types, traits, and error definitions for the LightNavi
//! lighting-selection assistant. This crate has **no transport or UI
//! dependencies**: it defines the conversation transcript, the accumulated
//! project context, and the seam to the external recommendation service.
//!
//! ## Design Philosophy
//!
//! The recommendation service is a trait here; the HTTP implementation lives
//! in `lightnavi-service`. The extraction and orchestration logic lives in
//! `lightnavi-agent` and depends inward on these types, which keeps the
//! dialogue logic testable against scripted services.

pub mod context;
pub mod error;
pub mod event;
pub mod message;
pub mod service;

// Re-export key types at crate root for ergonomics
pub use context::{ContextFragment, ContextKey, ProjectContext, ProjectType};
pub use error::ServiceError;
pub use event::{DomainEvent, EventBus};
pub use message::{Candidate, ConversationLog, Role, SessionId, Turn};
pub use service::{RecommendationService, ServiceMessage, ServiceRequest, ServiceResponse};
