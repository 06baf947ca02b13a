//! Context accumulation and dialogue orchestration — the heart of LightNavi.
//!
//! Each user utterance goes through the same cycle:
//!
//! 1. **Accept** the utterance (ignored if blank or a request is outstanding)
//! 2. **Extract** a context fragment with pattern rules
//! 3. **Merge** the fragment into the accumulated project context
//! 4. **Send** the full transcript plus context to the recommendation service
//! 5. **Record** the reply, or an apology carrying the error, as an assistant turn
//!
//! The session never loses a confirmed fact and never leaves a failure
//! unsurfaced.

pub mod context;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::{ContextSummary, SummaryRow, extract};
pub use orchestrator::{
    DialogueOrchestrator, DialogueState, FAILURE_APOLOGY, IgnoreReason, Submission,
};
