//! Context accumulation helpers.
//!
//! | Module | Role |
//! |--------|------|
//! | `extractor` | utterance → fragment, pure pattern rules |
//! | `summary` | context → labelled rows for display |
//!
//! Merging itself lives on `ProjectContext` in `lightnavi-core`.

pub mod extractor;
pub mod summary;

pub use extractor::extract;
pub use summary::{ContextSummary, SummaryRow, UNSET};
