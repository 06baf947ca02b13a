//! Turn and transcript domain types.
//!
//! These are the value objects that flow through a session:
//! user types an utterance → it becomes a user `Turn` → the whole
//! `ConversationLog` is sent to the recommendation service → the reply becomes
//! an assistant `Turn`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Greeting seeded as the first assistant turn of every session.
pub const DEFAULT_WELCOME_MESSAGE: &str = "こんにちは！施設照明器具の選定を支援いたします。\n\n物件情報（物件名、部屋名、天井高、図面からの印象など）をお教えください。";

/// Unique identifier for a dialogue session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person describing the space
    User,
    /// The recommendation assistant (or a locally generated apology)
    Assistant,
    /// System instructions
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A fixture recommended by the service.
///
/// Only the identifying fields are typed; everything else the service sends
/// is kept verbatim in `extra`. The identifying fields come from database
/// rows and may be null or non-string; they read as text and never fail the
/// surrounding reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub manufacturer: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub series: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `null` becomes empty, strings pass through, other scalars are rendered.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it
    pub role: Role,

    /// The visible text
    pub text: String,

    /// Reasoning trace returned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Ranked fixture candidates, best first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    /// Search queries the service issued while answering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_queries: Option<Vec<String>>,

    /// Opaque service metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<serde_json::Value>,

    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn plain(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            reasoning: None,
            candidates: None,
            issued_queries: None,
            auxiliary: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::plain(Role::User, text)
    }

    /// Create an assistant turn with no side data.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, text)
    }

    /// The first `limit` candidates, for display.
    pub fn top_candidates(&self, limit: usize) -> &[Candidate] {
        match &self.candidates {
            Some(c) => &c[..c.len().min(limit)],
            None => &[],
        }
    }
}

/// The append-only transcript of one session.
///
/// Starts with a single assistant welcome turn. There is no way to remove or
/// reorder turns, and turns handed out are shared references only.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    /// Create a log seeded with the given welcome text.
    pub fn new(welcome: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(welcome)],
        }
    }

    /// Append a turn at the end of the transcript.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Read-only view of every turn, oldest first.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new(DEFAULT_WELCOME_MESSAGE)
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
