//! Field extraction — one utterance in, one context fragment out.
//!
//! Every rule runs against the whole utterance independently of the others:
//!
//! | Key | Rule | Emitted |
//! |-----|------|---------|
//! | `property_name` | `物件名：<rest of line>` | on match |
//! | `room_name` | `部屋名：<rest of line>` | on match |
//! | `ceiling_height` | `天井高：<number> m` | on match |
//! | `impression` | `図面からの印象：<rest of line>` | on match |
//! | `project_type` | keyword sets, later rules overwrite earlier ones | on match |
//! | `special_environment` | contains `特殊環境` or `はい` | **always** |
//! | `dimming` | contains `調光`, not `不可` | only when true |
//! | `color_temperature` | contains `調色`, not `不可` | only when true |
//!
//! Labels accept either an ASCII or a full-width colon. The function is pure:
//! the same utterance always yields the same fragment.

use lightnavi_core::context::{ContextFragment, ProjectType};
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::debug;

// ── Patterns ──────────────────────────────────────────────────────────────

// `.` stops at a newline, so a labelled value runs to the end of its line.
static PROPERTY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"物件名[：:][\s　]*(.+)").expect("valid property pattern"));

static ROOM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"部屋名[：:][\s　]*(.+)").expect("valid room pattern"));

static CEILING_HEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"天井高[：:][\s　]*(\d+(?:\.\d+)?)[\s　]*m").expect("valid height pattern")
});

static IMPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"図面からの印象[：:][\s　]*(.+)").expect("valid impression pattern")
});

/// Project-type rules in evaluation order. Each one that matches overwrites
/// the previous result, so the last match wins.
const PROJECT_TYPE_RULES: [(&[&str], ProjectType); 3] = [
    (&["新規見積", "デフォルト"], ProjectType::NewEstimate),
    (&["リニューアル"], ProjectType::Renewal),
    (&["相見積もり"], ProjectType::CompetitiveBid),
];

const SPECIAL_ENVIRONMENT_TRIGGERS: [&str; 2] = ["特殊環境", "はい"];
const DIMMING_TRIGGER: &str = "調光";
const COLOR_TEMPERATURE_TRIGGER: &str = "調色";
const NEGATION: &str = "不可";

// ── Extraction ────────────────────────────────────────────────────────────

fn labelled_text(pattern: &Regex, utterance: &str) -> Option<String> {
    pattern
        .captures(utterance)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn ceiling_height(utterance: &str) -> Option<f64> {
    CEILING_HEIGHT
        .captures(utterance)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|h| h.is_finite())
}

fn project_type(utterance: &str) -> Option<ProjectType> {
    let mut found = None;
    for (keywords, kind) in PROJECT_TYPE_RULES {
        if keywords.iter().any(|k| utterance.contains(k)) {
            found = Some(kind);
        }
    }
    found
}

/// A flag that is set only by a positive mention without a negation.
fn affirmed(utterance: &str, trigger: &str) -> Option<bool> {
    (utterance.contains(trigger) && !utterance.contains(NEGATION)).then_some(true)
}

/// Derive a context fragment from one user utterance.
pub fn extract(utterance: &str) -> ContextFragment {
    let fragment = ContextFragment {
        property_name: labelled_text(&PROPERTY_NAME, utterance),
        room_name: labelled_text(&ROOM_NAME, utterance),
        ceiling_height: ceiling_height(utterance),
        impression: labelled_text(&IMPRESSION, utterance),
        project_type: project_type(utterance),
        special_environment: Some(
            SPECIAL_ENVIRONMENT_TRIGGERS
                .iter()
                .any(|t| utterance.contains(t)),
        ),
        dimming: affirmed(utterance, DIMMING_TRIGGER),
        color_temperature: affirmed(utterance, COLOR_TEMPERATURE_TRIGGER),
    };

    debug!(keys = ?fragment.present_keys(), "Extracted context fragment");
    fragment
}
