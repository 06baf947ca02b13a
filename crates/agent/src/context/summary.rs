//! Human-readable summary of the accumulated context.
//!
//! Produces the label/value rows a presentation layer shows next to the
//! chat (入力済みの物件情報). Unknown keys read `未設定`; a known `false` is
//! shown with its negative label so it stays distinguishable from unknown.

use lightnavi_core::context::{ContextKey, ProjectContext};
use serde::Serialize;

/// Placeholder for a key that is not yet known.
pub const UNSET: &str = "未設定";

/// One row of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub key: ContextKey,
    pub label: &'static str,
    pub value: String,
}

/// Ordered summary rows for a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub rows: Vec<SummaryRow>,
}

fn label(key: ContextKey) -> &'static str {
    match key {
        ContextKey::PropertyName => "物件名",
        ContextKey::RoomName => "部屋名",
        ContextKey::CeilingHeight => "天井高",
        ContextKey::ProjectType => "案件タイプ",
        ContextKey::SpecialEnvironment => "特殊環境",
        ContextKey::Dimming => "調光",
        ContextKey::ColorTemperature => "調色",
        ContextKey::Impression => "図面からの印象",
    }
}

fn text(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSET.to_string(),
    }
}

fn flag(value: Option<bool>, positive: &str, negative: &str) -> String {
    match value {
        Some(true) => positive.to_string(),
        Some(false) => negative.to_string(),
        None => UNSET.to_string(),
    }
}

fn value(ctx: &ProjectContext, key: ContextKey) -> String {
    match key {
        ContextKey::PropertyName => text(&ctx.property_name),
        ContextKey::RoomName => text(&ctx.room_name),
        ContextKey::CeilingHeight => match ctx.ceiling_height {
            Some(h) if h > 0.0 => format!("{h} m"),
            _ => UNSET.to_string(),
        },
        ContextKey::ProjectType => ctx
            .project_type
            .map(|t| t.label().to_string())
            .unwrap_or_else(|| UNSET.to_string()),
        ContextKey::SpecialEnvironment => flag(ctx.special_environment, "あり", "なし"),
        ContextKey::Dimming => flag(ctx.dimming, "可能", "不要"),
        ContextKey::ColorTemperature => flag(ctx.color_temperature, "可能", "不要"),
        ContextKey::Impression => text(&ctx.impression),
    }
}

impl From<&ProjectContext> for ContextSummary {
    fn from(ctx: &ProjectContext) -> Self {
        let rows = ContextKey::ALL
            .into_iter()
            .map(|key| SummaryRow {
                key,
                label: label(key),
                value: value(ctx, key),
            })
            .collect();
        Self { rows }
    }
}

impl std::fmt::Display for ContextSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}: {}", row.label, row.value)?;
        }
        Ok(())
    }
}
