//! The accumulated project context and its merge rules.
//!
//! A `ProjectContext` is the structured description of the lighting project
//! built up over a session. Every key is independently optional and `None`
//! means "not yet known", never "no". The same type doubles as the fragment
//! produced from a single utterance.

use serde::{Deserialize, Serialize};

/// Kind of deal the project is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    /// A fresh quotation (the service's default)
    #[serde(rename = "新規見積")]
    NewEstimate,
    /// Replacing fixtures in an existing space
    #[serde(rename = "リニューアル")]
    Renewal,
    /// Quoting against competitors
    #[serde(rename = "相見積もり")]
    CompetitiveBid,
}

impl ProjectType {
    /// The label used on the wire and in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::NewEstimate => "新規見積",
            ProjectType::Renewal => "リニューアル",
            ProjectType::CompetitiveBid => "相見積もり",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Names of the context keys, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKey {
    PropertyName,
    RoomName,
    CeilingHeight,
    ProjectType,
    SpecialEnvironment,
    Dimming,
    ColorTemperature,
    Impression,
}

impl ContextKey {
    pub const ALL: [ContextKey; 8] = [
        ContextKey::PropertyName,
        ContextKey::RoomName,
        ContextKey::CeilingHeight,
        ContextKey::ProjectType,
        ContextKey::SpecialEnvironment,
        ContextKey::Dimming,
        ContextKey::ColorTemperature,
        ContextKey::Impression,
    ];

    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::PropertyName => "property_name",
            ContextKey::RoomName => "room_name",
            ContextKey::CeilingHeight => "ceiling_height",
            ContextKey::ProjectType => "project_type",
            ContextKey::SpecialEnvironment => "special_environment",
            ContextKey::Dimming => "dimming",
            ContextKey::ColorTemperature => "color_temperature",
            ContextKey::Impression => "impression",
        }
    }
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured requirements accumulated over a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    /// 物件名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,

    /// 部屋名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,

    /// 天井高, in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling_height: Option<f64>,

    /// 図面からの印象
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impression: Option<String>,

    /// 案件タイプ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,

    /// 特殊環境
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_environment: Option<bool>,

    /// 調光
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimming: Option<bool>,

    /// 調色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<bool>,
}

/// A partial context derived from one utterance.
pub type ContextFragment = ProjectContext;

fn overwrite<T: Clone>(dst: &mut Option<T>, src: &Option<T>) -> bool {
    match src {
        Some(value) => {
            *dst = Some(value.clone());
            true
        }
        None => false,
    }
}

impl ProjectContext {
    /// Whether no key is known.
    pub fn is_empty(&self) -> bool {
        self.present_keys().is_empty()
    }

    /// Whether the given key holds a value.
    pub fn has(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::PropertyName => self.property_name.is_some(),
            ContextKey::RoomName => self.room_name.is_some(),
            ContextKey::CeilingHeight => self.ceiling_height.is_some(),
            ContextKey::ProjectType => self.project_type.is_some(),
            ContextKey::SpecialEnvironment => self.special_environment.is_some(),
            ContextKey::Dimming => self.dimming.is_some(),
            ContextKey::ColorTemperature => self.color_temperature.is_some(),
            ContextKey::Impression => self.impression.is_some(),
        }
    }

    /// Keys that hold a value, in display order.
    pub fn present_keys(&self) -> Vec<ContextKey> {
        ContextKey::ALL
            .into_iter()
            .filter(|key| self.has(*key))
            .collect()
    }

    /// Right-biased merge: every key the fragment carries replaces ours,
    /// every key it lacks keeps our value (including "unknown").
    pub fn merge(&self, fragment: &ContextFragment) -> ProjectContext {
        let mut merged = self.clone();
        merged.apply(fragment);
        merged
    }

    /// In-place form of [`merge`](Self::merge). Returns the keys the
    /// fragment supplied.
    pub fn apply(&mut self, fragment: &ContextFragment) -> Vec<ContextKey> {
        let mut updated = Vec::new();
        let mut track = |key, changed: bool| {
            if changed {
                updated.push(key);
            }
        };

        track(
            ContextKey::PropertyName,
            overwrite(&mut self.property_name, &fragment.property_name),
        );
        track(
            ContextKey::RoomName,
            overwrite(&mut self.room_name, &fragment.room_name),
        );
        track(
            ContextKey::CeilingHeight,
            overwrite(&mut self.ceiling_height, &fragment.ceiling_height),
        );
        track(
            ContextKey::ProjectType,
            overwrite(&mut self.project_type, &fragment.project_type),
        );
        track(
            ContextKey::SpecialEnvironment,
            overwrite(&mut self.special_environment, &fragment.special_environment),
        );
        track(
            ContextKey::Dimming,
            overwrite(&mut self.dimming, &fragment.dimming),
        );
        track(
            ContextKey::ColorTemperature,
            overwrite(&mut self.color_temperature, &fragment.color_temperature),
        );
        track(
            ContextKey::Impression,
            overwrite(&mut self.impression, &fragment.impression),
        );

        updated
    }
}
