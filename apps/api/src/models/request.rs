use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::lenient::{opt_points, opt_string};

/// Body of a generate request, as sent by the editor.
///
/// `data` is an older form-post shape: the whole request serialized into a
/// single JSON string. When present it wins over everything else.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub resume_data: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "opt_string")]
    pub template: Option<String>,
    #[serde(default)]
    pub design_settings: Option<Value>,
    #[serde(default, deserialize_with = "opt_string")]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub file_name: Option<String>,
}

/// Visual parameters passed alongside the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSettings {
    #[serde(default, deserialize_with = "opt_string")]
    pub font: Option<String>,
    #[serde(default, deserialize_with = "opt_points")]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub colors: ColorSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSettings {
    #[serde(default, deserialize_with = "opt_string")]
    pub primary: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub secondary: Option<String>,
}

impl DesignSettings {
    /// Decodes design settings, falling back to defaults for anything
    /// unusable.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(v @ Value::Object(_)) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed designSettings: {e}");
                DesignSettings::default()
            }),
            _ => DesignSettings::default(),
        }
    }
}
