use serde::{Deserialize, Serialize};

/// Styling requested for a loaded layer.
///
/// Every field is optional. A field left as `None` is filled in by the
/// geometry renderer's own defaults, never by [`StyleDescriptor::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

/// Applied when a load is issued without a style.
impl Default for StyleDescriptor {
    fn default() -> Self {
        StyleDescriptor {
            color: Some("#3388ff".to_string()),
            weight: Some(2.0),
            opacity: Some(0.8),
            fill_color: Some("#3388ff".to_string()),
            fill_opacity: Some(0.4),
        }
    }
}

impl StyleDescriptor {
    /// A descriptor with no fields set.
    pub fn empty() -> Self {
        StyleDescriptor {
            color: None,
            weight: None,
            opacity: None,
            fill_color: None,
            fill_opacity: None,
        }
    }

    /// The provided descriptor, or the default one. No field-level merge.
    pub fn effective(style: Option<StyleDescriptor>) -> StyleDescriptor {
        style.unwrap_or_default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    pub fn with_fill_color(mut self, fill_color: impl Into<String>) -> Self {
        self.fill_color = Some(fill_color.into());
        self
    }

    pub fn with_fill_opacity(mut self, fill_opacity: f64) -> Self {
        self.fill_opacity = Some(fill_opacity.clamp(0.0, 1.0));
        self
    }
}
