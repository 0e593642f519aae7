use crate::engine::FeatureLayer;
use crate::model::{format_property_value, non_empty_properties};
use geojson::{Feature, JsonObject};

pub const POPUP_HEADER: &str = "<b>Properties:</b><br>";
pub const LINE_BREAK: &str = "<br>";

/// Popup markup for a property mapping, in the mapping's own order.
/// Returns `None` for an empty mapping.
pub fn popup_content(properties: &JsonObject) -> Option<String> {
    if properties.is_empty() {
        return None;
    }

    let mut content = String::from(POPUP_HEADER);
    for (key, value) in properties {
        content.push_str(key);
        content.push_str(": ");
        content.push_str(&format_property_value(value));
        content.push_str(LINE_BREAK);
    }
    Some(content)
}

/// Feature hook binding a property popup; features without properties are left bare.
pub fn bind_property_popup(feature: &Feature, layer: &mut FeatureLayer) {
    if let Some(content) = non_empty_properties(feature).and_then(popup_content) {
        layer.bind_popup(content);
    }
}
