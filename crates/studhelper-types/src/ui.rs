//! Overlay names used by the UI store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Modals the application can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModalName {
    #[serde(rename = "CreateClassModal")]
    CreateClass,
    #[serde(rename = "ClassSettingsModal")]
    ClassSettings,
    #[serde(rename = "DocumentUploadModal")]
    DocumentUpload,
}

impl fmt::Display for ModalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateClass => "CreateClassModal",
            Self::ClassSettings => "ClassSettingsModal",
            Self::DocumentUpload => "DocumentUploadModal",
        })
    }
}

/// Slide-out panels the application can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideOutName {
    #[serde(rename = "ClassInfoPanel")]
    ClassInfo,
    #[serde(rename = "UserSettingsPanel")]
    UserSettings,
    #[serde(rename = "QuickUsagePanel")]
    QuickUsage,
}

impl fmt::Display for SlideOutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ClassInfo => "ClassInfoPanel",
            Self::UserSettings => "UserSettingsPanel",
            Self::QuickUsage => "QuickUsagePanel",
        })
    }
}

/// An open overlay: its name plus arbitrary JSON props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay<N> {
    pub name: N,
    pub props: serde_json::Value,
}

impl<N> Overlay<N> {
    /// Creates an overlay; `null` props are normalised to an empty object.
    pub fn new(name: N, props: serde_json::Value) -> Self {
        let props = if props.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            props
        };
        Self { name, props }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_serialize_as_component_names() {
        assert_eq!(
            serde_json::to_string(&ModalName::CreateClass).unwrap(),
            "\"CreateClassModal\""
        );
        assert_eq!(SlideOutName::QuickUsage.to_string(), "QuickUsagePanel");
    }

    #[test]
    fn test_overlay_null_props_become_empty_object() {
        let overlay = Overlay::new(ModalName::ClassSettings, serde_json::Value::Null);
        assert_eq!(overlay.props, serde_json::json!({}));
    }
}
