use super::colors::Color;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SectionName(String);

crate::impl_string_newtype!(SectionName);

/// A caller-supplied weighted slice of the ring.
///
/// The chart never writes to a section; interaction events hand the same
/// shared object back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<SectionName>,
}

impl Section {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            color: None,
            label: None,
            name: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<SectionName>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl AsRef<Section> for Section {
    fn as_ref(&self) -> &Section {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_deserialization() {
        let section: Section = serde_json::from_str(
            r##"{"value": 25, "color": "#abcdef", "label": "Used", "name": "disk"}"##,
        )
        .unwrap();

        assert_eq!(
            section,
            Section::new(25.0)
                .with_color(Color::from_rgb(0xab, 0xcd, 0xef))
                .with_label("Used")
                .with_name("disk")
        );

        let bare: Section = serde_json::from_str(r#"{"value": 10}"#).unwrap();
        assert_eq!(bare, Section::new(10.0));
    }

    #[test]
    fn test_section_serialization_skips_missing() {
        let json = serde_json::to_string(&Section::new(5.0)).unwrap();
        assert_eq!(json, r#"{"value":5.0}"#);
    }
}
