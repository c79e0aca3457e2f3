use super::colors::{Color, ColorPalette};
use super::hover::HoverCoordinator;
use super::section::Section;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LegendPlacement {
    Top,
    #[default]
    Right,
    Bottom,
    Left,
}

impl LegendPlacement {
    /// Whether the legend stacks above/below the ring rather than beside it.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

pub fn default_label(index: usize) -> String {
    format!("Section {}", index + 1)
}

/// One legend row per section, regardless of how many arcs it was split into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub index: usize,
    pub label: String,
    pub color: Color,
    pub hovered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

pub fn items<S: AsRef<Section>>(
    sections: &[S],
    palette: &ColorPalette,
    hover: &HoverCoordinator,
    hover_class: Option<&str>,
) -> Vec<LegendItem> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let section: &Section = section.as_ref();
            LegendItem {
                index: i,
                label: section
                    .label
                    .clone()
                    .unwrap_or_else(|| default_label(i)),
                color: palette.resolve(section.color, i),
                hovered: hover.is_hovered(i),
                class: hover.class_for(i, hover_class).map(str::to_string),
            }
        })
        .collect()
}
