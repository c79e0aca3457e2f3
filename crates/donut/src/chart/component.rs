use super::colors::{Color, ColorPalette};
use super::hover::HoverCoordinator;
use super::layout::{self, Arc, InvalidInputError};
use super::legend::{self, LegendItem, LegendPlacement};
use super::resize::{ListenerId, ResizeBus};
use super::section::Section;
use super::text::{FontSize, Measure, TextSizer};
use super::{
    DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_SIZE, DEFAULT_THICKNESS, DEFAULT_UNIT,
    MAX_THICKNESS,
};
use async_channel::Sender;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// CSS length unit for the ring size (`px`, `%`, `em`, ...).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Unit(String);

crate::impl_string_newtype!(Unit);

impl Default for Unit {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonutProps {
    pub sections: Vec<Rc<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub size: f64,
    pub unit: Unit,
    pub thickness: f64,
    pub background: Color,
    pub foreground: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub has_legend: bool,
    pub legend_placement: LegendPlacement,
    pub start_angle: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_hover_class: Option<String>,
    pub palette: Vec<Color>,
}

impl Default for DonutProps {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            total: None,
            size: DEFAULT_SIZE,
            unit: Unit::default(),
            thickness: DEFAULT_THICKNESS,
            background: DEFAULT_BACKGROUND,
            foreground: DEFAULT_FOREGROUND,
            text: None,
            has_legend: false,
            legend_placement: LegendPlacement::default(),
            start_angle: 0.0,
            section_hover_class: None,
            palette: Vec::new(),
        }
    }
}

impl DonutProps {
    pub fn with_sections<I>(mut self, sections: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Rc<Section>>,
    {
        self.sections = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(InvalidInputError::NonPositiveSize(self.size));
        }
        if !(0.0..=MAX_THICKNESS).contains(&self.thickness) {
            return Err(InvalidInputError::ThicknessOutOfRange(self.thickness));
        }
        layout::validate(&self.sections, self.total)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum DonutEvent {
    SectionClick(Rc<Section>),
}

/// What a pointer is over: an arc by its position in the arc list, or a legend
/// entry by section index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Arc(usize),
    Legend(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropsChange {
    pub relayout: bool,
    pub remeasure: bool,
}

impl PropsChange {
    pub fn new(relayout: bool, remeasure: bool) -> Self {
        Self {
            relayout,
            remeasure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcView<'a> {
    pub arc: &'a Arc,
    pub hovered: bool,
    pub class: Option<&'a str>,
}

/// A mounted ring chart.
pub struct Donut {
    props: DonutProps,
    palette: ColorPalette,
    arcs: Vec<Arc>,
    hover: HoverCoordinator,
    text: TextSizer,
    measure: Box<dyn Measure>,
    events: Sender<DonutEvent>,
}

impl Donut {
    pub fn mount(
        props: DonutProps,
        measure: Box<dyn Measure>,
        bus: &ResizeBus,
        events: Sender<DonutEvent>,
    ) -> Result<Self, InvalidInputError> {
        props.validate()?;
        let palette = ColorPalette::new(props.palette.clone());
        let arcs = layout::normalize_with(&props.sections, props.total, &palette)?;
        let hover = HoverCoordinator::new(props.sections.len());

        let mut text = TextSizer::new();
        text.mount(measure.as_ref(), bus);

        log::debug!(
            "mounted donut with {} sections, {} arcs",
            props.sections.len(),
            arcs.len()
        );

        Ok(Self {
            props,
            palette,
            arcs,
            hover,
            text,
            measure,
            events,
        })
    }

    /// Replaces every prop at once. On error nothing changes.
    pub fn set_props(&mut self, props: DonutProps) -> Result<PropsChange, InvalidInputError> {
        props.validate()?;

        let relayout = props.sections != self.props.sections
            || props.total != self.props.total
            || props.palette != self.props.palette;
        let remeasure = props.size != self.props.size || props.unit != self.props.unit;

        if relayout {
            let palette = ColorPalette::new(props.palette.clone());
            self.arcs = layout::normalize_with(&props.sections, props.total, &palette)?;
            self.palette = palette;
            if props.sections.len() != self.hover.len() {
                self.hover.reset(props.sections.len());
            }
        }

        self.props = props;

        if remeasure {
            self.text.layout_changed(self.measure.as_ref());
        }

        Ok(PropsChange::new(relayout, remeasure))
    }

    pub fn set_sections<I>(&mut self, sections: I) -> Result<PropsChange, InvalidInputError>
    where
        I: IntoIterator,
        I::Item: Into<Rc<Section>>,
    {
        let props = self.props.clone().with_sections(sections);
        self.set_props(props)
    }

    pub fn set_total(&mut self, total: Option<f64>) -> Result<PropsChange, InvalidInputError> {
        let mut props = self.props.clone();
        props.total = total;
        self.set_props(props)
    }

    pub fn props(&self) -> &DonutProps {
        &self.props
    }

    pub fn sections(&self) -> &[Rc<Section>] {
        &self.props.sections
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn hover(&self) -> &HoverCoordinator {
        &self.hover
    }

    pub fn font_size(&self) -> FontSize {
        self.text.font_size()
    }

    pub fn recalc_count(&self) -> usize {
        self.text.recalc_count()
    }

    pub fn resize_listener(&self) -> Option<ListenerId> {
        self.text.subscription().map(|s| s.id())
    }

    fn section_index(&self, target: HoverTarget) -> Option<usize> {
        match target {
            HoverTarget::Arc(pos) => self.arcs.get(pos).map(|arc| arc.source_index),
            HoverTarget::Legend(index) => (index < self.props.sections.len()).then_some(index),
        }
    }

    fn set_hover(&mut self, target: HoverTarget, hovered: bool) -> bool {
        match self.section_index(target) {
            Some(index) => self.hover.set_hover(index, hovered),
            None => {
                log::debug!("no section behind {:?}", target);
                false
            }
        }
    }

    /// Returns whether any view needs a redraw.
    pub fn pointer_enter(&mut self, target: HoverTarget) -> bool {
        self.set_hover(target, true)
    }

    pub fn pointer_leave(&mut self, target: HoverTarget) -> bool {
        self.set_hover(target, false)
    }

    /// Emits `SectionClick` with the caller's own section object.
    pub fn click(&self, target: HoverTarget) -> Option<Rc<Section>> {
        let section = self
            .section_index(target)
            .and_then(|i| self.props.sections.get(i))
            .cloned()?;

        if let Err(e) = self
            .events
            .try_send(DonutEvent::SectionClick(section.clone()))
        {
            log::warn!("section click not delivered: {}", e);
        }
        Some(section)
    }

    /// Applies window resizes delivered since the last call.
    pub fn handle_resize(&mut self) -> bool {
        self.text.poll_resize(self.measure.as_ref())
    }

    pub fn arc_views(&self) -> Vec<ArcView<'_>> {
        let hover_class = self.props.section_hover_class.as_deref();
        self.arcs
            .iter()
            .map(|arc| ArcView {
                arc,
                hovered: self.hover.is_hovered(arc.source_index),
                class: self.hover.class_for(arc.source_index, hover_class),
            })
            .collect()
    }

    pub fn legend(&self) -> Option<Vec<LegendItem>> {
        self.props.has_legend.then(|| {
            legend::items(
                &self.props.sections,
                &self.palette,
                &self.hover,
                self.props.section_hover_class.as_deref(),
            )
        })
    }

    pub fn css_size(&self) -> String {
        format!("{}{}", self.props.size, self.props.unit)
    }

    /// Size of the hole relative to the ring, in percent.
    pub fn overlay_size_percent(&self) -> f64 {
        MAX_THICKNESS - self.props.thickness
    }

    pub fn rotation(&self) -> String {
        format!("rotate({}deg)", self.props.start_angle)
    }

    pub fn center_text(&self) -> Option<&str> {
        self.props.text.as_deref()
    }

    pub fn unmount(mut self) {
        self.text.unmount();
        self.hover.reset(0);
        log::debug!("unmounted donut");
    }
}
