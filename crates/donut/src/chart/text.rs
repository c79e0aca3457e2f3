use super::FONT_SCALE;
use super::resize::{ResizeBus, ResizeSubscription};
use serde::Serialize;
use std::fmt;

/// Reports the realized pixel width of the element hosting the chart.
///
/// `None` means the element cannot be measured yet (e.g. not attached).
pub trait Measure {
    fn client_width(&self) -> Option<f64>;
}

impl<F> Measure for F
where
    F: Fn() -> Option<f64>,
{
    fn client_width(&self) -> Option<f64> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct FontSize(f64);

impl FontSize {
    pub fn px(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}px", self.0)
    }
}

/// Center label size for a container of the given width.
pub fn recalc(container_width_px: f64) -> FontSize {
    let width = if container_width_px.is_finite() {
        container_width_px.max(0.0)
    } else {
        0.0
    };
    FontSize(width * FONT_SCALE)
}

fn measured_width(measure: &dyn Measure) -> f64 {
    measure.client_width().unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizerState {
    Unmounted,
    Mounted,
    Listening,
}

/// Keeps the center font size in step with the container's measured width.
pub struct TextSizer {
    state: SizerState,
    font_size: FontSize,
    subscription: Option<ResizeSubscription>,
    recalc_count: usize,
}

impl Default for TextSizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSizer {
    pub fn new() -> Self {
        Self {
            state: SizerState::Unmounted,
            font_size: FontSize::default(),
            subscription: None,
            recalc_count: 0,
        }
    }

    pub fn state(&self) -> SizerState {
        self.state
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn recalc_count(&self) -> usize {
        self.recalc_count
    }

    pub fn subscription(&self) -> Option<&ResizeSubscription> {
        self.subscription.as_ref()
    }

    /// Measures once, then starts listening for window resizes.
    pub fn mount(&mut self, measure: &dyn Measure, bus: &ResizeBus) {
        if self.state != SizerState::Unmounted {
            log::debug!("text sizer already mounted");
            return;
        }
        self.recalc(measure);
        self.state = SizerState::Mounted;

        self.subscription = Some(bus.subscribe());
        self.state = SizerState::Listening;
    }

    /// Size or unit changed.
    pub fn layout_changed(&mut self, measure: &dyn Measure) {
        if self.state != SizerState::Unmounted {
            self.recalc(measure);
        }
    }

    /// Applies pending window resizes. Returns whether any were handled.
    pub fn poll_resize(&mut self, measure: &dyn Measure) -> bool {
        let pending = self
            .subscription
            .as_ref()
            .map(ResizeSubscription::drain)
            .unwrap_or_default();

        for viewport in &pending {
            log::trace!("window resized to {}x{}", viewport.width, viewport.height);
            self.recalc(measure);
        }
        !pending.is_empty()
    }

    /// Stops listening. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.subscription = None;
        self.state = SizerState::Unmounted;
    }

    fn recalc(&mut self, measure: &dyn Measure) {
        self.font_size = recalc(measured_width(measure));
        self.recalc_count += 1;
        log::trace!("center font size is now {}", self.font_size);
    }
}
