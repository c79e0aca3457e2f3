pub mod colors;
pub mod component;
pub mod hover;
pub mod layout;
pub mod legend;
pub mod resize;
pub mod section;
pub mod text;

pub use colors::{Color, ColorPalette};
pub use component::{ArcView, Donut, DonutEvent, DonutProps, HoverTarget, PropsChange, Unit};
pub use hover::HoverCoordinator;
pub use layout::{Arc, InvalidInputError};
pub use legend::{LegendItem, LegendPlacement};
pub use resize::{ResizeBus, ResizeSubscription, Viewport};
pub use section::{Section, SectionName};
pub use text::{FontSize, Measure, SizerState, TextSizer};

pub const FULL_CIRCLE_DEG: f64 = 360.0;
pub const HALF_CIRCLE_DEG: f64 = 180.0;

pub const DEFAULT_SIZE: f64 = 250.0;
pub const DEFAULT_UNIT: &str = "px";
pub const DEFAULT_THICKNESS: f64 = 20.0; // percent of the ring radius
pub const MAX_THICKNESS: f64 = 100.0;
pub const DEFAULT_BACKGROUND: Color = Color::from_rgb(0xff, 0xff, 0xff); // hole
pub const DEFAULT_FOREGROUND: Color = Color::from_rgb(0xee, 0xee, 0xee); // empty ring
pub const FONT_SCALE: f64 = 0.08; // center text px per container px
