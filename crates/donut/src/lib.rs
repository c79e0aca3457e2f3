pub mod chart;
pub mod macros;

pub use chart::colors::{Color, ColorPalette};
pub use chart::component::{Donut, DonutEvent, DonutProps, HoverTarget, PropsChange};
pub use chart::layout::{Arc, InvalidInputError, normalize};
pub use chart::section::Section;
