use donut::chart::{HoverTarget, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    ConfigReload,
    Resize(Viewport),
    Enter(HoverTarget),
    Leave(HoverTarget),
    Click(HoverTarget),
    Quit,
}
