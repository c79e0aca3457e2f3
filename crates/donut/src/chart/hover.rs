/// One hover flag per logical section index, shared by the arc view and the
/// legend view of a chart instance.
///
/// Split sections own two arcs but a single flag, so both arcs and the legend
/// entry always highlight together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverCoordinator {
    flags: Vec<bool>,
}

impl HoverCoordinator {
    pub fn new(section_count: usize) -> Self {
        Self {
            flags: vec![false; section_count],
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns whether the flag changed. Indices past the end are ignored.
    pub fn set_hover(&mut self, index: usize, hovered: bool) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) => {
                let changed = *flag != hovered;
                *flag = hovered;
                changed
            }
            None => {
                log::debug!(
                    "ignoring hover on section {} ({} sections)",
                    index,
                    self.flags.len()
                );
                false
            }
        }
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// The class a view at `index` should carry right now.
    pub fn class_for<'a>(&self, index: usize, hover_class: Option<&'a str>) -> Option<&'a str> {
        hover_class.filter(|_| self.is_hovered(index))
    }

    pub fn hovered_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, &h)| h.then_some(i))
    }

    /// Clears every flag and resizes the table for a new section count.
    pub fn reset(&mut self, section_count: usize) {
        self.flags.clear();
        self.flags.resize(section_count, false);
    }
}
