#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    WorldClocks,
    DeadlineTracker,
}

impl SectionId {
    pub fn title(self) -> &'static str {
        match self {
            Self::WorldClocks => "World Clocks",
            Self::DeadlineTracker => "Deadline Tracker",
        }
    }
}

/// Expand/collapse state of the dashboard sections. Not persisted.
#[derive(Debug, Clone)]
pub struct Sections {
    world_clocks: bool,
    deadline_tracker: bool,
}

impl Sections {
    /// Every section starts collapsed.
    pub fn new() -> Self {
        Self {
            world_clocks: false,
            deadline_tracker: false,
        }
    }

    pub fn is_expanded(&self, id: SectionId) -> bool {
        match id {
            SectionId::WorldClocks => self.world_clocks,
            SectionId::DeadlineTracker => self.deadline_tracker,
        }
    }

    pub fn toggle(&mut self, id: SectionId) {
        let flag = match id {
            SectionId::WorldClocks => &mut self.world_clocks,
            SectionId::DeadlineTracker => &mut self.deadline_tracker,
        };
        *flag = !*flag;
        tracing::debug!(section = id.title(), expanded = *flag, "toggled section");
    }

    pub fn indicator(&self, id: SectionId) -> &'static str {
        if self.is_expanded(id) {
            "▾"
        } else {
            "▸"
        }
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collapsed() {
        let sections = Sections::new();
        for id in [SectionId::WorldClocks, SectionId::DeadlineTracker] {
            assert!(!sections.is_expanded(id));
            assert_eq!(sections.indicator(id), "▸");
        }
    }

    #[test]
    fn toggle_flips_only_that_section() {
        let mut sections = Sections::new();
        sections.toggle(SectionId::WorldClocks);
        assert!(sections.is_expanded(SectionId::WorldClocks));
        assert!(!sections.is_expanded(SectionId::DeadlineTracker));
        assert_eq!(sections.indicator(SectionId::WorldClocks), "▾");

        sections.toggle(SectionId::WorldClocks);
        assert!(!sections.is_expanded(SectionId::WorldClocks));
    }
}
