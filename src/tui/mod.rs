pub mod event;
pub mod ui;

use chrono::{DateTime, Utc};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState as RListState;

use crate::clock::{update_clocks, ClockBoard};
use crate::deadlines::status::{days_left, parse_date, status};
use crate::deadlines::{build_rows, DeadlineRow, DeadlineStore, DragReorder, NodeBox, StoreError};
use crate::section::{SectionId, Sections};
use crate::storage::Storage;

// ─── Add Form ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Date,
}

impl FormField {
    pub fn toggle(self) -> Self {
        match self {
            Self::Title => Self::Date,
            Self::Date => Self::Title,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub open: bool,
    pub title: String,
    pub date: String,
    pub focus: FormField,
    /// Validation message shown under the inputs.
    pub error: Option<String>,
}

impl AddForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Date => &mut self.date,
        }
    }

    fn clear(&mut self) {
        self.title.clear();
        self.date.clear();
        self.focus = FormField::Title;
        self.error = None;
    }
}

// ─── Hit Areas ───────────────────────────────────────────────────────────────

/// Screen regions recorded by the last draw, used to route mouse events.
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub section_headers: Vec<(SectionId, Rect)>,
    pub list: Option<Rect>,
    /// Rendered deadline rows, top to bottom.
    pub rows: Vec<(i64, Rect)>,
    /// Width of the clickable remove affordance at the right edge of a row.
    pub remove_width: u16,
}

impl HitAreas {
    pub fn section_at(&self, column: u16, row: u16) -> Option<SectionId> {
        let pos = Position::new(column, row);
        self.section_headers
            .iter()
            .find(|(_, r)| r.contains(pos))
            .map(|(id, _)| *id)
    }

    /// Returns the deadline under the pointer and whether the pointer is on
    /// its remove affordance.
    pub fn row_at(&self, column: u16, row: u16) -> Option<(i64, bool)> {
        let pos = Position::new(column, row);
        self.rows.iter().find(|(_, r)| r.contains(pos)).map(|(id, r)| {
            let on_remove = column >= r.right().saturating_sub(self.remove_width);
            (*id, on_remove)
        })
    }

    pub fn node_boxes(&self) -> Vec<(i64, NodeBox)> {
        self.rows
            .iter()
            .map(|(id, r)| {
                (
                    *id,
                    NodeBox {
                        top: f64::from(r.y),
                        height: f64::from(r.height),
                    },
                )
            })
            .collect()
    }
}

/// Pointer position in row units, at the vertical middle of the cell.
pub fn pointer_y(row: u16) -> f64 {
    f64::from(row) + 0.5
}

// ─── App State ──────────────────────────────────────────────────────────────

pub struct App<S: Storage> {
    pub running: bool,

    pub board: ClockBoard,
    pub store: DeadlineStore<S>,
    /// Visible deadline order. Rebuilt from the store after every mutation.
    pub rows: Vec<DeadlineRow>,

    pub list_state: ListState,
    pub drag: DragReorder,
    pub sections: Sections,
    pub form: AddForm,
    pub hit: HitAreas,

    pub status_message: String,
}

/// Tracks logical selection plus a persistent ratatui scroll offset.
pub struct ListState {
    pub inner: RListState,
    pub selected: usize,
    pub len: usize,
}

impl ListState {
    pub fn new() -> Self {
        let mut inner = RListState::default();
        inner.select(Some(0));
        Self { inner, selected: 0, len: 0 }
    }

    /// Move down — clamped at the last item (no wrap-around).
    pub fn select_next(&mut self) {
        if self.len > 0 && self.selected + 1 < self.len {
            self.selected += 1;
        }
    }

    /// Move up — clamped at the first item (no wrap-around).
    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len && len > 0 {
            self.selected = len - 1;
        }
        if len == 0 {
            self.selected = 0;
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> App<S> {
    pub fn new(store: DeadlineStore<S>, now: DateTime<Utc>) -> Self {
        let mut app = Self {
            running: true,
            board: ClockBoard::new(),
            store,
            rows: Vec::new(),
            list_state: ListState::new(),
            drag: DragReorder::new(),
            sections: Sections::new(),
            form: AddForm::default(),
            hit: HitAreas::default(),
            status_message: String::new(),
        };
        app.tick(now);
        app.rebuild_rows(now);
        app.status_message = match app.store.len() {
            0 => "No deadlines yet. Press a to add one.".into(),
            n => format!("{n} deadlines loaded."),
        };
        app
    }

    /// Periodic refresh: clock hands and the days-left counters. Row order
    /// is left alone so an in-progress reorder is not lost.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let errors = update_clocks(&mut self.board, now);
        if let Some(err) = errors.first() {
            self.status_message = format!("Clock error: {err}");
        }
        for row in &mut self.rows {
            if let Some(date) = parse_date(&row.date) {
                row.days_left = days_left(date, now);
                row.tier = status(row.days_left);
            }
        }
    }

    /// Recomputes the visible list from the store, discarding any drag order.
    pub fn rebuild_rows(&mut self, now: DateTime<Utc>) {
        self.rows = build_rows(self.store.deadlines(), now);
        self.list_state.set_len(self.rows.len());
    }

    pub fn selected_row(&self) -> Option<&DeadlineRow> {
        self.rows.get(self.list_state.selected)
    }

    // ─── Sections ────────────────────────────────────────────────────────

    pub fn toggle_section(&mut self, id: SectionId) {
        self.sections.toggle(id);
        if id == SectionId::DeadlineTracker && !self.sections.is_expanded(id) {
            self.drag.end();
        }
    }

    // ─── Add / Remove ────────────────────────────────────────────────────

    pub fn open_form(&mut self) {
        if !self.sections.is_expanded(SectionId::DeadlineTracker) {
            self.sections.toggle(SectionId::DeadlineTracker);
        }
        self.form.clear();
        self.form.open = true;
    }

    pub fn close_form(&mut self) {
        self.form.open = false;
        self.form.error = None;
    }

    /// Submits the add form. Validation problems stay in the form; a
    /// successful add clears and closes it.
    pub fn submit_form(&mut self, now: DateTime<Utc>) {
        let title = self.form.title.clone();
        let date = self.form.date.clone();
        match self.store.add(&title, &date, now) {
            Ok(id) => {
                self.form.clear();
                self.form.open = false;
                self.rebuild_rows(now);
                if let Some(idx) = self.rows.iter().position(|r| r.id == id) {
                    self.list_state.selected = idx;
                }
                self.status_message = format!("Added \"{}\".", title.trim());
            }
            Err(e @ (StoreError::Storage(_) | StoreError::Encode(_))) => {
                tracing::error!(error = %e, "failed to persist new deadline");
                self.form.open = false;
                self.rebuild_rows(now);
                self.status_message = format!("Added, but could not save: {e}");
            }
            Err(e) => {
                tracing::info!(reason = %e, "rejected deadline submission");
                if matches!(e, StoreError::MissingDate | StoreError::InvalidDate(_)) {
                    self.form.focus = FormField::Date;
                } else {
                    self.form.focus = FormField::Title;
                }
                self.form.error = Some(e.to_string());
            }
        }
    }

    pub fn remove(&mut self, id: i64, now: DateTime<Utc>) {
        let title = self.store.get(id).map(|d| d.title.clone());
        match self.store.remove(id) {
            Ok(true) => {
                self.status_message = format!("Removed \"{}\".", title.unwrap_or_default());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, id, "failed to persist removal");
                self.status_message = format!("Removed, but could not save: {e}");
            }
        }
        if self.drag.is_dragging(id) {
            self.drag.end();
        }
        self.rebuild_rows(now);
    }

    pub fn remove_selected(&mut self, now: DateTime<Utc>) {
        if let Some(id) = self.selected_row().map(|r| r.id) {
            self.remove(id, now);
        }
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    pub fn start_drag(&mut self, id: i64) {
        if let Some(idx) = self.rows.iter().position(|r| r.id == id) {
            self.list_state.selected = idx;
            self.drag.start(id);
        }
    }

    /// Moves the dragged row under the pointer, keeping it selected.
    pub fn drag_to(&mut self, row: u16) {
        let nodes = self.hit.node_boxes();
        if self.drag.drag_over(&mut self.rows, &nodes, pointer_y(row)) {
            if let Some(idx) = self
                .drag
                .dragging()
                .and_then(|id| self.rows.iter().position(|r| r.id == id))
            {
                self.list_state.selected = idx;
            }
        }
    }

    pub fn end_drag(&mut self) {
        if self.drag.end().is_some() {
            self.status_message = "Order changed for this view only. Press r to re-sort.".into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStorage, MemoryStorage};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
    }

    fn app() -> App<MemoryStorage> {
        App::new(DeadlineStore::load(MemoryStorage::new()), now())
    }

    fn fill(app: &mut App<MemoryStorage>, title: &str, date: &str) {
        app.open_form();
        app.form.title = title.into();
        app.form.date = date.into();
        app.submit_form(now());
    }

    fn stack_rows(app: &mut App<MemoryStorage>) {
        app.hit.rows = app
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, Rect::new(0, 10 + i as u16 * 2, 40, 2)))
            .collect();
        app.hit.remove_width = 3;
    }

    #[test]
    fn starts_with_clocks_set_and_sections_collapsed() {
        let app = app();
        assert_eq!(app.board.face("london").unwrap().digital, "09:00");
        assert!(!app.sections.is_expanded(SectionId::WorldClocks));
        assert!(!app.sections.is_expanded(SectionId::DeadlineTracker));
    }

    #[test]
    fn submitting_adds_sorted_and_clears_form() {
        let mut app = app();
        fill(&mut app, "Late", "2030-06-01");
        fill(&mut app, "Soon", "2025-01-01");
        assert!(!app.form.open);
        assert!(app.form.title.is_empty() && app.form.date.is_empty());

        let titles: Vec<&str> = app.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Soon", "Late"]);
        assert_eq!(app.selected_row().unwrap().title, "Soon");
    }

    #[test]
    fn blank_submission_shows_a_message() {
        let mut app = app();
        fill(&mut app, "Title", "");
        assert!(app.form.open);
        assert_eq!(app.form.error.as_deref(), Some("Please pick a date"));
        assert_eq!(app.form.focus, FormField::Date);
        assert!(app.store.is_empty());
    }

    #[test]
    fn drag_reorders_only_the_view() {
        let mut app = app();
        fill(&mut app, "A", "2025-02-01");
        fill(&mut app, "B", "2025-03-01");
        fill(&mut app, "C", "2025-04-01");
        stack_rows(&mut app);

        let first = app.rows[0].id;
        app.start_drag(first);
        app.drag_to(30);
        app.end_drag();

        let titles: Vec<&str> = app.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["B", "C", "A"]);
        assert_eq!(app.list_state.selected, 2);

        app.rebuild_rows(now());
        let titles: Vec<&str> = app.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn hit_testing_finds_rows_and_remove_buttons() {
        let mut app = app();
        fill(&mut app, "A", "2025-02-01");
        stack_rows(&mut app);
        let id = app.rows[0].id;
        assert_eq!(app.hit.row_at(5, 10), Some((id, false)));
        assert_eq!(app.hit.row_at(38, 11), Some((id, true)));
        assert_eq!(app.hit.row_at(5, 12), None);
    }

    #[test]
    fn remove_selected_persists() {
        let mut app = app();
        fill(&mut app, "A", "2025-02-01");
        app.remove_selected(now());
        assert!(app.rows.is_empty());
        assert_eq!(
            app.store.storage().get(crate::deadlines::store::STORAGE_KEY).as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn tick_refreshes_days_left_without_reordering() {
        let mut app = app();
        fill(&mut app, "A", "2025-01-10");
        assert_eq!(app.rows[0].days_left, 9);
        app.tick(Utc.with_ymd_and_hms(2025, 1, 8, 9, 0, 0).unwrap());
        assert_eq!(app.rows[0].days_left, 2);
        assert_eq!(app.rows[0].tier, crate::deadlines::UrgencyTier::VeryUrgent);
    }

    #[test]
    fn failed_save_still_closes_the_form_and_says_so() {
        let mut app = App::new(DeadlineStore::load(FailingStorage), now());
        app.open_form();
        app.form.title = "Report".into();
        app.form.date = "2025-02-01".into();
        app.submit_form(now());

        assert!(!app.form.open);
        assert!(app.form.error.is_none());
        assert_eq!(app.rows.len(), 1);
        assert!(app.status_message.starts_with("Added, but could not save"));

        let id = app.rows[0].id;
        app.remove(id, now());
        assert!(app.rows.is_empty());
        assert!(app.status_message.starts_with("Removed, but could not save"));
    }
}
