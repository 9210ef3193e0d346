use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use std::time::Duration;

use super::App;
use crate::section::SectionId;
use crate::storage::Storage;

pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_key<S: Storage>(
    app: &mut App<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
    now: DateTime<Utc>,
) {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (code, modifiers) {
        app.running = false;
        return;
    }

    // ── Add form intercepts all keys while open ───────────────────────
    if app.form.open {
        handle_form_key(app, code, now);
        return;
    }

    match code {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Char('c') => {
            app.toggle_section(SectionId::WorldClocks);
        }
        KeyCode::Char('t') => {
            app.toggle_section(SectionId::DeadlineTracker);
        }
        KeyCode::Char('a') => {
            app.open_form();
        }
        KeyCode::Char('r') => {
            app.rebuild_rows(now);
            app.status_message = "Sorted by date.".into();
        }
        _ if !app.sections.is_expanded(SectionId::DeadlineTracker) => {}
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_state.select_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_state.select_prev();
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.list_state.selected = 0;
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.list_state.select_last();
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            app.remove_selected(now);
        }
        _ => {}
    }
}

fn handle_form_key<S: Storage>(app: &mut App<S>, code: KeyCode, now: DateTime<Utc>) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(now),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.form.focus = app.form.focus.toggle();
        }
        KeyCode::Backspace => {
            app.form.focused_mut().pop();
        }
        KeyCode::Char(c) => {
            app.form.focused_mut().push(c);
            app.form.error = None;
        }
        _ => {}
    }
}

pub fn handle_mouse<S: Storage>(app: &mut App<S>, mouse: MouseEvent, now: DateTime<Utc>) {
    if app.form.open {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(section) = app.hit.section_at(mouse.column, mouse.row) {
                app.toggle_section(section);
                return;
            }
            match app.hit.row_at(mouse.column, mouse.row) {
                Some((id, true)) => app.remove(id, now),
                Some((id, false)) => app.start_drag(id),
                None => {}
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let in_list = app
                .hit
                .list
                .is_some_and(|r| r.contains(Position::new(mouse.column, mouse.row)));
            if in_list {
                app.drag_to(mouse.row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        MouseEventKind::ScrollDown => app.list_state.select_next(),
        MouseEventKind::ScrollUp => app.list_state.select_prev(),
        _ => {}
    }
}
