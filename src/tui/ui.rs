use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Clear, List, ListItem, Paragraph,
    },
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{App, FormField, HitAreas};
use crate::clock::hand_tip;
use crate::deadlines::list::days_left_label;
use crate::deadlines::UrgencyTier;
use crate::models::{ClockFace, HandRole};
use crate::section::SectionId;
use crate::storage::Storage;
use crate::zones::TIME_ZONES;
use chrono::Local;

const ACCENT: Color = Color::Cyan;
const HEADER_BG: Color = Color::DarkGray;
const SELECTED_BG: Color = Color::Rgb(40, 40, 60);
const DRAGGING_BG: Color = Color::Rgb(60, 42, 0);
const DIM: Color = Color::DarkGray;
const GOOD: Color = Color::Green;
const WARN: Color = Color::Yellow;
const ORANGE: Color = Color::Rgb(255, 140, 0);
const BAD: Color = Color::Red;

const CLOCK_HEIGHT: u16 = 12;
/// Terminal lines per deadline row.
const ROW_HEIGHT: u16 = 2;
const REMOVE_LABEL: &str = " [x]";

// ─── Main render ────────────────────────────────────────────────────────────

pub fn render<S: Storage>(f: &mut Frame, app: &mut App<S>) {
    app.hit = HitAreas {
        remove_width: REMOVE_LABEL.width() as u16,
        ..HitAreas::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_body(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if app.form.open {
        render_form(f, app);
    }
}

fn render_body<S: Storage>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let clocks_open = app.sections.is_expanded(SectionId::WorldClocks);
    let tracker_open = app.sections.is_expanded(SectionId::DeadlineTracker);

    let mut constraints = vec![Constraint::Length(1)];
    if clocks_open {
        constraints.push(Constraint::Length(CLOCK_HEIGHT));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    render_section_header(f, app, SectionId::WorldClocks, chunks[next]);
    next += 1;
    if clocks_open {
        render_clocks(f, app, chunks[next]);
        next += 1;
    }
    render_section_header(f, app, SectionId::DeadlineTracker, chunks[next]);
    next += 1;
    if tracker_open {
        render_deadlines(f, app, chunks[next]);
    }
}

// ─── Title Bar ──────────────────────────────────────────────────────────────

fn render_title(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(Span::styled(
            " Clockboard ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        area,
    );

    let time_str = format!(" {} ", Local::now().format("%a %b %d  %H:%M:%S"));
    let clock_width = time_str.len() as u16;
    let clock_area = Rect {
        x: area.right().saturating_sub(clock_width),
        y: area.y,
        width: clock_width.min(area.width),
        height: 1,
    };
    f.render_widget(
        Paragraph::new(time_str).style(Style::default().fg(ACCENT)),
        clock_area,
    );
}

// ─── Section Headers ────────────────────────────────────────────────────────

fn render_section_header<S: Storage>(f: &mut Frame, app: &mut App<S>, id: SectionId, area: Rect) {
    let key = match id {
        SectionId::WorldClocks => "c",
        SectionId::DeadlineTracker => "t",
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app.sections.indicator(id)),
            Style::default().fg(ACCENT),
        ),
        Span::styled(
            id.title(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ({key})"), Style::default().fg(DIM)),
    ]));
    f.render_widget(header, area);
    app.hit.section_headers.push((id, area));
}

// ─── Clocks ─────────────────────────────────────────────────────────────────

fn render_clocks<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(TIME_ZONES.map(|_| Constraint::Ratio(1, TIME_ZONES.len() as u32)))
        .split(area);

    for (zone, column) in TIME_ZONES.iter().zip(columns.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", zone.label))
            .title_style(Style::default().fg(ACCENT));
        let inner = block.inner(*column);
        f.render_widget(block, *column);

        let Some(face) = app.board.face(zone.city_id) else {
            f.render_widget(
                Paragraph::new("  clock unavailable").style(Style::default().fg(BAD)),
                inner,
            );
            continue;
        };

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        draw_face(f, face, parts[0]);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                face.digital.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            parts[1],
        );
    }
}

fn draw_face(f: &mut Frame, face: &ClockFace, area: Rect) {
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.2, 1.2])
        .y_bounds([-1.2, 1.2])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                color: DIM,
            });
            for hour in 0..12 {
                let (x1, y1) = hand_tip(f64::from(hour) * 30.0, 0.9);
                let (x2, y2) = hand_tip(f64::from(hour) * 30.0, 1.0);
                ctx.draw(&CanvasLine { x1, y1, x2, y2, color: DIM });
            }
            for hand in &face.hands {
                let (length, color) = match hand.role {
                    HandRole::Hour => (0.5, Color::White),
                    HandRole::Minute => (0.8, ACCENT),
                    HandRole::Second => (0.9, BAD),
                };
                let (x2, y2) = hand_tip(hand.rotation, length);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2,
                    y2,
                    color,
                });
            }
        });
    f.render_widget(canvas, area);
}

// ─── Deadlines ──────────────────────────────────────────────────────────────

fn tier_color(tier: UrgencyTier) -> Color {
    match tier {
        UrgencyTier::VeryUrgent => BAD,
        UrgencyTier::Urgent => ORANGE,
        UrgencyTier::Warning => WARN,
        UrgencyTier::Safe => GOOD,
    }
}

/// Cuts `s` to at most `width` columns.
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn render_deadlines<S: Storage>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Deadlines ({}) ", app.rows.len()))
        .title_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    app.hit.list = Some(area);

    if app.rows.is_empty() {
        f.render_widget(
            Paragraph::new("  No deadlines. Press a to add one.").block(block),
            area,
        );
        return;
    }

    let width = inner.width as usize;
    let remove_width = REMOVE_LABEL.width();
    let title_width = width.saturating_sub(2 + remove_width);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_selected = i == app.list_state.selected;
            let is_dragging = app.drag.is_dragging(row.id);
            let bg = if is_dragging {
                DRAGGING_BG
            } else if is_selected {
                SELECTED_BG
            } else {
                Color::Reset
            };
            let marker = if is_dragging {
                "≡ "
            } else if is_selected {
                "> "
            } else {
                "  "
            };

            let title = truncate(&row.title, title_width);
            let pad = title_width.saturating_sub(title.width());
            let color = tier_color(row.tier);

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(ACCENT).bg(bg)),
                    Span::styled(
                        title,
                        Style::default()
                            .fg(Color::White)
                            .bg(bg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" ".repeat(pad), Style::default().bg(bg)),
                    Span::styled(REMOVE_LABEL, Style::default().fg(BAD).bg(bg)),
                ]),
                Line::from(vec![
                    Span::styled(
                        format!("  Date: {}", row.display_date),
                        Style::default().fg(DIM).bg(bg),
                    ),
                    Span::styled(
                        format!("  {}", days_left_label(row.days_left)),
                        Style::default().fg(color).bg(bg),
                    ),
                    Span::styled(
                        format!("  {}", row.tier.as_str()),
                        Style::default().fg(color).bg(bg).add_modifier(Modifier::DIM),
                    ),
                ]),
            ])
        })
        .collect();

    let list = List::new(items).block(block);
    app.list_state.inner.select(Some(app.list_state.selected));
    f.render_stateful_widget(list, area, &mut app.list_state.inner);

    let offset = app.list_state.inner.offset();
    let visible = (inner.height / ROW_HEIGHT) as usize;
    app.hit.rows = app
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, row)| {
            let top = inner.y + (i - offset) as u16 * ROW_HEIGHT;
            (row.id, Rect::new(inner.x, top, inner.width, ROW_HEIGHT))
        })
        .collect();
}

// ─── Add Form ───────────────────────────────────────────────────────────────

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form<S: Storage>(f: &mut Frame, app: &App<S>) {
    let area = centered(f.area(), 56, 8);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New deadline ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);

    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::White).bg(SELECTED_BG)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::styled(
                format!(" {label:<7}"),
                Style::default().fg(if focused { ACCENT } else { DIM }),
            ),
            Span::styled(value.to_string(), style),
        ])
    };

    let form = &app.form;
    let mut lines = vec![
        field("Title", &form.title, form.focus == FormField::Title),
        field("Date", &form.date, form.focus == FormField::Date),
        Line::from(Span::styled("        YYYY-MM-DD", Style::default().fg(DIM))),
    ];
    lines.push(match &form.error {
        Some(err) => Line::from(Span::styled(format!(" {err}"), Style::default().fg(BAD))),
        None => Line::from(""),
    });
    lines.push(Line::from(Span::styled(
        " Enter: add  Tab: switch field  Esc: cancel",
        Style::default().fg(DIM),
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);

    let (value, line) = match form.focus {
        FormField::Title => (&form.title, 0),
        FormField::Date => (&form.date, 1),
    };
    let x = inner.x + 8 + value.width() as u16;
    if x < inner.right() {
        f.set_cursor_position((x, inner.y + line));
    }
}

// ─── Status Bar ─────────────────────────────────────────────────────────────

fn render_status_bar<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status_message, Style::default().fg(Color::White)),
        Span::styled(
            "  q:quit  c/t:sections  a:add  d:remove  j/k:nav  r:re-sort  drag:reorder  ",
            Style::default().fg(DIM),
        ),
    ]))
    .style(Style::default().bg(HEADER_BG));

    f.render_widget(status, area);
}
