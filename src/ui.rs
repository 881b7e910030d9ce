use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;
use wordfall::session::Status;
use wordfall::spawner::FIELD_WIDTH;
use wordfall::word::FallingWord;

use crate::App;

// Words past these fractions of the floor height turn yellow then red.
const WARNING_ZONE: f64 = 0.5;
const DANGER_ZONE: f64 = 0.75;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(self, chunks[0], buf);
        render_field(self, chunks[1], buf);
        render_input(self, chunks[2], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mistakes_style = if session.mistakes_remaining <= 1 {
        bold.fg(Color::Red)
    } else if session.mistakes_remaining * 2 <= session.mistakes_allowed {
        bold.fg(Color::Yellow)
    } else {
        bold.fg(Color::Green)
    };

    let mut spans = vec![
        Span::styled(format!(" score {}", session.score), bold.fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(format!("level {}", session.level), bold.fg(Color::Magenta)),
        Span::raw("  "),
        Span::styled(
            format!(
                "mistakes {}/{}",
                session.mistakes_remaining, session.mistakes_allowed
            ),
            mistakes_style,
        ),
        Span::raw("  "),
        Span::raw(format!("category {}", session.category())),
        Span::raw("  "),
        Span::raw(format!("player {}", app.player)),
    ];
    if let Some(best) = app.best_score {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("best {}", best), bold));
    }

    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("wordfall"))
        .render(area, buf);
}

fn render_field(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let floor = app.session.floor_height();
    let sorted = app
        .session
        .active_words()
        .iter()
        .sorted_by(|a, b| {
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .collect::<Vec<_>>();

    for word in sorted {
        if let Some((col, row, style)) = place_word(word, floor, inner) {
            buf.set_string(inner.x + col, inner.y + row, &word.text, style);
        }
    }

    match app.session.status() {
        Status::Ready => render_overlay(
            &["w o r d f a l l", "", "press any key to start"],
            inner,
            buf,
        ),
        Status::Paused => render_overlay(
            &["paused", "", "tab resumes · c changes category"],
            inner,
            buf,
        ),
        Status::GameOver => render_overlay(
            &[
                "GAME OVER",
                "",
                &format!(
                    "final score {}  ·  level {}",
                    app.session.score, app.session.level
                ),
                "",
                "r replay · c next category · esc quit",
            ],
            inner,
            buf,
        ),
        Status::Running => {}
    }
}

/// Map a word's logical coordinates onto a terminal cell. Words still above
/// the visible area produce nothing.
fn place_word(word: &FallingWord, floor: f64, inner: Rect) -> Option<(u16, u16, Style)> {
    if word.position < 0.0 {
        return None;
    }

    let word_width = word.text.width().min(inner.width as usize) as u16;
    let max_col = inner.width - word_width;
    let col = ((word.x / FIELD_WIDTH) * max_col as f64).round() as u16;

    let max_row = inner.height - 1;
    let row = ((word.position / floor) * max_row as f64).round() as u16;

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let style = if word.position > floor * DANGER_ZONE {
        bold.fg(Color::Red)
    } else if word.position > floor * WARNING_ZONE {
        bold.fg(Color::Yellow)
    } else {
        bold
    };

    Some((col.min(max_col), row.min(max_row), style))
}

fn render_overlay(lines: &[&str], inner: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    if inner.height < height {
        return;
    }
    let overlay = Rect {
        x: inner.x,
        y: inner.y + (inner.height - height) / 2,
        width: inner.width,
        height,
    };
    let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
    Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .render(overlay, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let style = match app.session.status() {
        Status::Running => Style::default(),
        _ => Style::default().add_modifier(Modifier::DIM),
    };
    Paragraph::new(format!("> {}", app.typed))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("type a word"))
        .render(area, buf);
}
