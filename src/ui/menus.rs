use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{to_color, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::highscore::TOP_LIMIT;
use crate::menu::{HighscoreMenu, Menu, MenuKind};

const MARKER: &str = "● ";

/// Style of a menu row; highlighting is derived from the selected index only.
pub fn entry_style(index: usize, selected: usize) -> Style {
    if index == selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn entry_line(label: String, index: usize, selected: usize) -> Line<'static> {
    let marker = if index == selected {
        Span::styled(MARKER, Style::default().fg(Color::Blue))
    } else {
        Span::raw("  ")
    };
    Line::from(vec![marker, Span::styled(label, entry_style(index, selected))])
}

pub fn render_menu(
    menu: &dyn Menu,
    kind: MenuKind,
    highscores: &HighscoreMenu,
    area: Rect,
    buf: &mut Buffer,
) {
    let labels = menu.labels();
    let ranking_lines = if kind == MenuKind::Highscores {
        TOP_LIMIT as u16 + 1
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(labels.len() as u16 + 1),
            Constraint::Length(ranking_lines),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        menu.title().to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let selected = menu.selected_index();
    let entries: Vec<Line> = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| entry_line(label, i, selected))
        .collect();
    Paragraph::new(entries)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if kind == MenuKind::Highscores {
        let rows: Vec<Line> = highscores
            .ranking()
            .into_iter()
            .enumerate()
            .map(|(rank, text)| {
                let style = HighscoreMenu::rank_color(rank)
                    .map(|c| Style::default().fg(to_color(c)).add_modifier(Modifier::BOLD))
                    .unwrap_or_else(|| Style::default().fg(Color::White));
                Line::from(Span::styled(text, style))
            })
            .collect();
        Paragraph::new(rows)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled(
        "↑/↓ select   ←/→ change stage   enter confirm   ctrl+c quit",
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[3], buf);
}
