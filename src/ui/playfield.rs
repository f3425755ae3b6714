use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use unicode_width::UnicodeWidthStr;

use super::to_color;
use crate::session::{Phase, Session, Snapshot};
use crate::stage::DustShape;

const HEART: &str = "♥ ";
const LIMIT_GLYPH: &str = "│";
const PARTICLE_GLYPH: &str = "*";

/// Maps logical y-up playfield coordinates onto terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    area: Rect,
    width: f64,
    height: f64,
}

impl Projection {
    pub fn new(area: Rect, width: f64, height: f64) -> Self {
        Self {
            area,
            width,
            height,
        }
    }

    /// Cell for a logical point, or `None` when it is off screen.
    pub fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let col = (x / self.width * self.area.width as f64).floor();
        let row_from_bottom = (y / self.height * self.area.height as f64).floor();
        if col < 0.0
            || col >= self.area.width as f64
            || row_from_bottom < 0.0
            || row_from_bottom >= self.area.height as f64
        {
            return None;
        }
        let row = self.area.height - 1 - row_from_bottom as u16;
        Some((self.area.x + col as u16, self.area.y + row))
    }

    pub fn column(&self, x: f64) -> Option<u16> {
        self.cell(x, 0.0).map(|(col, _)| col)
    }
}

fn put(buf: &mut Buffer, pos: (u16, u16), symbol: &str, style: Style) {
    if let Some(cell) = buf.cell_mut(pos) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

fn dust_glyph(shape: DustShape) -> &'static str {
    match shape {
        DustShape::Rectangle => "■",
        DustShape::Circle => "●",
        DustShape::Star => "★",
    }
}

/// Draws one frame of a running session: dust, limit line, word, particles, HUD and overlays.
pub fn render_session(session: &Session, area: Rect, buf: &mut Buffer) {
    let field = session.playfield();
    let projection = Projection::new(area, field.width, field.height);
    let snap = session.snapshot();

    render_dust(&snap, &projection, buf);
    render_limit_line(&snap, &projection, area, buf);
    render_tokens(&snap, &projection, buf);
    render_particles(&snap, &projection, buf);
    render_hud(&snap, area, buf);

    match snap.phase {
        Phase::Playing => {}
        Phase::Paused => render_overlay(
            area,
            buf,
            "Pause",
            &["Press Esc to resume or Enter to return to main menu".to_string()],
        ),
        Phase::GameOver => render_overlay(
            area,
            buf,
            "GAME OVER",
            &[
                format!("Score: {}", snap.score),
                "Press R to retry".to_string(),
                "Press Esc to return to the main menu".to_string(),
            ],
        ),
    }
}

fn render_dust(snap: &Snapshot, projection: &Projection, buf: &mut Buffer) {
    for mote in snap.dust {
        if let Some(pos) = projection.cell(mote.x, mote.y) {
            let style = Style::default()
                .fg(to_color(mote.color))
                .add_modifier(Modifier::DIM);
            put(buf, pos, dust_glyph(mote.shape), style);
        }
    }
}

fn render_limit_line(snap: &Snapshot, projection: &Projection, area: Rect, buf: &mut Buffer) {
    let Some(col) = projection.column(snap.limit_line_x) else {
        return;
    };
    let style = Style::default()
        .fg(to_color(snap.limit_line_color))
        .add_modifier(Modifier::BOLD);
    for row in area.top()..area.bottom() {
        put(buf, (col, row), LIMIT_GLYPH, style);
    }
}

fn render_tokens(snap: &Snapshot, projection: &Projection, buf: &mut Buffer) {
    for token in snap.tokens {
        let Some((col, row)) = projection.cell(token.x, token.y) else {
            continue;
        };
        // a shaking glyph jitters one cell either way
        let jitter = (token.rotation / 20.0).round() as i32;
        let col = (col as i32 + jitter).max(0) as u16;
        let style = Style::default()
            .fg(to_color(token.color))
            .add_modifier(Modifier::BOLD);
        put(buf, (col, row), &token.glyph.to_string(), style);
    }
}

fn render_particles(snap: &Snapshot, projection: &Projection, buf: &mut Buffer) {
    for particle in snap.bursts.iter().flat_map(|b| &b.particles) {
        if let Some(pos) = projection.cell(particle.x, particle.y) {
            let style = Style::default().fg(to_color(particle.color));
            put(buf, pos, PARTICLE_GLYPH, style);
        }
    }
}

fn render_hud(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y, area.width, 1);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    Paragraph::new(Span::styled(format!("Score: {}", snap.score), bold))
        .alignment(Alignment::Left)
        .render(row, buf);
    Paragraph::new(Span::styled(
        HEART.repeat(snap.health).trim_end().to_string(),
        Style::default().fg(Color::Red).patch(bold),
    ))
    .alignment(Alignment::Center)
    .render(row, buf);
    Paragraph::new(Span::styled(
        "Esc -> Pause",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Right)
    .render(row, buf);
}

fn render_overlay(area: Rect, buf: &mut Buffer, title: &str, lines: &[String]) {
    let width = lines
        .iter()
        .map(|l| l.width())
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or_default() as u16
        + 4;
    let height = lines.len() as u16 + 4;

    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(popup);

    Clear.render(popup, buf);
    let text: Vec<Line> = std::iter::once(Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .chain(std::iter::once(Line::default()))
    .chain(lines.iter().map(|l| Line::from(l.as_str())))
    .collect();

    Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(popup, buf);
}
