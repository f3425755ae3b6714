pub mod menus;
pub mod playfield;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::{
    app::{App, Mode},
    stage::Rgba,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.mode(), self.session()) {
            (Mode::InGame, Some(session)) => playfield::render_session(session, area, buf),
            (Mode::Menu(kind), _) => {
                if let Some(menu) = self.active_menu() {
                    menus::render_menu(menu, kind, self.highscore_menu(), area, buf);
                }
            }
            (Mode::InGame, None) => {}
        }
    }
}

/// Terminal colour for an RGBA value, with alpha blended against black.
pub(crate) fn to_color(c: Rgba) -> Color {
    let scale = |channel: u8| ((channel as u16 * c[3] as u16) / 255) as u8;
    Color::Rgb(scale(c[0]), scale(c[1]), scale(c[2]))
}

#[cfg(test)]
pub(crate) fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(area.x + x, area.y + y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}
