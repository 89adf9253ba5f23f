use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors for the document painter.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

pub fn text() -> Style {
    Style::default().fg(Color::White)
}

pub fn placeholder() -> Style {
    Style::default().fg(Color::DarkGray)
}

// Text inputs and buttons
pub fn input() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}
pub fn button() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}
pub fn focused() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(accent())
        .add_modifier(Modifier::BOLD)
}

// Combo box dropdown
pub fn dropdown() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}
pub fn dropdown_highlight() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}

// Splitter
pub fn divider() -> Style {
    Style::default().fg(Color::DarkGray)
}
pub fn divider_ghost() -> Style {
    Style::default().fg(accent())
}

// Dialog
pub fn mask() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}
pub fn dialog() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}
pub fn dialog_border() -> Style {
    Style::default().fg(accent())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_is_rgb() {
        assert!(matches!(accent(), Color::Rgb(200, 100, 0)));
    }

    #[test]
    fn focus_stands_out_from_inputs() {
        assert_ne!(focused().bg, input().bg);
    }
}
