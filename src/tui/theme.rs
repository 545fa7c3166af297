use ratatui::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub selection_bg: Color,
    /// Row style for issues highlighted as new
    pub new_issue: Color,
    /// Flag marker column
    pub flag: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x10, 0x1B),
            text: Color::Rgb(0xA8, 0xB4, 0xD0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x41, 0x96, 0xFB),
            dim: Color::Rgb(0x5C, 0x68, 0x84),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            selection_bg: Color::Rgb(0x1D, 0x2A, 0x44),
            new_issue: Color::Rgb(0xFF, 0xD7, 0x00),
            flag: Color::Rgb(0xCC, 0x66, 0xFF),
        }
    }
}
