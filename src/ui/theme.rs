use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Overall background, also picks the syntax theme brightness
    pub background_color: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_list_marker_style: Style,
    pub md_inline_code_style: Style,
    pub md_code_style: Style,
    pub md_codeblock_bg: Option<Color>,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),

            md_heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            md_list_marker_style: Style::default().fg(Color::Yellow),
            md_inline_code_style: Style::default().fg(Color::LightGreen),
            md_code_style: Style::default().fg(Color::Gray),
            md_codeblock_bg: Some(Color::Rgb(30, 30, 30)),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),

            md_heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_list_marker_style: Style::default().fg(Color::DarkGray),
            md_inline_code_style: Style::default().fg(Color::Magenta),
            md_code_style: Style::default().fg(Color::Black),
            md_codeblock_bg: Some(Color::Rgb(235, 235, 235)),
        }
    }

    /// No colors at all; modifiers only. Used for plain terminal output.
    pub fn monochrome() -> Self {
        Theme {
            background_color: Color::Reset,
            user_prefix_style: Style::default().add_modifier(Modifier::BOLD),
            user_text_style: Style::default(),
            assistant_text_style: Style::default(),
            error_text_style: Style::default(),

            md_heading_style: Style::default().add_modifier(Modifier::BOLD),
            md_list_marker_style: Style::default(),
            md_inline_code_style: Style::default(),
            md_code_style: Style::default(),
            md_codeblock_bg: None,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" | "default-dark" => Self::dark_default(),
            "light" => Self::light(),
            "mono" | "monochrome" | "plain" => Self::monochrome(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    pub fn md_codeblock_bg_color(&self) -> Option<Color> {
        self.md_codeblock_bg
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}
