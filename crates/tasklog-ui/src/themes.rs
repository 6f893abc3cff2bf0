use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from a `COLORFGBG` value.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. Anything else is
/// treated as dark.
pub fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    value
        .and_then(|val| val.split(';').next_back())
        .and_then(|bg| bg.parse::<u8>().ok())
        .map(|bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
        .unwrap_or(BackgroundType::Dark)
}

/// Detect the running terminal's background from the environment.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

/// Styles used by the terminal chart.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub border: Style,
    pub axis: Style,
    pub label: Style,
    pub dim: Style,

    // ── Series ───────────────────────────────────────────────────────────────
    pub daily: Style,
    pub short_average: Style,
    pub long_average: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            daily: Style::default().fg(Color::LightBlue),
            short_average: Style::default().fg(Color::Rgb(255, 165, 0)),
            long_average: Style::default().fg(Color::LightGreen),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            axis: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            daily: Style::default().fg(Color::Blue),
            short_average: Style::default().fg(Color::Rgb(204, 102, 0)),
            long_average: Style::default().fg(Color::Green),
        }
    }

    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// `"light"`, `"dark"`, or anything else for auto-detection.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }
}
