use ratatui::style::{Color, Style};

use crate::session::ChatRole;

/// Binary color scheme, resolved once at startup and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Resolve the theme for this run: an explicit override wins, then the
    /// terminal's `COLORFGBG` hint, then light.
    pub fn resolve(preference: Option<&str>) -> Self {
        match preference {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ => std::env::var("COLORFGBG")
                .ok()
                .and_then(|v| Self::from_colorfgbg(&v))
                .unwrap_or(Theme::Light),
        }
    }

    /// Interpret a `COLORFGBG` value like "15;0". The last field is the
    /// background color index; low indices (and 8) are dark backgrounds.
    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        if bg <= 6 || bg == 8 {
            Some(Theme::Dark)
        } else {
            Some(Theme::Light)
        }
    }
}

/// Fixed palette for one theme, applied to chrome and per-message styling.
pub struct Palette {
    pub user_bg: Color,
    pub user_fg: Color,
    pub assistant_bg: Color,
    pub assistant_fg: Color,
    pub input_bg: Color,
    pub input_fg: Color,
    pub accent: Color,
    pub accent_fg: Color,
    pub indicator_fg: Color,
    pub chrome_fg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                user_bg: Color::Rgb(0xe6, 0xf0, 0xff),
                user_fg: Color::Rgb(0x11, 0x11, 0x11),
                assistant_bg: Color::Rgb(0xf1, 0xf1, 0xf1),
                assistant_fg: Color::Rgb(0x11, 0x11, 0x11),
                input_bg: Color::Rgb(0xff, 0xff, 0xff),
                input_fg: Color::Rgb(0x11, 0x11, 0x11),
                accent: Color::Rgb(0x00, 0x7b, 0xff),
                accent_fg: Color::Rgb(0xff, 0xff, 0xff),
                indicator_fg: Color::Rgb(0x33, 0x33, 0x33),
                chrome_fg: Color::Rgb(0x33, 0x33, 0x33),
            },
            Theme::Dark => Self {
                user_bg: Color::Rgb(0x2c, 0x2c, 0x2c),
                user_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
                assistant_bg: Color::Rgb(0x1f, 0x1f, 0x1f),
                assistant_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
                input_bg: Color::Rgb(0x1f, 0x1f, 0x1f),
                input_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
                accent: Color::Rgb(0x3a, 0x3a, 0x3a),
                accent_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
                indicator_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
                chrome_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
            },
        }
    }

    pub fn message_style(&self, role: ChatRole) -> Style {
        match role {
            ChatRole::User => Style::default().bg(self.user_bg).fg(self.user_fg),
            ChatRole::Assistant => Style::default().bg(self.assistant_bg).fg(self.assistant_fg),
        }
    }

    pub fn input_style(&self) -> Style {
        Style::default().bg(self.input_bg).fg(self.input_fg)
    }

    pub fn indicator_style(&self) -> Style {
        Style::default().fg(self.indicator_fg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_preference_wins() {
        assert_eq!(Theme::resolve(Some("dark")), Theme::Dark);
        assert_eq!(Theme::resolve(Some("light")), Theme::Light);
    }

    #[test]
    fn colorfgbg_maps_background_index() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("12;default;8"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn roles_get_distinct_colors_per_theme() {
        for theme in [Theme::Light, Theme::Dark] {
            let palette = Palette::for_theme(theme);
            assert_ne!(palette.user_bg, palette.assistant_bg);
        }
        let light = Palette::for_theme(Theme::Light);
        let dark = Palette::for_theme(Theme::Dark);
        assert_ne!(light.user_bg, dark.user_bg);
        assert_ne!(light.assistant_bg, dark.assistant_bg);
    }
}
