//! UI palette, with per-color overrides read from the `[theme]` table
//! of the config file.

use ratatui::style::Color;

use crate::config::AppConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, focused panes, selected tabs
    pub danger: Color,      // Errors, expired subscriptions
    pub success: Color,     // Prices, enabled flags
    pub warning: Color,     // Badges, trial markers
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Meta lines, hints, inactive labels
    #[allow(dead_code)]
    pub bg: Color,          // Background - reserved, terminal default is used
    pub bg_selected: Color, // Selection background
    pub inactive: Color,    // Inactive borders
    pub header: Color,      // View titles, headings
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired, blue accent to match the product branding.
        Self {
            accent: Color::Rgb(137, 180, 250),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(148, 226, 213),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg: Color::Rgb(30, 30, 46),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(250, 179, 135),
        }
    }
}

impl Theme {
    /// Defaults plus whatever the config's `[theme]` table overrides.
    /// Unknown keys and unparseable values are skipped with a log line.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut theme = Self::default();
        for (key, value) in &config.theme {
            match parse_hex_color(value) {
                Some(color) => {
                    if !theme.apply(key, color) {
                        tracing::debug!("ignoring unknown theme key: {}", key);
                    }
                }
                None => tracing::warn!("ignoring bad theme color {} = {:?}", key, value),
            }
        }
        theme
    }

    fn apply(&mut self, key: &str, color: Color) -> bool {
        match key {
            "accent" => self.accent = color,
            "danger" => self.danger = color,
            "success" => self.success = color,
            "warning" => self.warning = color,
            "text" => self.text = color,
            "text_dim" => self.text_dim = color,
            "bg" => self.bg = color,
            "bg_selected" => self.bg_selected = color,
            "inactive" => self.inactive = color,
            "header" => self.header = color,
            _ => return false,
        }
        true
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    // The length checks and slices below are byte-indexed.
    if !s.is_ascii() {
        return None;
    }

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_both_widths() {
        assert_eq!(parse_hex_color("#89b4fa"), Some(Color::Rgb(137, 180, 250)));
        assert_eq!(parse_hex_color("89b4fa"), Some(Color::Rgb(137, 180, 250)));
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#f00"), Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn hex_parsing_rejects_malformed_input() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("blue"), None);
        // Multi-byte values whose byte lengths look like #RRGGBB / #RGB
        assert_eq!(parse_hex_color("€€"), None);
        assert_eq!(parse_hex_color("#é1"), None);
    }

    #[test]
    fn config_overrides_apply_by_name() {
        let mut config = AppConfig::default();
        config
            .theme
            .insert("accent".to_string(), "#ff0000".to_string());
        config
            .theme
            .insert("unknown_key".to_string(), "#00ff00".to_string());
        config.theme.insert("danger".to_string(), "oops".to_string());

        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(255, 0, 0));
        assert_eq!(theme.danger, Theme::default().danger);
    }
}
