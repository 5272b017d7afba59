use std::io::{self, IsTerminal};

use crossterm::style::{Attribute, Color, ContentStyle, Stylize};
use serde::Deserialize;
use tracing::debug;

use crate::reminders::{ListColor, Priority};

/// Text-mode styling for list output.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub high: ContentStyle,
    pub medium: ContentStyle,
    pub low: ContentStyle,
    pub done: ContentStyle,
    pub list: ContentStyle,
    enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            high: ContentStyle::new().with(Color::Red).attribute(Attribute::Bold),
            medium: ContentStyle::new().with(Color::Yellow),
            low: ContentStyle::new().with(Color::Blue),
            done: ContentStyle::new().with(Color::DarkGrey),
            list: ContentStyle::new().with(Color::Cyan),
            enabled: false,
        }
    }
}

impl Theme {
    /// Resolve the configured theme. Styling only applies when stdout is a
    /// terminal, `NO_COLOR` is unset and color is enabled in the config.
    pub fn resolve(config: &ThemeConfig, color: bool) -> Self {
        let enabled =
            color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        let theme = config.to_theme();
        debug!(theme = %theme.name, enabled, "resolved text theme");
        Self { enabled, ..theme }
    }

    pub fn preset(name: &str) -> Self {
        match name {
            "mono" => Self::mono(),
            _ => Self::default(),
        }
    }

    fn mono() -> Self {
        Self {
            name: "mono".to_string(),
            high: ContentStyle::new().attribute(Attribute::Bold),
            medium: ContentStyle::new(),
            low: ContentStyle::new().attribute(Attribute::Dim),
            done: ContentStyle::new().attribute(Attribute::Dim),
            list: ContentStyle::new().attribute(Attribute::Italic),
            enabled: false,
        }
    }

    pub fn paint(&self, style: ContentStyle, text: &str) -> String {
        if self.enabled {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// ` [HIGH]`, ` [MED]`, ` [LOW]`, or nothing.
    pub fn priority_tag(&self, band: Priority) -> String {
        match band.tag() {
            Some(tag) => {
                let style = match band {
                    Priority::High => self.high,
                    Priority::Medium => self.medium,
                    _ => self.low,
                };
                format!(" {}", self.paint(style, &format!("[{tag}]")))
            }
            None => String::new(),
        }
    }

    pub fn list_name(&self, name: &str, color: Option<ListColor>) -> String {
        let style = match color {
            Some(c) => ContentStyle::new().with(Color::Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            }),
            None => self.list,
        };
        self.paint(style, name)
    }
}

// ── TOML config types ──

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub high: Option<String>,
    pub medium: Option<String>,
    pub low: Option<String>,
    pub done: Option<String>,
    pub list: Option<String>,
}

impl ThemeConfig {
    fn to_theme(&self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let overrides = [
            (&self.high, &mut theme.high),
            (&self.medium, &mut theme.medium),
            (&self.low, &mut theme.low),
            (&self.done, &mut theme.done),
            (&self.list, &mut theme.list),
        ];
        for (value, style) in overrides {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = (*style).with(c);
            }
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(c) = ListColor::from_hex(s) {
        return Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        });
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Grey),
        "darkgray" | "darkgrey" => Some(Color::DarkGrey),
        "darkred" => Some(Color::DarkRed),
        "darkgreen" => Some(Color::DarkGreen),
        "darkyellow" => Some(Color::DarkYellow),
        "darkblue" => Some(Color::DarkBlue),
        "darkmagenta" => Some(Color::DarkMagenta),
        "darkcyan" => Some(Color::DarkCyan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(theme: Theme) -> Theme {
        Theme {
            enabled: true,
            ..theme
        }
    }

    #[test]
    fn disabled_theme_emits_plain_text() {
        let theme = Theme::default();
        assert_eq!(theme.priority_tag(Priority::High), " [HIGH]");
        assert_eq!(theme.priority_tag(Priority::Medium), " [MED]");
        assert_eq!(theme.priority_tag(Priority::Low), " [LOW]");
        assert_eq!(theme.priority_tag(Priority::None), "");
        assert_eq!(theme.list_name("Work", None), "Work");
    }

    #[test]
    fn enabled_theme_wraps_in_escape_codes() {
        let theme = enabled(Theme::default());
        let tag = theme.priority_tag(Priority::High);
        assert!(tag.contains("[HIGH]"));
        assert!(tag.contains('\u{1b}'));
        assert_eq!(theme.priority_tag(Priority::None), "");
    }

    #[test]
    fn band_styles_follow_the_theme() {
        let theme = enabled(Theme::preset("mono"));
        assert_eq!(
            theme.priority_tag(Priority::Medium),
            format!(" {}", theme.medium.apply("[MED]"))
        );
        assert_eq!(
            theme.priority_tag(Priority::Low),
            format!(" {}", theme.low.apply("[LOW]"))
        );
    }

    #[test]
    fn resolve_keeps_preset_name() {
        let config = ThemeConfig {
            preset: Some("mono".into()),
            ..ThemeConfig::default()
        };
        let theme = Theme::resolve(&config, false);
        assert_eq!(theme.name, "mono");
        assert_eq!(theme.priority_tag(Priority::High), " [HIGH]");
    }

    #[test]
    fn config_overrides_preset_colors() {
        let config = ThemeConfig {
            preset: Some("mono".into()),
            high: Some("#00ff00".into()),
            ..ThemeConfig::default()
        };
        let theme = config.to_theme();
        assert_eq!(theme.name, "mono");
        assert_eq!(
            theme.high.foreground_color,
            Some(Color::Rgb { r: 0, g: 255, b: 0 })
        );
    }

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(parse_color("Red"), Some(Color::Red));
        assert_eq!(parse_color("darkgrey"), Some(Color::DarkGrey));
        assert_eq!(
            parse_color("#102030"),
            Some(Color::Rgb {
                r: 0x10,
                g: 0x20,
                b: 0x30
            })
        );
        assert_eq!(parse_color("chartreuse"), None);
    }
}
