use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,

    // Footer mode colors
    pub footer_normal: ColorSpec,
    pub footer_delete: ColorSpec,
    pub footer_edit: ColorSpec,
    pub footer_debug: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
    ColorSpec { r, g, b }
}

impl Theme {
    /// Resolve a configured theme name, falling back to the default.
    ///
    pub fn by_name(name: &str) -> Self {
        match name {
            "rose-pine-dawn" => Self::rose_pine_dawn(),
            _ => Self::tokyo_night(),
        }
    }

    /// Tokyo Night theme (default).
    ///
    pub fn tokyo_night() -> Self {
        Theme {
            name: "tokyo-night".to_string(),
            primary: rgb(122, 162, 247),
            secondary: rgb(158, 206, 106),
            banner: rgb(187, 154, 247),
            text: rgb(192, 202, 245),
            text_muted: rgb(86, 95, 137),
            success: rgb(158, 206, 106),
            warning: rgb(224, 175, 104),
            error: rgb(247, 118, 142),
            border_active: rgb(122, 162, 247),
            border_normal: rgb(59, 66, 97),
            highlight_bg: rgb(41, 46, 66),
            highlight_fg: rgb(122, 162, 247),
            footer_normal: rgb(59, 66, 97),
            footer_delete: rgb(247, 118, 142),
            footer_edit: rgb(224, 175, 104),
            footer_debug: rgb(187, 154, 247),
        }
    }

    /// Rose Pine Dawn theme.
    ///
    pub fn rose_pine_dawn() -> Self {
        Theme {
            name: "rose-pine-dawn".to_string(),
            primary: rgb(86, 148, 159),
            secondary: rgb(40, 105, 131),
            banner: rgb(180, 99, 122),
            text: rgb(87, 82, 121),
            text_muted: rgb(152, 147, 165),
            success: rgb(40, 105, 131),
            warning: rgb(234, 157, 52),
            error: rgb(180, 99, 122),
            border_active: rgb(86, 148, 159),
            border_normal: rgb(206, 202, 205),
            highlight_bg: rgb(242, 233, 222),
            highlight_fg: rgb(180, 99, 122),
            footer_normal: rgb(206, 202, 205),
            footer_delete: rgb(180, 99, 122),
            footer_edit: rgb(234, 157, 52),
            footer_debug: rgb(144, 122, 169),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_falls_back_to_default() {
        assert_eq!(Theme::by_name("rose-pine-dawn").name, "rose-pine-dawn");
        assert_eq!(Theme::by_name("no-such-theme").name, "tokyo-night");
    }

    #[test]
    fn test_color_spec_to_color() {
        let spec = ColorSpec { r: 1, g: 2, b: 3 };
        assert_eq!(spec.to_color(), Color::Rgb(1, 2, 3));
    }
}
