//! Terminal colors and styling
//!
//! 256-color ANSI palette shared by the console reporter. The free functions
//! always emit escape codes; [`Painter`] applies the same styles only when
//! color output is enabled.

pub mod colors {
    pub const GREY: u8 = 102;      // #7D7D7D - Punctuation, secondary
    pub const AQUA: u8 = 109;      // #7A9EB5 - Numbers, info
    pub const ORANGE: u8 = 208;    // #F2913D - Warnings, PUT/PATCH
    pub const RED: u8 = 167;       // #E34F45 - Errors, DELETE
    pub const BLUE: u8 = 68;       // #426BD1 - Names, labels
    pub const PINK: u8 = 176;      // #DE85DE - Keys
    pub const GREEN: u8 = 71;      // #63C27A - Success, GET
    pub const YELLOW: u8 = 185;    // #CCCC3D - POST, headers
}

/// ANSI escape code constants
pub const RESET: &str = "\x1b[0m";

/// Generate foreground color escape code
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Generate bold foreground color escape code
#[inline]
pub fn bold_fg(color: u8) -> String {
    format!("\x1b[1;38;5;{}m", color)
}

/// Colorize text with a foreground color
#[inline]
pub fn colorize(text: &str, color: u8) -> String {
    format!("{}{}{}", fg(color), text, RESET)
}

/// Colorize text with bold foreground color
#[inline]
pub fn bold(text: &str, color: u8) -> String {
    format!("{}{}{}", bold_fg(color), text, RESET)
}

/// Whether stdout should receive colors
///
/// Disabled when stdout is not a terminal or `NO_COLOR` is set.
pub fn color_supported() -> bool {
    if !atty::is(atty::Stream::Stdout) {
        return false;
    }
    std::env::var_os("NO_COLOR").is_none()
}

/// Applies the palette, or nothing when colors are off
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: &str, color: u8, strong: bool) -> String {
        match (self.enabled, strong) {
            (false, _) => text.to_string(),
            (true, false) => colorize(text, color),
            (true, true) => bold(text, color),
        }
    }

    /// Success message (bold green)
    pub fn success(&self, text: &str) -> String {
        self.paint(text, colors::GREEN, true)
    }

    /// Failure message (bold red)
    pub fn error(&self, text: &str) -> String {
        self.paint(text, colors::RED, true)
    }

    /// Warning message (bold orange)
    pub fn warning(&self, text: &str) -> String {
        self.paint(text, colors::ORANGE, true)
    }

    /// Section headers (bold aqua)
    pub fn header(&self, text: &str) -> String {
        self.paint(text, colors::AQUA, true)
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, colors::AQUA, false)
    }

    /// Scenario names (blue)
    pub fn label(&self, text: &str) -> String {
        self.paint(text, colors::BLUE, false)
    }

    pub fn key(&self, text: &str) -> String {
        self.paint(text, colors::PINK, false)
    }

    pub fn value(&self, text: &str) -> String {
        self.paint(text, colors::GREEN, false)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, colors::GREY, false)
    }

    /// HTTP status code, colored by class
    pub fn http_status(&self, code: u16) -> String {
        let color = match code / 100 {
            1 => colors::AQUA,
            2 => colors::GREEN,
            3 => colors::YELLOW,
            4 => colors::ORANGE,
            5 => colors::RED,
            _ => colors::GREY,
        };
        self.paint(&code.to_string(), color, true)
    }

    /// HTTP method, colored by verb
    pub fn http_method(&self, method: &str) -> String {
        let upper = method.to_uppercase();
        let color = match upper.as_str() {
            "GET" | "HEAD" | "OPTIONS" => colors::GREEN,
            "POST" => colors::YELLOW,
            "PUT" | "PATCH" => colors::ORANGE,
            "DELETE" => colors::RED,
            _ => colors::GREY,
        };
        self.paint(&upper, color, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fg_color() {
        assert_eq!(fg(71), "\x1b[38;5;71m");
    }

    #[test]
    fn test_bold_fg_color() {
        assert_eq!(bold_fg(71), "\x1b[1;38;5;71m");
    }

    #[test]
    fn test_colorize() {
        let result = colorize("test", colors::GREEN);
        assert!(result.contains("38;5;71m"));
        assert!(result.contains("test"));
        assert!(result.ends_with(RESET));
    }

    #[test]
    fn test_painter_enabled() {
        let painter = Painter::new(true);
        assert!(painter.success("OK").contains("1;38;5;71m"));
        assert!(painter.error("FAIL").contains("1;38;5;167m"));
        assert!(painter.http_status(404).contains("1;38;5;208m"));
    }

    #[test]
    fn test_painter_plain() {
        let painter = Painter::plain();
        assert_eq!(painter.success("OK"), "OK");
        assert_eq!(painter.http_method("post"), "POST");
        assert_eq!(painter.http_status(201), "201");
    }
}
