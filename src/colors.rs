use is_terminal::IsTerminal;

/// ANSI SGR codes for console output styling
#[derive(Debug, Clone)]
pub struct Styles {
    pub faint: &'static str,    // Dim for timestamps and field names
    pub bold: &'static str,     // Bold for caller paths and fallbacks
    pub red: &'static str,      // Red for warn level
    pub green: &'static str,    // Green for info level
    pub yellow: &'static str,   // Yellow for debug level
    pub bold_red: &'static str, // Bold red for error/fatal/panic
    pub reset: &'static str,    // Reset to default style
}

impl Styles {
    /// Create a style table, or the all-empty table in plain mode
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                faint: "\x1b[2m",
                bold: "\x1b[1m",
                red: "\x1b[31m",
                green: "\x1b[32m",
                yellow: "\x1b[33m",
                bold_red: "\x1b[1;31m",
                reset: "\x1b[0m",
            }
        } else {
            // All empty strings for no-color mode
            Self {
                faint: "",
                bold: "",
                red: "",
                green: "",
                yellow: "",
                bold_red: "",
                reset: "",
            }
        }
    }

    /// Wrap text in an SGR code. Empty text stays empty so callers can
    /// keep the "omit empty parts" rule without inspecting codes.
    pub fn paint(&self, code: &'static str, text: &str) -> String {
        if code.is_empty() || text.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", code, text, self.reset)
        }
    }
}

/// Auto-detect whether the given sink should be colorized. Honors the
/// NO_COLOR convention.
pub fn should_use_colors_for(sink: &impl IsTerminal) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    sink.is_terminal()
}

/// Auto-detect for the default sink (stderr).
pub fn should_use_colors() -> bool {
    should_use_colors_for(&std::io::stderr())
}
