use std::collections::HashMap;
use std::io::{self, Write};

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::colors::{should_use_colors, Styles};
use crate::error::FormatError;
use crate::fields;

/// Kitchen-clock layout, e.g. "12:00AM".
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M%p";

/// A renderer registered in the formatter registry. Receives the raw
/// field value (None when the field is absent) and must always produce
/// display text; renderers cannot fail.
pub type Formatter = Box<dyn Fn(Option<&Value>) -> String + Send + Sync>;

// Working directory captured once; the caller renderer strips it from
// call-site paths.
static CWD: Lazy<String> = Lazy::new(|| {
    std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
});

/// Configuration for a [`ConsoleWriter`]
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// strftime layout applied to parsed timestamps
    pub time_format: String,
    /// Record key carrying the timestamp ("time", or "timestamp" in
    /// later logging setups)
    pub timestamp_field: String,
    /// Known-field order; keys listed here are excluded from the
    /// arbitrary-field section
    pub parts_order: Vec<String>,
    /// None = auto-detect from the terminal
    pub use_colors: Option<bool>,
    /// Extra record keys suppressed from arbitrary-field output
    pub hidden_fields: Vec<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            timestamp_field: fields::TIME.to_string(),
            parts_order: vec![
                fields::TIME.to_string(),
                fields::LEVEL.to_string(),
                fields::CALLER.to_string(),
                fields::MESSAGE.to_string(),
            ],
            use_colors: None,
            hidden_fields: Vec::new(),
        }
    }
}

impl WriterConfig {
    /// Defaults plus the component field, rendered between level and
    /// caller.
    pub fn with_component() -> Self {
        WriterConfig {
            parts_order: vec![
                fields::TIME.to_string(),
                fields::LEVEL.to_string(),
                fields::COMPONENT.to_string(),
                fields::CALLER.to_string(),
                fields::MESSAGE.to_string(),
            ],
            ..WriterConfig::default()
        }
    }

    /// Rename the timestamp key, updating the parts order in place.
    pub fn with_timestamp_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        for part in &mut self.parts_order {
            if *part == self.timestamp_field {
                *part = name.clone();
            }
        }
        self.timestamp_field = name;
        self
    }
}

/// Parses one JSON log record per write call and renders it as a
/// single ANSI-colorized line on the wrapped sink.
///
/// Implements [`std::io::Write`] so it can be handed directly to a
/// structured-logging producer as its output. Registry mutation via
/// [`ConsoleWriter::set_formatter`] must happen before the writer is
/// shared across threads; rendering itself takes no locks.
pub struct ConsoleWriter<W: Write> {
    out: W,
    config: WriterConfig,
    styles: Styles,
    formatters: HashMap<String, Formatter>,
    fallback: Formatter,
}

impl<W: Write> ConsoleWriter<W> {
    /// Create a writer with default configuration. Performs no I/O.
    pub fn new(out: W) -> Self {
        Self::with_config(out, WriterConfig::default())
    }

    /// Create a writer with explicit configuration. Performs no I/O.
    pub fn with_config(out: W, config: WriterConfig) -> Self {
        let styles = Styles::new(config.use_colors.unwrap_or_else(should_use_colors));
        let mut writer = ConsoleWriter {
            out,
            config,
            styles,
            formatters: HashMap::new(),
            fallback: Box::new(fields::display_opt),
        };
        writer.install_default_formatters();
        writer
    }

    /// Look up a renderer by id, falling back to plain stringification
    /// for unregistered ids. Never fails.
    pub fn formatter(&self, id: &str) -> &Formatter {
        self.formatters.get(id).unwrap_or(&self.fallback)
    }

    /// Insert or replace a renderer. Last write wins.
    pub fn set_formatter(&mut self, id: impl Into<String>, f: Formatter) {
        self.formatters.insert(id.into(), f);
    }

    /// Access the wrapped sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Decode one JSON object and render it as a newline-terminated
    /// line, without writing to the sink.
    pub fn format_record(&self, raw: &[u8]) -> Result<String, FormatError> {
        let record: Map<String, Value> = serde_json::from_slice(raw)?;

        let mut line = String::new();
        self.render_parts(&mut line, &record);
        self.render_fields(&mut line, &record);
        line.push('\n');
        Ok(line)
    }

    fn render_parts(&self, line: &mut String, record: &Map<String, Value>) {
        for part in &self.config.parts_order {
            let rendered = self.formatter(part)(record.get(part));
            if !rendered.is_empty() {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&rendered);
            }
        }
    }

    fn render_fields(&self, line: &mut String, record: &Map<String, Value>) {
        let mut names: Vec<&str> = record
            .keys()
            .map(String::as_str)
            .filter(|key| {
                !self.config.parts_order.iter().any(|p| p == key)
                    && !self.config.hidden_fields.iter().any(|h| h == key)
            })
            .collect();
        names.sort_unstable();

        // The "error" field jumps the queue
        if let Ok(pos) = names.binary_search(&fields::ERROR) {
            names.remove(pos);
            names.insert(0, fields::ERROR);
        }

        for name in names {
            if !line.is_empty() {
                line.push(' ');
            }
            let name_value = Value::String(name.to_string());
            let (name_fmt, value_fmt) = self.field_formatters(name);
            line.push_str(&name_fmt(Some(&name_value)));
            line.push_str(&value_fmt(record.get(name)));
        }
    }

    // Per-field overrides take both slots as soon as the name slot is
    // registered, so "<field>_field_value" alone is not consulted.
    fn field_formatters(&self, field: &str) -> (&Formatter, &Formatter) {
        let name_id = format!("{}_{}", field, fields::FIELD_NAME);
        if self.formatters.contains_key(&name_id) {
            let value_id = format!("{}_{}", field, fields::FIELD_VALUE);
            (self.formatter(&name_id), self.formatter(&value_id))
        } else {
            (
                self.formatter(fields::FIELD_NAME),
                self.formatter(fields::FIELD_VALUE),
            )
        }
    }

    fn install_default_formatters(&mut self) {
        // Timestamp: RFC 3339 reformatted to the configured layout,
        // unparseable text passed through raw, rendered faint. A layout
        // with an unknown specifier also falls back to the raw text;
        // chrono's DelayedFormat panics when displayed with one.
        let styles = self.styles.clone();
        let time_format = self.config.time_format.clone();
        let layout_ok = layout_is_valid(&time_format);
        self.set_formatter(
            self.config.timestamp_field.clone(),
            Box::new(move |value| {
                let text = match value {
                    Some(Value::String(raw)) => match chrono::DateTime::parse_from_rfc3339(raw) {
                        Ok(ts) if layout_ok => ts.format(&time_format).to_string(),
                        _ => raw.clone(),
                    },
                    _ => String::new(),
                };
                styles.paint(styles.faint, &text)
            }),
        );

        // Level: fixed vocabulary mapped to colored three-letter
        // abbreviations, unknown values upper-cased, absent -> N/A
        let styles = self.styles.clone();
        self.set_formatter(
            fields::LEVEL,
            Box::new(move |value| match value {
                Some(Value::String(level)) => match level.as_str() {
                    "debug" => styles.paint(styles.yellow, "DBG"),
                    "info" => styles.paint(styles.green, "INF"),
                    "warn" => styles.paint(styles.red, "WRN"),
                    "error" => styles.paint(styles.bold_red, "ERR"),
                    "fatal" => styles.paint(styles.bold_red, "FTL"),
                    "panic" => styles.paint(styles.bold_red, "PNC"),
                    other => other.to_uppercase(),
                },
                None | Some(Value::Null) => styles.paint(styles.bold, "N/A"),
                Some(other) => fields::display_value(other).to_uppercase(),
            }),
        );

        // Caller: working-directory-relative path with a faint marker
        let styles = self.styles.clone();
        self.set_formatter(
            fields::CALLER,
            Box::new(move |value| {
                let caller = match value {
                    Some(Value::String(s)) => s.as_str(),
                    _ => "",
                };
                if caller.is_empty() {
                    return String::new();
                }
                let mut path = caller;
                if !CWD.is_empty() {
                    path = path.strip_prefix(CWD.as_str()).unwrap_or(path);
                    path = path.strip_prefix(std::path::MAIN_SEPARATOR).unwrap_or(path);
                }
                format!(
                    "{}{}",
                    styles.paint(styles.bold, path),
                    styles.paint(styles.faint, " >")
                )
            }),
        );

        // Component: bracketed subsystem name, empty when absent
        let styles = self.styles.clone();
        self.set_formatter(
            fields::COMPONENT,
            Box::new(move |value| match value {
                Some(Value::String(name)) if !name.is_empty() => {
                    styles.paint(styles.bold, &format!("[{}]", name))
                }
                _ => String::new(),
            }),
        );

        // Message: plain text, never colorized
        self.set_formatter(fields::MESSAGE, Box::new(fields::display_opt));

        // Arbitrary fields: faint "name=" followed by the plain value
        let styles = self.styles.clone();
        self.set_formatter(
            fields::FIELD_NAME,
            Box::new(move |value| {
                styles.paint(styles.faint, &format!("{}=", fields::display_opt(value)))
            }),
        );
        self.set_formatter(fields::FIELD_VALUE, Box::new(fields::display_opt));

        // The error field gets red emphasis on both sides of the =
        let styles = self.styles.clone();
        self.set_formatter(
            "error_field_name",
            Box::new(move |value| {
                let text = format!("{}=", fields::display_opt(value));
                if styles.red.is_empty() {
                    text
                } else {
                    format!("{}{}{}{}", styles.faint, styles.red, text, styles.reset)
                }
            }),
        );
        let styles = self.styles.clone();
        self.set_formatter(
            "error_field_value",
            Box::new(move |value| styles.paint(styles.bold_red, &fields::display_opt(value))),
        );
    }
}

fn layout_is_valid(layout: &str) -> bool {
    use chrono::format::{strftime::StrftimeItems, Item};
    !StrftimeItems::new(layout).any(|item| matches!(item, Item::Error))
}

impl<W: Write> Write for ConsoleWriter<W> {
    /// Render one JSON record to the sink. Returns the count of input
    /// bytes consumed; on decode failure nothing is written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = self
            .format_record(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.out.write_all(line.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
