//! Terminal styling for pull reports
//!
//! Semantic colors through the [`Stylize`] extension trait. Whether color is
//! emitted is decided by `owo-colors` per stream (`NO_COLOR`, `CLICOLOR`,
//! `CLICOLOR_FORCE`, TTY detection).
//!
//! ```ignore
//! println!("{} Cloned {}", check(), student.emphasis());
//! eprintln!("{}", diagnostics.error());
//! ```

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Style};
use std::fmt::{self, Display};
use std::sync::OnceLock;

pub use owo_colors::Stream;

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const WARN: Style = Style::new().yellow();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();

/// A value rendered with a style when its stream supports color
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }

    /// Decide color support for stdout instead of the default stream.
    #[must_use]
    pub const fn for_stdout(mut self) -> Self {
        self.stream = Stream::Stdout;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Semantic styling for anything printable
pub trait Stylize: Display {
    /// Cyan: students, counts, paths
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, ACCENT, Stream::Stdout)
    }

    /// Green: successful clones
    fn success(&self) -> Styled<&Self> {
        Styled::new(self, SUCCESS, Stream::Stdout)
    }

    /// Red: failed clones (stderr by default)
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Yellow: missing submissions, review flags (stderr by default)
    fn warn(&self) -> Styled<&Self> {
        Styled::new(self, WARN, Stream::Stderr)
    }

    /// Dim: URLs, diagnostics, metadata
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }

    /// Bold: headers
    fn emphasis(&self) -> Styled<&Self> {
        Styled::new(self, EMPHASIS, Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green checkmark
pub const fn check() -> Styled<&'static str> {
    Styled::new("✓", SUCCESS, Stream::Stdout)
}

/// Red cross
pub const fn cross() -> Styled<&'static str> {
    Styled::new("✗", ERROR, Stream::Stdout)
}

/// Yellow attention marker
pub const fn bang() -> Styled<&'static str> {
    Styled::new("!", WARN, Stream::Stdout)
}

/// Cyan arrow for before/after values
pub const fn arrow() -> Styled<&'static str> {
    Styled::new("→", ACCENT, Stream::Stdout)
}

/// Dim bullet for lists
pub const fn bullet() -> Styled<&'static str> {
    Styled::new("○", MUTED, Stream::Stdout)
}

/// Clickable URL (OSC 8) where the terminal supports it, plain text otherwise
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    let target = match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    };
    if supports_hyperlinks::on(target) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Cyan dots spinner
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("hardcoded spinner template is valid")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}
