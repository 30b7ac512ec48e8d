//! Terminal colors and status symbols

use console::{Style, Term};
use once_cell::sync::Lazy;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::env::parse_bool;

/// `COLORIZE` from the environment, read once.
static COLORIZE: Lazy<Option<bool>> = Lazy::new(|| parse_bool("COLORIZE"));

/// Foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Color {
    /// might be a gray
    Black,
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    /// might be a grey
    White,
    /// might be an orange
    Yellow,
    BrightBlack,
    BrightBlue,
    BrightCyan,
    BrightGreen,
    BrightMagenta,
    BrightRed,
    BrightWhite,
    BrightYellow,
    /// Leaves the foreground untouched.
    Reset,
}

impl Color {
    fn base(self) -> Option<(console::Color, bool)> {
        use console::Color as C;
        let pair = match self {
            Color::Black => (C::Black, false),
            Color::Blue => (C::Blue, false),
            Color::Cyan => (C::Cyan, false),
            Color::Green => (C::Green, false),
            Color::Magenta => (C::Magenta, false),
            Color::Red => (C::Red, false),
            Color::White => (C::White, false),
            Color::Yellow => (C::Yellow, false),
            Color::BrightBlack => (C::Black, true),
            Color::BrightBlue => (C::Blue, true),
            Color::BrightCyan => (C::Cyan, true),
            Color::BrightGreen => (C::Green, true),
            Color::BrightMagenta => (C::Magenta, true),
            Color::BrightRed => (C::Red, true),
            Color::BrightWhite => (C::White, true),
            Color::BrightYellow => (C::Yellow, true),
            Color::Reset => return None,
        };
        Some(pair)
    }

    /// Style `text` with this foreground and `emphasis`.
    pub fn style(self, text: &str, emphasis: &Emphasis, colorize: bool) -> String {
        let mut style = emphasis.apply(Style::new());
        if let Some((fg, bright)) = self.base() {
            style = style.fg(fg);
            if bright {
                style = style.bright();
            }
        }
        style.force_styling(colorize).apply_to(text).to_string()
    }

    /// Print `message` in this color.
    pub fn print(self, message: &str, emphasis: &Emphasis, output: &Output) -> io::Result<()> {
        let text = self.style(message, emphasis, output.colorize_enabled());
        output.write(&text)
    }
}

/// Text attributes applied on top of a foreground color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emphasis {
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
    pub italic: bool,
    pub blink: bool,
    pub reverse: bool,
    pub strikethrough: bool,
}

impl Emphasis {
    pub fn bold() -> Self {
        Self { bold: true, ..Self::default() }
    }

    pub fn italic() -> Self {
        Self { italic: true, ..Self::default() }
    }

    fn apply(&self, mut style: Style) -> Style {
        if let Some((bg, bright)) = self.bg.and_then(Color::base) {
            style = style.bg(bg);
            if bright {
                style = style.on_bright();
            }
        }
        if self.bold {
            style = style.bold();
        }
        if self.dim {
            style = style.dim();
        }
        if self.underline {
            style = style.underlined();
        }
        if self.italic {
            style = style.italic();
        }
        if self.blink {
            style = style.blink();
        }
        if self.reverse {
            style = style.reverse();
        }
        if self.strikethrough {
            style = style.strikethrough();
        }
        style
    }
}

/// Where and how to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Write to stderr instead of stdout.
    pub stderr: bool,
    pub newline: bool,
    /// Force colors on or off. `None` defers to `COLORIZE`, then the terminal.
    pub colorize: Option<bool>,
    /// Append to this file instead of writing to a terminal stream.
    pub file: Option<PathBuf>,
}

impl Default for Output {
    fn default() -> Self {
        Self { stderr: true, newline: true, colorize: None, file: None }
    }
}

impl Output {
    pub fn stdout() -> Self {
        Self { stderr: false, ..Self::default() }
    }

    pub fn colorize_enabled(&self) -> bool {
        self.colorize.or(*COLORIZE).unwrap_or_else(|| {
            if self.file.is_some() {
                false
            } else if self.stderr {
                console::colors_enabled_stderr()
            } else {
                console::colors_enabled()
            }
        })
    }

    fn write(&self, text: &str) -> io::Result<()> {
        if let Some(path) = &self.file {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(text.as_bytes())?;
            if self.newline {
                file.write_all(b"\n")?;
            }
            return file.flush();
        }
        let term = if self.stderr { Term::stderr() } else { Term::stdout() };
        if self.newline {
            term.write_line(text)
        } else {
            term.write_str(text)?;
            term.flush()
        }
    }
}

/// Status symbols with a fixed glyph and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum Symbol {
    /// '✘' red, blinking
    Critical,
    /// '✘' red
    Error,
    /// '✔' green
    Ok,
    /// '‼' cyan
    Notice,
    /// '◉' blue
    Success,
    /// '＋' magenta
    Verbose,
    /// '！' yellow
    Warning,
    /// '－' red
    Minus,
    /// '>' magenta
    More,
    /// '×' blue
    Multiply,
    /// '+' red
    Plus,
    /// '…' yellow
    Wait,
}

impl Symbol {
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Critical | Symbol::Error => "✘",
            Symbol::Ok => "✔",
            Symbol::Notice => "‼",
            Symbol::Success => "◉",
            Symbol::Verbose => "＋",
            Symbol::Warning => "！",
            Symbol::Minus => "－",
            Symbol::More => ">",
            Symbol::Multiply => "×",
            Symbol::Plus => "+",
            Symbol::Wait => "…",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Symbol::Critical | Symbol::Error | Symbol::Minus | Symbol::Plus => Color::Red,
            Symbol::Ok => Color::Green,
            Symbol::Notice => Color::Cyan,
            Symbol::Success | Symbol::Multiply => Color::Blue,
            Symbol::Verbose | Symbol::More => Color::Magenta,
            Symbol::Warning | Symbol::Wait => Color::Yellow,
        }
    }

    fn emphasis(self) -> Emphasis {
        Emphasis { blink: self == Symbol::Critical, ..Emphasis::bold() }
    }

    /// `"<glyph> <first><separator> <other>"`, with `first` bold and `other`
    /// italic. The separator only appears when `other` is non-empty.
    pub fn render(self, first: &str, other: &str, separator: &str, colorize: bool) -> String {
        let mut parts = vec![self.color().style(self.glyph(), &self.emphasis(), colorize)];
        if !first.is_empty() || !other.is_empty() {
            let head = if other.is_empty() {
                first.to_string()
            } else {
                format!("{first}{separator}")
            };
            parts.push(Color::Reset.style(&head, &Emphasis::bold(), colorize));
        }
        if !other.is_empty() {
            parts.push(Color::Reset.style(other, &Emphasis::italic(), colorize));
        }
        parts.join(" ")
    }

    pub fn print(self, first: &str, other: &str, separator: &str, output: &Output) -> io::Result<()> {
        let text = self.render(first, other, separator, output.colorize_enabled());
        output.write(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_text() {
        assert_eq!(Symbol::Ok.render("", "", ":", false), "✔");
        assert_eq!(Symbol::Ok.render("Install", "", ":", false), "✔ Install");
        assert_eq!(Symbol::Ok.render("Install", "Complete", ":", false), "✔ Install: Complete");
        assert_eq!(Symbol::Ok.render("Debug", "Error", " |", false), "✔ Debug | Error");
    }

    #[test]
    fn test_render_colorized_contains_ansi() {
        let text = Symbol::Error.render("Failed", "", ":", true);
        assert!(text.contains("\u{1b}["));
        assert_eq!(console::strip_ansi_codes(&text), "✘ Failed");
    }

    #[test]
    fn test_style_respects_colorize_flag() {
        assert_eq!(Color::Green.style("go", &Emphasis::default(), false), "go");
        let styled = Color::BrightRed.style("stop", &Emphasis::bold(), true);
        assert_ne!(styled, "stop");
        assert_eq!(console::strip_ansi_codes(&styled), "stop");
    }

    #[test]
    fn test_symbol_table() {
        assert_eq!(Symbol::Critical.glyph(), Symbol::Error.glyph());
        assert!(Symbol::Critical.emphasis().blink);
        assert!(!Symbol::Error.emphasis().blink);
        assert_eq!(Symbol::Wait.color(), Color::Yellow);
    }

    #[test]
    fn test_print_appends_to_file() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let path = tmp.path().join("status.txt");
        let output = Output { file: Some(path.clone()), colorize: Some(false), ..Output::default() };

        Symbol::Ok.print("Value", "2", " ==", &output).expect("print");
        Symbol::Error.print("Failed", "", ":", &output).expect("print");
        let written = std::fs::read_to_string(&path).expect("read");
        assert_eq!(written, "✔ Value == 2\n✘ Failed\n");
    }

    #[test]
    fn test_output_override_wins() {
        let forced = Output { colorize: Some(true), ..Output::default() };
        assert!(forced.colorize_enabled());
        let disabled = Output { colorize: Some(false), ..Output::stdout() };
        assert!(!disabled.colorize_enabled());
    }
}
