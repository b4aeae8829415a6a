//! ANSI escape handling for terminal output.
//!
//! Column widths are computed from [`visible_width`], which ignores escape
//! sequences, so wrapping a cell in color codes never shifts the columns.

use std::borrow::Cow;
use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::colors::{self, ColorCode, RESET};
use crate::structs::RenderOptions;

const ESCAPE: char = '\x1b';

/// Whether the output terminal can show color. Resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    #[default]
    Supported,
    Dumb,
}

impl ColorSupport {
    pub fn detect() -> Self {
        Self::from_term(std::env::var("TERM").ok().as_deref())
    }

    pub fn from_term(term: Option<&str>) -> Self {
        match term {
            Some("dumb") => ColorSupport::Dumb,
            _ => ColorSupport::Supported,
        }
    }
}

/// Wraps text in SGR sequences when color output is enabled.
#[derive(Debug, Clone, Copy)]
pub struct AnsiFormatter {
    color: bool,
}

impl AnsiFormatter {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            color: options.color_enabled(),
        }
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Wraps `text` between `ESC[<codes>m` and `ESC[0m`. Returns the text
    /// untouched when color is disabled or no codes are given.
    pub fn format(&self, text: &str, codes: &[ColorCode]) -> String {
        if !self.color || codes.is_empty() {
            return text.to_string();
        }
        let sequence = codes
            .iter()
            .map(ColorCode::to_string)
            .collect::<Vec<_>>()
            .join(";");
        format!("{ESCAPE}[{sequence}m{text}{ESCAPE}[{RESET}m")
    }

    /// Colors a well known word by itself.
    pub fn colorize(&self, token: &str) -> String {
        self.colorize_status(token, token)
    }

    /// Colors `text` with the color mapped to `token`. Unmapped tokens are
    /// still wrapped, with the default foreground.
    pub fn colorize_status(&self, text: &str, token: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        self.format(text, &[colors::lookup(token)])
    }
}

/// Removes CSI escape sequences (`ESC [ params final`) from `s`.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            // parameters and intermediates, up to and including the final byte
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
    }
    Cow::Owned(out)
}

/// Display width of `s` on a terminal, escape sequences excluded.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_ref())
}

/// Clears the screen and homes the cursor: `ESC[H ESC[2J ESC[0;0H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearScreen;

impl crossterm::Command for ClearScreen {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[H\x1b[2J")?;
        f.write_str("\x1b[0;0H")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        use crossterm::Command;

        crossterm::terminal::Clear(crossterm::terminal::ClearType::All).execute_winapi()?;
        crossterm::cursor::MoveTo(0, 0).execute_winapi()
    }
}
