//! ANSI color codes for tree output.
//!
//! Tokens are status icon glyphs, info tags and analysis phases. Every code
//! in the table, and the `NO_COLOR` sentinel, is two decimal digits wide so a
//! wrapped token always grows by the same number of bytes.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::resources::{ANALYSIS_PHASE_PENDING, ANALYSIS_PHASE_RUNNING};
use crate::tree::{
    StatusIcon, INFO_TAG_ACTIVE, INFO_TAG_CANARY, INFO_TAG_PING, INFO_TAG_PONG, INFO_TAG_PREVIEW,
    INFO_TAG_STABLE,
};

pub type ColorCode = u8;

pub const RESET: ColorCode = 0;
pub const FG_RED: ColorCode = 31;
pub const FG_GREEN: ColorCode = 32;
pub const FG_YELLOW: ColorCode = 33;
pub const FG_DEFAULT: ColorCode = 39;
pub const FG_HI_BLUE: ColorCode = 94;

/// Returned for tokens that have no color. Renders in the terminal's
/// default foreground.
pub const NO_COLOR: ColorCode = FG_DEFAULT;

static COLOR_MAPPING: OnceLock<HashMap<&'static str, ColorCode>> = OnceLock::new();

fn color_mapping() -> &'static HashMap<&'static str, ColorCode> {
    COLOR_MAPPING.get_or_init(|| {
        HashMap::from([
            // icons (paused and neutral use the default foreground)
            (StatusIcon::Waiting.glyph(), FG_YELLOW),
            (StatusIcon::Progressing.glyph(), FG_HI_BLUE),
            (StatusIcon::Warning.glyph(), FG_RED),
            (StatusIcon::Unknown.glyph(), FG_YELLOW),
            (StatusIcon::Ok.glyph(), FG_GREEN),
            (StatusIcon::Bad.glyph(), FG_RED),
            // canary/stable/preview tags
            (INFO_TAG_CANARY, FG_YELLOW),
            (INFO_TAG_STABLE, FG_GREEN),
            (INFO_TAG_ACTIVE, FG_GREEN),
            (INFO_TAG_PREVIEW, FG_HI_BLUE),
            (INFO_TAG_PING, FG_HI_BLUE),
            (INFO_TAG_PONG, FG_HI_BLUE),
            // experiments and analysis runs still in flight
            (ANALYSIS_PHASE_PENDING, FG_HI_BLUE),
            (ANALYSIS_PHASE_RUNNING, FG_HI_BLUE),
        ])
    })
}

/// Color code for `token`, or [`NO_COLOR`] when the token is not mapped.
pub fn lookup(token: &str) -> ColorCode {
    color_mapping().get(token).copied().unwrap_or(NO_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [&str; 14] = [
        "◷", "◌", "⚠", "?", "✔", "✖", "canary", "stable", "active", "preview", "ping", "pong",
        "Pending", "Running",
    ];

    #[test]
    fn test_known_tokens_are_colored() {
        for token in KNOWN {
            assert_ne!(lookup(token), NO_COLOR, "token {token} should be mapped");
        }
        assert_eq!(lookup("✔"), FG_GREEN);
        assert_eq!(lookup("canary"), FG_YELLOW);
        assert_eq!(lookup("Running"), FG_HI_BLUE);
    }

    #[test]
    fn test_unknown_tokens_fall_back() {
        for token in ["", "Healthy", "॥", "•", "STABLE", "ready:1/1"] {
            assert_eq!(lookup(token), NO_COLOR);
        }
    }

    #[test]
    fn test_lookup_is_stable() {
        for token in KNOWN {
            assert_eq!(lookup(token), lookup(token));
        }
    }

    #[test]
    fn test_codes_share_width() {
        for token in KNOWN {
            assert_eq!(lookup(token).to_string().len(), NO_COLOR.to_string().len());
        }
    }
}
