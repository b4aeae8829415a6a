use std::time::Duration;

use crate::ansi::ColorSupport;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Per invocation settings shared by the renderer and the watch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub watch: bool,
    pub no_color: bool,
    /// Stops the watch loop once elapsed. `None` watches until cancelled.
    pub timeout: Option<Duration>,
    pub refresh_interval: Duration,
    pub color_support: ColorSupport,
}

impl RenderOptions {
    pub fn color_enabled(&self) -> bool {
        !self.no_color && self.color_support == ColorSupport::Supported
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            watch: false,
            no_color: false,
            timeout: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            color_support: ColorSupport::Supported,
        }
    }
}

/// Parent resource kinds the `get` command can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Rollout,
    Experiment,
}

impl ParentKind {
    /// Kind name used for completion lookups.
    pub fn kind(self) -> &'static str {
        match self {
            ParentKind::Rollout => "rollout",
            ParentKind::Experiment => "experiment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_enabled() {
        let options = RenderOptions::default();
        assert!(options.color_enabled());

        let no_color = RenderOptions {
            no_color: true,
            ..Default::default()
        };
        assert!(!no_color.color_enabled());

        let dumb = RenderOptions {
            color_support: ColorSupport::Dumb,
            ..Default::default()
        };
        assert!(!dumb.color_enabled());
    }
}
