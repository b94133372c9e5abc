//! Configuration for a playback session.

use bw_story::PassageId;

/// Configuration for a [`Player`](crate::Player).
///
/// Debug mode and breakpoints are authoring settings: they survive `stop`
/// and `restart` and are not part of a recorded playthrough.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Start with debug mode on.
    pub debug_mode: bool,
    /// Maximum number of entries kept in the error log.
    pub max_errors: usize,
    /// Passages flagged as breakpoints from the outset.
    pub breakpoints: Vec<PassageId>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            max_errors: 100,
            breakpoints: Vec::new(),
        }
    }
}

impl PlayerConfig {
    /// Turn debug mode on or off.
    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Set the error log capacity (at least 1).
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = max.max(1);
        self
    }

    /// Flag a passage as a breakpoint.
    pub fn with_breakpoint(mut self, passage: impl Into<PassageId>) -> Self {
        self.breakpoints.push(passage.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = PlayerConfig::default();
        assert!(!cfg.debug_mode);
        assert_eq!(cfg.max_errors, 100);
        assert!(cfg.breakpoints.is_empty());
    }

    #[test]
    fn builder_methods() {
        let cfg = PlayerConfig::default()
            .with_debug_mode(true)
            .with_max_errors(5)
            .with_breakpoint("cellar")
            .with_breakpoint("attic");
        assert!(cfg.debug_mode);
        assert_eq!(cfg.max_errors, 5);
        assert_eq!(cfg.breakpoints.len(), 2);
    }

    #[test]
    fn max_errors_clamped() {
        let cfg = PlayerConfig::default().with_max_errors(0);
        assert_eq!(cfg.max_errors, 1);
    }
}
