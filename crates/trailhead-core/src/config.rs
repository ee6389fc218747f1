//! Router configuration.

use serde::{Deserialize, Serialize};

/// Behavioral switches for the dispatcher.
///
/// Plain data with builder-style setters, so host applications can either
/// construct it in code or deserialize it from their configuration files.
///
/// # Example
///
/// ```
/// use trailhead_core::RouterConfig;
///
/// let config = RouterConfig::new()
///     .redirect_trailing_slash(true)
///     .handle_method_not_allowed(true);
/// assert!(config.handle_method_not_allowed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Retry a failed match against the case-lowered path and the
    /// trailing-slash-toggled path, answering with a redirect when a
    /// retry succeeds. Default: on.
    pub redirect_trailing_slash: bool,
    /// Answer `405 Method Not Allowed` (with the allowed-method set) when
    /// the path is registered for other methods. Default: off, falling
    /// through to not-found handling.
    pub handle_method_not_allowed: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            handle_method_not_allowed: false,
        }
    }
}

impl RouterConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables redirect retries for near-miss paths.
    #[must_use]
    pub fn redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.redirect_trailing_slash = enabled;
        self
    }

    /// Enables or disables 405 responses.
    #[must_use]
    pub fn handle_method_not_allowed(mut self, enabled: bool) -> Self {
        self.handle_method_not_allowed = enabled;
        self
    }
}
