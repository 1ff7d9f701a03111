#![forbid(unsafe_code)]

//! Frame driver configuration.
//!
//! # Environment Variables
//!
//! - `TESSEL_PAINT_CACHE`: `0`/`false`/`no`/`off` disables canvas reuse,
//!   `1`/`true`/`yes`/`on` enables it. Anything else keeps the default.

/// Environment variable toggling canvas reuse.
pub const ENV_PAINT_CACHE: &str = "TESSEL_PAINT_CACHE";

/// Settings for [`Tree`](crate::Tree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Reuse a render object's previous canvas when nothing that affects it
    /// changed since the last frame.
    pub paint_cache: bool,
    /// Write the viewport size into the root scope before every layout pass.
    pub publish_viewport: bool,
    /// Scope variable holding the viewport width, also consulted for
    /// unfixed widths during layout.
    pub width_var: String,
    /// Scope variable holding the viewport height, also consulted for
    /// unfixed heights during layout.
    pub height_var: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paint_cache: true,
            publish_viewport: true,
            width_var: "width".to_owned(),
            height_var: "height".to_owned(),
        }
    }
}

impl RenderConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(enabled) = get_env(ENV_PAINT_CACHE).and_then(|v| parse_bool(&v)) {
            config.paint_cache = enabled;
        }
        config
    }

    #[must_use]
    pub fn with_paint_cache(mut self, enabled: bool) -> Self {
        self.paint_cache = enabled;
        self
    }

    #[must_use]
    pub fn with_viewport_vars(mut self, publish: bool) -> Self {
        self.publish_viewport = publish;
        self
    }

    /// Rename the viewport variables.
    #[must_use]
    pub fn with_viewport_names(
        mut self,
        width: impl Into<String>,
        height: impl Into<String>,
    ) -> Self {
        self.width_var = width.into();
        self.height_var = height.into();
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map_env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert!(config.paint_cache);
        assert!(config.publish_viewport);
        assert_eq!(config.width_var, "width");
        assert_eq!(config.height_var, "height");
    }

    #[test]
    fn env_disables_cache() {
        for value in ["0", "false", "OFF", " no "] {
            let config = RenderConfig::from_env_with(map_env(&[(ENV_PAINT_CACHE, value)]));
            assert!(!config.paint_cache, "value {value:?}");
        }
    }

    #[test]
    fn env_garbage_keeps_default() {
        let config = RenderConfig::from_env_with(map_env(&[(ENV_PAINT_CACHE, "maybe")]));
        assert!(config.paint_cache);
        assert!(RenderConfig::from_env_with(map_env(&[])).paint_cache);
    }

    #[test]
    fn builders() {
        let config = RenderConfig::default()
            .with_paint_cache(false)
            .with_viewport_vars(false)
            .with_viewport_names("cols", "rows");
        assert!(!config.paint_cache);
        assert!(!config.publish_viewport);
        assert_eq!(config.width_var, "cols");
        assert_eq!(config.height_var, "rows");
    }
}
