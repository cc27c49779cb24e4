use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TraceGraphConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Spacing between tree levels and leaf slots, in layout units.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 300.0,
            vertical_spacing: 150.0,
        }
    }
}

/// Opacities applied to everything off the highlighted path.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct HighlightConfig {
    pub dimmed_node_opacity: f64,
    pub dimmed_edge_opacity: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            dimmed_node_opacity: 0.3,
            dimmed_edge_opacity: 0.1,
        }
    }
}

impl TraceGraphConfig {
    /// Load from an optional TOML file, then `TRACEGRAPH__SECTION__KEY` env vars.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("TRACEGRAPH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_layout_constants() {
        let config = TraceGraphConfig::default();
        assert_eq!(config.layout.horizontal_spacing, 300.0);
        assert_eq!(config.layout.vertical_spacing, 150.0);
        assert_eq!(config.highlight.dimmed_node_opacity, 0.3);
        assert_eq!(config.highlight.dimmed_edge_opacity, 0.1);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = TraceGraphConfig::load("does-not-exist-tracegraph").unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.highlight, HighlightConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_named_sections() {
        let dir = std::env::temp_dir().join(format!("tracegraph-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.toml");
        std::fs::write(
            &path,
            "[layout]\nhorizontal_spacing = 200.0\n",
        )
        .unwrap();

        let config = TraceGraphConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.layout.horizontal_spacing, 200.0);
        assert_eq!(config.layout.vertical_spacing, 150.0);
        assert_eq!(config.highlight, HighlightConfig::default());

        std::fs::remove_dir_all(&dir).ok();
    }
}
