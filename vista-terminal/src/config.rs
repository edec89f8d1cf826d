//! Loading engine settings from RON files
use anyhow::Context;
use std::fs;
use std::path::Path;
use vista_core::EngineConfig;

/// Load settings from `path`, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let text = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("invalid config {}", path.display()))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate a RON document such as
/// `(reveal: (threshold: 0.15), tilt: (maxTiltDeg: 4.0))`.
/// Omitted fields keep their defaults.
pub fn parse_config(text: &str) -> anyhow::Result<EngineConfig> {
    let config: EngineConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::{Insets, RevealConfig, TiltConfig};

    #[test]
    fn test_no_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = parse_config("(reveal: (threshold: 0.15, rootMarginPx: (bottom: -20.0)), tilt: (maxTiltDeg: 4.0))")
            .unwrap();
        assert_eq!(config.reveal, RevealConfig::new(0.15, Insets::new(0.0, 0.0, -20.0, 0.0)));
        assert_eq!(config.tilt.max_tilt_deg, 4.0);
        assert_eq!(config.tilt.hover_scale, TiltConfig::DEFAULT_HOVER_SCALE);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse_config("()").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(parse_config("(reveal: (threshold: 2.0))").is_err());
        assert!(parse_config("(tilt: (hoverScale: -1.0))").is_err());
        assert!(parse_config("(reveal: ").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/vista.ron"))).is_err());
    }
}
