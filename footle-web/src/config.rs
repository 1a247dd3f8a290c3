//! Gameplay configuration bundled with the web build.
use footle_game::FootleConfig;
use once_cell::sync::Lazy;

const EMBEDDED_CONFIG: &str = include_str!("../static/data/footle.json");

/// Parsed once on first use; a bad bundle falls back to defaults.
pub static CONFIG: Lazy<FootleConfig> = Lazy::new(|| load_config(EMBEDDED_CONFIG));

pub(crate) fn load_config(json: &str) -> FootleConfig {
    FootleConfig::from_json(json).unwrap_or_else(|err| {
        log::warn!("bundled config rejected, using defaults: {err}");
        FootleConfig::default_config()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        assert_eq!(FootleConfig::from_json(EMBEDDED_CONFIG).map(|c| c.search_limit), Ok(25));
        assert_eq!(CONFIG.storage_prefix, "footle");
    }

    #[test]
    fn invalid_bundle_falls_back() {
        let cfg = load_config(r#"{ "search_limit": 0 }"#);
        assert_eq!(cfg, FootleConfig::default_config());
    }
}
