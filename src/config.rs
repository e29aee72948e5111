//! Extension configuration.
//!
//! The player assets can either be served by the host’s own resource loader,
//! or pulled straight from a CDN with a `<link>` and `<script>` pair injected
//! into the page head. The setting names match the ones used by the
//! MediaWiki extension so an existing `LocalSettings` export can be reused.

use serde::Deserialize;
use std::path::Path;

/// A configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON, or has the wrong shape.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Player configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// If true, the player is loaded through the host resource loader as
    /// [`MODULE_NAME`]. Otherwise, its assets are injected from the CDN.
    #[serde(rename = "Sm2Shim_UseResourceManager", alias = "use_resource_manager")]
    pub use_resource_manager: bool,

    /// The base URL of the CDN, without a trailing slash.
    #[serde(rename = "Sm2Shim_ExternalCDNEndpoint", alias = "external_cdn_endpoint")]
    pub external_cdn_endpoint: String,

    /// The version-control identifier baked into the CDN asset file names.
    #[serde(
        rename = "Sm2Shim_ExternalCDNVersionControlId",
        alias = "external_cdn_version_control_id"
    )]
    pub external_cdn_version_control_id: String,
}

/// The name of the resource loader module holding the player script and
/// styles.
pub const MODULE_NAME: &str = "ext.sm2Shim";

impl Default for Config {
    fn default() -> Self {
        Self {
            use_resource_manager: true,
            external_cdn_endpoint: String::new(),
            external_cdn_version_control_id: String::new(),
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// The URL of the player stylesheet on the CDN.
    pub fn cdn_stylesheet(&self) -> String {
        format!(
            "{}/css/player-ui.min.{}.css",
            self.external_cdn_endpoint, self.external_cdn_version_control_id
        )
    }

    /// The URL of the player script bundle on the CDN.
    pub fn cdn_script(&self) -> String {
        format!(
            "{}/js/player-bundled.min.{}.js",
            self.external_cdn_endpoint, self.external_cdn_version_control_id
        )
    }

    /// The raw HTML to inject into the page head when the resource loader is
    /// not in use.
    pub fn cdn_head_item(&self) -> String {
        format!(
            r#"<link rel="stylesheet" href="{}"><script type="text/javascript" src="{}"></script>"#,
            self.cdn_stylesheet(),
            self.cdn_script()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mediawiki_names() {
        let config = Config::from_json(
            r#"{
                "Sm2Shim_UseResourceManager": false,
                "Sm2Shim_ExternalCDNEndpoint": "https://cdn.example.com/sm2",
                "Sm2Shim_ExternalCDNVersionControlId": "abc123"
            }"#,
        )
        .unwrap();
        assert!(!config.use_resource_manager);
        assert_eq!(
            config.cdn_stylesheet(),
            "https://cdn.example.com/sm2/css/player-ui.min.abc123.css"
        );
        assert_eq!(
            config.cdn_script(),
            "https://cdn.example.com/sm2/js/player-bundled.min.abc123.js"
        );
    }

    #[test]
    fn defaults_and_aliases() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
        let config = Config::from_json(r#"{ "external_cdn_endpoint": "//cdn" }"#).unwrap();
        assert!(config.use_resource_manager);
        assert_eq!(config.external_cdn_endpoint, "//cdn");
        assert!(Config::from_json(r#"{ "nope": 1 }"#).is_err());
    }
}
