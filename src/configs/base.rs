use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::configs::*;

const CONFIG_PATHS: [&str; 2] = ["config.toml", "config.default.toml"];

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub host: HostProfile,
}

impl Config {
    /// Loads `config.toml`, falling back to `config.default.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_first_of(&CONFIG_PATHS)?.ok_or(ConfigError::NotFound)
    }

    /// Like [`Self::load`], but a missing file is `Ok(None)`.
    ///
    /// A file that exists and fails to read or parse is still an error.
    pub fn load_optional() -> Result<Option<Self>, ConfigError> {
        Self::load_first_of(&CONFIG_PATHS)
    }

    /// Loads the first existing path; `Ok(None)` when none exists.
    pub fn load_first_of<P: AsRef<Path>>(paths: &[P]) -> Result<Option<Self>, ConfigError> {
        for path in paths {
            let path: &Path = path.as_ref();
            if path.exists() {
                return Self::load_from(path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        if config_str.trim().is_empty() {
            return Err(ConfigError::Empty(display));
        }

        Self::parse(&config_str).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    pub fn parse(config_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Interface;

    const SAMPLE: &str = r#"
[logging]
level = "debug"

[host]
interfaces = ["offscreenCanvas", "mediaSource"]
supported_types = ['video/mp4; codecs="avc1.64002A"']
byte_code = true

[host.surface]
contexts = ["experimental-webgl"]
failing_contexts = ["webgl"]
offscreen_transfer = true
"#;

    #[test]
    fn parses_host_profile() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(
            config.host.interfaces,
            vec![Interface::OffscreenCanvas, Interface::MediaSource]
        );
        assert!(config.host.byte_code);
        assert_eq!(config.host.surface.contexts, vec!["experimental-webgl"]);
        assert_eq!(config.host.surface.failing_contexts, vec!["webgl"]);
        assert!(config.host.surface.limited_contexts.is_empty());
        assert_eq!(
            config.logging.and_then(|l| l.level).as_deref(),
            Some("debug")
        );
    }

    #[test]
    fn empty_document_is_a_bare_host() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.host, HostProfile::default());
        assert!(config.logging.is_none());
    }

    #[test]
    fn unknown_interface_is_rejected() {
        assert!(Config::parse("[host]\ninterfaces = [\"bluetooth\"]\n").is_err());
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "mediacaps-{}-{}.toml",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn no_candidate_file_is_none() {
        let loaded = Config::load_first_of(&["does/not/exist.toml", "nor/this.toml"]).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_candidate_is_a_parse_error() {
        let path = scratch_file("typo", "[host]\ninterfaces = [\"mediaSorce\"]\n");
        let result = Config::load_first_of(&[path.as_path()]);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn blank_candidate_is_an_error() {
        let path = scratch_file("blank", "  \n");
        let result = Config::load_first_of(&[path.as_path()]);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Empty(_))));
    }

    #[test]
    fn first_existing_candidate_wins() {
        let path = scratch_file("valid", "[host]\nbyte_code = true\n");
        let result = Config::load_first_of(&[Path::new("does/not/exist.toml"), path.as_path()]);
        std::fs::remove_file(&path).ok();
        assert!(result.unwrap().unwrap().host.byte_code);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load_from("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { ref path, .. } if path.contains("exist.toml")));
    }
}
