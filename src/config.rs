use crate::core::ZoneId;
use crate::source::{CandidateSource, FileSource, HttpSource};
use crate::terminal::RenderMode;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_PLACEHOLDER: &str = "به چه خدمتی نیاز دارید؟";
const DEFAULT_MAX_VISIBLE: usize = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Http { base_url: String },
    File { path: PathBuf },
}

/// ```yaml
/// zone_id: "1"
/// source:
///   kind: http
///   base_url: http://localhost:3000
/// placeholder: به چه خدمتی نیاز دارید؟
/// max_visible: 6
/// render_mode: inline
/// log_file: /tmp/service-search.log
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub zone_id: ZoneId,
    pub source: Option<SourceConfig>,
    pub placeholder: String,
    pub max_visible: usize,
    pub render_mode: RenderMode,
    pub log_file: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            zone_id: ZoneId::default(),
            source: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            max_visible: DEFAULT_MAX_VISIBLE,
            render_mode: RenderMode::default(),
            log_file: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub zone_id: Option<String>,
    pub base_url: Option<String>,
    pub file: Option<PathBuf>,
    pub placeholder: Option<String>,
    pub max_visible: Option<usize>,
    pub altscreen: bool,
    pub log_file: Option<PathBuf>,
}

impl SearchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// A file path on the command line wins over a URL, and either replaces
    /// whatever source the file configured.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(zone) = overrides.zone_id {
            self.zone_id = ZoneId::new(zone);
        }
        if let Some(base_url) = overrides.base_url {
            self.source = Some(SourceConfig::Http { base_url });
        }
        if let Some(path) = overrides.file {
            self.source = Some(SourceConfig::File { path });
        }
        if let Some(placeholder) = overrides.placeholder {
            self.placeholder = placeholder;
        }
        if let Some(max_visible) = overrides.max_visible {
            self.max_visible = max_visible;
        }
        if overrides.altscreen {
            self.render_mode = RenderMode::AltScreen;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.source {
            None => {
                return Err(ConfigError::Invalid(
                    "no candidate source; pass --url or --file, or set `source` in the config"
                        .to_string(),
                ));
            }
            Some(SourceConfig::Http { base_url }) if base_url.trim().is_empty() => {
                return Err(ConfigError::Invalid("source.base_url is empty".to_string()));
            }
            Some(_) => {}
        }
        if self.max_visible == 0 {
            return Err(ConfigError::Invalid(
                "max_visible must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build_source(&self) -> Result<Box<dyn CandidateSource>, ConfigError> {
        self.validate()?;
        match &self.source {
            Some(SourceConfig::Http { base_url }) => Ok(Box::new(HttpSource::new(base_url))),
            Some(SourceConfig::File { path }) => Ok(Box::new(FileSource::new(path))),
            None => Err(ConfigError::Invalid("no candidate source".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SearchConfig = serde_yaml::from_str(
            "source:\n  kind: http\n  base_url: http://localhost:3000\n",
        )
        .expect("config should parse");
        assert_eq!(config.zone_id, ZoneId::new("1"));
        assert_eq!(config.placeholder, "به چه خدمتی نیاز دارید؟");
        assert_eq!(config.max_visible, DEFAULT_MAX_VISIBLE);
        assert_eq!(config.render_mode, RenderMode::Inline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_file_source_and_altscreen() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "zone_id: \"42\"\nsource:\n  kind: file\n  path: services.json\nrender_mode: altscreen\nmax_visible: 3"
        )
        .expect("write config");

        let config = SearchConfig::load(file.path()).expect("config should load");
        assert_eq!(config.zone_id.as_str(), "42");
        assert_eq!(
            config.source,
            Some(SourceConfig::File {
                path: PathBuf::from("services.json")
            })
        );
        assert_eq!(config.render_mode, RenderMode::AltScreen);
        assert_eq!(config.max_visible, 3);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "max_visible: [not, a, number]").expect("write config");
        let err = SearchConfig::load(file.path()).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_take_precedence() {
        let base = SearchConfig {
            source: Some(SourceConfig::Http {
                base_url: "http://a".to_string(),
            }),
            ..SearchConfig::default()
        };
        let config = base.apply(Overrides {
            zone_id: Some("9".to_string()),
            file: Some(PathBuf::from("local.json")),
            max_visible: Some(2),
            altscreen: true,
            ..Overrides::default()
        });
        assert_eq!(config.zone_id.as_str(), "9");
        assert_eq!(
            config.source,
            Some(SourceConfig::File {
                path: PathBuf::from("local.json")
            })
        );
        assert_eq!(config.max_visible, 2);
        assert_eq!(config.render_mode, RenderMode::AltScreen);
    }

    #[test]
    fn source_is_required() {
        let err = SearchConfig::default()
            .validate()
            .expect_err("no source configured");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_rows_is_rejected() {
        let config = SearchConfig {
            source: Some(SourceConfig::File {
                path: PathBuf::from("x.json"),
            }),
            max_visible: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
