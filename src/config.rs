use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::inline::ItalicDelimiter;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub markdown: MarkdownConfig,
}

/// Directory layout of a site, relative to its root.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub public_dir: PathBuf,
    pub template: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            public_dir: PathBuf::from("public"),
            template: PathBuf::from("template.html"),
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MarkdownConfig {
    pub italic_delimiter: ItalicDelimiter,
}

impl Config {
    /// The configuration bundled with the crate.
    ///
    /// `build.rs` validates the bundled file, so falling back to
    /// `Default` only happens if the two drift apart.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled default if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::compiled_default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn compiled_default_matches_default_impl() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.site.public_dir, PathBuf::from("public"));
        assert_eq!(config.markdown.italic_delimiter, ItalicDelimiter::Asterisk);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mdsite.toml");
        fs::write(
            &path,
            "[site]\npublic_dir = \"docs\"\n\n[markdown]\nitalic_delimiter = \"_\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.site.public_dir, PathBuf::from("docs"));
        assert_eq!(config.site.content_dir, PathBuf::from("content"));
        assert_eq!(config.markdown.italic_delimiter, ItalicDelimiter::Underscore);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mdsite.toml");
        fs::write(&path, "[markdown]\nitalic_delimiter = \"~\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mdsite.toml");
        fs::create_dir(&path).unwrap();

        let err = Config::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Read { path: p, .. } if p == path));
    }
}
