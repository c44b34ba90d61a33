//! Configuration handling for grovedoc
//!
//! Settings come from an optional `grovedoc.toml`. Command line flags are
//! applied on top of the loaded file by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use grovedoc_core::options::{LinkArgument, Properties};
use grovedoc_core::root::CollisionPolicy;

use crate::error::GrovedocError;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "grovedoc.toml";

/// Grovedoc configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Grovedoc-specific settings
    #[serde(default, alias = "groovydoc")]
    pub grovedoc: GrovedocConfig,
}

/// Which match wins when a file name exists under more than one source root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPolicy {
    /// Only the first root holding the file is used.
    #[default]
    FirstMatch,
    /// Every match is processed in search path order, so the last one wins.
    LastMatch,
    /// More than one match is reported and the file is skipped.
    Error,
}

/// Core grovedoc settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrovedocConfig {
    /// Source roots searched for each relative file name, in order
    #[serde(default = "default_source_path")]
    pub source_path: Vec<PathBuf>,

    /// Handling of names found under several roots
    #[serde(default)]
    pub search_policy: SearchPolicy,

    /// Handling of classes defined twice
    #[serde(default)]
    pub collision_policy: CollisionPolicy,

    /// Options bag handed to the document assembler
    #[serde(default)]
    pub properties: Properties,

    /// External documentation links
    #[serde(default)]
    pub links: Vec<LinkArgument>,
}

fn default_source_path() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

impl Default for GrovedocConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            search_policy: SearchPolicy::default(),
            collision_policy: CollisionPolicy::default(),
            properties: Properties::new(),
            links: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, GrovedocError> {
        let content = fs::read_to_string(path).map_err(|e| GrovedocError::io(path, e))?;
        toml::from_str(&content).map_err(|e| GrovedocError::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse config file: {}", e),
        })
    }

    /// Load `grovedoc.toml` from `dir` if it exists, defaults otherwise
    pub fn load_or_default(dir: &Path) -> Result<Self, GrovedocError> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_section_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.grovedoc.source_path, vec![PathBuf::from(".")]);
        assert_eq!(config.grovedoc.search_policy, SearchPolicy::FirstMatch);
        assert_eq!(config.grovedoc.collision_policy, CollisionPolicy::Overwrite);
        assert!(config.grovedoc.links.is_empty());
    }

    #[test]
    fn parses_full_file() {
        let config: Config = toml::from_str(
            r#"
[grovedoc]
source_path = ["src/main/groovy", "src/main/java"]
search_policy = "last-match"
collision_policy = "keep-first"

[grovedoc.properties]
privateScope = "true"

[[grovedoc.links]]
packages = "java.,javax."
href = "https://docs.oracle.com/javase/8/docs/api/"
"#,
        )
        .unwrap();
        let settings = config.grovedoc;
        assert_eq!(settings.source_path.len(), 2);
        assert_eq!(settings.search_policy, SearchPolicy::LastMatch);
        assert_eq!(settings.collision_policy, CollisionPolicy::KeepFirst);
        assert_eq!(settings.properties.get("privateScope"), Some("true"));
        assert_eq!(settings.links[0].packages, "java.,javax.");
    }

    #[test]
    fn groovydoc_alias_accepted() {
        let config: Config = toml::from_str("[groovydoc]\nsearch_policy = \"error\"\n").unwrap();
        assert_eq!(config.grovedoc.search_policy, SearchPolicy::Error);
    }

    #[test]
    fn unknown_policy_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[grovedoc]\nsearch_policy = \"random\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, GrovedocError::Config { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, GrovedocError::NotFound { .. }));
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.grovedoc.search_policy, SearchPolicy::FirstMatch);
    }
}
