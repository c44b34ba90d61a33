//! Pass-through options for the document assembler.
//!
//! The aggregation pipeline never interprets these; it hands them unchanged to
//! the [`ClassDocAssembler`](crate::assembler::ClassDocAssembler), which reads
//! the groovydoc-style scope and script properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Visibility;

// ============================================================================
// Properties
// ============================================================================

/// String-keyed option bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Boolean value of `key`; anything other than `true` (any case) is false.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of these properties.
    pub fn merge(&mut self, other: &Properties) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }
}

// ============================================================================
// Link Arguments
// ============================================================================

/// An external documentation target for a set of packages.
///
/// `packages` is a comma-separated list of package prefixes such as
/// `"java.,javax."`. `href` is opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkArgument {
    pub packages: String,
    pub href: String,
}

impl LinkArgument {
    pub fn new(packages: impl Into<String>, href: impl Into<String>) -> Self {
        LinkArgument {
            packages: packages.into(),
            href: href.into(),
        }
    }

    /// Package prefixes this link covers.
    pub fn package_prefixes(&self) -> impl Iterator<Item = &str> {
        self.packages
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Whether a qualified class name falls under this link.
    pub fn covers(&self, qualified_name: &str) -> bool {
        self.package_prefixes()
            .any(|prefix| qualified_name.starts_with(prefix))
    }
}

// ============================================================================
// Typed View
// ============================================================================

/// Assembler settings derived from [`Properties`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocOptions {
    /// Members less visible than this are left out.
    pub min_visibility: Visibility,
    /// Document script files as script classes.
    pub process_scripts: bool,
    /// Add the generated `main` and `run` methods to script classes.
    pub include_main_for_scripts: bool,
}

impl Default for DocOptions {
    fn default() -> Self {
        DocOptions {
            min_visibility: Visibility::Protected,
            process_scripts: true,
            include_main_for_scripts: true,
        }
    }
}

impl DocOptions {
    /// Read `privateScope`, `packageScope`, `publicScope`, `protectedScope`,
    /// `processScripts` and `includeMainForScripts`.
    ///
    /// The widest scope that is switched on wins; `protectedScope` is the
    /// default.
    pub fn from_properties(properties: &Properties) -> Self {
        let min_visibility = if properties.get_bool("privateScope", false) {
            Visibility::Private
        } else if properties.get_bool("packageScope", false) {
            Visibility::Package
        } else if properties.get_bool("protectedScope", false) {
            Visibility::Protected
        } else if properties.get_bool("publicScope", false) {
            Visibility::Public
        } else {
            Visibility::Protected
        };
        DocOptions {
            min_visibility,
            process_scripts: properties.get_bool("processScripts", true),
            include_main_for_scripts: properties.get_bool("includeMainForScripts", true),
        }
    }

    /// Whether a member with `visibility` is documented.
    pub fn includes(&self, visibility: Visibility) -> bool {
        visibility >= self.min_visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scope_is_protected() {
        let options = DocOptions::from_properties(&Properties::new());
        assert_eq!(options.min_visibility, Visibility::Protected);
        assert!(options.includes(Visibility::Public));
        assert!(options.includes(Visibility::Protected));
        assert!(!options.includes(Visibility::Package));
        assert!(options.process_scripts);
    }

    #[test]
    fn widest_enabled_scope_wins() {
        let props = Properties::new()
            .with("publicScope", "true")
            .with("packageScope", "TRUE");
        assert_eq!(
            DocOptions::from_properties(&props).min_visibility,
            Visibility::Package
        );
        let props = Properties::new().with("publicScope", "true");
        assert_eq!(
            DocOptions::from_properties(&props).min_visibility,
            Visibility::Public
        );
    }

    #[test]
    fn script_flags_can_be_disabled() {
        let props = Properties::new()
            .with("processScripts", "false")
            .with("includeMainForScripts", "no");
        let options = DocOptions::from_properties(&props);
        assert!(!options.process_scripts);
        assert!(!options.include_main_for_scripts);
    }

    #[test]
    fn link_prefixes_are_trimmed() {
        let link = LinkArgument::new("java., javax.", "https://docs.example/api/");
        assert_eq!(link.package_prefixes().collect::<Vec<_>>(), vec!["java.", "javax."]);
        assert!(link.covers("javax.swing.JFrame"));
        assert!(!link.covers("groovy.lang.Closure"));
    }

    #[test]
    fn merge_overrides_existing_keys() {
        let mut base = Properties::new().with("a", "1").with("b", "2");
        base.merge(&Properties::new().with("b", "3"));
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
    }
}
