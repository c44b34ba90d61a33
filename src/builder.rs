//! Batch driver: turns a list of relative file names into a resolved
//! [`RootDoc`].
//!
//! Files are processed one at a time, in the order given. Each file is routed
//! by name (see [`crate::dispatch`]); source files are parsed and assembled
//! into class documents, `package.html` files set the description of their
//! package. Per-file failures are recorded in the [`Diagnostics`] collector
//! and leave the root untouched; only I/O failures and lifecycle misuse stop
//! the batch.
//!
//! The package of a file is its parent directory (`pkg/a/Foo.java` belongs to
//! `pkg/a`). Package declarations inside the source are not consulted.

use std::fs;
use std::path::PathBuf;

use grovedoc_core::assembler::ClassDocAssembler;
use grovedoc_core::diagnostics::{DiagnosticCategory, Diagnostics};
use grovedoc_core::error::DocError;
use grovedoc_core::markup::extract_body_text;
use grovedoc_core::model::ClassId;
use grovedoc_core::root::{ResolveSummary, RootDoc};
use tracing::{debug, info, info_span};

use crate::config::{GrovedocConfig, SearchPolicy};
use crate::dispatch::{base_name, FrontEnds, SourceKind};
use crate::error::GrovedocError;
use crate::files;

/// What processing one file did to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Classes stored (possibly none, for a file without declarations).
    Classes(Vec<ClassId>),
    /// The package description was set.
    Description,
    /// The file was skipped; a diagnostic says why.
    Skipped,
}

/// Package path of a relative file name: its parent directory with `/`
/// separators, empty for a file at a source root. Empty and `.` segments
/// are dropped.
pub fn package_path_of(file_name: &str) -> String {
    let mut segments: Vec<&str> = file_name.split(['/', '\\']).collect();
    segments.pop();
    segments.retain(|segment| !segment.is_empty() && *segment != ".");
    segments.join("/")
}

/// Accumulates files into one [`RootDoc`].
#[derive(Debug)]
pub struct RootDocBuilder {
    settings: GrovedocConfig,
    front_ends: FrontEnds,
    root: RootDoc,
}

impl RootDocBuilder {
    pub fn new(settings: GrovedocConfig) -> Self {
        let root = RootDoc::new().with_collision_policy(settings.collision_policy);
        RootDocBuilder {
            settings,
            front_ends: FrontEnds::new(),
            root,
        }
    }

    pub fn settings(&self) -> &GrovedocConfig {
        &self.settings
    }

    /// Locate, read and process each relative file name under the search
    /// path.
    pub fn build_tree<S: AsRef<str>>(
        &mut self,
        file_names: &[S],
        diagnostics: &mut Diagnostics,
    ) -> Result<(), GrovedocError> {
        let span = info_span!("build_tree", files = file_names.len());
        let _guard = span.enter();

        for file_name in file_names {
            let file_name = file_name.as_ref();
            for path in self.select_sources(file_name, diagnostics) {
                let bytes = fs::read(&path).map_err(|e| GrovedocError::io(&path, e))?;
                let source = String::from_utf8_lossy(&bytes);
                debug!(file = file_name, path = %path.display(), "processing");
                self.process_source(file_name, &source, diagnostics)?;
            }
        }

        info!(
            packages = self.root.package_count(),
            classes = self.root.class_count(),
            skipped = diagnostics.skipped_files().count(),
            "processed files"
        );
        Ok(())
    }

    /// Copies of `file_name` to read, per the search policy.
    fn select_sources(&self, file_name: &str, diagnostics: &mut Diagnostics) -> Vec<PathBuf> {
        let mut matches = files::locate(&self.settings.source_path, file_name);
        if matches.is_empty() {
            debug!(file = file_name, "not found under any source root");
            return matches;
        }
        match self.settings.search_policy {
            SearchPolicy::FirstMatch => {
                matches.truncate(1);
                matches
            }
            SearchPolicy::LastMatch => matches,
            SearchPolicy::Error if matches.len() > 1 => {
                let found = matches
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                diagnostics.report(
                    file_name,
                    DiagnosticCategory::AmbiguousSource,
                    format!("found under more than one source root: {}", found),
                );
                Vec::new()
            }
            SearchPolicy::Error => matches,
        }
    }

    /// Fold one file's text into the root.
    ///
    /// `file_name` is the relative name; it decides both the route and the
    /// package. A file that fails to parse, or a description whose markup is
    /// malformed, is reported and changes nothing.
    pub fn process_source(
        &mut self,
        file_name: &str,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<FileOutcome, GrovedocError> {
        if self.root.is_resolved() {
            return Err(DocError::AlreadyResolved {
                operation: format!("process {}", file_name),
            }
            .into());
        }

        let package_path = package_path_of(file_name);
        match SourceKind::classify(file_name) {
            SourceKind::Description => match extract_body_text(source) {
                Ok(text) => {
                    self.root.set_package_description(&package_path, text)?;
                    Ok(FileOutcome::Description)
                }
                Err(err) => {
                    diagnostics.report(file_name, DiagnosticCategory::Markup, err.to_string());
                    Ok(FileOutcome::Skipped)
                }
            },
            SourceKind::Source(language) => {
                let tree = match self.front_ends.parse(language, file_name, source) {
                    Ok(tree) => tree,
                    Err(err) => {
                        diagnostics.report(file_name, err.category(), err.to_string());
                        return Ok(FileOutcome::Skipped);
                    }
                };

                let assembler = ClassDocAssembler::new(
                    package_path.as_str(),
                    base_name(file_name),
                    &self.settings.links,
                    &self.settings.properties,
                );
                let mut classes = assembler.assemble(&tree);
                for class in classes.values_mut() {
                    class.source_file = file_name.to_string();
                }

                let ids = self
                    .root
                    .put_classes(&package_path, file_name, classes, diagnostics)?;
                Ok(FileOutcome::Classes(ids))
            }
        }
    }

    /// The root as accumulated so far, unresolved.
    pub fn root(&self) -> &RootDoc {
        &self.root
    }

    /// Resolve the root. Safe to call more than once.
    pub fn resolve(&mut self) -> ResolveSummary {
        self.root.resolve()
    }

    /// The finalized root document.
    pub fn root_doc(&mut self) -> &RootDoc {
        self.root.resolve();
        &self.root
    }

    pub fn into_root_doc(mut self) -> RootDoc {
        self.root.resolve();
        self.root
    }
}
