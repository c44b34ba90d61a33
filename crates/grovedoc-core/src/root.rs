//! The root document: package and class indices for a whole run.
//!
//! [`RootDoc`] owns every [`ClassDoc`] in an arena. The flat index (qualified
//! name -> [`ClassId`]) and each [`PackageDoc`] (class name -> [`ClassId`])
//! hold handles into that arena, so a class replaced or resolved through one
//! index is the same instance seen through the other.
//!
//! The root moves through three states:
//!
//! ```text
//! Empty --put_classes / set_package_description--> Accumulating
//! Empty | Accumulating --resolve--> Resolved (terminal)
//! ```
//!
//! Once resolved, every mutating call fails with
//! [`DocError::AlreadyResolved`]; further `resolve()` calls do nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::error::DocError;
use crate::model::{qualify, ClassDoc, ClassId, PackageDoc};
use crate::resolve::Resolver;

// ============================================================================
// Policies and State
// ============================================================================

/// What happens when a class is added under a qualified name that is already
/// taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The later class replaces the earlier one silently.
    #[default]
    Overwrite,
    /// The later class replaces the earlier one and a diagnostic is recorded.
    Report,
    /// The earlier class is kept and a diagnostic is recorded.
    KeepFirst,
}

/// Lifecycle state of a [`RootDoc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildState {
    Empty,
    Accumulating,
    Resolved,
}

/// Outcome of [`RootDoc::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveSummary {
    /// Type references linked to a class of this run.
    pub resolved: usize,
    /// Type references left name-only (builtins excluded).
    pub unresolved: usize,
}

// ============================================================================
// Root Document
// ============================================================================

/// Package- and class-level index of a documentation run.
#[derive(Debug, Clone)]
pub struct RootDoc {
    classes: Vec<ClassDoc>,
    class_index: BTreeMap<String, ClassId>,
    packages: BTreeMap<String, PackageDoc>,
    state: BuildState,
    collision_policy: CollisionPolicy,
    summary: ResolveSummary,
}

impl Default for RootDoc {
    fn default() -> Self {
        RootDoc::new()
    }
}

impl RootDoc {
    pub fn new() -> Self {
        RootDoc {
            classes: Vec::new(),
            class_index: BTreeMap::new(),
            packages: BTreeMap::new(),
            state: BuildState::Empty,
            collision_policy: CollisionPolicy::default(),
            summary: ResolveSummary::default(),
        }
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == BuildState::Resolved
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    fn check_mutable(&self, operation: &str) -> Result<(), DocError> {
        if self.is_resolved() {
            return Err(DocError::already_resolved(operation));
        }
        Ok(())
    }

    fn package_entry(&mut self, package_path: &str) -> &mut PackageDoc {
        self.state = BuildState::Accumulating;
        self.packages
            .entry(package_path.to_string())
            .or_insert_with(|| {
                debug!(package = package_path, "created package");
                PackageDoc::new(package_path)
            })
    }

    /// Make sure a package exists, creating it if needed.
    pub fn ensure_package(&mut self, package_path: &str) -> Result<(), DocError> {
        self.check_mutable("create a package")?;
        self.package_entry(package_path);
        Ok(())
    }

    /// Set the description of a package, creating the package if needed.
    pub fn set_package_description(
        &mut self,
        package_path: &str,
        description: impl Into<String>,
    ) -> Result<(), DocError> {
        self.check_mutable("set a package description")?;
        self.package_entry(package_path)
            .set_description(description.into());
        Ok(())
    }

    /// Fold the classes of one source file into both indices.
    ///
    /// `classes` maps class names within `package_path` to their documents, as
    /// produced by the assembler for `file`. The package is created even if
    /// the map is empty. Name collisions follow the collision policy.
    ///
    /// Returns the handles of the classes that ended up in the root.
    pub fn put_classes(
        &mut self,
        package_path: &str,
        file: &str,
        classes: BTreeMap<String, ClassDoc>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<ClassId>, DocError> {
        self.check_mutable("add classes")?;
        self.package_entry(package_path);

        let mut stored = Vec::with_capacity(classes.len());
        for (name, mut doc) in classes {
            doc.name = name;
            doc.package_path = package_path.to_string();
            let qualified = doc.qualified_name();

            let id = match self.class_index.get(&qualified).copied() {
                None => {
                    let id = ClassId(self.classes.len() as u32);
                    self.classes.push(doc);
                    self.class_index.insert(qualified, id);
                    id
                }
                Some(id) => {
                    if self.collision_policy == CollisionPolicy::KeepFirst {
                        diagnostics.report(
                            file,
                            DiagnosticCategory::ClassCollision,
                            format!(
                                "{} already defined in {}; kept the earlier class",
                                qualified,
                                self.classes[id.index()].source_file
                            ),
                        );
                        continue;
                    }
                    if self.collision_policy == CollisionPolicy::Report {
                        diagnostics.report(
                            file,
                            DiagnosticCategory::ClassCollision,
                            format!(
                                "{} replaces the class from {}",
                                qualified,
                                self.classes[id.index()].source_file
                            ),
                        );
                    }
                    let previous = &self.classes[id.index()];
                    let (old_package, old_name) =
                        (previous.package_path.clone(), previous.name.clone());
                    if let Some(package) = self.packages.get_mut(&old_package) {
                        package.remove_if(&old_name, id);
                    }
                    debug!(class = %qualified, "replaced class");
                    self.classes[id.index()] = doc;
                    id
                }
            };

            let doc = &self.classes[id.index()];
            let name = doc.name.clone();
            self.package_entry(package_path).put(name, id);
            stored.push(id);
        }
        Ok(stored)
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Link every type reference to the class it names, where possible, and
    /// freeze the root.
    ///
    /// Calling this again returns the summary of the first call and changes
    /// nothing.
    pub fn resolve(&mut self) -> ResolveSummary {
        if self.is_resolved() {
            return self.summary;
        }

        let mut summary = ResolveSummary::default();
        let resolutions: Vec<Vec<Option<ClassId>>> = {
            let resolver = Resolver::new(&self.class_index);
            self.classes
                .iter()
                .map(|class| {
                    class
                        .type_refs()
                        .into_iter()
                        .map(|type_ref| resolver.resolve(class, type_ref))
                        .collect()
                })
                .collect()
        };

        for (class, links) in self.classes.iter_mut().zip(resolutions) {
            for (type_ref, link) in class.type_refs_mut().zip(links) {
                type_ref.resolved = link;
                if link.is_some() {
                    summary.resolved += 1;
                } else if !type_ref.is_builtin() {
                    summary.unresolved += 1;
                }
            }
        }

        info!(
            classes = self.class_index.len(),
            packages = self.packages.len(),
            resolved = summary.resolved,
            unresolved = summary.unresolved,
            "resolved root document"
        );
        self.summary = summary;
        self.state = BuildState::Resolved;
        summary
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Package with the given path (`pkg/a`).
    pub fn package_named(&self, package_path: &str) -> Option<&PackageDoc> {
        self.packages.get(package_path)
    }

    /// All packages, sorted by path.
    pub fn packages(&self) -> impl Iterator<Item = &PackageDoc> {
        self.packages.values()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Class behind a handle.
    pub fn class(&self, id: ClassId) -> Result<&ClassDoc, DocError> {
        self.classes
            .get(id.index())
            .ok_or(DocError::UnknownClass { id: id.0 })
    }

    /// Class with the given dotted qualified name.
    pub fn class_named(&self, qualified_name: &str) -> Option<&ClassDoc> {
        self.class_id(qualified_name)
            .and_then(|id| self.classes.get(id.index()))
    }

    pub fn class_id(&self, qualified_name: &str) -> Option<ClassId> {
        self.class_index.get(qualified_name).copied()
    }

    /// Class `class_name` of package `package_path`, looked up through the
    /// package index.
    pub fn class_in_package(&self, package_path: &str, class_name: &str) -> Option<&ClassDoc> {
        self.package_named(package_path)
            .and_then(|package| package.class_id(class_name))
            .and_then(|id| self.classes.get(id.index()))
    }

    /// All classes with their handles, sorted by qualified name.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDoc)> {
        self.class_index
            .values()
            .map(|id| (*id, &self.classes[id.index()]))
    }

    pub fn class_count(&self) -> usize {
        self.class_index.len()
    }

    /// Check that every indexed class is reachable from exactly one package,
    /// and that this package is the class's own.
    pub fn check_consistency(&self) -> Result<(), String> {
        for (qualified, id) in &self.class_index {
            let class = self.class(*id).map_err(|e| e.to_string())?;
            if qualify(&class.package_path, &class.name) != *qualified {
                return Err(format!("{} is indexed under {}", class.qualified_name(), qualified));
            }
            let owners: Vec<&str> = self
                .packages
                .values()
                .filter(|p| p.class_ids().any(|other| other == *id))
                .map(PackageDoc::name)
                .collect();
            if owners != [class.package_path.as_str()] {
                return Err(format!(
                    "{} is held by packages {:?}, expected [{}]",
                    qualified, owners, class.package_path
                ));
            }
        }
        for package in self.packages.values() {
            for id in package.class_ids() {
                let class = self.class(id).map_err(|e| e.to_string())?;
                if self.class_index.get(&class.qualified_name()) != Some(&id) {
                    return Err(format!(
                        "{} in package {} is missing from the class index",
                        class.name,
                        package.name()
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
