//! Name resolution for type references.
//!
//! Lookup order for a name used inside a class:
//!
//! 1. the name as a qualified name;
//! 2. classes nested in the owner or in any of its enclosing classes;
//! 3. classes of the owner's package;
//! 4. single-type imports (including aliased imports and imports of an outer
//!    class whose nested class is referenced as `Outer.Inner`);
//! 5. star imports.
//!
//! Generic arguments, array suffixes and varargs dots are stripped before
//! lookup. Primitives, `void` and `def` never resolve.

use std::collections::BTreeMap;

use crate::model::{qualify, ClassDoc, ClassId, TypeRef};

/// Read-only view of the flat class index used during resolution.
pub struct Resolver<'a> {
    index: &'a BTreeMap<String, ClassId>,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a BTreeMap<String, ClassId>) -> Self {
        Resolver { index }
    }

    /// Resolve `type_ref` as seen from inside `owner`.
    pub fn resolve(&self, owner: &ClassDoc, type_ref: &TypeRef) -> Option<ClassId> {
        if type_ref.is_builtin() {
            return None;
        }
        self.resolve_name(owner, type_ref.lookup_name())
    }

    /// Resolve a bare (undecorated) type name as seen from inside `owner`.
    pub fn resolve_name(&self, owner: &ClassDoc, name: &str) -> Option<ClassId> {
        if name.is_empty() {
            return None;
        }
        if name.contains('.') {
            if let Some(id) = self.index.get(name) {
                return Some(*id);
            }
        }

        let mut scope = Some(owner.name.as_str());
        while let Some(outer) = scope {
            let candidate = qualify(&owner.package_path, &format!("{}.{}", outer, name));
            if let Some(id) = self.index.get(&candidate) {
                return Some(*id);
            }
            scope = outer.rfind('.').map(|i| &outer[..i]);
        }

        if let Some(id) = self.index.get(&qualify(&owner.package_path, name)) {
            return Some(*id);
        }

        let head = name.split('.').next().unwrap_or(name);
        let rest = &name[head.len()..];
        for import in &owner.imports {
            if import.ends_with(".*") {
                continue;
            }
            let (path, alias) = split_alias(import);
            let simple = alias.unwrap_or_else(|| path.rsplit('.').next().unwrap_or(path));
            if simple == head {
                let candidate = format!("{}{}", path, rest);
                if let Some(id) = self.index.get(&candidate) {
                    return Some(*id);
                }
            }
        }

        for import in &owner.imports {
            if let Some(package) = import.strip_suffix(".*") {
                let candidate = format!("{}.{}", package, name);
                if let Some(id) = self.index.get(&candidate) {
                    return Some(*id);
                }
            }
        }

        None
    }
}

/// Split `a.b.C as D` into (`a.b.C`, `Some("D")`).
pub(crate) fn split_alias(import: &str) -> (&str, Option<&str>) {
    match import.split_once(" as ") {
        Some((path, alias)) => (path.trim(), Some(alias.trim())),
        None => (import.trim(), None),
    }
}

/// Qualified name an import makes visible as `simple`, if any.
///
/// Used by the assembler for external link lookup; star imports are not
/// considered.
pub(crate) fn imported_name<'i>(imports: &'i [String], simple: &str) -> Option<&'i str> {
    imports.iter().find_map(|import| {
        if import.ends_with(".*") {
            return None;
        }
        let (path, alias) = split_alias(import);
        let visible = alias.unwrap_or_else(|| path.rsplit('.').next().unwrap_or(path));
        (visible == simple).then_some(path)
    })
}
