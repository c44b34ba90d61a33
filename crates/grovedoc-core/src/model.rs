//! Documentation model: class, member and package records.
//!
//! [`ClassDoc`]s are produced per file by the assembler and owned by the
//! [`RootDoc`](crate::root::RootDoc) arena afterwards. Package and flat indices
//! refer to them by [`ClassId`].
//!
//! Type references start out as name-only placeholders ([`TypeRef`] with
//! `resolved == None`); only [`RootDoc::resolve`](crate::root::RootDoc::resolve)
//! links them to classes.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::comment::DocComment;

// ============================================================================
// Identifiers
// ============================================================================

/// Handle of a class in the root document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub u32);

impl ClassId {
    pub fn new(id: u32) -> Self {
        ClassId(id)
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class_{}", self.0)
    }
}

// ============================================================================
// Names
// ============================================================================

/// Dotted package name for a package path (`pkg/a` -> `pkg.a`).
pub fn package_name_of(package_path: &str) -> String {
    package_path.trim_matches('/').replace('/', ".")
}

/// Qualified class name for a class declared under `package_path`.
///
/// Classes of the default package keep their bare name.
pub fn qualify(package_path: &str, class_name: &str) -> String {
    let package = package_name_of(package_path);
    if package.is_empty() {
        class_name.to_string()
    } else {
        format!("{}.{}", package, class_name)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Access level of a class or member, ordered from least to most visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Package,
    Protected,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Package => "package",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }
}

/// What sort of type a [`ClassDoc`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Trait,
    Annotation,
    /// A script file documented as a class.
    Script,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Trait => "trait",
            ClassKind::Annotation => "annotation",
            ClassKind::Script => "script",
        }
    }
}

// ============================================================================
// Type References
// ============================================================================

/// A reference to a type by name, linked to a class once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    /// Type as written, including generic arguments and array suffixes.
    pub name: String,
    /// Class this name resolved to; `None` until resolution, or if the type is
    /// not part of this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ClassId>,
    /// Link target for types covered by an external link argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<String>,
}

impl TypeRef {
    /// An unresolved placeholder.
    pub fn new(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            resolved: None,
            external: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// The class name to look up: generic arguments, array suffixes and
    /// varargs dots removed.
    pub fn lookup_name(&self) -> &str {
        let name = self.name.trim();
        let name = match name.find('<') {
            Some(i) => &name[..i],
            None => name,
        };
        let name = match name.find('[') {
            Some(i) => &name[..i],
            None => name,
        };
        name.trim_end_matches("...").trim()
    }

    /// Whether this names a primitive, `void`, or the dynamic type.
    pub fn is_builtin(&self) -> bool {
        matches!(
            self.lookup_name(),
            "def"
                | "void"
                | "boolean"
                | "byte"
                | "char"
                | "short"
                | "int"
                | "long"
                | "float"
                | "double"
        )
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Members
// ============================================================================

/// A field or property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub visibility: Visibility,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub comment: DocComment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
    pub line: u32,
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub varargs: bool,
    pub annotations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A method, constructor, or annotation element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDoc {
    pub name: String,
    /// Return type; `None` for constructors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    pub type_parameters: Vec<String>,
    pub params: Vec<ParamDoc>,
    pub throws: Vec<TypeRef>,
    pub visibility: Visibility,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub comment: DocComment,
    /// Default value of an annotation element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub line: u32,
}

impl MethodDoc {
    /// `name(Type1, Type2)` signature used for display and overload matching.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.type_ref.name.as_str()).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

/// An enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumConstantDoc {
    pub name: String,
    pub comment: DocComment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    pub line: u32,
}

// ============================================================================
// Class Documentation
// ============================================================================

/// Documentation record for one class-like type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    /// Name within its package; nested classes use `Outer.Inner`.
    pub name: String,
    /// Package path with `/` separators (`pkg/a`); empty for the default package.
    pub package_path: String,
    /// Relative source file name the class was declared in.
    pub source_file: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub type_parameters: Vec<String>,
    pub comment: DocComment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<FieldDoc>,
    pub properties: Vec<FieldDoc>,
    pub constructors: Vec<MethodDoc>,
    pub methods: Vec<MethodDoc>,
    pub enum_constants: Vec<EnumConstantDoc>,
    /// Import statements of the declaring file, as written (`a.b.C`, `a.b.*`,
    /// `a.b.C as D`).
    pub imports: Vec<String>,
    /// Name of the enclosing class for nested classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer: Option<String>,
    /// Names of directly nested classes.
    pub nested: Vec<String>,
    pub line: u32,
}

impl ClassDoc {
    pub fn new(name: impl Into<String>, package_path: impl Into<String>, kind: ClassKind) -> Self {
        ClassDoc {
            name: name.into(),
            package_path: package_path.into(),
            source_file: String::new(),
            kind,
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            comment: DocComment::default(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            enum_constants: Vec::new(),
            imports: Vec::new(),
            outer: None,
            nested: Vec::new(),
            line: 0,
        }
    }

    /// Dotted qualified name (`pkg.a.Foo`, `pkg.a.Outer.Inner`).
    pub fn qualified_name(&self) -> String {
        qualify(&self.package_path, &self.name)
    }

    /// Dotted package name.
    pub fn package_name(&self) -> String {
        package_name_of(&self.package_path)
    }

    /// Last segment of the name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_deprecated(&self) -> bool {
        self.comment.is_deprecated() || self.annotations.iter().any(|a| a == "Deprecated")
    }

    /// Every type reference held by this class, for resolution.
    pub fn type_refs_mut(&mut self) -> impl Iterator<Item = &mut TypeRef> {
        let superclass = self.superclass.iter_mut();
        let interfaces = self.interfaces.iter_mut();
        let fields = self
            .fields
            .iter_mut()
            .chain(self.properties.iter_mut())
            .map(|f| &mut f.type_ref);
        let methods = self
            .constructors
            .iter_mut()
            .chain(self.methods.iter_mut())
            .flat_map(|m| {
                m.return_type
                    .iter_mut()
                    .chain(m.params.iter_mut().map(|p| &mut p.type_ref))
                    .chain(m.throws.iter_mut())
            });
        superclass.chain(interfaces).chain(fields).chain(methods)
    }

    /// Every type reference held by this class.
    pub fn type_refs(&self) -> Vec<&TypeRef> {
        let mut refs: Vec<&TypeRef> = Vec::new();
        refs.extend(self.superclass.iter());
        refs.extend(self.interfaces.iter());
        refs.extend(self.fields.iter().chain(&self.properties).map(|f| &f.type_ref));
        for method in self.constructors.iter().chain(&self.methods) {
            refs.extend(method.return_type.iter());
            refs.extend(method.params.iter().map(|p| &p.type_ref));
            refs.extend(method.throws.iter());
        }
        refs
    }
}

// ============================================================================
// Package Documentation
// ============================================================================

/// Documentation record for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDoc {
    /// Package path with `/` separators.
    name: String,
    description: String,
    /// Class name within the package -> arena handle.
    classes: BTreeMap<String, ClassId>,
}

impl PackageDoc {
    pub fn new(name: impl Into<String>) -> Self {
        PackageDoc {
            name: name.into(),
            description: String::new(),
            classes: BTreeMap::new(),
        }
    }

    /// Package path (`pkg/a`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted package name (`pkg.a`).
    pub fn dotted_name(&self) -> String {
        package_name_of(&self.name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Class names in this package, sorted.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn class_id(&self, class_name: &str) -> Option<ClassId> {
        self.classes.get(class_name).copied()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.values().copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub(crate) fn put(&mut self, class_name: String, id: ClassId) {
        self.classes.insert(class_name, id);
    }

    pub(crate) fn remove_if(&mut self, class_name: &str, id: ClassId) {
        if self.classes.get(class_name) == Some(&id) {
            self.classes.remove(class_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod names {
        use super::*;

        #[test]
        fn qualify_uses_dots() {
            assert_eq!(qualify("pkg/a", "Foo"), "pkg.a.Foo");
            assert_eq!(qualify("", "Foo"), "Foo");
            assert_eq!(qualify("/pkg/", "Outer.Inner"), "pkg.Outer.Inner");
        }

        #[test]
        fn class_names() {
            let doc = ClassDoc::new("Outer.Inner", "pkg/a", ClassKind::Class);
            assert_eq!(doc.qualified_name(), "pkg.a.Outer.Inner");
            assert_eq!(doc.simple_name(), "Inner");
            assert_eq!(doc.package_name(), "pkg.a");
        }
    }

    mod type_refs {
        use super::*;

        #[test]
        fn lookup_name_strips_decorations() {
            assert_eq!(TypeRef::new("List<String>").lookup_name(), "List");
            assert_eq!(TypeRef::new("String[][]").lookup_name(), "String");
            assert_eq!(TypeRef::new("Object...").lookup_name(), "Object");
            assert_eq!(TypeRef::new("Map<K, V>[]").lookup_name(), "Map");
        }

        #[test]
        fn builtins() {
            assert!(TypeRef::new("int[]").is_builtin());
            assert!(TypeRef::new("def").is_builtin());
            assert!(!TypeRef::new("Integer").is_builtin());
        }

        #[test]
        fn type_refs_cover_every_member() {
            let mut doc = ClassDoc::new("Foo", "p", ClassKind::Class);
            doc.superclass = Some(TypeRef::new("Base"));
            doc.interfaces.push(TypeRef::new("Runnable"));
            doc.fields.push(FieldDoc {
                name: "x".into(),
                type_ref: TypeRef::new("int"),
                visibility: Visibility::Private,
                modifiers: vec![],
                annotations: vec![],
                comment: DocComment::default(),
                initializer: None,
                line: 1,
            });
            doc.methods.push(MethodDoc {
                name: "run".into(),
                return_type: Some(TypeRef::new("void")),
                type_parameters: vec![],
                params: vec![ParamDoc {
                    name: "a".into(),
                    type_ref: TypeRef::new("Bar"),
                    varargs: false,
                    annotations: vec![],
                    default_value: None,
                }],
                throws: vec![TypeRef::new("IOException")],
                visibility: Visibility::Public,
                modifiers: vec![],
                annotations: vec![],
                comment: DocComment::default(),
                default_value: None,
                line: 2,
            });
            assert_eq!(doc.type_refs().len(), 6);
            assert_eq!(doc.type_refs_mut().count(), 6);
            assert_eq!(doc.methods[0].signature(), "run(Bar)");
        }
    }

    #[test]
    fn visibility_ordering() {
        assert!(Visibility::Private < Visibility::Package);
        assert!(Visibility::Package < Visibility::Protected);
        assert!(Visibility::Protected < Visibility::Public);
    }

    #[test]
    fn package_remove_if_only_removes_matching_handle() {
        let mut pkg = PackageDoc::new("p");
        pkg.put("A".into(), ClassId(1));
        pkg.remove_if("A", ClassId(2));
        assert_eq!(pkg.class_id("A"), Some(ClassId(1)));
        pkg.remove_if("A", ClassId(1));
        assert!(pkg.is_empty());
    }

    mod serialization {
        use super::*;

        #[test]
        fn class_doc_json_shape() {
            let mut doc = ClassDoc::new("Foo", "pkg/a", ClassKind::Class);
            let mut superclass = TypeRef::new("Base");
            superclass.resolved = Some(ClassId(3));
            doc.superclass = Some(superclass);
            doc.interfaces.push(TypeRef::new("Comparable<Foo>"));

            let json = serde_json::to_value(&doc).unwrap();
            assert_eq!(json["kind"], "class");
            assert_eq!(json["visibility"], "public");
            assert_eq!(json["package_path"], "pkg/a");
            assert_eq!(json["superclass"]["resolved"], 3);
            assert!(json["interfaces"][0].get("resolved").is_none());
            assert!(json.get("outer").is_none());
        }
    }
}
