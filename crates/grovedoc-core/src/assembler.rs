//! Document assembler: normalized tree -> class documents for one file.
//!
//! The assembler walks a [`SyntaxNode<NodeKind>`] tree in source order and
//! builds one [`ClassDoc`] per class-like declaration, keyed by its name within
//! the package (`Outer.Inner` for nested classes). It is the only consumer of
//! the option bag and the link arguments.
//!
//! Groovy conventions apply to every tree, whatever language it came from:
//! a declaration without an access modifier is public, `@PackageScope` marks
//! package-private declarations, and a field without an access modifier in a
//! class, trait or enum body is a property.
//!
//! Scope options filter members only; classes are always documented.

use std::collections::BTreeMap;

use tracing::debug;

use crate::comment::DocComment;
use crate::model::{
    ClassDoc, ClassKind, EnumConstantDoc, FieldDoc, MethodDoc, ParamDoc, TypeRef, Visibility,
};
use crate::options::{DocOptions, LinkArgument, Properties};
use crate::resolve::imported_name;
use crate::tree::{NodeKind, SyntaxNode};

type Node = SyntaxNode<NodeKind>;

/// Classes visible without an import, by package.
const DEFAULT_IMPORTS: &[(&str, &[&str])] = &[
    (
        "java.lang",
        &[
            "Boolean", "Byte", "Character", "Class", "Comparable", "Deprecated", "Double",
            "Enum", "Error", "Exception", "Float", "IllegalArgumentException",
            "IllegalStateException", "Integer", "Iterable", "Long", "Math", "Number", "Object",
            "Override", "Runnable", "RuntimeException", "Short", "String", "StringBuilder",
            "System", "Thread", "Throwable", "Void",
        ],
    ),
    (
        "groovy.lang",
        &["Binding", "Closure", "GString", "GroovyObject", "MetaClass", "Range", "Script"],
    ),
];

/// Builds the class documents of one source file.
#[derive(Debug, Clone)]
pub struct ClassDocAssembler<'a> {
    package_path: String,
    file_name: String,
    links: &'a [LinkArgument],
    options: DocOptions,
}

/// Per-file context shared by every class of the file.
struct FileContext {
    imports: Vec<String>,
}

impl<'a> ClassDocAssembler<'a> {
    /// `package_path` uses `/` separators; `file_name` is the bare file name.
    pub fn new(
        package_path: impl Into<String>,
        file_name: impl Into<String>,
        links: &'a [LinkArgument],
        properties: &Properties,
    ) -> Self {
        ClassDocAssembler {
            package_path: package_path.into(),
            file_name: file_name.into(),
            links,
            options: DocOptions::from_properties(properties),
        }
    }

    /// Build the class documents declared by `tree`.
    pub fn assemble(&self, tree: &Node) -> BTreeMap<String, ClassDoc> {
        let context = FileContext {
            imports: tree
                .children_of(NodeKind::Import)
                .map(|import| import.text.clone())
                .collect(),
        };

        let mut classes = BTreeMap::new();
        for node in tree.children.iter().filter(|c| c.kind.is_type_def()) {
            self.assemble_class(node, None, &context, &mut classes);
        }

        let is_script = tree
            .children
            .iter()
            .any(|c| matches!(c.kind, NodeKind::Statement | NodeKind::MethodDef));
        if is_script && self.options.process_scripts {
            let script = self.assemble_script(tree, &context);
            if classes.contains_key(&script.name) {
                debug!(file = %self.file_name, class = %script.name, "script name is taken by a class");
            } else {
                classes.insert(script.name.clone(), script);
            }
        }

        debug!(
            file = %self.file_name,
            package = %self.package_path,
            classes = classes.len(),
            "assembled file"
        );
        classes
    }

    // ------------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------------

    fn assemble_class(
        &self,
        node: &Node,
        outer: Option<&str>,
        context: &FileContext,
        classes: &mut BTreeMap<String, ClassDoc>,
    ) {
        let name = match outer {
            Some(outer) => format!("{}.{}", outer, node.text),
            None => node.text.clone(),
        };
        let kind = match node.kind {
            NodeKind::InterfaceDef => ClassKind::Interface,
            NodeKind::EnumDef => ClassKind::Enum,
            NodeKind::TraitDef => ClassKind::Trait,
            NodeKind::AnnotationDef => ClassKind::Annotation,
            _ => ClassKind::Class,
        };

        let mut doc = ClassDoc::new(name.clone(), self.package_path.clone(), kind);
        doc.source_file = self.file_name.clone();
        doc.imports = context.imports.clone();
        doc.outer = outer.map(str::to_string);
        doc.line = node.pos.line;
        doc.comment = comment_of(node);

        let declared = Declared::of(node);
        doc.visibility = declared.visibility(Visibility::Public);
        doc.modifiers = declared.modifiers;
        doc.annotations = declared.annotations;
        doc.type_parameters = type_parameters(node);

        let extends: Vec<TypeRef> = node
            .child(NodeKind::ExtendsClause)
            .map(|clause| self.type_refs(clause, context))
            .unwrap_or_default();
        let implements: Vec<TypeRef> = node
            .child(NodeKind::ImplementsClause)
            .map(|clause| self.type_refs(clause, context))
            .unwrap_or_default();
        match kind {
            ClassKind::Class => {
                let mut extends = extends.into_iter();
                doc.superclass = Some(
                    extends
                        .next()
                        .unwrap_or_else(|| self.type_ref("Object", context)),
                );
                doc.interfaces = implements;
            }
            ClassKind::Enum => {
                doc.superclass = Some(self.type_ref("Enum", context));
                doc.interfaces = implements;
            }
            _ => {
                doc.interfaces = extends.into_iter().chain(implements).collect();
            }
        }

        let is_interface = matches!(kind, ClassKind::Interface | ClassKind::Annotation);
        if let Some(body) = node.child(NodeKind::ObjBlock) {
            for member in &body.children {
                match member.kind {
                    NodeKind::VariableDef => {
                        let field = self.field(member, context, is_interface);
                        if !self.options.includes(field.visibility) {
                            continue;
                        }
                        if !is_interface && is_property(member) {
                            doc.properties.push(field);
                        } else {
                            doc.fields.push(field);
                        }
                    }
                    NodeKind::MethodDef | NodeKind::AnnotationFieldDef => {
                        let method = self.method(member, context);
                        if self.options.includes(method.visibility) {
                            doc.methods.push(method);
                        }
                    }
                    NodeKind::CtorIdent => {
                        let ctor = self.method(member, context);
                        if self.options.includes(ctor.visibility) {
                            doc.constructors.push(ctor);
                        }
                    }
                    NodeKind::EnumConstantDef => {
                        doc.enum_constants.push(EnumConstantDoc {
                            name: member.text.clone(),
                            comment: comment_of(member),
                            arguments: member.child(NodeKind::Expr).map(|e| e.text.clone()),
                            line: member.pos.line,
                        });
                    }
                    kind if kind.is_type_def() => {
                        self.assemble_class(member, Some(&name), context, classes);
                        doc.nested.push(member.text.clone());
                    }
                    _ => {}
                }
            }
        }

        classes.insert(name, doc);
    }

    fn assemble_script(&self, tree: &Node, context: &FileContext) -> ClassDoc {
        let name = self
            .file_name
            .split('.')
            .next()
            .unwrap_or(&self.file_name)
            .to_string();
        let mut doc = ClassDoc::new(name, self.package_path.clone(), ClassKind::Script);
        doc.source_file = self.file_name.clone();
        doc.imports = context.imports.clone();
        doc.superclass = Some(self.type_ref("Script", context));
        doc.line = 1;

        for node in tree.children_of(NodeKind::MethodDef) {
            let method = self.method(node, context);
            if self.options.includes(method.visibility) {
                doc.methods.push(method);
            }
        }

        if self.options.include_main_for_scripts {
            doc.methods.push(generated_method(
                "main",
                self.type_ref("void", context),
                vec![ParamDoc {
                    name: "args".to_string(),
                    type_ref: self.type_ref("String[]", context),
                    varargs: false,
                    annotations: Vec::new(),
                    default_value: None,
                }],
                vec!["static".to_string()],
            ));
            doc.methods.push(generated_method(
                "run",
                self.type_ref("Object", context),
                Vec::new(),
                Vec::new(),
            ));
        }
        doc
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    fn field(&self, node: &Node, context: &FileContext, in_interface: bool) -> FieldDoc {
        let declared = Declared::of(node);
        let visibility = if in_interface {
            Visibility::Public
        } else {
            declared.visibility(Visibility::Public)
        };
        FieldDoc {
            name: node.text.clone(),
            type_ref: self.declared_type(node, context),
            visibility,
            modifiers: declared.modifiers,
            annotations: declared.annotations,
            comment: comment_of(node),
            initializer: node.child(NodeKind::Expr).map(|e| e.text.clone()),
            line: node.pos.line,
        }
    }

    fn method(&self, node: &Node, context: &FileContext) -> MethodDoc {
        let declared = Declared::of(node);
        let is_ctor = node.kind == NodeKind::CtorIdent;
        let params = node
            .child(NodeKind::Parameters)
            .map(|params| {
                params
                    .children
                    .iter()
                    .filter(|p| {
                        matches!(p.kind, NodeKind::ParameterDef | NodeKind::VariableParameterDef)
                    })
                    .map(|p| self.param(p, context))
                    .collect()
            })
            .unwrap_or_default();
        MethodDoc {
            name: node.text.clone(),
            return_type: (!is_ctor).then(|| self.declared_type(node, context)),
            type_parameters: type_parameters(node),
            params,
            throws: node
                .child(NodeKind::Throws)
                .map(|throws| self.type_refs(throws, context))
                .unwrap_or_default(),
            visibility: declared.visibility(Visibility::Public),
            modifiers: declared.modifiers,
            annotations: declared.annotations,
            comment: comment_of(node),
            default_value: if node.kind == NodeKind::AnnotationFieldDef {
                node.child(NodeKind::Expr).map(|e| e.text.clone())
            } else {
                None
            },
            line: node.pos.line,
        }
    }

    fn param(&self, node: &Node, context: &FileContext) -> ParamDoc {
        ParamDoc {
            name: node.text.clone(),
            type_ref: self.declared_type(node, context),
            varargs: node.kind == NodeKind::VariableParameterDef,
            annotations: Declared::of(node).annotations,
            default_value: node.child(NodeKind::Expr).map(|e| e.text.clone()),
        }
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    /// The `Type` child of a declaration; untyped declarations are `def`.
    fn declared_type(&self, node: &Node, context: &FileContext) -> TypeRef {
        match node.child(NodeKind::Type) {
            Some(ty) => self.type_ref(&ty.text, context),
            None => TypeRef::new("def"),
        }
    }

    fn type_refs(&self, node: &Node, context: &FileContext) -> Vec<TypeRef> {
        node.children_of(NodeKind::Type)
            .map(|ty| self.type_ref(&ty.text, context))
            .collect()
    }

    /// A placeholder reference, tagged with an external link when its
    /// qualified name falls under a link argument.
    fn type_ref(&self, name: &str, context: &FileContext) -> TypeRef {
        let mut type_ref = TypeRef::new(name);
        if type_ref.is_builtin() {
            return type_ref;
        }
        let qualified = qualified_guess(type_ref.lookup_name(), &context.imports);
        if let Some(qualified) = qualified {
            type_ref.external = self
                .links
                .iter()
                .find(|link| link.covers(&qualified))
                .map(|link| link.href.clone());
        }
        type_ref
    }
}

/// Best-effort qualified name of a type name, from the name itself, the
/// file's imports, or the default imports.
fn qualified_guess(name: &str, imports: &[String]) -> Option<String> {
    let head = name.split('.').next().unwrap_or(name);
    if let Some(path) = imported_name(imports, head) {
        return Some(format!("{}{}", path, &name[head.len()..]));
    }
    if name.contains('.') {
        return Some(name.to_string());
    }
    DEFAULT_IMPORTS
        .iter()
        .find(|(_, names)| names.contains(&name))
        .map(|(package, _)| format!("{}.{}", package, name))
}

// ============================================================================
// Modifiers
// ============================================================================

/// Modifiers and annotations of a declaration, with access modifiers split out.
struct Declared {
    access: Option<Visibility>,
    package_scope: bool,
    modifiers: Vec<String>,
    annotations: Vec<String>,
}

impl Declared {
    fn of(node: &Node) -> Self {
        let mut declared = Declared {
            access: None,
            package_scope: false,
            modifiers: Vec::new(),
            annotations: Vec::new(),
        };
        let Some(modifiers) = node.child(NodeKind::Modifiers) else {
            return declared;
        };
        for child in &modifiers.children {
            match child.kind {
                NodeKind::Modifier => match child.text.as_str() {
                    "public" => declared.access = Some(Visibility::Public),
                    "protected" => declared.access = Some(Visibility::Protected),
                    "private" => declared.access = Some(Visibility::Private),
                    other => declared.modifiers.push(other.to_string()),
                },
                NodeKind::Annotation => {
                    if child.text == "PackageScope" || child.text.ends_with(".PackageScope") {
                        declared.package_scope = true;
                    }
                    declared.annotations.push(child.text.clone());
                }
                _ => {}
            }
        }
        declared
    }

    fn visibility(&self, default: Visibility) -> Visibility {
        match self.access {
            Some(access) => access,
            None if self.package_scope => Visibility::Package,
            None => default,
        }
    }
}

/// A field without an access modifier or `@PackageScope`.
fn is_property(node: &Node) -> bool {
    let declared = Declared::of(node);
    declared.access.is_none() && !declared.package_scope
}

fn comment_of(node: &Node) -> DocComment {
    node.doc
        .as_deref()
        .map(DocComment::parse)
        .unwrap_or_default()
}

fn type_parameters(node: &Node) -> Vec<String> {
    node.child(NodeKind::TypeParameters)
        .map(|params| {
            params
                .children_of(NodeKind::TypeParameter)
                .map(|p| p.text.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn generated_method(
    name: &str,
    return_type: TypeRef,
    params: Vec<ParamDoc>,
    modifiers: Vec<String>,
) -> MethodDoc {
    MethodDoc {
        name: name.to_string(),
        return_type: Some(return_type),
        type_parameters: Vec::new(),
        params,
        throws: Vec::new(),
        visibility: Visibility::Public,
        modifiers,
        annotations: Vec::new(),
        comment: DocComment::default(),
        default_value: None,
        line: 0,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Position;

    fn pos(line: u32) -> Position {
        Position::new(line, 1)
    }

    fn node(kind: NodeKind, text: &str) -> Node {
        SyntaxNode::new(kind, text, pos(1))
    }

    fn modifiers(words: &[&str]) -> Node {
        let mut mods = node(NodeKind::Modifiers, "");
        for word in words {
            match word.strip_prefix('@') {
                Some(annotation) => mods.push(node(NodeKind::Annotation, annotation)),
                None => mods.push(node(NodeKind::Modifier, word)),
            }
        }
        mods
    }

    fn field(name: &str, ty: &str, mods: &[&str]) -> Node {
        node(NodeKind::VariableDef, name)
            .with_child(modifiers(mods))
            .with_child(node(NodeKind::Type, ty))
    }

    fn method(name: &str, ret: &str, mods: &[&str], params: &[(&str, &str)]) -> Node {
        let mut ps = node(NodeKind::Parameters, "");
        for (pname, pty) in params {
            ps.push(
                node(NodeKind::ParameterDef, pname)
                    .with_child(modifiers(&[]))
                    .with_child(node(NodeKind::Type, pty)),
            );
        }
        node(NodeKind::MethodDef, name)
            .with_child(modifiers(mods))
            .with_child(node(NodeKind::Type, ret))
            .with_child(ps)
    }

    fn class(kind: NodeKind, name: &str, mods: &[&str], members: Vec<Node>) -> Node {
        let mut body = node(NodeKind::ObjBlock, "");
        for m in members {
            body.push(m);
        }
        node(kind, name).with_child(modifiers(mods)).with_child(body)
    }

    fn unit(children: Vec<Node>) -> Node {
        let mut unit = node(NodeKind::CompilationUnit, "");
        for c in children {
            unit.push(c);
        }
        unit
    }

    fn assemble(tree: &Node, props: &Properties) -> BTreeMap<String, ClassDoc> {
        ClassDocAssembler::new("pkg/a", "Foo.groovy", &[], props).assemble(tree)
    }

    mod classes {
        use super::*;

        #[test]
        fn class_with_doc_and_implicit_superclass() {
            let tree = unit(vec![class(NodeKind::ClassDef, "Foo", &[], vec![])
                .with_doc(Some("/** The foo. More. */".to_string()))]);
            let docs = assemble(&tree, &Properties::new());
            let foo = &docs["Foo"];
            assert_eq!(foo.kind, ClassKind::Class);
            assert_eq!(foo.visibility, Visibility::Public);
            assert_eq!(foo.superclass.as_ref().unwrap().name, "Object");
            assert_eq!(foo.comment.first_sentence, "The foo.");
            assert_eq!(foo.package_path, "pkg/a");
            assert_eq!(foo.source_file, "Foo.groovy");
        }

        #[test]
        fn extends_and_implements() {
            let foo = class(NodeKind::ClassDef, "Foo", &[], vec![])
                .with_child(node(NodeKind::ExtendsClause, "").with_child(node(NodeKind::Type, "Base")))
                .with_child(
                    node(NodeKind::ImplementsClause, "")
                        .with_child(node(NodeKind::Type, "Runnable"))
                        .with_child(node(NodeKind::Type, "Comparable<Foo>")),
                );
            let docs = assemble(&unit(vec![foo]), &Properties::new());
            let foo = &docs["Foo"];
            assert_eq!(foo.superclass.as_ref().unwrap().name, "Base");
            let names: Vec<&str> = foo.interfaces.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["Runnable", "Comparable<Foo>"]);
        }

        #[test]
        fn interface_extends_become_interfaces() {
            let iface = class(NodeKind::InterfaceDef, "Shape", &[], vec![])
                .with_child(node(NodeKind::ExtendsClause, "").with_child(node(NodeKind::Type, "Base")));
            let docs = assemble(&unit(vec![iface]), &Properties::new());
            assert!(docs["Shape"].superclass.is_none());
            assert_eq!(docs["Shape"].interfaces[0].name, "Base");
        }

        #[test]
        fn nested_classes_use_dotted_names() {
            let inner = class(NodeKind::EnumDef, "Color", &["static"], vec![node(
                NodeKind::EnumConstantDef,
                "RED",
            )]);
            let outer = class(NodeKind::ClassDef, "Outer", &[], vec![inner]);
            let docs = assemble(&unit(vec![outer]), &Properties::new());
            assert_eq!(docs.len(), 2);
            assert_eq!(docs["Outer"].nested, vec!["Color"]);
            let color = &docs["Outer.Color"];
            assert_eq!(color.outer.as_deref(), Some("Outer"));
            assert_eq!(color.superclass.as_ref().unwrap().name, "Enum");
            assert_eq!(color.enum_constants[0].name, "RED");
            assert_eq!(color.modifiers, vec!["static"]);
        }

        #[test]
        fn package_scope_annotation_lowers_visibility() {
            let tree = unit(vec![class(NodeKind::ClassDef, "Hidden", &["@PackageScope"], vec![])]);
            let docs = assemble(&tree, &Properties::new());
            assert_eq!(docs["Hidden"].visibility, Visibility::Package);
        }
    }

    mod members {
        use super::*;

        #[test]
        fn properties_and_fields_are_separated() {
            let tree = unit(vec![class(
                NodeKind::ClassDef,
                "Foo",
                &[],
                vec![
                    field("name", "String", &[]),
                    field("count", "int", &["private"]),
                    field("size", "int", &["protected"]),
                    field("hidden", "int", &["@PackageScope"]),
                ],
            )]);
            let docs = assemble(&tree, &Properties::new().with("privateScope", "true"));
            let foo = &docs["Foo"];
            let props: Vec<&str> = foo.properties.iter().map(|f| f.name.as_str()).collect();
            let fields: Vec<&str> = foo.fields.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(props, vec!["name"]);
            assert_eq!(fields, vec!["count", "size", "hidden"]);
        }

        #[test]
        fn default_scope_hides_private_and_package_members() {
            let tree = unit(vec![class(
                NodeKind::ClassDef,
                "Foo",
                &[],
                vec![
                    field("count", "int", &["private"]),
                    field("size", "int", &["protected"]),
                    method("helper", "void", &["@PackageScope"], &[]),
                    method("run", "void", &[], &[]),
                ],
            )]);
            let docs = assemble(&tree, &Properties::new());
            let foo = &docs["Foo"];
            assert_eq!(foo.fields.len(), 1);
            assert_eq!(foo.methods.len(), 1);
            assert_eq!(foo.methods[0].name, "run");
        }

        #[test]
        fn interface_fields_are_public_constants() {
            let tree = unit(vec![class(
                NodeKind::InterfaceDef,
                "Limits",
                &[],
                vec![field("MAX", "int", &["static", "final"])],
            )]);
            let docs = assemble(&tree, &Properties::new());
            let limits = &docs["Limits"];
            assert!(limits.properties.is_empty());
            assert_eq!(limits.fields[0].visibility, Visibility::Public);
        }

        #[test]
        fn methods_params_and_throws() {
            let mut m = method("sum", "int", &["static"], &[("a", "int"), ("b", "def")]);
            m.push(node(NodeKind::Throws, "").with_child(node(NodeKind::Type, "IOException")));
            let tree = unit(vec![class(NodeKind::ClassDef, "Calc", &[], vec![m])]);
            let docs = assemble(&tree, &Properties::new());
            let sum = &docs["Calc"].methods[0];
            assert_eq!(sum.signature(), "sum(int, def)");
            assert!(sum.is_static());
            assert_eq!(sum.throws[0].name, "IOException");
            assert_eq!(sum.return_type.as_ref().unwrap().name, "int");
        }

        #[test]
        fn untyped_declarations_are_dynamic() {
            let untyped = node(NodeKind::VariableDef, "x").with_child(modifiers(&[]));
            let tree = unit(vec![class(NodeKind::ClassDef, "Foo", &[], vec![untyped])]);
            let docs = assemble(&tree, &Properties::new());
            assert_eq!(docs["Foo"].properties[0].type_ref.name, "def");
        }

        #[test]
        fn constructors_have_no_return_type() {
            let ctor = node(NodeKind::CtorIdent, "Foo")
                .with_child(modifiers(&[]))
                .with_child(node(NodeKind::Parameters, ""));
            let tree = unit(vec![class(NodeKind::ClassDef, "Foo", &[], vec![ctor])]);
            let docs = assemble(&tree, &Properties::new());
            assert_eq!(docs["Foo"].constructors.len(), 1);
            assert!(docs["Foo"].constructors[0].return_type.is_none());
        }
    }

    mod scripts {
        use super::*;

        fn script_tree() -> Node {
            unit(vec![
                node(NodeKind::Statement, "println 'hi'"),
                method("greet", "def", &[], &[("name", "String")]),
            ])
        }

        #[test]
        fn script_class_named_after_file() {
            let docs = ClassDocAssembler::new("scripts", "Deploy.groovy", &[], &Properties::new())
                .assemble(&script_tree());
            let script = &docs["Deploy"];
            assert_eq!(script.kind, ClassKind::Script);
            assert_eq!(script.superclass.as_ref().unwrap().name, "Script");
            let names: Vec<&str> = script.methods.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["greet", "main", "run"]);
        }

        #[test]
        fn script_options() {
            let props = Properties::new().with("includeMainForScripts", "false");
            let docs = ClassDocAssembler::new("", "Deploy.groovy", &[], &props).assemble(&script_tree());
            assert_eq!(docs["Deploy"].methods.len(), 1);

            let props = Properties::new().with("processScripts", "false");
            let docs = ClassDocAssembler::new("", "Deploy.groovy", &[], &props).assemble(&script_tree());
            assert!(docs.is_empty());
        }

        #[test]
        fn class_only_file_is_not_a_script() {
            let tree = unit(vec![class(NodeKind::ClassDef, "Foo", &[], vec![])]);
            let docs = assemble(&tree, &Properties::new());
            assert_eq!(docs.keys().collect::<Vec<_>>(), vec!["Foo"]);
        }
    }

    mod links {
        use super::*;

        #[test]
        fn imported_and_default_types_get_external_links() {
            let links = vec![
                LinkArgument::new("java.,javax.", "https://docs.example/java/"),
                LinkArgument::new("org.acme.", "https://acme.example/api/"),
            ];
            let tree = unit(vec![
                node(NodeKind::Import, "org.acme.Widget"),
                class(
                    NodeKind::ClassDef,
                    "Foo",
                    &[],
                    vec![
                        field("w", "Widget", &[]),
                        field("s", "String", &[]),
                        field("l", "Local", &[]),
                        field("q", "javax.swing.JFrame", &[]),
                    ],
                ),
            ]);
            let docs = ClassDocAssembler::new("pkg", "Foo.groovy", &links, &Properties::new())
                .assemble(&tree);
            let foo = &docs["Foo"];
            let external: Vec<Option<&str>> = foo
                .properties
                .iter()
                .map(|f| f.type_ref.external.as_deref())
                .collect();
            assert_eq!(
                external,
                vec![
                    Some("https://acme.example/api/"),
                    Some("https://docs.example/java/"),
                    None,
                    Some("https://docs.example/java/"),
                ]
            );
            assert_eq!(foo.imports, vec!["org.acme.Widget"]);
            assert_eq!(
                foo.superclass.as_ref().unwrap().external.as_deref(),
                Some("https://docs.example/java/")
            );
        }
    }
}
