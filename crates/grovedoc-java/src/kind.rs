//! Node types of the Java grammar.
//!
//! The Java parser builds its tree in this native vocabulary. The token names
//! are what the grammar exports; [`crate::remap`] keys the rewrite into the
//! normalized vocabulary on them.

use std::fmt;

use grovedoc_core::tree::NodeType;

/// Java node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaKind {
    CompilationUnit,
    PackageDef,
    Import,
    StaticImport,
    ClassDef,
    InterfaceDef,
    EnumDef,
    AnnotationDef,
    Modifiers,
    Modifier,
    Annotation,
    TypeParameters,
    TypeParameter,
    ExtendsClause,
    ImplementsClause,
    ObjBlock,
    VariableDef,
    MethodDef,
    CtorDef,
    AnnotationFieldDef,
    EnumConstantDef,
    Parameters,
    ParameterDef,
    VariableParameterDef,
    Type,
    ArrayDeclarator,
    Throws,
    Slist,
    StaticInit,
    InstanceInit,
    Expr,
}

impl JavaKind {
    pub const ALL: &'static [JavaKind] = &[
        JavaKind::CompilationUnit,
        JavaKind::PackageDef,
        JavaKind::Import,
        JavaKind::StaticImport,
        JavaKind::ClassDef,
        JavaKind::InterfaceDef,
        JavaKind::EnumDef,
        JavaKind::AnnotationDef,
        JavaKind::Modifiers,
        JavaKind::Modifier,
        JavaKind::Annotation,
        JavaKind::TypeParameters,
        JavaKind::TypeParameter,
        JavaKind::ExtendsClause,
        JavaKind::ImplementsClause,
        JavaKind::ObjBlock,
        JavaKind::VariableDef,
        JavaKind::MethodDef,
        JavaKind::CtorDef,
        JavaKind::AnnotationFieldDef,
        JavaKind::EnumConstantDef,
        JavaKind::Parameters,
        JavaKind::ParameterDef,
        JavaKind::VariableParameterDef,
        JavaKind::Type,
        JavaKind::ArrayDeclarator,
        JavaKind::Throws,
        JavaKind::Slist,
        JavaKind::StaticInit,
        JavaKind::InstanceInit,
        JavaKind::Expr,
    ];

    /// The token-name table exported by the grammar.
    pub fn token_names() -> impl Iterator<Item = &'static str> {
        JavaKind::ALL.iter().map(|kind| kind.token_name())
    }

    pub fn from_token_name(name: &str) -> Option<JavaKind> {
        JavaKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.token_name() == name)
    }
}

impl NodeType for JavaKind {
    fn token_name(&self) -> &'static str {
        match self {
            JavaKind::CompilationUnit => "COMPILATION_UNIT",
            JavaKind::PackageDef => "PACKAGE_DEF",
            JavaKind::Import => "IMPORT",
            JavaKind::StaticImport => "STATIC_IMPORT",
            JavaKind::ClassDef => "CLASS_DEF",
            JavaKind::InterfaceDef => "INTERFACE_DEF",
            JavaKind::EnumDef => "ENUM_DEF",
            JavaKind::AnnotationDef => "ANNOTATION_DEF",
            JavaKind::Modifiers => "MODIFIERS",
            JavaKind::Modifier => "MODIFIER",
            JavaKind::Annotation => "ANNOTATION",
            JavaKind::TypeParameters => "TYPE_PARAMETERS",
            JavaKind::TypeParameter => "TYPE_PARAMETER",
            JavaKind::ExtendsClause => "EXTENDS_CLAUSE",
            JavaKind::ImplementsClause => "IMPLEMENTS_CLAUSE",
            JavaKind::ObjBlock => "OBJBLOCK",
            JavaKind::VariableDef => "VARIABLE_DEF",
            JavaKind::MethodDef => "METHOD_DEF",
            JavaKind::CtorDef => "CTOR_DEF",
            JavaKind::AnnotationFieldDef => "ANNOTATION_FIELD_DEF",
            JavaKind::EnumConstantDef => "ENUM_CONSTANT_DEF",
            JavaKind::Parameters => "PARAMETERS",
            JavaKind::ParameterDef => "PARAMETER_DEF",
            JavaKind::VariableParameterDef => "VARIABLE_PARAMETER_DEF",
            JavaKind::Type => "TYPE",
            JavaKind::ArrayDeclarator => "ARRAY_DECLARATOR",
            JavaKind::Throws => "LITERAL_throws",
            JavaKind::Slist => "SLIST",
            JavaKind::StaticInit => "STATIC_INIT",
            JavaKind::InstanceInit => "INSTANCE_INIT",
            JavaKind::Expr => "EXPR",
        }
    }
}

impl fmt::Display for JavaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token_name())
    }
}
