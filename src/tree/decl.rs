//! Declaration nodes: compile units, namespaces, types and their members.

use serde::{Deserialize, Serialize};

use super::{AttributeDecl, Comment, Expr, LinePragma, Modifiers, Parameter, Statement, TypeRef, TypeVisibility};

/// The root of a tree: namespaces plus assembly-level information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileUnit {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    /// Libraries the generated code needs to be compiled against
    #[serde(default)]
    pub referenced_libraries: Vec<String>,
    #[serde(default)]
    pub assembly_attributes: Vec<AttributeDecl>,
    /// Raw source emitted verbatim in place of the namespaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Snippet>,
}

impl CompileUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// A unit whose whole text is `text`.
    pub fn snippet(text: impl Into<String>) -> Self {
        Self {
            snippet: Some(Snippet {
                text: text.into(),
                line_pragma: None,
            }),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn with_reference(mut self, library: impl Into<String>) -> Self {
        self.referenced_libraries.push(library.into());
        self
    }
}

/// Source text that is copied into the output as is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_pragma: Option<LinePragma>,
}

/// A namespace block. An empty name is the global namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_import(mut self, namespace: impl Into<String>) -> Self {
        self.imports.push(Import::new(namespace));
        self
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }
}

/// `using X;` / `Imports X`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_pragma: Option<LinePragma>,
}

impl Import {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            line_pragma: None,
        }
    }
}

/// Kind of a type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate {
        #[serde(default)]
        return_type: Option<TypeRef>,
        #[serde(default)]
        parameters: Vec<Parameter>,
    },
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Delegate { .. } => "delegate",
        }
    }
}

/// A class, struct, interface, enum or delegate declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub visibility: TypeVisibility,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// Base class and implemented interfaces; for enums, the underlying type
    #[serde(default)]
    pub base_types: Vec<TypeRef>,
    #[serde(default)]
    pub attributes: Vec<AttributeDecl>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: TypeVisibility::Public,
            is_sealed: false,
            is_abstract: false,
            base_types: Vec::new(),
            attributes: Vec::new(),
            comments: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum)
    }

    pub fn delegate(name: impl Into<String>, return_type: Option<TypeRef>, parameters: Vec<Parameter>) -> Self {
        Self::new(
            name,
            TypeKind::Delegate {
                return_type,
                parameters,
            },
        )
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base_types.push(base.into());
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum)
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Member name; ignored for constructors, type constructors and snippets
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub attributes: Vec<AttributeDecl>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_pragma: Option<LinePragma>,
    pub kind: MemberKind,
}

/// Member kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field {
        #[serde(rename = "type")]
        ty: TypeRef,
        #[serde(default)]
        init: Option<Expr>,
    },
    Property {
        #[serde(rename = "type")]
        ty: TypeRef,
        /// Non-empty for indexers
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        has_get: bool,
        #[serde(default)]
        has_set: bool,
        #[serde(default)]
        get_statements: Vec<Statement>,
        #[serde(default)]
        set_statements: Vec<Statement>,
        #[serde(default)]
        private_implementation: Option<TypeRef>,
    },
    Method {
        /// `None` for a method returning nothing
        #[serde(default)]
        return_type: Option<TypeRef>,
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        statements: Vec<Statement>,
        #[serde(default)]
        return_attributes: Vec<AttributeDecl>,
        #[serde(default)]
        private_implementation: Option<TypeRef>,
    },
    Constructor {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        base_args: Vec<Expr>,
        #[serde(default)]
        chained_args: Vec<Expr>,
        #[serde(default)]
        statements: Vec<Statement>,
    },
    TypeConstructor {
        #[serde(default)]
        statements: Vec<Statement>,
    },
    EntryPoint {
        #[serde(default)]
        statements: Vec<Statement>,
    },
    Event {
        #[serde(rename = "type")]
        ty: TypeRef,
        #[serde(default)]
        private_implementation: Option<TypeRef>,
    },
    Snippet(String),
    NestedType(TypeDecl),
}

impl Member {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::default(),
            attributes: Vec::new(),
            comments: Vec::new(),
            line_pragma: None,
            kind,
        }
    }

    pub fn field(name: impl Into<String>, ty: impl Into<TypeRef>, init: Option<Expr>) -> Self {
        Self::new(name, MemberKind::Field { ty: ty.into(), init })
    }

    pub fn method(
        name: impl Into<String>,
        return_type: Option<TypeRef>,
        parameters: Vec<Parameter>,
        statements: Vec<Statement>,
    ) -> Self {
        Self::new(
            name,
            MemberKind::Method {
                return_type,
                parameters,
                statements,
                return_attributes: Vec::new(),
                private_implementation: None,
            },
        )
    }

    pub fn property(name: impl Into<String>, ty: impl Into<TypeRef>, get_statements: Vec<Statement>, set_statements: Vec<Statement>) -> Self {
        Self::new(
            name,
            MemberKind::Property {
                ty: ty.into(),
                parameters: Vec::new(),
                has_get: true,
                has_set: !set_statements.is_empty(),
                get_statements,
                set_statements,
                private_implementation: None,
            },
        )
    }

    pub fn constructor(parameters: Vec<Parameter>, statements: Vec<Statement>) -> Self {
        Self::new(
            "",
            MemberKind::Constructor {
                parameters,
                base_args: Vec::new(),
                chained_args: Vec::new(),
                statements,
            },
        )
    }

    /// Chain a constructor to the base class constructor.
    pub fn with_base_args(mut self, args: Vec<Expr>) -> Self {
        if let MemberKind::Constructor { base_args, .. } = &mut self.kind {
            *base_args = args;
        }
        self
    }

    /// Chain a constructor to another constructor of the same type.
    pub fn with_chained_args(mut self, args: Vec<Expr>) -> Self {
        if let MemberKind::Constructor { chained_args, .. } = &mut self.kind {
            *chained_args = args;
        }
        self
    }

    pub fn type_constructor(statements: Vec<Statement>) -> Self {
        Self::new("", MemberKind::TypeConstructor { statements })
    }

    pub fn entry_point(statements: Vec<Statement>) -> Self {
        Self::new("Main", MemberKind::EntryPoint { statements })
    }

    pub fn event(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self::new(
            name,
            MemberKind::Event {
                ty: ty.into(),
                private_implementation: None,
            },
        )
    }

    pub fn snippet(text: impl Into<String>) -> Self {
        Self::new("", MemberKind::Snippet(text.into()))
    }

    pub fn nested(decl: TypeDecl) -> Self {
        let name = decl.name.clone();
        Self::new(name, MemberKind::NestedType(decl))
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_line_pragma(mut self, pragma: LinePragma) -> Self {
        self.line_pragma = Some(pragma);
        self
    }
}
