//! Building blocks shared by every node family: type references, modifiers,
//! parameters, attributes, comments and source locations.

use serde::{Deserialize, Serialize};

use super::Expr;

/// Reference to a type by its language-neutral name (`System.Int32`,
/// `MyApp.Widget`), optionally an array of some element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub array_rank: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            array_rank: 0,
            element_type: None,
        }
    }

    /// An array of `element` with the given rank (1 for `T[]`, 2 for `T[,]`).
    pub fn array_of(element: TypeRef, rank: usize) -> Self {
        Self {
            name: element.name.clone(),
            array_rank: rank,
            element_type: Some(Box::new(element)),
        }
    }

    pub fn void() -> Self {
        Self::new("System.Void")
    }

    pub fn is_array(&self) -> bool {
        self.array_rank > 0
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::new(name)
    }
}

/// Member accessibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    #[default]
    Private,
    Protected,
    Internal,
    ProtectedInternal,
}

/// Member scope. `Final` is the plain, non-virtual default and renders nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Final,
    Virtual,
    Abstract,
    Static,
    Override,
    Const,
}

/// Access, scope and slot modifiers of a type member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub scope: Scope,
    /// Hides an inherited member (`new` / `Shadows`).
    #[serde(default)]
    pub new_slot: bool,
}

impl Modifiers {
    pub fn new(access: Access, scope: Scope) -> Self {
        Self {
            access,
            scope,
            new_slot: false,
        }
    }

    pub fn public() -> Self {
        Self::new(Access::Public, Scope::Final)
    }

    pub fn private() -> Self {
        Self::new(Access::Private, Scope::Final)
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn hiding(mut self) -> Self {
        self.new_slot = true;
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.scope == Scope::Abstract
    }
}

/// Visibility of a type declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeVisibility {
    #[default]
    Public,
    /// Nested private type
    Private,
    /// No visibility keyword at all
    Internal,
}

/// Parameter passing direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    In,
    Out,
    Ref,
}

/// A formal parameter of a method, constructor, indexer or delegate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeDecl>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            direction: Direction::In,
            attributes: Vec::new(),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// A custom attribute applied to a declaration: `[Name(args)]` / `<Name(args)>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<AttributeArg>,
}

impl AttributeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: Option<&str>, value: Expr) -> Self {
        self.arguments.push(AttributeArg {
            name: name.map(str::to_string),
            value,
        });
        self
    }
}

/// Positional (`name == None`) or named attribute argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeArg {
    #[serde(default)]
    pub name: Option<String>,
    pub value: Expr,
}

/// Comment text, possibly spanning several lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// Documentation comment (`///` / `'''`)
    #[serde(default)]
    pub doc: bool,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc: false,
        }
    }

    pub fn doc(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc: true,
        }
    }
}

/// Original source location a generated statement or member maps back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePragma {
    pub file_name: String,
    pub line_number: u32,
}

impl LinePragma {
    pub fn new(file_name: impl Into<String>, line_number: u32) -> Self {
        Self {
            file_name: file_name.into(),
            line_number,
        }
    }
}
