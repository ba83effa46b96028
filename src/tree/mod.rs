//! The abstract program tree rendered by the code generators.
//!
//! Trees are plain data: build them with the constructors below or load them
//! from JSON through serde.

mod decl;
mod expr;
mod stmt;
mod types;
pub mod validate;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;
pub use validate::{is_valid_language_independent_identifier, validate_identifiers, ValidationError};

/// The three node families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Expression,
    Statement,
    Declaration,
}

/// Borrowed view over any node of a tree
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    CompileUnit(&'a CompileUnit),
    Namespace(&'a Namespace),
    Import(&'a Import),
    Type(&'a TypeDecl),
    Member(&'a Member),
    Statement(&'a Statement),
    Expression(&'a Expr),
}

impl Node<'_> {
    pub fn family(&self) -> Family {
        match self {
            Node::Expression(_) => Family::Expression,
            Node::Statement(_) => Family::Statement,
            Node::CompileUnit(_) | Node::Namespace(_) | Node::Import(_) | Node::Type(_) | Node::Member(_) => {
                Family::Declaration
            }
        }
    }
}

impl<'a> From<&'a CompileUnit> for Node<'a> {
    fn from(node: &'a CompileUnit) -> Self {
        Node::CompileUnit(node)
    }
}

impl<'a> From<&'a Namespace> for Node<'a> {
    fn from(node: &'a Namespace) -> Self {
        Node::Namespace(node)
    }
}

impl<'a> From<&'a Import> for Node<'a> {
    fn from(node: &'a Import) -> Self {
        Node::Import(node)
    }
}

impl<'a> From<&'a TypeDecl> for Node<'a> {
    fn from(node: &'a TypeDecl) -> Self {
        Node::Type(node)
    }
}

impl<'a> From<&'a Member> for Node<'a> {
    fn from(node: &'a Member) -> Self {
        Node::Member(node)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(node: &'a Statement) -> Self {
        Node::Statement(node)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(node: &'a Expr) -> Self {
        Node::Expression(node)
    }
}
