//! Ambient state threaded through one rendering pass.

use crate::tree::{TypeDecl, TypeKind};

/// Category of the type currently being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl From<&TypeKind> for TypeCategory {
    fn from(kind: &TypeKind) -> Self {
        match kind {
            TypeKind::Class => TypeCategory::Class,
            TypeKind::Struct => TypeCategory::Struct,
            TypeKind::Interface => TypeCategory::Interface,
            TypeKind::Enum => TypeCategory::Enum,
            TypeKind::Delegate { .. } => TypeCategory::Delegate,
        }
    }
}

/// Innermost enclosing type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScope {
    pub name: String,
    pub category: TypeCategory,
}

/// Created per top-level render call and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    current_type: Option<TypeScope>,
    current_member: Option<String>,
    /// Set while rendering a loop header, where statements carry no terminator
    pub suppress_terminator: bool,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `decl` the current type, returning the previous one for [`Self::leave_type`].
    pub fn enter_type(&mut self, decl: &TypeDecl) -> Option<TypeScope> {
        self.current_type.replace(TypeScope {
            name: decl.name.clone(),
            category: TypeCategory::from(&decl.kind),
        })
    }

    pub fn leave_type(&mut self, previous: Option<TypeScope>) {
        self.current_type = previous;
    }

    pub fn enter_member(&mut self, name: &str) -> Option<String> {
        self.current_member.replace(name.to_string())
    }

    pub fn leave_member(&mut self, previous: Option<String>) {
        self.current_member = previous;
    }

    pub fn current_type(&self) -> Option<&TypeScope> {
        self.current_type.as_ref()
    }

    pub fn current_type_name(&self) -> &str {
        self.current_type.as_ref().map(|t| t.name.as_str()).unwrap_or_default()
    }

    pub fn current_member(&self) -> Option<&str> {
        self.current_member.as_deref()
    }

    fn is(&self, category: TypeCategory) -> bool {
        self.current_type.as_ref().is_some_and(|t| t.category == category)
    }

    pub fn in_class(&self) -> bool {
        self.is(TypeCategory::Class)
    }

    pub fn in_struct(&self) -> bool {
        self.is(TypeCategory::Struct)
    }

    pub fn in_interface(&self) -> bool {
        self.is(TypeCategory::Interface)
    }

    pub fn in_enum(&self) -> bool {
        self.is(TypeCategory::Enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_types_restore_outer_scope() {
        let mut ctx = RenderContext::new();
        let outer = TypeDecl::class("Outer");
        let inner = TypeDecl::interface("IInner");

        let none = ctx.enter_type(&outer);
        assert!(none.is_none());
        let saved = ctx.enter_type(&inner);
        assert!(ctx.in_interface());
        assert_eq!(ctx.current_type_name(), "IInner");
        ctx.leave_type(saved);
        assert!(ctx.in_class());
        assert_eq!(ctx.current_type_name(), "Outer");
        ctx.leave_type(none);
        assert_eq!(ctx.current_type_name(), "");
    }
}
