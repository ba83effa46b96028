//! Source generation: renders a [`crate::tree`] into C# or Visual Basic text.

mod backend;
mod context;
mod csharp;
mod dispatch;
mod error;
mod options;
mod vb;
mod writer;

pub use backend::{comment_lines, Accessors, ConstructorChain, Feature, LanguageBackend, MethodSignature};
pub use context::{RenderContext, TypeCategory, TypeScope};
pub use csharp::CSharpBackend;
pub use dispatch::{ordered_members, Renderer};
pub use error::{RenderError, Result};
pub use options::{BracingStyle, GeneratorOptions};
pub use vb::VbBackend;
pub use writer::IndentedWriter;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::{CompileUnit, Expr, Member, Namespace, Node, Statement, TypeDecl};

static CSHARP: CSharpBackend = CSharpBackend;
static VB: VbBackend = VbBackend;

/// Target syntax
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    CSharp,
    VisualBasic,
}

impl Language {
    pub fn backend(self) -> &'static dyn LanguageBackend {
        match self {
            Language::CSharp => &CSHARP,
            Language::VisualBasic => &VB,
        }
    }
}

/// Renders trees with one backend and one set of layout options.
///
/// Each `generate_*` call runs a fresh pass with its own output buffer and
/// context, so a generator can be shared freely.
pub struct CodeGenerator {
    backend: &'static dyn LanguageBackend,
    options: GeneratorOptions,
}

impl CodeGenerator {
    pub fn new(language: Language) -> Self {
        Self::from_backend(language.backend())
    }

    pub fn from_backend(backend: &'static dyn LanguageBackend) -> Self {
        Self {
            backend,
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn backend(&self) -> &'static dyn LanguageBackend {
        self.backend
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Render any node into a new string.
    pub fn render(&self, node: Node<'_>) -> Result<String> {
        debug!(language = self.backend.name(), family = ?node.family(), "rendering");
        let mut renderer = Renderer::new(self.backend, &self.options);
        renderer.render(node)?;
        Ok(renderer.finish())
    }

    pub fn generate_compile_unit(&self, unit: &CompileUnit) -> Result<String> {
        self.render(Node::CompileUnit(unit))
    }

    pub fn generate_namespace(&self, namespace: &Namespace) -> Result<String> {
        self.render(Node::Namespace(namespace))
    }

    pub fn generate_type(&self, decl: &TypeDecl) -> Result<String> {
        self.render(Node::Type(decl))
    }

    pub fn generate_member(&self, member: &Member) -> Result<String> {
        self.render(Node::Member(member))
    }

    pub fn generate_statement(&self, statement: &Statement) -> Result<String> {
        self.render(Node::Statement(statement))
    }

    pub fn generate_expression(&self, expr: &Expr) -> Result<String> {
        self.render(Node::Expression(expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::*;
    use pretty_assertions::assert_eq;

    fn widget() -> TypeDecl {
        TypeDecl::class("Widget")
            .with_member(Member::field("count", "System.Int32", None))
            .with_member(
                Member::method(
                    "Run",
                    Some(TypeRef::new("System.Int32")),
                    vec![Parameter::new("seed", "System.Int32")],
                    vec![
                        Statement::declare("System.Int32", "x", None),
                        Statement::assign(Expr::var("x"), Expr::arg("seed")),
                        Statement::ret(Some(Expr::var("x"))),
                    ],
                )
                .with_modifiers(Modifiers::public()),
            )
    }

    #[test]
    fn test_method_body_renders_in_order() {
        let text = CodeGenerator::new(Language::CSharp).generate_type(&widget()).unwrap();
        assert_eq!(
            text,
            "public class Widget {\n    private int count;\n\n    public int Run(int seed) {\n        int x;\n        x = seed;\n        return x;\n    }\n}\n"
        );
    }

    #[test]
    fn test_method_body_renders_in_order_vb() {
        let text = CodeGenerator::new(Language::VisualBasic).generate_type(&widget()).unwrap();
        assert_eq!(
            text,
            "Public Class Widget\n    Private count As Integer\n\n    Public Function Run(ByVal seed As Integer) As Integer\n        Dim x As Integer\n        x = seed\n        Return x\n    End Function\nEnd Class\n"
        );
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let unit = CompileUnit::new().with_namespace(Namespace::new("Acme").with_import("System").with_type(widget()));
        for language in [Language::CSharp, Language::VisualBasic] {
            let generator = CodeGenerator::new(language);
            assert_eq!(
                generator.generate_compile_unit(&unit).unwrap(),
                generator.generate_compile_unit(&unit).unwrap()
            );
        }
    }

    #[test]
    fn test_c_bracing() {
        let options = GeneratorOptions::default().with_bracing(BracingStyle::C).with_indent("\t");
        let generator = CodeGenerator::new(Language::CSharp).with_options(options);
        let text = generator
            .generate_statement(&Statement::while_loop(Expr::bool(true), vec![Statement::ret(None)]))
            .unwrap();
        assert_eq!(text, "while (true)\n{\n\treturn;\n}\n");
    }

    #[test]
    fn test_unsupported_construct_names_member() {
        let mut member = Member::method("Parse", None, Vec::new(), Vec::new()).with_modifiers(Modifiers::public());
        if let MemberKind::Method { return_attributes, .. } = &mut member.kind {
            return_attributes.push(AttributeDecl::new("MarshalAs"));
        }
        let decl = TypeDecl::class("Codec").with_member(member);
        let err = CodeGenerator::new(Language::VisualBasic).generate_type(&decl).unwrap_err();
        assert_eq!(err.to_string(), "VB does not support return type attributes (in `Parse`)");
        assert!(CodeGenerator::new(Language::CSharp).generate_type(&decl).is_ok());
    }

    #[test]
    fn test_language_metadata() {
        assert_eq!(Language::CSharp.backend().file_extension(), "cs");
        assert_eq!(Language::VisualBasic.backend().file_extension(), "vb");
        assert_eq!(Language::CSharp.backend().compiler_language(), "csharp");
        assert_eq!(Language::VisualBasic.backend().compiler_language(), "vb");
    }
}
