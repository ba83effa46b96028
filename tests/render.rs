//! Rendering whole compile units through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use codedom::codegen::{BracingStyle, RenderError};
use codedom::tree::*;
use codedom::{CodeGenerator, GeneratorOptions, Language};
use pretty_assertions::assert_eq;

fn widget_unit() -> CompileUnit {
    let widget = TypeDecl::class("Widget")
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
        );
    CompileUnit::new()
        .with_reference("System.Xml.dll")
        .with_namespace(Namespace::new("Acme").with_import("System").with_type(widget))
}

#[test]
fn test_csharp_compile_unit() {
    let text = CodeGenerator::new(Language::CSharp)
        .generate_compile_unit(&widget_unit())
        .unwrap();
    assert_eq!(
        text,
        "namespace Acme {
    using System;

    public class Widget {
        private int count;

        public int Run(int seed) {
            int x;
            x = seed;
            return x;
        }
    }
}
"
    );
}

#[test]
fn test_vb_compile_unit() {
    let text = CodeGenerator::new(Language::VisualBasic)
        .generate_compile_unit(&widget_unit())
        .unwrap();
    assert_eq!(
        text,
        "Imports System

Namespace Acme
    Public Class Widget
        Private count As Integer

        Public Function Run(ByVal seed As Integer) As Integer
            Dim x As Integer
            x = seed
            Return x
        End Function
    End Class
End Namespace
"
    );
}

#[test]
fn test_tree_loaded_from_json() {
    let json = r#"{
        "namespaces": [{
            "name": "Acme",
            "imports": [{ "namespace": "System" }],
            "types": [{ "name": "Empty", "kind": "class" }]
        }]
    }"#;
    let unit: CompileUnit = serde_json::from_str(json).expect("tree parses");
    assert!(unit.referenced_libraries.is_empty());

    let csharp = CodeGenerator::new(Language::CSharp).generate_compile_unit(&unit).unwrap();
    assert_eq!(csharp, "namespace Acme {\n    using System;\n\n    public class Empty {\n    }\n}\n");

    let vb = CodeGenerator::new(Language::VisualBasic).generate_compile_unit(&unit).unwrap();
    assert_eq!(vb, "Imports System\n\nNamespace Acme\n    Public Class Empty\n    End Class\nEnd Namespace\n");
}

#[test]
fn test_serialized_tree_renders_identically() {
    let unit = widget_unit();
    let json = serde_json::to_string(&unit).unwrap();
    let loaded: CompileUnit = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, unit);
    for language in [Language::CSharp, Language::VisualBasic] {
        let generator = CodeGenerator::new(language);
        assert_eq!(
            generator.generate_compile_unit(&loaded).unwrap(),
            generator.generate_compile_unit(&unit).unwrap()
        );
    }
}

#[test]
fn test_layout_options_apply_to_whole_unit() {
    let options = GeneratorOptions::default()
        .with_indent("\t")
        .with_bracing(BracingStyle::C)
        .with_blank_lines(false);
    let text = CodeGenerator::new(Language::CSharp)
        .with_options(options)
        .generate_compile_unit(&widget_unit())
        .unwrap();
    assert_eq!(
        text,
        "namespace Acme\n{\n\tusing System;\n\n\tpublic class Widget\n\t{\n\t\tprivate int count;\n\t\tpublic int Run(int seed)\n\t\t{\n\t\t\tint x;\n\t\t\tx = seed;\n\t\t\treturn x;\n\t\t}\n\t}\n}\n"
    );
}

#[test]
fn test_validation_rejects_bad_identifiers() {
    assert!(validate_identifiers(&widget_unit()).is_ok());

    let unit = CompileUnit::new().with_namespace(Namespace::new("Acme").with_type(TypeDecl::class("2Fast")));
    let err = validate_identifiers(&unit).unwrap_err();
    assert_eq!(err.identifier, "2Fast");
}

#[test]
fn test_vb_rejects_return_attributes() {
    let mut member = Member::method("Parse", None, Vec::new(), Vec::new()).with_modifiers(Modifiers::public());
    if let MemberKind::Method { return_attributes, .. } = &mut member.kind {
        return_attributes.push(AttributeDecl::new("MarshalAs"));
    }
    let unit = CompileUnit::new().with_namespace(Namespace::new("Acme").with_type(TypeDecl::class("Codec").with_member(member)));
    let err = CodeGenerator::new(Language::VisualBasic).generate_compile_unit(&unit).unwrap_err();
    assert!(matches!(err, RenderError::Unsupported { .. }));
}

fn render_type(language: Language, decl: &TypeDecl) -> String {
    CodeGenerator::new(language)
        .with_options(GeneratorOptions::default().with_blank_lines(false))
        .generate_type(decl)
        .unwrap()
}

fn shape_interface() -> TypeDecl {
    TypeDecl::interface("IShape")
        .with_member(Member::property("Area", "System.Double", vec![], vec![]).with_modifiers(Modifiers::public()))
        .with_member(
            Member::method("Scale", None, vec![Parameter::new("factor", "System.Double")], vec![])
                .with_modifiers(Modifiers::public().hiding()),
        )
        .with_member(Member::field("ignored", "System.Int32", None))
}

#[test]
fn test_interface_members_only_hide() {
    assert_eq!(
        render_type(Language::CSharp, &shape_interface()),
        "public interface IShape {\n    double Area {\n        get;\n    }\n    new void Scale(double factor);\n}\n"
    );
    assert_eq!(
        render_type(Language::VisualBasic, &shape_interface()),
        "Public Interface IShape\n    ReadOnly Property Area As Double\n    Shadows Sub Scale(ByVal factor As Double)\nEnd Interface\n"
    );
}

#[test]
fn test_enum_members_have_no_modifiers() {
    let color = TypeDecl::enumeration("Color")
        .with_member(Member::field("Red", "System.Int32", None).with_modifiers(Modifiers::public()))
        .with_member(
            Member::field("Green", "System.Int32", Some(Expr::int(2)))
                .with_modifiers(Modifiers::public().with_scope(Scope::Static)),
        )
        .with_member(Member::method("Describe", None, vec![], vec![]));
    assert_eq!(
        render_type(Language::CSharp, &color),
        "public enum Color {\n    Red,\n    Green = 2,\n}\n"
    );
    assert_eq!(
        render_type(Language::VisualBasic, &color),
        "Public Enum Color\n    Red\n    Green = 2\nEnd Enum\n"
    );
}

#[test]
fn test_constructor_chaining() {
    let widget = TypeDecl::class("Widget")
        .with_member(
            Member::constructor(vec![Parameter::new("seed", "System.Int32")], vec![])
                .with_base_args(vec![Expr::arg("seed")])
                .with_modifiers(Modifiers::public()),
        )
        .with_member(
            Member::constructor(vec![], vec![])
                .with_chained_args(vec![Expr::int(0)])
                .with_modifiers(Modifiers::public()),
        );
    assert_eq!(
        render_type(Language::CSharp, &widget),
        "public class Widget {
    public Widget(int seed) : base(seed) {
    }
    public Widget() : this(0) {
    }
}
"
    );
    assert_eq!(
        render_type(Language::VisualBasic, &widget),
        "Public Class Widget
    Public Sub New(ByVal seed As Integer)
        MyBase.New(seed)
    End Sub
    Public Sub New()
        Me.New(0)
    End Sub
End Class
"
    );
}

fn wide_class(count: usize) -> TypeDecl {
    let parameters = (0..count)
        .map(|i| Parameter::new(format!("p{i}"), "System.Int32"))
        .collect();
    TypeDecl::class("Widget")
        .with_member(Member::method("Wide", None, parameters, vec![]).with_modifiers(Modifiers::public()))
}

#[test]
fn test_long_parameter_lists_wrap() {
    let csharp_params: Vec<String> = (0..16).map(|i| format!("int p{i}")).collect();
    assert_eq!(
        render_type(Language::CSharp, &wide_class(16)),
        format!(
            "public class Widget {{\n    public void Wide({}) {{\n    }}\n}}\n",
            csharp_params.join(",\n        ")
        )
    );

    let vb_params: Vec<String> = (0..16).map(|i| format!("ByVal p{i} As Integer")).collect();
    assert_eq!(
        render_type(Language::VisualBasic, &wide_class(16)),
        format!(
            "Public Class Widget\n    Public Sub Wide({})\n    End Sub\nEnd Class\n",
            vb_params.join(", _\n        ")
        )
    );
}

#[test]
fn test_short_parameter_lists_stay_on_one_line() {
    let csharp_params: Vec<String> = (0..15).map(|i| format!("int p{i}")).collect();
    assert_eq!(
        render_type(Language::CSharp, &wide_class(15)),
        format!("public class Widget {{\n    public void Wide({}) {{\n    }}\n}}\n", csharp_params.join(", "))
    );
    let vb = render_type(Language::VisualBasic, &wide_class(15));
    assert!(!vb.contains(" _\n"));
}

#[test]
fn test_snippet_unit_is_copied_verbatim() {
    let unit = CompileUnit::snippet("class A {}\n");
    for language in [Language::CSharp, Language::VisualBasic] {
        assert_eq!(CodeGenerator::new(language).generate_compile_unit(&unit).unwrap(), "class A {}\n");
    }

    let mut unit = CompileUnit::snippet("class B {}");
    if let Some(snippet) = unit.snippet.as_mut() {
        snippet.line_pragma = Some(LinePragma::new("gen.txt", 3));
    }
    assert_eq!(
        CodeGenerator::new(Language::CSharp).generate_compile_unit(&unit).unwrap(),
        "#line 3 \"gen.txt\"\nclass B {}\n#line default\n"
    );
    assert_eq!(
        CodeGenerator::new(Language::VisualBasic).generate_compile_unit(&unit).unwrap(),
        "#ExternalSource(\"gen.txt\",3)\nclass B {}\n#End ExternalSource\n"
    );
}

#[test]
fn test_snippet_unit_survives_json() {
    let json = r#"{ "snippet": { "text": "Module M\nEnd Module\n" } }"#;
    let unit: CompileUnit = serde_json::from_str(json).expect("tree parses");
    assert!(unit.namespaces.is_empty());
    assert_eq!(
        CodeGenerator::new(Language::VisualBasic).generate_compile_unit(&unit).unwrap(),
        "Module M\nEnd Module\n"
    );
}
