//! The per-language rendering contract.

use std::fmt;

use super::dispatch::Renderer;
use super::error::{RenderError, Result};
use crate::tree::*;

/// Optional constructs a backend may refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    GotoStatements,
    TryCatchStatements,
    StaticConstructors,
    EntryPointMethod,
    ReturnTypeAttributes,
    ChainedConstructorArguments,
    NestedTypes,
    DeclareEvents,
    DeclareDelegates,
    DeclareEnums,
    DeclareInterfaces,
    DeclareValueTypes,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Feature::GotoStatements => "goto statements",
            Feature::TryCatchStatements => "try/catch statements",
            Feature::StaticConstructors => "static constructors",
            Feature::EntryPointMethod => "entry point methods",
            Feature::ReturnTypeAttributes => "return type attributes",
            Feature::ChainedConstructorArguments => "chained constructor arguments",
            Feature::NestedTypes => "nested types",
            Feature::DeclareEvents => "events",
            Feature::DeclareDelegates => "delegates",
            Feature::DeclareEnums => "enums",
            Feature::DeclareInterfaces => "interfaces",
            Feature::DeclareValueTypes => "value types",
        };
        f.write_str(text)
    }
}

/// Rendering rules for one target syntax.
///
/// Every node variant has exactly one operation here. Operations write to the
/// [`Renderer`] and recurse through it for child nodes; the default bodies
/// cover forms that read the same in every supported language.
pub trait LanguageBackend: Send + Sync {
    /// Human readable language name used in error messages
    fn name(&self) -> &'static str;

    /// Source file extension, without the dot
    fn file_extension(&self) -> &'static str;

    /// Value passed to the external compiler's `-x` flag
    fn compiler_language(&self) -> &'static str;

    fn supports(&self, _feature: Feature) -> bool {
        true
    }

    fn null_token(&self) -> &'static str;

    fn is_reserved(&self, word: &str) -> bool;

    /// Wrap a reserved word so it can be used as an identifier.
    fn escape_identifier(&self, name: &str) -> String;

    /// Rename a reserved word into a plain identifier.
    fn create_valid_identifier(&self, name: &str) -> String {
        if self.is_reserved(name) {
            format!("_{name}")
        } else {
            name.to_string()
        }
    }

    fn is_valid_identifier(&self, name: &str) -> bool {
        !self.is_reserved(name) && is_valid_language_independent_identifier(name)
    }

    fn quote_string(&self, value: &str) -> String;

    fn quote_char(&self, value: char) -> Result<String>;

    fn operator_token(&self, op: BinaryOperator) -> Option<&'static str>;

    /// Type name as written in source, keywords substituted for built-in types.
    fn type_output(&self, ty: &TypeRef) -> String;

    /// Whether imports go inside the namespace block rather than before it
    fn imports_inside_namespace(&self) -> bool;

    fn comment_prefix(&self, doc: bool) -> &'static str;

    fn attribute_delimiters(&self) -> (&'static str, &'static str);

    /// Prefix of assembly-level attributes inside the delimiters
    fn assembly_attribute_prefix(&self) -> &'static str;

    /// End the current line with `text` such that the construct continues on the next.
    fn continue_on_new_line(&self, r: &mut Renderer<'_>, text: &str) {
        r.writeln(text);
    }

    // Expressions

    fn primitive(&self, r: &mut Renderer<'_>, literal: &Literal) -> Result<()>;

    fn argument_ref(&self, r: &mut Renderer<'_>, name: &str) -> Result<()> {
        r.identifier(name);
        Ok(())
    }

    fn variable_ref(&self, r: &mut Renderer<'_>, name: &str) -> Result<()> {
        r.identifier(name);
        Ok(())
    }

    fn field_ref(&self, r: &mut Renderer<'_>, target: Option<&Expr>, name: &str) -> Result<()> {
        r.member_access(target, name)
    }

    fn property_ref(&self, r: &mut Renderer<'_>, target: Option<&Expr>, name: &str) -> Result<()> {
        r.member_access(target, name)
    }

    fn property_set_value(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.write("value");
        Ok(())
    }

    fn event_ref(&self, r: &mut Renderer<'_>, target: Option<&Expr>, name: &str) -> Result<()> {
        r.member_access(target, name)
    }

    fn method_ref(&self, r: &mut Renderer<'_>, method: &MethodRef) -> Result<()> {
        r.member_access(method.target.as_deref(), &method.name)
    }

    fn method_invoke(&self, r: &mut Renderer<'_>, method: &MethodRef, args: &[Expr]) -> Result<()> {
        self.method_ref(r, method)?;
        r.write("(");
        r.expression_list(args, false)?;
        r.write(")");
        Ok(())
    }

    fn delegate_invoke(&self, r: &mut Renderer<'_>, target: Option<&Expr>, args: &[Expr]) -> Result<()> {
        if let Some(target) = target {
            r.expression(target)?;
        }
        r.write("(");
        r.expression_list(args, false)?;
        r.write(")");
        Ok(())
    }

    fn delegate_create(&self, r: &mut Renderer<'_>, delegate_type: &TypeRef, target: Option<&Expr>, method: &str)
        -> Result<()>;

    fn object_create(&self, r: &mut Renderer<'_>, ty: &TypeRef, args: &[Expr]) -> Result<()>;

    fn array_create(&self, r: &mut Renderer<'_>, element_type: &TypeRef, size: Option<&Expr>, initializers: &[Expr])
        -> Result<()>;

    fn array_index(&self, r: &mut Renderer<'_>, target: &Expr, indices: &[Expr]) -> Result<()>;

    fn indexer(&self, r: &mut Renderer<'_>, target: &Expr, indices: &[Expr]) -> Result<()>;

    fn cast(&self, r: &mut Renderer<'_>, ty: &TypeRef, expr: &Expr) -> Result<()>;

    fn binary(&self, r: &mut Renderer<'_>, left: &Expr, op: BinaryOperator, right: &Expr) -> Result<()> {
        let token = r.operator(op)?;
        r.write("(");
        r.expression(left)?;
        r.write(" ");
        r.write(token);
        r.write(" ");
        r.expression(right)?;
        r.write(")");
        Ok(())
    }

    fn direction(&self, r: &mut Renderer<'_>, direction: Direction, expr: &Expr) -> Result<()>;

    fn this_ref(&self, r: &mut Renderer<'_>) -> Result<()>;

    fn base_ref(&self, r: &mut Renderer<'_>) -> Result<()>;

    fn type_of(&self, r: &mut Renderer<'_>, ty: &TypeRef) -> Result<()>;

    fn type_reference(&self, r: &mut Renderer<'_>, ty: &TypeRef) -> Result<()> {
        r.type_ref(ty);
        Ok(())
    }

    fn snippet_expression(&self, r: &mut Renderer<'_>, text: &str) -> Result<()> {
        r.write(text);
        Ok(())
    }

    // Statements

    fn assign(&self, r: &mut Renderer<'_>, left: &Expr, right: &Expr) -> Result<()>;

    fn expression_statement(&self, r: &mut Renderer<'_>, expr: &Expr) -> Result<()>;

    fn condition(&self, r: &mut Renderer<'_>, condition: &Expr, true_statements: &[Statement], false_statements: &[Statement])
        -> Result<()>;

    fn iteration(
        &self,
        r: &mut Renderer<'_>,
        init: Option<&Statement>,
        test: Option<&Expr>,
        increment: Option<&Statement>,
        body: &[Statement],
    ) -> Result<()>;

    fn try_catch_finally(
        &self,
        r: &mut Renderer<'_>,
        try_statements: &[Statement],
        catch_clauses: &[CatchClause],
        finally_statements: &[Statement],
    ) -> Result<()>;

    fn throw(&self, r: &mut Renderer<'_>, expr: Option<&Expr>) -> Result<()>;

    fn method_return(&self, r: &mut Renderer<'_>, expr: Option<&Expr>) -> Result<()>;

    fn goto(&self, r: &mut Renderer<'_>, label: &str) -> Result<()>;

    /// Labels sit one level left of the statements they mark.
    fn labeled(&self, r: &mut Renderer<'_>, label: &str, statement: Option<&Statement>) -> Result<()> {
        let level = r.indent_level();
        r.set_indent_level(level.saturating_sub(1));
        r.write(label);
        r.writeln(":");
        r.set_indent_level(level);
        if let Some(statement) = statement {
            r.statement(statement)?;
        }
        Ok(())
    }

    fn variable_declaration(&self, r: &mut Renderer<'_>, ty: &TypeRef, name: &str, init: Option<&Expr>) -> Result<()>;

    fn snippet_statement(&self, r: &mut Renderer<'_>, text: &str) -> Result<()> {
        r.writeln(text);
        Ok(())
    }

    fn attach_event(&self, r: &mut Renderer<'_>, event: &Expr, listener: &Expr) -> Result<()>;

    fn remove_event(&self, r: &mut Renderer<'_>, event: &Expr, listener: &Expr) -> Result<()>;

    // Declarations

    fn namespace_start(&self, r: &mut Renderer<'_>, namespace: &Namespace) -> Result<()>;

    fn namespace_end(&self, r: &mut Renderer<'_>, namespace: &Namespace) -> Result<()>;

    fn import(&self, r: &mut Renderer<'_>, import: &Import) -> Result<()>;

    fn type_start(&self, r: &mut Renderer<'_>, decl: &TypeDecl) -> Result<()>;

    fn type_end(&self, r: &mut Renderer<'_>, decl: &TypeDecl) -> Result<()>;

    fn delegate_declaration(
        &self,
        r: &mut Renderer<'_>,
        decl: &TypeDecl,
        return_type: Option<&TypeRef>,
        parameters: &[Parameter],
    ) -> Result<()>;

    fn field(&self, r: &mut Renderer<'_>, member: &Member, ty: &TypeRef, init: Option<&Expr>) -> Result<()>;

    fn property(
        &self,
        r: &mut Renderer<'_>,
        member: &Member,
        ty: &TypeRef,
        parameters: &[Parameter],
        accessors: Accessors<'_>,
        private_implementation: Option<&TypeRef>,
    ) -> Result<()>;

    fn method(&self, r: &mut Renderer<'_>, member: &Member, signature: MethodSignature<'_>, statements: &[Statement])
        -> Result<()>;

    fn constructor(
        &self,
        r: &mut Renderer<'_>,
        member: &Member,
        parameters: &[Parameter],
        chain: ConstructorChain<'_>,
        statements: &[Statement],
    ) -> Result<()>;

    fn type_constructor(&self, r: &mut Renderer<'_>, member: &Member, statements: &[Statement]) -> Result<()>;

    fn entry_point(&self, r: &mut Renderer<'_>, member: &Member, statements: &[Statement]) -> Result<()>;

    fn event(&self, r: &mut Renderer<'_>, member: &Member, ty: &TypeRef, private_implementation: Option<&TypeRef>)
        -> Result<()>;

    fn snippet_member(&self, r: &mut Renderer<'_>, text: &str) -> Result<()> {
        r.write(text);
        if !r.at_line_start() {
            r.newline();
        }
        Ok(())
    }

    fn parameter(&self, r: &mut Renderer<'_>, parameter: &Parameter) -> Result<()>;

    fn line_pragma_start(&self, r: &mut Renderer<'_>, pragma: &LinePragma) -> Result<()>;

    fn line_pragma_end(&self, r: &mut Renderer<'_>, pragma: &LinePragma) -> Result<()>;
}

/// Property accessors and their bodies
#[derive(Debug, Clone, Copy)]
pub struct Accessors<'t> {
    pub has_get: bool,
    pub has_set: bool,
    pub get_statements: &'t [Statement],
    pub set_statements: &'t [Statement],
}

/// Everything on a method's declaration line
#[derive(Debug, Clone, Copy)]
pub struct MethodSignature<'t> {
    pub return_type: Option<&'t TypeRef>,
    pub parameters: &'t [Parameter],
    pub return_attributes: &'t [AttributeDecl],
    pub private_implementation: Option<&'t TypeRef>,
}

/// Which constructor, if any, runs before the body. Base arguments win over
/// chained ones.
#[derive(Debug, Clone, Copy)]
pub enum ConstructorChain<'t> {
    None,
    Base(&'t [Expr]),
    This(&'t [Expr]),
}

impl<'t> ConstructorChain<'t> {
    pub fn from_args(base_args: &'t [Expr], chained_args: &'t [Expr]) -> Self {
        if !base_args.is_empty() {
            ConstructorChain::Base(base_args)
        } else if !chained_args.is_empty() {
            ConstructorChain::This(chained_args)
        } else {
            ConstructorChain::None
        }
    }
}

/// Split comment text into lines on CR, LF, CRLF, U+2028 and U+2029.
pub fn comment_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\r' => {
                lines.push(&text[start..i]);
                start = i + 1;
                if let Some(&(j, '\n')) = chars.peek() {
                    chars.next();
                    start = j + 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                lines.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Floating point literal, naming the non-finite values through `type_name`.
pub(crate) fn float_literal<T: Into<f64> + fmt::Debug + Copy>(value: T, type_name: &str, suffix: &str) -> String {
    let wide: f64 = value.into();
    if wide.is_nan() {
        format!("{type_name}.NaN")
    } else if wide.is_infinite() {
        let sign = if wide > 0.0 { "Positive" } else { "Negative" };
        format!("{type_name}.{sign}Infinity")
    } else {
        format!("{value:?}{suffix}")
    }
}

/// Accept an invariant decimal literal: optional sign, digits, at most one point.
pub(crate) fn checked_decimal<'t>(text: &'t str, language: &'static str) -> Result<&'t str> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if all_digits(whole) && fraction.map_or(true, all_digits) {
        Ok(text)
    } else {
        Err(RenderError::InvalidLiteral {
            reason: format!("`{text}` is not a decimal number"),
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines_split_on_every_terminator() {
        assert_eq!(comment_lines("a\r\nb\rc\nd\u{2028}e\u{2029}f"), vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(comment_lines("single"), vec!["single"]);
        assert_eq!(comment_lines("trailing\n"), vec!["trailing"]);
        assert_eq!(comment_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(comment_lines("").is_empty());
    }

    #[test]
    fn test_constructor_chain_prefers_base() {
        let base = [Expr::int(1)];
        let chained = [Expr::int(2)];
        assert!(matches!(ConstructorChain::from_args(&base, &chained), ConstructorChain::Base(_)));
        assert!(matches!(ConstructorChain::from_args(&[], &chained), ConstructorChain::This(_)));
        assert!(matches!(ConstructorChain::from_args(&[], &[]), ConstructorChain::None));
    }

    #[test]
    fn test_numeric_helpers() {
        assert_eq!(float_literal(0.1f32, "float", "F"), "0.1F");
        assert_eq!(float_literal(f64::NEG_INFINITY, "Double", ""), "Double.NegativeInfinity");
        assert!(checked_decimal("-10.25", "C#").is_ok());
        assert!(checked_decimal("7", "C#").is_ok());
        for bad in ["", "-", "1.", ".5", "1e3", "1.2.3"] {
            assert!(checked_decimal(bad, "C#").is_err(), "{bad}");
        }
    }
}
