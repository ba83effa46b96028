//! C# backend.

use super::backend::{checked_decimal, float_literal, Accessors, ConstructorChain, LanguageBackend, MethodSignature};
use super::dispatch::Renderer;
use super::error::{RenderError, Result};
use crate::tree::*;

const LANGUAGE: &str = "C#";

/// Words that must be escaped with `@` to be used as identifiers
const RESERVED_WORDS: &[&str] = &[
    "abstract", "__arglist", "as", "base", "bool", "break", "__builtin", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit", "in",
    "int", "interface", "internal", "is", "lock", "long", "__long_double", "__makeref", "__module", "namespace",
    "new", "null", "object", "operator", "out", "override", "params", "private", "protected", "public", "readonly",
    "ref", "__reftype", "__refvalue", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe",
    "ushort", "using", "virtual", "void", "volatile", "while",
];

/// Rendered characters after which a string literal is split
const STRING_CHUNK: usize = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpBackend;

impl CSharpBackend {
    fn normalize_type_name(name: &str) -> &str {
        match name {
            "System.Void" => "void",
            "System.Boolean" => "bool",
            "System.Char" => "char",
            "System.Byte" => "byte",
            "System.SByte" => "sbyte",
            "System.Int16" => "short",
            "System.UInt16" => "ushort",
            "System.Int32" => "int",
            "System.UInt32" => "uint",
            "System.Int64" => "long",
            "System.UInt64" => "ulong",
            "System.Single" => "float",
            "System.Double" => "double",
            "System.Decimal" => "decimal",
            "System.String" => "string",
            "System.Object" => "object",
            other => other,
        }
    }

    fn type_name_pair(&self, r: &mut Renderer<'_>, ty: &TypeRef, name: &str) {
        r.type_ref(ty);
        r.write(" ");
        r.identifier(name);
    }

    fn member_access_modifier(&self, r: &mut Renderer<'_>, modifiers: &Modifiers) {
        r.write(match modifiers.access {
            Access::Public => "public ",
            Access::Private => "private ",
            Access::Protected => "protected ",
            Access::Internal => "internal ",
            Access::ProtectedInternal => "protected internal ",
        });
    }

    fn member_scope_modifier(&self, r: &mut Renderer<'_>, modifiers: &Modifiers) {
        if modifiers.new_slot {
            r.write("new ");
        }
        match modifiers.scope {
            Scope::Abstract => r.write("abstract "),
            Scope::Static => r.write("static "),
            Scope::Override => r.write("override "),
            Scope::Virtual => r.write("virtual "),
            Scope::Final | Scope::Const => {}
        }
    }

    fn field_scope_modifier(&self, r: &mut Renderer<'_>, modifiers: &Modifiers) {
        if modifiers.new_slot {
            r.write("new ");
        }
        match modifiers.scope {
            Scope::Static => r.write("static "),
            Scope::Const => r.write("const "),
            _ => {}
        }
    }

    /// Modifiers of a method, property or event. Interface members only hide;
    /// explicit implementations take none.
    fn member_modifiers(&self, r: &mut Renderer<'_>, modifiers: &Modifiers, private_implementation: Option<&TypeRef>) {
        if r.ctx.in_interface() {
            if modifiers.new_slot {
                r.write("new ");
            }
        } else if private_implementation.is_none() {
            self.member_access_modifier(r, modifiers);
            self.member_scope_modifier(r, modifiers);
        }
    }

    fn has_no_body(&self, r: &Renderer<'_>, modifiers: &Modifiers) -> bool {
        r.ctx.in_interface() || modifiers.is_abstract()
    }

    fn block(&self, r: &mut Renderer<'_>, statements: &[Statement]) -> Result<()> {
        r.open_block();
        r.statements(statements)?;
        r.close_block();
        Ok(())
    }

    fn type_visibility(&self, r: &mut Renderer<'_>, visibility: TypeVisibility) {
        match visibility {
            TypeVisibility::Public => r.write("public "),
            TypeVisibility::Private => r.write("private "),
            TypeVisibility::Internal => {}
        }
    }
}

impl LanguageBackend for CSharpBackend {
    fn name(&self) -> &'static str {
        LANGUAGE
    }

    fn file_extension(&self) -> &'static str {
        "cs"
    }

    fn compiler_language(&self) -> &'static str {
        "csharp"
    }

    fn null_token(&self) -> &'static str {
        "null"
    }

    fn is_reserved(&self, word: &str) -> bool {
        RESERVED_WORDS.contains(&word)
    }

    fn escape_identifier(&self, name: &str) -> String {
        if self.is_reserved(name) {
            format!("@{name}")
        } else {
            name.to_string()
        }
    }

    fn quote_string(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        let mut length = 0;
        let mut chars = value.chars().peekable();
        while let Some(c) = chars.next() {
            let before = out.len();
            match c {
                '\0' => out.push_str("\\0"),
                '\r' => out.push_str("\\r"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                ' '..='~' => out.push(c),
                _ => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        out.push_str(&format!("\\u{unit:04x}"));
                    }
                }
            }
            length += out.len() - before;
            if length >= STRING_CHUNK && chars.peek().is_some() {
                out.push_str("\" +\n\"");
                length = 0;
            }
        }
        out.push('"');
        out
    }

    fn quote_char(&self, value: char) -> Result<String> {
        let escaped = match value {
            '\'' => "\\'".to_string(),
            '\\' => "\\\\".to_string(),
            '\0' => "\\0".to_string(),
            '\u{7}' => "\\a".to_string(),
            '\u{8}' => "\\b".to_string(),
            '\u{c}' => "\\f".to_string(),
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            '\t' => "\\t".to_string(),
            '\u{b}' => "\\v".to_string(),
            ' '..='~' => value.to_string(),
            c if (c as u32) <= 0xFFFF => format!("\\u{:04x}", c as u32),
            c => {
                return Err(RenderError::InvalidLiteral {
                    reason: format!("character U+{:X} does not fit in a char", c as u32),
                    language: LANGUAGE,
                })
            }
        };
        Ok(format!("'{escaped}'"))
    }

    fn operator_token(&self, op: BinaryOperator) -> Option<&'static str> {
        Some(match op {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "%",
            BinaryOperator::Assign => "=",
            BinaryOperator::IdentityInequality => "!=",
            BinaryOperator::IdentityEquality => "==",
            BinaryOperator::ValueEquality => "==",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BooleanOr => "||",
            BinaryOperator::BooleanAnd => "&&",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
        })
    }

    fn type_output(&self, ty: &TypeRef) -> String {
        let mut out = match &ty.element_type {
            Some(element) => self.type_output(element),
            None => Self::normalize_type_name(&ty.name).to_string(),
        };
        if ty.array_rank > 0 {
            out.push('[');
            out.push_str(&",".repeat(ty.array_rank - 1));
            out.push(']');
        }
        out
    }

    fn imports_inside_namespace(&self) -> bool {
        true
    }

    fn comment_prefix(&self, doc: bool) -> &'static str {
        if doc {
            "/// "
        } else {
            "// "
        }
    }

    fn attribute_delimiters(&self) -> (&'static str, &'static str) {
        ("[", "]")
    }

    fn assembly_attribute_prefix(&self) -> &'static str {
        "assembly: "
    }

    // Expressions

    fn primitive(&self, r: &mut Renderer<'_>, literal: &Literal) -> Result<()> {
        let text = match literal {
            Literal::Null => self.null_token().to_string(),
            Literal::Bool(true) => "true".to_string(),
            Literal::Bool(false) => "false".to_string(),
            Literal::Char(c) => self.quote_char(*c)?,
            Literal::String(s) => self.quote_string(s),
            Literal::Int(i) => i.to_string(),
            Literal::UInt(u) => u.to_string(),
            Literal::Float(f) => float_literal(*f, "float", "F"),
            Literal::Double(d) => float_literal(*d, "double", ""),
            Literal::Decimal(d) => format!("{}m", checked_decimal(d, LANGUAGE)?),
        };
        r.write(&text);
        Ok(())
    }

    fn delegate_create(&self, r: &mut Renderer<'_>, delegate_type: &TypeRef, target: Option<&Expr>, method: &str) -> Result<()> {
        r.write("new ");
        r.type_ref(delegate_type);
        r.write("(");
        r.member_access(target, method)?;
        r.write(")");
        Ok(())
    }

    fn object_create(&self, r: &mut Renderer<'_>, ty: &TypeRef, args: &[Expr]) -> Result<()> {
        r.write("new ");
        r.type_ref(ty);
        r.write("(");
        r.expression_list(args, false)?;
        r.write(")");
        Ok(())
    }

    fn array_create(&self, r: &mut Renderer<'_>, element_type: &TypeRef, size: Option<&Expr>, initializers: &[Expr]) -> Result<()> {
        r.write("new ");
        r.type_ref(element_type);
        if initializers.is_empty() {
            r.write("[");
            match size {
                Some(size) => r.expression(size)?,
                None => r.write("0"),
            }
            r.write("]");
        } else {
            r.writeln("[] {");
            r.expression_list(initializers, true)?;
            r.newline();
            r.write("}");
        }
        Ok(())
    }

    fn array_index(&self, r: &mut Renderer<'_>, target: &Expr, indices: &[Expr]) -> Result<()> {
        r.expression(target)?;
        r.write("[");
        r.expression_list(indices, false)?;
        r.write("]");
        Ok(())
    }

    fn indexer(&self, r: &mut Renderer<'_>, target: &Expr, indices: &[Expr]) -> Result<()> {
        self.array_index(r, target, indices)
    }

    fn cast(&self, r: &mut Renderer<'_>, ty: &TypeRef, expr: &Expr) -> Result<()> {
        r.write("((");
        r.type_ref(ty);
        r.write(")(");
        r.expression(expr)?;
        r.write("))");
        Ok(())
    }

    fn direction(&self, r: &mut Renderer<'_>, direction: Direction, expr: &Expr) -> Result<()> {
        match direction {
            Direction::Out => r.write("out "),
            Direction::Ref => r.write("ref "),
            Direction::In => {}
        }
        r.expression(expr)
    }

    fn this_ref(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.write("this");
        Ok(())
    }

    fn base_ref(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.write("base");
        Ok(())
    }

    fn type_of(&self, r: &mut Renderer<'_>, ty: &TypeRef) -> Result<()> {
        r.write("typeof(");
        r.type_ref(ty);
        r.write(")");
        Ok(())
    }

    // Statements

    fn assign(&self, r: &mut Renderer<'_>, left: &Expr, right: &Expr) -> Result<()> {
        r.expression(left)?;
        r.write(" = ");
        r.expression(right)?;
        r.end_statement(";");
        Ok(())
    }

    fn expression_statement(&self, r: &mut Renderer<'_>, expr: &Expr) -> Result<()> {
        r.expression(expr)?;
        r.end_statement(";");
        Ok(())
    }

    fn condition(&self, r: &mut Renderer<'_>, condition: &Expr, true_statements: &[Statement], false_statements: &[Statement]) -> Result<()> {
        r.write("if (");
        r.expression(condition)?;
        r.write(")");
        r.open_block();
        r.statements(true_statements)?;
        r.dedent();
        if false_statements.is_empty() {
            r.writeln("}");
            return Ok(());
        }
        if r.options().else_on_closing {
            r.write("} else");
        } else {
            r.writeln("}");
            r.write("else");
        }
        self.block(r, false_statements)
    }

    fn iteration(
        &self,
        r: &mut Renderer<'_>,
        init: Option<&Statement>,
        test: Option<&Expr>,
        increment: Option<&Statement>,
        body: &[Statement],
    ) -> Result<()> {
        if let (None, Some(test), None) = (init, test, increment) {
            r.write("while (");
            r.expression(test)?;
            r.write(")");
            return self.block(r, body);
        }
        r.write("for (");
        if let Some(init) = init {
            r.header_statement(init)?;
        }
        r.write("; ");
        if let Some(test) = test {
            r.expression(test)?;
        }
        r.write("; ");
        if let Some(increment) = increment {
            r.header_statement(increment)?;
        }
        r.write(")");
        self.block(r, body)
    }

    fn try_catch_finally(
        &self,
        r: &mut Renderer<'_>,
        try_statements: &[Statement],
        catch_clauses: &[CatchClause],
        finally_statements: &[Statement],
    ) -> Result<()> {
        r.write("try");
        self.block(r, try_statements)?;
        for clause in catch_clauses {
            match &clause.exception_type {
                Some(ty) => {
                    r.write("catch (");
                    r.type_ref(ty);
                    if let Some(name) = &clause.local_name {
                        r.write(" ");
                        r.identifier(name);
                    }
                    r.write(")");
                }
                None => r.write("catch"),
            }
            self.block(r, &clause.statements)?;
        }
        if !finally_statements.is_empty() {
            r.write("finally");
            self.block(r, finally_statements)?;
        }
        Ok(())
    }

    fn throw(&self, r: &mut Renderer<'_>, expr: Option<&Expr>) -> Result<()> {
        match expr {
            Some(expr) => {
                r.write("throw ");
                r.expression(expr)?;
                r.writeln(";");
            }
            None => r.writeln("throw;"),
        }
        Ok(())
    }

    fn method_return(&self, r: &mut Renderer<'_>, expr: Option<&Expr>) -> Result<()> {
        match expr {
            Some(expr) => {
                r.write("return ");
                r.expression(expr)?;
                r.writeln(";");
            }
            None => r.writeln("return;"),
        }
        Ok(())
    }

    fn goto(&self, r: &mut Renderer<'_>, label: &str) -> Result<()> {
        r.write("goto ");
        r.write(label);
        r.writeln(";");
        Ok(())
    }

    fn variable_declaration(&self, r: &mut Renderer<'_>, ty: &TypeRef, name: &str, init: Option<&Expr>) -> Result<()> {
        self.type_name_pair(r, ty, name);
        if let Some(init) = init {
            r.write(" = ");
            r.expression(init)?;
        }
        r.end_statement(";");
        Ok(())
    }

    fn attach_event(&self, r: &mut Renderer<'_>, event: &Expr, listener: &Expr) -> Result<()> {
        r.expression(event)?;
        r.write(" += ");
        r.expression(listener)?;
        r.writeln(";");
        Ok(())
    }

    fn remove_event(&self, r: &mut Renderer<'_>, event: &Expr, listener: &Expr) -> Result<()> {
        r.expression(event)?;
        r.write(" -= ");
        r.expression(listener)?;
        r.writeln(";");
        Ok(())
    }

    // Declarations

    fn namespace_start(&self, r: &mut Renderer<'_>, namespace: &Namespace) -> Result<()> {
        if !namespace.name.is_empty() {
            r.write("namespace ");
            r.qualified_identifier(&namespace.name);
            r.open_block();
        }
        Ok(())
    }

    fn namespace_end(&self, r: &mut Renderer<'_>, namespace: &Namespace) -> Result<()> {
        if !namespace.name.is_empty() {
            r.close_block();
        }
        Ok(())
    }

    fn import(&self, r: &mut Renderer<'_>, import: &Import) -> Result<()> {
        r.write("using ");
        r.qualified_identifier(&import.namespace);
        r.writeln(";");
        Ok(())
    }

    fn type_start(&self, r: &mut Renderer<'_>, decl: &TypeDecl) -> Result<()> {
        r.attribute_line(&decl.attributes, None)?;
        self.type_visibility(r, decl.visibility);
        if decl.is_class() {
            if decl.is_sealed {
                r.write("sealed ");
            }
            if decl.is_abstract {
                r.write("abstract ");
            }
        }
        r.write(decl.kind.keyword());
        r.write(" ");
        r.identifier(&decl.name);
        for (i, base) in decl.base_types.iter().enumerate() {
            r.write(if i == 0 { " : " } else { ", " });
            r.type_ref(base);
        }
        r.open_block();
        Ok(())
    }

    fn type_end(&self, r: &mut Renderer<'_>, _decl: &TypeDecl) -> Result<()> {
        r.close_block();
        Ok(())
    }

    fn delegate_declaration(&self, r: &mut Renderer<'_>, decl: &TypeDecl, return_type: Option<&TypeRef>, parameters: &[Parameter]) -> Result<()> {
        r.attribute_line(&decl.attributes, None)?;
        self.type_visibility(r, decl.visibility);
        r.write("delegate ");
        match return_type {
            Some(ty) => r.type_ref(ty),
            None => r.write("void"),
        }
        r.write(" ");
        r.identifier(&decl.name);
        r.write("(");
        r.parameters(parameters)?;
        r.writeln(");");
        Ok(())
    }

    fn field(&self, r: &mut Renderer<'_>, member: &Member, ty: &TypeRef, init: Option<&Expr>) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        if r.ctx.in_enum() {
            r.identifier(&member.name);
            if let Some(init) = init {
                r.write(" = ");
                r.expression(init)?;
            }
            r.writeln(",");
            return Ok(());
        }
        self.member_access_modifier(r, &member.modifiers);
        self.field_scope_modifier(r, &member.modifiers);
        self.type_name_pair(r, ty, &member.name);
        if let Some(init) = init {
            r.write(" = ");
            r.expression(init)?;
        }
        r.writeln(";");
        Ok(())
    }

    fn property(
        &self,
        r: &mut Renderer<'_>,
        member: &Member,
        ty: &TypeRef,
        parameters: &[Parameter],
        accessors: Accessors<'_>,
        private_implementation: Option<&TypeRef>,
    ) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        self.member_modifiers(r, &member.modifiers, private_implementation);
        r.type_ref(ty);
        r.write(" ");
        if let Some(interface) = private_implementation.filter(|_| !r.ctx.in_interface()) {
            r.type_ref(interface);
            r.write(".");
        }
        if parameters.is_empty() {
            r.identifier(&member.name);
        } else {
            r.write("this[");
            r.parameters(parameters)?;
            r.write("]");
        }
        r.open_block();
        let signature_only = self.has_no_body(r, &member.modifiers);
        if accessors.has_get {
            if signature_only {
                r.writeln("get;");
            } else {
                r.write("get");
                self.block(r, accessors.get_statements)?;
            }
        }
        if accessors.has_set {
            if signature_only {
                r.writeln("set;");
            } else {
                r.write("set");
                self.block(r, accessors.set_statements)?;
            }
        }
        r.close_block();
        Ok(())
    }

    fn method(&self, r: &mut Renderer<'_>, member: &Member, signature: MethodSignature<'_>, statements: &[Statement]) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        r.attribute_line(signature.return_attributes, Some("return: "))?;
        self.member_modifiers(r, &member.modifiers, signature.private_implementation);
        match signature.return_type {
            Some(ty) => r.type_ref(ty),
            None => r.write("void"),
        }
        r.write(" ");
        if let Some(interface) = signature.private_implementation.filter(|_| !r.ctx.in_interface()) {
            r.type_ref(interface);
            r.write(".");
        }
        r.identifier(&member.name);
        r.write("(");
        r.parameters(signature.parameters)?;
        r.write(")");
        if self.has_no_body(r, &member.modifiers) {
            r.writeln(";");
            Ok(())
        } else {
            self.block(r, statements)
        }
    }

    fn constructor(
        &self,
        r: &mut Renderer<'_>,
        member: &Member,
        parameters: &[Parameter],
        chain: ConstructorChain<'_>,
        statements: &[Statement],
    ) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        self.member_access_modifier(r, &member.modifiers);
        let type_name = r.ctx.current_type_name().to_string();
        r.identifier(&type_name);
        r.write("(");
        r.parameters(parameters)?;
        r.write(")");
        let (keyword, args) = match chain {
            ConstructorChain::Base(args) => ("base", args),
            ConstructorChain::This(args) => ("this", args),
            ConstructorChain::None => ("", &[][..]),
        };
        if !keyword.is_empty() {
            r.write(" : ");
            r.write(keyword);
            r.write("(");
            r.expression_list(args, false)?;
            r.write(")");
        }
        self.block(r, statements)
    }

    fn type_constructor(&self, r: &mut Renderer<'_>, member: &Member, statements: &[Statement]) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        r.write("static ");
        let type_name = r.ctx.current_type_name().to_string();
        r.identifier(&type_name);
        r.write("()");
        self.block(r, statements)
    }

    fn entry_point(&self, r: &mut Renderer<'_>, member: &Member, statements: &[Statement]) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        r.write("public static void Main()");
        self.block(r, statements)
    }

    fn event(&self, r: &mut Renderer<'_>, member: &Member, ty: &TypeRef, private_implementation: Option<&TypeRef>) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        self.member_modifiers(r, &member.modifiers, private_implementation);
        r.write("event ");
        r.type_ref(ty);
        r.write(" ");
        if let Some(interface) = private_implementation {
            r.type_ref(interface);
            r.write(".");
        }
        r.identifier(&member.name);
        r.writeln(";");
        Ok(())
    }

    fn parameter(&self, r: &mut Renderer<'_>, parameter: &Parameter) -> Result<()> {
        if !parameter.attributes.is_empty() {
            r.attributes(&parameter.attributes, None)?;
            r.write(" ");
        }
        match parameter.direction {
            Direction::Out => r.write("out "),
            Direction::Ref => r.write("ref "),
            Direction::In => {}
        }
        self.type_name_pair(r, &parameter.ty, &parameter.name);
        Ok(())
    }

    fn line_pragma_start(&self, r: &mut Renderer<'_>, pragma: &LinePragma) -> Result<()> {
        if !r.at_line_start() {
            r.newline();
        }
        r.writeln(&format!("#line {} \"{}\"", pragma.line_number, pragma.file_name));
        Ok(())
    }

    fn line_pragma_end(&self, r: &mut Renderer<'_>, _pragma: &LinePragma) -> Result<()> {
        if !r.at_line_start() {
            r.newline();
        }
        r.writeln("#line default");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::GeneratorOptions;
    use pretty_assertions::assert_eq;

    fn expr(e: &Expr) -> String {
        let options = GeneratorOptions::default();
        let mut r = Renderer::new(&CSharpBackend, &options);
        r.expression(e).unwrap();
        r.finish()
    }

    fn stmts(statements: &[Statement]) -> String {
        let options = GeneratorOptions::default();
        let mut r = Renderer::new(&CSharpBackend, &options);
        r.statements(statements).unwrap();
        r.finish()
    }

    /// Reverse of `quote_string`, for checking escapes.
    fn unquote(literal: &str) -> String {
        let joined: String = literal
            .split("\" +\n\"")
            .collect::<Vec<_>>()
            .join("");
        let inner = &joined[1..joined.len() - 1];
        let mut units: Vec<u16> = Vec::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                let mut buf = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut buf));
                continue;
            }
            match chars.next().unwrap() {
                '0' => units.push(0),
                'r' => units.push('\r' as u16),
                'n' => units.push('\n' as u16),
                't' => units.push('\t' as u16),
                '\\' => units.push('\\' as u16),
                '"' => units.push('"' as u16),
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    units.push(u16::from_str_radix(&hex, 16).unwrap());
                }
                other => panic!("unexpected escape {other}"),
            }
        }
        String::from_utf16(&units).unwrap()
    }

    #[test]
    fn test_reserved_words_escape_once() {
        let backend = CSharpBackend;
        for word in RESERVED_WORDS {
            let escaped = backend.escape_identifier(word);
            assert_eq!(escaped, format!("@{word}"));
            assert!(!backend.is_reserved(&escaped));
            assert_eq!(backend.escape_identifier(&escaped), escaped);
            assert!(!backend.is_valid_identifier(word));
        }
        assert_eq!(backend.escape_identifier("Class"), "Class");
        assert_eq!(backend.create_valid_identifier("while"), "_while");
        assert!(backend.is_valid_identifier("total"));
    }

    #[test]
    fn test_string_escapes_round_trip() {
        let backend = CSharpBackend;
        for value in ["", "plain", "tab\there", "quote \" and \\ slash", "nul\0cr\rlf\n", "é ü 😀", "\u{1}\u{7f}"] {
            assert_eq!(unquote(&backend.quote_string(value)), value);
        }
        assert_eq!(backend.quote_string("a\"b\n"), "\"a\\\"b\\n\"");
        assert_eq!(backend.quote_string("é"), "\"\\u00e9\"");
        assert_eq!(backend.quote_string("😀"), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn test_long_strings_are_split() {
        let backend = CSharpBackend;
        let value = "x".repeat(150);
        let quoted = backend.quote_string(&value);
        let chunks: Vec<&str> = quoted.split(" +\n").collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], format!("\"{}\"", "x".repeat(60)));
        assert_eq!(chunks[2], format!("\"{}\"", "x".repeat(30)));
        assert_eq!(unquote(&quoted), value);

        // exactly one chunk's worth does not leave an empty tail
        assert_eq!(backend.quote_string(&"y".repeat(60)), format!("\"{}\"", "y".repeat(60)));
    }

    #[test]
    fn test_char_literals() {
        let backend = CSharpBackend;
        assert_eq!(backend.quote_char('a').unwrap(), "'a'");
        assert_eq!(backend.quote_char('\'').unwrap(), "'\\''");
        assert_eq!(backend.quote_char('\u{7}').unwrap(), "'\\a'");
        assert_eq!(backend.quote_char('\u{b}').unwrap(), "'\\v'");
        assert_eq!(backend.quote_char('é').unwrap(), "'\\u00e9'");
        assert!(matches!(backend.quote_char('😀'), Err(RenderError::InvalidLiteral { .. })));
    }

    #[test]
    fn test_primitives() {
        assert_eq!(expr(&Expr::null()), "null");
        assert_eq!(expr(&Expr::bool(true)), "true");
        assert_eq!(expr(&Expr::int(-42)), "-42");
        assert_eq!(expr(&Expr::Primitive(Literal::Float(1.5))), "1.5F");
        assert_eq!(expr(&Expr::Primitive(Literal::Double(2.0))), "2.0");
        assert_eq!(expr(&Expr::Primitive(Literal::Double(f64::NAN))), "double.NaN");
        assert_eq!(expr(&Expr::Primitive(Literal::Decimal("12.50".into()))), "12.50m");
    }

    #[test]
    fn test_invalid_decimal() {
        let options = GeneratorOptions::default();
        let mut r = Renderer::new(&CSharpBackend, &options);
        let err = r.expression(&Expr::Primitive(Literal::Decimal("1.2.3".into()))).unwrap_err();
        assert!(matches!(err, RenderError::InvalidLiteral { .. }));
    }

    #[test]
    fn test_type_output() {
        let backend = CSharpBackend;
        assert_eq!(backend.type_output(&TypeRef::new("System.Int32")), "int");
        assert_eq!(backend.type_output(&TypeRef::new("Acme.Widget")), "Acme.Widget");
        assert_eq!(backend.type_output(&TypeRef::array_of(TypeRef::new("System.String"), 1)), "string[]");
        assert_eq!(backend.type_output(&TypeRef::array_of(TypeRef::new("System.Double"), 3)), "double[,,]");
    }

    #[test]
    fn test_expressions() {
        assert_eq!(
            expr(&Expr::cast("System.Int64", Expr::var("n"))),
            "((long)(n))"
        );
        assert_eq!(
            expr(&Expr::binary(Expr::var("a"), BinaryOperator::BooleanAnd, Expr::var("b"))),
            "(a && b)"
        );
        assert_eq!(
            expr(&Expr::call(Some(Expr::This), "Run", vec![Expr::int(1), Expr::string("x")])),
            "this.Run(1, \"x\")"
        );
        assert_eq!(
            expr(&Expr::Direction {
                direction: Direction::Out,
                expr: Box::new(Expr::var("result")),
            }),
            "out result"
        );
        assert_eq!(
            expr(&Expr::ArrayCreate {
                element_type: TypeRef::new("System.Int32"),
                size: Some(Box::new(Expr::int(5))),
                initializers: Vec::new(),
            }),
            "new int[5]"
        );
        assert_eq!(expr(&Expr::var("class")), "@class");
        assert_eq!(expr(&Expr::TypeOf(TypeRef::new("System.String"))), "typeof(string)");
    }

    #[test]
    fn test_array_initializers_one_per_line() {
        let declare = Statement::declare(
            TypeRef::array_of(TypeRef::new("System.Int32"), 1),
            "primes",
            Some(Expr::ArrayCreate {
                element_type: TypeRef::new("System.Int32"),
                size: None,
                initializers: vec![Expr::int(2), Expr::int(3), Expr::int(5)],
            }),
        );
        assert_eq!(stmts(&[declare]), "int[] primes = new int[] {\n    2,\n    3,\n    5\n};\n");
    }

    #[test]
    fn test_loops() {
        let while_loop = Statement::while_loop(
            Expr::binary(Expr::var("i"), BinaryOperator::LessThan, Expr::int(3)),
            vec![Statement::expr(Expr::call(None, "Tick", Vec::new()))],
        );
        assert_eq!(stmts(&[while_loop]), "while ((i < 3)) {\n    Tick();\n}\n");

        let for_loop = Statement::for_loop(
            Statement::declare("System.Int32", "i", Some(Expr::int(0))),
            Expr::binary(Expr::var("i"), BinaryOperator::LessThan, Expr::int(10)),
            Statement::assign(
                Expr::var("i"),
                Expr::binary(Expr::var("i"), BinaryOperator::Add, Expr::int(1)),
            ),
            vec![Statement::expr(Expr::call(None, "Tick", vec![Expr::var("i")]))],
        );
        assert_eq!(
            stmts(&[for_loop]),
            "for (int i = 0; (i < 10); i = (i + 1)) {\n    Tick(i);\n}\n"
        );
    }

    #[test]
    fn test_conditions_and_else_on_closing() {
        let statement = Statement::if_else(
            Expr::var("ok"),
            vec![Statement::ret(Some(Expr::int(1)))],
            vec![Statement::ret(Some(Expr::int(0)))],
        );
        assert_eq!(
            stmts(std::slice::from_ref(&statement)),
            "if (ok) {\n    return 1;\n}\nelse {\n    return 0;\n}\n"
        );

        let options = GeneratorOptions::default().with_else_on_closing(true);
        let mut r = Renderer::new(&CSharpBackend, &options);
        r.statement(&statement).unwrap();
        assert_eq!(r.finish(), "if (ok) {\n    return 1;\n} else {\n    return 0;\n}\n");
    }

    #[test]
    fn test_try_catch_finally() {
        let statement = Statement::new(StmtKind::TryCatchFinally {
            try_statements: vec![Statement::expr(Expr::call(None, "Work", Vec::new()))],
            catch_clauses: vec![
                CatchClause::new("System.IO.IOException", "e").with_statements(vec![Statement::throw(None)]),
                CatchClause::catch_all(),
            ],
            finally_statements: vec![Statement::expr(Expr::call(None, "Done", Vec::new()))],
        });
        assert_eq!(
            stmts(&[statement]),
            "try {\n    Work();\n}\ncatch (System.IO.IOException e) {\n    throw;\n}\ncatch {\n}\nfinally {\n    Done();\n}\n"
        );
    }

    #[test]
    fn test_labels_and_line_pragmas() {
        let options = GeneratorOptions::default();
        let mut r = Renderer::new(&CSharpBackend, &options);
        r.indent();
        r.statements(&[
            Statement::new(StmtKind::Labeled {
                label: "retry".into(),
                statement: Some(Box::new(Statement::new(StmtKind::Goto("retry".into())))),
            }),
            Statement::comment("first\nsecond"),
            Statement::expr(Expr::var("x")).with_line_pragma(LinePragma::new("calc.txt", 7)),
        ])
        .unwrap();
        assert_eq!(
            r.finish(),
            "retry:\n    goto retry;\n    // first\n    // second\n    #line 7 \"calc.txt\"\n    x;\n    #line default\n"
        );
    }

    #[test]
    fn test_label_at_top_level_keeps_indent() {
        let options = GeneratorOptions::default();
        let mut r = Renderer::new(&CSharpBackend, &options);
        r.statements(&[
            Statement::new(StmtKind::Labeled {
                label: "top".into(),
                statement: None,
            }),
            Statement::expr(Expr::var("x")),
        ])
        .unwrap();
        assert_eq!(r.finish(), "top:\nx;\n");
    }
}
