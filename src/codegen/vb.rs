//! Visual Basic backend.
//!
//! Blocks are keyword delimited (`End Class`, `End If`) and lines continue
//! with a trailing ` _`, so this backend drives indentation itself instead
//! of going through the renderer's brace helpers.

use super::backend::{checked_decimal, float_literal, Accessors, ConstructorChain, Feature, LanguageBackend, MethodSignature};
use super::dispatch::Renderer;
use super::error::{RenderError, Result};
use crate::tree::*;

const LANGUAGE: &str = "VB";

/// Compared case-insensitively
const RESERVED_WORDS: &[&str] = &[
    "addhandler", "addressof", "alias", "and", "andalso", "ansi", "as", "assembly", "auto", "boolean", "byref",
    "byte", "byval", "call", "case", "catch", "cbool", "cbyte", "cchar", "cdate", "cdec", "cdbl", "char", "cint",
    "class", "clng", "cobj", "const", "cshort", "csng", "cstr", "ctype", "date", "decimal", "declare", "default",
    "delegate", "dim", "directcast", "do", "double", "each", "else", "elseif", "end", "enum", "erase", "error",
    "event", "exit", "false", "finally", "for", "friend", "function", "get", "gettype", "gosub", "goto", "handles",
    "if", "implements", "imports", "in", "inherits", "integer", "interface", "is", "let", "lib", "like", "long",
    "loop", "me", "mod", "module", "mustinherit", "mustoverride", "mybase", "myclass", "namespace", "new", "next",
    "not", "nothing", "notinheritable", "notoverridable", "object", "on", "option", "optional", "or", "orelse",
    "overloads", "overridable", "overrides", "paramarray", "preserve", "private", "property", "protected", "public",
    "raiseevent", "readonly", "redim", "removehandler", "resume", "return", "select", "set", "shadows", "shared",
    "short", "single", "static", "step", "stop", "string", "structure", "sub", "synclock", "then", "throw", "to",
    "true", "try", "typeof", "unicode", "until", "variant", "when", "while", "with", "withevents", "writeonly",
    "xor",
];

/// Suffixes that declare a variable's type (`count%`, `name$`)
const TYPE_CHARACTERS: &[char] = &['%', '&', '@', '!', '#', '$'];

const STRING_CHUNK: usize = 60;

/// Local name used for a typed catch clause without one
const DEFAULT_CATCH_NAME: &str = "ex";

#[derive(Debug, Clone, Copy, Default)]
pub struct VbBackend;

impl VbBackend {
    fn normalize_type_name(name: &str) -> &str {
        match name {
            "System.Boolean" => "Boolean",
            "System.Char" => "Char",
            "System.Byte" => "Byte",
            "System.SByte" => "SByte",
            "System.Int16" => "Short",
            "System.UInt16" => "UShort",
            "System.Int32" => "Integer",
            "System.UInt32" => "UInteger",
            "System.Int64" => "Long",
            "System.UInt64" => "ULong",
            "System.Single" => "Single",
            "System.Double" => "Double",
            "System.Decimal" => "Decimal",
            "System.String" => "String",
            "System.DateTime" => "Date",
            "System.Object" => "Object",
            other => other,
        }
    }

    /// `name As Type`
    fn name_as_type(&self, r: &mut Renderer<'_>, name: &str, ty: &TypeRef) {
        r.identifier(name);
        r.write(" As ");
        r.type_ref(ty);
    }

    fn member_access_modifier(&self, r: &mut Renderer<'_>, modifiers: &Modifiers) {
        r.write(match modifiers.access {
            Access::Public => "Public ",
            Access::Private => "Private ",
            Access::Protected => "Protected ",
            Access::Internal => "Friend ",
            Access::ProtectedInternal => "Protected Friend ",
        });
    }

    fn member_modifiers(&self, r: &mut Renderer<'_>, modifiers: &Modifiers) {
        if r.ctx.in_interface() {
            if modifiers.new_slot {
                r.write("Shadows ");
            }
            return;
        }
        self.member_access_modifier(r, modifiers);
        if modifiers.new_slot {
            r.write("Shadows ");
        }
        match modifiers.scope {
            Scope::Abstract => r.write("MustOverride "),
            Scope::Static => r.write("Shared "),
            Scope::Override => r.write("Overrides "),
            Scope::Virtual => r.write("Overridable "),
            Scope::Final | Scope::Const => {}
        }
    }

    fn field_modifiers(&self, r: &mut Renderer<'_>, modifiers: &Modifiers) {
        self.member_access_modifier(r, modifiers);
        if modifiers.new_slot {
            r.write("Shadows ");
        }
        match modifiers.scope {
            Scope::Static => r.write("Shared "),
            Scope::Const => r.write("Const "),
            _ => {}
        }
    }

    fn implements_clause(&self, r: &mut Renderer<'_>, private_implementation: Option<&TypeRef>, name: &str) {
        if r.ctx.in_interface() {
            return;
        }
        if let Some(interface) = private_implementation {
            r.write(" Implements ");
            r.type_ref(interface);
            r.write(".");
            r.identifier(name);
        }
    }

    fn has_no_body(&self, r: &Renderer<'_>, modifiers: &Modifiers) -> bool {
        r.ctx.in_interface() || modifiers.is_abstract()
    }

    /// Indented statements followed by the closing keyword line.
    fn body(&self, r: &mut Renderer<'_>, statements: &[Statement], end: &str) -> Result<()> {
        r.indent();
        r.statements(statements)?;
        r.dedent();
        r.writeln(end);
        Ok(())
    }

    fn type_visibility(&self, r: &mut Renderer<'_>, visibility: TypeVisibility) {
        r.write(match visibility {
            TypeVisibility::Public => "Public ",
            TypeVisibility::Private => "Private ",
            TypeVisibility::Internal => "Friend ",
        });
    }

    fn type_list(&self, r: &mut Renderer<'_>, keyword: &str, types: &[TypeRef]) {
        if types.is_empty() {
            return;
        }
        r.write(keyword);
        r.write(" ");
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                r.write(", ");
            }
            r.type_ref(ty);
        }
        r.newline();
    }

    /// Upper bound of an array of `size` elements.
    fn upper_bound(&self, r: &mut Renderer<'_>, size: Option<&Expr>) -> Result<()> {
        match size {
            Some(Expr::Primitive(Literal::Int(n))) => r.write(&n.saturating_sub(1).to_string()),
            Some(size) => {
                r.write("(");
                r.expression(size)?;
                r.write(") - 1");
            }
            None => r.write("-1"),
        }
        Ok(())
    }
}

/// A non-void return type, or None for a `Sub`
fn function_return(return_type: Option<&TypeRef>) -> Option<&TypeRef> {
    return_type.filter(|ty| ty.is_array() || ty.name != "System.Void")
}

fn type_keyword(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Class => "Class",
        TypeKind::Struct => "Structure",
        TypeKind::Interface => "Interface",
        TypeKind::Enum => "Enum",
        TypeKind::Delegate { .. } => "Delegate",
    }
}

fn is_printable(c: char) -> bool {
    (' '..='~').contains(&c)
}

impl LanguageBackend for VbBackend {
    fn name(&self) -> &'static str {
        LANGUAGE
    }

    fn file_extension(&self) -> &'static str {
        "vb"
    }

    fn compiler_language(&self) -> &'static str {
        "vb"
    }

    fn supports(&self, feature: Feature) -> bool {
        !matches!(feature, Feature::ReturnTypeAttributes)
    }

    fn null_token(&self) -> &'static str {
        "Nothing"
    }

    fn is_reserved(&self, word: &str) -> bool {
        RESERVED_WORDS.contains(&word.to_ascii_lowercase().as_str())
    }

    fn escape_identifier(&self, name: &str) -> String {
        if self.is_reserved(name) {
            format!("[{name}]")
        } else {
            name.to_string()
        }
    }

    fn is_valid_identifier(&self, name: &str) -> bool {
        let stem = name.strip_suffix(TYPE_CHARACTERS).unwrap_or(name);
        !stem.is_empty() && !self.is_reserved(stem) && is_valid_language_independent_identifier(stem)
    }

    /// Printable runs are quoted with `""` doubling; everything else becomes
    /// `ChrW(n)` per UTF-16 unit, all joined with `&`.
    fn quote_string(&self, value: &str) -> String {
        if value.is_empty() {
            return "\"\"".to_string();
        }
        // (starts a new line, text)
        let mut pieces: Vec<(bool, String)> = Vec::new();
        let mut run: Option<String> = None;
        let mut line_break = false;
        let mut length = 0;
        let mut chars = value.chars().peekable();
        while let Some(c) = chars.next() {
            if is_printable(c) {
                let text = run.get_or_insert_with(String::new);
                if c == '"' {
                    text.push_str("\"\"");
                    length += 2;
                } else {
                    text.push(c);
                    length += 1;
                }
            } else {
                if let Some(text) = run.take() {
                    pieces.push((std::mem::take(&mut line_break), format!("\"{text}\"")));
                }
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let code = format!("ChrW({unit})");
                    length += code.len();
                    pieces.push((std::mem::take(&mut line_break), code));
                }
            }
            if length >= STRING_CHUNK && chars.peek().is_some() {
                if let Some(text) = run.take() {
                    pieces.push((line_break, format!("\"{text}\"")));
                }
                line_break = true;
                length = 0;
            }
        }
        if let Some(text) = run.take() {
            pieces.push((line_break, format!("\"{text}\"")));
        }

        let mut out = String::new();
        for (i, (starts_line, text)) in pieces.iter().enumerate() {
            if i > 0 {
                out.push_str(if *starts_line { " & _\n" } else { " & " });
            }
            out.push_str(text);
        }
        out
    }

    fn quote_char(&self, value: char) -> Result<String> {
        match value {
            '"' => Ok("\"\"\"\"c".to_string()),
            c if is_printable(c) => Ok(format!("\"{c}\"c")),
            c if (c as u32) <= 0xFFFF => Ok(format!("ChrW({})", c as u32)),
            c => Err(RenderError::InvalidLiteral {
                reason: format!("character U+{:X} does not fit in a Char", c as u32),
                language: LANGUAGE,
            }),
        }
    }

    fn operator_token(&self, op: BinaryOperator) -> Option<&'static str> {
        match op {
            BinaryOperator::Add => Some("+"),
            BinaryOperator::Subtract => Some("-"),
            BinaryOperator::Multiply => Some("*"),
            BinaryOperator::Divide => Some("/"),
            BinaryOperator::Modulus => Some("Mod"),
            BinaryOperator::Assign => None,
            BinaryOperator::IdentityInequality => Some("IsNot"),
            BinaryOperator::IdentityEquality => Some("Is"),
            BinaryOperator::ValueEquality => Some("="),
            BinaryOperator::BitwiseOr => Some("Or"),
            BinaryOperator::BitwiseAnd => Some("And"),
            BinaryOperator::BooleanOr => Some("OrElse"),
            BinaryOperator::BooleanAnd => Some("AndAlso"),
            BinaryOperator::LessThan => Some("<"),
            BinaryOperator::LessThanOrEqual => Some("<="),
            BinaryOperator::GreaterThan => Some(">"),
            BinaryOperator::GreaterThanOrEqual => Some(">="),
        }
    }

    fn type_output(&self, ty: &TypeRef) -> String {
        let mut out = match &ty.element_type {
            Some(element) => self.type_output(element),
            None => Self::normalize_type_name(&ty.name).to_string(),
        };
        if ty.array_rank > 0 {
            out.push('(');
            out.push_str(&",".repeat(ty.array_rank - 1));
            out.push(')');
        }
        out
    }

    fn imports_inside_namespace(&self) -> bool {
        false
    }

    fn comment_prefix(&self, doc: bool) -> &'static str {
        if doc {
            "''' "
        } else {
            "' "
        }
    }

    fn attribute_delimiters(&self) -> (&'static str, &'static str) {
        ("<", ">")
    }

    fn assembly_attribute_prefix(&self) -> &'static str {
        "Assembly: "
    }

    fn continue_on_new_line(&self, r: &mut Renderer<'_>, text: &str) {
        r.write(text);
        r.writeln(" _");
    }

    // Expressions

    fn primitive(&self, r: &mut Renderer<'_>, literal: &Literal) -> Result<()> {
        let text = match literal {
            Literal::Null => self.null_token().to_string(),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::Char(c) => self.quote_char(*c)?,
            Literal::String(s) => self.quote_string(s),
            Literal::Int(i) => i.to_string(),
            Literal::UInt(u) => u.to_string(),
            Literal::Float(f) => float_literal(*f, "Single", "F"),
            Literal::Double(d) => float_literal(*d, "Double", ""),
            Literal::Decimal(d) => format!("{}D", checked_decimal(d, LANGUAGE)?),
        };
        r.write(&text);
        Ok(())
    }

    fn delegate_create(&self, r: &mut Renderer<'_>, delegate_type: &TypeRef, target: Option<&Expr>, method: &str) -> Result<()> {
        r.write("New ");
        r.type_ref(delegate_type);
        r.write("(AddressOf ");
        r.member_access(target, method)?;
        r.write(")");
        Ok(())
    }

    fn object_create(&self, r: &mut Renderer<'_>, ty: &TypeRef, args: &[Expr]) -> Result<()> {
        r.write("New ");
        r.type_ref(ty);
        r.write("(");
        r.expression_list(args, false)?;
        r.write(")");
        Ok(())
    }

    fn array_create(&self, r: &mut Renderer<'_>, element_type: &TypeRef, size: Option<&Expr>, initializers: &[Expr]) -> Result<()> {
        r.write("New ");
        r.type_ref(element_type);
        if initializers.is_empty() {
            r.write("(");
            self.upper_bound(r, size)?;
            r.write(") {}");
        } else {
            r.write("() {");
            r.expression_list(initializers, false)?;
            r.write("}");
        }
        Ok(())
    }

    fn array_index(&self, r: &mut Renderer<'_>, target: &Expr, indices: &[Expr]) -> Result<()> {
        r.expression(target)?;
        r.write("(");
        r.expression_list(indices, false)?;
        r.write(")");
        Ok(())
    }

    fn indexer(&self, r: &mut Renderer<'_>, target: &Expr, indices: &[Expr]) -> Result<()> {
        self.array_index(r, target, indices)
    }

    fn cast(&self, r: &mut Renderer<'_>, ty: &TypeRef, expr: &Expr) -> Result<()> {
        r.write("CType(");
        r.expression(expr)?;
        r.write(", ");
        r.type_ref(ty);
        r.write(")");
        Ok(())
    }

    /// Passing mode is declared on the parameter, not at the call site.
    fn direction(&self, r: &mut Renderer<'_>, _direction: Direction, expr: &Expr) -> Result<()> {
        r.expression(expr)
    }

    fn this_ref(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.write("Me");
        Ok(())
    }

    fn base_ref(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.write("MyBase");
        Ok(())
    }

    fn type_of(&self, r: &mut Renderer<'_>, ty: &TypeRef) -> Result<()> {
        r.write("GetType(");
        r.type_ref(ty);
        r.write(")");
        Ok(())
    }

    // Statements

    fn assign(&self, r: &mut Renderer<'_>, left: &Expr, right: &Expr) -> Result<()> {
        r.expression(left)?;
        r.write(" = ");
        r.expression(right)?;
        r.end_statement("");
        Ok(())
    }

    fn expression_statement(&self, r: &mut Renderer<'_>, expr: &Expr) -> Result<()> {
        r.expression(expr)?;
        r.end_statement("");
        Ok(())
    }

    fn condition(&self, r: &mut Renderer<'_>, condition: &Expr, true_statements: &[Statement], false_statements: &[Statement]) -> Result<()> {
        r.write("If ");
        r.expression(condition)?;
        r.writeln(" Then");
        r.indent();
        r.statements(true_statements)?;
        r.dedent();
        if !false_statements.is_empty() {
            r.writeln("Else");
            r.indent();
            r.statements(false_statements)?;
            r.dedent();
        }
        r.writeln("End If");
        Ok(())
    }

    /// Loops become `While`, with the increment appended to the body.
    fn iteration(
        &self,
        r: &mut Renderer<'_>,
        init: Option<&Statement>,
        test: Option<&Expr>,
        increment: Option<&Statement>,
        body: &[Statement],
    ) -> Result<()> {
        if let Some(init) = init {
            r.statement(init)?;
        }
        r.write("While ");
        match test {
            Some(test) => r.expression(test)?,
            None => r.write("True"),
        }
        r.newline();
        r.indent();
        r.statements(body)?;
        if let Some(increment) = increment {
            r.statement(increment)?;
        }
        r.dedent();
        r.writeln("End While");
        Ok(())
    }

    fn try_catch_finally(
        &self,
        r: &mut Renderer<'_>,
        try_statements: &[Statement],
        catch_clauses: &[CatchClause],
        finally_statements: &[Statement],
    ) -> Result<()> {
        r.writeln("Try");
        r.indent();
        r.statements(try_statements)?;
        r.dedent();
        for clause in catch_clauses {
            r.write("Catch");
            if let Some(ty) = &clause.exception_type {
                r.write(" ");
                let name = clause.local_name.as_deref().unwrap_or(DEFAULT_CATCH_NAME);
                self.name_as_type(r, name, ty);
            }
            r.newline();
            r.indent();
            r.statements(&clause.statements)?;
            r.dedent();
        }
        if !finally_statements.is_empty() {
            r.writeln("Finally");
            r.indent();
            r.statements(finally_statements)?;
            r.dedent();
        }
        r.writeln("End Try");
        Ok(())
    }

    fn throw(&self, r: &mut Renderer<'_>, expr: Option<&Expr>) -> Result<()> {
        r.write("Throw");
        if let Some(expr) = expr {
            r.write(" ");
            r.expression(expr)?;
        }
        r.newline();
        Ok(())
    }

    fn method_return(&self, r: &mut Renderer<'_>, expr: Option<&Expr>) -> Result<()> {
        r.write("Return");
        if let Some(expr) = expr {
            r.write(" ");
            r.expression(expr)?;
        }
        r.newline();
        Ok(())
    }

    fn goto(&self, r: &mut Renderer<'_>, label: &str) -> Result<()> {
        r.write("GoTo ");
        r.writeln(label);
        Ok(())
    }

    fn variable_declaration(&self, r: &mut Renderer<'_>, ty: &TypeRef, name: &str, init: Option<&Expr>) -> Result<()> {
        r.write("Dim ");
        self.name_as_type(r, name, ty);
        if let Some(init) = init {
            r.write(" = ");
            r.expression(init)?;
        }
        r.end_statement("");
        Ok(())
    }

    fn attach_event(&self, r: &mut Renderer<'_>, event: &Expr, listener: &Expr) -> Result<()> {
        r.write("AddHandler ");
        r.expression(event)?;
        r.write(", ");
        r.expression(listener)?;
        r.newline();
        Ok(())
    }

    fn remove_event(&self, r: &mut Renderer<'_>, event: &Expr, listener: &Expr) -> Result<()> {
        r.write("RemoveHandler ");
        r.expression(event)?;
        r.write(", ");
        r.expression(listener)?;
        r.newline();
        Ok(())
    }

    // Declarations

    fn namespace_start(&self, r: &mut Renderer<'_>, namespace: &Namespace) -> Result<()> {
        if !namespace.name.is_empty() {
            r.write("Namespace ");
            r.qualified_identifier(&namespace.name);
            r.newline();
            r.indent();
        }
        Ok(())
    }

    fn namespace_end(&self, r: &mut Renderer<'_>, namespace: &Namespace) -> Result<()> {
        if !namespace.name.is_empty() {
            r.dedent();
            r.writeln("End Namespace");
        }
        Ok(())
    }

    fn import(&self, r: &mut Renderer<'_>, import: &Import) -> Result<()> {
        r.write("Imports ");
        r.qualified_identifier(&import.namespace);
        r.newline();
        Ok(())
    }

    fn type_start(&self, r: &mut Renderer<'_>, decl: &TypeDecl) -> Result<()> {
        r.attribute_line(&decl.attributes, None)?;
        self.type_visibility(r, decl.visibility);
        if decl.is_class() {
            if decl.is_sealed {
                r.write("NotInheritable ");
            }
            if decl.is_abstract {
                r.write("MustInherit ");
            }
        }
        r.write(type_keyword(&decl.kind));
        r.write(" ");
        r.identifier(&decl.name);
        if let (TypeKind::Enum, Some(base)) = (&decl.kind, decl.base_types.first()) {
            r.write(" As ");
            r.type_ref(base);
        }
        r.newline();
        r.indent();
        match decl.kind {
            TypeKind::Class => {
                if let Some((base, interfaces)) = decl.base_types.split_first() {
                    self.type_list(r, "Inherits", std::slice::from_ref(base));
                    self.type_list(r, "Implements", interfaces);
                }
            }
            TypeKind::Struct => self.type_list(r, "Implements", &decl.base_types),
            TypeKind::Interface => self.type_list(r, "Inherits", &decl.base_types),
            TypeKind::Enum | TypeKind::Delegate { .. } => {}
        }
        Ok(())
    }

    fn type_end(&self, r: &mut Renderer<'_>, decl: &TypeDecl) -> Result<()> {
        r.dedent();
        r.write("End ");
        r.writeln(type_keyword(&decl.kind));
        Ok(())
    }

    fn delegate_declaration(&self, r: &mut Renderer<'_>, decl: &TypeDecl, return_type: Option<&TypeRef>, parameters: &[Parameter]) -> Result<()> {
        r.attribute_line(&decl.attributes, None)?;
        self.type_visibility(r, decl.visibility);
        let returns = function_return(return_type);
        r.write(if returns.is_some() { "Delegate Function " } else { "Delegate Sub " });
        r.identifier(&decl.name);
        r.write("(");
        r.parameters(parameters)?;
        r.write(")");
        if let Some(ty) = returns {
            r.write(" As ");
            r.type_ref(ty);
        }
        r.newline();
        Ok(())
    }

    fn field(&self, r: &mut Renderer<'_>, member: &Member, ty: &TypeRef, init: Option<&Expr>) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        if r.ctx.in_enum() {
            r.identifier(&member.name);
        } else {
            self.field_modifiers(r, &member.modifiers);
            self.name_as_type(r, &member.name, ty);
        }
        if let Some(init) = init {
            r.write(" = ");
            r.expression(init)?;
        }
        r.newline();
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
        self.member_modifiers(r, &member.modifiers);
        match (accessors.has_get, accessors.has_set) {
            (true, false) => r.write("ReadOnly "),
            (false, true) => r.write("WriteOnly "),
            _ => {}
        }
        r.write("Property ");
        r.identifier(&member.name);
        if !parameters.is_empty() {
            r.write("(");
            r.parameters(parameters)?;
            r.write(")");
        }
        r.write(" As ");
        r.type_ref(ty);
        self.implements_clause(r, private_implementation, &member.name);
        r.newline();
        if self.has_no_body(r, &member.modifiers) {
            return Ok(());
        }

        r.indent();
        if accessors.has_get {
            r.writeln("Get");
            self.body(r, accessors.get_statements, "End Get")?;
        }
        if accessors.has_set {
            r.write("Set(ByVal value As ");
            r.type_ref(ty);
            r.writeln(")");
            self.body(r, accessors.set_statements, "End Set")?;
        }
        r.dedent();
        r.writeln("End Property");
        Ok(())
    }

    fn method(&self, r: &mut Renderer<'_>, member: &Member, signature: MethodSignature<'_>, statements: &[Statement]) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        self.member_modifiers(r, &member.modifiers);
        let returns = function_return(signature.return_type);
        r.write(if returns.is_some() { "Function " } else { "Sub " });
        r.identifier(&member.name);
        r.write("(");
        r.parameters(signature.parameters)?;
        r.write(")");
        if let Some(ty) = returns {
            r.write(" As ");
            r.type_ref(ty);
        }
        self.implements_clause(r, signature.private_implementation, &member.name);
        r.newline();
        if self.has_no_body(r, &member.modifiers) {
            return Ok(());
        }
        let end = if returns.is_some() { "End Function" } else { "End Sub" };
        self.body(r, statements, end)
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
        r.write("Sub New(");
        r.parameters(parameters)?;
        r.writeln(")");
        r.indent();
        let chained = match chain {
            ConstructorChain::Base(args) => Some(("MyBase.New(", args)),
            ConstructorChain::This(args) => Some(("Me.New(", args)),
            ConstructorChain::None => None,
        };
        if let Some((call, args)) = chained {
            r.write(call);
            r.expression_list(args, false)?;
            r.writeln(")");
        }
        r.statements(statements)?;
        r.dedent();
        r.writeln("End Sub");
        Ok(())
    }

    fn type_constructor(&self, r: &mut Renderer<'_>, member: &Member, statements: &[Statement]) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        r.writeln("Shared Sub New()");
        self.body(r, statements, "End Sub")
    }

    fn entry_point(&self, r: &mut Renderer<'_>, member: &Member, statements: &[Statement]) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        r.writeln("Public Shared Sub Main()");
        self.body(r, statements, "End Sub")
    }

    fn event(&self, r: &mut Renderer<'_>, member: &Member, ty: &TypeRef, private_implementation: Option<&TypeRef>) -> Result<()> {
        r.attribute_line(&member.attributes, None)?;
        self.member_modifiers(r, &member.modifiers);
        r.write("Event ");
        self.name_as_type(r, &member.name, ty);
        self.implements_clause(r, private_implementation, &member.name);
        r.newline();
        Ok(())
    }

    fn parameter(&self, r: &mut Renderer<'_>, parameter: &Parameter) -> Result<()> {
        if !parameter.attributes.is_empty() {
            r.attributes(&parameter.attributes, None)?;
            r.write(" ");
        }
        r.write(match parameter.direction {
            Direction::In => "ByVal ",
            Direction::Out | Direction::Ref => "ByRef ",
        });
        self.name_as_type(r, &parameter.name, &parameter.ty);
        Ok(())
    }

    fn line_pragma_start(&self, r: &mut Renderer<'_>, pragma: &LinePragma) -> Result<()> {
        if !r.at_line_start() {
            r.newline();
        }
        r.writeln(&format!("#ExternalSource(\"{}\",{})", pragma.file_name, pragma.line_number));
        Ok(())
    }

    fn line_pragma_end(&self, r: &mut Renderer<'_>, _pragma: &LinePragma) -> Result<()> {
        if !r.at_line_start() {
            r.newline();
        }
        r.writeln("#End ExternalSource");
        Ok(())
    }
}
