//! Tree dispatch: one rendering pass over a tree.
//!
//! [`Renderer`] owns the output sink and the render context for a single
//! pass, matches each node to its backend operation and provides the list,
//! ordering and location-marker helpers every backend shares.

use super::backend::{Accessors, ConstructorChain, Feature, LanguageBackend, MethodSignature};
use super::context::RenderContext;
use super::error::{RenderError, Result};
use super::options::{BracingStyle, GeneratorOptions};
use super::writer::IndentedWriter;
use crate::tree::*;

pub struct Renderer<'a> {
    backend: &'a dyn LanguageBackend,
    options: &'a GeneratorOptions,
    out: IndentedWriter,
    pub ctx: RenderContext,
}

impl<'a> Renderer<'a> {
    pub fn new(backend: &'a dyn LanguageBackend, options: &'a GeneratorOptions) -> Self {
        Self {
            backend,
            options,
            out: IndentedWriter::new(options.indent.clone()),
            ctx: RenderContext::new(),
        }
    }

    pub fn backend(&self) -> &'a dyn LanguageBackend {
        self.backend
    }

    pub fn options(&self) -> &'a GeneratorOptions {
        self.options
    }

    pub fn finish(self) -> String {
        self.out.into_string()
    }

    /// Render any node.
    pub fn render(&mut self, node: Node<'_>) -> Result<()> {
        match node {
            Node::CompileUnit(unit) => self.compile_unit(unit),
            Node::Namespace(namespace) => self.namespace(namespace),
            Node::Import(import) => self.import(import),
            Node::Type(decl) => self.type_decl(decl),
            Node::Member(member) => self.member(member),
            Node::Statement(statement) => self.statement(statement),
            Node::Expression(expr) => self.expression(expr),
        }
    }

    // Output

    pub fn write(&mut self, s: &str) {
        self.out.write(s);
    }

    pub fn writeln(&mut self, s: &str) {
        self.out.writeln(s);
    }

    pub fn newline(&mut self) {
        self.out.newline();
    }

    pub fn indent(&mut self) {
        self.out.indent();
    }

    pub fn dedent(&mut self) {
        self.out.dedent();
    }

    pub fn at_line_start(&self) -> bool {
        self.out.at_line_start()
    }

    pub fn indent_level(&self) -> usize {
        self.out.indent_level()
    }

    pub fn set_indent_level(&mut self, level: usize) {
        self.out.set_indent_level(level);
    }

    /// Write `name`, escaped if it is a reserved word.
    pub fn identifier(&mut self, name: &str) {
        let escaped = self.backend.escape_identifier(name);
        self.out.write(&escaped);
    }

    /// Write a dotted name, escaping each part.
    pub fn qualified_identifier(&mut self, name: &str) {
        for (i, part) in name.split('.').enumerate() {
            if i > 0 {
                self.out.write(".");
            }
            self.identifier(part);
        }
    }

    pub fn type_ref(&mut self, ty: &TypeRef) {
        let text = self.backend.type_output(ty);
        self.out.write(&text);
    }

    /// `target.name`, or just `name` without a target
    pub fn member_access(&mut self, target: Option<&Expr>, name: &str) -> Result<()> {
        if let Some(target) = target {
            self.expression(target)?;
            self.write(".");
        }
        self.identifier(name);
        Ok(())
    }

    /// Open a brace-delimited block according to the bracing style.
    pub fn open_block(&mut self) {
        match self.options.bracing {
            BracingStyle::Block => self.writeln(" {"),
            BracingStyle::C => {
                self.newline();
                self.writeln("{");
            }
        }
        self.indent();
    }

    pub fn close_block(&mut self) {
        self.dedent();
        self.writeln("}");
    }

    /// Finish a statement with `terminator`, unless inside a loop header.
    pub fn end_statement(&mut self, terminator: &str) {
        if !self.ctx.suppress_terminator {
            self.writeln(terminator);
        }
    }

    // Errors

    pub fn unsupported(&self, construct: impl Into<String>) -> RenderError {
        RenderError::Unsupported {
            construct: construct.into(),
            language: self.backend.name(),
            member: self.ctx.current_member().map(str::to_string),
        }
    }

    pub fn require(&self, feature: Feature) -> Result<()> {
        if self.backend.supports(feature) {
            Ok(())
        } else {
            Err(self.unsupported(feature.to_string()))
        }
    }

    pub fn operator(&self, op: BinaryOperator) -> Result<&'static str> {
        self.backend.operator_token(op).ok_or(RenderError::UnmappedOperator {
            operator: op,
            language: self.backend.name(),
        })
    }

    // Expressions

    pub fn expression(&mut self, expr: &Expr) -> Result<()> {
        let b = self.backend;
        match expr {
            Expr::Primitive(literal) => b.primitive(self, literal),
            Expr::ArgumentRef(name) => b.argument_ref(self, name),
            Expr::VariableRef(name) => b.variable_ref(self, name),
            Expr::FieldRef { target, name } => b.field_ref(self, target.as_deref(), name),
            Expr::PropertyRef { target, name } => b.property_ref(self, target.as_deref(), name),
            Expr::PropertySetValue => b.property_set_value(self),
            Expr::EventRef { target, name } => b.event_ref(self, target.as_deref(), name),
            Expr::MethodRef(method) => b.method_ref(self, method),
            Expr::MethodInvoke { method, args } => b.method_invoke(self, method, args),
            Expr::DelegateInvoke { target, args } => b.delegate_invoke(self, target.as_deref(), args),
            Expr::DelegateCreate {
                delegate_type,
                target,
                method,
            } => b.delegate_create(self, delegate_type, target.as_deref(), method),
            Expr::ObjectCreate { ty, args } => b.object_create(self, ty, args),
            Expr::ArrayCreate {
                element_type,
                size,
                initializers,
            } => b.array_create(self, element_type, size.as_deref(), initializers),
            Expr::ArrayIndex { target, indices } => b.array_index(self, target, indices),
            Expr::Indexer { target, indices } => b.indexer(self, target, indices),
            Expr::Cast { ty, expr } => b.cast(self, ty, expr),
            Expr::Binary { left, op, right } => b.binary(self, left, *op, right),
            Expr::Direction { direction, expr } => b.direction(self, *direction, expr),
            Expr::This => b.this_ref(self),
            Expr::Base => b.base_ref(self),
            Expr::TypeOf(ty) => b.type_of(self, ty),
            Expr::TypeReference(ty) => b.type_reference(self, ty),
            Expr::Snippet(text) => b.snippet_expression(self, text),
        }
    }

    /// Render `exprs` one level indented, separated by `, ` or one per line.
    pub fn expression_list(&mut self, exprs: &[Expr], newline_between: bool) -> Result<()> {
        let b = self.backend;
        self.indent();
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                if newline_between {
                    b.continue_on_new_line(self, ",");
                } else {
                    self.write(", ");
                }
            }
            self.expression(expr)?;
        }
        self.dedent();
        Ok(())
    }

    // Statements

    pub fn statement(&mut self, statement: &Statement) -> Result<()> {
        let b = self.backend;
        if let Some(pragma) = &statement.line_pragma {
            b.line_pragma_start(self, pragma)?;
        }
        match &statement.kind {
            StmtKind::Assign { left, right } => b.assign(self, left, right)?,
            StmtKind::Expression(expr) => b.expression_statement(self, expr)?,
            StmtKind::Condition {
                condition,
                true_statements,
                false_statements,
            } => b.condition(self, condition, true_statements, false_statements)?,
            StmtKind::Iteration {
                init,
                test,
                increment,
                body,
            } => b.iteration(self, init.as_deref(), test.as_ref(), increment.as_deref(), body)?,
            StmtKind::TryCatchFinally {
                try_statements,
                catch_clauses,
                finally_statements,
            } => {
                self.require(Feature::TryCatchStatements)?;
                b.try_catch_finally(self, try_statements, catch_clauses, finally_statements)?
            }
            StmtKind::Throw(expr) => b.throw(self, expr.as_ref())?,
            StmtKind::Return(expr) => b.method_return(self, expr.as_ref())?,
            StmtKind::Goto(label) => {
                self.require(Feature::GotoStatements)?;
                b.goto(self, label)?
            }
            StmtKind::Labeled { label, statement } => b.labeled(self, label, statement.as_deref())?,
            StmtKind::VariableDecl { ty, name, init } => b.variable_declaration(self, ty, name, init.as_ref())?,
            StmtKind::Comment(comment) => self.comment(comment),
            StmtKind::Snippet(text) => b.snippet_statement(self, text)?,
            StmtKind::AttachEvent { event, listener } => b.attach_event(self, event, listener)?,
            StmtKind::RemoveEvent { event, listener } => b.remove_event(self, event, listener)?,
        }
        if let Some(pragma) = &statement.line_pragma {
            b.line_pragma_end(self, pragma)?;
        }
        Ok(())
    }

    pub fn statements(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    /// Render a statement inside a loop header, without its terminator.
    pub fn header_statement(&mut self, statement: &Statement) -> Result<()> {
        let saved = std::mem::replace(&mut self.ctx.suppress_terminator, true);
        let result = self.statement(statement);
        self.ctx.suppress_terminator = saved;
        result
    }

    pub fn comment(&mut self, comment: &Comment) {
        let prefix = self.backend.comment_prefix(comment.doc);
        for line in super::backend::comment_lines(&comment.text) {
            self.write(prefix);
            self.writeln(line);
        }
    }

    pub fn comments(&mut self, comments: &[Comment]) {
        for comment in comments {
            self.comment(comment);
        }
    }

    // Attributes and parameters

    /// Render an attribute list with the backend's delimiters, each entry
    /// optionally prefixed (e.g. `return: `). Writes nothing for an empty list.
    pub fn attributes(&mut self, attributes: &[AttributeDecl], prefix: Option<&str>) -> Result<()> {
        if attributes.is_empty() {
            return Ok(());
        }
        let b = self.backend;
        let (open, close) = b.attribute_delimiters();
        self.write(open);
        for (i, attribute) in attributes.iter().enumerate() {
            if i > 0 {
                b.continue_on_new_line(self, ",");
            }
            if let Some(prefix) = prefix {
                self.write(prefix);
            }
            self.write(&attribute.name);
            if !attribute.arguments.is_empty() {
                self.write("(");
                for (j, arg) in attribute.arguments.iter().enumerate() {
                    if j > 0 {
                        self.write(", ");
                    }
                    if let Some(name) = &arg.name {
                        self.identifier(name);
                        self.write("=");
                    }
                    self.expression(&arg.value)?;
                }
                self.write(")");
            }
        }
        self.write(close);
        Ok(())
    }

    /// Attribute list on its own line ahead of a declaration.
    pub fn attribute_line(&mut self, attributes: &[AttributeDecl], prefix: Option<&str>) -> Result<()> {
        if attributes.is_empty() {
            return Ok(());
        }
        let b = self.backend;
        self.attributes(attributes, prefix)?;
        b.continue_on_new_line(self, "");
        Ok(())
    }

    /// Comma-separated parameters, one per line once the wrap threshold is reached.
    pub fn parameters(&mut self, parameters: &[Parameter]) -> Result<()> {
        let b = self.backend;
        let wrap = parameters.len() >= self.options.parameter_wrap_threshold;
        if wrap {
            self.indent();
        }
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                if wrap {
                    b.continue_on_new_line(self, ",");
                } else {
                    self.write(", ");
                }
            }
            b.parameter(self, parameter)?;
        }
        if wrap {
            self.dedent();
        }
        Ok(())
    }

    // Declarations

    pub fn compile_unit(&mut self, unit: &CompileUnit) -> Result<()> {
        if let Some(snippet) = &unit.snippet {
            return self.snippet_unit(snippet);
        }
        let prefix = self.backend.assembly_attribute_prefix();
        for attribute in &unit.assembly_attributes {
            self.attributes(std::slice::from_ref(attribute), Some(prefix))?;
            self.newline();
        }
        let mut first = unit.assembly_attributes.is_empty();
        for namespace in &unit.namespaces {
            if !first && self.options.blank_lines_between_members {
                self.newline();
            }
            first = false;
            self.namespace(namespace)?;
        }
        Ok(())
    }

    fn snippet_unit(&mut self, snippet: &Snippet) -> Result<()> {
        let b = self.backend;
        if let Some(pragma) = &snippet.line_pragma {
            b.line_pragma_start(self, pragma)?;
        }
        self.write(&snippet.text);
        if !self.at_line_start() {
            self.newline();
        }
        if let Some(pragma) = &snippet.line_pragma {
            b.line_pragma_end(self, pragma)?;
        }
        Ok(())
    }

    pub fn namespace(&mut self, namespace: &Namespace) -> Result<()> {
        let b = self.backend;
        self.comments(&namespace.comments);
        if b.imports_inside_namespace() {
            b.namespace_start(self, namespace)?;
            self.imports(namespace)?;
            self.types(&namespace.types)?;
        } else {
            self.imports(namespace)?;
            b.namespace_start(self, namespace)?;
            self.types(&namespace.types)?;
        }
        b.namespace_end(self, namespace)
    }

    fn imports(&mut self, namespace: &Namespace) -> Result<()> {
        for import in &namespace.imports {
            self.import(import)?;
        }
        if !namespace.imports.is_empty() && !namespace.types.is_empty() {
            self.newline();
        }
        Ok(())
    }

    pub fn import(&mut self, import: &Import) -> Result<()> {
        let b = self.backend;
        if let Some(pragma) = &import.line_pragma {
            b.line_pragma_start(self, pragma)?;
        }
        b.import(self, import)?;
        if let Some(pragma) = &import.line_pragma {
            b.line_pragma_end(self, pragma)?;
        }
        Ok(())
    }

    fn types(&mut self, types: &[TypeDecl]) -> Result<()> {
        for (i, decl) in types.iter().enumerate() {
            if i > 0 && self.options.blank_lines_between_members {
                self.newline();
            }
            self.type_decl(decl)?;
        }
        Ok(())
    }

    pub fn type_decl(&mut self, decl: &TypeDecl) -> Result<()> {
        match &decl.kind {
            TypeKind::Struct => self.require(Feature::DeclareValueTypes)?,
            TypeKind::Interface => self.require(Feature::DeclareInterfaces)?,
            TypeKind::Enum => self.require(Feature::DeclareEnums)?,
            TypeKind::Delegate { .. } => self.require(Feature::DeclareDelegates)?,
            TypeKind::Class => {}
        }
        let outer = self.ctx.enter_type(decl);
        let result = self.type_body(decl);
        self.ctx.leave_type(outer);
        result
    }

    fn type_body(&mut self, decl: &TypeDecl) -> Result<()> {
        let b = self.backend;
        self.comments(&decl.comments);
        if let TypeKind::Delegate {
            return_type,
            parameters,
        } = &decl.kind
        {
            return b.delegate_declaration(self, decl, return_type.as_ref(), parameters);
        }
        b.type_start(self, decl)?;
        let mut first = true;
        for member in ordered_members(&decl.members) {
            if !member_allowed(&decl.kind, &member.kind) {
                continue;
            }
            if !first && self.options.blank_lines_between_members {
                self.newline();
            }
            first = false;
            self.member(member)?;
        }
        b.type_end(self, decl)
    }

    pub fn member(&mut self, member: &Member) -> Result<()> {
        let b = self.backend;
        if let MemberKind::NestedType(decl) = &member.kind {
            self.require(Feature::NestedTypes)?;
            return self.type_decl(decl);
        }

        let outer = self.ctx.enter_member(&member.name);
        self.comments(&member.comments);
        if let Some(pragma) = &member.line_pragma {
            b.line_pragma_start(self, pragma)?;
        }
        match &member.kind {
            MemberKind::Field { ty, init } => b.field(self, member, ty, init.as_ref())?,
            MemberKind::Property {
                ty,
                parameters,
                has_get,
                has_set,
                get_statements,
                set_statements,
                private_implementation,
            } => {
                let accessors = Accessors {
                    has_get: *has_get,
                    has_set: *has_set,
                    get_statements,
                    set_statements,
                };
                b.property(self, member, ty, parameters, accessors, private_implementation.as_ref())?
            }
            MemberKind::Method {
                return_type,
                parameters,
                statements,
                return_attributes,
                private_implementation,
            } => {
                if !return_attributes.is_empty() {
                    self.require(Feature::ReturnTypeAttributes)?;
                }
                let signature = MethodSignature {
                    return_type: return_type.as_ref(),
                    parameters,
                    return_attributes,
                    private_implementation: private_implementation.as_ref(),
                };
                b.method(self, member, signature, statements)?
            }
            MemberKind::Constructor {
                parameters,
                base_args,
                chained_args,
                statements,
            } => {
                let chain = ConstructorChain::from_args(base_args, chained_args);
                if matches!(chain, ConstructorChain::This(_)) {
                    self.require(Feature::ChainedConstructorArguments)?;
                }
                b.constructor(self, member, parameters, chain, statements)?
            }
            MemberKind::TypeConstructor { statements } => {
                self.require(Feature::StaticConstructors)?;
                b.type_constructor(self, member, statements)?
            }
            MemberKind::EntryPoint { statements } => {
                self.require(Feature::EntryPointMethod)?;
                b.entry_point(self, member, statements)?
            }
            MemberKind::Event {
                ty,
                private_implementation,
            } => {
                self.require(Feature::DeclareEvents)?;
                b.event(self, member, ty, private_implementation.as_ref())?
            }
            MemberKind::Snippet(text) => b.snippet_member(self, text)?,
            MemberKind::NestedType(_) => {}
        }
        if let Some(pragma) = &member.line_pragma {
            b.line_pragma_end(self, pragma)?;
        }
        self.ctx.leave_member(outer);
        Ok(())
    }
}

/// Members in rendering order: fields, snippets, static constructors,
/// constructors, properties, events, methods and entry points, nested types.
/// Declaration order is kept within each group.
pub fn ordered_members(members: &[Member]) -> Vec<&Member> {
    let mut ordered: Vec<&Member> = members.iter().collect();
    ordered.sort_by_key(|member| member_rank(&member.kind));
    ordered
}

fn member_rank(kind: &MemberKind) -> u8 {
    match kind {
        MemberKind::Field { .. } => 0,
        MemberKind::Snippet(_) => 1,
        MemberKind::TypeConstructor { .. } => 2,
        MemberKind::Constructor { .. } => 3,
        MemberKind::Property { .. } => 4,
        MemberKind::Event { .. } => 5,
        MemberKind::Method { .. } | MemberKind::EntryPoint { .. } => 6,
        MemberKind::NestedType(_) => 7,
    }
}

/// Member kinds each kind of type can hold. Others are skipped.
fn member_allowed(owner: &TypeKind, member: &MemberKind) -> bool {
    let class_like = matches!(owner, TypeKind::Class | TypeKind::Struct);
    match member {
        MemberKind::Field { .. } => class_like || matches!(owner, TypeKind::Enum),
        MemberKind::Property { .. } | MemberKind::Method { .. } | MemberKind::Event { .. } => {
            class_like || matches!(owner, TypeKind::Interface)
        }
        MemberKind::Constructor { .. }
        | MemberKind::TypeConstructor { .. }
        | MemberKind::EntryPoint { .. }
        | MemberKind::NestedType(_) => class_like,
        MemberKind::Snippet(_) => true,
    }
}
