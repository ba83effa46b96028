//! Language-independent identifier checks over a whole tree.

use thiserror::Error;

use super::*;

/// An identifier that no backend could emit as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier `{identifier}` at {path}")]
pub struct ValidationError {
    pub identifier: String,
    /// Dotted location of the offending node, e.g. `Acme.Widget.Run`
    pub path: String,
}

/// Non-empty, does not start with a digit, and made only of letters, digits and `_`.
pub fn is_valid_language_independent_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        None => return false,
        Some(first) if first.is_numeric() => return false,
        Some(first) if !is_identifier_char(first) => return false,
        Some(_) => {}
    }
    chars.all(is_identifier_char)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Walk every namespace, type, member, statement and expression of `unit`
/// and report the first identifier that is not language independent.
pub fn validate_identifiers(unit: &CompileUnit) -> Result<(), ValidationError> {
    let mut validator = Validator::default();
    for namespace in &unit.namespaces {
        validator.namespace(namespace)?;
    }
    Ok(())
}

#[derive(Default)]
struct Validator {
    path: Vec<String>,
}

impl Validator {
    fn check(&self, identifier: &str) -> Result<(), ValidationError> {
        if is_valid_language_independent_identifier(identifier) {
            Ok(())
        } else {
            Err(ValidationError {
                identifier: identifier.to_string(),
                path: if self.path.is_empty() {
                    "<global>".to_string()
                } else {
                    self.path.join(".")
                },
            })
        }
    }

    /// Dotted names are checked part by part.
    fn check_dotted(&self, name: &str) -> Result<(), ValidationError> {
        for part in name.split('.') {
            self.check(part)?;
        }
        Ok(())
    }

    fn namespace(&mut self, namespace: &Namespace) -> Result<(), ValidationError> {
        if !namespace.name.is_empty() {
            self.check_dotted(&namespace.name)?;
            self.path.push(namespace.name.clone());
        }
        for import in &namespace.imports {
            self.check_dotted(&import.namespace)?;
        }
        for decl in &namespace.types {
            self.type_decl(decl)?;
        }
        if !namespace.name.is_empty() {
            self.path.pop();
        }
        Ok(())
    }

    fn type_decl(&mut self, decl: &TypeDecl) -> Result<(), ValidationError> {
        self.check(&decl.name)?;
        self.path.push(decl.name.clone());
        for base in &decl.base_types {
            self.type_ref(base)?;
        }
        if let TypeKind::Delegate { return_type, parameters } = &decl.kind {
            if let Some(ty) = return_type {
                self.type_ref(ty)?;
            }
            self.parameters(parameters)?;
        }
        for member in &decl.members {
            self.member(member)?;
        }
        self.path.pop();
        Ok(())
    }

    fn member(&mut self, member: &Member) -> Result<(), ValidationError> {
        match &member.kind {
            MemberKind::Field { ty, init } => {
                self.check(&member.name)?;
                self.type_ref(ty)?;
                if let Some(init) = init {
                    self.expr(init)?;
                }
            }
            MemberKind::Property {
                ty,
                parameters,
                get_statements,
                set_statements,
                private_implementation,
                ..
            } => {
                self.check(&member.name)?;
                self.path.push(member.name.clone());
                self.type_ref(ty)?;
                self.parameters(parameters)?;
                self.statements(get_statements)?;
                self.statements(set_statements)?;
                if let Some(ty) = private_implementation {
                    self.type_ref(ty)?;
                }
                self.path.pop();
            }
            MemberKind::Method {
                return_type,
                parameters,
                statements,
                private_implementation,
                ..
            } => {
                self.check(&member.name)?;
                self.path.push(member.name.clone());
                if let Some(ty) = return_type {
                    self.type_ref(ty)?;
                }
                self.parameters(parameters)?;
                self.statements(statements)?;
                if let Some(ty) = private_implementation {
                    self.type_ref(ty)?;
                }
                self.path.pop();
            }
            MemberKind::Constructor {
                parameters,
                base_args,
                chained_args,
                statements,
            } => {
                self.path.push(".ctor".to_string());
                self.parameters(parameters)?;
                self.exprs(base_args)?;
                self.exprs(chained_args)?;
                self.statements(statements)?;
                self.path.pop();
            }
            MemberKind::TypeConstructor { statements } | MemberKind::EntryPoint { statements } => {
                self.statements(statements)?;
            }
            MemberKind::Event { ty, private_implementation } => {
                self.check(&member.name)?;
                self.type_ref(ty)?;
                if let Some(ty) = private_implementation {
                    self.type_ref(ty)?;
                }
            }
            MemberKind::Snippet(_) => {}
            MemberKind::NestedType(decl) => self.type_decl(decl)?,
        }
        Ok(())
    }

    fn parameters(&self, parameters: &[Parameter]) -> Result<(), ValidationError> {
        for param in parameters {
            self.check(&param.name)?;
            self.type_ref(&param.ty)?;
        }
        Ok(())
    }

    fn type_ref(&self, ty: &TypeRef) -> Result<(), ValidationError> {
        match &ty.element_type {
            Some(element) => self.type_ref(element),
            None => self.check_dotted(&ty.name),
        }
    }

    fn statements(&self, statements: &[Statement]) -> Result<(), ValidationError> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn statement(&self, statement: &Statement) -> Result<(), ValidationError> {
        match &statement.kind {
            StmtKind::Assign { left, right } => {
                self.expr(left)?;
                self.expr(right)
            }
            StmtKind::Expression(expr) => self.expr(expr),
            StmtKind::Condition {
                condition,
                true_statements,
                false_statements,
            } => {
                self.expr(condition)?;
                self.statements(true_statements)?;
                self.statements(false_statements)
            }
            StmtKind::Iteration {
                init,
                test,
                increment,
                body,
            } => {
                if let Some(init) = init {
                    self.statement(init)?;
                }
                if let Some(test) = test {
                    self.expr(test)?;
                }
                if let Some(increment) = increment {
                    self.statement(increment)?;
                }
                self.statements(body)
            }
            StmtKind::TryCatchFinally {
                try_statements,
                catch_clauses,
                finally_statements,
            } => {
                self.statements(try_statements)?;
                for clause in catch_clauses {
                    if let Some(ty) = &clause.exception_type {
                        self.type_ref(ty)?;
                    }
                    if let Some(name) = &clause.local_name {
                        self.check(name)?;
                    }
                    self.statements(&clause.statements)?;
                }
                self.statements(finally_statements)
            }
            StmtKind::Throw(expr) | StmtKind::Return(expr) => match expr {
                Some(expr) => self.expr(expr),
                None => Ok(()),
            },
            StmtKind::Goto(label) => self.check(label),
            StmtKind::Labeled { label, statement } => {
                self.check(label)?;
                match statement {
                    Some(statement) => self.statement(statement),
                    None => Ok(()),
                }
            }
            StmtKind::VariableDecl { ty, name, init } => {
                self.type_ref(ty)?;
                self.check(name)?;
                match init {
                    Some(init) => self.expr(init),
                    None => Ok(()),
                }
            }
            StmtKind::Comment(_) | StmtKind::Snippet(_) => Ok(()),
            StmtKind::AttachEvent { event, listener } | StmtKind::RemoveEvent { event, listener } => {
                self.expr(event)?;
                self.expr(listener)
            }
        }
    }

    fn exprs(&self, exprs: &[Expr]) -> Result<(), ValidationError> {
        for expr in exprs {
            self.expr(expr)?;
        }
        Ok(())
    }

    fn target(&self, target: &Option<Box<Expr>>) -> Result<(), ValidationError> {
        match target {
            Some(target) => self.expr(target),
            None => Ok(()),
        }
    }

    fn expr(&self, expr: &Expr) -> Result<(), ValidationError> {
        match expr {
            Expr::Primitive(_) | Expr::PropertySetValue | Expr::This | Expr::Base | Expr::Snippet(_) => Ok(()),
            Expr::ArgumentRef(name) | Expr::VariableRef(name) => self.check(name),
            Expr::FieldRef { target, name } | Expr::PropertyRef { target, name } | Expr::EventRef { target, name } => {
                self.target(target)?;
                self.check(name)
            }
            Expr::MethodRef(method) => {
                self.target(&method.target)?;
                self.check(&method.name)
            }
            Expr::MethodInvoke { method, args } => {
                self.target(&method.target)?;
                self.check(&method.name)?;
                self.exprs(args)
            }
            Expr::DelegateInvoke { target, args } => {
                self.target(target)?;
                self.exprs(args)
            }
            Expr::DelegateCreate {
                delegate_type,
                target,
                method,
            } => {
                self.type_ref(delegate_type)?;
                self.target(target)?;
                self.check(method)
            }
            Expr::ObjectCreate { ty, args } => {
                self.type_ref(ty)?;
                self.exprs(args)
            }
            Expr::ArrayCreate {
                element_type,
                size,
                initializers,
            } => {
                self.type_ref(element_type)?;
                self.target(size)?;
                self.exprs(initializers)
            }
            Expr::ArrayIndex { target, indices } | Expr::Indexer { target, indices } => {
                self.expr(target)?;
                self.exprs(indices)
            }
            Expr::Cast { ty, expr } => {
                self.type_ref(ty)?;
                self.expr(expr)
            }
            Expr::Binary { left, right, .. } => {
                self.expr(left)?;
                self.expr(right)
            }
            Expr::Direction { expr, .. } => self.expr(expr),
            Expr::TypeOf(ty) | Expr::TypeReference(ty) => self.type_ref(ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_independent_identifiers() {
        assert!(is_valid_language_independent_identifier("count"));
        assert!(is_valid_language_independent_identifier("_hidden2"));
        assert!(is_valid_language_independent_identifier("größe"));
        assert!(!is_valid_language_independent_identifier(""));
        assert!(!is_valid_language_independent_identifier("2fast"));
        assert!(!is_valid_language_independent_identifier("has space"));
        assert!(!is_valid_language_independent_identifier("dash-ed"));
    }

    #[test]
    fn test_valid_tree_passes() {
        let unit = CompileUnit::new().with_namespace(
            Namespace::new("Acme.Tools").with_import("System").with_type(
                TypeDecl::class("Widget")
                    .with_member(Member::field("count", "System.Int32", Some(Expr::int(0))))
                    .with_member(Member::method(
                        "Run",
                        None,
                        vec![Parameter::new("times", "System.Int32")],
                        vec![Statement::declare("System.Int32", "i", Some(Expr::arg("times")))],
                    )),
            ),
        );
        assert_eq!(validate_identifiers(&unit), Ok(()));
    }

    #[test]
    fn test_reports_path_of_bad_local() {
        let unit = CompileUnit::new().with_namespace(
            Namespace::new("Acme").with_type(TypeDecl::class("Widget").with_member(Member::method(
                "Run",
                None,
                Vec::new(),
                vec![Statement::declare("System.Int32", "9lives", None)],
            ))),
        );
        let err = validate_identifiers(&unit).unwrap_err();
        assert_eq!(err.identifier, "9lives");
        assert_eq!(err.path, "Acme.Widget.Run");
    }

    #[test]
    fn test_bad_namespace_part() {
        let unit = CompileUnit::new().with_namespace(Namespace::new("Acme..Tools"));
        let err = validate_identifiers(&unit).unwrap_err();
        assert_eq!(err.identifier, "");
        assert_eq!(err.path, "<global>");
    }
}
