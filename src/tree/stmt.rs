//! Statement nodes.

use serde::{Deserialize, Serialize};

use super::{Comment, Expr, LinePragma, TypeRef};

/// A statement, optionally mapped back to an original source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StmtKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_pragma: Option<LinePragma>,
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    Assign {
        left: Expr,
        right: Expr,
    },
    Expression(Expr),
    Condition {
        condition: Expr,
        #[serde(default)]
        true_statements: Vec<Statement>,
        #[serde(default)]
        false_statements: Vec<Statement>,
    },
    /// `for`/`while` loop. With only a test expression this is a plain while loop.
    Iteration {
        #[serde(default)]
        init: Option<Box<Statement>>,
        #[serde(default)]
        test: Option<Expr>,
        #[serde(default)]
        increment: Option<Box<Statement>>,
        #[serde(default)]
        body: Vec<Statement>,
    },
    TryCatchFinally {
        #[serde(default)]
        try_statements: Vec<Statement>,
        #[serde(default)]
        catch_clauses: Vec<CatchClause>,
        #[serde(default)]
        finally_statements: Vec<Statement>,
    },
    /// `throw expr;`, or a rethrow when empty
    Throw(Option<Expr>),
    Return(Option<Expr>),
    Goto(String),
    Labeled {
        label: String,
        #[serde(default)]
        statement: Option<Box<Statement>>,
    },
    VariableDecl {
        #[serde(rename = "type")]
        ty: TypeRef,
        name: String,
        #[serde(default)]
        init: Option<Expr>,
    },
    Comment(Comment),
    Snippet(String),
    AttachEvent {
        event: Expr,
        listener: Expr,
    },
    RemoveEvent {
        event: Expr,
        listener: Expr,
    },
}

/// One `catch` arm of a try statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// Caught exception type; `None` catches everything
    #[serde(default)]
    pub exception_type: Option<TypeRef>,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl CatchClause {
    pub fn new(exception_type: impl Into<TypeRef>, local_name: impl Into<String>) -> Self {
        Self {
            exception_type: Some(exception_type.into()),
            local_name: Some(local_name.into()),
            statements: Vec::new(),
        }
    }

    pub fn catch_all() -> Self {
        Self {
            exception_type: None,
            local_name: None,
            statements: Vec::new(),
        }
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }
}

impl Statement {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            line_pragma: None,
        }
    }

    pub fn with_line_pragma(mut self, pragma: LinePragma) -> Self {
        self.line_pragma = Some(pragma);
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expression(expr))
    }

    pub fn assign(left: Expr, right: Expr) -> Self {
        Self::new(StmtKind::Assign { left, right })
    }

    pub fn declare(ty: impl Into<TypeRef>, name: impl Into<String>, init: Option<Expr>) -> Self {
        Self::new(StmtKind::VariableDecl {
            ty: ty.into(),
            name: name.into(),
            init,
        })
    }

    pub fn ret(expr: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(expr))
    }

    pub fn throw(expr: Option<Expr>) -> Self {
        Self::new(StmtKind::Throw(expr))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(StmtKind::Comment(Comment::new(text)))
    }

    pub fn if_else(condition: Expr, true_statements: Vec<Statement>, false_statements: Vec<Statement>) -> Self {
        Self::new(StmtKind::Condition {
            condition,
            true_statements,
            false_statements,
        })
    }

    pub fn while_loop(test: Expr, body: Vec<Statement>) -> Self {
        Self::new(StmtKind::Iteration {
            init: None,
            test: Some(test),
            increment: None,
            body,
        })
    }

    pub fn for_loop(init: Statement, test: Expr, increment: Statement, body: Vec<Statement>) -> Self {
        Self::new(StmtKind::Iteration {
            init: Some(Box::new(init)),
            test: Some(test),
            increment: Some(Box::new(increment)),
            body,
        })
    }
}

impl From<StmtKind> for Statement {
    fn from(kind: StmtKind) -> Self {
        Statement::new(kind)
    }
}
