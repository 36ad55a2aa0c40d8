use crate::scanner::token::Token;
use std::fmt;
use std::rc::Rc;

/// Root of every parse. A program is an ordered list of statements.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|s| s.token_literal())
            .unwrap_or("")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

/// Every node keeps the token that introduced it; `token_literal` is the
/// raw text behind that token, used in diagnostics and tests.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub token: Token,
}

impl Stmt {
    pub fn token_literal(&self) -> &str {
        &self.token.lexeme
    }
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Let { name: Ident, value: Expr },
    Return(Expr),
    Expr(Expr),
    For { variable: Ident, iterable: Expr, body: Block },
}

#[derive(Debug, Clone)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
}

impl Expr {
    pub fn token_literal(&self) -> &str {
        &self.token.lexeme
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Identifier(String),
    Int(i64),
    Str(String),
    Bool(bool),
    Array(Vec<Expr>),
    Prefix {
        operator: String,
        right: Box<Expr>,
    },
    Infix {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        parameters: Vec<Ident>,
        body: Rc<Block>,
    },
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

// The Display impls reconstruct source text. Operator expressions are fully
// parenthesized so the output encodes the parsed structure, and every form
// re-parses to an equivalent tree.

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            StmtKind::Let { name, value } => write!(f, "let {} = {};", name, value),
            StmtKind::Return(value) => write!(f, "return {};", value),
            StmtKind::Expr(expression) => write!(f, "{}", expression),
            StmtKind::For {
                variable,
                iterable,
                body,
            } => write!(f, "for ({} : {}) {}", variable, iterable, body),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{ ")?;
        for statement in &self.statements {
            write!(f, "{} ", statement)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::Int(value) => write!(f, "{}", value),
            // No escape sequences exist, so quoting the raw text round-trips.
            ExprKind::Str(value) => write!(f, "\"{}\"", value),
            ExprKind::Bool(value) => write!(f, "{}", value),
            ExprKind::Array(elements) => {
                write!(f, "[{}]", join(elements))
            }
            ExprKind::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            ExprKind::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            ExprKind::Function { parameters, body } => {
                let parameters: Vec<String> =
                    parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "func({}) {}", parameters.join(", "), body)
            }
            ExprKind::Call {
                function,
                arguments,
            } => write!(f, "{}({})", function, join(arguments)),
            ExprKind::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}

fn join(expressions: &[Expr]) -> String {
    expressions
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
