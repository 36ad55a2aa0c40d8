pub mod ast;

use crate::parser::ast::{Block, Expr, ExprKind, Ident, Program, Stmt, StmtKind};
use crate::scanner::token::{Token, TokenType};
use crate::scanner::Scanner;
use std::mem;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Binding strength of an infix position. The variants are ordered weakest
/// to strongest; the derived `Ord` is what the expression loop compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // foo(x) foo[x]
}

fn precedence_of(token_type: TokenType) -> Precedence {
    match token_type {
        TokenType::Equal | TokenType::NotEqual => Precedence::Equals,
        TokenType::Less | TokenType::Greater => Precedence::LessGreater,
        TokenType::Plus | TokenType::Minus => Precedence::Sum,
        TokenType::Slash | TokenType::Star => Precedence::Product,
        TokenType::LeftParen | TokenType::LeftBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Pratt parser over the scanner's token stream. Holds the current and the
/// peeked token; each token kind dispatches to a prefix production and,
/// when it appears after a complete expression, an infix production.
pub struct Parser {
    scanner: Scanner,
    current_token: Token,
    peek_token: Token,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut scanner: Scanner) -> Self {
        let current_token = scanner.next_token();
        let peek_token = scanner.next_token();
        Self {
            scanner,
            current_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();

        while !self.current_is(TokenType::Eof) {
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.advance();
        }

        if self.errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(self.errors)
        }
    }

    // utility methods

    fn advance(&mut self) {
        let next = self.scanner.next_token();
        self.current_token = mem::replace(&mut self.peek_token, next);
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current_token.token_type == token_type
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek_token.token_type == token_type
    }

    fn expect_peek(&mut self, expected: TokenType) -> Result<(), ParseError> {
        if self.peek_is(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                line: self.peek_token.line,
                message: format!(
                    "expected next token to be {}, got {} instead",
                    expected, self.peek_token.token_type
                ),
            })
        }
    }

    /// Skip to the next statement boundary after a failed production, so
    /// one mistake does not cascade into a wall of follow-on errors.
    fn synchronize(&mut self) {
        while !self.current_is(TokenType::Eof) {
            if self.current_is(TokenType::Semicolon) {
                return;
            }
            match self.peek_token.token_type {
                TokenType::Let | TokenType::Return | TokenType::For => return,
                _ => {}
            }
            self.advance();
        }
    }

    // statements

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current_token.token_type {
            TokenType::Let => self.let_statement(),
            TokenType::Return => self.return_statement(),
            TokenType::For => self.for_statement(),
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.current_token.clone();

        self.expect_peek(TokenType::Identifier)?;
        let name = Ident {
            token: self.current_token.clone(),
            name: self.current_token.lexeme.clone(),
        };

        self.expect_peek(TokenType::Assign)?;
        self.advance();
        let value = self.expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Ok(Stmt {
            kind: StmtKind::Let { name, value },
            token,
        })
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.current_token.clone();

        self.advance();
        let value = self.expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Ok(Stmt {
            kind: StmtKind::Return(value),
            token,
        })
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.current_token.clone();

        self.expect_peek(TokenType::LeftParen)?;
        self.expect_peek(TokenType::Identifier)?;
        let variable = Ident {
            token: self.current_token.clone(),
            name: self.current_token.lexeme.clone(),
        };

        self.expect_peek(TokenType::Colon)?;
        self.advance();
        let iterable = self.expression(Precedence::Lowest)?;

        self.expect_peek(TokenType::RightParen)?;
        self.expect_peek(TokenType::LeftBrace)?;
        let body = self.block()?;

        Ok(Stmt {
            kind: StmtKind::For {
                variable,
                iterable,
                body,
            },
            token,
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.current_token.clone();
        let expression = self.expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Ok(Stmt {
            kind: StmtKind::Expr(expression),
            token,
        })
    }

    // expressions

    fn expression(&mut self, precedence: Precedence) -> Result<Expr, ParseError> {
        let mut left = self.prefix()?;

        // An equal-precedence peek does not bind, which is what makes the
        // binary operators left-associative.
        while !self.peek_is(TokenType::Semicolon)
            && precedence < precedence_of(self.peek_token.token_type)
        {
            self.advance();
            left = self.infix(left)?;
        }

        Ok(left)
    }

    fn prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();
        match token.token_type {
            TokenType::Identifier => Ok(Expr {
                kind: ExprKind::Identifier(token.lexeme.clone()),
                token,
            }),
            TokenType::Int => self.integer_literal(),
            TokenType::Str => Ok(Expr {
                kind: ExprKind::Str(token.lexeme.clone()),
                token,
            }),
            TokenType::True => Ok(Expr {
                kind: ExprKind::Bool(true),
                token,
            }),
            TokenType::False => Ok(Expr {
                kind: ExprKind::Bool(false),
                token,
            }),
            TokenType::Bang | TokenType::Minus => self.prefix_expression(),
            TokenType::LeftParen => self.grouped_expression(),
            TokenType::If => self.if_expression(),
            TokenType::Function => self.function_literal(),
            TokenType::LeftBracket => self.array_literal(),
            other => Err(ParseError {
                line: token.line,
                message: format!("no prefix parse function for {} found", other),
            }),
        }
    }

    fn infix(&mut self, left: Expr) -> Result<Expr, ParseError> {
        match self.current_token.token_type {
            TokenType::LeftParen => self.call_expression(left),
            TokenType::LeftBracket => self.index_expression(left),
            _ => self.infix_expression(left),
        }
    }

    fn integer_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();
        let value: i64 = token.lexeme.parse().map_err(|_| ParseError {
            line: token.line,
            message: format!("could not parse \"{}\" as integer", token.lexeme),
        })?;

        Ok(Expr {
            kind: ExprKind::Int(value),
            token,
        })
    }

    fn prefix_expression(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();
        let operator = token.lexeme.clone();

        self.advance();
        let right = self.expression(Precedence::Prefix)?;

        Ok(Expr {
            kind: ExprKind::Prefix {
                operator,
                right: Box::new(right),
            },
            token,
        })
    }

    fn infix_expression(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();
        let operator = token.lexeme.clone();
        let precedence = precedence_of(token.token_type);

        self.advance();
        let right = self.expression(precedence)?;

        Ok(Expr {
            kind: ExprKind::Infix {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            token,
        })
    }

    fn grouped_expression(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let expression = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RightParen)?;
        Ok(expression)
    }

    fn if_expression(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();

        self.expect_peek(TokenType::LeftParen)?;
        self.advance();
        let condition = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RightParen)?;

        self.expect_peek(TokenType::LeftBrace)?;
        let consequence = self.block()?;

        let alternative = if self.peek_is(TokenType::Else) {
            self.advance();
            self.expect_peek(TokenType::LeftBrace)?;
            Some(self.block()?)
        } else {
            None
        };

        Ok(Expr {
            kind: ExprKind::If {
                condition: Box::new(condition),
                consequence,
                alternative,
            },
            token,
        })
    }

    fn function_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();

        self.expect_peek(TokenType::LeftParen)?;
        let parameters = self.function_parameters()?;

        self.expect_peek(TokenType::LeftBrace)?;
        let body = Rc::new(self.block()?);

        Ok(Expr {
            kind: ExprKind::Function { parameters, body },
            token,
        })
    }

    fn function_parameters(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenType::RightParen) {
            self.advance();
            return Ok(parameters);
        }

        self.expect_peek(TokenType::Identifier)?;
        parameters.push(Ident {
            token: self.current_token.clone(),
            name: self.current_token.lexeme.clone(),
        });

        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.expect_peek(TokenType::Identifier)?;
            parameters.push(Ident {
                token: self.current_token.clone(),
                name: self.current_token.lexeme.clone(),
            });
        }

        self.expect_peek(TokenType::RightParen)?;
        Ok(parameters)
    }

    fn call_expression(&mut self, function: Expr) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();
        let arguments = self.expression_list(TokenType::RightParen)?;

        Ok(Expr {
            kind: ExprKind::Call {
                function: Box::new(function),
                arguments,
            },
            token,
        })
    }

    fn array_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();
        let elements = self.expression_list(TokenType::RightBracket)?;

        Ok(Expr {
            kind: ExprKind::Array(elements),
            token,
        })
    }

    fn index_expression(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let token = self.current_token.clone();

        self.advance();
        let index = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RightBracket)?;

        Ok(Expr {
            kind: ExprKind::Index {
                left: Box::new(left),
                index: Box::new(index),
            },
            token,
        })
    }

    fn expression_list(&mut self, end: TokenType) -> Result<Vec<Expr>, ParseError> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Ok(list);
        }

        self.advance();
        list.push(self.expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            list.push(self.expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Ok(list)
    }

    fn block(&mut self) -> Result<Block, ParseError> {
        let token = self.current_token.clone();
        let mut statements = Vec::new();

        self.advance();
        while !self.current_is(TokenType::RightBrace) && !self.current_is(TokenType::Eof) {
            statements.push(self.statement()?);
            self.advance();
        }

        Ok(Block { token, statements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::load_keywords;

    fn parse(source: &str) -> Program {
        try_parse(source).unwrap_or_else(|errors| {
            panic!("parser errors for {:?}: {:?}", source, errors);
        })
    }

    fn try_parse(source: &str) -> Result<Program, Vec<ParseError>> {
        let keywords = load_keywords(None).unwrap();
        Parser::new(Scanner::new(source, &keywords)).parse()
    }

    fn error_messages(source: &str) -> Vec<String> {
        match try_parse(source) {
            Ok(program) => panic!("expected errors, parsed: {}", program),
            Err(errors) => errors.into_iter().map(|e| e.message).collect(),
        }
    }

    // --- Statements ---

    #[test]
    fn parse_let_statements() {
        let program = parse("let x = 5; let y = 10; let foobar = 838383;");
        assert_eq!(program.statements.len(), 3);

        let expected = ["x", "y", "foobar"];
        for (statement, want) in program.statements.iter().zip(expected) {
            assert_eq!(statement.token_literal(), "let");
            match &statement.kind {
                StmtKind::Let { name, .. } => assert_eq!(name.name, want),
                other => panic!("expected let statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn parse_return_statements() {
        let program = parse("return 5; return add(10);");
        assert_eq!(program.statements.len(), 2);
        for statement in &program.statements {
            assert_eq!(statement.token_literal(), "return");
            assert!(matches!(statement.kind, StmtKind::Return(_)));
        }
    }

    #[test]
    fn parse_for_statement() {
        let program = parse("for (i : 10) { print(i); }");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StmtKind::For {
                variable,
                iterable,
                body,
            } => {
                assert_eq!(variable.name, "i");
                assert!(matches!(iterable.kind, ExprKind::Int(10)));
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn semicolons_are_optional() {
        let program = parse("let x = 5\nx + 1");
        assert_eq!(program.statements.len(), 2);
    }

    // --- Expressions ---

    #[test]
    fn parse_prefix_expressions() {
        for (source, operator, value) in [("!5;", "!", 5), ("-15;", "-", 15)] {
            let program = parse(source);
            match &program.statements[0].kind {
                StmtKind::Expr(Expr {
                    kind: ExprKind::Prefix { operator: op, right },
                    ..
                }) => {
                    assert_eq!(op, operator);
                    assert!(matches!(right.kind, ExprKind::Int(v) if v == value));
                }
                other => panic!("expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn parse_infix_expressions() {
        for operator in ["+", "-", "*", "/", ">", "<", "==", "!="] {
            let program = parse(&format!("5 {} 5;", operator));
            match &program.statements[0].kind {
                StmtKind::Expr(Expr {
                    kind: ExprKind::Infix { operator: op, .. },
                    ..
                }) => assert_eq!(op, operator),
                other => panic!("expected infix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)\n((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (source, expected) in cases {
            assert_eq!(parse(source).to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn parse_if_expression() {
        let program = parse("if (x < y) { x } else { y }");
        match &program.statements[0].kind {
            StmtKind::Expr(Expr {
                kind:
                    ExprKind::If {
                        condition,
                        consequence,
                        alternative,
                    },
                ..
            }) => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert!(alternative.is_some());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn parse_function_literal() {
        let program = parse("func(x, y) { x + y; }");
        match &program.statements[0].kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Function { parameters, body },
                ..
            }) => {
                let names: Vec<&str> =
                    parameters.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, ["x", "y"]);
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn parse_empty_parameter_list() {
        let program = parse("func() { 1 }");
        match &program.statements[0].kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Function { parameters, .. },
                ..
            }) => assert!(parameters.is_empty()),
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn parse_call_expression() {
        let program = parse("add(1, 2 * 3, 4 + 5);");
        match &program.statements[0].kind {
            StmtKind::Expr(Expr {
                kind:
                    ExprKind::Call {
                        function,
                        arguments,
                    },
                ..
            }) => {
                assert_eq!(function.to_string(), "add");
                assert_eq!(arguments.len(), 3);
                assert_eq!(arguments[1].to_string(), "(2 * 3)");
            }
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn parse_array_and_index() {
        let program = parse("[1, 2 * 2, 3 + 3]; arr[1 + 1]");
        match &program.statements[0].kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Array(elements),
                ..
            }) => assert_eq!(elements.len(), 3),
            other => panic!("expected array literal, got {:?}", other),
        }
        assert_eq!(program.statements[1].to_string(), "(arr[(1 + 1)])");
    }

    #[test]
    fn parse_string_literal() {
        let program = parse("\"hello world\";");
        match &program.statements[0].kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Str(s),
                ..
            }) => assert_eq!(s, "hello world"),
            other => panic!("expected string literal, got {:?}", other),
        }
    }

    // --- Error reporting ---

    #[test]
    fn reports_expected_token() {
        let messages = error_messages("let x 5;");
        assert_eq!(
            messages[0],
            "expected next token to be =, got INT instead"
        );
    }

    #[test]
    fn reports_missing_identifier() {
        let messages = error_messages("let = 10;");
        assert_eq!(
            messages[0],
            "expected next token to be IDENTIFIER, got = instead"
        );
    }

    #[test]
    fn reports_missing_prefix_function() {
        let messages = error_messages("let x = ;");
        assert_eq!(messages[0], "no prefix parse function for ; found");
    }

    #[test]
    fn reports_integer_overflow() {
        let messages = error_messages("92233720368547758099;");
        assert_eq!(
            messages[0],
            "could not parse \"92233720368547758099\" as integer"
        );
    }

    #[test]
    fn collects_multiple_errors() {
        let messages = error_messages("let x 5; let = 10;");
        assert_eq!(messages.len(), 2);
    }

    // --- Reconstruction round-trip ---

    #[test]
    fn reconstruction_reparses_to_same_tree() {
        let sources = [
            "let x = 5;",
            "return (a + b) * c;",
            "if (x < y) { x } else { y }",
            "let adder = func(x) { func(y) { x + y } };",
            "adder(2)(3)",
            "let a = [1, \"two\", true]; a[0]",
            "for (i : 3) { let x = i * 2; print(x); }",
            "!true == !false",
        ];

        for source in sources {
            let first = parse(source).to_string();
            let second = parse(&first).to_string();
            assert_eq!(first, second, "source: {}", source);
        }
    }
}
