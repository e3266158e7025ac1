//! Recursive-descent parser for RiyalScript
//!
//! One method per grammar production. Precedence, ascending:
//! `||` < `&&` < comparison < additive < multiplicative < `**` (right) <
//! prefix `-` < postfix `!` < primary.

use crate::error::{ParseError, Result};
use crate::lexer::{Token, TokenKind};
use riyal_core::ast::{BinaryOperator, UnaryOperator};
use riyal_core::{Expression, Program, Property, Statement};

/// Parser over a token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser over tokens produced by the lexer
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a complete program
    pub fn parse_program(mut self) -> Result<Program> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program::new(statements))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_ahead_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: token.kind.to_string(),
            line: token.line,
            column: token.column,
        }
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_variable_declaration(),
            TokenKind::Func => self.parse_function_declaration(),
            TokenKind::While => self.parse_while_loop(),
            TokenKind::For => self.parse_for_loop(),
            TokenKind::Identifier(_) if self.peek_ahead_kind(1) == Some(&TokenKind::Assign) => {
                self.parse_assignment()
            }
            _ => {
                let expression = self.parse_expression()?;
                Ok(Statement::Expression { expression })
            }
        }
    }

    /// `let <id> = <expr>`
    fn parse_variable_declaration(&mut self) -> Result<Statement> {
        self.advance(); // let
        let name = self.expect_identifier("a variable name")?;
        self.expect(TokenKind::Assign, "'='")?;
        let initializer = self.parse_expression()?;
        Ok(Statement::VariableDeclaration { name, initializer })
    }

    /// `<id> = <expr>`
    fn parse_assignment(&mut self) -> Result<Statement> {
        let name = self.expect_identifier("a variable name")?;
        self.expect(TokenKind::Assign, "'='")?;
        let expression = self.parse_expression()?;
        Ok(Statement::Assignment { name, expression })
    }

    /// `func <id>[<params>] (<exprs>) end`
    fn parse_function_declaration(&mut self) -> Result<Statement> {
        self.advance(); // func
        let name = self.expect_identifier("a function name")?;

        self.expect(TokenKind::LBracket, "'['")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                params.push(self.expect_identifier("a parameter name")?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;

        // The body is a parenthesized expression block; zero expressions
        // is a legal, empty body.
        self.expect(TokenKind::LParen, "'('")?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("')'"));
            }
            let expression = self.parse_expression()?;
            body.push(Statement::Expression { expression });
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::End, "'end'")?;

        Ok(Statement::FunctionDeclaration { name, params, body })
    }

    /// `while <expr> do <stmts> end`
    fn parse_while_loop(&mut self) -> Result<Statement> {
        self.advance(); // while
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_block()?;
        self.expect(TokenKind::End, "'end'")?;
        Ok(Statement::WhileLoop { condition, body })
    }

    /// `for <id> in <expr> do <stmts> end`
    fn parse_for_loop(&mut self) -> Result<Statement> {
        self.advance(); // for
        let variable = self.expect_identifier("a loop variable")?;
        self.expect(TokenKind::In, "'in'")?;
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_block()?;
        self.expect(TokenKind::End, "'end'")?;
        Ok(Statement::ForLoop {
            variable,
            iterable,
            body,
        })
    }

    /// Statements up to (not including) the closing `end`
    fn parse_block(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::End) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("'end'"));
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_logical_and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.parse_logical_and()?;
            left = Expression::binary(BinaryOperator::Or, left, right);
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.parse_comparison()?;
            left = Expression::binary(BinaryOperator::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOperator::Eq,
                TokenKind::NotEq => BinaryOperator::Ne,
                TokenKind::Gt => BinaryOperator::Gt,
                TokenKind::Ge => BinaryOperator::Ge,
                TokenKind::Lt => BinaryOperator::Lt,
                TokenKind::Le => BinaryOperator::Le,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                TokenKind::Percent => BinaryOperator::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_power()?;
            left = Expression::binary(op, left, right);
        }
    }

    /// `**` is right-associative: `2 ** 3 ** 2` is `2 ** (3 ** 2)`
    fn parse_power(&mut self) -> Result<Expression> {
        let base = self.parse_unary()?;
        if self.eat(&TokenKind::StarStar) {
            let exponent = self.parse_power()?;
            return Ok(Expression::binary(BinaryOperator::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expression::unary(UnaryOperator::Negate, operand));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression> {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::Bang) {
            expr = Expression::unary(UnaryOperator::Factorial, expr);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        match self.peek_kind().clone() {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::number(value))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expression::string(value))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::boolean(false))
            }
            TokenKind::If => self.parse_conditional(),
            TokenKind::Market => self.parse_market_call(),
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LBracket) {
                    self.parse_call_arguments(name)
                } else {
                    Ok(Expression::identifier(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// `if <expr> then <expr> else <expr>`; an `else if` chain parses
    /// naturally because the alternate is itself an expression.
    fn parse_conditional(&mut self) -> Result<Expression> {
        self.advance(); // if
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then, "'then'")?;
        let consequent = self.parse_expression()?;
        self.expect(TokenKind::Else, "'else'")?;
        let alternate = self.parse_expression()?;
        Ok(Expression::conditional(condition, consequent, alternate))
    }

    /// `market.<name>("<symbol>")`
    fn parse_market_call(&mut self) -> Result<Expression> {
        self.advance(); // market
        self.expect(TokenKind::Dot, "'.'")?;
        let function = self.expect_identifier("a market function name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let symbol = match self.peek_kind() {
            TokenKind::Str(symbol) => {
                let symbol = symbol.clone();
                self.advance();
                symbol
            }
            _ => return Err(self.unexpected("a ticker symbol string")),
        };
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expression::market_call(function, symbol))
    }

    /// `<callee>[<args>]`
    fn parse_call_arguments(&mut self, callee: String) -> Result<Expression> {
        self.expect(TokenKind::LBracket, "'['")?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Expression::call(callee, args))
    }

    /// `[e, e, ...]`; empty arrays are legal
    fn parse_array_literal(&mut self) -> Result<Expression> {
        self.expect(TokenKind::LBracket, "'['")?;
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Expression::array(elements))
    }

    /// `{k: v, ...}`; empty objects are legal
    fn parse_object_literal(&mut self) -> Result<Expression> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut properties = Vec::new();
        if !self.check(&TokenKind::RBrace) {
            loop {
                let key = self.expect_identifier("a property key")?;
                self.expect(TokenKind::Colon, "':'")?;
                let value = self.parse_expression()?;
                properties.push(Property { key, value });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Expression::object(properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use riyal_core::ExpressionKind;

    fn parse_single_expression(source: &str) -> Expression {
        let program = parse(source).unwrap();
        assert_eq!(program.statements.len(), 1);
        match program.statements.into_iter().next().unwrap() {
            Statement::VariableDeclaration { initializer, .. } => initializer,
            Statement::Expression { expression } => expression,
            other => panic!("Expected an expression-bearing statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_variable_declaration() {
        let program = parse("let x = 5").unwrap();
        match &program.statements[0] {
            Statement::VariableDeclaration { name, initializer } => {
                assert_eq!(name, "x");
                assert_eq!(
                    initializer.kind,
                    ExpressionKind::NumberLiteral { value: 5.0 }
                );
                assert_eq!(initializer.inferred_type, None);
            }
            other => panic!("Expected VariableDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_precedence() {
        // 10 + 5 * 2 parses as 10 + (5 * 2)
        let expr = parse_single_expression("let r = 10 + 5 * 2");
        match expr.kind {
            ExpressionKind::Binary { op, right, .. } => {
                assert_eq!(op, BinaryOperator::Add);
                assert!(matches!(
                    right.kind,
                    ExpressionKind::Binary {
                        op: BinaryOperator::Mul,
                        ..
                    }
                ));
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_power_right_associative() {
        // 2 ** 3 ** 2 parses as 2 ** (3 ** 2)
        let expr = parse_single_expression("let r = 2 ** 3 ** 2");
        match expr.kind {
            ExpressionKind::Binary { op, left, right } => {
                assert_eq!(op, BinaryOperator::Pow);
                assert_eq!(left.kind, ExpressionKind::NumberLiteral { value: 2.0 });
                assert!(matches!(
                    right.kind,
                    ExpressionKind::Binary {
                        op: BinaryOperator::Pow,
                        ..
                    }
                ));
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_logical_expression() {
        let expr = parse_single_expression("let ok = 5 > 3 && 2 < 4");
        match expr.kind {
            ExpressionKind::Binary { op, left, right } => {
                assert_eq!(op, BinaryOperator::And);
                assert!(matches!(
                    left.kind,
                    ExpressionKind::Binary {
                        op: BinaryOperator::Gt,
                        ..
                    }
                ));
                assert!(matches!(
                    right.kind,
                    ExpressionKind::Binary {
                        op: BinaryOperator::Lt,
                        ..
                    }
                ));
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unary_forms() {
        // -x! parses as -(x!)
        let expr = parse_single_expression("let r = -x!");
        match expr.kind {
            ExpressionKind::Unary { op, operand } => {
                assert_eq!(op, UnaryOperator::Negate);
                assert!(matches!(
                    operand.kind,
                    ExpressionKind::Unary {
                        op: UnaryOperator::Factorial,
                        ..
                    }
                ));
            }
            other => panic!("Expected Unary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_conditional() {
        let expr = parse_single_expression(r#"let r = if 5 > 3 then "yes" else "no""#);
        assert!(matches!(expr.kind, ExpressionKind::Conditional { .. }));
    }

    #[test]
    fn test_parse_else_if_chain() {
        let expr = parse_single_expression(r#"let r = if a > 1 then 1 else if a > 0 then 2 else 3"#);
        match expr.kind {
            ExpressionKind::Conditional { alternate, .. } => {
                assert!(matches!(alternate.kind, ExpressionKind::Conditional { .. }));
            }
            other => panic!("Expected Conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_declaration() {
        let program = parse("func add[x, y] (x + y) end").unwrap();
        match &program.statements[0] {
            Statement::FunctionDeclaration { name, params, body } => {
                assert_eq!(name, "add");
                assert_eq!(params, &["x".to_string(), "y".to_string()]);
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected FunctionDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_function_body() {
        let program = parse("func noop[] () end").unwrap();
        match &program.statements[0] {
            Statement::FunctionDeclaration { params, body, .. } => {
                assert!(params.is_empty());
                assert!(body.is_empty());
            }
            other => panic!("Expected FunctionDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_call() {
        let expr = parse_single_expression("let r = add[5, 3]");
        match expr.kind {
            ExpressionKind::FunctionCall { callee, args } => {
                assert_eq!(callee, "add");
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected FunctionCall, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_while_loop() {
        let program = parse("while x > 0 do x = x - 1 end").unwrap();
        match &program.statements[0] {
            Statement::WhileLoop { condition, body } => {
                assert!(matches!(condition.kind, ExpressionKind::Binary { .. }));
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0], Statement::Assignment { .. }));
            }
            other => panic!("Expected WhileLoop, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_for_loop() {
        let program = parse("for i in [1, 2, 3] do let twice = i * 2 end").unwrap();
        match &program.statements[0] {
            Statement::ForLoop {
                variable,
                iterable,
                body,
            } => {
                assert_eq!(variable, "i");
                assert!(matches!(
                    iterable.kind,
                    ExpressionKind::ArrayLiteral { .. }
                ));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected ForLoop, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_array_and_object_literals() {
        let expr = parse_single_expression(r#"let o = {name: "test", values: [1, 2]}"#);
        match expr.kind {
            ExpressionKind::ObjectLiteral { properties } => {
                assert_eq!(properties.len(), 2);
                assert_eq!(properties[0].key, "name");
                assert!(matches!(
                    properties[1].value.kind,
                    ExpressionKind::ArrayLiteral { .. }
                ));
            }
            other => panic!("Expected ObjectLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_literals() {
        assert!(matches!(
            parse_single_expression("let a = []").kind,
            ExpressionKind::ArrayLiteral { ref elements } if elements.is_empty()
        ));
        assert!(matches!(
            parse_single_expression("let o = {}").kind,
            ExpressionKind::ObjectLiteral { ref properties } if properties.is_empty()
        ));
    }

    #[test]
    fn test_parse_market_call() {
        let expr = parse_single_expression(r#"let price = market.getStockPrice("AAPL")"#);
        match expr.kind {
            ExpressionKind::MarketCall { function, symbol } => {
                assert_eq!(function, "getStockPrice");
                assert_eq!(symbol, "AAPL");
            }
            other => panic!("Expected MarketCall, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_missing_then() {
        let err = parse("let x = if 5 10 else 20").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Syntax error"));
        assert!(message.contains("'then'"));
    }

    #[test]
    fn test_parse_rejects_operator_sequence() {
        assert!(parse("let x = + + 5").is_err());
    }

    #[test]
    fn test_parse_never_partially_succeeds() {
        // A valid prefix followed by garbage fails as a whole.
        assert!(parse("let x = 5 let y =").is_err());
    }
}
