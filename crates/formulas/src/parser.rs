//! Formula parser module

use crate::{AggregateFn, BinaryOperator, FormulaError, FormulaExpr, UnaryOperator};
use gridwise_core::{CellRange, CellRef};

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Identifier(String),
    CellRef(CellRef),
    LParen,
    RParen,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

struct Lexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Result<Token, FormulaError> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos: self.pos,
            });
        };

        let token = match ch {
            '(' => self.simple(TokenKind::LParen),
            ')' => self.simple(TokenKind::RParen),
            ':' => self.simple(TokenKind::Colon),
            '+' => self.simple(TokenKind::Plus),
            '-' => self.simple(TokenKind::Minus),
            '*' => self.simple(TokenKind::Star),
            '/' => self.simple(TokenKind::Slash),
            '.' | '0'..='9' => self.number_token()?,
            'A'..='Z' | 'a'..='z' => self.identifier_or_cell_token()?,
            _ => {
                return Err(FormulaError::ParseError(format!(
                    "Unexpected character '{}' at {}",
                    ch, start
                )))
            }
        };

        Ok(Token {
            kind: token,
            pos: start,
        })
    }

    fn simple(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn number_token(&mut self) -> Result<TokenKind, FormulaError> {
        let start = self.pos;
        let mut seen_dot = false;

        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => self.advance(),
                '.' if !seen_dot => {
                    seen_dot = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let text = self.slice(start, self.pos);
        let value: f64 = text
            .parse()
            .map_err(|_| FormulaError::ParseError(format!("Invalid number literal '{}'", text)))?;
        Ok(TokenKind::Number(value))
    }

    fn identifier_or_cell_token(&mut self) -> Result<TokenKind, FormulaError> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphabetic()) {
            self.advance();
        }
        let letters_end = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }

        if self.pos > letters_end {
            if matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
                return Err(FormulaError::ParseError(format!(
                    "Invalid cell reference at {}",
                    start
                )));
            }
            let text = self.slice(start, self.pos);
            let cell = CellRef::parse(text)
                .map_err(|e| FormulaError::ParseError(e.to_string()))?;
            return Ok(TokenKind::CellRef(cell));
        }

        Ok(TokenKind::Identifier(
            self.slice(start, letters_end).to_uppercase(),
        ))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, ch)| *ch)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn byte_pos(&self, idx: usize) -> usize {
        self.chars
            .get(idx)
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.input[self.byte_pos(start)..self.byte_pos(end)]
    }
}

struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, idx: 0 }
    }

    fn parse_expression(&mut self) -> Result<FormulaExpr, FormulaError> {
        self.parse_add_sub()
    }

    fn parse_add_sub(&mut self) -> Result<FormulaExpr, FormulaError> {
        let mut expr = self.parse_mul_div()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul_div()?;
            expr = FormulaExpr::BinaryOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_mul_div(&mut self) -> Result<FormulaExpr, FormulaError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = FormulaExpr::BinaryOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<FormulaExpr, FormulaError> {
        match self.peek_kind() {
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            TokenKind::Minus => {
                self.advance();
                let expr = self.parse_unary()?;
                Ok(FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    expr: Box::new(expr),
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<FormulaExpr, FormulaError> {
        let token = self.advance().clone();
        match token.kind {
            TokenKind::Number(value) => Ok(FormulaExpr::Number(value)),
            TokenKind::CellRef(cell) => Ok(FormulaExpr::CellRef(cell)),
            TokenKind::Identifier(name) => self.parse_function(&name),
            TokenKind::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Eof => Err(FormulaError::ParseError(
                "Unexpected end of input".to_string(),
            )),
            _ => Err(FormulaError::ParseError(format!(
                "Unexpected token at {}",
                token.pos
            ))),
        }
    }

    /// `FUNC "(" CELLREF ":" CELLREF ")"`
    fn parse_function(&mut self, name: &str) -> Result<FormulaExpr, FormulaError> {
        let func = AggregateFn::from_name(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;
        self.expect(&TokenKind::LParen)?;
        let start = self.expect_cell()?;
        self.expect(&TokenKind::Colon)?;
        let end = self.expect_cell()?;
        self.expect(&TokenKind::RParen)?;
        Ok(FormulaExpr::Aggregate {
            func,
            range: CellRange::new(start, end),
        })
    }

    fn expect_cell(&mut self) -> Result<CellRef, FormulaError> {
        let token = self.advance();
        match token.kind {
            TokenKind::CellRef(cell) => Ok(cell),
            ref other => Err(FormulaError::ParseError(format!(
                "Expected cell reference, got {:?}",
                other
            ))),
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), FormulaError> {
        let token = self.advance();
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(kind) {
            Ok(())
        } else {
            Err(FormulaError::ParseError(format!(
                "Expected {:?}, got {:?}",
                kind, token.kind
            )))
        }
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.idx].kind
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.idx];
        if !matches!(token.kind, TokenKind::Eof) {
            self.idx += 1;
        }
        token
    }
}

/// Parse a formula string into an AST
pub fn parse_formula(formula: &str) -> Result<FormulaExpr, FormulaError> {
    let formula = formula.trim_start();
    let formula = formula.strip_prefix('=').unwrap_or(formula);
    if formula.trim().is_empty() {
        return Err(FormulaError::ParseError("Empty formula".to_string()));
    }

    let mut lexer = Lexer::new(formula);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::Eof);
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expression()?;
    if !matches!(parser.peek_kind(), TokenKind::Eof) {
        return Err(FormulaError::ParseError(
            "Unexpected trailing input".to_string(),
        ));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(parse_formula("").is_err());
        assert!(parse_formula("=").is_err());
        assert!(parse_formula("   ").is_err());
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse_formula("=1+2*3").unwrap();
        match expr {
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Add,
                right,
                ..
            } => assert!(matches!(
                *right,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            )),
            other => panic!("expected addition, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_without_equals() {
        let expr = parse_formula("A1/B1").unwrap();
        assert!(matches!(
            expr,
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Divide,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_unary_and_parens() {
        let expr = parse_formula("=-(A1+2)").unwrap();
        assert!(matches!(
            expr,
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                ..
            }
        ));
        assert!(parse_formula("=+--3").is_ok());
    }

    #[test]
    fn test_parse_function_call() {
        let expr = parse_formula("=sum(A3:A1)").unwrap();
        match expr {
            FormulaExpr::Aggregate { func, range } => {
                assert_eq!(func, AggregateFn::Sum);
                assert_eq!(range.to_string(), "A1:A3");
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_multi_letter_column() {
        let expr = parse_formula("=AA10*2").unwrap();
        match expr {
            FormulaExpr::BinaryOp { left, .. } => {
                assert_eq!(*left, FormulaExpr::CellRef(CellRef::new(9, 26)));
            }
            other => panic!("expected multiply, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_formula("=VLOOKUP(A1:A2)"),
            Err(FormulaError::UnknownFunction(_))
        ));
        assert!(parse_formula("=SUM(A1)").is_err());
        assert!(parse_formula("=SUM(A1:B)").is_err());
        assert!(parse_formula("=1+").is_err());
        assert!(parse_formula("=(1+2").is_err());
        assert!(parse_formula("=1 2").is_err());
        assert!(parse_formula("=A1B2").is_err());
        assert!(parse_formula("=A0").is_err());
        assert!(parse_formula("=2^3").is_err());
        assert!(parse_formula("=\"text\"").is_err());
    }
}
