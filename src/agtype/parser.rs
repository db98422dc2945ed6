//! agtype recursive descent parser.
//!
//! ```text
//! value   := object | array | scalar
//! object  := '{' (pair (',' pair)*)? '}' suffix?
//! pair    := STRING ':' value
//! array   := '[' (value (',' value)*)? ']' suffix?
//! scalar  := (STRING | NUMBER | BOOL | NULL | NaN | Infinity | -Infinity) suffix?
//! suffix  := '::' IDENT
//! ```
//!
//! Errors are reported to the sink and the parser resynchronises at the
//! next `,` or closing bracket of the enclosing container, so one call
//! surfaces every structural problem it can reach.

use super::ast::{Literal, Node, Pair, Suffix};
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::lexer::{Span, Token, TokenKind};

/// Parser state: wraps a token slice with cursor.
struct Parser<'t, 'd> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
    diags: &'d mut Diagnostics,
}

impl<'t, 'd> Parser<'t, 'd> {
    fn new(tokens: &'t [Token], max_depth: usize, diags: &'d mut Diagnostics) -> Self {
        Self { tokens, pos: 0, depth: 0, max_depth, diags }
    }

    fn peek(&self) -> &'t Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &'t Token {
        let tok = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, msg: String) {
        let span = self.peek().span;
        self.diags.syntax(span, msg);
    }

    /// Human-readable description of the current token.
    fn found(&self) -> String {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Eof => "end of input".into(),
            TokenKind::String => format!("string \"{}\"", tok.text),
            TokenKind::Suffix => format!("'::{}'", tok.text),
            _ => format!("'{}'", tok.text),
        }
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    fn parse_value(&mut self) -> Option<Node> {
        let tok = self.peek();
        let literal = match tok.kind {
            TokenKind::LBrace => return self.nested(Self::parse_object),
            TokenKind::LBracket => return self.nested(Self::parse_array),
            TokenKind::String => Literal::String(tok.text.clone()),
            TokenKind::Integer => Literal::Integer(tok.text.clone()),
            TokenKind::Float => Literal::Float(tok.text.clone()),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,
            TokenKind::NaN => Literal::NaN,
            TokenKind::Infinity => Literal::Infinity,
            TokenKind::NegInfinity => Literal::NegInfinity,
            TokenKind::Identifier => {
                self.error(format!("unexpected identifier '{}'", tok.text));
                self.advance();
                return None;
            }
            _ => {
                let found = self.found();
                self.error(format!("expected a value, found {found}"));
                return None;
            }
        };

        let span = self.advance().span;
        let suffix = self.parse_suffix();
        Some(Node::Scalar { literal, suffix, span })
    }

    /// Enter a container, enforcing the nesting limit.
    fn nested(&mut self, parse: fn(&mut Self) -> Option<Node>) -> Option<Node> {
        if self.depth >= self.max_depth {
            let max = self.max_depth;
            self.error(format!("value nested deeper than {max} levels"));
            self.skip_nested();
            return None;
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn parse_object(&mut self) -> Option<Node> {
        let open = self.advance().span; // '{'
        let mut pairs = Vec::new();

        if !self.at(TokenKind::RBrace) {
            loop {
                match self.parse_pair() {
                    Some(pair) => pairs.push(pair),
                    None => self.recover(),
                }
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                    break;
                }
                let found = self.found();
                self.error(format!("expected ',' or '}}' in object, found {found}"));
                self.recover();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.close(TokenKind::RBrace, open, "object", '}');
        let suffix = self.parse_suffix();
        Some(Node::Object { pairs, suffix, span: open.to(close) })
    }

    fn parse_pair(&mut self) -> Option<Pair> {
        if !self.at(TokenKind::String) {
            let found = self.found();
            self.error(format!("expected a string key, found {found}"));
            return None;
        }
        let key_tok = self.advance();
        if !self.eat(TokenKind::Colon) {
            let found = self.found();
            self.error(format!("expected ':' after key \"{}\", found {found}", key_tok.text));
            return None;
        }
        let value = self.parse_value()?;
        Some(Pair {
            key: key_tok.text.clone(),
            key_span: key_tok.span,
            value,
        })
    }

    fn parse_array(&mut self) -> Option<Node> {
        let open = self.advance().span; // '['
        let mut items = Vec::new();

        if !self.at(TokenKind::RBracket) {
            loop {
                match self.parse_value() {
                    Some(item) => items.push(item),
                    None => self.recover(),
                }
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                if self.at(TokenKind::RBracket) || self.at(TokenKind::Eof) {
                    break;
                }
                let found = self.found();
                self.error(format!("expected ',' or ']' in array, found {found}"));
                self.recover();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.close(TokenKind::RBracket, open, "array", ']');
        let suffix = self.parse_suffix();
        Some(Node::Array { items, suffix, span: open.to(close) })
    }

    fn parse_suffix(&mut self) -> Option<Suffix> {
        if !self.at(TokenKind::Suffix) {
            return None;
        }
        let tok = self.advance();
        Some(Suffix { name: tok.text.clone(), span: tok.span })
    }

    /// Consume the closing bracket, or report the container as unclosed.
    fn close(&mut self, kind: TokenKind, open: Span, what: &str, bracket: char) -> Span {
        if self.at(kind) {
            return self.advance().span;
        }
        let found = self.found();
        let span = open.to(self.peek().span);
        self.diags.syntax(span, format!("unclosed {what}: expected '{bracket}', found {found}"));
        self.peek().span
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Skip to the next `,` or closing bracket at the current level.
    fn recover(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Comma if depth == 0 => return,
                TokenKind::RBrace | TokenKind::RBracket if depth == 0 => return,
                TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RBracket => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip one bracketed value (and its suffix) without building it.
    fn skip_nested(&mut self) {
        let mut depth = 0usize;
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::Eof {
                return;
            }
            self.advance();
            match kind {
                TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        self.parse_suffix();
    }
}

/// Parse exactly one top-level value from `tokens`.
///
/// Returns `None` only when no value could be started; every problem,
/// including trailing input, is reported to `diags`.
pub fn parse_literal(tokens: &[Token], max_depth: usize, diags: &mut Diagnostics) -> Option<Node> {
    if tokens.is_empty() {
        return None;
    }
    let mut p = Parser::new(tokens, max_depth, diags);
    let node = p.parse_value();

    if !p.at(TokenKind::Eof) {
        let start = p.peek().span;
        let end = tokens[tokens.len() - 1].span;
        let found = p.found();
        p.diags.report(
            DiagnosticKind::TrailingInput,
            Some(start.to(end)),
            format!("unexpected input after the value, starting with {found}"),
        );
    }

    node
}
