//! agtype lexer: tokenizes one result literal.
//!
//! Never fails outright: bad characters, bad escapes and unterminated
//! strings are reported to the [`Diagnostics`] sink and lexing resumes, so
//! the parser still sees a usable token stream.

use std::iter::Peekable;
use std::str::CharIndices;

use super::diagnostics::Diagnostics;

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Decoded text: string contents without quotes and with escapes
    /// resolved, number digits as written, suffix name without `::`.
    pub text: String,
}

/// Byte range in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn to(self, other: Span) -> Span {
        Span { start: self.start, end: other.end.max(self.end) }
    }
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    String, Integer, Float,
    True, False, Null,
    NaN, Infinity, NegInfinity,

    /// Bare word that is not a literal keyword.
    Identifier,
    /// `::name`
    Suffix,

    // Punctuation
    LBrace, RBrace, LBracket, RBracket,
    Colon, Comma,

    Eof,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Tokenize an agtype literal. Problems go to `diags`; the returned stream
/// always ends with [`TokenKind::Eof`].
pub fn tokenize(input: &str, diags: &mut Diagnostics) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => { chars.next(); }

            '"' => tokens.push(lex_string(&mut chars, input.len(), diags)),

            c if c.is_ascii_digit() => tokens.push(lex_number(&mut chars, diags)),

            '-' => match chars.clone().nth(1) {
                Some((_, d)) if d.is_ascii_digit() => tokens.push(lex_number(&mut chars, diags)),
                Some((_, c)) if c.is_alphabetic() => {
                    chars.next(); // skip '-'
                    let word = take_word(&mut chars);
                    let span = Span { start: pos, end: pos + 1 + word.len() };
                    if word == "Infinity" {
                        tokens.push(Token { kind: TokenKind::NegInfinity, span, text: format!("-{word}") });
                    } else {
                        diags.lex(span, format!("unexpected '-{word}'"));
                    }
                }
                _ => {
                    chars.next();
                    diags.lex(Span { start: pos, end: pos + 1 }, "unexpected character '-'");
                }
            },

            c if c.is_alphabetic() || c == '_' => {
                let word = take_word(&mut chars);
                tokens.push(Token {
                    kind: keyword_or_ident(&word),
                    span: Span { start: pos, end: pos + word.len() },
                    text: word,
                });
            }

            ':' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, ':'))) {
                    chars.next();
                    let name = take_word(&mut chars);
                    if name.is_empty() {
                        diags.lex(Span { start: pos, end: pos + 2 }, "expected a type name after '::'");
                    } else {
                        tokens.push(Token {
                            kind: TokenKind::Suffix,
                            span: Span { start: pos, end: pos + 2 + name.len() },
                            text: name,
                        });
                    }
                } else {
                    tokens.push(punct(TokenKind::Colon, pos, ":"));
                }
            }

            '{' => { chars.next(); tokens.push(punct(TokenKind::LBrace, pos, "{")); }
            '}' => { chars.next(); tokens.push(punct(TokenKind::RBrace, pos, "}")); }
            '[' => { chars.next(); tokens.push(punct(TokenKind::LBracket, pos, "[")); }
            ']' => { chars.next(); tokens.push(punct(TokenKind::RBracket, pos, "]")); }
            ',' => { chars.next(); tokens.push(punct(TokenKind::Comma, pos, ",")); }

            other => {
                chars.next();
                diags.lex(
                    Span { start: pos, end: pos + other.len_utf8() },
                    format!("unexpected character '{other}'"),
                );
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });

    tokens
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token {
        kind,
        span: Span { start: pos, end: pos + text.len() },
        text: text.to_string(),
    }
}

fn keyword_or_ident(s: &str) -> TokenKind {
    match s {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "NaN" => TokenKind::NaN,
        "Infinity" => TokenKind::Infinity,
        _ => TokenKind::Identifier,
    }
}

fn take_word(chars: &mut Chars<'_>) -> String {
    let mut word = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }
    word
}

fn take_digits(chars: &mut Chars<'_>, out: &mut String) -> usize {
    let mut n = 0;
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        out.push(c);
        chars.next();
        n += 1;
    }
    n
}

/// `-? digits ('.' digits)? ([eE] [+-]? digits)?`
fn lex_number(chars: &mut Chars<'_>, diags: &mut Diagnostics) -> Token {
    let start = chars.peek().map_or(0, |&(pos, _)| pos);
    let mut text = String::new();
    let mut is_float = false;

    if matches!(chars.peek(), Some(&(_, '-'))) {
        text.push('-');
        chars.next();
    }
    take_digits(chars, &mut text);

    if matches!(chars.peek(), Some(&(_, '.')))
        && matches!(chars.clone().nth(1), Some((_, d)) if d.is_ascii_digit())
    {
        is_float = true;
        text.push('.');
        chars.next();
        take_digits(chars, &mut text);
    }

    if let Some(&(_, e @ ('e' | 'E'))) = chars.peek() {
        is_float = true;
        text.push(e);
        chars.next();
        if let Some(&(_, sign @ ('+' | '-'))) = chars.peek() {
            text.push(sign);
            chars.next();
        }
        if take_digits(chars, &mut text) == 0 {
            diags.lex(
                Span { start, end: start + text.len() },
                format!("missing exponent digits in '{text}'"),
            );
        }
    }

    Token {
        kind: if is_float { TokenKind::Float } else { TokenKind::Integer },
        span: Span { start, end: start + text.len() },
        text,
    }
}

/// Double-quoted string with JSON escapes.
fn lex_string(chars: &mut Chars<'_>, input_len: usize, diags: &mut Diagnostics) -> Token {
    let start = chars.next().map_or(0, |(pos, _)| pos); // opening quote
    let mut s = String::new();

    loop {
        match chars.next() {
            Some((end, '"')) => {
                return Token {
                    kind: TokenKind::String,
                    span: Span { start, end: end + 1 },
                    text: s,
                };
            }
            Some((esc_pos, '\\')) => match chars.next() {
                Some((_, escaped)) => match escaped {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    '/' => s.push('/'),
                    'b' => s.push('\u{8}'),
                    'f' => s.push('\u{c}'),
                    'n' => s.push('\n'),
                    'r' => s.push('\r'),
                    't' => s.push('\t'),
                    'u' => lex_unicode_escape(chars, esc_pos, &mut s, diags),
                    other => {
                        diags.lex(
                            Span { start: esc_pos, end: esc_pos + 1 + other.len_utf8() },
                            format!("invalid escape '\\{other}'"),
                        );
                        s.push(other);
                    }
                },
                None => break,
            },
            Some((_, c)) => s.push(c),
            None => break,
        }
    }

    diags.lex(Span { start, end: input_len }, "unterminated string literal");
    Token {
        kind: TokenKind::String,
        span: Span { start, end: input_len },
        text: s,
    }
}

fn read_hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let &(_, c) = chars.peek()?;
        let digit = c.to_digit(16)?;
        chars.next();
        value = value * 16 + digit;
    }
    Some(value)
}

/// `\uXXXX`, joining a UTF-16 surrogate pair when one follows.
fn lex_unicode_escape(chars: &mut Chars<'_>, esc_pos: usize, out: &mut String, diags: &mut Diagnostics) {
    let Some(high) = read_hex4(chars) else {
        diags.lex(
            Span { start: esc_pos, end: esc_pos + 2 },
            "invalid \\u escape: expected four hex digits",
        );
        return;
    };

    let mut code = high;
    if (0xD800..0xDC00).contains(&high) {
        let mut look = chars.clone();
        let low = match (look.next(), look.next()) {
            (Some((_, '\\')), Some((_, 'u'))) => {
                read_hex4(&mut look).filter(|low| (0xDC00..0xE000).contains(low))
            }
            _ => None,
        };
        if let Some(low) = low {
            *chars = look;
            code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        }
    }

    match char::from_u32(code) {
        Some(c) => out.push(c),
        None => {
            diags.lex(
                Span { start: esc_pos, end: esc_pos + 6 },
                format!("invalid unicode escape '\\u{high:04x}'"),
            );
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> (Vec<Token>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let tokens = tokenize(input, &mut diags);
        (tokens, diags)
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).0.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_vertex_literal() {
        assert_eq!(kinds(r#"{"id": 1, "label": "A", "properties": {}}::vertex"#), vec![
            TokenKind::LBrace,
            TokenKind::String, TokenKind::Colon, TokenKind::Integer, TokenKind::Comma,
            TokenKind::String, TokenKind::Colon, TokenKind::String, TokenKind::Comma,
            TokenKind::String, TokenKind::Colon, TokenKind::LBrace, TokenKind::RBrace,
            TokenKind::RBrace,
            TokenKind::Suffix,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_suffix_text_and_span() {
        let (tokens, diags) = lex("[]::path");
        assert!(diags.is_empty());
        assert_eq!(tokens[2].kind, TokenKind::Suffix);
        assert_eq!(tokens[2].text, "path");
        assert_eq!(tokens[2].span, Span { start: 2, end: 8 });
    }

    #[test]
    fn test_numbers() {
        let (tokens, diags) = lex("-12 3.25 6.45161290322581e+46 1E5");
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text, "-12");
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[2].kind, TokenKind::Float);
        assert_eq!(tokens[2].text, "6.45161290322581e+46");
        assert_eq!(tokens[3].kind, TokenKind::Float);
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(kinds("NaN Infinity -Infinity"), vec![
            TokenKind::NaN, TokenKind::Infinity, TokenKind::NegInfinity, TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(kinds("true false null TRUE"), vec![
            TokenKind::True, TokenKind::False, TokenKind::Null, TokenKind::Identifier, TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_string_escapes() {
        let (tokens, diags) = lex(r#""a\"b\\c\/\né😀""#);
        assert!(diags.is_empty());
        assert_eq!(tokens[0].text, "a\"b\\c/\né😀");
    }

    #[test]
    fn test_unterminated_string_is_reported_and_lexing_continues() {
        let (tokens, diags) = lex(r#"["abc"#);
        assert_eq!(diags.len(), 1);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "abc");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_bad_characters_are_collected() {
        let (tokens, diags) = lex("[1 @ 2 # 3]");
        assert_eq!(diags.len(), 2);
        let ints = tokens.iter().filter(|t| t.kind == TokenKind::Integer).count();
        assert_eq!(ints, 3);
    }

    #[test]
    fn test_invalid_escape() {
        let (_, diags) = lex(r#""\q""#);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_bare_double_colon() {
        let (tokens, diags) = lex("{}::");
        assert_eq!(diags.len(), 1);
        assert_eq!(tokens.len(), 3);
    }
}
