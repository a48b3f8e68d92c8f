//! Lexer (tokenizer) for the netlist format.

use crate::error::{MnaSimError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a netlist.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An identifier (component name, node name, keyword)
    Identifier,
    /// A number (integer or floating point, possibly with suffix)
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist input.
///
/// Words are whitespace-delimited. A `*` as the first non-blank character of
/// a line comments out the whole line; `;` comments out the rest of a line.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let ch = match self.chars.peek() {
            Some(&(_, ch)) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    line: self.line,
                    column: self.column,
                });
            }
        };

        let start_column = self.column;
        let start_line = self.line;

        let token = match ch {
            '\n' => {
                self.advance();
                Token {
                    kind: TokenKind::Newline,
                    text: "\n".to_string(),
                    line: start_line,
                    column: start_column,
                }
            }
            '.' => {
                self.at_line_start = false;
                let text = self.read_word()?;
                // ".5" is a value, ".end" is a directive
                let kind = if looks_like_number(&text) {
                    TokenKind::Number
                } else {
                    TokenKind::Directive
                };
                Token {
                    kind,
                    text,
                    line: start_line,
                    column: start_column,
                }
            }
            _ if is_word_char(ch) => {
                self.at_line_start = false;
                let text = self.read_word()?;
                let kind = if looks_like_number(&text) {
                    TokenKind::Number
                } else {
                    TokenKind::Identifier
                };
                Token {
                    kind,
                    text,
                    line: start_line,
                    column: start_column,
                }
            }
            _ => {
                return Err(MnaSimError::lexer(
                    start_line,
                    start_column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(token)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == ';' || (ch == '*' && self.at_line_start) {
                // Skip comment until end of line
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() || ch == ';' {
                break;
            }
            if !is_word_char(ch) {
                return Err(MnaSimError::lexer(
                    self.line,
                    self.column,
                    format!("unexpected character '{}'", ch),
                ));
            }
            text.push(ch);
            self.advance();
        }
        Ok(text)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '+' | '-')
}

/// Check whether a word has the shape of a number with an optional unit
/// suffix, e.g. `10k`, `-4.7u`, `1e-9`.
fn looks_like_number(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    // Sign
    if i < chars.len() && (chars[i] == '-' || chars[i] == '+') {
        i += 1;
    }

    // Integer part
    let mut has_digits = false;
    while i < chars.len() && chars[i].is_ascii_digit() {
        has_digits = true;
        i += 1;
    }

    // Decimal part
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            has_digits = true;
            i += 1;
        }
    }

    if !has_digits {
        return false;
    }

    // Exponent
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '-' || chars[j] == '+') {
            j += 1;
        }
        let exp_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j == exp_start {
            return false;
        }
        i = j;
    }

    // Unit suffix
    if i < chars.len() && is_unit_suffix(chars[i]) {
        i += 1;
    }

    i == chars.len()
}

fn is_unit_suffix(ch: char) -> bool {
    matches!(ch, 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'K' | 'M' | 'G')
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if !looks_like_number(text) {
        return None;
    }

    let last = text.chars().last()?;
    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    };
    let num_str = if is_unit_suffix(last) {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-15,
            (None, None) => true,
            _ => false,
        }
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("10k"), Some(10_000.0)));
        assert!(approx_eq(parse_value("100n"), Some(100e-9)));
        assert!(approx_eq(parse_value("4.7u"), Some(4.7e-6)));
        assert!(approx_eq(parse_value("1M"), Some(1_000_000.0)));
        assert!(approx_eq(parse_value("2.2"), Some(2.2)));
        assert!(approx_eq(parse_value("1e-9"), Some(1e-9)));
        assert!(approx_eq(parse_value("-5"), Some(-5.0)));
        assert!(approx_eq(parse_value(".5"), Some(0.5)));
    }

    #[test]
    fn test_parse_value_rejects_words() {
        assert_eq!(parse_value("in"), None);
        assert_eq!(parse_value("nan"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("1e"), None);
        assert_eq!(parse_value("10kk"), None);
    }

    #[test]
    fn test_lexer_basic() {
        let mut lexer = Lexer::new("R1 in out 10k");

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "R1");

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "in");

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.text, "out");

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.text, "10k");
        assert_eq!(tok.column, 11);
    }

    #[test]
    fn test_lexer_numeric_node_names() {
        let mut lexer = Lexer::new("V1 1 0 10");
        lexer.next_token().unwrap();
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.text, "1");
    }

    #[test]
    fn test_lexer_comments() {
        use TokenKind::*;
        assert_eq!(kinds("* title line\nR1 1 0 1k"), vec![Newline, Identifier, Number, Number, Number, Eof]);
        assert_eq!(kinds("R1 1 0 1k ; trailing"), vec![Identifier, Number, Number, Number, Eof]);
        assert_eq!(kinds("  * indented comment"), vec![Eof]);
    }

    #[test]
    fn test_star_inside_line_is_an_error() {
        let mut lexer = Lexer::new("R1 1 0 1*k");
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, MnaSimError::LexerError { line: 1, column: 9, .. }));
    }

    #[test]
    fn test_lexer_directive() {
        let mut lexer = Lexer::new(".end");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".end");
    }
}
