use crate::diagnostics::SourceSpan;

/// A raw token. Tokens carry no kind tag; the reader classifies them
/// by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: SourceSpan,
}

/// Splits source text into tokens.
///
/// Whitespace and commas separate tokens and are discarded. `~@` and
/// each of `` [ ] { } ( ) ' ` ~ ^ @ ! $ # `` form their own token.
/// Double-quoted strings scan over backslash escapes and keep their
/// raw text; the closing quote is optional and an unterminated literal
/// is returned as-is. A `;` starts a comment token running to the end
/// of the line; comment tokens stay in the stream. Anything else is a
/// maximal run of characters outside the separator and special sets.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: usize,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            current: 0,
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = if let Some((idx, ch)) = self.peeked.take() {
            Some((idx, ch))
        } else {
            self.chars.next()
        };
        if let Some((idx, ch)) = next {
            self.current = idx + ch.len_utf8();
            Some((idx, ch))
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn skip_separators(&mut self) {
        while let Some((_, ch)) = self.peek() {
            if ch.is_whitespace() || ch == ',' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn token_from(&self, start: usize) -> Token {
        Token {
            text: self.source[start..self.current].to_string(),
            span: SourceSpan::new(start, self.current),
        }
    }

    fn string_token(&mut self, start: usize) -> Token {
        // The closing quote is optional; escaped characters are kept
        // raw and only guard quote termination.
        while let Some((_, ch)) = self.bump() {
            match ch {
                '"' => break,
                '\\' => {
                    self.bump();
                }
                _ => {}
            }
        }
        self.token_from(start)
    }

    fn comment_token(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
        self.token_from(start)
    }

    fn symbol_token(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.peek() {
            if is_separator(ch) {
                break;
            }
            self.bump();
        }
        self.token_from(start)
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_separators();
            let (start, ch) = match self.bump() {
                Some(pair) => pair,
                None => break,
            };
            let token = match ch {
                '~' if matches!(self.peek(), Some((_, '@'))) => {
                    self.bump();
                    self.token_from(start)
                }
                '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '`' | '~' | '^' | '@' | '!' | '$'
                | '#' => self.token_from(start),
                '"' => self.string_token(start),
                ';' => self.comment_token(start),
                _ => self.symbol_token(start),
            };
            tokens.push(token);
        }
        tokens
    }
}

/// Characters that end a symbol run. Note that `~ ^ @ ! $ #` are
/// single tokens only at the start of a run; inside one they continue
/// it.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | '`' | ',' | ';'
        )
}
