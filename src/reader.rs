use crate::{
    diagnostics::{Result, TansyError},
    lexer::{Lexer, Token},
    value::Value,
};

/// One step of reading: a complete form, the closing paren of the list
/// currently being read, or the end of the token stream. An opened
/// list that runs out of tokens before closing is not an event but the
/// `Underflow` error, which interactive drivers treat as a request for
/// more input.
#[derive(Debug)]
pub enum ReadEvent {
    Form(Value),
    EndOfForm,
    EndOfInput,
}

/// Consumes a token stream one top-level form at a time.
///
/// Each `read` call takes exactly one form's worth of tokens (or
/// signals how it fell short), which is what lets the driver evaluate
/// a multi-form source incrementally and lets a REPL detect "still
/// inside a list" across input lines.
pub struct Reader {
    tokens: Vec<Token>,
    current: usize,
}

impl Reader {
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            current: 0,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    pub fn read(&mut self) -> Result<ReadEvent> {
        let token = match self.advance() {
            Some(token) => token,
            None => return Ok(ReadEvent::EndOfInput),
        };
        match token.text.as_str() {
            ")" => Ok(ReadEvent::EndOfForm),
            "(" => {
                let mut forms = Vec::new();
                loop {
                    match self.read()? {
                        ReadEvent::Form(form) => forms.push(form),
                        ReadEvent::EndOfForm => return Ok(ReadEvent::Form(Value::list(forms))),
                        ReadEvent::EndOfInput => return Err(TansyError::Underflow),
                    }
                }
            }
            text => Ok(ReadEvent::Form(atom(text)?)),
        }
    }
}

fn atom(text: &str) -> Result<Value> {
    if looks_numeric(text) {
        return text
            .parse::<f64>()
            .map(Value::number)
            .map_err(|_| TansyError::MalformedNumber(text.to_string()));
    }
    if is_quote_wrapped(text) {
        let inner = text.trim_matches(|ch| ch == '"' || ch == '\'');
        return Ok(Value::string(inner));
    }
    Ok(Value::symbol(text))
}

/// The numeric literal grammar: an optional leading `-`, then either
/// digits with an optional fractional part, or a leading `.` with
/// digits.
fn looks_numeric(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    if let Some(fraction) = unsigned.strip_prefix('.') {
        return !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit());
    }
    let (integral, fraction) = match unsigned.split_once('.') {
        Some((integral, fraction)) => (integral, fraction),
        None => (unsigned, ""),
    };
    !integral.is_empty()
        && integral.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn is_quote_wrapped(text: &str) -> bool {
    (text.starts_with('"') && text.ends_with('"'))
        || (text.starts_with('\'') && text.ends_with('\''))
}
