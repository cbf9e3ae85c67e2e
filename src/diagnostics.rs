use thiserror::Error;

/// Represents a byte span within a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Unified error type for the tansy engine.
///
/// `Underflow` is the one recoverable condition: a list was opened but
/// the token stream ran out before it was closed, so an interactive
/// driver should request more input instead of aborting. `Exit` is
/// raised by the `exit` builtin and is expected to end the hosting
/// process; nothing inside evaluation catches it.
#[derive(Debug, Error)]
pub enum TansyError {
    /// Reserved. The current token grammar cannot fail to lex.
    #[error("lexical error: {0}")]
    Lex(String),
    #[error("malformed number `{0}`")]
    MalformedNumber(String),
    #[error("underflow, expected end of list was not found")]
    Underflow,
    #[error("unexpected `)` outside of a list")]
    UnexpectedClose,
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),
    #[error("`{0}` is not callable")]
    NotCallable(String),
    #[error("not enough arguments provided to `{0}`")]
    Arity(String),
    #[error("{0}")]
    Type(String),
    #[error("{0}")]
    Index(String),
    #[error("exit requested with status {0}")]
    Exit(i32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TansyError {
    /// True when the error asks the driver for more input rather than
    /// reporting a failure.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, TansyError::Underflow)
    }
}

pub type Result<T> = std::result::Result<T, TansyError>;
