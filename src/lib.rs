//! Core library for the tansy scripting language: a minimal
//! lisp-family engine meant to be embedded by a host that overlays its
//! own native procedures onto the builtin table. Implements lexing,
//! reading, evaluation, and REPL utilities.

pub mod diagnostics;
pub mod environment;
pub mod lexer;
pub mod reader;
pub mod repl;
pub mod runtime;
pub mod stdlib;
pub mod value;

pub use diagnostics::{Result, SourceSpan, TansyError};
pub use environment::Environment;
pub use repl::Repl;
pub use runtime::{Interpreter, LineOutcome};
pub use value::{Callable, Invocation, Value, ValueKind};
