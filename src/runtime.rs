use crate::{
    diagnostics::{Result, TansyError},
    environment::Environment,
    reader::{ReadEvent, Reader},
    value::{Value, ValueKind},
};

/// Evaluates one form against an environment.
///
/// There is no special-form dispatch: a non-empty list evaluates its
/// head and hands the *unevaluated* tail to the resulting callable,
/// which decides which of its argument forms to evaluate and in what
/// order. Conditionals, binders, and user procedures all go through
/// this one path.
pub fn eval_form(env: &mut Environment, form: &Value) -> Result<Value> {
    match &*form.0 {
        ValueKind::List(forms) => {
            if forms.is_empty() {
                return Ok(Value::nil());
            }
            let head = eval_form(env, &forms[0])?;
            match &*head.0 {
                ValueKind::Callable(callable) => callable.call(Some(env), Some(&forms[1..])),
                _ => Err(TansyError::NotCallable(head.to_string())),
            }
        }
        ValueKind::Symbol(name) => env
            .get(name)
            .ok_or_else(|| TansyError::UndefinedSymbol(name.clone())),
        _ => Ok(form.clone()),
    }
}

/// Evaluates a sequence of forms in order, failing on the first error.
pub fn eval_args(env: &mut Environment, forms: &[Value]) -> Result<Vec<Value>> {
    forms.iter().map(|form| eval_form(env, form)).collect()
}

/// Tokenizes the whole source once, then reads and evaluates top-level
/// forms until the stream is exhausted. Returns the last value, or the
/// first error.
pub fn eval_source(env: &mut Environment, source: &str) -> Result<Value> {
    let mut reader = Reader::new(source);
    let mut last = Value::nil();
    loop {
        match reader.read()? {
            ReadEvent::EndOfInput => return Ok(last),
            ReadEvent::EndOfForm => return Err(TansyError::UnexpectedClose),
            ReadEvent::Form(form) => last = eval_form(env, &form)?,
        }
    }
}

/// Result of feeding one line to the incremental driver.
#[derive(Debug)]
pub enum LineOutcome {
    Complete(Value),
    /// The buffered input still has an open list; feed another line.
    Incomplete,
}

/// An evaluation session: the root environment plus the pending buffer
/// for line-at-a-time input.
///
/// The root environment lives for the session; `defun` at top level
/// mutates it in place, so definitions persist across `eval_source`
/// calls. Child scopes never escape their evaluation.
pub struct Interpreter {
    env: Environment,
    pending: String,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            env: Environment::standard(),
            pending: String::new(),
        }
    }

    /// Builds a session with host procedures overlaid onto the builtin
    /// table. Host bindings shadow builtins of the same name.
    pub fn with_bindings(bindings: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut interpreter = Self::new();
        interpreter.env.extend(bindings);
        interpreter
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        eval_source(&mut self.env, source)
    }

    /// Appends one line of input and attempts evaluation of the whole
    /// pending buffer. An open list keeps the buffer for the next line;
    /// any other outcome clears it.
    pub fn eval_line(&mut self, line: &str) -> Result<LineOutcome> {
        self.pending.push_str(line);
        self.pending.push(' ');
        match eval_source(&mut self.env, &self.pending) {
            Err(TansyError::Underflow) => Ok(LineOutcome::Incomplete),
            Ok(value) => {
                self.pending.clear();
                Ok(LineOutcome::Complete(value))
            }
            Err(err) => {
                self.pending.clear();
                Err(err)
            }
        }
    }

    /// True while `eval_line` is waiting for a list to be closed.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Discards buffered incomplete input.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
