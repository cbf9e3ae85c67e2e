use std::{fmt, rc::Rc};

use crate::{
    diagnostics::{Result, TansyError},
    environment::Environment,
    runtime,
};

/// A runtime value. Lists double as the parsed representation of code,
/// so the same kind set serves both the reader and the evaluator.
#[derive(Clone)]
pub struct Value(pub Rc<ValueKind>);

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self(Rc::new(kind))
    }

    pub fn nil() -> Self {
        Self::new(ValueKind::Nil)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(ValueKind::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::String(value.into()))
    }

    pub fn symbol(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Symbol(value.into()))
    }

    pub fn list(values: Vec<Value>) -> Self {
        Self::new(ValueKind::List(values))
    }

    /// Wraps a host procedure as a callable value. The callback
    /// receives the evaluation environment and the *unevaluated*
    /// argument forms, or `(None, None)` under the doc probe.
    pub fn native<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(Option<&mut Environment>, Option<&[Value]>) -> Result<Value> + 'static,
    {
        Self::new(ValueKind::Callable(Callable::Native(NativeFunction {
            name: name.into(),
            callback: Rc::new(callback),
        })))
    }

    /// Truthiness rule of the language: non-empty strings, non-zero
    /// numbers, and `true` are truthy; every other kind is falsy.
    pub fn is_truthy(&self) -> bool {
        match &*self.0 {
            ValueKind::Bool(b) => *b,
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::String(s) => !s.is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &*self.0 {
            ValueKind::Nil => "Nil",
            ValueKind::Bool(_) => "Bool",
            ValueKind::Number(_) => "Number",
            ValueKind::String(_) => "String",
            ValueKind::Symbol(_) => "Symbol",
            ValueKind::List(_) => "List",
            ValueKind::Callable(_) => "Function",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::String(s) => write!(f, "\"{s}\""),
            ValueKind::List(values) => {
                write!(f, "(")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value:?}")?;
                }
                write!(f, ")")
            }
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Nil => write!(f, "nil"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Number(n) => write!(f, "{n}"),
            ValueKind::String(s) => write!(f, "{s}"),
            ValueKind::Symbol(s) => write!(f, "{s}"),
            ValueKind::List(values) => {
                write!(f, "(")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
            ValueKind::Callable(Callable::Native(fun)) => write!(f, "<native fn {}>", fun.name),
            ValueKind::Callable(Callable::Lambda(fun)) => write!(f, "<fn {}>", fun.name),
        }
    }
}

#[derive(Clone)]
pub enum ValueKind {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(String),
    List(Vec<Value>),
    Callable(Callable),
}

/// A native or user-defined procedure. Both share one calling
/// convention: the callee receives the environment and the unevaluated
/// argument forms, and decides itself which of them to evaluate.
#[derive(Clone)]
pub enum Callable {
    Native(NativeFunction),
    Lambda(LambdaFunction),
}

impl Callable {
    pub fn call(&self, env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
        match self {
            Callable::Native(fun) => (fun.callback)(env, args),
            Callable::Lambda(fun) => fun.call(env, args),
        }
    }
}

pub type NativeCallback = Rc<dyn Fn(Option<&mut Environment>, Option<&[Value]>) -> Result<Value>>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub callback: NativeCallback,
}

/// A procedure defined with `defun`. The body is a single form; it is
/// evaluated against a child of whatever environment the call happens
/// in, with the parameters bound positionally.
#[derive(Clone)]
pub struct LambdaFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Value,
}

impl LambdaFunction {
    fn call(&self, env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
        let args = args.unwrap_or_default();
        if self.params.len() > args.len() {
            return Err(TansyError::Arity(self.name.clone()));
        }
        let mut scratch = Environment::new();
        let env = match env {
            Some(env) => env,
            None => &mut scratch,
        };
        // Every argument form is evaluated, including extras beyond the
        // declared parameter count; only the first params.len() values
        // are bound.
        let values = runtime::eval_args(env, args)?;
        let binds = self.params.iter().cloned().zip(values);
        let mut child = env.child(binds);
        runtime::eval_form(&mut child, &self.body)
    }
}

/// How a callable was entered. A normal call carries the evaluation
/// environment and the unevaluated argument forms; the doc probe
/// carries neither and requests the callable's documentation text
/// instead of execution. A zero-argument call is `Call` with an empty
/// slice, never `DocProbe`.
pub enum Invocation<'a> {
    Call(&'a mut Environment, &'a [Value]),
    DocProbe,
}

impl<'a> Invocation<'a> {
    pub fn of(env: Option<&'a mut Environment>, args: Option<&'a [Value]>) -> Self {
        match (env, args) {
            (Some(env), Some(args)) => Invocation::Call(env, args),
            _ => Invocation::DocProbe,
        }
    }
}
