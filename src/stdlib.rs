use crate::{
    diagnostics::{Result, TansyError},
    environment::Environment,
    runtime::{eval_args, eval_form},
    value::{Callable, Invocation, LambdaFunction, Value, ValueKind},
};

/// Installs the builtin table into an environment. Hosts overlay their
/// own callables on top of this; the table itself is rebuilt fresh for
/// every session.
pub fn install(env: &mut Environment) {
    env.define("nil", Value::nil());
    env.define("true", Value::bool(true));
    env.define("false", Value::bool(false));
    env.define("env", Value::native("env", env_names));
    env.define("doc", Value::native("doc", doc));
    env.define("exit", Value::native("exit", exit));
    env.define("+", Value::native("+", add));
    env.define("-", Value::native("-", sub));
    env.define("*", Value::native("*", mul));
    env.define("/", Value::native("/", div));
    env.define("str", Value::native("str", str_concat));
    env.define("print", Value::native("print", print));
    env.define("defun", Value::native("defun", defun));
    env.define("list", Value::native("list", list));
    env.define("first", Value::native("first", first));
    env.define("rest", Value::native("rest", rest));
    env.define("nth", Value::native("nth", nth));
    env.define("length", Value::native("length", length));
    env.define("empty?", Value::native("empty?", empty));
    env.define("let", Value::native("let", let_bind));
    env.define("if", Value::native("if", if_else));
    env.define(">", Value::native(">", gt));
    env.define(">=", Value::native(">=", gte));
    env.define("<", Value::native("<", lt));
    env.define("<=", Value::native("<=", lte));
    env.define("not", Value::native("not", not));
    env.define("eq", Value::native("eq", eq));
    env.define("and", Value::native("and", and));
    env.define("or", Value::native("or", or));
}

fn number_of(value: &Value) -> Result<f64> {
    match &*value.0 {
        ValueKind::Number(n) => Ok(*n),
        _ => Err(TansyError::Type(format!(
            "arithmetic performed on non-numeric value {value}"
        ))),
    }
}

fn arithmetic(
    env: Option<&mut Environment>,
    args: Option<&[Value]>,
    op: fn(f64, f64) -> f64,
) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        // Arithmetic builtins carry no documentation; the probe takes
        // the zero-argument path.
        return Ok(Value::number(0.0));
    };
    if args.is_empty() {
        return Ok(Value::number(0.0));
    }
    let values = eval_args(env, args)?;
    let mut numbers = Vec::with_capacity(values.len());
    for value in &values {
        numbers.push(number_of(value)?);
    }
    let result = numbers[1..].iter().fold(numbers[0], |acc, n| op(acc, *n));
    Ok(Value::number(result))
}

fn add(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    arithmetic(env, args, |acc, n| acc + n)
}

fn sub(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    arithmetic(env, args, |acc, n| acc - n)
}

fn mul(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    arithmetic(env, args, |acc, n| acc * n)
}

fn div(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    arithmetic(env, args, |acc, n| acc / n)
}

fn comparison(
    env: Option<&mut Environment>,
    args: Option<&[Value]>,
    op: fn(f64, f64) -> bool,
) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Err(TansyError::Arity("comparison".into()));
    };
    if args.len() != 2 {
        return Err(TansyError::Arity("comparison".into()));
    }
    let values = eval_args(env, args)?;
    let a = number_of(&values[0])?;
    let b = number_of(&values[1])?;
    Ok(Value::bool(op(a, b)))
}

fn gt(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    comparison(env, args, |a, b| a > b)
}

fn gte(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    comparison(env, args, |a, b| a >= b)
}

fn lt(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    comparison(env, args, |a, b| a < b)
}

fn lte(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    comparison(env, args, |a, b| a <= b)
}

fn str_concat(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "str will convert and combine its arguments and return the resulting string.\n\
             Any value that is not already a string is converted first.\n\n\
             Usage:   (str n0 [n1 n2 ...])\n\
             Example: (str \"hello\" \" \" \"world\")\n         => \"hello world\"",
        ));
    };
    let values = eval_args(env, args)?;
    let mut output = String::new();
    for value in &values {
        output.push_str(&value.to_string());
    }
    Ok(Value::string(output))
}

fn print(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "print will convert and combine its arguments and write the result to\n\
             stdout. Any value that is not already a string is converted first.\n\n\
             Usage:   (print n0 [n1 n2 ...])\n\
             Example: (print \"hello\" \" \" \"world\")",
        ));
    };
    let text = str_concat(Some(env), Some(args))?;
    println!("{text}");
    Ok(Value::nil())
}

fn list(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(_, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "list will create a data list from the provided data.\n\n\
             Usage:   (list n0 [n1 n2 ...])\n\
             Example: (list 1 22 \"hello\" \"world\" false)\n\
             \x20        => (1 22 \"hello\" \"world\" false)",
        ));
    };
    // Argument forms pass through unevaluated, like any other call.
    Ok(Value::list(args.to_vec()))
}

fn first(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "first will return the first item of a list.\n\n\
             Usage:   (first list)\n\
             Example: (first (list 1 2 3))\n         => 1",
        ));
    };
    if args.is_empty() {
        return Err(TansyError::Arity("first".into()));
    }
    let value = eval_form(env, &args[0])?;
    let ValueKind::List(items) = &*value.0 else {
        return Err(TansyError::Type(format!(
            "cannot perform list actions on non list {}",
            args[0]
        )));
    };
    Ok(items.first().cloned().unwrap_or_else(Value::nil))
}

fn rest(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "rest will return the provided list without its first element.\n\n\
             Usage:   (rest list)\n\
             Example: (rest (list 1 2 3))\n         => (2 3)",
        ));
    };
    if args.is_empty() {
        return Err(TansyError::Arity("rest".into()));
    }
    let value = eval_form(env, &args[0])?;
    let ValueKind::List(items) = &*value.0 else {
        return Err(TansyError::Type(format!(
            "cannot perform list actions on non list {}",
            args[0]
        )));
    };
    if items.is_empty() {
        return Err(TansyError::Index(
            "cannot take the rest of an empty list".into(),
        ));
    }
    Ok(Value::list(items[1..].to_vec()))
}

fn nth(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "nth will return the element at the index provided. If the index is\n\
             negative or beyond the length of the list, nil is returned.\n\n\
             Usage:   (nth n list)\n\
             Example: (nth 1 (list 1 2 3))\n         => 2",
        ));
    };
    if args.len() < 2 {
        return Err(TansyError::Arity("nth".into()));
    }
    let index = eval_form(env, &args[0])?;
    let ValueKind::Number(n) = &*index.0 else {
        return Err(TansyError::Type(format!(
            "cannot index with non-number {}",
            args[0]
        )));
    };
    let value = eval_form(env, &args[1])?;
    let ValueKind::List(items) = &*value.0 else {
        return Err(TansyError::Type(format!(
            "cannot perform list actions on non list {}",
            args[1]
        )));
    };
    if *n < 0.0 || *n as usize >= items.len() {
        return Ok(Value::nil());
    }
    Ok(items[*n as usize].clone())
}

fn length(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "length will count the items in a countable value and return the count\n\
             as a number.\n\n\
             Usage:   (length list)\n\
             Example: (length (list 1 2 3))\n         => 3\n\
             \x20        (length \"my string\")\n         => 9",
        ));
    };
    if args.len() != 1 {
        return Err(TansyError::Arity("length".into()));
    }
    let value = eval_form(env, &args[0])?;
    match &*value.0 {
        ValueKind::String(text) => Ok(Value::number(text.chars().count() as f64)),
        ValueKind::List(items) => Ok(Value::number(items.len() as f64)),
        _ => Err(TansyError::Type(format!(
            "cannot check length on non countable {}",
            args[0]
        ))),
    }
}

fn empty(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "empty? will check whether a countable's length is zero.\n\n\
             Usage:   (empty? countable)\n\
             Example: (empty? (list 1 2 3))\n         => false\n\
             \x20        (empty? \"\")\n         => true",
        ));
    };
    if args.len() != 1 {
        return Err(TansyError::Arity("empty?".into()));
    }
    let value = length(Some(env), Some(args))?;
    let ValueKind::Number(n) = &*value.0 else {
        return Err(TansyError::Type(format!(
            "cannot check length on non countable {}",
            args[0]
        )));
    };
    Ok(Value::bool(*n == 0.0))
}

fn let_bind(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "let will bind variables in a child scope and return the value of the\n\
             body form evaluated within it.\n\n\
             Usage:   (let defns evalBody)\n\
             Example: (let ((x 22) (y 42)) (+ x y))",
        ));
    };
    if args.len() != 2 {
        return Err(TansyError::Arity("let".into()));
    }
    let ValueKind::List(settings) = &*args[0].0 else {
        return Err(TansyError::Type("malformed vars in let declaration".into()));
    };
    // All value forms are evaluated against the outer environment
    // before any binding is installed; bindings are parallel, not
    // sequential.
    let mut binds = Vec::with_capacity(settings.len());
    for setting in settings {
        let ValueKind::List(pair) = &*setting.0 else {
            return Err(TansyError::Type("malformed vars in let declaration".into()));
        };
        if pair.len() != 2 {
            return Err(TansyError::Type("malformed vars in let declaration".into()));
        }
        let ValueKind::Symbol(name) = &*pair[0].0 else {
            return Err(TansyError::Type(
                "cannot bind to non-symbol in let declaration".into(),
            ));
        };
        let value = eval_form(env, &pair[1])?;
        binds.push((name.clone(), value));
    }
    let mut child = env.child(binds);
    eval_form(&mut child, &args[1])
}

fn if_else(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "if is boolean control flow. The condition is evaluated for truthiness\n\
             and selects which branch form runs; a falsy condition with no else\n\
             branch yields nil.\n\n\
             Usage:   (if (booleanForm) (ifTrueBody) [(elseBody)])\n\
             Example: (if (eq x \"yes\") (print \"x is yes\") (print \"x is not yes\"))",
        ));
    };
    if args.len() < 2 {
        return Err(TansyError::Arity("if".into()));
    }
    let condition = eval_form(env, &args[0])?;
    if condition.is_truthy() {
        eval_form(env, &args[1])
    } else if args.len() > 2 {
        eval_form(env, &args[2])
    } else {
        Ok(Value::nil())
    }
}

fn not(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Err(TansyError::Arity("not".into()));
    };
    if args.len() != 1 {
        return Err(TansyError::Arity("not".into()));
    }
    let value = eval_form(env, &args[0])?;
    Ok(Value::bool(!value.is_truthy()))
}

fn eq(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "eq will compare two or more values and return true if they are all\n\
             equal, false otherwise. Values of different kinds are unequal.\n\n\
             Usage:   (eq n1 n2 [n3 n4 ...])\n\
             Example: (eq \"yes\" \"yes\" \"no\")\n         => false",
        ));
    };
    if args.len() < 2 {
        return Err(TansyError::Arity("eq".into()));
    }
    let values = eval_args(env, args)?;
    match &*values[0].0 {
        ValueKind::String(head) => Ok(Value::bool(values[1..]
            .iter()
            .all(|v| matches!(&*v.0, ValueKind::String(s) if s == head)))),
        ValueKind::Number(head) => Ok(Value::bool(values[1..]
            .iter()
            .all(|v| matches!(&*v.0, ValueKind::Number(n) if n == head)))),
        ValueKind::Bool(head) => Ok(Value::bool(values[1..]
            .iter()
            .all(|v| matches!(&*v.0, ValueKind::Bool(b) if b == head)))),
        _ => Err(TansyError::Type(format!("unable to compare {}", values[0]))),
    }
}

fn and(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "and will return true if every value passed to it evaluates to a truthy\n\
             value, false otherwise. With fewer than two arguments nothing is\n\
             evaluated and the result is false.\n\n\
             Usage:   (and n1 n2 [n3 n4 ...])\n\
             Example: (and true \"truthy string\" 42)\n         => true",
        ));
    };
    if args.len() < 2 {
        return Ok(Value::bool(false));
    }
    let values = eval_args(env, args)?;
    Ok(Value::bool(values.iter().all(Value::is_truthy)))
}

fn or(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "or will return true if any value passed to it evaluates to a truthy\n\
             value, false otherwise. With fewer than two arguments nothing is\n\
             evaluated and the result is false.\n\n\
             Usage:   (or n1 n2 [n3 n4 ...])\n\
             Example: (or false \"\" 0 true)\n         => true",
        ));
    };
    if args.len() < 2 {
        return Ok(Value::bool(false));
    }
    let values = eval_args(env, args)?;
    Ok(Value::bool(values.iter().any(Value::is_truthy)))
}

fn defun(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "defun will define a callable fn in the current environment.\n\n\
             Usage:   (defun fnName (param1 param2 ...) (body))\n\
             Example:\n\n\
             \x20 (defun fibonacci (n)\n\
             \x20   (if (<= n 1)\n\
             \x20     1\n\
             \x20     (+ (fibonacci (- n 1)) (fibonacci (- n 2)))))\n\n\
             \x20 (fibonacci 5)",
        ));
    };
    if args.len() < 3 {
        return Err(TansyError::Arity("defun".into()));
    }
    let ValueKind::Symbol(name) = &*args[0].0 else {
        return Err(TansyError::Type(format!(
            "non-symbol bind value {}",
            args[0]
        )));
    };
    let ValueKind::List(param_defs) = &*args[1].0 else {
        return Err(TansyError::Type(format!(
            "improperly formatted fn, expected params, found {}",
            args[1]
        )));
    };
    let mut params = Vec::with_capacity(param_defs.len());
    for def in param_defs {
        let ValueKind::Symbol(param) = &*def.0 else {
            return Err(TansyError::Type(format!(
                "non-symbol function parameter {def}"
            )));
        };
        params.push(param.clone());
    }
    let lambda = LambdaFunction {
        name: name.clone(),
        params,
        body: args[2].clone(),
    };
    env.define(
        name.clone(),
        Value::new(ValueKind::Callable(Callable::Lambda(lambda))),
    );
    Ok(Value::nil())
}

fn env_names(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, _) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "env will output all of the defined symbols in the current environment.\n\n\
             Usage: (env)",
        ));
    };
    let mut names: Vec<&str> = env.names().collect();
    names.sort_unstable();
    println!("[{}]", names.join(" "));
    Ok(Value::nil())
}

fn doc(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(env, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "doc will return the documentation for a defined symbol if it exists.\n\n\
             Usage:   (doc fnName)\n\
             Example: (doc defun)",
        ));
    };
    if args.is_empty() {
        return Err(TansyError::Arity("doc".into()));
    }
    let value = eval_form(env, &args[0])?;
    let ValueKind::Callable(callable) = &*value.0 else {
        return Err(TansyError::Type(format!(
            "cannot provide documentation for non callable {}",
            args[0]
        )));
    };
    match callable.call(None, None) {
        Ok(text) if matches!(&*text.0, ValueKind::String(_)) => Ok(text),
        _ => Err(TansyError::Type(format!(
            "no documentation for {} defined",
            args[0]
        ))),
    }
}

fn exit(env: Option<&mut Environment>, args: Option<&[Value]>) -> Result<Value> {
    let Invocation::Call(_, args) = Invocation::of(env, args) else {
        return Ok(Value::string(
            "exit will end the execution of the program.\n\n\
             Usage: (exit [exitCode])",
        ));
    };
    // The status must be a literal number form; anything else falls
    // back to zero.
    let mut status = 0;
    if let Some(ValueKind::Number(code)) = args.first().map(|arg| &*arg.0) {
        status = *code as i32;
    }
    Err(TansyError::Exit(status))
}
