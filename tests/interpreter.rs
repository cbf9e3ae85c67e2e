use std::{cell::Cell, rc::Rc};

use tansy::{
    diagnostics::TansyError,
    environment::Environment,
    lexer::Lexer,
    runtime::{Interpreter, LineOutcome},
    value::{Invocation, Value, ValueKind},
};

fn eval(source: &str) -> Value {
    let mut interpreter = Interpreter::new();
    interpreter
        .eval_source(source)
        .expect("evaluation should succeed")
}

fn eval_error(source: &str) -> TansyError {
    let mut interpreter = Interpreter::new();
    match interpreter.eval_source(source) {
        Ok(value) => panic!("expected error, received value {value}"),
        Err(err) => err,
    }
}

fn expect_number(value: &Value) -> f64 {
    match value.0.as_ref() {
        ValueKind::Number(n) => *n,
        _ => panic!("expected Number, found {}", value.type_name()),
    }
}

fn expect_bool(value: &Value) -> bool {
    match value.0.as_ref() {
        ValueKind::Bool(b) => *b,
        _ => panic!("expected Bool, found {}", value.type_name()),
    }
}

fn expect_string(value: &Value) -> &str {
    match value.0.as_ref() {
        ValueKind::String(s) => s,
        _ => panic!("expected String, found {}", value.type_name()),
    }
}

fn expect_nil(value: &Value) {
    match value.0.as_ref() {
        ValueKind::Nil => {}
        _ => panic!("expected Nil, found {}", value.type_name()),
    }
}

fn token_texts(source: &str) -> Vec<String> {
    Lexer::new(source)
        .tokenize()
        .into_iter()
        .map(|token| token.text)
        .collect()
}

/// An interpreter with a `probe` native that counts its invocations
/// and returns true.
fn counting_interpreter() -> (Interpreter, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let calls = Rc::clone(&count);
    let interpreter = Interpreter::with_bindings([(
        "probe".to_string(),
        Value::native("probe", move |env, args| {
            let Invocation::Call(_, _) = Invocation::of(env, args) else {
                return Ok(Value::string("probe counts how often it is called."));
            };
            calls.set(calls.get() + 1);
            Ok(Value::bool(true))
        }),
    )]);
    (interpreter, count)
}

#[test]
fn lexer_splits_on_whitespace_and_commas() {
    assert_eq!(token_texts("(+ 1,2)"), vec!["(", "+", "1", "2", ")"]);
}

#[test]
fn lexer_special_characters_form_their_own_tokens() {
    assert_eq!(token_texts("~@ ~ '"), vec!["~@", "~", "'"]);
    assert_eq!(token_texts("!x"), vec!["!", "x"]);
    // Inside a run the same characters continue the symbol.
    assert_eq!(token_texts("a!b"), vec!["a!b"]);
}

#[test]
fn lexer_strings_keep_raw_text_and_optional_close() {
    assert_eq!(token_texts(r#""hello world""#), vec![r#""hello world""#]);
    assert_eq!(token_texts(r#""a\"b""#), vec![r#""a\"b""#]);
    assert_eq!(token_texts(r#""unterminated"#), vec![r#""unterminated"#]);
}

#[test]
fn lexer_comments_stay_in_the_stream() {
    assert_eq!(token_texts("; note\n42"), vec!["; note", "42"]);
}

#[test]
fn evaluates_arithmetic() {
    assert_eq!(expect_number(&eval("(+ 1 2 3)")), 6.0);
    assert_eq!(expect_number(&eval("(- 10 1 2)")), 7.0);
    assert_eq!(expect_number(&eval("(* 2 3 4)")), 24.0);
    assert_eq!(expect_number(&eval("(+)")), 0.0);
    assert_eq!(expect_number(&eval("(- 5)")), 5.0);
}

#[test]
fn division_by_zero_follows_float_rules() {
    assert!(expect_number(&eval("(/ 1 0)")).is_infinite());
    assert!(expect_number(&eval("(/ 0 0)")).is_nan());
}

#[test]
fn arithmetic_rejects_non_numbers() {
    let err = eval_error(r#"(+ 1 "two")"#);
    assert!(matches!(err, TansyError::Type(_)), "{err}");
}

#[test]
fn numeric_literals_round_trip() {
    assert_eq!(expect_number(&eval("42")), 42.0);
    assert_eq!(expect_number(&eval("-12.25")), -12.25);
    assert_eq!(expect_number(&eval(".5")), 0.5);
    assert_eq!(expect_number(&eval("-.5")), -0.5);
    assert_eq!(eval("42").to_string(), "42");
    assert_eq!(eval("-12.25").to_string(), "-12.25");
}

#[test]
fn almost_numeric_tokens_are_symbols() {
    let err = eval_error("1.2.3");
    assert!(matches!(err, TansyError::UndefinedSymbol(_)), "{err}");
    // A bare `-` is not numeric; it resolves to the subtraction builtin.
    assert_eq!(eval("-").type_name(), "Function");
}

#[test]
fn empty_list_evaluates_to_nil() {
    expect_nil(&eval("()"));
}

#[test]
fn head_must_be_callable() {
    let err = eval_error("(1 2)");
    assert!(matches!(err, TansyError::NotCallable(_)), "{err}");
}

#[test]
fn undefined_symbol_reports_its_name() {
    let err = eval_error("missing");
    assert!(format!("{err}").contains("missing"), "{err}");
}

#[test]
fn let_binds_in_parallel() {
    assert_eq!(expect_number(&eval("(let ((x 2) (y 3)) (* x y))")), 6.0);
    // A later binding's value form must not see an earlier one.
    let err = eval_error("(let ((x 1) (y x)) y)");
    assert!(matches!(err, TansyError::UndefinedSymbol(_)), "{err}");
}

#[test]
fn let_shadows_without_touching_outer_scope() {
    assert_eq!(expect_number(&eval("(let ((x 1)) (let ((x 2)) x))")), 2.0);
    assert_eq!(
        expect_number(&eval("(let ((x 1)) (+ (let ((x 2)) x) x))")),
        3.0
    );
}

#[test]
fn defun_persists_in_the_root_environment() {
    let mut interpreter = Interpreter::new();
    let value = interpreter
        .eval_source("(defun sq (n) (* n n)) (sq 5)")
        .expect("define and call");
    assert_eq!(expect_number(&value), 25.0);

    let again = interpreter.eval_source("(sq 2)").expect("sq persists");
    assert_eq!(expect_number(&again), 4.0);
}

#[test]
fn defun_inside_let_is_invisible_afterwards() {
    let err = eval_error("(let ((x 1)) (defun hidden (n) n)) (hidden 1)");
    assert!(matches!(err, TansyError::UndefinedSymbol(_)), "{err}");
}

#[test]
fn recursive_function_evaluates() {
    let value = eval(
        "(defun fibonacci (n) (if (<= n 1) 1 (+ (fibonacci (- n 1)) (fibonacci (- n 2))))) \
         (fibonacci 5)",
    );
    assert_eq!(expect_number(&value), 8.0);
}

#[test]
fn lambda_requires_declared_arity() {
    let err = eval_error("(defun two (a b) (+ a b)) (two 1)");
    assert!(matches!(err, TansyError::Arity(_)), "{err}");
}

#[test]
fn lambda_evaluates_extra_arguments_and_discards_them() {
    let (mut interpreter, count) = counting_interpreter();
    let value = interpreter
        .eval_source("(defun ident (a) a) (ident 7 (probe))")
        .expect("extra arguments evaluate");
    assert_eq!(expect_number(&value), 7.0);
    assert_eq!(count.get(), 1);
}

#[test]
fn eval_line_requests_continuation_for_open_lists() {
    let mut interpreter = Interpreter::new();
    match interpreter.eval_line("(+ 1").expect("incomplete is not an error") {
        LineOutcome::Incomplete => {}
        LineOutcome::Complete(value) => panic!("expected continuation, received {value}"),
    }
    assert!(interpreter.has_pending());
    match interpreter.eval_line(" 2)").expect("completed form") {
        LineOutcome::Complete(value) => assert_eq!(expect_number(&value), 3.0),
        LineOutcome::Incomplete => panic!("expected completed form"),
    }
    assert!(!interpreter.has_pending());
}

#[test]
fn eval_line_clears_buffer_after_errors() {
    let mut interpreter = Interpreter::new();
    interpreter
        .eval_line("(boom)")
        .expect_err("undefined symbol");
    assert!(!interpreter.has_pending());
    match interpreter.eval_line("(+ 1 1)").expect("fresh buffer") {
        LineOutcome::Complete(value) => assert_eq!(expect_number(&value), 2.0),
        LineOutcome::Incomplete => panic!("expected completed form"),
    }
}

#[test]
fn batch_eval_distinguishes_underflow_from_invalid_input() {
    let err = eval_error("(+ 1");
    assert!(err.is_incomplete(), "{err}");
    let err = eval_error(")");
    assert!(matches!(err, TansyError::UnexpectedClose), "{err}");
}

#[test]
fn list_passes_forms_through_unevaluated() {
    assert_eq!(expect_number(&eval("(length (list (+ 1 2)))")), 1.0);
    assert_eq!(expect_number(&eval("(first (list 1 2 3))")), 1.0);
}

#[test]
fn first_of_empty_list_is_nil() {
    expect_nil(&eval("(first (list))"));
}

#[test]
fn rest_of_empty_list_is_an_index_error() {
    let err = eval_error("(rest (list))");
    assert!(matches!(err, TansyError::Index(_)), "{err}");
    assert_eq!(eval("(rest (list 1 2 3))").to_string(), "(2 3)");
}

#[test]
fn nth_returns_nil_out_of_range() {
    expect_nil(&eval("(nth 5 (list 1 2))"));
    expect_nil(&eval("(nth -1 (list 1 2))"));
    assert_eq!(expect_number(&eval("(nth 1 (list 1 2 3))")), 2.0);
    // Indices truncate from a double.
    assert_eq!(expect_number(&eval("(nth 1.9 (list 1 2 3))")), 2.0);
}

#[test]
fn length_counts_characters_and_elements() {
    assert_eq!(expect_number(&eval(r#"(length "hello")"#)), 5.0);
    assert_eq!(expect_number(&eval("(length (list 1 2))")), 2.0);
    let err = eval_error("(length 1)");
    assert!(matches!(err, TansyError::Type(_)), "{err}");
}

#[test]
fn empty_checks_length() {
    assert!(expect_bool(&eval(r#"(empty? "")"#)));
    assert!(!expect_bool(&eval("(empty? (list 1))")));
}

#[test]
fn if_follows_the_truthiness_rule() {
    assert_eq!(expect_number(&eval("(if 0 1 2)")), 2.0);
    assert_eq!(expect_number(&eval(r#"(if "" 1 2)"#)), 2.0);
    assert_eq!(expect_number(&eval(r#"(if "x" 1 2)"#)), 1.0);
    assert_eq!(expect_number(&eval("(if true 1 2)")), 1.0);
    // Nil and lists are falsy; a falsy condition with no else is nil.
    expect_nil(&eval("(if (list 1) 1)"));
    expect_nil(&eval("(if nil 1)"));
}

#[test]
fn comparisons_require_two_numbers() {
    assert!(expect_bool(&eval("(> 2 1)")));
    assert!(expect_bool(&eval("(<= 2 2)")));
    let err = eval_error("(< 1)");
    assert!(matches!(err, TansyError::Arity(_)), "{err}");
    let err = eval_error(r#"(< 1 "2")"#);
    assert!(matches!(err, TansyError::Type(_)), "{err}");
}

#[test]
fn eq_compares_within_one_kind() {
    assert!(expect_bool(&eval("(eq 1 1 1)")));
    assert!(expect_bool(&eval(r#"(eq "a" "a")"#)));
    // A kind mismatch among compared values is false, not an error.
    assert!(!expect_bool(&eval(r#"(eq 1 1 "1")"#)));
    // Lists are not a comparable kind.
    let err = eval_error("(eq (list 1) (list 1))");
    assert!(matches!(err, TansyError::Type(_)), "{err}");
}

#[test]
fn not_negates_truthiness() {
    assert!(!expect_bool(&eval("(not true)")));
    assert!(expect_bool(&eval("(not 0)")));
    assert!(expect_bool(&eval("(not (list))")));
}

#[test]
fn and_or_with_too_few_arguments_evaluate_nothing() {
    let (mut interpreter, count) = counting_interpreter();
    assert!(!expect_bool(&interpreter.eval_source("(and (probe))").unwrap()));
    assert!(!expect_bool(&interpreter.eval_source("(or (probe))").unwrap()));
    assert_eq!(count.get(), 0);

    assert!(expect_bool(&interpreter.eval_source("(and (probe) (probe))").unwrap()));
    assert_eq!(count.get(), 2);
}

#[test]
fn and_or_fold_truthiness_without_short_circuit() {
    let (mut interpreter, count) = counting_interpreter();
    assert!(!expect_bool(&interpreter.eval_source("(and false (probe))").unwrap()));
    // No short-circuit: the second form still ran.
    assert_eq!(count.get(), 1);
    assert!(expect_bool(&interpreter.eval_source("(or true (probe))").unwrap()));
    assert_eq!(count.get(), 2);
}

#[test]
fn str_concatenates_stringified_values() {
    assert_eq!(expect_string(&eval(r#"(str "a" 1 true)"#)), "a1true");
    assert_eq!(expect_string(&eval("(str)")), "");
    assert_eq!(expect_string(&eval("(str (list 1 2))")), "(1 2)");
}

#[test]
fn doc_returns_documentation_text() {
    let text = eval("(doc doc)");
    assert!(expect_string(&text).contains("documentation"));
    let text = eval("(doc defun)");
    assert!(expect_string(&text).contains("Usage"));
}

#[test]
fn doc_reports_undocumented_and_non_callable_targets() {
    // Arithmetic and comparison builtins carry no documentation.
    let err = eval_error("(doc +)");
    assert!(format!("{err}").contains("no documentation"), "{err}");
    let err = eval_error("(doc <)");
    assert!(format!("{err}").contains("no documentation"), "{err}");
    let err = eval_error("(defun sq (n) (* n n)) (doc sq)");
    assert!(format!("{err}").contains("no documentation"), "{err}");
    let err = eval_error("(doc 1)");
    assert!(format!("{err}").contains("non callable"), "{err}");
}

#[test]
fn exit_raises_the_exit_signal() {
    let err = eval_error("(exit 3)");
    assert!(matches!(err, TansyError::Exit(3)), "{err}");
    let err = eval_error("(exit)");
    assert!(matches!(err, TansyError::Exit(0)), "{err}");
    // The status must be a literal number form.
    let err = eval_error(r#"(exit "9")"#);
    assert!(matches!(err, TansyError::Exit(0)), "{err}");
}

#[test]
fn comment_tokens_leak_into_evaluation() {
    // Comment tokens are not filtered from the stream; reaching the
    // reader they parse as symbols and fail lookup.
    let err = eval_error("; note\n(+ 1 1)");
    match err {
        TansyError::UndefinedSymbol(name) => assert_eq!(name, "; note"),
        other => panic!("expected undefined symbol, received {other}"),
    }
}

#[test]
fn quote_quirks_from_the_token_grammar() {
    // A lone quote token reads as the empty string.
    assert_eq!(expect_number(&eval("(length ')")), 0.0);
    // An unterminated string falls through to a symbol.
    let err = eval_error(r#""abc"#);
    assert!(matches!(err, TansyError::UndefinedSymbol(_)), "{err}");
    // Escapes are kept raw, guarding only quote termination.
    assert_eq!(expect_number(&eval(r#"(length "a\"b")"#)), 4.0);
}

#[test]
fn host_bindings_extend_the_root_environment() {
    let mut interpreter = Interpreter::with_bindings([(
        "greet".to_string(),
        Value::native("greet", |env, args| {
            let Invocation::Call(env, args) = Invocation::of(env, args) else {
                return Ok(Value::string("greet says hello.\n\nUsage: (greet name)"));
            };
            let values = tansy::runtime::eval_args(env, args)?;
            let name = values
                .first()
                .map(|value| value.to_string())
                .unwrap_or_else(|| "world".into());
            Ok(Value::string(format!("hello {name}")))
        }),
    )]);
    let value = interpreter
        .eval_source(r#"(greet (str "tan" "sy"))"#)
        .expect("host native evaluates its arguments");
    assert_eq!(expect_string(&value), "hello tansy");

    let text = interpreter.eval_source("(doc greet)").expect("host doc");
    assert!(expect_string(&text).contains("greet"));
}

#[test]
fn pure_evaluation_is_idempotent_across_environment_copies() {
    let mut original = Environment::standard();
    let mut copy = original.clone();

    let first = tansy::runtime::eval_source(&mut original, "(let ((x 2)) (* x 21))").unwrap();
    let second = tansy::runtime::eval_source(&mut copy, "(let ((x 2)) (* x 21))").unwrap();
    assert_eq!(expect_number(&first), 42.0);
    assert_eq!(expect_number(&second), 42.0);

    assert_eq!(original.len(), copy.len());
    let mut original_names: Vec<&str> = original.names().collect();
    let mut copy_names: Vec<&str> = copy.names().collect();
    original_names.sort_unstable();
    copy_names.sort_unstable();
    assert_eq!(original_names, copy_names);
}

#[test]
fn multi_form_source_returns_the_last_value() {
    assert_eq!(expect_number(&eval("(+ 1 1) (+ 2 2) (+ 3 3)")), 6.0);
}
