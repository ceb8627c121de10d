//! Evaluation tests

use std::sync::Arc;

use pretty_assertions::assert_eq;
use qfa::environment::Environment;
use qfa::error::RuntimeError;
use qfa::object::{final_value, Object, ObjectRef, FALSE, NULL, TRUE};
use qfa::run_source;

fn eval_source(source: &str) -> Vec<ObjectRef> {
    let mut environment = Environment::new();
    run_source(source, &mut environment).expect("source should parse")
}

fn eval_last(source: &str) -> ObjectRef {
    let results = eval_source(source);
    final_value(results.last().expect("at least one result"))
}

#[test]
fn test_integer_expressions() {
    let cases = [
        ("5", 5),
        ("-5", -5),
        ("2 * (5 + 10)", 30),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("-50 + 100 + -50", 0),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("7 / 2", 3),
        ("-7 / 2", -3),
    ];

    for (source, expected) in cases {
        assert_eq!(*eval_last(source), Object::Integer(expected), "source: {source}");
    }
}

#[test]
fn test_boolean_expressions_use_singletons() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 <= 1", true),
        ("2 >= 3", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("true == true", true),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("!true", false),
        ("!!true", true),
    ];

    for (source, expected) in cases {
        let value = eval_last(source);
        let singleton = if expected { &*TRUE } else { &*FALSE };
        assert!(Arc::ptr_eq(&value, singleton), "source: {source}");
    }
}

#[test]
fn test_let_and_identifier() {
    let results = eval_source("let a = 5; a;");
    assert_eq!(*results[1], Object::Integer(5));

    assert_eq!(*eval_last("let a = 5; a = a + 1; a;"), Object::Integer(6));
    assert_eq!(
        *eval_last("let a = 5; let b = a * 2; let c = a + b; c;"),
        Object::Integer(15)
    );
}

#[test]
fn test_error_stops_program() {
    let results = eval_source("5 + true; 5;");
    assert_eq!(results.len(), 1);
    assert_eq!(
        *results[0],
        Object::Error(RuntimeError::TypeMismatch {
            left: qfa::object::ObjectType::Integer,
            operator: qfa::expr::InfixOperator::Plus,
            right: qfa::object::ObjectType::Boolean,
        })
    );
    assert_eq!(results[0].to_string(), "ERROR: type mismatch: INTEGER+BOOLEAN");
}

#[test]
fn test_runtime_error_messages() {
    let cases = [
        ("foobar", "identifier not found: foobar"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("!5", "unknown operator: !INTEGER"),
        ("true + false", "unknown operator: BOOLEAN+BOOLEAN"),
        ("true > false; 5", "unknown operator: BOOLEAN>BOOLEAN"),
        ("5; true + 5", "type mismatch: BOOLEAN+INTEGER"),
        ("if (10 > 1) { true + false; 5 }", "unknown operator: BOOLEAN+BOOLEAN"),
        ("10 / 0", "division by zero"),
        ("9223372036854775807 + 1", "integer overflow"),
    ];

    for (source, expected) in cases {
        let results = eval_source(source);
        let last = results.last().expect("at least one result");
        let error = last.as_error().unwrap_or_else(|| panic!("no error for {source}"));
        assert_eq!(error.to_string(), expected, "source: {source}");
    }
}

#[test]
fn test_if_else_takes_one_branch() {
    assert_eq!(*eval_last("if (1 < 2) { 10 } else { 20 }"), Object::Integer(10));
    assert_eq!(*eval_last("if (2 < 1) { 10 } else { 20 }"), Object::Integer(20));
    assert_eq!(*eval_last("if (true) { 10 }"), Object::Integer(10));
}

#[test]
fn test_untaken_branch_leaves_environment_alone() {
    let mut environment = Environment::new();
    let results = run_source(
        "if (2 < 1) { let x = 1; 10 } else { let y = 2; 20 }",
        &mut environment,
    )
    .unwrap();
    assert_eq!(*final_value(&results[0]), Object::Integer(20));
    assert!(!environment.contains("x"));
    assert!(environment.contains("y"));
}

#[test]
fn test_only_true_singleton_is_truthy() {
    assert_eq!(*eval_last("if (1) { 10 } else { 20 }"), Object::Integer(20));
    assert_eq!(*eval_last("if (false) { 10 } else { 20 }"), Object::Integer(20));
    let missing_else = eval_last("if (1 > 2) { 10 }");
    assert!(Arc::ptr_eq(&missing_else, &NULL));
}

#[test]
fn test_return_stops_program() {
    let results = eval_source("9; return 2 * 5; 9;");
    assert_eq!(results.len(), 2);
    assert_eq!(*results[1], Object::Return(Object::integer(10)));
}

#[test]
fn test_return_inside_nested_blocks() {
    let source = "
        if (10 > 1) {
            if (10 > 1) {
                return 10;
            }
            return 1;
        }
        99;
    ";
    let results = eval_source(source);
    assert_eq!(results.len(), 1);
    assert!(results[0].is_unwinding());
    assert_eq!(*final_value(&results[0]), Object::Integer(10));
}

#[test]
fn test_block_keeps_values_before_early_exit() {
    let results = eval_source("if (true) { 1; 2; return 3; 4; }");
    match &*results[0] {
        Object::Block(block) => {
            assert!(block.early_exit);
            let shown: Vec<String> = block.values.iter().map(|v| v.to_string()).collect();
            assert_eq!(shown, vec!["1", "2", "3"]);
        }
        other => panic!("expected block result, got {other:?}"),
    }
}

#[test]
fn test_while_counter_loop() {
    let source = "
        let i = 0;
        let total = 0;
        while (i < 5) {
            i = i + 1;
            total = total + i;
        }
        total;
    ";
    assert_eq!(*eval_last(source), Object::Integer(15));
}

#[test]
fn test_while_with_false_condition_never_runs_body() {
    let mut environment = Environment::new();
    run_source("while (false) { let touched = 1; }", &mut environment).unwrap();
    assert!(!environment.contains("touched"));
}

#[test]
fn test_return_inside_while_stops_loop_and_program() {
    let source = "
        let i = 0;
        while (true) {
            i = i + 1;
            if (i == 3) { return i * 10; }
        }
        99;
    ";
    let results = eval_source(source);
    assert_eq!(results.len(), 2);
    assert!(results[1].is_unwinding());
    assert_eq!(*final_value(&results[1]), Object::Integer(30));
}

#[test]
fn test_error_inside_while_stops_loop() {
    let mut environment = Environment::new();
    let results = run_source(
        "let i = 0; while (i < 10) { i = i + 1; if (i == 2) { i + true; } } i;",
        &mut environment,
    )
    .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[1].as_error().map(|e| e.to_string()),
        Some("type mismatch: INTEGER+BOOLEAN".to_string())
    );
    assert_eq!(*environment.get("i").unwrap(), Object::Integer(2));
}

#[test]
fn test_while_condition_error_is_reported() {
    let results = eval_source("while (missing) { 1; }");
    assert_eq!(
        results[0].as_error(),
        Some(&RuntimeError::IdentifierNotFound("missing".into()))
    );
}

#[test]
fn test_environment_persists_between_runs() {
    let mut environment = Environment::new();
    run_source("let counter = 1;", &mut environment).unwrap();
    run_source("counter = counter * 10;", &mut environment).unwrap();
    let results = run_source("counter", &mut environment).unwrap();
    assert_eq!(*results[0], Object::Integer(10));
}

#[test]
fn test_parse_errors_skip_evaluation() {
    let mut environment = Environment::new();
    let errors = run_source("let a = 1; let = 5;", &mut environment).unwrap_err();
    assert!(!errors.is_empty());
    assert!(!environment.contains("a"));
}
