use scream::parse::{SyntaxError, UnexpectedEof};
use scream::{Failure, evaluate, parse, render};

fn eval(line: &str) -> Result<i64, Failure> {
    let tree = parse(line).unwrap_or_else(|e| panic!("`{line}` should parse: {e:?}"));
    evaluate(&tree)
}

fn is_syntax_error(line: &str) -> bool {
    match parse(line) {
        Ok(_) => false,
        Err(e) => {
            e.downcast_ref::<SyntaxError>().is_some() || e.downcast_ref::<UnexpectedEof>().is_some()
        }
    }
}

#[test]
fn adds() {
    assert_eq!(eval("+ 1 2"), Ok(3));
}

#[test]
fn division_by_zero() {
    let result = eval("/ 10 0");
    assert_eq!(result, Err(Failure::DivisionByZero));
    assert_eq!(render(&result), "error: division by zero");
}

#[test]
fn remainder_by_zero() {
    assert_eq!(eval("% 7 0"), Err(Failure::DivisionByZero));
}

#[test]
fn power() {
    assert_eq!(eval("^ 2 10"), Ok(1024));
    assert_eq!(eval("^ 2 -3"), Ok(1));
}

#[test]
fn bare_numeral_is_rejected() {
    assert!(is_syntax_error("42"));
    assert!(is_syntax_error("  7  "));
}

#[test]
fn leading_minus_is_an_operator_not_a_sign() {
    assert_eq!(parse("-42").unwrap().to_string(), "(- 42)");
    assert_eq!(eval("-42"), Ok(42));
}

#[test]
fn unbalanced_parentheses_are_rejected() {
    assert!(is_syntax_error("+ 1 ("));
    assert!(is_syntax_error("+ 1 (+ 2 3"));
    assert!(is_syntax_error("+ 1 2)"));
}

#[test]
fn reduction_matches_pairwise_from_the_left() {
    let cases = [
        ("-", vec![100, 7, 13, -4]),
        ("/", vec![1000, 3, -2, 5]),
        ("%", vec![1000, 77, 9]),
        ("*", vec![3, -4, 5, 6]),
        ("^", vec![2, 3, 2]),
    ];

    for (op, operands) in cases {
        let line = format!(
            "{op} {}",
            operands
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut expected = Ok(operands[0]);
        for rhs in &operands[1..] {
            let lhs = expected.unwrap();
            let nested = format!("{op} {lhs} {rhs}");
            expected = eval(&nested);
        }

        assert_eq!(eval(&line), expected, "{line}");
    }
}

#[test]
fn nested_groups_evaluate_inside_out() {
    assert_eq!(eval("* (+ 1 2) (- 10 (/ 8 4))"), Ok(24));
    assert_eq!(eval("- (* 10 10) (+ 1 1) (+ 1 1)"), Ok(96));
    assert_eq!(eval("+ -1 (- -2 3)"), Ok(-6));
}

#[test]
fn repeated_runs_agree() {
    let line = "+ (* 3 (^ 2 5)) (% 17 5) (/ 9 0)";
    let first = parse(line).unwrap();
    let second = parse(line).unwrap();
    assert_eq!(first, second);
    assert_eq!(evaluate(&first), evaluate(&second));
    assert_eq!(evaluate(&first), evaluate(&first));
}

#[test]
fn first_failure_short_circuits() {
    // the second operand would fail differently if it were evaluated
    assert_eq!(
        eval("+ (/ 1 0) 99999999999999999999"),
        Err(Failure::DivisionByZero)
    );
    assert_eq!(
        eval("+ 99999999999999999999 (/ 1 0)"),
        Err(Failure::MalformedNumeral)
    );
    assert_eq!(eval("- 1 (% 5 0) (^ 2 64)"), Err(Failure::DivisionByZero));
}

#[test]
fn overflow_is_an_error() {
    assert_eq!(eval("* 9223372036854775807 2"), Err(Failure::Overflow));
    assert_eq!(eval("^ 10 19"), Err(Failure::Overflow));
    assert_eq!(render(&eval("^ 10 19")), "error: integer overflow");
}

#[test]
fn interpret_renders_each_outcome() {
    assert_eq!(scream::interpret(None, "^ 3 4").unwrap(), "81");
    assert_eq!(
        scream::interpret(None, "+ 1 99999999999999999999").unwrap(),
        "error: invalid number"
    );
    assert!(scream::interpret(None, "+").is_err());
}

#[test]
fn deeply_nested_line_is_rejected_and_the_next_line_still_works() {
    let depth = 100_000;
    let line = format!("+ {}1{}", "(+ ".repeat(depth), ")".repeat(depth));
    assert!(is_syntax_error(&line));
    assert!(scream::interpret(None, &line).is_err());
    assert_eq!(scream::interpret(None, "+ 1 2").unwrap(), "3");
}

#[test]
fn nesting_at_the_limit_evaluates() {
    let depth = scream::parse::MAX_DEPTH;
    let line = format!("+ {}1{}", "(+ ".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&line), Ok(1));
}
