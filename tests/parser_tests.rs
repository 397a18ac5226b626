// tests/parser_tests.rs

use mexpr::ast::{Ast, Expr, NodeId, Span};
use mexpr::{ErrorKind, Lexer, Parser, parse};
use pretty_assertions::assert_eq;

/// Renders a compiled tree as an s-expression.
fn sexpr(ast: &Ast, id: NodeId) -> String {
    match ast.expr(id) {
        Expr::Literal(value) => value.to_string(),
        Expr::Identifier(name) => name.clone(),
        Expr::FieldSelect { object, field } => {
            format!("(. {} {})", sexpr(ast, *object), sexpr(ast, *field))
        }
        Expr::Index { object, index } => {
            format!("([] {} {})", sexpr(ast, *object), sexpr(ast, *index))
        }
        Expr::Slice { start, end } => format!("(: {} {})", sexpr(ast, *start), sexpr(ast, *end)),
        Expr::Unary { op, operand } => format!("({} {})", op, sexpr(ast, *operand)),
        Expr::BinaryOp { op, left, right } => {
            format!("({} {} {})", op, sexpr(ast, *left), sexpr(ast, *right))
        }
        Expr::Where { items, predicate } => {
            format!("(where {} {})", sexpr(ast, *items), sexpr(ast, *predicate))
        }
    }
}

fn tree(source: &str) -> String {
    let ast = parse(source, None).unwrap_or_else(|e| panic!("{}\n{}", source, e.pretty(source)));
    sexpr(&ast, ast.root())
}

fn parse_error(source: &str) -> (String, usize) {
    let err = parse(source, None).unwrap_err();
    assert!(
        matches!(err.kind(), ErrorKind::Parse | ErrorKind::Lex),
        "{:?}",
        err
    );
    (err.message(), err.offset())
}

// ============================================================================
// Operands
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(tree("42"), "42");
    assert_eq!(tree("1_000.5"), "1000.5");
    assert_eq!(tree(".25"), "0.25");
    assert_eq!(tree(r#""hi""#), r#""hi""#);
    assert_eq!(tree("foo"), "foo");
    assert_eq!(tree("@"), "@");
}

#[test]
fn test_grouping() {
    assert_eq!(tree("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    assert_eq!(tree("((foo))"), "foo");
}

// ============================================================================
// Precedence and Associativity
// ============================================================================

#[test]
fn test_arithmetic_precedence() {
    let test_cases = vec![
        ("1 + 2 * 3", "(+ 1 (* 2 3))"),
        ("1 * 2 + 3", "(+ (* 1 2) 3)"),
        ("1 - 2 - 3", "(- (- 1 2) 3)"),
        ("8 / 4 / 2", "(/ (/ 8 4) 2)"),
        ("2 * 3 ^ 2", "(* 2 (^ 3 2))"),
        ("7 % 3 + 1", "(+ (% 7 3) 1)"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tree(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(tree("2 ^ 3 ^ 2"), "(^ 2 (^ 3 2))");
}

#[test]
fn test_unary_sign() {
    assert_eq!(tree("-1"), "(- 1)");
    assert_eq!(tree("+foo"), "(+ foo)");
    assert_eq!(tree("-2 ^ 2"), "(- (^ 2 2))");
    assert_eq!(tree("1 - -1"), "(- 1 (- 1))");
}

#[test]
fn test_logical_precedence() {
    assert_eq!(tree("a or b and c"), "(or a (and b c))");
    assert_eq!(tree("a and b or c"), "(or (and a b) c)");
    assert_eq!(tree("a == 1 and b != 2"), "(and (== a 1) (!= b 2))");
    assert_eq!(tree("a < 1 or a >= 10"), "(or (< a 1) (>= a 10))");
}

#[test]
fn test_string_compare_precedence() {
    assert_eq!(tree(r#"name startsWith "a" and 1"#), r#"(and (startsWith name "a") 1)"#);
    assert_eq!(tree("a in b == c"), "(in a (== b c))");
    assert_eq!(tree("tags contains id + 1"), "(contains tags (+ id 1))");
}

#[test]
fn test_not_binds_around_selectors() {
    assert_eq!(tree("not foo"), "(not foo)");
    assert_eq!(tree("not foo.bar"), "(not (. foo bar))");
    assert_eq!(tree("not a and b"), "(and (not a) b)");
    assert_eq!(tree("not not a"), "(not (not a))");
}

// ============================================================================
// Selectors
// ============================================================================

#[test]
fn test_field_select() {
    assert_eq!(tree("a.b"), "(. a b)");
    assert_eq!(tree("a.b.c"), "(. (. a b) c)");
    assert_eq!(tree("a.b + 1"), "(+ (. a b) 1)");
}

#[test]
fn test_index() {
    assert_eq!(tree("items[0]"), "([] items 0)");
    assert_eq!(tree("items[-1]"), "([] items (- 1))");
    assert_eq!(tree("items[0].name"), "(. ([] items 0) name)");
    assert_eq!(tree("a.items[i + 1]"), "(. a ([] items (+ i 1)))");
    assert_eq!(tree("grid[0][1]"), "([] ([] grid 0) 1)");
}

#[test]
fn test_slice() {
    let test_cases = vec![
        ("items[1:2]", "([] items (: 1 2))"),
        ("items[:2]", "([] items (: 0 2))"),
        ("items[2:]", "([] items (: 2 -1))"),
        ("items[:]", "([] items (: 0 -1))"),
        ("items[-2:]", "([] items (: (- 2) -1))"),
        ("items[a + 1:b]", "([] items (: (+ a 1) b))"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tree(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_where() {
    assert_eq!(tree("items where id > 3"), "(where items (> id 3))");
    assert_eq!(
        tree("items where price > 1 and name"),
        "(where items (and (> price 1) name))"
    );
    assert_eq!(tree("items where a or b"), "(where items (or a b))");
    assert_eq!(tree("(items where @ > 1)[0]"), "([] (where items (> @ 1)) 0)");
    assert_eq!(
        tree("orders where (items where qty > 1)"),
        "(where orders (where items (> qty 1)))"
    );
}

// ============================================================================
// Spans
// ============================================================================

#[test]
fn test_spans_point_at_operators() {
    let ast = parse("foo + bar[0]", None).unwrap();
    assert_eq!(ast.span(ast.root()), Span::new(4, 1));

    let children = ast.children(ast.root());
    assert_eq!(ast.span(children[0]), Span::new(0, 3));
    assert_eq!(ast.span(children[1]), Span::new(9, 1));
}

#[test]
fn test_ast_is_a_flat_arena() {
    let ast = parse("a.b + c[1:2]", None).unwrap();
    assert_eq!(ast.len(), 9);
    assert!(ast.root().index() < ast.len());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_incomplete_expression() {
    assert_eq!(parse_error(""), ("incomplete expression, EOF found".into(), 0));
    assert_eq!(parse_error("1 +"), ("incomplete expression, EOF found".into(), 3));
    assert_eq!(parse_error("not"), ("incomplete expression, EOF found".into(), 3));
}

#[test]
fn test_unexpected_closers() {
    assert_eq!(parse_error("1 + )"), ("unexpected right-paren".into(), 4));
    assert_eq!(parse_error("]"), ("unexpected right-bracket".into(), 0));
}

#[test]
fn test_missing_closers() {
    assert_eq!(
        parse_error("(1 + 2"),
        ("expected right-paren but found eof".into(), 6)
    );
    assert_eq!(
        parse_error("foo[1 2"),
        ("expected right-bracket but found number".into(), 6)
    );
}

#[test]
fn test_trailing_tokens() {
    assert_eq!(
        parse_error("foo]"),
        ("expected eof but found right-bracket".into(), 3)
    );
    assert_eq!(
        parse_error("foo bar"),
        ("expected eof but found identifier".into(), 4)
    );
}

#[test]
fn test_missing_right_operand() {
    assert_eq!(parse_error("1 + * 2"), ("missing right operand".into(), 4));
    assert_eq!(parse_error("a and or b"), ("missing right operand".into(), 6));
}

#[test]
fn test_unexpected_operator_at_start() {
    assert_eq!(parse_error("* 2"), ("unexpected mul-div `*`".into(), 0));
}

#[test]
fn test_bang_is_not_negation() {
    assert_eq!(
        parse_error("a ! b"),
        ("unknown operator `!`, use `not` for negation".into(), 2)
    );
}

#[test]
fn test_invalid_number() {
    assert_eq!(parse_error("1..2"), ("invalid number `1..2`".into(), 0));
}

#[test]
fn test_lex_errors_surface_through_parse() {
    let err = parse("a = 1", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lex);
    assert_eq!(err.pretty("a = 1"), "`=` should be `==`\na = 1\n  ^");
}

// ============================================================================
// Depth Limit
// ============================================================================

#[test]
fn test_deep_nesting_is_rejected() {
    let source = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    let (message, _) = parse_error(&source);
    assert_eq!(message, "expression too complex");

    let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(tree(&source), "1");
}

#[test]
fn test_long_operator_chains_count_towards_depth() {
    let source = vec!["1"; 250].join(" + ");
    assert!(parse(&source, None).is_ok());

    let source = vec!["1"; 300].join(" + ");
    let (message, _) = parse_error(&source);
    assert_eq!(message, "expression too complex");

    let parser = Parser::new(Lexer::new(&source)).unwrap().with_max_depth(400);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_custom_max_depth() {
    let parser = Parser::new(Lexer::new("1 + 2")).unwrap().with_max_depth(2);
    assert!(parser.parse().is_ok());

    let parser = Parser::new(Lexer::new("1 + 2 + 3")).unwrap().with_max_depth(2);
    let err = parser.parse().unwrap_err();
    assert_eq!(err.message(), "expression too complex");
}
