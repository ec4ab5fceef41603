use stencil::ast::{Arity, Node, NodeKind, DEFAULT_LABEL};
use stencil::error::Error;
use stencil::lexer::tokenize;
use stencil::parser::parse;

fn parse_source(source: &str) -> stencil::error::Result<Option<Box<Node>>> {
    parse(tokenize(source)?)
}

#[test]
fn test_empty_token_stream_yields_no_tree() {
    assert!(parse(Vec::new()).unwrap().is_none());
    assert!(parse_source("   \n").unwrap().is_none());
}

#[test]
fn test_content_chain() {
    let root = parse_source("a\nb\n").unwrap().unwrap();

    let expected = Node {
        kind: NodeKind::Content("a".to_string()),
        next: Some(Node::new(NodeKind::Content("b".to_string()))),
    };
    assert_eq!(*root, expected);
}

#[test]
fn test_conditional_shape() {
    let root = parse_source("%IF [ TRUE ] :\nA\n%ELSE:\nB\n%END").unwrap().unwrap();

    let expected = Node {
        kind: NodeKind::Conditional {
            condition: Node::new(NodeKind::Expression(Node::new(NodeKind::Literal(
                "TRUE".to_string(),
            )))),
            then_branch: Some(Node::new(NodeKind::Content("A".to_string()))),
            else_branch: Some(Node::new(NodeKind::Unconditional {
                branch: Some(Node::new(NodeKind::Content("B".to_string()))),
            })),
        },
        next: None,
    };
    assert_eq!(*root, expected);
}

#[test]
fn test_match_shape() {
    let source = "%SWITCH [ <ENV:KIND> ] :\n\
                  %CASE [ \"executable\" ] :\nE\n%END\n\
                  %DEFAULT:\nD\n%END\n\
                  %END";
    let root = parse_source(source).unwrap().unwrap();

    let NodeKind::Match { selector, cases, default } = &root.kind else {
        panic!("Expected a MATCH node, got {}", root.kind_name());
    };
    assert!(matches!(&selector.kind, NodeKind::Expression(_)));

    let case = cases.as_deref().unwrap();
    let NodeKind::MatchCase { label, branch } = &case.kind else {
        panic!("Expected a MATCH_CASE node, got {}", case.kind_name());
    };
    assert_eq!(label.kind, NodeKind::Literal("\"executable\"".to_string()));
    assert_eq!(branch.as_deref().unwrap().kind, NodeKind::Content("E".to_string()));
    assert!(case.next.is_none());

    let default = default.as_deref().unwrap();
    let NodeKind::MatchCase { label, branch } = &default.kind else {
        panic!("Expected a MATCH_CASE node, got {}", default.kind_name());
    };
    assert_eq!(label.kind, NodeKind::Literal(DEFAULT_LABEL.to_string()));
    assert_eq!(branch.as_deref().unwrap().kind, NodeKind::Content("D".to_string()));
}

#[test]
fn test_print_with_references() {
    let root = parse_source("%PRINT [ <A> EQUALS <B> ]").unwrap().unwrap();

    let NodeKind::Print { content } = &root.kind else {
        panic!("Expected a PRINT node, got {}", root.kind_name());
    };
    let NodeKind::Expression(value) = &content.kind else {
        panic!("Expected an EXPRESSION node, got {}", content.kind_name());
    };
    let NodeKind::Operator { name, arity, lhs, rhs } = &value.kind else {
        panic!("Expected an OPERATOR node, got {}", value.kind_name());
    };
    assert_eq!(name, "EQUALS");
    assert_eq!(*arity, Arity::Binary);
    assert_eq!(lhs.as_deref().unwrap().kind, NodeKind::Literal("A".to_string()));
    assert_eq!(rhs.as_deref().unwrap().kind, NodeKind::Literal("B".to_string()));
}

#[test]
fn test_statement_after_conditional_is_chained() {
    let root = parse_source("%IF [ TRUE ] :\nA\n%END\ntail\n").unwrap().unwrap();

    assert!(matches!(root.kind, NodeKind::Conditional { .. }));
    assert_eq!(root.next.as_deref().unwrap().kind, NodeKind::Content("tail".to_string()));
}

#[test]
fn test_missing_end_is_an_error() {
    match parse_source("%IF [ TRUE ] :\nA") {
        Err(Error::Syntax(message)) => assert!(message.contains("%END")),
        other => panic!("Expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_unexpected_keyword_is_an_error() {
    match parse_source("%FOO") {
        Err(Error::Syntax(message)) => assert!(message.contains("FOO")),
        other => panic!("Expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_adjacent_operands_are_an_error() {
    match parse_source("%IF [ \"a\" \"b\" ] :\nx\n%END") {
        Err(Error::Syntax(message)) => assert!(message.contains("operator")),
        other => panic!("Expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_case_label_must_be_a_literal() {
    let source = "%SWITCH [ <ENV:A> ] :\n%CASE [ NOT FALSE ] :\nX\n%END\n%END";
    match parse_source(source) {
        Err(Error::Syntax(message)) => assert!(message.contains("label")),
        other => panic!("Expected a syntax error, got {other:?}"),
    }
}
