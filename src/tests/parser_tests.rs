use crate::ast::*;
use crate::parser::parse_pattern;
use crate::{Error, SyntaxErrorKind};

fn body(pattern: &str) -> Node {
    parse_pattern(pattern).unwrap().body.unwrap()
}

fn syntax_error(pattern: &str) -> (usize, SyntaxErrorKind) {
    match parse_pattern(pattern) {
        Err(Error::Syntax { offset, kind }) => (offset, kind),
        other => panic!("expected a syntax error for {:?}, got {:?}", pattern, other),
    }
}

fn ch(c: char) -> Node {
    Node::Char(Char::simple(c))
}

#[test]
fn test_parse_exact_char() {
    assert_eq!(body("a"), ch('a'));
}

#[test]
fn test_parse_empty_pattern() {
    let regex = parse_pattern("").unwrap();
    assert_eq!(regex.body, None);
    assert_eq!(regex.captures, 0);
}

#[test]
fn test_parse_sequence() {
    assert_eq!(body("abc"), Node::Alternative(vec![ch('a'), ch('b'), ch('c')]));
}

#[test]
fn test_parse_meta_chars() {
    assert_eq!(body("."), Node::Char(Char::meta(".", None)));
    assert_eq!(body("\\d"), Node::Char(Char::meta("\\d", None)));
    assert_eq!(body("\\n"), Node::Char(Char::meta("\\n", Some(10))));
}

#[test]
fn test_parse_identity_escape_keeps_the_char() {
    assert_eq!(body("\\["), ch('['));
    assert_eq!(body("\\)"), ch(')'));
}

#[test]
fn test_parse_hex_and_unicode_escapes() {
    let Node::Char(hex) = body("\\x41") else { panic!("expected a char") };
    assert_eq!(hex.kind, CharKind::Hex);
    assert_eq!(hex.code_point, Some(0x41));

    let Node::Char(unicode) = body("\\u{1F600}") else { panic!("expected a char") };
    assert_eq!(unicode.kind, CharKind::Unicode);
    assert_eq!(unicode.value, "\\u{1F600}");
    assert_eq!(unicode.code_point, Some(0x1F600));

    // Not enough digits: an identity escape
    assert_eq!(body("\\xZ"), Node::Alternative(vec![ch('x'), ch('Z')]));
}

#[test]
fn test_parse_capture_numbering_is_left_to_right() {
    let regex = parse_pattern("(a(?<inner>b))(c)").unwrap();
    assert_eq!(regex.captures, 3);

    let Some(Node::Alternative(terms)) = regex.body else { panic!("expected an alternative") };
    let Node::Group(outer) = &terms[0] else { panic!("expected a group") };
    assert_eq!(outer.capture, Some(Capture { number: 1, name: None }));

    let Some(Node::Alternative(inner_terms)) = outer.expression.as_deref() else {
        panic!("expected an alternative")
    };
    assert_eq!(
        inner_terms[1].capture(),
        Some(&Capture { number: 2, name: Some("inner".to_string()) })
    );
    assert_eq!(terms[1].capture(), Some(&Capture { number: 3, name: None }));
}

#[test]
fn test_parse_non_capturing_group() {
    assert_eq!(
        body("(?:ab)"),
        Node::Group(Group {
            capture: None,
            expression: Some(Box::new(Node::Alternative(vec![ch('a'), ch('b')]))),
        })
    );
    assert_eq!(parse_pattern("(?:a)").unwrap().captures, 0);
}

#[test]
fn test_parse_quantifiers() {
    let quantifier = |pattern: &str| match body(pattern) {
        Node::Repetition(repetition) => repetition.quantifier,
        other => panic!("expected a repetition, got {:?}", other),
    };

    assert_eq!(quantifier("a*").kind, QuantifierKind::Star);
    assert_eq!(quantifier("a+").kind, QuantifierKind::Plus);
    assert_eq!(quantifier("a?").kind, QuantifierKind::Optional);
    assert_eq!(quantifier("a{3}").kind, QuantifierKind::Exact(3));
    assert_eq!(quantifier("a{2,2}").kind, QuantifierKind::Exact(2));
    assert_eq!(quantifier("a{2,5}").kind, QuantifierKind::Range { min: 2, max: Some(5) });
    assert_eq!(quantifier("a{2,}").kind, QuantifierKind::Range { min: 2, max: None });
    assert!(quantifier("a+").greedy);
    assert!(!quantifier("a*?").greedy);
    assert!(!quantifier("a{1,3}?").greedy);
}

#[test]
fn test_parse_brace_without_quantifier_is_literal() {
    assert_eq!(body("a{"), Node::Alternative(vec![ch('a'), ch('{')]));
    assert_eq!(
        body("a{,3}"),
        Node::Alternative(vec![ch('a'), ch('{'), ch(','), ch('3'), ch('}')])
    );
}

#[test]
fn test_parse_disjunction_is_left_associative() {
    assert_eq!(
        body("a|b|c"),
        Node::Disjunction {
            left: Some(Box::new(Node::Disjunction {
                left: Some(Box::new(ch('a'))),
                right: Some(Box::new(ch('b'))),
            })),
            right: Some(Box::new(ch('c'))),
        }
    );
}

#[test]
fn test_parse_empty_branch() {
    assert_eq!(
        body("a|"),
        Node::Disjunction {
            left: Some(Box::new(ch('a'))),
            right: None,
        }
    );
}

#[test]
fn test_parse_assertions() {
    assert_eq!(
        body("^a$"),
        Node::Alternative(vec![
            Node::Assertion(Assertion::anchor(AssertionKind::Start)),
            ch('a'),
            Node::Assertion(Assertion::anchor(AssertionKind::End)),
        ])
    );
    assert_eq!(
        body("(?<=a)b"),
        Node::Alternative(vec![
            Node::Assertion(Assertion {
                kind: AssertionKind::Lookbehind,
                assertion: Some(Box::new(ch('a'))),
            }),
            ch('b'),
        ])
    );
    let Node::Assertion(lookahead) = body("(?!x)") else { panic!("expected an assertion") };
    assert_eq!(lookahead.kind, AssertionKind::NegativeLookahead);
}

#[test]
fn test_parse_character_class() {
    assert_eq!(
        body("[a-z_-]"),
        Node::CharacterClass {
            negative: false,
            expressions: vec![
                Node::ClassRange { from: Char::simple('a'), to: Char::simple('z') },
                ch('_'),
                ch('-'),
            ],
        }
    );
}

#[test]
fn test_parse_negated_character_class() {
    assert_eq!(
        body("[^@\\n\\]]"),
        Node::CharacterClass {
            negative: true,
            expressions: vec![ch('@'), Node::Char(Char::meta("\\n", Some(10))), ch(']')],
        }
    );
}

#[test]
fn test_parse_class_escape_cannot_bound_a_range() {
    assert_eq!(
        body("[\\d-z]"),
        Node::CharacterClass {
            negative: false,
            expressions: vec![Node::Char(Char::meta("\\d", None)), ch('-'), ch('z')],
        }
    );
}

#[test]
fn test_parse_backreferences() {
    assert_eq!(
        body("(a)\\1"),
        Node::Alternative(vec![
            Node::Group(Group {
                capture: Some(Capture { number: 1, name: None }),
                expression: Some(Box::new(ch('a'))),
            }),
            Node::Backreference(Backreference::Number(1)),
        ])
    );
    let Node::Alternative(terms) = body("(?<word>a)\\k<word>") else { panic!("expected an alternative") };
    assert_eq!(terms[1], Node::Backreference(Backreference::Name("word".to_string())));
}

#[test]
fn test_parse_errors() {
    assert_eq!(syntax_error("(a"), (0, SyntaxErrorKind::UnterminatedGroup));
    assert_eq!(syntax_error("a)"), (1, SyntaxErrorKind::UnmatchedParen));
    assert_eq!(syntax_error("[ab"), (0, SyntaxErrorKind::UnterminatedClass));
    assert_eq!(syntax_error("*a"), (0, SyntaxErrorKind::NothingToRepeat));
    assert_eq!(syntax_error("a|?"), (2, SyntaxErrorKind::NothingToRepeat));
    assert_eq!(syntax_error("^*"), (1, SyntaxErrorKind::NothingToRepeat));
    assert_eq!(syntax_error("a{3,1}"), (1, SyntaxErrorKind::QuantifierOutOfOrder));
    assert_eq!(syntax_error("[z-a]"), (1, SyntaxErrorKind::RangeOutOfOrder));
    assert_eq!(syntax_error("a\\"), (1, SyntaxErrorKind::TrailingBackslash));
    assert_eq!(syntax_error("(?x)"), (1, SyntaxErrorKind::InvalidGroup));
    assert_eq!(syntax_error("(?<1a>x)"), (3, SyntaxErrorKind::InvalidGroupName));
    assert_eq!(
        syntax_error("(?<a>x)(?<a>y)"),
        (10, SyntaxErrorKind::DuplicateGroupName("a".to_string()))
    );
    assert_eq!(
        syntax_error("\\k<nope>(?<a>x)"),
        (0, SyntaxErrorKind::UnknownGroupName("nope".to_string()))
    );
}

#[test]
fn test_parse_literal_with_flags() {
    let regex = Regex::from_literal("/a(b)/gi").unwrap();
    assert!(regex.flags.global);
    assert!(regex.flags.ignore_case);
    assert!(!regex.flags.multiline);
    assert_eq!(regex.captures, 1);
    assert_eq!(regex.flags.to_string(), "gi");

    // Slashes inside the pattern are kept
    assert_eq!(Regex::from_literal("/a/b/").unwrap().body, Some(Node::Alternative(vec![ch('a'), ch('/'), ch('b')])));
}

#[test]
fn test_parse_literal_errors() {
    assert_eq!(Regex::from_literal("a/g"), Err(Error::MalformedLiteral));
    assert_eq!(Regex::from_literal("/a"), Err(Error::MalformedLiteral));
    assert_eq!(Regex::from_literal("//g"), Err(Error::MalformedLiteral));
    assert_eq!(Regex::from_literal("/a/q"), Err(Error::InvalidFlag('q')));
    assert_eq!(Regex::from_literal("/a/gg"), Err(Error::DuplicateFlag('g')));
}

#[test]
fn test_parse_nesting_limit() {
    let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));

    let regex = parse_pattern(&nested(crate::MAX_NESTING)).unwrap();
    assert_eq!(regex.captures, crate::MAX_NESTING);

    assert_eq!(
        syntax_error(&nested(crate::MAX_NESTING + 1)),
        (crate::MAX_NESTING, SyntaxErrorKind::NestingTooDeep)
    );
    assert_eq!(
        syntax_error(&"(?:".repeat(50_000)),
        (3 * crate::MAX_NESTING, SyntaxErrorKind::NestingTooDeep)
    );
}
