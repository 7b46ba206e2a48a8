//! Tests for custom syntax definitions

use pretty_assertions::assert_eq;
use setconf_content::{LineClassifier, LineEnding, OperatorKind, Syntax, change_file};

#[test]
fn test_syntax_from_toml() {
    let syntax: Syntax = toml::from_str(
        r#"
operators = ["=", ":"]
line_comments = [";"]
line_ending = "lf"
"#,
    )
    .unwrap();

    let tokens: Vec<_> = syntax.operators.iter().map(|op| op.token()).collect();
    assert_eq!(tokens, ["=", ":"]);
    assert_eq!(syntax.line_comments, [";"]);
    assert_eq!(syntax.block_comments, ["/*"]);
    assert_eq!(syntax.line_ending, LineEnding::Lf);

    let c = LineClassifier::new(&syntax).unwrap();
    let (out, _) = change_file(&c, b"; a=0\na: 1\n# b=2\n", b"a", b"9");
    assert_eq!(out, b"; a=0\na: 9\n# b=2\n");
}

#[test]
fn test_custom_word_operator() {
    let syntax = toml::from_str::<Syntax>(r#"operators = ["to", "="]"#)
        .unwrap()
        .with_line_ending(LineEnding::Lf);
    assert_eq!(syntax.operators[0].kind(), OperatorKind::Word);

    let c = LineClassifier::new(&syntax).unwrap();
    let (out, _) = change_file(&c, b"set volume to 7\n", b"set volume", b"11");
    assert_eq!(out, b"set volume=11\n");
}

#[test]
fn test_empty_syntax_file_means_defaults() {
    let syntax: Syntax = toml::from_str("").unwrap();
    assert_eq!(syntax, Syntax::default());
}

#[test]
fn test_unknown_field_is_rejected() {
    assert!(toml::from_str::<Syntax>("colour = \"blue\"").is_err());
}

#[test]
fn test_bad_operator_is_rejected() {
    assert!(toml::from_str::<Syntax>(r#"operators = [""]"#).is_err());
    assert!(toml::from_str::<Syntax>(r#"operators = ["a b"]"#).is_err());
}

#[test]
fn test_only_delta_operators_is_invalid() {
    let syntax: Syntax = toml::from_str(r#"operators = ["+=", "-="]"#).unwrap();
    assert!(LineClassifier::new(&syntax).is_err());
}

#[test]
fn test_syntax_serializes_operators_as_strings() {
    let text = toml::to_string(&Syntax::default().with_line_ending(LineEnding::CrLf)).unwrap();
    assert!(text.contains(r#""is""#));
    assert!(text.contains(r#"line_ending = "crlf""#));
}
