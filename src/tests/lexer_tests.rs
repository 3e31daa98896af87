use std::env;

use crate::lexer::{lex, Operator, Token};
use crate::word::Word;

fn word(tokens: &[Token], index: usize) -> &Word {
    match &tokens[index] {
        Token::Word(word) => word,
        other => panic!("expected word at {index}, got {other:?}"),
    }
}

fn operator(tokens: &[Token], index: usize) -> Operator {
    match &tokens[index] {
        Token::Operator(op) => *op,
        other => panic!("expected operator at {index}, got {other:?}"),
    }
}

#[test]
fn test_operators() {
    let tokens = lex("a && b || c ; d & e | f").unwrap();
    assert_eq!(tokens.len(), 11);
    assert_eq!(operator(&tokens, 1), Operator::And);
    assert_eq!(operator(&tokens, 3), Operator::Or);
    assert_eq!(operator(&tokens, 5), Operator::Semicolon);
    assert_eq!(operator(&tokens, 7), Operator::Background);
    assert_eq!(operator(&tokens, 9), Operator::Pipe);
}

#[test]
fn test_redirect_operators() {
    let tokens = lex("cmd < in > out 2> err 2>> err2 >> out2 &> all").unwrap();
    assert_eq!(operator(&tokens, 1), Operator::RedirectIn);
    assert_eq!(operator(&tokens, 3), Operator::RedirectOut);
    assert_eq!(operator(&tokens, 5), Operator::RedirectErr);
    assert_eq!(operator(&tokens, 7), Operator::RedirectErrAppend);
    assert_eq!(operator(&tokens, 9), Operator::RedirectAppend);
    assert_eq!(operator(&tokens, 11), Operator::RedirectBoth);
}

#[test]
fn test_digit_inside_word_is_not_a_redirect() {
    let tokens = lex("echo x2> f").unwrap();
    assert_eq!(word(&tokens, 1).resolve(), "x2");
    assert_eq!(operator(&tokens, 2), Operator::RedirectOut);
}

#[test]
fn test_double_quotes_join_words() {
    let tokens = lex("echo \"hello world\"").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(word(&tokens, 1).resolve(), "hello world");
}

#[test]
fn test_single_quotes_suppress_expansion() {
    let tokens = lex("echo '$HOME'").unwrap();
    assert_eq!(word(&tokens, 1).resolve(), "$HOME");
}

#[test]
fn test_double_quotes_expand_variables() {
    env::set_var("MINISH_LEX_VAR", "value");
    let tokens = lex("echo \"x$MINISH_LEX_VAR\"").unwrap();
    assert_eq!(word(&tokens, 1).resolve(), "xvalue");
}

#[test]
fn test_backslash_escapes_space() {
    let tokens = lex("echo a\\ b").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(word(&tokens, 1).resolve(), "a b");
}

#[test]
fn test_quotes_protect_operators() {
    let tokens = lex("echo 'a | b'").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(word(&tokens, 1).resolve(), "a | b");
}

#[test]
fn test_unterminated_quote_is_an_error() {
    assert!(lex("echo 'oops").is_err());
    assert!(lex("echo \"oops").is_err());
}

#[test]
fn test_lone_dollar_is_literal() {
    let tokens = lex("echo $").unwrap();
    assert_eq!(word(&tokens, 1).resolve(), "$");
}
