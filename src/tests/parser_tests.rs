use super::tree;
use crate::ast::{Cmd, RedirectMode};
use crate::lexer::lex;
use crate::parser::parse;

fn simple_verb(cmd: &Cmd) -> String {
    match cmd {
        Cmd::Simple(simple) => simple.verb.resolve(),
        other => panic!("expected simple command, got {other:?}"),
    }
}

#[test]
fn test_pipe_binds_tighter_than_sequence() {
    // `a | b ; c` is (a | b) ; c
    match tree("a | b ; c") {
        Cmd::Sequential(left, right) => {
            assert!(matches!(*left, Cmd::Pipe(_, _)));
            assert_eq!(simple_verb(&right), "c");
        }
        other => panic!("expected sequential root, got {other:?}"),
    }
}

#[test]
fn test_conditionals_associate_left() {
    // `a && b || c` is (a && b) || c
    match tree("a && b || c") {
        Cmd::OrElse(left, right) => {
            assert!(matches!(*left, Cmd::AndThen(_, _)));
            assert_eq!(simple_verb(&right), "c");
        }
        other => panic!("expected or-else root, got {other:?}"),
    }
}

#[test]
fn test_pipe_binds_tighter_than_conditional() {
    // `a | b && c` is (a | b) && c
    match tree("a | b && c") {
        Cmd::AndThen(left, _) => assert!(matches!(*left, Cmd::Pipe(_, _))),
        other => panic!("expected and-then root, got {other:?}"),
    }
}

#[test]
fn test_background_builds_parallel_node() {
    match tree("a & b") {
        Cmd::Parallel(left, right) => {
            assert_eq!(simple_verb(&left), "a");
            assert_eq!(simple_verb(&right), "b");
        }
        other => panic!("expected parallel root, got {other:?}"),
    }
}

#[test]
fn test_redirects_bind_to_their_command() {
    match tree("cat < in > out 2>> err") {
        Cmd::Simple(cmd) => {
            assert_eq!(cmd.stdin.unwrap().resolve(), "in");
            assert_eq!(cmd.stdout.unwrap().resolve(), "out");
            assert_eq!(cmd.stderr.unwrap().resolve(), "err");
            assert_eq!(cmd.stdout_mode, RedirectMode::Truncate);
            assert_eq!(cmd.stderr_mode, RedirectMode::Append);
        }
        other => panic!("expected simple command, got {other:?}"),
    }
}

#[test]
fn test_redirect_both_sets_both_targets() {
    match tree("cmd &> all") {
        Cmd::Simple(cmd) => {
            assert_eq!(cmd.stdout.unwrap().resolve(), "all");
            assert_eq!(cmd.stderr.unwrap().resolve(), "all");
        }
        other => panic!("expected simple command, got {other:?}"),
    }
}

#[test]
fn test_last_redirect_of_a_stream_wins() {
    match tree("echo hi > first > second") {
        Cmd::Simple(cmd) => assert_eq!(cmd.stdout.unwrap().resolve(), "second"),
        other => panic!("expected simple command, got {other:?}"),
    }
}

#[test]
fn test_missing_pipe_operand_is_an_error() {
    assert!(parse(&lex("echo hi |").unwrap()).is_err());
    assert!(parse(&lex("| echo hi").unwrap()).is_err());
}

#[test]
fn test_trailing_background_is_an_error() {
    assert!(parse(&lex("echo hi &").unwrap()).is_err());
}

#[test]
fn test_missing_redirect_target_is_an_error() {
    assert!(parse(&lex("echo hi >").unwrap()).is_err());
    assert!(parse(&lex("echo hi > | cat").unwrap()).is_err());
}

#[test]
fn test_empty_input_is_an_error() {
    assert!(parse(&lex("").unwrap()).is_err());
}
