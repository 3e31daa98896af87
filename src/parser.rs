use std::iter::Peekable;
use std::slice::Iter;

use crate::ast::{Cmd, RedirectMode, SimpleCommand};
use crate::lexer::{Operator, Token};
use crate::types::ShellError;

type Tokens<'a> = Peekable<Iter<'a, Token>>;

/// Build a command tree. Precedence, loosest first: `;` and `&`, then `&&`
/// and `||`, then `|`; redirections bind to the simple command they follow.
pub fn parse(tokens: &[Token]) -> Result<Cmd, ShellError> {
    let mut iter = tokens.iter().peekable();
    let cmd = parse_sequence(&mut iter)?;
    match iter.next() {
        None => Ok(cmd),
        Some(token) => Err(ShellError::Parse(format!("unexpected {token:?}"))),
    }
}

fn parse_sequence(tokens: &mut Tokens) -> Result<Cmd, ShellError> {
    let mut left = parse_conditional(tokens)?;
    while let Some(Token::Operator(op)) = tokens.peek() {
        let build = match op {
            Operator::Semicolon => Cmd::Sequential,
            Operator::Background => Cmd::Parallel,
            _ => break,
        };
        tokens.next();
        let right = parse_conditional(tokens)?;
        left = build(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_conditional(tokens: &mut Tokens) -> Result<Cmd, ShellError> {
    let mut left = parse_pipeline(tokens)?;
    while let Some(Token::Operator(op)) = tokens.peek() {
        let build = match op {
            Operator::And => Cmd::AndThen,
            Operator::Or => Cmd::OrElse,
            _ => break,
        };
        tokens.next();
        let right = parse_pipeline(tokens)?;
        left = build(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_pipeline(tokens: &mut Tokens) -> Result<Cmd, ShellError> {
    let mut left = parse_simple(tokens)?;
    while let Some(Token::Operator(Operator::Pipe)) = tokens.peek() {
        tokens.next();
        let right = parse_simple(tokens)?;
        left = Cmd::Pipe(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_simple(tokens: &mut Tokens) -> Result<Cmd, ShellError> {
    let verb = match tokens.peek() {
        Some(Token::Word(word)) => {
            let verb = word.clone();
            tokens.next();
            verb
        }
        other => {
            return Err(ShellError::Parse(match other {
                Some(token) => format!("expected command, found {token:?}"),
                None => "expected command".to_string(),
            }))
        }
    };

    let mut cmd = SimpleCommand::new(verb);
    loop {
        match tokens.peek() {
            Some(Token::Word(word)) => {
                cmd.params.push(word.clone());
                tokens.next();
            }
            Some(Token::Operator(op)) if is_redirect(op) => {
                let op = *op;
                tokens.next();
                let target = redirect_target(tokens, op)?;
                attach_redirect(&mut cmd, op, target);
            }
            _ => break,
        }
    }
    Ok(Cmd::Simple(cmd))
}

fn is_redirect(op: &Operator) -> bool {
    matches!(
        op,
        Operator::RedirectIn
            | Operator::RedirectOut
            | Operator::RedirectAppend
            | Operator::RedirectErr
            | Operator::RedirectErrAppend
            | Operator::RedirectBoth
    )
}

fn redirect_target(
    tokens: &mut Tokens,
    op: Operator,
) -> Result<crate::word::Word, ShellError> {
    match tokens.next() {
        Some(Token::Word(word)) if !word.is_empty() => Ok(word.clone()),
        _ => Err(ShellError::Parse(format!("missing target after {op:?}"))),
    }
}

// A repeated redirection of the same stream keeps the last target, as in
// POSIX shells.
fn attach_redirect(cmd: &mut SimpleCommand, op: Operator, target: crate::word::Word) {
    match op {
        Operator::RedirectIn => cmd.stdin = Some(target),
        Operator::RedirectOut | Operator::RedirectAppend => {
            cmd.stdout = Some(target);
            cmd.stdout_mode = mode_for(op);
        }
        Operator::RedirectErr | Operator::RedirectErrAppend => {
            cmd.stderr = Some(target);
            cmd.stderr_mode = mode_for(op);
        }
        Operator::RedirectBoth => {
            cmd.stdout = Some(target.clone());
            cmd.stderr = Some(target);
            cmd.stdout_mode = RedirectMode::Truncate;
            cmd.stderr_mode = RedirectMode::Truncate;
        }
        _ => unreachable!("not a redirect operator"),
    }
}

fn mode_for(op: Operator) -> RedirectMode {
    match op {
        Operator::RedirectAppend | Operator::RedirectErrAppend => RedirectMode::Append,
        _ => RedirectMode::Truncate,
    }
}
