use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

mod ast;
mod builtins;
mod executor;
mod lexer;
mod parser;
mod redirect;
#[cfg(test)]
mod tests;
mod types;
mod word;

use types::SHELL_EXIT;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("$ ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                if run_line(&line) == SHELL_EXIT {
                    break;
                }
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn run_line(line: &str) -> i32 {
    match lexer::lex(line).and_then(|tokens| parser::parse(&tokens)) {
        Ok(tree) => {
            debug!("executing: {tree:?}");
            executor::execute(&tree)
        }
        Err(e) => {
            eprintln!("minish: {e}");
            1
        }
    }
}
