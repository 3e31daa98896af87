use thiserror::Error;

/// Reserved status telling the top-level read loop to stop. Only `exit` and
/// `quit` produce it; every enclosing sequential/conditional node passes it
/// through untouched.
pub const SHELL_EXIT: i32 = -100;

/// Status an exec'ed child reports when the program could not be run.
pub const EXIT_CMD_NOT_FOUND: i32 = 127;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cannot open {0}: {1}")]
    Open(String, std::io::Error),
    #[error("system error ({1}): {0}")]
    Sys(nix::Error, &'static str),
    #[error("parse error: {0}")]
    Parse(String),
}
