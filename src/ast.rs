use crate::word::Word;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RedirectMode {
    #[default]
    Truncate, // > and 2>
    Append, // >> and 2>>
}

/// A leaf command: one verb, its parameters, and up to three redirection
/// targets. Append/truncate mode is tracked independently for stdout and
/// stderr.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCommand {
    pub verb: Word,
    pub params: Vec<Word>,
    pub stdin: Option<Word>,
    pub stdout: Option<Word>,
    pub stderr: Option<Word>,
    pub stdout_mode: RedirectMode,
    pub stderr_mode: RedirectMode,
}

impl SimpleCommand {
    pub fn new(verb: Word) -> Self {
        Self {
            verb,
            params: Vec::new(),
            stdin: None,
            stdout: None,
            stderr: None,
            stdout_mode: RedirectMode::default(),
            stderr_mode: RedirectMode::default(),
        }
    }

    /// Resolved argument vector, verb at index 0.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(&self.verb)
            .chain(self.params.iter())
            .map(Word::resolve)
            .collect()
    }
}

/// The command tree. Children are owned exclusively by their parent; the
/// tree is built once by the parser, evaluated once, and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    Simple(SimpleCommand),
    /// `a ; b` — run both in order, report b's status.
    Sequential(Box<Cmd>, Box<Cmd>),
    /// `a & b` — run both concurrently, report orchestration success only.
    Parallel(Box<Cmd>, Box<Cmd>),
    /// `a | b` — a's stdout feeds b's stdin.
    Pipe(Box<Cmd>, Box<Cmd>),
    /// `a && b` — run b only if a exited 0.
    AndThen(Box<Cmd>, Box<Cmd>),
    /// `a || b` — run b only if a exited nonzero.
    OrElse(Box<Cmd>, Box<Cmd>),
}
