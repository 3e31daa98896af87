use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::dup2;

use crate::ast::{RedirectMode, SimpleCommand};
use crate::types::ShellError;

/// Open file descriptors for a command's declared redirections. `open`
/// runs before the exec; `apply` wires the descriptors onto the standard
/// stream slots.
pub struct RedirectSet {
    stdin: Option<File>,
    stdout: Option<File>,
    stderr: Option<File>,
}

impl RedirectSet {
    pub fn open(cmd: &SimpleCommand) -> Result<Self, ShellError> {
        let stdin = match &cmd.stdin {
            Some(word) => {
                let path = word.resolve();
                Some(File::open(&path).map_err(|e| ShellError::Open(path, e))?)
            }
            None => None,
        };

        let stdout = match &cmd.stdout {
            Some(word) => {
                let path = word.resolve();
                Some((path.clone(), open_for_write(&path, cmd.stdout_mode)?))
            }
            None => None,
        };

        let stderr = match &cmd.stderr {
            Some(word) => {
                let path = word.resolve();
                match &stdout {
                    // `cmd > f 2> f`: stderr dups stdout's descriptor
                    // (shared offset) instead of reopening and truncating
                    // the file a second time.
                    Some((out_path, out_file)) if *out_path == path => Some(
                        out_file
                            .try_clone()
                            .map_err(|e| ShellError::Open(path, e))?,
                    ),
                    _ => Some(open_for_write(&path, cmd.stderr_mode)?),
                }
            }
            None => None,
        };

        Ok(Self {
            stdin,
            stdout: stdout.map(|(_, file)| file),
            stderr,
        })
    }

    pub fn apply(&self) -> Result<(), ShellError> {
        let slots = [
            (&self.stdin, STDIN_FILENO),
            (&self.stdout, STDOUT_FILENO),
            (&self.stderr, STDERR_FILENO),
        ];
        for (file, fd) in slots {
            if let Some(file) = file {
                dup2(file.as_raw_fd(), fd).map_err(|e| ShellError::Sys(e, "dup2"))?;
            }
        }
        Ok(())
    }
}

/// Create or truncate every declared redirection target without wiring any
/// of them up. `cd` does this even though it writes nothing to them.
pub fn touch_targets(cmd: &SimpleCommand) -> Result<(), ShellError> {
    for word in [&cmd.stdin, &cmd.stdout, &cmd.stderr].into_iter().flatten() {
        let path = word.resolve();
        open_for_write(&path, RedirectMode::Truncate)?;
    }
    Ok(())
}

fn open_for_write(path: &str, mode: RedirectMode) -> Result<File, ShellError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .append(mode == RedirectMode::Append)
        .truncate(mode == RedirectMode::Truncate)
        .mode(0o644)
        .open(path)
        .map_err(|e| ShellError::Open(path.to_string(), e))
}
