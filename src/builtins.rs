use std::env;
use std::path::Path;

use log::debug;
use nix::unistd::{chdir, getcwd};

use crate::word::Word;

/// Change the shell's working directory. With no argument this is a no-op.
/// A path that fails to resolve is retried joined to the current directory
/// before giving up; failure never terminates the shell.
pub fn cd(dir: Option<&Word>) -> i32 {
    let path = match dir {
        Some(word) => word.resolve(),
        None => return 0,
    };

    if chdir(Path::new(&path)).is_ok() {
        return 0;
    }

    let cwd = match getcwd() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("cd: cannot read current directory: {e}");
            return 1;
        }
    };
    match chdir(&cwd.join(&path)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("cd: {path}: {e}");
            1
        }
    }
}

/// `NAME=VALUE`: mutate the shell's own environment. Children spawned later
/// inherit the new value; their own mutations never flow back.
pub fn assign(word: &str) -> i32 {
    match split_assignment(word) {
        Some((name, value)) => {
            debug!("setenv {name}={value}");
            env::set_var(name, value);
            0
        }
        None => {
            eprintln!("invalid assignment: {word}");
            1
        }
    }
}

/// Name is the text before the first `=`, value the first nonempty
/// `=`-separated segment after it; both must be nonempty. `A=b=c` assigns
/// `b` to `A`.
pub fn split_assignment(word: &str) -> Option<(&str, &str)> {
    let (name, rest) = word.split_once('=')?;
    if name.is_empty() {
        return None;
    }
    rest.split('=')
        .find(|part| !part.is_empty())
        .map(|value| (name, value))
}
