use std::ffi::CString;
use std::os::fd::IntoRawFd;

use libc::{STDIN_FILENO, STDOUT_FILENO};
use log::{debug, warn};
use nix::fcntl::OFlag;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, execvp, fork, pipe2, ForkResult, Pid};

use crate::ast::{Cmd, SimpleCommand};
use crate::builtins;
use crate::redirect::{self, RedirectSet};
use crate::types::{ShellError, EXIT_CMD_NOT_FOUND, SHELL_EXIT};

/// Evaluate a command tree and return its exit status. Called once per
/// parsed line; `SHELL_EXIT` tells the caller to stop reading input.
///
/// Resource failures at a composite node (fork, pipe, wait) become status 1
/// at that node; they never abort the rest of the tree, so a failed pipe on
/// the left of `;` still lets the right side run.
pub fn execute(cmd: &Cmd) -> i32 {
    match cmd {
        Cmd::Simple(simple) => run_simple(simple),
        Cmd::Sequential(left, right) => {
            let status = execute(left);
            if status == SHELL_EXIT {
                return SHELL_EXIT;
            }
            execute(right)
        }
        Cmd::Parallel(left, right) => run_parallel(left, right),
        Cmd::Pipe(left, right) => run_pipe(left, right),
        Cmd::AndThen(left, right) => {
            let status = execute(left);
            if status == 0 {
                execute(right)
            } else {
                status
            }
        }
        Cmd::OrElse(left, right) => {
            let status = execute(left);
            if status != 0 && status != SHELL_EXIT {
                execute(right)
            } else {
                status
            }
        }
    }
}

/// Run one leaf command: builtin or assignment in this process, anything
/// else in a forked child that applies its redirections and execs.
fn run_simple(cmd: &SimpleCommand) -> i32 {
    let verb = cmd.verb.resolve();
    debug!("simple command: {verb}");

    match verb.as_str() {
        "cd" => {
            // cd creates/truncates its declared redirect targets even
            // though it writes nothing to them.
            if let Err(e) = redirect::touch_targets(cmd) {
                eprintln!("{e}");
                return 1;
            }
            builtins::cd(cmd.params.first())
        }
        "exit" | "quit" => SHELL_EXIT,
        _ if verb.contains('=') => builtins::assign(&verb),
        _ => run_external(cmd, &verb),
    }
}

fn run_external(cmd: &SimpleCommand, verb: &str) -> i32 {
    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            let status = exec_child(cmd, verb);
            // The exec did not happen; leave without unwinding into the
            // orchestrator or flushing inherited buffers.
            unsafe { libc::_exit(status) }
        }
        Ok(ForkResult::Parent { child }) => join(child),
        Err(e) => {
            eprintln!("fork: {e}");
            1
        }
    }
}

/// Child side of an external command. Returns only if the exec could not
/// happen; the caller `_exit`s with the returned status.
fn exec_child(cmd: &SimpleCommand, verb: &str) -> i32 {
    let redirects = match RedirectSet::open(cmd) {
        Ok(redirects) => redirects,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    if let Err(e) = redirects.apply() {
        eprintln!("{e}");
        return 1;
    }

    let args: Result<Vec<CString>, _> = cmd.argv().into_iter().map(CString::new).collect();
    let argv = match args {
        Ok(argv) => argv,
        Err(_) => {
            eprintln!("argument contains an interior NUL byte");
            return 1;
        }
    };

    let _ = execvp(&argv[0], &argv);
    eprintln!("Execution failed for '{verb}'");
    EXIT_CMD_NOT_FOUND
}

/// Map one child's termination to a status: its exit code on a normal
/// exit, 1 when it died abnormally or the wait itself failed.
fn join(pid: Pid) -> i32 {
    match waitpid(pid, None) {
        Ok(WaitStatus::Exited(_, code)) => code,
        Ok(status) => {
            warn!("child {pid} terminated abnormally: {status:?}");
            eprintln!("child process did not terminate normally");
            1
        }
        Err(e) => {
            eprintln!("waitpid: {e}");
            1
        }
    }
}

/// Fork a child that evaluates `cmd` and exits with its status. `wire`
/// runs first in the child to set up its standard streams.
fn spawn_branch(
    cmd: &Cmd,
    wire: impl FnOnce() -> Result<(), ShellError>,
) -> Result<Pid, ShellError> {
    match unsafe { fork() }.map_err(|e| ShellError::Sys(e, "fork"))? {
        ForkResult::Child => {
            if let Err(e) = wire() {
                eprintln!("{e}");
                unsafe { libc::_exit(1) }
            }
            unsafe { libc::_exit(execute(cmd)) }
        }
        ForkResult::Parent { child } => Ok(child),
    }
}

/// `a & b`: two independent branches, no data dependency. The result only
/// says whether both branches were created and joined; their own exit
/// statuses are deliberately discarded.
fn run_parallel(left: &Cmd, right: &Cmd) -> i32 {
    let left_pid = match spawn_branch(left, || Ok(())) {
        Ok(pid) => pid,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    let right_pid = match spawn_branch(right, || Ok(())) {
        Ok(pid) => pid,
        Err(e) => {
            eprintln!("{e}");
            let _ = waitpid(left_pid, None);
            return 1;
        }
    };

    let left_joined = waitpid(left_pid, None);
    let right_joined = waitpid(right_pid, None);
    if let Err(e) = left_joined.and(right_joined) {
        eprintln!("waitpid: {e}");
        return 1;
    }
    0
}

/// `a | b`: anonymous pipe between the two branches. Both ends are closed
/// here right after the forks; holding the write end open would keep the
/// reader from ever seeing end-of-input.
fn run_pipe(left: &Cmd, right: &Cmd) -> i32 {
    // Close-on-exec keeps the raw ends out of exec'ed programs; the
    // dup2'ed standard-stream copies below lose the flag.
    let (read_fd, write_fd) = match pipe2(OFlag::O_CLOEXEC) {
        Ok((read_end, write_end)) => (read_end.into_raw_fd(), write_end.into_raw_fd()),
        Err(e) => {
            eprintln!("pipe: {e}");
            return 1;
        }
    };

    let left_pid = match spawn_branch(left, || {
        let _ = close(read_fd);
        dup2(write_fd, STDOUT_FILENO).map_err(|e| ShellError::Sys(e, "dup2"))?;
        Ok(())
    }) {
        Ok(pid) => pid,
        Err(e) => {
            let _ = close(read_fd);
            let _ = close(write_fd);
            eprintln!("{e}");
            return 1;
        }
    };

    let right_pid = match spawn_branch(right, || {
        let _ = close(write_fd);
        dup2(read_fd, STDIN_FILENO).map_err(|e| ShellError::Sys(e, "dup2"))?;
        Ok(())
    }) {
        Ok(pid) => pid,
        Err(e) => {
            let _ = close(read_fd);
            let _ = close(write_fd);
            let _ = waitpid(left_pid, None);
            eprintln!("{e}");
            return 1;
        }
    };

    let _ = close(read_fd);
    let _ = close(write_fd);

    let left_status = join(left_pid);
    let right_status = join(right_pid);
    if left_status == 0 && right_status == 0 {
        0
    } else {
        1
    }
}
