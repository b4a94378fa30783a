use std::ffi::{CStr, c_char, c_int};
use std::io::{self, Stderr, Write};
use std::{mem, ptr};

use super::{ExecError, try_tokenize};
use crate::alloc::{Allocator, SystemAllocator};
use crate::cstr;
use crate::logger::Logger;

/// Runs commands as child processes and waits for them to finish, logging each command and its
/// arguments before it is started.
///
/// # Examples
/// ```
/// # use container_lib::alloc::SystemAllocator;
/// # use container_lib::builder::Builder;
/// # use container_lib::logger::Logger;
/// let mut builder = Builder::with(Logger::new(Vec::new()), &SystemAllocator);
/// builder.exec("true").unwrap();
/// assert_eq!(
///     String::from_utf8(builder.into_logger().into_inner()).unwrap(),
///     "[INFO] Executing \"true\".\n[INFO] > true\n"
/// );
/// ```
#[derive(Debug)]
pub struct Builder<'a, W: Write = Stderr, A: Allocator + ?Sized = SystemAllocator> {
    logger: Logger<W>,
    alloc: &'a A,
}

impl Builder<'static> {
    /// Creates a Builder logging to the standard error stream and allocating from the
    /// [`SystemAllocator`].
    pub fn new() -> Builder<'static> {
        Builder::with(Logger::stderr(), &SystemAllocator)
    }
}

impl Default for Builder<'static> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a, W: Write, A: Allocator + ?Sized> Builder<'a, W, A> {
    pub const fn with(logger: Logger<W>, alloc: &'a A) -> Builder<'a, W, A> {
        Builder { logger, alloc }
    }

    pub const fn logger(&self) -> &Logger<W> {
        &self.logger
    }

    pub const fn logger_mut(&mut self) -> &mut Logger<W> {
        &mut self.logger
    }

    pub fn into_logger(self) -> Logger<W> {
        self.logger
    }

    /// Splits `command` into a program and its arguments, runs the program in a child process
    /// and blocks until it terminates. The program is searched for in `PATH` when its name has no
    /// slash.
    ///
    /// Succeeds only if the child exits with status 0.
    ///
    /// # Errors
    /// Returns an [`ExecError`] if the command is blank, any of the underlying system calls fail,
    /// the program can't be executed, or it doesn't terminate successfully.
    pub fn exec(&mut self, command: impl AsRef<[u8]>) -> Result<(), ExecError> {
        let command = cstr::content(command.as_ref());
        self.logger.info(format_args!(
            "Executing \"{}\".",
            String::from_utf8_lossy(command)
        ));

        let tokens = try_tokenize(command, self.alloc)?;
        if tokens.is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        for (index, token) in tokens.iter().enumerate() {
            match index {
                0 => self.logger.info(format_args!("> {token}")),
                _ => self.logger.info(format_args!(">> {token}")),
            }
        }

        let argv: Vec<*const c_char> = tokens
            .iter()
            .map(|token| token.as_c_str().as_ptr())
            .chain([ptr::null()])
            .collect();
        spawn_and_wait(&argv)
    }

    /// Runs `command` like [`exec`](Builder::exec), but reports any failure through
    /// [`Logger::panic`], terminating the process.
    pub fn exec_or_exit(&mut self, command: impl AsRef<[u8]>) {
        let command = command.as_ref();
        if let Err(error) = self.exec(command) {
            self.logger.panic(format_args!(
                "{error} (command \"{}\")",
                String::from_utf8_lossy(cstr::content(command))
            ));
        }
    }
}

fn err_no() -> c_int {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// Forks, replaces the child with `argv[0]` and waits for it. `argv` must be terminated by a null
/// pointer and every other entry must point to a NUL-terminated string.
///
/// A close-on-exec pipe reports whether the exec itself succeeded: it is closed without being
/// written to if it did, and receives the child's errno if it didn't.
fn spawn_and_wait(argv: &[*const c_char]) -> Result<(), ExecError> {
    let mut fds: [c_int; 2] = [-1; 2];
    // SAFETY: fds has room for the two descriptors pipe2 writes.
    if unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) } == -1 {
        return Err(ExecError::Fork(err_no()));
    }
    let [read_fd, write_fd] = fds;

    // SAFETY: The child only makes async-signal-safe calls before exec or _exit.
    match unsafe { libc::fork() } {
        -1 => {
            let errno = err_no();
            // SAFETY: Both descriptors were opened above and aren't used afterwards.
            unsafe {
                libc::close(read_fd);
                libc::close(write_fd);
            }
            Err(ExecError::Fork(errno))
        },
        0 => {
            // SAFETY: argv is null terminated and its strings outlive the call, as guaranteed by
            // the caller. execvp only returns on failure.
            unsafe {
                libc::close(read_fd);
                libc::execvp(argv[0], argv.as_ptr());
                let errno = err_no().to_ne_bytes();
                libc::write(write_fd, errno.as_ptr().cast(), errno.len());
                libc::_exit(127)
            }
        },
        pid => {
            // SAFETY: The write end belongs to the child from here on.
            unsafe { libc::close(write_fd) };
            let exec_result = read_exec_errno(read_fd);
            // SAFETY: The read end is no longer used.
            unsafe { libc::close(read_fd) };
            let status = wait_for(pid)?;
            match exec_result {
                Some(errno) => Err(ExecError::Exec(errno)),
                None => check_status(status),
            }
        },
    }
}

/// Reads the errno sent by a child whose exec failed, or returns None once the pipe is closed.
fn read_exec_errno(fd: c_int) -> Option<c_int> {
    let mut buf = [0_u8; mem::size_of::<c_int>()];
    loop {
        // SAFETY: buf is valid for writes of its whole length.
        match unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) } {
            -1 if err_no() == libc::EINTR => continue,
            count if count == buf.len() as isize => return Some(c_int::from_ne_bytes(buf)),
            _ => return None,
        }
    }
}

fn wait_for(pid: libc::pid_t) -> Result<c_int, ExecError> {
    let mut status: c_int = 0;
    loop {
        // SAFETY: status is a valid location for waitpid to store the child's status.
        if unsafe { libc::waitpid(pid, &mut status, 0) } == -1 {
            match err_no() {
                libc::EINTR => continue,
                errno => Err(ExecError::Wait(errno))?,
            }
        }
        return Ok(status);
    }
}

fn check_status(status: c_int) -> Result<(), ExecError> {
    if libc::WIFSIGNALED(status) {
        let signal = libc::WTERMSIG(status);
        Err(ExecError::Signaled {
            signal,
            name: signal_name(signal),
        })
    } else if libc::WIFEXITED(status) && libc::WEXITSTATUS(status) != 0 {
        Err(ExecError::Exited {
            code: libc::WEXITSTATUS(status),
        })
    } else {
        Ok(())
    }
}

fn signal_name(signal: c_int) -> String {
    // SAFETY: strsignal returns either null or a NUL-terminated string, which is copied before
    // any other call could overwrite it.
    unsafe {
        let name = libc::strsignal(signal);
        if name.is_null() {
            format!("signal {signal}")
        } else {
            CStr::from_ptr(name).to_string_lossy().into_owned()
        }
    }
}
