use std::io;

use derive_more::{Display, Error, From, IsVariant};

use crate::util::error::StrBufError;

/// The ways in which running a command can fail. Errors reported by the OS carry the raw error
/// number and display its description.
#[derive(Debug, Display, Error, From, IsVariant, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[display("The command doesn't name a program!")]
    EmptyCommand,
    /// Splitting the command into arguments failed to allocate.
    #[from]
    Alloc(StrBufError),
    #[display("({}) Could not fork a child process!", io::Error::from_raw_os_error(*_0))]
    Fork(#[error(not(source))] i32),
    /// The child process was created but the program couldn't replace it.
    #[display("({}) Could not execute the program!", io::Error::from_raw_os_error(*_0))]
    Exec(#[error(not(source))] i32),
    #[display(
        "({}) An error occurred while waiting for a child process to complete!",
        io::Error::from_raw_os_error(*_0)
    )]
    Wait(#[error(not(source))] i32),
    #[display("The program exited with exit code {code}!")]
    Exited { code: i32 },
    #[display("The program was terminated by {name} (signal {signal})!")]
    Signaled { signal: i32, name: String },
}
