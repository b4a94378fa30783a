use std::fmt::Arguments;
use std::io::{self, Stderr, Write};
use std::process;

use derive_more::{Display, IsVariant};

/// The severity of a log line, displayed as the prefix it is written with.
#[derive(Debug, Display, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    #[display("[INFO] ")]
    Info,
    #[display("[WARN] ")]
    Warn,
    #[display("[ERRO] ")]
    Error,
}

/// Writes formatted lines to a stream, optionally prefixed with a [`Level`].
///
/// Each line is written with a single call to the stream, so lines from different loggers sharing
/// a stream don't interleave mid-line. Write failures are ignored: there is nowhere left to report
/// them.
///
/// # Examples
/// ```
/// # use container_lib::logger::Logger;
/// let mut logger = Logger::new(Vec::new());
/// logger.info(format_args!("Executing \"{}\".", "cat main.c"));
/// logger.warn(format_args!("{} files skipped", 2));
/// assert_eq!(
///     String::from_utf8(logger.into_inner()).unwrap(),
///     "[INFO] Executing \"cat main.c\".\n[WARN] 2 files skipped\n"
/// );
/// ```
#[derive(Debug)]
pub struct Logger<W: Write = Stderr> {
    stream: W,
}

impl Logger<Stderr> {
    /// Creates a Logger writing to the standard error stream.
    pub fn stderr() -> Logger<Stderr> {
        Logger::new(io::stderr())
    }
}

impl<W: Write> Logger<W> {
    pub const fn new(stream: W) -> Logger<W> {
        Logger { stream }
    }

    pub const fn stream(&self) -> &W {
        &self.stream
    }

    pub const fn stream_mut(&mut self) -> &mut W {
        &mut self.stream
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    /// Writes a line without a prefix.
    pub fn log(&mut self, args: Arguments<'_>) {
        let _ = writeln!(self.stream, "{args}");
    }

    /// Writes a line prefixed with `level`.
    pub fn log_at(&mut self, level: Level, args: Arguments<'_>) {
        let _ = writeln!(self.stream, "{level}{args}");
    }

    pub fn info(&mut self, args: Arguments<'_>) {
        self.log_at(Level::Info, args);
    }

    pub fn warn(&mut self, args: Arguments<'_>) {
        self.log_at(Level::Warn, args);
    }

    pub fn error(&mut self, args: Arguments<'_>) {
        self.log_at(Level::Error, args);
    }

    /// Writes an error line, flushes the stream and terminates the process with exit status 1.
    /// Unlike [`panic!`], this doesn't unwind: no destructors run.
    pub fn panic(&mut self, args: Arguments<'_>) -> ! {
        self.error(args);
        let _ = self.stream.flush();
        process::exit(1)
    }
}

impl Default for Logger<Stderr> {
    fn default() -> Self {
        Logger::stderr()
    }
}
