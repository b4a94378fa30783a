//! Runs external programs from a single command line, logging what is executed.
//!
//! Commands are split on blank characters only: there is no quoting, escaping or globbing, and
//! the program is looked up through `PATH` like a shell would.

mod builder;
mod error;
mod tokenize;

pub use builder::*;
pub use error::*;
pub use tokenize::*;
