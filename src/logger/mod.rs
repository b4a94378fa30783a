//! A minimal leveled logger writing whole lines to any [`Write`](std::io::Write) stream.

mod logger;

pub use logger::*;
