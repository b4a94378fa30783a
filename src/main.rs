use std::env;
use std::os::unix::ffi::OsStringExt;

use container_lib::alloc::SystemAllocator;
use container_lib::builder::Builder;
use container_lib::collections::str_buf::StrBuf;

/// Runs the command given by the arguments, such as `container-lib cat src/main.rs`, and exits
/// with status 1 if it doesn't succeed.
fn main() {
    let mut builder = Builder::new();
    let mut args = env::args_os().skip(1).map(OsStringExt::into_vec);
    let Some(program) = args.next() else {
        builder
            .logger_mut()
            .panic(format_args!("Usage: container-lib <program> [arguments...]"));
    };

    let mut command = StrBuf::from_text(&SystemAllocator, program);
    command.join(" ", args);
    builder.exec_or_exit(command.as_bytes());
}
