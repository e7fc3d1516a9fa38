//! Library half of the `ibx` binary.
//!
//! Everything here is shell-agnostic enough to test without spawning the
//! binary: batch conversion of directory trees, the `inspect` views and the
//! tracing setup. Argument parsing and process exit codes live in `main.rs`.

pub mod batch;
pub mod inspect;
pub mod logging;

/// Format a conversion targets when `--to` is not given.
pub fn counterpart(format: &str) -> &'static str {
    if format == "ibx" {
        "xml"
    } else {
        "ibx"
    }
}
