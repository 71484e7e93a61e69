//! Allowlisted shell access
//!
//! - [`dialect`] - per-OS quoting, vocabulary and interpreter
//! - [`sanitizer`] - free text to a validated command
//! - [`diagnostics`] - fixed one-click commands
//! - [`runner`] - process execution

pub mod diagnostics;
pub mod dialect;
pub mod runner;
pub mod sanitizer;

pub use dialect::{native, CommandSpec, Posix, PowerShell, ShellDialect, Verb};
pub use runner::{CommandOutput, CommandRunner};
pub use sanitizer::{try_build, Rejection, ShellCommand};
