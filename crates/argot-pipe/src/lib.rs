//! Running external helper processes for directives.
//!
//! Some directives hand work to another program, for example registering
//! the app with a shell-completion helper. [`run_helper`] spawns the
//! program, blocks until it exits (or a timeout kills it), and returns the
//! captured stdout and stderr together with the exit code. A non-zero exit
//! is reported in [`HelperOutput`], not raised as an error.

pub mod helper;

pub use helper::{run_helper, HelperError, HelperOutput};
