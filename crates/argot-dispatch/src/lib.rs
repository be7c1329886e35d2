//! Runs argot command-line apps.
//!
//! `argot` parses and binds; this crate turns that into a program. An
//! [`AppRunner`] owns the command tree and threads every run through an
//! ordered [`MiddlewarePipeline`]:
//!
//! ```text
//! args → tokenize → directives → transform → parse → help/errors
//!      → piped input → prompts → bind → [cmdlog] → handler
//! ```
//!
//! Each step reads and writes a [`RunContext`] and either continues or ends
//! the run with an exit code (see [`exit_code`]). Application middleware is
//! slotted in by [`Stage`] and order.
//!
//! # Directives
//!
//! A bracketed first argument switches the run into a diagnostic mode:
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `[parse]` | report the target command and each argument's inputs and default |
//! | `[parse:tokens]` | also list tokens from the shell and after transformation |
//! | `[parse:help]` | list the parse options |
//! | `[suggest]`, `[suggest:N]` | print completion candidates |
//! | `[suggest-helper:register]` | register with the external completion helper |
//! | `[cmdlog]` | log the invocation, then run it |
//!
//! # Testing
//!
//! [`AppRunner::run_in_memory`] runs against a [`TestConsole`] and returns
//! both output streams with the exit code.

pub mod console;
pub mod context;
mod directives;
mod error;
pub mod exit_code;
mod handler;
pub mod help;
mod piped;
pub mod pipeline;
mod prompt;
mod runner;
mod stages;

pub use console::{Console, SystemConsole, TestConsole};
pub use context::{Extensions, RunContext, TransformStep};
pub use directives::BUILTIN_DIRECTIVES;
pub use error::BuildError;
pub use handler::{path_to_string, string_to_path, HandlerFn};
pub use help::{extract_help_data, help_text, render_help, HelpData, HelpRow};
pub use pipeline::{Flow, Middleware, MiddlewareFn, MiddlewarePipeline, Stage};
pub use runner::{AppRunner, AppRunnerBuilder, RunOutput};
