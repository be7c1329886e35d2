//! Default-value and piped-input sources for argot apps.
//!
//! The binder in `argot` resolves an argument with no user input by asking
//! each registered [`argot::DefaultSource`] in turn. This crate provides the
//! two standard ones, environment variables and app settings files, plus
//! the stdin reader used to inject piped input.
//!
//! ```text
//! user input → EnvVarSource → AppSettingSource → declared default → type default
//! ```
//!
//! # Testing
//!
//! All sources accept mock readers:
//!
//! ```
//! use std::sync::Arc;
//! use argot_input::{EnvVarSource, MockEnv, MockStdin, PipedInput};
//!
//! let env = EnvVarSource::with_reader(MockEnv::new().with_var("TOKEN", "secret"));
//! let mut piped = PipedInput::with_reader(Arc::new(MockStdin::piped("a\nb")));
//! assert_eq!(piped.take_lines().unwrap().map(|l| l.len()), Some(2));
//! ```

pub mod env;
mod error;
pub mod sources;

pub use env::{EnvReader, MockEnv, MockStdin, RealEnv, RealStdin, StdinReader};
pub use error::InputError;
pub use sources::{convention_keys, AppSettingSource, EnvVarSource, PipedInput};
