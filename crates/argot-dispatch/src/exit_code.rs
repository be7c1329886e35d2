//! Process exit codes returned by the runner.

/// The run completed, or a directive, help, or version request was served.
pub const SUCCESS: i32 = 0;
/// A parse error, configuration error, or failing handler.
pub const ERROR: i32 = 1;
/// A value could not be converted to its argument's type.
pub const BINDING_FAILURE: i32 = 2;
