//! Tokenizing, parsing, and binding of command-line arguments.
//!
//! `argot` turns a raw argument array into typed values for one command of a
//! command tree. The pipeline runs in fixed stages:
//!
//! 1. **Tokenize** ([`tokenize`]): classify each argument as a directive,
//!    option, value, or separator.
//! 2. **Transform** ([`TransformationPipeline`]): split `--opt=value`
//!    assignments, run user transformations, expand clubbed `-abc` flags.
//! 3. **Parse** ([`Parser`]): walk the tokens against the [`CommandTree`],
//!    descending into subcommands and collecting raw values per argument.
//! 4. **Bind** ([`Binder`]): resolve each argument from user input, default
//!    sources, declared defaults, or the type default, converting through
//!    the [`DescriptorRegistry`].
//!
//! The tree is immutable once built; everything a run produces lives in the
//! [`ParseResult`] and [`BoundArguments`], so one tree serves many runs.
//!
//! # Example
//!
//! ```rust
//! use argot::{
//!     default_registry, tokenize, AppSettings, Binder, CommandDef, CommandTree, OperandDef,
//!     OptionDef, Parser, TransformationPipeline, TypeInfo,
//! };
//!
//! let settings = AppSettings::default();
//! let tree = CommandTree::build(
//!     CommandDef::new("calc").subcommand(
//!         CommandDef::new("add")
//!             .operand(OperandDef::new("x", TypeInfo::int()))
//!             .operand(OperandDef::new("y", TypeInfo::int()))
//!             .option(OptionDef::new("operator", TypeInfo::text()).short('o')),
//!     ),
//!     &settings,
//! )?;
//!
//! let tokens = TransformationPipeline::new().run(tokenize(["add", "-o", "*", "2", "3"], true))?;
//! let parsed = Parser::new(&tree, &settings).parse(&tokens)?;
//! let bound = Binder::new(&tree, default_registry(), &[]).bind(&parsed)?;
//!
//! assert_eq!(bound.get::<i64>("x"), Some(2));
//! assert_eq!(bound.get::<String>("operator").as_deref(), Some("*"));
//! # Ok::<(), argot::Error>(())
//! ```
//!
//! Logging goes through `tracing`; the library never installs a subscriber.

pub mod bind;
pub mod descriptors;
pub mod error;
pub mod model;
pub mod parser;
pub mod settings;
pub mod token;
pub mod tokenizer;
pub mod transform;

pub use bind::{Binder, BoundArguments, BoundValue, DefaultSource, ValueOrigin};
pub use descriptors::{default_registry, DescriptorRegistry, FromStrDescriptor, TypeDescriptor};
pub use error::{ConfigError, Error, ParseError, ValueParsingError};
pub use model::{
    Argument, ArgumentId, ArgumentKind, Arity, BuiltinOption, Command, CommandDef, CommandId,
    CommandTree, CustomValue, DefaultPayload, DefaultValue, FromValue, OperandDef, OptionDef,
    OptionNames, TypeInfo, Value, ValueType,
};
pub use parser::{ArgumentValues, InputValue, ParseResult, Parser, ValueSource};
pub use settings::{AppSettings, BooleanMode, PipedInputSettings};
pub use token::{OptionPrefix, OptionToken, Token, TokenType, Tokens};
pub use tokenizer::tokenize;
pub use transform::{TokenTransformation, TransformError, TransformObserver, TransformationPipeline};
