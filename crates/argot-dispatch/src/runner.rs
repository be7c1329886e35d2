//! The application runner.
//!
//! [`AppRunner`] owns everything that stays fixed across runs: the command
//! tree, settings, type descriptors, transformations, default sources,
//! middleware, and handlers. Each call to [`run`](AppRunner::run) threads a
//! fresh [`RunContext`] through the middleware and, if no step ended the
//! run, invokes the target command's handler.
//!
//! ```
//! use argot::{CommandDef, OperandDef, TypeInfo};
//! use argot_dispatch::AppRunner;
//!
//! let app = AppRunner::builder(
//!     CommandDef::new("greet").operand(OperandDef::new("name", TypeInfo::text())),
//! )
//! .command("", |args, ctx| {
//!     let name: String = args.get("name").unwrap_or_default();
//!     ctx.console.outln(&format!("hello {name}"));
//!     Ok(())
//! })
//! .build()?;
//!
//! let output = app.run_in_memory(["world"]);
//! assert_eq!(output.exit_code, 0);
//! assert_eq!(output.out, "hello world\n");
//! # Ok::<(), argot_dispatch::BuildError>(())
//! ```

use std::rc::Rc;

use argot::{
    AppSettings, Argument, BoundArguments, CommandDef, CommandId, CommandTree, DefaultSource,
    DefaultValue, DescriptorRegistry, TokenTransformation, TransformationPipeline, TypeDescriptor,
};
use argot_input::{AppSettingSource, EnvVarSource};
use tracing::{debug, info_span};

use crate::console::{Console, SystemConsole, TestConsole};
use crate::context::{Extensions, RunContext};
use crate::error::BuildError;
use crate::exit_code;
use crate::handler::{path_to_string, string_to_path, HandlerFn, HandlerRegistry};
use crate::help::help_text;
use crate::pipeline::{Flow, Middleware, MiddlewarePipeline};
use crate::{directives, piped, prompt, stages};

/// Captured result of [`AppRunner::run_in_memory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub exit_code: i32,
    pub out: String,
    pub err: String,
}

impl RunOutput {
    pub fn is_success(&self) -> bool {
        self.exit_code == exit_code::SUCCESS
    }
}

/// Assembles an [`AppRunner`].
pub struct AppRunnerBuilder {
    root: CommandDef,
    settings: AppSettings,
    registry: DescriptorRegistry,
    transformations: TransformationPipeline,
    sources: Vec<Box<dyn DefaultSource>>,
    middleware: Vec<Middleware>,
    handlers: Vec<(String, HandlerFn)>,
    app_state: Extensions,
    executable: Option<String>,
}

impl AppRunnerBuilder {
    pub fn settings(mut self, settings: AppSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Looks up defaults in environment variables.
    ///
    /// With `conventions`, arguments without a declared key are looked up
    /// by `"{command} {alias}"` and then by alias.
    pub fn env_vars(self, conventions: bool) -> Self {
        self.default_source(EnvVarSource::new().with_conventions(conventions))
    }

    /// Looks up defaults in app settings.
    pub fn app_settings(self, source: AppSettingSource) -> Self {
        self.default_source(source)
    }

    /// Adds a default source. Sources are consulted in registration order.
    pub fn default_source(mut self, source: impl DefaultSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Adds a type descriptor, tried before the built-in ones.
    pub fn descriptor(mut self, descriptor: impl TypeDescriptor + 'static) -> Self {
        self.registry.register(descriptor);
        self
    }

    /// Converts arguments typed `ValueType::custom::<T>()` through `FromStr`.
    pub fn from_str_type<T>(mut self) -> Self
    where
        T: std::str::FromStr + std::fmt::Display + Send + Sync + 'static,
        T::Err: std::fmt::Display,
    {
        self.registry.register_from_str::<T>();
        self
    }

    pub fn transformation(mut self, transformation: TokenTransformation) -> Self {
        self.transformations.add(transformation);
        self
    }

    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Registers the handler for a dot-separated command path; `""` is the root.
    pub fn command<F>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(&BoundArguments, &mut RunContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.push((path.to_string(), Rc::new(handler)));
        self
    }

    /// Adds a value to the state shared by every run.
    pub fn app_state<T: 'static>(mut self, value: T) -> Self {
        self.app_state.insert(value);
        self
    }

    /// Overrides the executable path handed to the suggestion helper.
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Validates the command tree and handler paths.
    pub fn build(self) -> Result<AppRunner, BuildError> {
        let tree = CommandTree::build(self.root, &self.settings)?;
        self.registry.check_tree(&tree)?;

        let mut handlers = HandlerRegistry::default();
        for (path, handler) in self.handlers {
            let id = resolve_path(&tree, &path).ok_or(BuildError::UnknownCommand(path))?;
            handlers.insert(path_to_string(&tree.path_names(id)), handler);
        }

        let mut pipeline = MiddlewarePipeline::new();
        stages::middleware()
            .into_iter()
            .chain(directives::middleware())
            .chain([piped::middleware(), prompt::middleware()])
            .chain(self.middleware)
            .for_each(|m| pipeline.add(m));
        debug!(steps = ?pipeline.names(), "middleware pipeline");

        Ok(AppRunner {
            tree,
            settings: self.settings,
            registry: self.registry,
            transformations: self.transformations,
            sources: self.sources,
            pipeline,
            handlers,
            app_state: Rc::new(self.app_state),
            executable: self.executable,
        })
    }
}

/// Finds the command for a dot path, matching names and aliases.
fn resolve_path(tree: &CommandTree, path: &str) -> Option<CommandId> {
    string_to_path(path)
        .iter()
        .try_fold(CommandId::ROOT, |id, name| tree.find_subcommand(id, name))
}

/// Runs a command-line application.
pub struct AppRunner {
    tree: CommandTree,
    settings: AppSettings,
    registry: DescriptorRegistry,
    transformations: TransformationPipeline,
    sources: Vec<Box<dyn DefaultSource>>,
    pipeline: MiddlewarePipeline,
    handlers: HandlerRegistry,
    app_state: Rc<Extensions>,
    executable: Option<String>,
}

impl AppRunner {
    pub fn builder(root: CommandDef) -> AppRunnerBuilder {
        AppRunnerBuilder {
            root,
            settings: AppSettings::default(),
            registry: DescriptorRegistry::new(),
            transformations: TransformationPipeline::new(),
            sources: Vec::new(),
            middleware: Vec::new(),
            handlers: Vec::new(),
            app_state: Extensions::new(),
            executable: None,
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    pub fn transformations(&self) -> &TransformationPipeline {
        &self.transformations
    }

    pub fn default_sources(&self) -> &[Box<dyn DefaultSource>] {
        &self.sources
    }

    pub fn middleware_names(&self) -> Vec<&str> {
        self.pipeline.names()
    }

    pub fn app_state(&self) -> Rc<Extensions> {
        Rc::clone(&self.app_state)
    }

    /// The default an argument would bind to without user input: the first
    /// source with a value, else the declared default.
    pub fn default_for(&self, argument: &Argument) -> Option<DefaultValue> {
        self.sources
            .iter()
            .find_map(|s| s.default_for(&self.tree, argument))
            .or_else(|| argument.default.clone())
    }

    /// Path of the running executable, for the suggestion helper.
    pub fn executable_path(&self) -> String {
        self.executable
            .clone()
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .map(|p| p.display().to_string())
            })
            .unwrap_or_else(|| self.tree.root().name.clone())
    }

    /// Runs against the process console and returns the exit code.
    ///
    /// `args` excludes the program name.
    pub fn run<I, S>(&self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_with(args, &mut SystemConsole)
    }

    /// Runs in memory with an interactive console that has no answers.
    pub fn run_in_memory<I, S>(&self, args: I) -> RunOutput
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_in_memory_with(args, TestConsole::new())
    }

    /// Runs in memory with a prepared console (piped lines, prompt answers).
    pub fn run_in_memory_with<I, S>(&self, args: I, mut console: TestConsole) -> RunOutput
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exit_code = self.run_with(args, &mut console);
        RunOutput {
            exit_code,
            out: console.out_text().to_string(),
            err: console.err_text().to_string(),
        }
    }

    pub fn run_with<I, S>(&self, args: I, console: &mut dyn Console) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let span = info_span!("run", app = %self.tree.root().name);
        let _guard = span.enter();

        let mut ctx = RunContext::new(self, args, console);
        let code = match self.pipeline.run(&mut ctx) {
            Ok(Flow::Exit(code)) => code,
            Ok(Flow::Continue) => self.invoke(&mut ctx),
            Err(err) => {
                report_error(ctx.console, &err, self.settings.verbose_errors);
                exit_code::ERROR
            }
        };
        debug!(code, "run finished");
        code
    }

    fn invoke(&self, ctx: &mut RunContext<'_>) -> i32 {
        let Some(target) = ctx.parse_result().map(|r| r.target) else {
            return exit_code::ERROR;
        };
        let path = self.tree.path_names(target);
        let Some(handler) = self.handlers.get(&path).cloned() else {
            debug!(command = %path_to_string(&path), "no handler, showing help");
            let help = help_text(&self.tree, &self.registry, target, ctx.console.colors_enabled());
            ctx.console.out(&help);
            return exit_code::SUCCESS;
        };
        let Some(bound) = ctx.bound.take() else {
            return exit_code::ERROR;
        };

        debug!(command = %path_to_string(&path), "invoking handler");
        let outcome = handler(&bound, ctx);
        ctx.bound = Some(bound);
        match outcome {
            Ok(()) => exit_code::SUCCESS,
            Err(err) => {
                report_error(ctx.console, &err, self.settings.verbose_errors);
                exit_code::ERROR
            }
        }
    }
}

/// Prints an error, with its source chain when `verbose`.
pub(crate) fn report_error(console: &mut dyn Console, err: &anyhow::Error, verbose: bool) {
    console.errln(&err.to_string());
    if verbose {
        for cause in err.chain().skip(1) {
            console.errln(&format!("  caused by: {cause}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot::{OperandDef, TypeInfo};

    fn app() -> AppRunnerBuilder {
        AppRunner::builder(
            CommandDef::new("calc").subcommand(
                CommandDef::new("add")
                    .alias("plus")
                    .operand(OperandDef::new("x", TypeInfo::int())),
            ),
        )
    }

    #[test]
    fn test_unknown_handler_path_rejected() {
        let err = app().command("mul", |_, _| Ok(())).build().err();
        assert!(matches!(err, Some(BuildError::UnknownCommand(p)) if p == "mul"));
    }

    #[test]
    fn test_alias_path_normalized() {
        let runner = app().command("plus", |_, ctx| {
            ctx.console.out("ran");
            Ok(())
        });
        let runner = runner.build().unwrap();
        assert_eq!(runner.run_in_memory(["add", "1"]).out, "ran");
    }

    #[test]
    fn test_builtin_middleware_order() {
        let runner = app().build().unwrap();
        assert_eq!(
            runner.middleware_names(),
            vec![
                "tokenize",
                "directive:parse-help",
                "directive:suggest-helper",
                "transform",
                "parse",
                "directive:parse",
                "directive:suggest",
                "report-parse",
                "piped-input",
                "prompt",
                "bind",
                "directive:cmdlog",
            ]
        );
    }

    #[test]
    fn test_report_error_chain() {
        let mut console = TestConsole::new();
        let err = anyhow::anyhow!("disk full").context("saving failed");
        report_error(&mut console, &err, true);
        assert_eq!(console.err_text(), "saving failed\n  caused by: disk full\n");

        let mut console = TestConsole::new();
        report_error(&mut console, &err, false);
        assert_eq!(console.err_text(), "saving failed\n");
    }
}
