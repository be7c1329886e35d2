//! The middleware pipeline.
//!
//! Every run passes through an ordered list of middleware. The runner's own
//! behavior (tokenizing, directives, parsing, piped input, prompting,
//! binding) is registered as middleware too, so application middleware can
//! be placed before or after any built-in step:
//!
//! ```text
//! Tokenize                     tokenize → [parse:help] → [suggest-helper] → transform
//! ParseInput                   parse
//! PostParseInputPreBindValues  [parse] → [suggest] → help/errors → piped input → prompts
//! BindValues                   bind
//! PostBindValuesPreInvoke      [cmdlog] → (application middleware)
//!                              → handler
//! ```
//!
//! A middleware either lets the run continue or ends it with an exit code.
//! Returning an error ends the run with [`exit_code::ERROR`](crate::exit_code::ERROR).

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::context::RunContext;

/// What a middleware decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop the run without invoking the handler.
    Exit(i32),
}

/// Coarse positions in the pipeline; `order` sorts within a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Tokenize,
    ParseInput,
    PostParseInputPreBindValues,
    BindValues,
    PostBindValuesPreInvoke,
}

/// Function type of a middleware step.
pub type MiddlewareFn = Rc<dyn Fn(&mut RunContext<'_>) -> anyhow::Result<Flow>>;

/// A named step of the pipeline.
#[derive(Clone)]
pub struct Middleware {
    name: String,
    stage: Stage,
    order: i32,
    f: MiddlewareFn,
}

impl Middleware {
    pub fn new<F>(name: impl Into<String>, stage: Stage, order: i32, f: F) -> Self
    where
        F: Fn(&mut RunContext<'_>) -> anyhow::Result<Flow> + 'static,
    {
        Self {
            name: name.into(),
            stage,
            order,
            f: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn call(&self, ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
        (self.f)(ctx)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.name)
            .field("stage", &self.stage)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Middleware sorted by stage, then order, then registration.
#[derive(Debug, Clone, Default)]
pub struct MiddlewarePipeline {
    steps: Vec<Middleware>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, middleware: Middleware) {
        self.steps.push(middleware);
        self.steps.sort_by_key(|m| (m.stage, m.order));
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(Middleware::name).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs each step until one exits or fails.
    pub fn run(&self, ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
        for step in &self.steps {
            trace!(middleware = %step.name, "running middleware");
            match step.call(ctx)? {
                Flow::Continue => {}
                Flow::Exit(code) => {
                    debug!(middleware = %step.name, code, "middleware ended the run");
                    return Ok(Flow::Exit(code));
                }
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str, stage: Stage, order: i32) -> Middleware {
        Middleware::new(name, stage, order, |_| Ok(Flow::Continue))
    }

    #[test]
    fn test_sorted_by_stage_then_order() {
        let mut pipeline = MiddlewarePipeline::new();
        pipeline.add(noop("invoke-late", Stage::PostBindValuesPreInvoke, 0));
        pipeline.add(noop("tokenize", Stage::Tokenize, 0));
        pipeline.add(noop("parse-b", Stage::ParseInput, 5));
        pipeline.add(noop("parse-a", Stage::ParseInput, -5));
        pipeline.add(noop("parse-c", Stage::ParseInput, 5));
        assert_eq!(
            pipeline.names(),
            vec!["tokenize", "parse-a", "parse-b", "parse-c", "invoke-late"]
        );
    }

    #[test]
    fn test_middleware_debug_omits_fn() {
        let debug = format!("{:?}", noop("x", Stage::BindValues, 1));
        assert!(debug.contains("\"x\""));
        assert!(debug.contains("BindValues"));
    }
}
