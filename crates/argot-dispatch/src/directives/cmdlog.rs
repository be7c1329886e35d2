//! The `[cmdlog]` directive: logs the invocation, then lets it run.

use crate::context::RunContext;
use crate::pipeline::Flow;

use super::report::arguments_report;

pub(crate) const NAME: &str = "cmdlog";

const FRAME: &str = "***************************************";

pub(crate) fn stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    if ctx.directive(NAME).is_none() {
        return Ok(Flow::Continue);
    }
    let Some(result) = ctx.parse_result() else {
        return Ok(Flow::Continue);
    };

    let mut out = String::new();
    out.push_str(FRAME);
    out.push('\n');
    out.push_str("Original input:\n  ");
    out.push_str(&ctx.original_args.join(" "));
    out.push('\n');
    out.push_str(&arguments_report(ctx, result, ctx.bound.as_ref()));
    out.push_str(FRAME);
    out.push('\n');
    ctx.console.out(&out);
    Ok(Flow::Continue)
}
