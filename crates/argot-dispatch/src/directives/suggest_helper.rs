//! The `[suggest-helper:register]` and `[suggest-helper:unregister]`
//! directives, which hand the app to an external shell-completion helper.

use std::time::Duration;

use argot_pipe::run_helper;
use tracing::{debug, warn};

use crate::context::RunContext;
use crate::exit_code;
use crate::pipeline::Flow;

pub(crate) const NAME: &str = "suggest-helper";

const ACTIONS: [&str; 2] = ["register", "unregister"];

const HELPER_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let Some(contents) = ctx.directive(NAME) else {
        return Ok(Flow::Continue);
    };
    let action = contents.split_once(':').map(|(_, a)| a.trim().to_string());
    let Some(action) = action.filter(|a| ACTIONS.contains(&a.as_str())) else {
        let message = format!(
            "Unknown suggest-helper action in [{contents}]. Use [suggest-helper:register] or [suggest-helper:unregister]"
        );
        ctx.console.errln(&message);
        return Ok(Flow::Exit(exit_code::ERROR));
    };

    let helper = ctx.app.settings().suggest_helper.clone();
    let command_path = ctx.app.executable_path();
    let name = ctx.tree().root().name.clone();
    let args = [
        action.as_str(),
        "--command-path",
        command_path.as_str(),
        "--suggestion-command",
        name.as_str(),
    ];
    debug!(helper = %helper, action = %action, "running suggest helper");

    let failure = format!("Failed to {action} with {helper}");
    match run_helper(&helper, &args, Some(HELPER_TIMEOUT)) {
        Ok(output) if output.success() => {
            if !output.stdout.is_empty() {
                ctx.console.out(&output.stdout);
            }
            Ok(Flow::Exit(exit_code::SUCCESS))
        }
        Ok(output) => {
            warn!(helper = %helper, code = ?output.exit_code, "suggest helper failed");
            ctx.console.errln(&failure);
            let code = output
                .exit_code
                .map_or_else(|| "none".to_string(), |c| c.to_string());
            ctx.console.errln(&format!("exit code: {code}"));
            let stderr = output.stderr.trim();
            if !stderr.is_empty() {
                ctx.console.errln(stderr);
            }
            Ok(Flow::Exit(exit_code::ERROR))
        }
        Err(err) => {
            warn!(helper = %helper, error = %err, "suggest helper did not run");
            ctx.console.errln(&failure);
            ctx.console.errln(&err.to_string());
            Ok(Flow::Exit(exit_code::ERROR))
        }
    }
}
