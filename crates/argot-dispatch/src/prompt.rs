//! Prompts for operands that received no value.

use argot::{Argument, InputValue, ValueSource};
use tracing::debug;

use crate::context::RunContext;
use crate::pipeline::{Flow, Middleware, Stage};

pub(crate) fn middleware() -> Middleware {
    Middleware::new("prompt", Stage::PostParseInputPreBindValues, 100, stage)
}

/// `x (Number): ` or `names (Text (Multiple)) [separate values by space]: `.
pub(crate) fn prompt_text(argument: &Argument, type_name: &str) -> String {
    if argument.arity.allows_many() {
        format!("{} ({type_name}) [separate values by space]: ", argument.name)
    } else {
        format!("{} ({type_name}): ", argument.name)
    }
}

fn stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    if !ctx.app.settings().prompt_for_missing_operands || ctx.console.is_input_redirected() {
        return Ok(Flow::Continue);
    }
    let Some(result) = ctx.parse_result() else {
        return Ok(Flow::Continue);
    };
    let tree = ctx.tree();
    let missing: Vec<&Argument> = tree
        .command(result.target)
        .operands
        .iter()
        .map(|o| tree.argument(*o))
        .filter(|o| !result.values.has_user_input(o.id))
        .filter(|o| ctx.app.default_for(o).is_none())
        .collect();

    let mut answers = Vec::new();
    for operand in missing {
        let type_name = ctx.app.registry().display_name(&operand.type_info);
        ctx.console.out(&prompt_text(operand, &type_name));
        let Some(line) = ctx.console.read_line()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<String> = if operand.arity.allows_many() {
            line.split_whitespace().map(str::to_string).collect()
        } else {
            vec![line.to_string()]
        };
        debug!(operand = %operand.name, values = values.len(), "prompted");
        answers.push((operand.id, values));
    }

    if let Some(result) = ctx.parse_result_mut() {
        for (id, values) in answers {
            result
                .values
                .push_batch(id, InputValue::new(ValueSource::Prompt, values));
        }
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot::{AppSettings, CommandDef, CommandTree, OperandDef, TypeInfo, ValueType};

    #[test]
    fn test_prompt_text_marks_lists() {
        let def = CommandDef::new("app")
            .operand(OperandDef::new("x", TypeInfo::int()))
            .operand(OperandDef::new("names", TypeInfo::list(ValueType::Text)));
        let tree = CommandTree::build(def, &AppSettings::default()).unwrap();
        let operands = &tree.root().operands;
        assert_eq!(prompt_text(tree.argument(operands[0]), "Number"), "x (Number): ");
        assert_eq!(
            prompt_text(tree.argument(operands[1]), "Text (Multiple)"),
            "names (Text (Multiple)) [separate values by space]: "
        );
    }
}
