//! Help text for commands.
//!
//! Help is built in two steps: [`extract_help_data`] collects what to show
//! from the tree, and [`render_help`] lays it out as aligned columns.

use console::{pad_str, measure_text_width, Alignment, Style};
use serde::Serialize;

use argot::{Argument, Arity, CommandId, CommandTree, DescriptorRegistry, ValueType};

/// Minimum width for the name column.
pub(crate) const NAME_COLUMN_WIDTH: usize = 14;

#[derive(Debug, Clone, Serialize)]
pub struct HelpData {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub arguments: Vec<HelpRow>,
    pub options: Vec<HelpRow>,
    pub commands: Vec<HelpRow>,
    /// Closing hint pointing at subcommand help.
    pub footer: Option<String>,
}

/// One line of a help section.
#[derive(Debug, Clone, Serialize)]
pub struct HelpRow {
    pub name: String,
    pub help: String,
}

pub fn extract_help_data(
    tree: &CommandTree,
    registry: &DescriptorRegistry,
    id: CommandId,
) -> HelpData {
    let command = tree.command(id);
    let full_path: Vec<String> = tree
        .path(id)
        .into_iter()
        .map(|c| tree.command(c).name.clone())
        .collect();
    let full_path = full_path.join(" ");

    let arguments: Vec<HelpRow> = command
        .operands
        .iter()
        .map(|a| tree.argument(*a))
        .map(|a| HelpRow {
            name: format!("{} <{}>", a.name, registry.display_name(&a.type_info)),
            help: argument_help(a),
        })
        .collect();

    let options: Vec<HelpRow> = tree
        .all_options(id, true)
        .into_iter()
        .map(|o| tree.argument(o))
        .filter(|o| !o.is_hidden())
        .map(|o| HelpRow {
            name: option_label(o, registry),
            help: argument_help(o),
        })
        .collect();

    let commands: Vec<HelpRow> = command
        .subcommands
        .iter()
        .map(|c| tree.command(*c))
        .map(|c| HelpRow {
            name: std::iter::once(c.name.as_str())
                .chain(c.aliases.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(", "),
            help: c.description.clone().unwrap_or_default(),
        })
        .collect();

    let mut usage = full_path.clone();
    if !commands.is_empty() {
        usage.push_str(" [command]");
    }
    if !options.is_empty() {
        usage.push_str(" [options]");
    }
    for operand in command.operands.iter().map(|a| tree.argument(*a)) {
        usage.push(' ');
        usage.push_str(&operand_usage(operand));
    }

    let has_help = tree
        .all_options(id, true)
        .into_iter()
        .any(|o| tree.argument(o).builtin() == Some(argot::BuiltinOption::Help));
    let footer = (has_help && !commands.is_empty()).then(|| {
        format!("Use \"{full_path} [command] --help\" for more information about a command.")
    });

    HelpData {
        name: command.name.clone(),
        description: command.description.clone().unwrap_or_default(),
        usage,
        arguments,
        options,
        commands,
        footer,
    }
}

fn operand_usage(operand: &Argument) -> String {
    match operand.arity {
        Arity::ExactlyOne => format!("<{}>", operand.name),
        Arity::ZeroOrMore => format!("[{} ...]", operand.name),
        _ => format!("[{}]", operand.name),
    }
}

fn option_label(option: &Argument, registry: &DescriptorRegistry) -> String {
    let aliases = option
        .option_names()
        .map(|n| n.prefixed_aliases())
        .unwrap_or_default()
        .join(", ");
    if option.arity.allows_none() {
        aliases
    } else {
        format!("{aliases} <{}>", registry.display_name(&option.type_info))
    }
}

fn argument_help(argument: &Argument) -> String {
    let mut parts = Vec::new();
    if let Some(description) = &argument.description {
        parts.push(description.clone());
    }
    if let ValueType::Enum { variants, .. } = &argument.type_info.underlying {
        parts.push(format!("[allowed: {}]", variants.join(", ")));
    }
    if let Some(default) = &argument.default {
        parts.push(format!("[default: {}]", default.display_values().join(", ")));
    }
    parts.join(" ")
}

/// Lays out help data; headers are bold when `styled` is set.
pub fn render_help(data: &HelpData, styled: bool) -> String {
    let header = |title: &str| {
        if styled {
            Style::new().bold().apply_to(title).to_string()
        } else {
            title.to_string()
        }
    };

    let width = data
        .arguments
        .iter()
        .chain(&data.options)
        .chain(&data.commands)
        .map(|r| measure_text_width(&r.name))
        .max()
        .unwrap_or(0)
        .max(NAME_COLUMN_WIDTH);

    let mut out = String::new();
    if !data.description.is_empty() {
        out.push_str(&data.description);
        out.push_str("\n\n");
    }
    out.push_str(&format!("{} {}\n", header("Usage:"), data.usage));

    for (title, rows) in [
        ("Arguments:", &data.arguments),
        ("Options:", &data.options),
        ("Commands:", &data.commands),
    ] {
        if rows.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&header(title));
        out.push('\n');
        for row in rows {
            let line = if row.help.is_empty() {
                format!("  {}", row.name)
            } else {
                format!("  {}  {}", pad_str(&row.name, width, Alignment::Left, None), row.help)
            };
            out.push_str(&line);
            out.push('\n');
        }
    }

    if let Some(footer) = &data.footer {
        out.push('\n');
        out.push_str(footer);
        out.push('\n');
    }
    out
}

/// Extracts and renders help for `id` in one step.
pub fn help_text(
    tree: &CommandTree,
    registry: &DescriptorRegistry,
    id: CommandId,
    styled: bool,
) -> String {
    render_help(&extract_help_data(tree, registry, id), styled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot::{default_registry, AppSettings, CommandDef, OperandDef, OptionDef, TypeInfo};

    fn tree() -> CommandTree {
        let def = CommandDef::new("calc")
            .description("A calculator")
            .option(OptionDef::flag("secret").hidden(true))
            .subcommand(
                CommandDef::new("add")
                    .alias("plus")
                    .description("Adds two numbers")
                    .operand(OperandDef::new("x", TypeInfo::int()).description("first"))
                    .operand(OperandDef::new("y", TypeInfo::int()))
                    .option(
                        OptionDef::new("operator", TypeInfo::text())
                            .short('o')
                            .default_text("+"),
                    ),
            );
        CommandTree::build(def, &AppSettings::default()).unwrap()
    }

    #[test]
    fn test_help_data_for_subcommand() {
        let tree = tree();
        let add = tree.find_subcommand(CommandId::ROOT, "add").unwrap();
        let data = extract_help_data(&tree, default_registry(), add);
        assert_eq!(data.usage, "calc add [options] <x> <y>");
        assert_eq!(data.arguments[0].name, "x <Number>");
        assert_eq!(data.arguments[0].help, "first");
        assert_eq!(data.options[0].name, "-o, --operator <Text>");
        assert_eq!(data.options[0].help, "[default: +]");
        assert!(data.options.iter().any(|o| o.name == "-h, --help"));
        assert!(data.footer.is_none());
    }

    #[test]
    fn test_hidden_options_are_skipped() {
        let tree = tree();
        let data = extract_help_data(&tree, default_registry(), CommandId::ROOT);
        assert!(data.options.iter().all(|o| !o.name.contains("secret")));
        assert_eq!(data.commands[0].name, "add, plus");
        assert_eq!(data.usage, "calc [command] [options]");
        assert!(data.footer.is_some());
    }

    #[test]
    fn test_render_aligns_columns() {
        let tree = tree();
        let add = tree.find_subcommand(CommandId::ROOT, "add").unwrap();
        let text = help_text(&tree, default_registry(), add, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Adds two numbers");
        assert!(text.contains("\nArguments:\n  x <Number>"));
        let x = lines.iter().find(|l| l.starts_with("  x <Number>")).unwrap();
        let o = lines.iter().find(|l| l.starts_with("  -o, --operator")).unwrap();
        assert_eq!(x.find("first"), o.find("[default: +]"));
    }
}
