//! A calculator built on argot.
//!
//! ```text
//! calc add 2 3 -o '*'          # 6
//! calc sum 1 2 3               # 6
//! seq 1 10 | calc sum          # 55
//! calc scale 80 --by 150%      # 120
//! calc remind --day friday     # Reminder set for Friday
//! calc [parse] add 2 3         # show how the input was parsed
//! ```
//!
//! Defaults can come from the environment (`CALC_OPERATOR`, or by
//! convention `add --operator`) and from a settings file named by
//! `CALC_CONFIG`.

use std::fmt;
use std::str::FromStr;

use argot::{CommandDef, OperandDef, OptionDef, TypeInfo, ValueType};
use argot_dispatch::{AppRunner, AppRunnerBuilder};
use tracing::debug;

/// A percentage written as `150%` or `150`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(pub f64);

impl FromStr for Percent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_suffix('%')
            .unwrap_or(s)
            .trim()
            .parse::<f64>()
            .map(Percent)
            .map_err(|_| format!("'{s}' is not a valid Percent"))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn binary_operation(name: &str, description: &str) -> CommandDef {
    CommandDef::new(name)
        .description(description)
        .operand(OperandDef::new("x", TypeInfo::int()).description("left operand"))
        .operand(OperandDef::new("y", TypeInfo::int()).description("right operand"))
}

/// The command tree of `calc`.
pub fn definition() -> CommandDef {
    CommandDef::new("calc")
        .description("A small calculator")
        .version(env!("CARGO_PKG_VERSION"))
        .option(
            OptionDef::flag("verbose")
                .short('v')
                .inherited(true)
                .description("Show the full expression"),
        )
        .subcommand(
            binary_operation("add", "Applies an operator to two numbers").option(
                OptionDef::new("operator", TypeInfo::text())
                    .short('o')
                    .description("one of + - * /")
                    .default_text("+")
                    .env_var("CALC_OPERATOR"),
            ),
        )
        .subcommand(binary_operation("subtract", "Subtracts y from x").alias("sub"))
        .subcommand(
            CommandDef::new("sum")
                .description("Adds up numbers, including piped lines")
                .operand(OperandDef::new("values", TypeInfo::list(ValueType::Int))),
        )
        .subcommand(
            CommandDef::new("colors")
                .description("Echoes color names, one per line")
                .operand(OperandDef::new("names", TypeInfo::list(ValueType::Text))),
        )
        .subcommand(
            CommandDef::new("scale")
                .description("Scales a number by a percentage")
                .operand(OperandDef::new("value", TypeInfo::float()))
                .option(
                    OptionDef::new("by", TypeInfo::new(ValueType::custom::<Percent>()))
                        .default_text("100%"),
                ),
        )
        .subcommand(
            CommandDef::new("remind")
                .description("Sets a weekly reminder")
                .option(
                    OptionDef::new(
                        "day",
                        TypeInfo::new(ValueType::enumeration("Weekday", WEEKDAYS)),
                    )
                    .short('d'),
                )
                .option(OptionDef::flag("loud").short('l'))
                .option(OptionDef::flag("again").short('a')),
        )
}

fn apply(op: &str, x: i64, y: i64) -> anyhow::Result<i64> {
    match op {
        "+" => Ok(x + y),
        "-" => Ok(x - y),
        "*" | "x" => Ok(x * y),
        "/" if y == 0 => anyhow::bail!("division by zero"),
        "/" => Ok(x / y),
        other => anyhow::bail!("unsupported operator '{other}'"),
    }
}

/// `calc` with its handlers, before default sources are attached.
pub fn builder() -> AppRunnerBuilder {
    AppRunner::builder(definition())
        .from_str_type::<Percent>()
        .command("add", |args, ctx| {
            let x: i64 = args.get("x").unwrap_or_default();
            let y: i64 = args.get("y").unwrap_or_default();
            let op: String = args.get("operator").unwrap_or_default();
            let result = apply(&op, x, y)?;
            if args.get::<bool>("verbose").unwrap_or_default() {
                ctx.console.outln(&format!("{x} {op} {y} = {result}"));
            } else {
                ctx.console.outln(&result.to_string());
            }
            Ok(())
        })
        .command("subtract", |args, ctx| {
            let x: i64 = args.get("x").unwrap_or_default();
            let y: i64 = args.get("y").unwrap_or_default();
            ctx.console.outln(&apply("-", x, y)?.to_string());
            Ok(())
        })
        .command("sum", |args, ctx| {
            let values: Vec<i64> = args.get("values").unwrap_or_default();
            debug!(count = values.len(), "summing");
            ctx.console.outln(&values.iter().sum::<i64>().to_string());
            Ok(())
        })
        .command("colors", |args, ctx| {
            for name in args.get::<Vec<String>>("names").unwrap_or_default() {
                ctx.console.outln(&name);
            }
            Ok(())
        })
        .command("scale", |args, ctx| {
            let value: f64 = args.get("value").unwrap_or_default();
            let by = args
                .value("by")
                .and_then(|v| v.downcast_ref::<Percent>())
                .copied()
                .unwrap_or(Percent(100.0));
            ctx.console.outln(&(value * by.0 / 100.0).to_string());
            Ok(())
        })
        .command("remind", |args, ctx| {
            let Some(day) = args.get::<String>("day") else {
                anyhow::bail!("--day is required");
            };
            let mut line = format!("Reminder set for {day}");
            if args.get::<bool>("again").unwrap_or_default() {
                line.push_str(", repeating");
            }
            if args.get::<bool>("loud").unwrap_or_default() {
                line = line.to_uppercase();
            }
            ctx.console.outln(&line);
            Ok(())
        })
}
