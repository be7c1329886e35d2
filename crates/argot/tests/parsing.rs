//! Integration tests for the tokenize, transform, parse, and bind pipeline.
//!
//! Each test builds a small tree the way an application would and runs raw
//! argument arrays through every stage.

use argot::{
    default_registry, tokenize, AppSettings, Binder, BooleanMode, BoundArguments, CommandDef, CommandTree,
    Error, OperandDef, OptionDef, ParseError, Parser, TransformationPipeline, TypeInfo, Value,
    ValueType,
};

fn calc() -> CommandDef {
    CommandDef::new("calc")
        .subcommand(
            CommandDef::new("Add")
                .operand(OperandDef::new("x", TypeInfo::int()))
                .operand(OperandDef::new("y", TypeInfo::int()))
                .option(
                    OptionDef::new("operator", TypeInfo::text())
                        .short('o')
                        .default_text("+"),
                ),
        )
        .subcommand(
            CommandDef::new("schedule")
                .option(OptionDef::new(
                    "enumArg",
                    TypeInfo::new(ValueType::enumeration(
                        "DayOfWeek",
                        [
                            "Sunday",
                            "Monday",
                            "Tuesday",
                            "Wednesday",
                            "Thursday",
                            "Friday",
                            "Saturday",
                        ],
                    )),
                ))
                .option(OptionDef::flag("all").short('a'))
                .option(OptionDef::flag("brief").short('b'))
                .option(OptionDef::flag("color").short('c')),
        )
        .subcommand(
            CommandDef::new("paint")
                .operand(OperandDef::new("colors", TypeInfo::list(ValueType::Text))),
        )
}

fn run_with(settings: &AppSettings, args: &[&str]) -> Result<BoundArguments, Error> {
    let tree = CommandTree::build(calc(), settings)?;
    let tokens = TransformationPipeline::new().run(tokenize(args, settings.directives_enabled()))?;
    let parsed = Parser::new(&tree, settings).parse(&tokens)?;
    Ok(Binder::new(&tree, default_registry(), &[]).bind(&parsed)?)
}

fn run(args: &[&str]) -> Result<BoundArguments, Error> {
    run_with(&AppSettings::default(), args)
}

#[test]
fn add_binds_regardless_of_option_position() {
    for args in [
        &["Add", "-o", "*", "2", "3"][..],
        &["Add", "2", "3", "-o", "*"][..],
        &["add", "2", "-o=*", "3"][..],
        &["add", "--operator:*", "2", "3"][..],
    ] {
        let bound = run(args).unwrap();
        assert_eq!(bound.get::<i64>("x"), Some(2), "{args:?}");
        assert_eq!(bound.get::<i64>("y"), Some(3), "{args:?}");
        assert_eq!(bound.get::<String>("operator").as_deref(), Some("*"), "{args:?}");
    }
}

#[test]
fn declared_default_used_when_option_absent() {
    let bound = run(&["Add", "2", "3"]).unwrap();
    assert_eq!(bound.get::<String>("operator").as_deref(), Some("+"));
}

#[test]
fn trailing_value_is_unrecognized() {
    let err = run(&["Add", "2", "3", "-o", "*", "%"]).unwrap_err();
    match err {
        Error::Parse(ParseError::UnrecognizedArgument { raw, .. }) => assert_eq!(raw, "%"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lenient_mode_keeps_trailing_value() {
    let settings = AppSettings {
        ignore_unexpected_operands: true,
        ..AppSettings::default()
    };
    let tree = CommandTree::build(calc(), &settings).unwrap();
    let tokens = TransformationPipeline::new()
        .run(tokenize(["Add", "2", "3", "%"], true))
        .unwrap();
    let parsed = Parser::new(&tree, &settings).parse(&tokens).unwrap();
    assert_eq!(parsed.unparsed_raw(), vec!["%"]);
}

#[test]
fn flags_bind_true_when_present_and_false_otherwise() {
    let bound = run(&["schedule", "-ac"]).unwrap();
    assert_eq!(bound.get::<bool>("all"), Some(true));
    assert_eq!(bound.get::<bool>("brief"), Some(false));
    assert_eq!(bound.get::<bool>("color"), Some(true));
}

#[test]
fn assigned_value_on_flag_is_rejected() {
    for args in [&["schedule", "--all=false"][..], &["schedule", "-a=x"][..]] {
        match run(args).unwrap_err() {
            Error::Parse(ParseError::UnexpectedOptionValue { option, value, .. }) => {
                assert_eq!(option, "all");
                assert!(value == "false" || value == "x");
            }
            other => panic!("unexpected error for {args:?}: {other}"),
        }
    }
}

#[test]
fn explicit_boolean_mode_accepts_assigned_value() {
    let settings = AppSettings {
        boolean_mode: BooleanMode::Explicit,
        ..AppSettings::default()
    };
    let bound = run_with(&settings, &["schedule", "--all=false", "--color:true"]).unwrap();
    assert_eq!(bound.get::<bool>("all"), Some(false));
    assert_eq!(bound.get::<bool>("color"), Some(true));
}

#[test]
fn enum_option_matches_member_names() {
    let bound = run(&["schedule", "--enumArg", "friday"]).unwrap();
    assert_eq!(bound.value("enumArg"), Some(&Value::Enum("Friday".into())));

    let err = run(&["schedule", "--enumArg", "Funday"]).unwrap_err();
    let Error::Value(err) = err else {
        panic!("expected a value parsing error");
    };
    assert_eq!(err.argument, "enumArg");
    assert!(err
        .reason
        .ends_with("Allowed values: Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday"));
}

#[test]
fn list_operand_collects_values_in_order() {
    let bound = run(&["paint", "yellow", "orange", "red"]).unwrap();
    assert_eq!(
        bound.get::<Vec<String>>("colors"),
        Some(vec!["yellow".into(), "orange".into(), "red".into()])
    );
}

#[test]
fn unknown_short_flag_in_clubbed_run() {
    let err = run(&["schedule", "-axc"]).unwrap_err();
    match err {
        Error::Parse(ParseError::UnrecognizedOption { raw, .. }) => assert_eq!(raw, "-x"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn disabled_directives_are_plain_values() {
    let settings = AppSettings {
        disable_directives: true,
        ..AppSettings::default()
    };
    let bound = run_with(&settings, &["paint", "[red]"]).unwrap();
    assert_eq!(bound.get::<Vec<String>>("colors"), Some(vec!["[red]".into()]));
}
