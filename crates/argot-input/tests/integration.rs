//! Integration tests for argot-input.
//!
//! These bind real command trees with the default sources registered, using
//! the process environment (serialized) and temporary settings files.

use std::io::Write;

use argot::{
    default_registry, tokenize, AppSettings, Binder, CommandDef, CommandTree, DefaultSource,
    OperandDef, OptionDef, Parser, TransformationPipeline, TypeInfo, ValueOrigin, ValueType,
};
use argot_input::{AppSettingSource, EnvVarSource, MockEnv};
use serial_test::serial;

fn tree() -> CommandTree {
    CommandTree::build(
        CommandDef::new("calc").subcommand(
            CommandDef::new("add")
                .operand(OperandDef::new("x", TypeInfo::int()))
                .operand(OperandDef::new("y", TypeInfo::int()).default_text("10"))
                .option(
                    OptionDef::new("operator", TypeInfo::text())
                        .short('o')
                        .env_var("ARGOT_TEST_OPERATOR")
                        .app_setting("operator")
                        .default_text("+"),
                )
                .option(OptionDef::new("tags", TypeInfo::list(ValueType::Text)).env_var("ARGOT_TEST_TAGS")),
        ),
        &AppSettings::default(),
    )
    .unwrap()
}

fn bind(args: &[&str], sources: &[Box<dyn DefaultSource>]) -> argot::BoundArguments {
    let tree = tree();
    let settings = AppSettings::default();
    let tokens = TransformationPipeline::new().run(tokenize(args, true)).unwrap();
    let parsed = Parser::new(&tree, &settings).parse(&tokens).unwrap();
    Binder::new(&tree, default_registry(), sources).bind(&parsed).unwrap()
}

#[test]
#[serial]
fn real_environment_variable() {
    std::env::set_var("ARGOT_TEST_OPERATOR", "*");
    let sources: Vec<Box<dyn DefaultSource>> = vec![Box::new(EnvVarSource::new())];
    let bound = bind(&["add", "1"], &sources);
    std::env::remove_var("ARGOT_TEST_OPERATOR");

    assert_eq!(bound.get::<String>("operator").as_deref(), Some("*"));
    assert_eq!(
        bound.bound("operator").map(|b| b.origin.clone()),
        Some(ValueOrigin::Default {
            source: "EnvVar".into(),
            key: Some("ARGOT_TEST_OPERATOR".into())
        })
    );
}

#[test]
#[serial]
fn command_line_beats_environment() {
    std::env::set_var("ARGOT_TEST_OPERATOR", "*");
    let sources: Vec<Box<dyn DefaultSource>> = vec![Box::new(EnvVarSource::new())];
    let bound = bind(&["add", "1", "-o", "-"], &sources);
    std::env::remove_var("ARGOT_TEST_OPERATOR");

    assert_eq!(bound.get::<String>("operator").as_deref(), Some("-"));
}

#[test]
fn list_from_env_splits_on_commas() {
    let env = MockEnv::new().with_var("ARGOT_TEST_TAGS", "a,b , c");
    let sources: Vec<Box<dyn DefaultSource>> = vec![Box::new(EnvVarSource::with_reader(env))];
    let bound = bind(&["add", "1"], &sources);
    assert_eq!(
        bound.get::<Vec<String>>("tags"),
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
}

#[test]
fn settings_file_and_source_order() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "operator: '/'\n\"add y\": 4").unwrap();
    let settings = AppSettingSource::from_file(file.path()).unwrap().with_conventions(true);

    // app settings alone
    let sources: Vec<Box<dyn DefaultSource>> = vec![Box::new(settings.clone())];
    let bound = bind(&["add", "1"], &sources);
    assert_eq!(bound.get::<String>("operator").as_deref(), Some("/"));
    assert_eq!(bound.get::<i64>("y"), Some(4));

    // environment registered first wins
    let env = MockEnv::new().with_var("ARGOT_TEST_OPERATOR", "%");
    let sources: Vec<Box<dyn DefaultSource>> =
        vec![Box::new(EnvVarSource::with_reader(env)), Box::new(settings)];
    let bound = bind(&["add", "1"], &sources);
    assert_eq!(bound.get::<String>("operator").as_deref(), Some("%"));
}

#[test]
fn json_settings_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"operator": "x"}}"#).unwrap();
    let settings = AppSettingSource::from_file(file.path()).unwrap();
    let sources: Vec<Box<dyn DefaultSource>> = vec![Box::new(settings)];
    let bound = bind(&["add", "1"], &sources);
    assert_eq!(bound.get::<String>("operator").as_deref(), Some("x"));
}

#[test]
fn missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppSettingSource::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read settings file"));
}

#[test]
fn declared_default_when_no_source_matches() {
    let sources: Vec<Box<dyn DefaultSource>> =
        vec![Box::new(EnvVarSource::with_reader(MockEnv::new()))];
    let bound = bind(&["add", "1"], &sources);
    assert_eq!(bound.get::<String>("operator").as_deref(), Some("+"));
    assert_eq!(bound.get::<i64>("y"), Some(10));
}
