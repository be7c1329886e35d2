use std::fs;

use argot_dispatch::TestConsole;
use argot_input::{AppSettingSource, EnvVarSource, MockEnv};

fn run(args: &[&str]) -> argot_dispatch::RunOutput {
    calc_example::builder()
        .build()
        .unwrap()
        .run_in_memory(args.iter().copied())
}

#[test]
fn test_operator_before_or_after_operands() {
    assert_eq!(run(&["add", "-o", "*", "2", "3"]).out, "6\n");
    assert_eq!(run(&["add", "2", "3", "-o", "*"]).out, "6\n");
    assert_eq!(run(&["add", "2", "3", "--operator=*"]).out, "6\n");
}

#[test]
fn test_default_operator() {
    let output = run(&["add", "2", "3"]);
    assert!(output.is_success());
    assert_eq!(output.out, "5\n");
}

#[test]
fn test_inherited_verbose_flag() {
    assert_eq!(run(&["-v", "add", "2", "3"]).out, "2 + 3 = 5\n");
    assert_eq!(run(&["add", "2", "3", "-v"]).out, "2 + 3 = 5\n");
}

#[test]
fn test_extra_argument_is_unrecognized() {
    let output = run(&["add", "2", "3", "-o", "*", "%"]);
    assert_eq!(output.exit_code, 1);
    assert!(output
        .err
        .contains("Unrecognized command or argument '%'"));
    assert!(output.out.contains("Usage:"));
}

#[test]
fn test_alias_and_negative_numbers() {
    assert_eq!(run(&["sub", "-2", "3"]).out, "-5\n");
}

#[test]
fn test_division_by_zero_is_handler_error() {
    let output = run(&["add", "1", "0", "-o", "/"]);
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.err, "division by zero\n");
}

#[test]
fn test_enum_is_case_insensitive() {
    let output = run(&["remind", "--day", "friday"]);
    assert!(output.is_success());
    assert_eq!(output.out, "Reminder set for Friday\n");
}

#[test]
fn test_clubbed_flags() {
    assert_eq!(
        run(&["remind", "-la", "-d", "monday"]).out,
        "REMINDER SET FOR MONDAY, REPEATING\n"
    );
}

#[test]
fn test_invalid_enum_value() {
    let output = run(&["remind", "--day", "Funday"]);
    assert_eq!(output.exit_code, 2);
    assert_eq!(
        output.err,
        "Failure parsing value for day.  values=Funday\n\
         'Funday' is not a valid Weekday. Allowed values: Monday, Tuesday, Wednesday, \
         Thursday, Friday, Saturday, Sunday\n"
    );
}

#[test]
fn test_piped_colors() {
    let app = calc_example::builder().build().unwrap();
    let console = TestConsole::new().with_piped_lines(["yellow", "orange"]);
    let output = app.run_in_memory_with(["colors", "red"], console);
    assert_eq!(output.out, "red\nyellow\norange\n");
}

#[test]
fn test_piped_sum() {
    let app = calc_example::builder().build().unwrap();
    let console = TestConsole::new().with_piped_lines(["1", "2", "3", "4"]);
    assert_eq!(app.run_in_memory_with(["sum"], console).out, "10\n");
}

#[test]
fn test_custom_percent_type() {
    assert_eq!(run(&["scale", "80", "--by", "150%"]).out, "120\n");
    assert_eq!(run(&["scale", "80"]).out, "80\n");

    let output = run(&["scale", "80", "--by", "lots"]);
    assert_eq!(output.exit_code, 2);
    assert!(output.err.contains("'lots' is not a valid Percent"));
}

#[test]
fn test_operator_from_environment() {
    let env = MockEnv::new().with_var("CALC_OPERATOR", "-");
    let app = calc_example::builder()
        .default_source(EnvVarSource::with_reader(env))
        .build()
        .unwrap();
    assert_eq!(app.run_in_memory(["add", "7", "2"]).out, "5\n");
    assert_eq!(app.run_in_memory(["add", "7", "2", "-o", "*"]).out, "14\n");
}

#[test]
fn test_operator_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calc.yaml");
    fs::write(&path, "add --operator: \"*\"\n").unwrap();

    let settings = AppSettingSource::from_file(&path)
        .unwrap()
        .with_conventions(true);
    let app = calc_example::builder()
        .app_settings(settings)
        .build()
        .unwrap();
    assert_eq!(app.run_in_memory(["add", "4", "5"]).out, "20\n");
}

#[test]
fn test_version() {
    let output = run(&["--version"]);
    assert_eq!(
        output.out,
        format!("calc {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_parse_directive() {
    let output = run(&["[parse]", "add", "2", "3"]);
    assert!(output.is_success());
    assert!(output.out.starts_with("command: calc add\n"));
    assert!(output.out.contains("  x <Number>\n    value: 2\n"));
}
