//! Property-based tests for tokenizing, transforming, and parsing.

use argot::transform::expand_clubbed_flags;
use argot::{
    tokenize, AppSettings, CommandDef, CommandTree, OperandDef, Parser, TransformationPipeline,
    TypeInfo, ValueType,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn raw_arg() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}",
        "-[a-z]{1,4}",
        "--[a-z]{1,8}",
        "--[a-z]{1,5}[=:][a-z0-9]{0,4}",
        "-[0-9]{1,3}",
        Just("--".to_string()),
        "\\[[a-z]{1,6}\\]",
    ]
}

fn plain_value() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("not a subcommand", |s| s != "sub")
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Tokenizing the same input twice yields the same stream.
    #[test]
    fn tokenize_is_deterministic(args in prop::collection::vec(raw_arg(), 0..20)) {
        prop_assert_eq!(tokenize(&args, true), tokenize(&args, true));
    }

    /// Without transformations, every argument maps to one token.
    #[test]
    fn one_token_per_argument(args in prop::collection::vec(raw_arg(), 0..20)) {
        let tokens = tokenize(&args, true);
        prop_assert_eq!(tokens.len(), args.len());
    }

    /// Expanding clubbed flags twice equals expanding once.
    #[test]
    fn clubbed_expansion_is_idempotent(args in prop::collection::vec(raw_arg(), 0..20)) {
        let expand = expand_clubbed_flags();
        let once = expand.apply(&tokenize(&args, true)).unwrap();
        let twice = expand.apply(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Both assignment operators deliver the value to the option.
    #[test]
    fn assignment_operators_are_equivalent(name in "[a-z]{2,8}", value in "[a-z0-9]{1,6}") {
        let pipeline = TransformationPipeline::new();
        let eq = pipeline.run(tokenize([format!("--{name}={value}")], true)).unwrap();
        let colon = pipeline.run(tokenize([format!("--{name}:{value}")], true)).unwrap();
        let spaced = pipeline.run(tokenize([format!("--{name}"), value.clone()], true)).unwrap();
        let values = |t: &argot::Tokens| t.arguments().iter().map(|t| t.value.clone()).collect::<Vec<_>>();
        prop_assert_eq!(values(&eq), values(&spaced));
        prop_assert_eq!(values(&colon), values(&spaced));
    }

    /// Values after a single operand all accumulate in the list operand, in order.
    #[test]
    fn list_operand_accumulates(values in prop::collection::vec(plain_value(), 0..30)) {
        let settings = AppSettings::default();
        let tree = CommandTree::build(
            CommandDef::new("app")
                .operand(OperandDef::new("first", TypeInfo::text()))
                .operand(OperandDef::new("rest", TypeInfo::list(ValueType::Text)))
                .subcommand(CommandDef::new("sub")),
            &settings,
        ).unwrap();
        let mut args = vec!["head".to_string()];
        args.extend(values.iter().cloned());
        let tokens = TransformationPipeline::new().run(tokenize(&args, true)).unwrap();
        let parsed = Parser::new(&tree, &settings).parse(&tokens).unwrap();
        let rest = tree.root().operands[1];
        prop_assert_eq!(parsed.values.user_values(rest), values);
    }
}
