//! Resolves every argument of a parse to a typed value.
//!
//! Per argument, the first of these wins:
//!
//! 1. raw values the user supplied (command line, piped stdin, prompts),
//! 2. a value found by one of the [`DefaultSource`]s, in registration order,
//! 3. the default declared on the argument,
//! 4. the type default (`false`, `0`, an empty list, or none).
//!
//! Raw strings from any of these are converted through the
//! [`DescriptorRegistry`]; typed defaults are coerced.

use serde::Serialize;
use tracing::{debug, trace};

use crate::descriptors::DescriptorRegistry;
use crate::error::ValueParsingError;
use crate::model::{
    Argument, ArgumentId, CommandId, CommandTree, DefaultPayload, DefaultValue, FromValue, Value,
};
use crate::parser::{ParseResult, ValueSource};

/// Looks up default values outside the command definition.
pub trait DefaultSource: Send + Sync {
    /// Returns a default for `argument`, or `None` to defer to the next source.
    fn default_for(&self, tree: &CommandTree, argument: &Argument) -> Option<DefaultValue>;
}

/// Where a bound value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValueOrigin {
    /// User input, listing each contributing source in order.
    Input(Vec<ValueSource>),
    /// A looked-up or declared default.
    Default { source: String, key: Option<String> },
    TypeDefault,
}

/// A typed value and its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValue {
    pub argument: ArgumentId,
    pub value: Value,
    pub origin: ValueOrigin,
}

/// Every bound value of an invocation, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    target: CommandId,
    values: Vec<(String, BoundValue)>,
}

impl BoundArguments {
    pub fn target(&self) -> CommandId {
        self.target
    }

    /// Looks up a value by argument name.
    ///
    /// Arguments of the target command shadow same-named ones on its parents.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.bound(name).map(|b| &b.value)
    }

    pub fn bound(&self, name: &str) -> Option<&BoundValue> {
        self.values.iter().rev().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    /// Reads a value as a Rust type; `None` when absent or of another type.
    pub fn get<T: FromValue>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(T::from_value)
    }

    pub fn by_id(&self, id: ArgumentId) -> Option<&BoundValue> {
        self.values.iter().map(|(_, b)| b).find(|b| b.argument == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.values.iter().map(|(n, b)| (n.as_str(), b))
    }
}

/// Binds parse results to typed values.
pub struct Binder<'a> {
    tree: &'a CommandTree,
    registry: &'a DescriptorRegistry,
    sources: &'a [Box<dyn DefaultSource>],
}

impl<'a> Binder<'a> {
    pub fn new(
        tree: &'a CommandTree,
        registry: &'a DescriptorRegistry,
        sources: &'a [Box<dyn DefaultSource>],
    ) -> Self {
        Self {
            tree,
            registry,
            sources,
        }
    }

    /// Binds every argument in scope of the parse target, stopping at the
    /// first conversion failure.
    pub fn bind(&self, result: &ParseResult) -> Result<BoundArguments, ValueParsingError> {
        let mut values = Vec::new();
        for id in self.tree.arguments_in_scope(result.target) {
            let argument = self.tree.argument(id);
            let bound = self.bind_argument(argument, result)?;
            values.push((argument.name.clone(), bound));
        }
        debug!(count = values.len(), "bound arguments");
        Ok(BoundArguments {
            target: result.target,
            values,
        })
    }

    fn bind_argument(
        &self,
        argument: &Argument,
        result: &ParseResult,
    ) -> Result<BoundValue, ValueParsingError> {
        let id = argument.id;
        if result.values.has_user_input(id) {
            let raw = result.values.user_values(id);
            let value = self.convert(argument, &raw)?;
            let sources = result.values.inputs(id).iter().map(|i| i.source).collect();
            return Ok(BoundValue {
                argument: id,
                value,
                origin: ValueOrigin::Input(sources),
            });
        }

        let found = self
            .sources
            .iter()
            .find_map(|s| s.default_for(self.tree, argument))
            .or_else(|| argument.default.clone());
        if let Some(default) = found {
            // values may be secrets, log only where they came from
            trace!(argument = %argument.name, source = %default.source, "using default");
            let value = self.resolve_default(argument, &default)?;
            return Ok(BoundValue {
                argument: id,
                value,
                origin: ValueOrigin::Default {
                    source: default.source,
                    key: default.key,
                },
            });
        }

        Ok(BoundValue {
            argument: id,
            value: argument.type_info.type_default(),
            origin: ValueOrigin::TypeDefault,
        })
    }

    fn resolve_default(
        &self,
        argument: &Argument,
        default: &DefaultValue,
    ) -> Result<Value, ValueParsingError> {
        match &default.payload {
            DefaultPayload::Text(text) if argument.type_info.is_list => {
                let items: Vec<String> = text
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                self.convert(argument, &items)
            }
            DefaultPayload::Text(text) => self.convert(argument, std::slice::from_ref(text)),
            DefaultPayload::List(items) => self.convert(argument, items),
            DefaultPayload::Typed(value) => value
                .clone()
                .coerce_to(&argument.type_info)
                .map_err(|reason| {
                    ValueParsingError::new(argument.name.clone(), vec![value.to_string()], reason)
                }),
        }
    }

    fn convert(&self, argument: &Argument, raw: &[String]) -> Result<Value, ValueParsingError> {
        self.registry
            .parse(&argument.type_info, raw)
            .map_err(|reason| ValueParsingError::new(argument.name.clone(), raw.to_vec(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::default_registry;
    use crate::model::{CommandDef, OperandDef, OptionDef, TypeInfo, ValueType};
    use crate::parser::Parser;
    use crate::settings::AppSettings;
    use crate::tokenizer::tokenize;
    use crate::transform::TransformationPipeline;

    struct MapSource(Vec<(&'static str, &'static str)>);

    impl DefaultSource for MapSource {
        fn default_for(&self, _: &CommandTree, argument: &Argument) -> Option<DefaultValue> {
            self.0
                .iter()
                .find(|(k, _)| *k == argument.name)
                .map(|(k, v)| {
                    DefaultValue::new("Map", Some(k.to_string()), DefaultPayload::Text(v.to_string()))
                })
        }
    }

    fn tree() -> CommandTree {
        let def = CommandDef::new("app")
            .operand(OperandDef::new("count", TypeInfo::int()).default_text("7"))
            .operand(OperandDef::new("names", TypeInfo::list(ValueType::Text)).default_text("a, b"))
            .option(OptionDef::flag("dry-run"))
            .option(OptionDef::new("ratio", TypeInfo::float()).default_value(Value::Int(2)))
            .option(OptionDef::new("label", TypeInfo::text()));
        CommandTree::build(def, &AppSettings::default()).unwrap()
    }

    fn bind(args: &[&str], sources: &[Box<dyn DefaultSource>]) -> Result<BoundArguments, ValueParsingError> {
        let tree = tree();
        let settings = AppSettings::default();
        let tokens = TransformationPipeline::new().run(tokenize(args, true)).unwrap();
        let result = Parser::new(&tree, &settings).parse(&tokens).unwrap();
        Binder::new(&tree, default_registry(), sources).bind(&result)
    }

    #[test]
    fn user_input_wins() {
        let bound = bind(&["3", "x", "y", "--dry-run", "--ratio", "0.5"], &[]).unwrap();
        assert_eq!(bound.get::<i64>("count"), Some(3));
        assert_eq!(bound.get::<Vec<String>>("names"), Some(vec!["x".into(), "y".into()]));
        assert_eq!(bound.get::<bool>("dry-run"), Some(true));
        assert_eq!(bound.get::<f64>("ratio"), Some(0.5));
        assert_eq!(
            bound.bound("count").map(|b| b.origin.clone()),
            Some(ValueOrigin::Input(vec![ValueSource::Argument]))
        );
    }

    #[test]
    fn declared_defaults_and_type_defaults() {
        let bound = bind(&[], &[]).unwrap();
        assert_eq!(bound.get::<i64>("count"), Some(7));
        assert_eq!(bound.get::<Vec<String>>("names"), Some(vec!["a".into(), "b".into()]));
        assert_eq!(bound.get::<bool>("dry-run"), Some(false));
        assert_eq!(bound.get::<f64>("ratio"), Some(2.0));
        assert_eq!(bound.value("label"), Some(&Value::None));
        assert_eq!(bound.bound("label").map(|b| &b.origin), Some(&ValueOrigin::TypeDefault));
    }

    #[test]
    fn sources_consulted_before_declared_default() {
        let sources: Vec<Box<dyn DefaultSource>> =
            vec![Box::new(MapSource(vec![("count", "11"), ("label", "env")]))];
        let bound = bind(&[], &sources).unwrap();
        assert_eq!(bound.get::<i64>("count"), Some(11));
        assert_eq!(bound.get::<String>("label"), Some("env".into()));
        assert_eq!(
            bound.bound("count").map(|b| b.origin.clone()),
            Some(ValueOrigin::Default {
                source: "Map".into(),
                key: Some("count".into())
            })
        );
    }

    #[test]
    fn bad_default_is_a_parsing_error() {
        let sources: Vec<Box<dyn DefaultSource>> = vec![Box::new(MapSource(vec![("count", "many")]))];
        let err = bind(&[], &sources).unwrap_err();
        assert_eq!(err.argument, "count");
        assert_eq!(err.values, vec!["many".to_string()]);
    }

    #[test]
    fn conversion_failure_names_argument_and_values() {
        let err = bind(&["three"], &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failure parsing value for count.  values=three\n'three' is not a valid Number"
        );
    }
}
