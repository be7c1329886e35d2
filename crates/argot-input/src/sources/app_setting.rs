//! App setting default source.
//!
//! App settings are a flat document of keys to scalars or lists, loaded from
//! YAML or JSON:
//!
//! ```yaml
//! CALC_OPERATOR: "*"
//! "add --operator": "+"
//! colors: [red, green]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use argot::{Argument, CommandTree, DefaultPayload, DefaultSource, DefaultValue};
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::error::InputError;
use crate::sources::convention_keys;

/// Source label reported in [`DefaultValue::source`].
pub const APP_SETTING: &str = "AppSetting";

/// Reads defaults from a flat key/value settings document.
#[derive(Debug, Clone, Default)]
pub struct AppSettingSource {
    values: HashMap<String, DefaultPayload>,
    conventions: bool,
}

impl AppSettingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a text setting.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), DefaultPayload::Text(value.into()));
        self
    }

    /// Also try `"{command} {alias}"` and bare alias keys.
    pub fn with_conventions(mut self, enabled: bool) -> Self {
        self.conventions = enabled;
        self
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, InputError> {
        if source.trim().is_empty() {
            return Ok(Self::new());
        }
        let doc: JsonValue =
            serde_yaml::from_str(source).map_err(|e| InputError::SettingsInvalid(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_json_str(source: &str) -> Result<Self, InputError> {
        let doc: JsonValue =
            serde_json::from_str(source).map_err(|e| InputError::SettingsInvalid(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| InputError::SettingsUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let settings = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        debug!(path = %path.display(), keys = settings.values.len(), "loaded app settings");
        Ok(settings)
    }

    fn from_document(doc: JsonValue) -> Result<Self, InputError> {
        let JsonValue::Object(map) = doc else {
            return Err(InputError::SettingsInvalid(
                "expected a mapping of keys to values".to_string(),
            ));
        };
        let mut values = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let payload = match value {
                JsonValue::Array(items) => DefaultPayload::List(
                    items
                        .into_iter()
                        .map(|item| scalar_text(&key, item))
                        .collect::<Result<_, _>>()?,
                ),
                other => DefaultPayload::Text(scalar_text(&key, other)?),
            };
            values.insert(key, payload);
        }
        Ok(Self {
            values,
            conventions: false,
        })
    }

    pub fn get(&self, key: &str) -> Option<&DefaultPayload> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn scalar_text(key: &str, value: JsonValue) -> Result<String, InputError> {
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Null => Ok(String::new()),
        _ => Err(InputError::SettingsInvalid(format!(
            "'{key}' must be a scalar or a list of scalars"
        ))),
    }
}

impl DefaultSource for AppSettingSource {
    fn default_for(&self, tree: &CommandTree, argument: &Argument) -> Option<DefaultValue> {
        let mut keys: Vec<String> = argument.app_setting.iter().cloned().collect();
        if self.conventions {
            keys.extend(convention_keys(tree, argument));
        }
        keys.into_iter().find_map(|key| {
            let payload = self.values.get(&key)?.clone();
            trace!(argument = %argument.name, key = %key, "default from app settings");
            Some(DefaultValue::new(APP_SETTING, Some(key), payload))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot::{AppSettings, CommandDef, OperandDef, TypeInfo, ValueType};

    #[test]
    fn yaml_scalars_and_lists() {
        let settings =
            AppSettingSource::from_yaml_str("count: 3\nverbose: true\ncolors: [red, green]\n")
                .unwrap();
        assert_eq!(settings.get("count"), Some(&DefaultPayload::Text("3".into())));
        assert_eq!(settings.get("verbose"), Some(&DefaultPayload::Text("true".into())));
        assert_eq!(
            settings.get("colors"),
            Some(&DefaultPayload::List(vec!["red".into(), "green".into()]))
        );
    }

    #[test]
    fn json_rejects_nested_maps() {
        let err = AppSettingSource::from_json_str(r#"{"a": {"b": 1}}"#).unwrap_err();
        assert!(matches!(err, InputError::SettingsInvalid(_)));
    }

    #[test]
    fn declared_key_lookup() {
        let tree = CommandTree::build(
            CommandDef::new("paint").operand(
                OperandDef::new("colors", TypeInfo::list(ValueType::Text)).app_setting("colors"),
            ),
            &AppSettings::default(),
        )
        .unwrap();
        let colors = tree.argument(tree.root().operands[0]);
        let source = AppSettingSource::from_yaml_str("colors: [red]").unwrap();
        let default = source.default_for(&tree, colors).unwrap();
        assert_eq!(default.source, APP_SETTING);
        assert_eq!(default.payload, DefaultPayload::List(vec!["red".into()]));
    }
}
