use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A type Claude can be forced to produce through a single tool call.
///
/// Implemented for anything that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// JSON schema for the tool's `input_schema`: self-contained, with every
    /// `$ref` inlined and no `$schema`/`definitions` keys.
    fn tool_input_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };
        if let Some(defs) = definitions {
            inline_refs(&mut value, &defs);
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let resolved = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|path| path.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();
            if let Some(def) = resolved {
                *value = def;
                inline_refs(value, definitions);
                return;
            }

            // schemars wraps a described $ref in a single-element allOf.
            let single = match map.get("allOf") {
                Some(Value::Array(all_of)) if all_of.len() == 1 => all_of.first().cloned(),
                _ => None,
            };
            if let Some(only) = single {
                *value = only;
                inline_refs(value, definitions);
                return;
            }

            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}
