//! JSON Schema handling for structured output
//!
//! - [`inline_refs`]: resolve `$ref`s so providers get a self-contained schema
//! - [`to_openai_schema`] / [`to_gemini_schema`]: per-provider dialects
//! - [`validate_structured`]: check a payload against the requested schema

use crate::error::CompletionError;
use jsonschema::JSONSchema;
use serde_json::{json, Map, Value};

/// Guard against self-referential definitions
const MAX_REF_DEPTH: usize = 16;

/// Keys the Gemini schema dialect rejects
const GEMINI_DROPPED_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "title",
    "additionalProperties",
    "definitions",
    "$defs",
    "default",
    "examples",
];

/// Resolve `$ref`s against `definitions` / `$defs` and drop the definition tables
///
/// Single-element `allOf` wrappers (emitted around documented references) are
/// collapsed into their parent.
#[must_use]
pub fn inline_refs(schema: &Value) -> Value {
    let mut defs = Map::new();
    for key in ["definitions", "$defs"] {
        if let Some(Value::Object(table)) = schema.get(key) {
            defs.extend(table.clone());
        }
    }
    inline_node(schema, &defs, 0)
}

fn inline_node(node: &Value, defs: &Map<String, Value>, depth: usize) -> Value {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                let name = target.rsplit('/').next().unwrap_or(target);
                return match defs.get(name) {
                    Some(def) if depth < MAX_REF_DEPTH => inline_node(def, defs, depth + 1),
                    _ => json!({ "type": "object" }),
                };
            }

            let mut out = Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "definitions" | "$defs" => {}
                    "allOf" => match value.as_array().map(Vec::as_slice) {
                        Some([single]) => {
                            if let Value::Object(inner) = inline_node(single, defs, depth) {
                                for (k, v) in inner {
                                    out.entry(k).or_insert(v);
                                }
                            }
                        }
                        _ => {
                            out.insert(key.clone(), inline_node(value, defs, depth));
                        }
                    },
                    _ => {
                        out.insert(key.clone(), inline_node(value, defs, depth));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| inline_node(item, defs, depth))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Schema as sent in an OpenAI `response_format`
#[must_use]
pub fn to_openai_schema(schema: &Value) -> Value {
    let mut inlined = inline_refs(schema);
    if let Value::Object(map) = &mut inlined {
        map.remove("$schema");
        map.remove("title");
    }
    inlined
}

/// Schema in Gemini's OpenAPI-subset dialect
///
/// Upper-cases `type`, turns `["T", "null"]` into `type: T, nullable: true`
/// and strips keywords Gemini rejects.
#[must_use]
pub fn to_gemini_schema(schema: &Value) -> Value {
    gemini_node(&inline_refs(schema))
}

fn gemini_node(node: &Value) -> Value {
    match node {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                match key.as_str() {
                    k if GEMINI_DROPPED_KEYS.contains(&k) => {}
                    "type" => apply_gemini_type(value, &mut out),
                    "format" => {
                        if matches!(value.as_str(), Some("enum" | "date-time")) {
                            out.insert(key.clone(), value.clone());
                        }
                    }
                    "enum" | "required" => {
                        out.insert(key.clone(), value.clone());
                    }
                    "properties" => {
                        let props = value
                            .as_object()
                            .map(|props| {
                                props
                                    .iter()
                                    .map(|(name, prop)| (name.clone(), gemini_node(prop)))
                                    .collect::<Map<_, _>>()
                            })
                            .unwrap_or_default();
                        out.insert(key.clone(), Value::Object(props));
                    }
                    _ => {
                        out.insert(key.clone(), gemini_node(value));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(gemini_node).collect()),
        other => other.clone(),
    }
}

fn apply_gemini_type(value: &Value, out: &mut Map<String, Value>) {
    match value {
        Value::String(ty) => {
            out.insert("type".to_string(), Value::String(ty.to_uppercase()));
        }
        Value::Array(types) => {
            let mut concrete = types.iter().filter_map(Value::as_str).filter(|t| *t != "null");
            if let Some(ty) = concrete.next() {
                out.insert("type".to_string(), Value::String(ty.to_uppercase()));
            }
            if types.iter().any(|t| t.as_str() == Some("null")) {
                out.insert("nullable".to_string(), Value::Bool(true));
            }
        }
        _ => {}
    }
}

/// Validate `instance` against `schema`
///
/// # Errors
/// - [`CompletionError::InvalidSchema`] if the schema does not compile
/// - [`CompletionError::SchemaViolation`] listing every violation
pub fn validate_structured(schema: &Value, instance: &Value) -> Result<(), CompletionError> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| CompletionError::InvalidSchema(e.to_string()))?;

    let violations: Vec<String> = match compiled.validate(instance) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect(),
    };
    Err(CompletionError::SchemaViolation(violations))
}

/// Strip a surrounding markdown code fence (```json ... ```)
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
