//! Input schemas derived from typed argument records.
//!
//! Every tool's argument struct derives `JsonSchema`. The generated schema is
//! advertised through `tools/list` and compiled into an [`ArgsValidator`]
//! that checks raw arguments before the handler decodes them.

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Draft, JSONSchema};
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde_json::{Value, json};

use super::error::{FieldError, FieldProblem, ValidationError};

/// JSON Schema (`type: object`) for an argument record.
///
/// Subschemas are inlined so the result is self-contained, and the root
/// `title` (the Rust type name) is dropped.
pub fn schema_for<T: JsonSchema>() -> JsonObject {
    let schema = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<T>();

    let mut object = match schema.to_value() {
        Value::Object(object) => object,
        _ => JsonObject::new(),
    };
    object.remove("title");
    object
        .entry("type")
        .or_insert_with(|| json!("object"));
    object
        .entry("properties")
        .or_insert_with(|| json!({}));
    object
}

/// A tool's input schema, compiled once at registration.
pub struct ArgsValidator {
    schema: JSONSchema,
}

impl ArgsValidator {
    pub fn compile(schema: &JsonObject) -> Result<Self, String> {
        let document = Value::Object(schema.clone());
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&document)
            .map_err(|e| e.to_string())?;
        Ok(Self { schema })
    }

    /// Check `args` against the schema.
    ///
    /// `null` members count as omitted and are removed, and integral floats
    /// such as `10.0` become integers. Returns the normalized object; every
    /// failing field is reported, not just the first.
    pub fn validate(&self, args: &JsonObject) -> Result<JsonObject, ValidationError> {
        let normalized: JsonObject = args
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), normalize_number(value)))
            .collect();

        let instance = Value::Object(normalized.clone());
        if let Err(errors) = self.schema.validate(&instance) {
            let errors: Vec<FieldError> = errors.map(field_error).collect();
            return Err(ValidationError { errors });
        }

        Ok(normalized)
    }
}

fn normalize_number(value: &Value) -> Value {
    match value.as_f64() {
        Some(f) if value.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => json!(f as i64),
        _ => value.clone(),
    }
}

fn field_error(err: jsonschema::ValidationError<'_>) -> FieldError {
    let message = err.to_string();
    let field = err
        .instance_path
        .to_string()
        .trim_start_matches('/')
        .to_string();
    let actual = err.instance.into_owned();

    let problem = match err.kind {
        ValidationErrorKind::Required { property } => {
            let field = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            return FieldError {
                field,
                problem: FieldProblem::Required,
            };
        }
        ValidationErrorKind::Type { kind } => FieldProblem::WrongType {
            expected: type_name(kind),
            actual,
        },
        ValidationErrorKind::Enum { options } => FieldProblem::NotInEnum {
            allowed: options
                .as_array()
                .map(|values| {
                    values
                        .iter()
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            actual,
        },
        ValidationErrorKind::MinLength { limit } => FieldProblem::TooShort {
            min_length: limit as usize,
            actual: char_count(&actual),
        },
        ValidationErrorKind::MaxLength { limit } => FieldProblem::TooLong {
            max_length: limit as usize,
            actual: char_count(&actual),
        },
        ValidationErrorKind::Minimum { limit } => FieldProblem::BelowMinimum {
            minimum: limit.as_f64().unwrap_or_default(),
            actual,
        },
        ValidationErrorKind::Maximum { limit } => FieldProblem::AboveMaximum {
            maximum: limit.as_f64().unwrap_or_default(),
            actual,
        },
        ValidationErrorKind::Format { format } => FieldProblem::InvalidFormat {
            format: format.to_string(),
            actual,
        },
        ValidationErrorKind::Pattern { pattern } => FieldProblem::PatternMismatch { pattern, actual },
        _ => FieldProblem::Invalid { message },
    };

    FieldError { field, problem }
}

fn type_name(kind: TypeKind) -> String {
    match kind {
        TypeKind::Single(ty) => ty.to_string(),
        TypeKind::Multiple(types) => types
            .into_iter()
            .map(|ty| ty.to_string())
            .filter(|ty| ty != "null")
            .collect::<Vec<_>>()
            .join(" or "),
    }
}

fn char_count(value: &Value) -> usize {
    value.as_str().map(|s| s.chars().count()).unwrap_or_default()
}
