//! Error types for tool dispatch and execution.
//!
//! Dispatch-level failures ([`DispatchError`]) stop an invocation before any
//! handler code runs and are reported as protocol errors. Handler failures
//! ([`ToolError`]) are turned into a `CallToolResult` with `is_error` set.

use std::fmt;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::Value;

use crate::github::UpstreamError;

/// What is wrong with a single argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "problem", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldProblem {
    Required,
    WrongType { expected: String, actual: Value },
    NotInEnum { allowed: Vec<String>, actual: Value },
    TooShort { min_length: usize, actual: usize },
    TooLong { max_length: usize, actual: usize },
    BelowMinimum { minimum: f64, actual: Value },
    AboveMaximum { maximum: f64, actual: Value },
    InvalidFormat { format: String, actual: Value },
    PatternMismatch { pattern: String, actual: Value },
    /// Any other schema keyword; carries the validator's message.
    Invalid { message: String },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::WrongType { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            Self::NotInEnum { allowed, actual } => {
                write!(f, "expected one of [{}], got {}", allowed.join(", "), actual)
            }
            Self::TooShort { min_length, actual } => write!(
                f,
                "must be at least {} characters, got {}",
                min_length, actual
            ),
            Self::TooLong { max_length, actual } => write!(
                f,
                "must be at most {} characters, got {}",
                max_length, actual
            ),
            Self::BelowMinimum { minimum, actual } => {
                write!(f, "must be >= {}, got {}", minimum, actual)
            }
            Self::AboveMaximum { maximum, actual } => {
                write!(f, "must be <= {}, got {}", maximum, actual)
            }
            Self::InvalidFormat { format, actual } => {
                write!(f, "invalid {}: {}", format, actual)
            }
            Self::PatternMismatch { pattern, actual } => {
                write!(f, "must match `{}`, got {}", pattern, actual)
            }
            Self::Invalid { message } => write!(f, "{}", message),
        }
    }
}

/// A failed constraint on one named argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// Raw arguments did not match a tool's input shape.
///
/// Carries every failing field, not just the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Whether `field` is among the failures.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Structured form for protocol error payloads.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid arguments: ")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while routing an invocation to its handler.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// No tool is registered under this name.
    NotFound(String),
    /// Arguments failed the tool's input shape.
    Validation(ValidationError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "Tool not found: {}", name),
            Self::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<ValidationError> for DispatchError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Errors a handler can return once its arguments have been validated.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    /// The GitHub API call failed.
    Upstream(UpstreamError),
    /// A handler-local fatal condition, e.g. division by zero.
    Domain(String),
    /// Validated arguments could not be decoded into the handler's record.
    Internal(String),
}

impl ToolError {
    /// Render as a tool-level error result.
    pub fn into_call_tool_result(self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(self.to_string())])
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream(err) => write!(f, "{}", err),
            Self::Domain(msg) => write!(f, "{}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<UpstreamError> for ToolError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream(err)
    }
}
