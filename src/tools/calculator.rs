//! Handler for the `calculator` tool.

use std::fmt;

use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;
use serde::Deserialize;

use super::error::ToolError;
use super::registry::{ToolContext, ToolFuture, ToolHandler, parse_args};
use super::schema::schema_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Apply the operation. Dividing by zero (either sign) is an error rather
    /// than an infinity or NaN.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, ToolError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide if b == 0.0 => Err(ToolError::Domain("Division by zero".to_string())),
            Self::Divide => Ok(a / b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculatorArgs {
    /// Operation to perform.
    pub operation: Operation,
    /// First operand.
    pub a: f64,
    /// Second operand.
    pub b: f64,
}

/// Render a number the way a JavaScript client would print it.
///
/// Negative zero prints as `0`, infinities as `Infinity`, and magnitudes
/// outside `[1e-6, 1e21)` switch to exponent form with a signed exponent
/// (`1e+308`, `1e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponent = format!("{:e}", value);
    match exponent.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => exponent,
    }
}

/// Handler for the `calculator` tool.
pub struct CalculatorHandler;

impl CalculatorHandler {
    fn calculate(args: CalculatorArgs) -> Result<CallToolResult, ToolError> {
        let result = args.operation.apply(args.a, args.b)?;
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{} {} {} = {}",
            format_number(args.a),
            args.operation,
            format_number(args.b),
            format_number(result)
        ))]))
    }
}

impl ToolHandler for CalculatorHandler {
    fn name(&self) -> &str {
        "calculator"
    }

    fn title(&self) -> Option<&str> {
        Some("Calculator")
    }

    fn description(&self) -> &str {
        "Perform a basic arithmetic operation on two numbers."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<CalculatorArgs>()
    }

    fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        let result = parse_args(args).and_then(Self::calculate);
        Box::pin(std::future::ready(result))
    }
}
