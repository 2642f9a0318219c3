//! Handler for the `weather_lookup` tool.
//!
//! A mock: readings are random and unrelated to real weather.

use rand::Rng;
use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{ToolContext, ToolFuture, ToolHandler, parse_args};
use super::schema::schema_for;

pub const CONDITIONS: [&str; 4] = ["Sunny", "Cloudy", "Rainy", "Windy"];

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    /// City name.
    pub city: String,
    /// Two-letter country code, e.g. `US`.
    #[schemars(length(equal = 2))]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// Degrees Celsius in `[10, 40)`.
    pub temperature: i32,
    pub condition: &'static str,
    /// Percent in `[30, 80)`.
    pub humidity: u32,
}

impl WeatherReading {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            temperature: rng.gen_range(10..40),
            condition: CONDITIONS[rng.gen_range(0..CONDITIONS.len())],
            humidity: rng.gen_range(30..80),
        }
    }
}

fn format_report(args: &WeatherArgs, reading: &WeatherReading) -> String {
    format!(
        "Weather in {}, {}:\nTemperature: {}°C\nCondition: {}\nHumidity: {}%",
        args.city, args.country, reading.temperature, reading.condition, reading.humidity
    )
}

/// Handler for the `weather_lookup` tool.
pub struct WeatherLookupHandler;

impl ToolHandler for WeatherLookupHandler {
    fn name(&self) -> &str {
        "weather_lookup"
    }

    fn title(&self) -> Option<&str> {
        Some("Weather Lookup (mock)")
    }

    fn description(&self) -> &str {
        "Return mock weather for a city. Readings are random, not real data."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<WeatherArgs>()
    }

    fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        let result = parse_args::<WeatherArgs>(args).map(|args| {
            let reading = WeatherReading::random(&mut rand::thread_rng());
            CallToolResult::success(vec![Content::text(format_report(&args, &reading))])
        });
        Box::pin(std::future::ready(result))
    }
}
