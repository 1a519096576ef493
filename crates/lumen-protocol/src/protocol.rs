use crate::geometry::Polygon;
use serde::{Deserialize, Serialize};

pub const OPTIMIZE_PATH: &str = "/api/optimize";
pub const HEALTH_PATH: &str = "/";

/// Marker tint used when the optimizer omits a color for a placement.
pub const DEFAULT_LAMP_COLOR: &str = "#3b82f6";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LampType {
    pub id: String,
    pub name: String,
    pub cost: f64,
    /// Coverage radius in meters.
    pub radius: f64,
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OptimizationOptions {
    pub max_budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lamps: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OptimizationRequest {
    pub polygon: Polygon,
    pub lamp_types: Vec<LampType>,
    pub options: OptimizationOptions,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlacedLamp {
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lamp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

fn default_color() -> String {
    DEFAULT_LAMP_COLOR.to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct OptimizationResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub lamps: Vec<PlacedLamp>,
    #[serde(default)]
    pub points_covered: u64,
    #[serde(default)]
    pub total_points: u64,
    #[serde(default)]
    pub coverage_pct: f64,
    #[serde(default)]
    pub total_cost: f64,
}

/// Body of a non-2xx optimizer response.
///
/// `detail` is usually a message string, but validation failures carry a
/// structured list, so it is kept as raw JSON.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
