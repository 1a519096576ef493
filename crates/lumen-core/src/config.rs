use crate::error::{LumenError, LumenResult};
use clap::{parser::ValueSource, ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use typed_builder::TypedBuilder;

/// Settings file layout is flat: every section's keys sit at the top level,
/// matching the command-line flag names.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    #[serde(flatten)]
    pub api: ApiSettings,
    #[command(flatten)]
    #[serde(flatten)]
    pub map: MapSettings,
    #[command(flatten)]
    #[serde(flatten)]
    pub policy: SubmitPolicy,
    #[command(flatten)]
    #[serde(flatten)]
    pub lamps: LampDefaults,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the optimization service
    #[arg(long, env = "LUMEN_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Abort a request after this many seconds. No timeout when unset.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiSettings {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Access credential for the map tile provider
    #[arg(long, env = "LUMEN_MAP_TOKEN", hide_env_values = true)]
    pub map_token: Option<String>,

    #[arg(long, default_value = "mapbox://styles/mapbox/streets-v11")]
    pub map_style: String,
    #[arg(long, default_value_t = 31.2357)]
    pub center_lon: f64,
    #[arg(long, default_value_t = 30.0444)]
    pub center_lat: f64,
    #[arg(long, default_value_t = 14.0)]
    pub zoom: f64,

    /// Vertex count of each coverage circle
    #[arg(long, default_value_t = 64)]
    pub circle_steps: usize,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            map_token: None,
            map_style: "mapbox://styles/mapbox/streets-v11".to_string(),
            center_lon: 31.2357,
            center_lat: 30.0444,
            zoom: 14.0,
            circle_steps: 64,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShapeSelection {
    /// Use the first drawn shape and ignore the rest
    #[default]
    First,
    /// Reject the submission when more than one shape is drawn
    Single,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SubmitPolicy {
    #[arg(long, value_enum, default_value_t = ShapeSelection::First)]
    pub shape_selection: ShapeSelection,

    /// Refuse to submit an empty lamp catalog
    #[arg(long, default_value_t = false)]
    pub require_lamps: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct LampDefaults {
    #[arg(long, default_value_t = 100.0)]
    #[builder(default = 100.0)]
    pub default_cost: f64,

    /// Coverage radius in meters for newly added lamp types
    #[arg(long, default_value_t = 80.0)]
    #[builder(default = 80.0)]
    pub default_radius: f64,
}

impl Default for LampDefaults {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LumenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LumenError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LumenResult<()> {
        let url = self.api.base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(LumenError::Config(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api.api_url
            )));
        }
        if self.api.request_timeout_secs == Some(0) {
            return Err(LumenError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.map.circle_steps < 3 {
            return Err(LumenError::Config(format!(
                "circle_steps must be at least 3, got {}",
                self.map.circle_steps
            )));
        }
        if !(self.lamps.default_cost.is_finite() && self.lamps.default_cost > 0.0) {
            return Err(LumenError::Config("default_cost must be positive".into()));
        }
        if !(self.lamps.default_radius.is_finite() && self.lamps.default_radius > 0.0) {
            return Err(LumenError::Config("default_radius must be positive".into()));
        }
        Ok(())
    }

    /// Overlays values that were given explicitly on the command line or
    /// through the environment onto a config loaded from file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches!(
                    matches.value_source(stringify!($field)),
                    Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
                ) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(api.api_url);
        update_if_present!(api.request_timeout_secs);

        update_if_present!(map.map_token);
        update_if_present!(map.map_style);
        update_if_present!(map.center_lon);
        update_if_present!(map.center_lat);
        update_if_present!(map.zoom);
        update_if_present!(map.circle_steps);

        update_if_present!(policy.shape_selection);
        update_if_present!(policy.require_lamps);

        update_if_present!(lamps.default_cost);
        update_if_present!(lamps.default_radius);
    }
}
