use crate::catalog::LampField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LumenError {
    #[error("No polygon drawn. Draw a service area first")]
    NoPolygon,

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("{0} shapes are drawn; draw a single service area")]
    MultiplePolygons(usize),

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid lamp limit: {0}")]
    InvalidLampLimit(String),

    #[error("Lamp catalog is empty. Add at least one lamp type")]
    EmptyCatalog,

    #[error("Unknown lamp type: {0}")]
    UnknownLamp(String),

    #[error("Unknown lamp field '{0}'")]
    UnknownLampField(String),

    #[error("Invalid lamp {field}: {reason}")]
    InvalidLampField { field: LampField, reason: String },

    #[error("An optimization is already running")]
    Busy,

    #[error("The {0} is not ready")]
    NotReady(&'static str),

    #[error("Optimization failed: {0}")]
    Transport(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl LumenError {
    /// Failures detected locally before any request leaves the process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LumenError::NoPolygon
                | LumenError::InvalidPolygon(_)
                | LumenError::MultiplePolygons(_)
                | LumenError::InvalidBudget(_)
                | LumenError::InvalidLampLimit(_)
                | LumenError::EmptyCatalog
        )
    }
}

pub type LumenResult<T> = Result<T, LumenError>;
