use crate::error::{LumenError, LumenResult};
use crate::protocol::OptimizationOptions;

pub const DEFAULT_MAX_BUDGET: f64 = 1000.0;

/// Scalar limits sent with every optimization.
///
/// Values are stored as entered; a missing or unparsable budget is kept as
/// `None` and only rejected when a submission validates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    pub max_budget: Option<f64>,
    pub max_lamps: Option<u32>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_budget: Some(DEFAULT_MAX_BUDGET),
            max_lamps: None,
        }
    }
}

impl Constraints {
    pub fn validated_budget(&self) -> LumenResult<f64> {
        match self.max_budget {
            None => Err(LumenError::InvalidBudget(
                "max budget is missing or not a number".to_string(),
            )),
            Some(b) if !b.is_finite() => Err(LumenError::InvalidBudget(format!(
                "max budget must be a finite number, got {}",
                b
            ))),
            Some(b) if b <= 0.0 => Err(LumenError::InvalidBudget(format!(
                "max budget must be greater than 0, got {}",
                b
            ))),
            Some(b) => Ok(b),
        }
    }

    /// Options block of the request, or the first validation failure.
    pub fn to_options(&self) -> LumenResult<OptimizationOptions> {
        let max_budget = self.validated_budget()?;
        if self.max_lamps == Some(0) {
            return Err(LumenError::InvalidLampLimit(
                "max lamps must be at least 1".to_string(),
            ));
        }
        Ok(OptimizationOptions {
            max_budget,
            max_lamps: self.max_lamps,
        })
    }
}

#[derive(Debug, Default)]
pub struct ConstraintStore {
    current: Constraints,
}

impl ConstraintStore {
    pub fn new(initial: Constraints) -> Self {
        Self { current: initial }
    }

    pub fn snapshot(&self) -> Constraints {
        self.current.clone()
    }

    pub fn set_max_budget(&mut self, budget: Option<f64>) {
        self.current.max_budget = budget;
    }

    /// Takes the raw text of the budget input. Blank or non-numeric text
    /// clears the budget.
    pub fn set_max_budget_text(&mut self, text: &str) {
        self.current.max_budget = text.trim().parse::<f64>().ok();
    }

    pub fn set_max_lamps(&mut self, limit: Option<u32>) {
        self.current.max_lamps = limit;
    }
}
