use crate::protocol::OptimizationResult;
use serde::Serialize;
use std::fmt;

/// Display-ready aggregates of one optimization result.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub status: String,
    /// Already percentage-scaled by the optimizer.
    pub coverage_pct: f64,
    pub lamps_placed: usize,
    pub points_covered: u64,
    pub total_points: u64,
    pub total_cost: f64,
}

pub fn project(result: &OptimizationResult) -> ResultSummary {
    ResultSummary {
        status: result.status.clone(),
        coverage_pct: result.coverage_pct,
        lamps_placed: result.lamps.len(),
        points_covered: result.points_covered,
        total_points: result.total_points,
        total_cost: result.total_cost,
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lamps placed, {:.1}% coverage ({}/{} points), total cost {:.2}",
            self.lamps_placed,
            self.coverage_pct,
            self.points_covered,
            self.total_points,
            self.total_cost
        )
    }
}
