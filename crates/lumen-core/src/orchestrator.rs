use crate::catalog::LampCatalog;
use crate::config::SubmitPolicy;
use crate::constraints::Constraints;
use crate::drawing::DrawnShape;
use crate::error::{LumenError, LumenResult};
use crate::geometry::extract;
use crate::overlay::{MapSurface, OverlaySynchronizer};
use crate::protocol::{OptimizationRequest, OptimizationResult};
use crate::util::lock;
use std::future::Future;
use std::sync::{Arc, Mutex};
use strum_macros::Display;
use tracing::{debug, info, warn};

/// Lifecycle of one submission. `Succeeded` and `Failed` are transient:
/// the orchestrator is back in `Idle` once `submit` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Idle,
    Validating,
    InFlight,
    Succeeded,
    Failed,
}

/// The remote optimizer.
pub trait OptimizerBackend {
    fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> impl Future<Output = LumenResult<OptimizationResult>> + Send;
}

/// Checks every precondition and assembles the request from snapshots.
pub fn prepare_request(
    shapes: &[DrawnShape],
    catalog: &LampCatalog,
    constraints: &Constraints,
    policy: &SubmitPolicy,
) -> LumenResult<OptimizationRequest> {
    let polygon = extract(shapes, policy.shape_selection)?;
    let options = constraints.to_options()?;
    if policy.require_lamps && catalog.is_empty() {
        return Err(LumenError::EmptyCatalog);
    }
    Ok(OptimizationRequest {
        polygon,
        lamp_types: catalog.to_wire(),
        options,
    })
}

/// Single-flight guard. Holding one means the phase left `Idle`; dropping it
/// returns the phase to `Idle` however the submission ended.
struct FlightGuard<'a> {
    phase: &'a Mutex<Phase>,
}

impl<'a> FlightGuard<'a> {
    fn acquire(phase: &'a Mutex<Phase>) -> LumenResult<Self> {
        let mut current = lock(phase);
        if *current != Phase::Idle {
            return Err(LumenError::Busy);
        }
        *current = Phase::Validating;
        debug!("Phase: Idle -> Validating");
        Ok(Self { phase })
    }

    fn advance(&self, next: Phase) {
        let mut current = lock(self.phase);
        debug!("Phase: {} -> {}", *current, next);
        *current = next;
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *lock(self.phase) = Phase::Idle;
    }
}

pub struct RequestOrchestrator<B> {
    backend: B,
    policy: SubmitPolicy,
    phase: Mutex<Phase>,
    current: Mutex<Option<Arc<OptimizationResult>>>,
}

impl<B: OptimizerBackend> RequestOrchestrator<B> {
    pub fn new(backend: B, policy: SubmitPolicy) -> Self {
        Self {
            backend,
            policy,
            phase: Mutex::new(Phase::Idle),
            current: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &SubmitPolicy {
        &self.policy
    }

    pub fn phase(&self) -> Phase {
        *lock(&self.phase)
    }

    pub fn current(&self) -> Option<Arc<OptimizationResult>> {
        lock(&self.current).clone()
    }

    pub fn clear_result(&self) {
        lock(&self.current).take();
    }

    /// Runs one submission through the state machine.
    ///
    /// `prepare` runs in `Validating` and must build the request from
    /// snapshots; a failure there ends the submission before anything is
    /// cleared or sent. Entering `InFlight` clears the overlay and the stored
    /// result before the request goes out.
    pub async fn submit<M, F>(
        &self,
        prepare: F,
        overlay: &Mutex<OverlaySynchronizer<M>>,
    ) -> LumenResult<Arc<OptimizationResult>>
    where
        M: MapSurface,
        F: FnOnce(&SubmitPolicy) -> LumenResult<OptimizationRequest>,
    {
        let flight = FlightGuard::acquire(&self.phase)?;

        if !lock(overlay).is_ready() {
            return Err(LumenError::NotReady("map"));
        }

        let request = match prepare(&self.policy) {
            Ok(r) => r,
            Err(e) => {
                warn!("Submission rejected: {}", e);
                return Err(e);
            }
        };

        flight.advance(Phase::InFlight);
        lock(overlay).reset();
        self.clear_result();

        info!(
            "📤 Requesting optimization: {} ring points, {} lamp types, budget {}",
            request.polygon.len(),
            request.lamp_types.len(),
            request.options.max_budget
        );

        match self.backend.optimize(&request).await {
            Ok(result) => {
                let result = Arc::new(result);
                *lock(&self.current) = Some(Arc::clone(&result));
                match lock(overlay).apply(&result) {
                    Ok(placed) => info!(
                        "✅ Optimization '{}' placed {} lamps ({:.1}% coverage)",
                        result.status, placed, result.coverage_pct
                    ),
                    Err(e) => warn!("Result stored but overlay not drawn: {}", e),
                }
                flight.advance(Phase::Succeeded);
                Ok(result)
            }
            Err(e) => {
                let e = match e {
                    LumenError::Transport(_) => e,
                    other => LumenError::Transport(other.to_string()),
                };
                warn!("❌ {}", e);
                flight.advance(Phase::Failed);
                Err(e)
            }
        }
    }
}
