use crate::catalog::{CatalogStore, LampCatalog, LampEdit, LampSpec};
use crate::color::ColorGenerator;
use crate::config::{Config, LampDefaults};
use crate::constraints::{ConstraintStore, Constraints};
use crate::drawing::DrawingSource;
use crate::error::{LumenError, LumenResult};
use crate::orchestrator::{prepare_request, OptimizerBackend, Phase, RequestOrchestrator};
use crate::overlay::{MapSurface, OverlaySynchronizer};
use crate::protocol::OptimizationResult;
use crate::summary::{project, ResultSummary};
use crate::util::{lock, read, write};
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

/// One operator session: the stores, the overlay and the request lifecycle.
///
/// All methods take `&self`. Locks are held only for synchronous steps, so the
/// catalog and constraints stay editable while a request is in flight; those
/// edits reach the next submission only.
pub struct Session<B, D, M: MapSurface> {
    orchestrator: RequestOrchestrator<B>,
    drawing: Mutex<Option<D>>,
    overlay: Mutex<OverlaySynchronizer<M>>,
    catalog: RwLock<CatalogStore>,
    constraints: RwLock<ConstraintStore>,
    lamp_defaults: LampDefaults,
}

impl<B, D, M> Session<B, D, M>
where
    B: OptimizerBackend,
    D: DrawingSource,
    M: MapSurface,
{
    pub fn new(backend: B, config: &Config) -> Self {
        Self {
            orchestrator: RequestOrchestrator::new(backend, config.policy.clone()),
            drawing: Mutex::new(None),
            overlay: Mutex::new(OverlaySynchronizer::new(config.map.circle_steps)),
            catalog: RwLock::new(CatalogStore::new(ColorGenerator::new())),
            constraints: RwLock::new(ConstraintStore::default()),
            lamp_defaults: config.lamps.clone(),
        }
    }

    pub fn with_catalog(self, store: CatalogStore) -> Self {
        *write(&self.catalog) = store;
        self
    }

    pub fn with_constraints(self, constraints: Constraints) -> Self {
        *write(&self.constraints) = ConstraintStore::new(constraints);
        self
    }

    // --- Lifecycle ---

    /// Map ready signal. Returns the previously attached map, torn down.
    pub fn attach_map(&self, map: M) -> Option<M> {
        info!("🗺️  Map ready");
        lock(&self.overlay).attach(map)
    }

    pub fn detach_map(&self) -> Option<M> {
        lock(&self.overlay).detach()
    }

    pub fn attach_drawing(&self, drawing: D) -> Option<D> {
        lock(&self.drawing).replace(drawing)
    }

    pub fn detach_drawing(&self) -> Option<D> {
        lock(&self.drawing).take()
    }

    // --- Lamp catalog ---

    pub fn catalog(&self) -> LampCatalog {
        read(&self.catalog).snapshot()
    }

    pub fn add_lamp(&self) -> LampCatalog {
        write(&self.catalog).add(&self.lamp_defaults)
    }

    pub fn update_lamp(&self, id: &str, edit: &LampEdit) -> LumenResult<LampCatalog> {
        write(&self.catalog).update(id, edit)
    }

    pub fn remove_lamp(&self, id: &str) -> LumenResult<LampCatalog> {
        write(&self.catalog).remove(id)
    }

    pub fn import_lamps(&self, specs: Vec<LampSpec>) -> LumenResult<LampCatalog> {
        write(&self.catalog).import(specs)
    }

    // --- Constraints ---

    pub fn constraints(&self) -> Constraints {
        read(&self.constraints).snapshot()
    }

    pub fn edit_constraints<R>(&self, edit: impl FnOnce(&mut ConstraintStore) -> R) -> R {
        edit(&mut write(&self.constraints))
    }

    // --- Optimization ---

    pub fn phase(&self) -> Phase {
        self.orchestrator.phase()
    }

    pub fn backend(&self) -> &B {
        self.orchestrator.backend()
    }

    pub fn current_result(&self) -> Option<Arc<OptimizationResult>> {
        self.orchestrator.current()
    }

    pub fn summary(&self) -> Option<ResultSummary> {
        self.current_result().map(|r| project(&r))
    }

    /// Validates the current drawing, catalog and constraints, then runs one
    /// optimization. The request is built from snapshots taken here.
    pub async fn optimize(&self) -> LumenResult<Arc<OptimizationResult>> {
        self.orchestrator
            .submit(
                |policy| {
                    let shapes = lock(&self.drawing)
                        .as_ref()
                        .map(|d| d.shapes())
                        .ok_or(LumenError::NotReady("drawing tool"))?;
                    let catalog = self.catalog();
                    let constraints = self.constraints();
                    prepare_request(&shapes, &catalog, &constraints, policy)
                },
                &self.overlay,
            )
            .await
    }

    /// Clears the overlay and forgets the current result.
    pub fn clear(&self) {
        lock(&self.overlay).reset();
        self.orchestrator.clear_result();
    }

    pub fn with_overlay<R>(&self, inspect: impl FnOnce(&OverlaySynchronizer<M>) -> R) -> R {
        inspect(&lock(&self.overlay))
    }
}
