#![allow(dead_code)]

use lumen_core::catalog::CatalogStore;
use lumen_core::color::ColorGenerator;
use lumen_core::config::Config;
use lumen_core::drawing::{DrawnShape, StaticDrawing};
use lumen_core::geometry::LngLat;
use lumen_core::orchestrator::OptimizerBackend;
use lumen_core::protocol::{OptimizationRequest, OptimizationResult, PlacedLamp};
use lumen_core::surface::MemoryMap;
use lumen_core::{LumenError, LumenResult, Session};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub type TestSession<B> = Session<B, Arc<StaticDrawing>, MemoryMap>;

/// Small square service area around (31.2, 30.0).
pub fn square() -> DrawnShape {
    square_at(31.2, 30.0, 0.01)
}

/// Open ring, the way the drawing tool usually hands it over.
pub fn square_at(lon: f64, lat: f64, half: f64) -> DrawnShape {
    DrawnShape::polygon(vec![
        LngLat(lon - half, lat - half),
        LngLat(lon + half, lat - half),
        LngLat(lon + half, lat + half),
        LngLat(lon - half, lat + half),
    ])
}

pub fn lamp(lon: f64, lat: f64, radius: f64, color: &str) -> PlacedLamp {
    PlacedLamp {
        lon,
        lat,
        radius,
        color: color.to_string(),
        lamp_type: Some("A".to_string()),
        cost: Some(100.0),
    }
}

/// One lamp at (31.2, 30.0), radius 80 m, red.
pub fn optimal_result() -> OptimizationResult {
    OptimizationResult {
        status: "optimal".to_string(),
        lamps: vec![lamp(31.2, 30.0, 80.0, "#ff0000")],
        points_covered: 7,
        total_points: 10,
        coverage_pct: 70.0,
        total_cost: 100.0,
    }
}

pub fn result_with(lamps: Vec<PlacedLamp>) -> OptimizationResult {
    OptimizationResult {
        status: "optimal".to_string(),
        lamps,
        ..Default::default()
    }
}

/// Session with a map, a drawing tool holding `shapes` and the starter catalog.
pub fn ready_session<B: OptimizerBackend>(
    backend: B,
    shapes: Vec<DrawnShape>,
) -> (TestSession<B>, Arc<StaticDrawing>) {
    ready_session_with(backend, shapes, &Config::default())
}

pub fn ready_session_with<B: OptimizerBackend>(
    backend: B,
    shapes: Vec<DrawnShape>,
    config: &Config,
) -> (TestSession<B>, Arc<StaticDrawing>) {
    let drawing = Arc::new(StaticDrawing::new(shapes));
    let session = Session::new(backend, config)
        .with_catalog(CatalogStore::starter(ColorGenerator::with_seed(42)));
    session.attach_map(MemoryMap::default());
    session.attach_drawing(Arc::clone(&drawing));
    (session, drawing)
}

pub fn overlay_counts<B: OptimizerBackend>(session: &TestSession<B>) -> (usize, usize) {
    session.with_overlay(|o| {
        let map = o.map().map(|m| m.marker_count()).unwrap_or_default();
        let coverage = o
            .map()
            .and_then(|m| m.coverage())
            .map(|c| c.len())
            .unwrap_or_default();
        (map, coverage)
    })
}

/// Replies with queued outcomes in order, then with an empty success.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<LumenResult<OptimizationResult>>>,
    requests: Mutex<Vec<OptimizationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<LumenResult<OptimizationResult>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn ok(result: OptimizationResult) -> Self {
        Self::new(vec![Ok(result)])
    }

    pub fn failing(detail: &str) -> Self {
        Self::new(vec![Err(LumenError::Transport(detail.to_string()))])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<OptimizationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl OptimizerBackend for ScriptedBackend {
    async fn optimize(&self, request: &OptimizationRequest) -> LumenResult<OptimizationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(result_with(vec![])))
    }
}

/// Holds every request until the test releases it.
pub struct GatedBackend {
    gate: Semaphore,
    result: OptimizationResult,
    requests: Mutex<Vec<OptimizationRequest>>,
    calls: AtomicUsize,
}

impl GatedBackend {
    pub fn new(result: OptimizationResult) -> Self {
        Self {
            gate: Semaphore::new(0),
            result,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<OptimizationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl OptimizerBackend for GatedBackend {
    async fn optimize(&self, request: &OptimizationRequest) -> LumenResult<OptimizationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| LumenError::Transport(e.to_string()))?;
        permit.forget();
        Ok(self.result.clone())
    }
}
