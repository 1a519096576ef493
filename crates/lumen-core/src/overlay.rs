use crate::consts::{COVERAGE_LAYER_ID, DEFAULT_CIRCLE_STEPS};
use crate::drawing::ShapeGeometry;
use crate::error::{LumenError, LumenResult};
use crate::geometry::circle::circle_ring;
use crate::geometry::LngLat;
use crate::protocol::{OptimizationResult, PlacedLamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Opaque id of a marker created on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureProperties {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lamp_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: ShapeGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

/// Capability handle onto the externally owned map.
pub trait MapSurface {
    /// Creates the (empty) coverage layer. Called once, when the map is ready.
    fn add_coverage_layer(&mut self, layer_id: &str);
    fn add_marker(&mut self, at: LngLat, color: &str) -> MarkerHandle;
    fn remove_marker(&mut self, marker: MarkerHandle);
    /// Replaces the layer's feature collection in a single update.
    fn set_coverage(&mut self, layer_id: &str, data: FeatureCollection);
}

/// Coverage circle for one placement, tagged with the lamp's color.
pub fn coverage_feature(lamp: &PlacedLamp, steps: usize) -> Feature {
    let ring = circle_ring(LngLat(lamp.lon, lamp.lat), lamp.radius, steps);
    Feature {
        geometry: ShapeGeometry::Polygon {
            coordinates: vec![ring],
        },
        properties: FeatureProperties {
            color: lamp.color.clone(),
            radius: Some(lamp.radius),
            lamp_type: lamp.lamp_type.clone(),
        },
    }
}

fn is_placeable(lamp: &PlacedLamp) -> bool {
    lamp.lon.is_finite() && lamp.lat.is_finite()
}

fn has_coverage(lamp: &PlacedLamp) -> bool {
    lamp.radius.is_finite() && lamp.radius > 0.0
}

/// Owns every marker and the coverage layer content shown for a result.
///
/// The overlay is always rebuilt from scratch: `apply` starts with `reset`,
/// and markers are only ever created and removed here.
pub struct OverlaySynchronizer<M: MapSurface> {
    map: Option<M>,
    markers: Vec<MarkerHandle>,
    coverage_len: usize,
    circle_steps: usize,
}

impl<M: MapSurface> OverlaySynchronizer<M> {
    pub fn new(circle_steps: usize) -> Self {
        Self {
            map: None,
            markers: Vec::new(),
            coverage_len: 0,
            circle_steps: circle_steps.max(3),
        }
    }

    /// Ready signal: takes the map over and creates the coverage layer.
    /// A previously attached map is torn down and handed back.
    pub fn attach(&mut self, mut map: M) -> Option<M> {
        let previous = self.detach();
        map.add_coverage_layer(COVERAGE_LAYER_ID);
        map.set_coverage(COVERAGE_LAYER_ID, FeatureCollection::default());
        self.map = Some(map);
        debug!("Map attached, coverage layer '{}' created", COVERAGE_LAYER_ID);
        previous
    }

    /// Removes everything this overlay placed and releases the map.
    pub fn detach(&mut self) -> Option<M> {
        self.reset();
        self.map.take()
    }

    pub fn is_ready(&self) -> bool {
        self.map.is_some()
    }

    pub fn reset(&mut self) {
        let markers = std::mem::take(&mut self.markers);
        self.coverage_len = 0;
        if let Some(map) = self.map.as_mut() {
            for marker in markers {
                map.remove_marker(marker);
            }
            map.set_coverage(COVERAGE_LAYER_ID, FeatureCollection::default());
        }
    }

    /// Rebuilds the overlay for `result`. Returns the number of markers placed.
    pub fn apply(&mut self, result: &OptimizationResult) -> LumenResult<usize> {
        if self.map.is_none() {
            return Err(LumenError::NotReady("map"));
        }
        self.reset();

        let steps = self.circle_steps;
        let mut coverage = FeatureCollection::default();
        let mut placed = Vec::with_capacity(result.lamps.len());

        if let Some(map) = self.map.as_mut() {
            for lamp in &result.lamps {
                if !is_placeable(lamp) {
                    warn!("Skipping lamp with invalid position ({}, {})", lamp.lon, lamp.lat);
                    continue;
                }
                placed.push(map.add_marker(LngLat(lamp.lon, lamp.lat), &lamp.color));
                if has_coverage(lamp) {
                    coverage.features.push(coverage_feature(lamp, steps));
                } else {
                    warn!("Lamp at ({}, {}) has no usable radius", lamp.lon, lamp.lat);
                }
            }
            self.coverage_len = coverage.len();
            map.set_coverage(COVERAGE_LAYER_ID, coverage);
        }

        self.markers = placed;
        Ok(self.markers.len())
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn coverage_count(&self) -> usize {
        self.coverage_len
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }
}

impl<M: MapSurface> Drop for OverlaySynchronizer<M> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<M: MapSurface> Default for OverlaySynchronizer<M> {
    fn default() -> Self {
        Self::new(DEFAULT_CIRCLE_STEPS)
    }
}
