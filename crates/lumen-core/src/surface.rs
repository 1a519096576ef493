use crate::config::MapSettings;
use crate::consts::COVERAGE_LAYER_ID;
use crate::drawing::ShapeGeometry;
use crate::geometry::LngLat;
use crate::overlay::{Feature, FeatureCollection, FeatureProperties, MapSurface, MarkerHandle};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub style: String,
    pub center: LngLat,
    pub zoom: f64,
}

impl From<&MapSettings> for MapView {
    fn from(settings: &MapSettings) -> Self {
        Self {
            style: settings.map_style.clone(),
            center: LngLat(settings.center_lon, settings.center_lat),
            zoom: settings.zoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub at: LngLat,
    pub color: String,
}

/// Headless map surface. Keeps markers and layers in memory and can render
/// them as one GeoJSON document.
#[derive(Debug)]
pub struct MemoryMap {
    view: MapView,
    next_marker: u64,
    markers: BTreeMap<u64, Marker>,
    layers: HashMap<String, FeatureCollection>,
    coverage_updates: usize,
}

impl MemoryMap {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            next_marker: 0,
            markers: BTreeMap::new(),
            layers: HashMap::new(),
            coverage_updates: 0,
        }
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn layer(&self, layer_id: &str) -> Option<&FeatureCollection> {
        self.layers.get(layer_id)
    }

    pub fn coverage(&self) -> Option<&FeatureCollection> {
        self.layer(COVERAGE_LAYER_ID)
    }

    /// Number of `set_coverage` calls received so far.
    pub fn coverage_updates(&self) -> usize {
        self.coverage_updates
    }

    /// Markers as Point features followed by the coverage polygons.
    pub fn to_geojson(&self) -> FeatureCollection {
        let points = self.markers.values().map(|m| Feature {
            geometry: ShapeGeometry::Point { coordinates: m.at },
            properties: FeatureProperties {
                color: m.color.clone(),
                ..Default::default()
            },
        });
        let circles = self
            .coverage()
            .map(|fc| fc.features.clone())
            .unwrap_or_default();

        FeatureCollection {
            features: points.chain(circles).collect(),
        }
    }
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::new(MapView::from(&MapSettings::default()))
    }
}

impl MapSurface for MemoryMap {
    fn add_coverage_layer(&mut self, layer_id: &str) {
        self.layers.entry(layer_id.to_string()).or_default();
    }

    fn add_marker(&mut self, at: LngLat, color: &str) -> MarkerHandle {
        self.next_marker += 1;
        self.markers.insert(
            self.next_marker,
            Marker {
                at,
                color: color.to_string(),
            },
        );
        MarkerHandle(self.next_marker)
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.remove(&marker.0);
    }

    fn set_coverage(&mut self, layer_id: &str, data: FeatureCollection) {
        self.coverage_updates += 1;
        self.layers.insert(layer_id.to_string(), data);
    }
}
