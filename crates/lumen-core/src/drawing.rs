use crate::error::{LumenError, LumenResult};
use crate::geometry::LngLat;
use crate::util::lock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Geometry of a user-drawn feature, in GeoJSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeGeometry {
    Polygon { coordinates: Vec<Vec<LngLat>> },
    LineString { coordinates: Vec<LngLat> },
    Point { coordinates: LngLat },
}

impl ShapeGeometry {
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeGeometry::Polygon { .. } => "Polygon",
            ShapeGeometry::LineString { .. } => "LineString",
            ShapeGeometry::Point { .. } => "Point",
        }
    }
}

/// One feature held by the drawing tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnShape {
    #[serde(default)]
    pub id: Option<String>,
    pub geometry: ShapeGeometry,
}

impl DrawnShape {
    pub fn polygon(ring: Vec<LngLat>) -> Self {
        Self {
            id: None,
            geometry: ShapeGeometry::Polygon {
                coordinates: vec![ring],
            },
        }
    }
}

/// Capability handle onto the drawing tool. Shapes are returned in the
/// order the tool reports them.
pub trait DrawingSource {
    fn shapes(&self) -> Vec<DrawnShape>;
}

impl<T: DrawingSource + ?Sized> DrawingSource for Arc<T> {
    fn shapes(&self) -> Vec<DrawnShape> {
        (**self).shapes()
    }
}

impl<T: DrawingSource + ?Sized> DrawingSource for &T {
    fn shapes(&self) -> Vec<DrawnShape> {
        (**self).shapes()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DrawingDocument {
    Collection { features: Vec<DrawnShape> },
    Feature(DrawnShape),
    Geometry(ShapeGeometry),
}

/// Drawing tool stand-in holding a fixed set of shapes, e.g. an export of
/// the tool's state. Shapes can be replaced while the session is running.
#[derive(Debug, Default)]
pub struct StaticDrawing {
    shapes: Mutex<Vec<DrawnShape>>,
}

impl StaticDrawing {
    pub fn new(shapes: Vec<DrawnShape>) -> Self {
        Self {
            shapes: Mutex::new(shapes),
        }
    }

    /// Accepts a GeoJSON FeatureCollection, a single Feature or a bare geometry.
    pub fn from_geojson(content: &str) -> LumenResult<Self> {
        let doc: DrawingDocument = serde_json::from_str(content).map_err(|e| {
            LumenError::InvalidPolygon(format!("Unreadable drawing export: {}", e))
        })?;
        let shapes = match doc {
            DrawingDocument::Collection { features } => features,
            DrawingDocument::Feature(shape) => vec![shape],
            DrawingDocument::Geometry(geometry) => vec![DrawnShape { id: None, geometry }],
        };
        Ok(Self::new(shapes))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LumenResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_geojson(&content)
    }

    pub fn replace(&self, shapes: Vec<DrawnShape>) {
        *lock(&self.shapes) = shapes;
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }
}

impl DrawingSource for StaticDrawing {
    fn shapes(&self) -> Vec<DrawnShape> {
        lock(&self.shapes).clone()
    }
}
