use serde::{Deserialize, Serialize};

/// A geographic position, serialized as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self(lon, lat)
    }
}

/// Closed ring of positions describing the service area.
///
/// The first and last positions are equal. Construction and validation
/// happen in the core crate; on the wire this is a bare array of positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<LngLat>);

impl Polygon {
    pub fn ring(&self) -> &[LngLat] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }
}
