// Re-export the wire geometry so core code can use it without reaching into the protocol crate
pub use crate::protocol::geometry::*;

use crate::config::ShapeSelection;
use crate::consts::{MIN_POLYGON_VERTICES, MIN_RING_AREA};
use crate::drawing::{DrawnShape, ShapeGeometry};
use crate::error::{LumenError, LumenResult};
use std::collections::HashSet;
use tracing::debug;

pub mod circle;

/// Pulls the service area out of the drawing tool's shapes.
///
/// With `ShapeSelection::First` only the first shape is used and any further
/// shapes are ignored. With `ShapeSelection::Single` extra shapes are an error.
pub fn extract(shapes: &[DrawnShape], selection: ShapeSelection) -> LumenResult<Polygon> {
    let first = shapes.first().ok_or(LumenError::NoPolygon)?;

    if shapes.len() > 1 {
        match selection {
            ShapeSelection::Single => return Err(LumenError::MultiplePolygons(shapes.len())),
            ShapeSelection::First => debug!(
                "Using first drawn shape, ignoring {} others",
                shapes.len() - 1
            ),
        }
    }

    match &first.geometry {
        ShapeGeometry::Polygon { coordinates } => {
            let exterior = coordinates.first().ok_or_else(|| {
                LumenError::InvalidPolygon("drawn polygon has no rings".to_string())
            })?;
            polygon_from_ring(exterior.clone())
        }
        other => Err(LumenError::InvalidPolygon(format!(
            "expected a Polygon, found a {}",
            other.kind()
        ))),
    }
}

/// Validates a ring and closes it if the drawing tool left it open.
pub fn polygon_from_ring(mut ring: Vec<LngLat>) -> LumenResult<Polygon> {
    if let Some(bad) = ring.iter().find(|p| !is_valid_position(p)) {
        return Err(LumenError::InvalidPolygon(format!(
            "position [{}, {}] is out of range",
            bad.lon(),
            bad.lat()
        )));
    }

    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }

    let distinct = distinct_vertices(&ring);
    if distinct < MIN_POLYGON_VERTICES {
        return Err(LumenError::InvalidPolygon(format!(
            "a polygon needs at least {} distinct vertices, got {}",
            MIN_POLYGON_VERTICES, distinct
        )));
    }

    if ring_area(&ring).abs() < MIN_RING_AREA {
        return Err(LumenError::InvalidPolygon("polygon area is zero".to_string()));
    }

    Ok(Polygon(ring))
}

fn is_valid_position(p: &LngLat) -> bool {
    p.lon().is_finite()
        && p.lat().is_finite()
        && (-180.0..=180.0).contains(&p.lon())
        && (-90.0..=90.0).contains(&p.lat())
}

fn distinct_vertices(ring: &[LngLat]) -> usize {
    ring.iter()
        .map(|p| (p.lon().to_bits(), p.lat().to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// Signed shoelace area of a closed ring, in squared degrees.
pub fn ring_area(ring: &[LngLat]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].lon() * w[1].lat() - w[1].lon() * w[0].lat())
        .sum::<f64>()
        / 2.0
}
