/// Mean earth radius in meters, used for geodesic circle construction.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default vertex count of a coverage circle.
pub const DEFAULT_CIRCLE_STEPS: usize = 64;

/// Identifier of the map layer that holds coverage polygons.
pub const COVERAGE_LAYER_ID: &str = "lamp-coverage";

/// Minimum number of distinct vertices in a service area ring.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Ring areas (in squared degrees) below this are treated as degenerate.
pub const MIN_RING_AREA: f64 = 1e-12;
