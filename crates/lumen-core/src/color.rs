//! Display colors for lamp types.
//!
//! Hues are drawn uniformly from the color wheel at fixed saturation and
//! lightness so every generated color is equally readable on the map.

const SATURATION: f64 = 0.70;
const LIGHTNESS: f64 = 0.50;

pub struct ColorGenerator {
    rng: fastrand::Rng,
}

impl ColorGenerator {
    /// Entropy-seeded generator for interactive use.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Reproducible sequence of colors.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Next color as `#rrggbb`.
    pub fn next_color(&mut self) -> String {
        let hue = self.rng.f64() * 360.0;
        hsl_to_hex(hue, SATURATION, LIGHTNESS)
    }
}

impl Default for ColorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// Accepts `#rrggbb` only.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
