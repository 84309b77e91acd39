pub mod view;

pub use view::draw;

pub const LINE_WIDTH: f64 = 1.0;
pub const OUTLINE_WIDTH: f64 = 2.0;

/// Compass degrees (0° up, clockwise) to cairo radians (0 along +x, clockwise on screen).
pub fn compass_to_cairo(angle_degrees: f64) -> f64 {
    (angle_degrees - 90.0).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn compass_to_cairo_matches_screen_directions() {
        assert!((compass_to_cairo(0.0) + FRAC_PI_2).abs() < 1e-12);
        assert!(compass_to_cairo(90.0).abs() < 1e-12);
        assert!((compass_to_cairo(270.0) - PI).abs() < 1e-12);
    }
}
