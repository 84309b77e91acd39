/// Angular tolerance on either side of the sweep angle.
pub const BEAM_HALF_WIDTH: f64 = 6.0;
/// Width of the drawn wedge.
pub const BEAM_SPAN: f64 = 45.0;

/// Whether a marker at `marker_angle` is lit by a beam at `sweep_angle`, both in degrees.
/// Symmetric across the 0°/360° seam.
pub fn is_in_beam(marker_angle: f64, sweep_angle: f64, half_width: f64) -> bool {
    let diff = (marker_angle - sweep_angle + 360.0).rem_euclid(360.0).abs();
    diff < half_width || diff > 360.0 - half_width
}
