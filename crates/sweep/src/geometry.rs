use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Compass-style polar conversion: 0° points up and angles grow clockwise.
///
/// Used for everything laid out against the categories (spokes, labels, sectors and the
/// beam). Any real angle is accepted; the trigonometry wraps on its own.
pub fn polar_to_cartesian(center: Point, radius: f64, angle_degrees: f64) -> Point {
    let rad = (angle_degrees - 90.0).to_radians();
    Point::new(
        center.x + radius * rad.cos(),
        center.y + radius * rad.sin(),
    )
}

/// Plain mathematical polar form, angle in radians measured from the positive x axis.
///
/// Markers are placed with this one. It is a quarter turn away from
/// [`polar_to_cartesian`], so the two must not be swapped.
pub fn raw_polar(radius: f64, angle_radians: f64) -> Point {
    Point::new(radius * angle_radians.cos(), radius * angle_radians.sin())
}

/// A closed pie slice: center, out to the arc, around the arc, back to the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorPath {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Point on the arc at the end angle; the outline leaves the center towards it.
    pub arc_start: Point,
    /// Point on the arc at the start angle; the arc finishes here.
    pub arc_end: Point,
    pub large_arc: bool,
}

impl SectorPath {
    /// Sweep direction flag. Always the non-reflex drawing direction.
    pub const SWEEP_FLAG: u8 = 0;
}

impl fmt::Display for SectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} L {} {} A {} {} 0 {} {} {} {} Z",
            self.center.x,
            self.center.y,
            self.arc_start.x,
            self.arc_start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            Self::SWEEP_FLAG,
            self.arc_end.x,
            self.arc_end.y,
        )
    }
}

pub fn describe_sector(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> SectorPath {
    SectorPath {
        center,
        radius,
        start_angle,
        end_angle,
        arc_start: polar_to_cartesian(center, radius, end_angle),
        arc_end: polar_to_cartesian(center, radius, start_angle),
        // exactly half a turn still counts as the small arc
        large_arc: end_angle - start_angle > 180.0,
    }
}

/// Maps widget pixels onto the square scene space `[-extent, extent]²` centered in the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub extent: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, extent: f64) -> Self {
        Self {
            width,
            height,
            extent,
        }
    }

    /// Pixels per scene unit.
    pub fn scale(&self) -> f64 {
        if self.extent <= 0.0 {
            return 0.0;
        }
        (self.width.min(self.height) / (2.0 * self.extent)).max(0.0)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn to_scene(&self, pixel: Point) -> Point {
        let scale = self.scale();
        if scale == 0.0 {
            return Point::default();
        }
        let origin = self.origin();
        Point::new((pixel.x - origin.x) / scale, (pixel.y - origin.y) / scale)
    }
}
