use crate::geometry::{Point, raw_polar};
use derive_more::{AsRef, Deref, Display, From, Into};
use rand::Rng;
use rand::rngs::ThreadRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct MarkerId(usize);

impl MarkerId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MarkerLabel(String);

crate::string_newtype!(MarkerLabel);

/// A point in the field. `offset` and `angle` are two views of one position and are only
/// ever computed together in [`Marker::from_polar`].
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    offset: Point,
    angle: f64,
    label: MarkerLabel,
}

impl Marker {
    pub fn from_polar(id: MarkerId, radius: f64, angle_degrees: f64) -> Self {
        let angle = angle_degrees.rem_euclid(360.0);
        Self {
            id,
            offset: raw_polar(radius, angle.to_radians()),
            angle,
            label: MarkerLabel::new(format!("Dot {}", usize::from(id) + 1)),
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Position relative to the radar center.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Polar angle in degrees, `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn label(&self) -> &MarkerLabel {
        &self.label
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field(Vec<Marker>);

impl Field {
    /// Builds a field from `(radius, angle_degrees)` pairs, ids assigned in order.
    pub fn from_polar(positions: &[(f64, f64)]) -> Self {
        Self(
            positions
                .iter()
                .enumerate()
                .map(|(i, &(r, a))| Marker::from_polar(MarkerId(i), r, a))
                .collect(),
        )
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.0.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait FieldSource {
    fn generate(&mut self, count: usize, max_radius: f64) -> Field;
}

/// Uniform radius in `[0, max_radius)` and uniform angle in `[0, 360)`.
pub struct RandomField<R> {
    rng: R,
}

impl<R: Rng> RandomField<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomField<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> FieldSource for RandomField<R> {
    fn generate(&mut self, count: usize, max_radius: f64) -> Field {
        let positions: Vec<_> = (0..count)
            .map(|_| {
                let radius = if max_radius > 0.0 {
                    self.rng.random_range(0.0..max_radius)
                } else {
                    0.0
                };
                (radius, self.rng.random_range(0.0..360.0))
            })
            .collect();
        log::debug!("Generated {} markers within radius {}", count, max_radius);
        Field::from_polar(&positions)
    }
}

/// Hands out the same field every time.
#[derive(Debug, Clone)]
pub struct FixedField(pub Field);

impl FieldSource for FixedField {
    fn generate(&mut self, _count: usize, _max_radius: f64) -> Field {
        self.0.clone()
    }
}
