use crate::beam::{BEAM_HALF_WIDTH, BEAM_SPAN, is_in_beam};
use crate::category::{Categories, CategoryLabel, IconName};
use crate::clock::{Animator, Clock, MS_PER_DEGREE, SweepState};
use crate::error::SceneError;
use crate::field::{Field, FieldSource, Marker, MarkerId};
use crate::geometry::{Point, SectorPath, describe_sector, polar_to_cartesian};
use crate::selection::{NotificationSink, Selection};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

pub const RING_FRACTIONS: [f64; 3] = [1.0 / 3.0, 2.0 / 3.0, 1.0];
pub const MARKER_RADIUS: f64 = 4.0;
pub const MARKER_ACTIVE_RADIUS: f64 = 6.0;
pub const MARKER_HIT_SLACK: f64 = 2.0;
/// Label text size in scene units.
pub const LABEL_FONT_SIZE: f64 = 10.0;
/// Average advance of a bold sans glyph, as a fraction of the font size.
const LABEL_GLYPH_WIDTH: f64 = 0.62;
/// Side of the square icon box drawn next to a label.
pub const LABEL_ICON_EXTENT: f64 = 14.0;

const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

/// Layout and timing knobs, passed in explicitly rather than kept as globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Outer ring and spoke length.
    pub max_radius: f64,
    /// Markers are scattered inside this radius.
    pub field_radius: f64,
    pub marker_count: usize,
    /// Labels sit at the spoke end scaled by this factor.
    pub label_offset: f64,
    pub beam_span: f64,
    pub beam_half_width: f64,
    pub ms_per_degree: f64,
    /// Half the side of the square scene space.
    pub extent: f64,
    /// Extra margin around a label's text box that still counts as a click on it.
    pub label_hit_padding: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_radius: 160.0,
            field_radius: 120.0,
            marker_count: 12,
            label_offset: 1.15,
            beam_span: BEAM_SPAN,
            beam_half_width: BEAM_HALF_WIDTH,
            ms_per_degree: MS_PER_DEGREE,
            extent: 200.0,
            label_hit_padding: 4.0,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        let positive = [
            ("max_radius", self.max_radius),
            ("field_radius", self.field_radius),
            ("label_offset", self.label_offset),
            ("ms_per_degree", self.ms_per_degree),
            ("extent", self.extent),
        ];
        let non_negative = [
            ("beam_span", self.beam_span),
            ("beam_half_width", self.beam_half_width),
            ("label_hit_padding", self.label_hit_padding),
        ];

        positive
            .into_iter()
            .find(|(_, v)| !(v.is_finite() && *v > 0.0))
            .or_else(|| {
                non_negative
                    .into_iter()
                    .find(|(_, v)| !(v.is_finite() && *v >= 0.0))
            })
            // markers must stay inside the outer ring
            .or_else(|| {
                (self.field_radius > self.max_radius)
                    .then_some(("field_radius", self.field_radius))
            })
            .map_or(Ok(()), |(name, value)| {
                Err(SceneError::InvalidParameter { name, value })
            })
    }
}

/// Axis-aligned click area around a label, in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub center: Point,
    pub half_width: f64,
    pub half_height: f64,
}

impl LabelBox {
    pub fn contains(&self, point: Point) -> bool {
        (point.x - self.center.x).abs() <= self.half_width
            && (point.y - self.center.y).abs() <= self.half_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    None,
    InBeam,
    Selected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Ring {
        radius: f64,
    },
    Sector {
        path: SectorPath,
    },
    Spoke {
        index: usize,
        end: Point,
    },
    Label {
        index: usize,
        text: CategoryLabel,
        icon: Option<IconName>,
        anchor: Point,
        /// Where the icon goes, on the side of the text facing the center.
        icon_anchor: Point,
        selected: bool,
    },
    Marker {
        id: MarkerId,
        center: Point,
        radius: f64,
        outline: Outline,
    },
    /// Wedge in local coordinates, to be rotated by `rotation` degrees about the center.
    Beam {
        path: SectorPath,
        rotation: f64,
    },
}

/// Everything to draw for one refresh, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub primitives: Vec<Primitive>,
}

impl Frame {
    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Marker(MarkerId),
    Category(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    pub should_redraw: bool,
}

impl Interaction {
    pub fn new(should_redraw: bool) -> Self {
        Self { should_redraw }
    }
}

pub struct Radar {
    categories: Categories,
    field: Field,
    selection: Selection,
    sweep: SweepState,
    config: SceneConfig,
}

impl Radar {
    pub fn new(
        categories: Categories,
        config: SceneConfig,
        source: &mut impl FieldSource,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        let field = source.generate(config.marker_count, config.field_radius);
        Ok(Self {
            categories,
            field,
            selection: Selection::default(),
            sweep: SweepState::default(),
            config,
        })
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn sweep_angle(&self) -> f64 {
        self.sweep.angle()
    }

    pub fn animate<C: Clock>(&mut self, animator: &Animator<C>) -> ControlFlow<()> {
        animator.frame(&mut self.sweep)
    }

    pub fn select_marker(&mut self, id: MarkerId, sink: &mut impl NotificationSink) -> Interaction {
        match self.selection.select_marker(&self.field, id) {
            Some(notification) => {
                sink.notify(&notification);
                Interaction::new(true)
            }
            None => Interaction::default(),
        }
    }

    pub fn select_category(
        &mut self,
        index: usize,
        sink: &mut impl NotificationSink,
    ) -> Interaction {
        match self.selection.select_category(&self.categories, index) {
            Some(notification) => {
                sink.notify(&notification);
                Interaction::new(true)
            }
            None => Interaction::default(),
        }
    }

    /// Routes a click in scene coordinates to whatever sits under it.
    pub fn click(&mut self, point: Point, sink: &mut impl NotificationSink) -> Interaction {
        match self.hit_test(point) {
            Some(Target::Marker(id)) => self.select_marker(id, sink),
            Some(Target::Category(index)) => self.select_category(index, sink),
            None => Interaction::default(),
        }
    }

    /// Markers are on top of labels, and the beam never takes clicks.
    pub fn hit_test(&self, point: Point) -> Option<Target> {
        let marker = self
            .field
            .iter()
            .rev()
            .find(|m| m.offset().distance(point) <= self.marker_radius(m) + MARKER_HIT_SLACK)
            .map(|m| Target::Marker(m.id()));

        marker.or_else(|| {
            (0..self.categories.len())
                .filter(|&i| self.label_box(i).contains(point))
                .map(|i| (i, self.label_anchor(i).distance(point)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| Target::Category(i))
        })
    }

    /// Draws a fresh field. The marker selection is dropped since its id now names a new point.
    pub fn regenerate(&mut self, source: &mut impl FieldSource) -> Interaction {
        self.field = source.generate(self.config.marker_count, self.config.field_radius);
        self.selection.marker = None;
        Interaction::new(true)
    }

    pub fn spoke_end(&self, index: usize) -> Point {
        polar_to_cartesian(
            ORIGIN,
            self.config.max_radius,
            self.categories.spoke_angle(index),
        )
    }

    pub fn label_anchor(&self, index: usize) -> Point {
        self.spoke_end(index).scale(self.config.label_offset)
    }

    /// Labels in the upper half get their icon below the text, the rest above it, so icons
    /// never leave the scene at the top or bottom spoke.
    pub fn icon_anchor(&self, index: usize) -> Point {
        let anchor = self.label_anchor(index);
        let shift = (LABEL_FONT_SIZE + LABEL_ICON_EXTENT) / 2.0;
        if anchor.y < 0.0 {
            Point::new(anchor.x, anchor.y + shift)
        } else {
            Point::new(anchor.x, anchor.y - shift)
        }
    }

    /// Click area of label `index`: its estimated text box plus the icon, if it has one.
    pub fn label_box(&self, index: usize) -> LabelBox {
        let anchor = self.label_anchor(index);
        let padding = self.config.label_hit_padding;
        let chars = self
            .categories
            .get(index)
            .map_or(0, |c| c.label.chars().count());
        let half_width = chars as f64 * LABEL_FONT_SIZE * LABEL_GLYPH_WIDTH / 2.0;
        let text = LabelBox {
            center: anchor,
            half_width: half_width + padding,
            half_height: LABEL_FONT_SIZE / 2.0 + padding,
        };

        let has_icon = self.categories.get(index).is_some_and(|c| c.icon.is_some());
        if !has_icon {
            return text;
        }
        let icon = self.icon_anchor(index);
        let top = (anchor.y - text.half_height).min(icon.y - LABEL_ICON_EXTENT / 2.0 - padding);
        let bottom = (anchor.y + text.half_height).max(icon.y + LABEL_ICON_EXTENT / 2.0 + padding);
        LabelBox {
            center: Point::new(anchor.x, (top + bottom) / 2.0),
            half_width: text.half_width.max(LABEL_ICON_EXTENT / 2.0 + padding),
            half_height: (bottom - top) / 2.0,
        }
    }

    fn in_beam(&self, marker: &Marker) -> bool {
        is_in_beam(
            marker.angle(),
            self.sweep.angle(),
            self.config.beam_half_width,
        )
    }

    fn outline(&self, marker: &Marker) -> Outline {
        if self.selection.is_marker_selected(marker.id()) {
            Outline::Selected
        } else if self.in_beam(marker) {
            Outline::InBeam
        } else {
            Outline::None
        }
    }

    fn marker_radius(&self, marker: &Marker) -> f64 {
        match self.outline(marker) {
            Outline::None => MARKER_RADIUS,
            Outline::InBeam | Outline::Selected => MARKER_ACTIVE_RADIUS,
        }
    }

    pub fn compose(&self) -> Frame {
        let mut primitives = Vec::new();

        primitives.extend(RING_FRACTIONS.iter().map(|f| Primitive::Ring {
            radius: self.config.max_radius * f,
        }));

        if let Some(index) = self.selection.category {
            let step = self.categories.angle_step();
            let center = index as f64 * step;
            let (start_angle, end_angle) = (center - step / 2.0, center + step / 2.0);
            primitives.push(Primitive::Sector {
                path: describe_sector(ORIGIN, self.config.max_radius, start_angle, end_angle),
            });
        }

        for (index, category) in self.categories.iter().enumerate() {
            primitives.push(Primitive::Spoke {
                index,
                end: self.spoke_end(index),
            });
            primitives.push(Primitive::Label {
                index,
                text: category.label.clone(),
                icon: category.icon.clone(),
                anchor: self.label_anchor(index),
                icon_anchor: self.icon_anchor(index),
                selected: self.selection.category == Some(index),
            });
        }

        primitives.extend(self.field.iter().map(|marker| {
            let outline = self.outline(marker);
            Primitive::Marker {
                id: marker.id(),
                center: marker.offset(),
                radius: self.marker_radius(marker),
                outline,
            }
        }));

        primitives.push(Primitive::Beam {
            path: describe_sector(ORIGIN, self.config.max_radius, 0.0, self.config.beam_span),
            rotation: self.sweep.angle(),
        });

        Frame { primitives }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::clock::ManualClock;
    use crate::field::FixedField;
    use crate::selection::Notification;
    use approx::assert_relative_eq;

    fn quiet() -> Vec<Notification> {
        Vec::new()
    }

    fn four_categories() -> Categories {
        Categories::new(["N", "E", "S", "W"].map(Category::new).to_vec()).unwrap()
    }

    fn radar(categories: Categories, positions: &[(f64, f64)]) -> Radar {
        Radar::new(
            categories,
            SceneConfig::default(),
            &mut FixedField(Field::from_polar(positions)),
        )
        .unwrap()
    }

    fn markers(frame: &Frame) -> Vec<(MarkerId, f64, Outline)> {
        frame
            .iter()
            .filter_map(|p| match p {
                Primitive::Marker {
                    id,
                    radius,
                    outline,
                    ..
                } => Some((*id, *radius, *outline)),
                _ => None,
            })
            .collect()
    }

    fn rank(primitive: &Primitive) -> usize {
        match primitive {
            Primitive::Ring { .. } => 0,
            Primitive::Sector { .. } => 1,
            Primitive::Spoke { .. } | Primitive::Label { .. } => 2,
            Primitive::Marker { .. } => 3,
            Primitive::Beam { .. } => 4,
        }
    }

    #[test]
    fn selected_sector_is_centered_on_spoke() {
        let mut radar = radar(four_categories(), &[]);
        radar.select_category(1, &mut quiet());

        let path = radar
            .compose()
            .iter()
            .find_map(|p| match p {
                Primitive::Sector { path } => Some(*path),
                _ => None,
            })
            .unwrap();

        assert_relative_eq!(path.start_angle, 45.0);
        assert_relative_eq!(path.end_angle, 135.0);
        assert!(!path.large_arc);
        let expected = polar_to_cartesian(ORIGIN, 160.0, 135.0);
        assert_relative_eq!(path.arc_start.x, expected.x, epsilon = 1e-9);
        assert_relative_eq!(path.arc_start.y, expected.y, epsilon = 1e-9);
    }

    #[test]
    fn no_sector_without_category_selection() {
        let radar = radar(four_categories(), &[]);
        assert!(
            !radar
                .compose()
                .iter()
                .any(|p| matches!(p, Primitive::Sector { .. }))
        );
    }

    #[test]
    fn layers_are_back_to_front() {
        let mut radar = radar(four_categories(), &[(50.0, 10.0), (80.0, 200.0)]);
        radar.select_category(2, &mut quiet());
        let frame = radar.compose();

        let ranks: Vec<usize> = frame.iter().map(rank).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{ranks:?}");
        assert_eq!(ranks.iter().filter(|&&r| r == 0).count(), 3);
        assert!(matches!(frame.primitives.last(), Some(Primitive::Beam { .. })));
    }

    #[test]
    fn rings_at_thirds_of_max_radius() {
        let frame = radar(four_categories(), &[]).compose();
        let radii: Vec<f64> = frame
            .iter()
            .filter_map(|p| match p {
                Primitive::Ring { radius } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii.len(), 3);
        assert_relative_eq!(radii[0], 160.0 / 3.0);
        assert_relative_eq!(radii[1], 320.0 / 3.0);
        assert_relative_eq!(radii[2], 160.0);
    }

    #[test]
    fn labels_sit_beyond_spoke_ends() {
        let radar = radar(four_categories(), &[]);
        let east = radar.label_anchor(1);
        assert_relative_eq!(east.x, 184.0, epsilon = 1e-9);
        assert_relative_eq!(east.y, 0.0, epsilon = 1e-9);

        let north = radar.spoke_end(0);
        assert_relative_eq!(north.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(north.y, -160.0, epsilon = 1e-9);
    }

    #[test]
    fn beam_rotates_with_sweep() {
        let mut radar = radar(four_categories(), &[]);
        let clock = ManualClock::new(1250.0);
        let animator = Animator::new(clock, MS_PER_DEGREE);
        assert!(radar.animate(&animator).is_continue());

        let beam = radar.compose().primitives.pop().unwrap();
        let Primitive::Beam { path, rotation } = beam else {
            panic!("beam must be drawn last");
        };
        assert_relative_eq!(rotation, 50.0);
        assert!(!path.large_arc);
        let expected = polar_to_cartesian(ORIGIN, 160.0, 45.0);
        assert_relative_eq!(path.arc_start.x, expected.x, epsilon = 1e-9);
    }

    #[test]
    fn markers_grow_in_beam_and_when_selected() {
        let mut radar = radar(four_categories(), &[(50.0, 30.0), (50.0, 200.0), (50.0, 300.0)]);
        let clock = ManualClock::new(29.0 * MS_PER_DEGREE);
        let _ = radar.animate(&Animator::new(clock, MS_PER_DEGREE));
        radar.select_marker(MarkerId::new(2), &mut quiet());

        assert_eq!(
            markers(&radar.compose()),
            vec![
                (MarkerId::new(0), MARKER_ACTIVE_RADIUS, Outline::InBeam),
                (MarkerId::new(1), MARKER_RADIUS, Outline::None),
                (MarkerId::new(2), MARKER_ACTIVE_RADIUS, Outline::Selected),
            ]
        );
    }

    #[test]
    fn highlight_changes_between_frames() {
        let mut radar = radar(four_categories(), &[(50.0, 30.0)]);
        let clock = ManualClock::new(30.0 * MS_PER_DEGREE);
        let animator = Animator::new(clock.clone(), MS_PER_DEGREE);

        let _ = radar.animate(&animator);
        assert_eq!(markers(&radar.compose())[0].2, Outline::InBeam);

        clock.advance(90.0 * MS_PER_DEGREE);
        let _ = radar.animate(&animator);
        assert_eq!(markers(&radar.compose())[0].2, Outline::None);
    }

    #[test]
    fn click_on_marker_selects_and_notifies() {
        let mut radar = radar(four_categories(), &[(100.0, 0.0)]);
        let mut sink: Vec<Notification> = Vec::new();

        let interaction = radar.click(Point::new(99.0, 1.5), &mut sink);

        assert!(interaction.should_redraw);
        assert_eq!(radar.selection().marker, Some(MarkerId::new(0)));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].to_string(), "Clicked: Dot 1\nX: 100.0\nY: 0.0");
    }

    #[test]
    fn click_on_label_selects_category() {
        let mut radar = radar(four_categories(), &[(100.0, 0.0)]);
        let mut sink: Vec<Notification> = Vec::new();

        radar.click(Point::new(0.0, 180.0), &mut sink);

        assert_eq!(radar.selection().category, Some(2));
        assert_eq!(radar.selection().marker, None);
        assert_eq!(
            sink,
            vec![Notification::Category {
                label: CategoryLabel::new("S")
            }]
        );
    }

    #[test]
    fn click_near_end_of_long_label_selects_it() {
        let mut radar = radar(Categories::default(), &[]);
        let mut sink: Vec<Notification> = Vec::new();

        let interaction = radar.click(Point::new(35.0, -184.0), &mut sink);

        assert!(interaction.should_redraw);
        assert_eq!(radar.selection().category, Some(0));
        assert_eq!(sink[0].to_string(), "Clicked label: Phishing Simulations");
    }

    #[test]
    fn click_past_label_text_misses() {
        let radar = radar(Categories::default(), &[]);
        assert_eq!(radar.hit_test(Point::new(-35.0, -184.0)), Some(Target::Category(0)));
        assert_eq!(radar.hit_test(Point::new(80.0, -184.0)), None);
        assert_eq!(radar.hit_test(Point::new(0.0, -200.0)), None);
    }

    #[test]
    fn label_box_grows_with_text() {
        let categories =
            Categories::new(vec![Category::new("S"), Category::new("Southern Cross")]).unwrap();
        let radar = radar(categories, &[]);
        assert!(radar.label_box(1).half_width > radar.label_box(0).half_width);
        assert_relative_eq!(radar.label_box(0).center.y, radar.label_anchor(0).y);
    }

    #[test]
    fn icons_sit_on_the_inward_side() {
        let categories = Categories::new(vec![
            Category::new("N").with_icon("n"),
            Category::new("S").with_icon("s"),
        ])
        .unwrap();
        let radar = radar(categories, &[]);

        let (top, top_icon) = (radar.label_anchor(0), radar.icon_anchor(0));
        assert!(top_icon.y > top.y);
        assert!(top_icon.y - LABEL_ICON_EXTENT / 2.0 > -radar.config().extent);

        let (bottom, bottom_icon) = (radar.label_anchor(1), radar.icon_anchor(1));
        assert!(bottom_icon.y < bottom.y);

        // the icon is clickable too
        assert_eq!(radar.hit_test(top_icon), Some(Target::Category(0)));
    }

    #[test]
    fn click_on_empty_space_does_nothing() {
        let mut radar = radar(four_categories(), &[(100.0, 0.0)]);
        let mut sink: Vec<Notification> = Vec::new();
        let interaction = radar.click(Point::new(-30.0, -30.0), &mut sink);
        assert!(!interaction.should_redraw);
        assert!(sink.is_empty());
        assert_eq!(radar.selection(), Selection::default());
    }

    #[test]
    fn unknown_marker_is_a_no_op() {
        let mut radar = radar(four_categories(), &[(100.0, 0.0)]);
        let mut sink: Vec<Notification> = Vec::new();
        let interaction = radar.select_marker(MarkerId::new(7), &mut sink);
        assert!(!interaction.should_redraw);
        assert!(sink.is_empty());
    }

    #[test]
    fn selection_is_visible_in_next_frame() {
        let mut radar = radar(four_categories(), &[(100.0, 200.0)]);
        assert_eq!(markers(&radar.compose())[0].2, Outline::None);
        radar.select_marker(MarkerId::new(0), &mut quiet());
        assert_eq!(markers(&radar.compose())[0].2, Outline::Selected);
    }

    #[test]
    fn regenerate_drops_marker_selection_only() {
        let mut radar = radar(four_categories(), &[(100.0, 0.0)]);
        radar.select_marker(MarkerId::new(0), &mut quiet());
        radar.select_category(3, &mut quiet());

        radar.regenerate(&mut FixedField(Field::from_polar(&[(10.0, 10.0), (20.0, 20.0)])));

        assert_eq!(radar.field().len(), 2);
        assert_eq!(radar.selection().marker, None);
        assert_eq!(radar.selection().category, Some(3));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SceneConfig {
            max_radius: 0.0,
            ..SceneConfig::default()
        };
        let result = Radar::new(
            four_categories(),
            config,
            &mut FixedField(Field::default()),
        );
        assert!(matches!(
            result,
            Err(SceneError::InvalidParameter {
                name: "max_radius",
                ..
            })
        ));
    }

    #[test]
    fn field_larger_than_outer_ring_is_rejected() {
        let config = SceneConfig {
            field_radius: 170.0,
            ..SceneConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SceneError::InvalidParameter {
                name: "field_radius",
                value: 170.0
            })
        );

        let edge = SceneConfig {
            field_radius: 160.0,
            ..SceneConfig::default()
        };
        assert!(edge.validate().is_ok());
    }
}
