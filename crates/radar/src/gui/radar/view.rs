use super::{LINE_WIDTH, OUTLINE_WIDTH, compass_to_cairo};
use crate::gui::icon::CategoryIcons;
use crate::gui::theme::ThemeColors;
use cairo::{Context, LinearGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;
use sweep::scene::{LABEL_FONT_SIZE, LABEL_ICON_EXTENT};
use sweep::{Frame, Outline, Point, Primitive, SectorPath, Viewport};

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn sector_path(cr: &Context, path: &SectorPath) {
    cr.move_to(path.center.x, path.center.y);
    cr.line_to(path.arc_start.x, path.arc_start.y);
    cr.arc_negative(
        path.center.x,
        path.center.y,
        path.radius,
        compass_to_cairo(path.end_angle),
        compass_to_cairo(path.start_angle),
    );
    cr.close_path();
}

struct FrameRenderer<'a> {
    cr: &'a Context,
    colors: &'a ThemeColors,
    icons: &'a CategoryIcons,
}

impl FrameRenderer<'_> {
    fn draw(&self, primitive: &Primitive) -> Result<(), cairo::Error> {
        match primitive {
            Primitive::Ring { radius } => self.draw_ring(*radius),
            Primitive::Sector { path } => self.draw_sector(path),
            Primitive::Spoke { end, .. } => self.draw_spoke(*end),
            Primitive::Label {
                index,
                text,
                anchor,
                icon_anchor,
                selected,
                ..
            } => self.draw_label(*index, text, *anchor, *icon_anchor, *selected),
            Primitive::Marker {
                center,
                radius,
                outline,
                ..
            } => self.draw_marker(*center, *radius, *outline),
            Primitive::Beam { path, rotation } => self.draw_beam(path, *rotation),
        }
    }

    fn draw_ring(&self, radius: f64) -> Result<(), cairo::Error> {
        self.cr.new_path();
        self.cr.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
        set_color(self.cr, self.colors.ring);
        self.cr.set_line_width(LINE_WIDTH);
        self.cr.stroke()
    }

    fn draw_sector(&self, path: &SectorPath) -> Result<(), cairo::Error> {
        sector_path(self.cr, path);
        set_color(self.cr, self.colors.sector);
        self.cr.fill()
    }

    fn draw_spoke(&self, end: Point) -> Result<(), cairo::Error> {
        self.cr.move_to(0.0, 0.0);
        self.cr.line_to(end.x, end.y);
        set_color(self.cr, self.colors.spoke);
        self.cr.set_line_width(LINE_WIDTH);
        self.cr.stroke()
    }

    fn draw_label(
        &self,
        index: usize,
        text: &str,
        anchor: Point,
        icon_anchor: Point,
        selected: bool,
    ) -> Result<(), cairo::Error> {
        let color = if selected {
            self.colors.selected
        } else {
            self.colors.label
        };

        if let Some(pixbuf) = self.icons.get(index) {
            self.draw_icon(pixbuf, icon_anchor)?;
        }

        set_color(self.cr, color);
        self.cr
            .select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        self.cr.set_font_size(LABEL_FONT_SIZE);
        let ext = self.cr.text_extents(text)?;
        // centered on the anchor both ways
        self.cr.move_to(
            anchor.x - ext.width() / 2.0 - ext.x_bearing(),
            anchor.y - ext.height() / 2.0 - ext.y_bearing(),
        );
        self.cr.show_text(text)
    }

    fn draw_icon(&self, pixbuf: &Pixbuf, center: Point) -> Result<(), cairo::Error> {
        let scale = LABEL_ICON_EXTENT / pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let (w, h) = (
            pixbuf.width() as f64 * scale,
            pixbuf.height() as f64 * scale,
        );

        self.cr.save()?;
        self.cr.translate(center.x - w / 2.0, center.y - h / 2.0);
        self.cr.scale(scale, scale);
        self.cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        self.cr.paint()?;
        self.cr.restore()
    }

    fn draw_marker(&self, center: Point, radius: f64, outline: Outline) -> Result<(), cairo::Error> {
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        set_color(self.cr, self.colors.marker);

        let stroke = match outline {
            Outline::None => None,
            Outline::InBeam => Some(self.colors.in_beam),
            Outline::Selected => Some(self.colors.selected),
        };
        match stroke {
            Some(color) => {
                self.cr.fill_preserve()?;
                set_color(self.cr, color);
                self.cr.set_line_width(OUTLINE_WIDTH);
                self.cr.stroke()
            }
            None => self.cr.fill(),
        }
    }

    fn draw_beam(&self, path: &SectorPath, rotation: f64) -> Result<(), cairo::Error> {
        self.cr.save()?;
        self.cr.rotate(rotation.to_radians());
        sector_path(self.cr, path);

        // horizontal gradient across the wedge's own bounding box
        let xs = [path.center.x, path.arc_start.x, path.arc_end.x];
        let x0 = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let x1 = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let gradient = LinearGradient::new(x0, 0.0, x1, 0.0);
        let (r, g, b, a) = self.colors.beam.into_components();
        gradient.add_color_stop_rgba(0.0, r, g, b, 0.0);
        gradient.add_color_stop_rgba(1.0, r, g, b, a);
        self.cr.set_source(&gradient)?;
        self.cr.fill()?;
        self.cr.restore()
    }
}

/// Paints one frame, mapping scene space onto the widget through `viewport`.
pub fn draw(
    cr: &Context,
    frame: &Frame,
    viewport: &Viewport,
    colors: &ThemeColors,
    icons: &CategoryIcons,
) -> Result<(), cairo::Error> {
    let origin = viewport.origin();
    let scale = viewport.scale();
    if scale <= 0.0 {
        return Ok(());
    }

    cr.save()?;
    cr.translate(origin.x, origin.y);
    cr.scale(scale, scale);

    let renderer = FrameRenderer { cr, colors, icons };
    for primitive in frame.iter() {
        renderer.draw(primitive)?;
    }
    cr.restore()
}
