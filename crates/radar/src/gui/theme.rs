use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba, WithAlpha};

pub struct ThemeColors {
    pub ring: Srgba<f64>,
    pub spoke: Srgba<f64>,
    pub label: Srgba<f64>,
    pub selected: Srgba<f64>,
    pub in_beam: Srgba<f64>,
    pub marker: Srgba<f64>,
    pub sector: Srgba<f64>,
    /// Beam gradient runs from transparent to this.
    pub beam: Srgba<f64>,
}

fn hex(r: u8, g: u8, b: u8, alpha: f64) -> Srgba<f64> {
    Srgb::new(r, g, b).into_format::<f64>().with_alpha(alpha)
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            ring: hex(0xD2, 0xD6, 0xD9, 0.6),
            spoke: hex(0xD2, 0xD6, 0xD9, 1.0),
            label: hex(0x8C, 0x8F, 0x94, 1.0),
            selected: hex(0x5F, 0x4E, 0xFF, 1.0),
            in_beam: hex(0xAA, 0xA3, 0xF7, 1.0),
            marker: hex(0x5F, 0x4E, 0xFF, 0.85),
            sector: hex(0x5F, 0x4E, 0xFF, 0.15),
            beam: hex(0x5F, 0x4E, 0xFF, 0.5),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            label: Self::lookup_color(context, "theme_unfocused_fg_color", fallback.label, None),
            selected: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.selected,
                Some(1.0),
            ),
            sector: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.sector,
                Some(0.15),
            ),
            ..fallback
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.radar-drawing-area {
    background-color: white;
}
.radar-status {
    background-color: alpha(black, 0.7);
    color: white;
    padding: 6px 12px;
    border-radius: 6px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
