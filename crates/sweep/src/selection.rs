use crate::category::{Categories, CategoryLabel};
use crate::field::{Field, MarkerId, MarkerLabel};
use crate::geometry::Point;
use std::fmt;

/// User-facing message produced by a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Marker { label: MarkerLabel, offset: Point },
    Category { label: CategoryLabel },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker { label, offset } => {
                write!(f, "Clicked: {}\nX: {:.1}\nY: {:.1}", label, offset.x, offset.y)
            }
            Self::Category { label } => write!(f, "Clicked label: {}", label),
        }
    }
}

pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

/// Selected marker and selected category. The two slots are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub marker: Option<MarkerId>,
    pub category: Option<usize>,
}

impl Selection {
    /// Selects `id` if it exists in `field`. Re-selecting never toggles off.
    pub fn select_marker(&mut self, field: &Field, id: MarkerId) -> Option<Notification> {
        let Some(marker) = field.get(id) else {
            log::debug!("Ignoring selection of unknown marker {}", id);
            return None;
        };
        self.marker = Some(id);
        Some(Notification::Marker {
            label: marker.label().clone(),
            offset: marker.offset(),
        })
    }

    pub fn select_category(
        &mut self,
        categories: &Categories,
        index: usize,
    ) -> Option<Notification> {
        let Some(category) = categories.get(index) else {
            log::debug!("Ignoring selection of unknown category {}", index);
            return None;
        };
        self.category = Some(index);
        Some(Notification::Category {
            label: category.label.clone(),
        })
    }

    pub fn is_marker_selected(&self, id: MarkerId) -> bool {
        self.marker == Some(id)
    }
}
