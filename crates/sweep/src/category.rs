use crate::error::SceneError;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategoryLabel(String);

/// Freedesktop icon name or absolute path; resolution is up to the host.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::string_newtype!(CategoryLabel, IconName);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: CategoryLabel,
    #[serde(default)]
    pub icon: Option<IconName>,
}

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: CategoryLabel::new(label),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(IconName::new(icon));
        self
    }
}

pub const DEFAULT_LABELS: [&str; 9] = [
    "Phishing Simulations",
    "Cloud Posture",
    "External Footprint",
    "Dark Web",
    "Cloud Data",
    "Email Protection",
    "Endpoint Security",
    "Secure Browsing",
    "Security Awareness",
];

/// Ordered, non-empty set of spokes. Category `i` sits at `i * 360 / N` degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Categories(Vec<Category>);

impl Categories {
    pub fn new(categories: Vec<Category>) -> Result<Self, SceneError> {
        if categories.is_empty() {
            return Err(SceneError::NoCategories);
        }
        Ok(Self(categories))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }

    pub fn angle_step(&self) -> f64 {
        360.0 / self.0.len() as f64
    }

    pub fn spoke_angle(&self, index: usize) -> f64 {
        index as f64 * self.angle_step()
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self(DEFAULT_LABELS.iter().map(|l| Category::new(*l)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(Categories::new(Vec::new()), Err(SceneError::NoCategories));
    }

    #[test]
    fn spokes_are_evenly_spaced() {
        let categories =
            Categories::new(["a", "b", "c", "d"].map(Category::new).to_vec()).unwrap();
        assert_eq!(categories.angle_step(), 90.0);
        assert_eq!(categories.spoke_angle(0), 0.0);
        assert_eq!(categories.spoke_angle(3), 270.0);
    }

    #[test]
    fn default_set_has_nine_dimensions() {
        let categories = Categories::default();
        assert_eq!(categories.len(), 9);
        assert_eq!(categories.angle_step(), 40.0);
        assert_eq!(
            categories.get(1).map(|c| c.label.as_str()),
            Some("Cloud Posture")
        );
    }
}
