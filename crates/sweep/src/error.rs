use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("At least one category is required")]
    NoCategories,
    #[error("Invalid scene parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
