pub mod app;
pub mod icon;
pub mod radar;
pub mod theme;
