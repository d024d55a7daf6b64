//! A terminal client browser built on the `gridview` grid.

pub mod app;
pub mod config;
pub mod input;
pub mod paths;
pub mod settings;
pub mod store;
pub mod terminal;
