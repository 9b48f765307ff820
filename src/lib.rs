pub mod catalog;
pub mod config;
pub mod error;
pub mod galaxy;
pub mod interaction;
pub mod render;
