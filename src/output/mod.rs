//! Terminal output helpers

pub mod terminal;

pub use terminal::{color_supported, colors, Painter, RESET};
