//! Reusable text widgets.

pub mod slider;
