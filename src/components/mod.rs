//! UI components.

pub mod dot_field;
