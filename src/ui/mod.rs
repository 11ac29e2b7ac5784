//! Presentation helpers: themes, code highlighting and line rendering.

pub mod renderer;
pub mod syntax;
pub mod theme;
