// Output generation module

pub mod render;
pub mod templates;
pub mod walker;

pub use render::*;
pub use templates::*;
pub use walker::*;
