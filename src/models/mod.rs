//! Data models for the blog server.

mod post;
mod recipe;
mod settings;

pub use post::*;
pub use recipe::*;
pub use settings::*;
