//! Traits at the seams between the upgrade stages and the surrounding pipeline.

mod entry;

pub use entry::{Entry, RenderError};
