//! Core types for uplift.

mod batch;
mod disposition;
mod item;

pub use batch::Batch;
pub use disposition::Disposition;
pub use item::Item;
