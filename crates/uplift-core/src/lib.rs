//! uplift-core - Core library for uplift.
//!
//! A quality-upgrade decision engine. Batches of candidate items are grouped
//! by identifier; the filter phase accepts items that beat the best quality
//! recorded for their identifier and acts on lower ones, and the learn phase
//! records the best accepted quality so later runs stay consistent.
//!
//! # Example
//!
//! ```ignore
//! use uplift_core::{Batch, Item, MemoryUpgradeStore, UpgradeConfig, UpgradeEngine};
//!
//! let config = UpgradeConfig::default().prepare()?.expect("enabled");
//! let engine = UpgradeEngine::new(MemoryUpgradeStore::new(), config);
//!
//! let mut batch: Batch<Item> = vec![
//!     Item::new("Show.S01E01.720p.HDTV").with_id("show.s01e01"),
//!     Item::new("Show.S01E01.1080p.WEB-DL").with_id("show.s01e01"),
//! ]
//! .into();
//!
//! engine.filter(&mut batch)?;
//! engine.learn(&batch)?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod quality;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{OnLower, PreparedConfig, UpgradeConfig, UpgradeOptions};
pub use engine::{FilterReport, LearnReport, LowerAction, UpgradeEngine};
pub use error::{ErrorCode, UpliftError, UpliftResult};
pub use grouping::{group_entries, Groups, IdentifiedBy};
pub use quality::{Component, ComponentKind, Quality, Requirement};
pub use store::{
    MemoryUpgradeStore, SqliteUpgradeStore, UpgradeRecord, UpgradeRepository, UpgradeStore,
    UpsertOutcome,
};
pub use traits::{Entry, RenderError};
pub use types::{Batch, Disposition, Item};
