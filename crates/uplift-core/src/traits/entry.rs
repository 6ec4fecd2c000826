//! Entry trait: the view of a pipeline item the upgrade stages need.

use crate::quality::Quality;
use crate::types::Disposition;
use thiserror::Error;

/// Failure to render an identifier template against an entry.
///
/// Not fatal: an entry whose identifier cannot be rendered is left out of
/// grouping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The template references a field the entry does not have.
    #[error("field `{0}` is not set on this entry")]
    MissingField(String),
}

/// An item flowing through the pipeline.
///
/// The upgrade stages never create or drop entries; they read title, quality
/// and identifier, and change the disposition through
/// [`accept`](Entry::accept), [`reject`](Entry::reject) and
/// [`fail`](Entry::fail).
pub trait Entry {
    /// Human-readable title.
    fn title(&self) -> &str;

    /// Quality of the item.
    fn quality(&self) -> Quality;

    /// Native identifier supplied by the source, if any.
    fn native_id(&self) -> Option<&str>;

    /// Render an identifier template against this entry.
    fn render(&self, template: &str) -> Result<String, RenderError>;

    /// Current disposition.
    fn disposition(&self) -> Disposition;

    /// Mark the entry accepted.
    fn accept(&mut self, reason: &str);

    /// Mark the entry rejected.
    fn reject(&mut self, reason: &str);

    /// Mark the entry failed.
    fn fail(&mut self, reason: &str);

    /// Whether the entry ended up accepted.
    fn is_accepted(&self) -> bool {
        self.disposition() == Disposition::Accepted
    }
}
