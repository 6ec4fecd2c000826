//! Batch of entries handed over by the pipeline for one run.

use crate::traits::Entry;

/// An ordered batch of entries.
///
/// The filter phase sees every entry; the learn phase only sees the
/// [`accepted`](Batch::accepted) subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch<E> {
    entries: Vec<E>,
}

impl<E: Entry> Batch<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [E] {
        &mut self.entries
    }

    /// Entries whose disposition is accepted, with their batch positions.
    pub fn accepted(&self) -> impl Iterator<Item = (usize, &E)> {
        self.entries.iter().enumerate().filter(|(_, e)| e.is_accepted())
    }

    pub fn into_entries(self) -> Vec<E> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Entry> From<Vec<E>> for Batch<E> {
    fn from(entries: Vec<E>) -> Self {
        Self::new(entries)
    }
}

impl<E: Entry> FromIterator<E> for Batch<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Item;

    #[test]
    fn test_accepted_subset_keeps_positions() {
        let mut batch: Batch<Item> = vec![
            Item::new("a 720p"),
            Item::new("b 1080p"),
            Item::new("c 480p"),
        ]
        .into();
        batch.entries_mut()[1].accept("picked");
        batch.entries_mut()[2].reject("dropped");

        let accepted: Vec<usize> = batch.accepted().map(|(i, _)| i).collect();
        assert_eq!(accepted, vec![1]);
        assert_eq!(batch.len(), 3);
    }
}
