//! Grouping of batch entries by case-folded identifier.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{UpliftError, UpliftResult};
use crate::traits::Entry;

/// How an entry's identifier is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifiedBy {
    /// Use the entry's native id.
    Auto,
    /// Render a `{{ field }}` template against the entry.
    Template(String),
}

impl IdentifiedBy {
    /// Parse the `identified_by` option: `"auto"` or a template.
    pub fn parse(value: &str) -> UpliftResult<Self> {
        match value {
            "auto" => Ok(Self::Auto),
            "" => Err(UpliftError::configuration_with_suggestion(
                "identified_by must not be empty",
                "Use `auto` or a template such as `{{series_name}} {{series_id}}`",
            )),
            template => Ok(Self::Template(template.to_string())),
        }
    }

    /// Resolve the case-folded identifier of an entry, if it has one.
    pub fn resolve<E: Entry + ?Sized>(&self, entry: &E) -> Option<String> {
        let identifier = match self {
            Self::Auto => entry.native_id().map(str::to_string),
            Self::Template(template) => match entry.render(template) {
                Ok(rendered) => Some(rendered),
                Err(e) => {
                    debug!(title = entry.title(), error = %e, "Could not render identifier");
                    None
                }
            },
        };
        identifier.filter(|id| !id.is_empty()).map(|id| id.to_lowercase())
    }
}

/// Entries of a batch partitioned by identifier.
///
/// Each group holds batch positions in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    groups: BTreeMap<String, Vec<usize>>,
    dropped: usize,
}

impl Groups {
    pub fn get(&self, identifier: &str) -> Option<&[usize]> {
        self.groups.get(identifier).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups.iter().map(|(id, positions)| (id.as_str(), positions.as_slice()))
    }

    pub fn identifiers(&self) -> BTreeSet<String> {
        self.groups.keys().cloned().collect()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of entries left out because they had no identifier.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Group `(position, entry)` pairs by identifier.
pub fn group_entries<'a, E, I>(entries: I, identified_by: &IdentifiedBy) -> Groups
where
    E: Entry + 'a,
    I: IntoIterator<Item = (usize, &'a E)>,
{
    let mut groups = Groups::default();
    for (position, entry) in entries {
        match identified_by.resolve(entry) {
            Some(identifier) => groups.groups.entry(identifier).or_default().push(position),
            None => {
                debug!(title = entry.title(), "No identifier found, skipping entry");
                groups.dropped += 1;
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Item;

    fn batch() -> Vec<Item> {
        vec![
            Item::new("Show.S01E01.720p").with_id("Show.S01E01").with_field("series", "Show"),
            Item::new("Other.S02E03.1080p").with_id("other.s02e03"),
            Item::new("Show.S01E01.1080p").with_id("show.s01e01").with_field("series", "SHOW"),
            Item::new("No.Id.480p"),
            Item::new("Show.S01E01.480p").with_id("").with_field("series", "show"),
        ]
    }

    #[test]
    fn test_auto_groups_case_insensitively() {
        let entries = batch();
        let groups = group_entries(entries.iter().enumerate(), &IdentifiedBy::Auto);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("show.s01e01"), Some(&[0, 2][..]));
        assert_eq!(groups.get("other.s02e03"), Some(&[1][..]));
        assert_eq!(groups.dropped(), 2);
    }

    #[test]
    fn test_template_groups() {
        let entries = batch();
        let by_series = IdentifiedBy::parse("{{series}}").unwrap();
        let groups = group_entries(entries.iter().enumerate(), &by_series);

        assert_eq!(groups.identifiers().into_iter().collect::<Vec<_>>(), vec!["show"]);
        assert_eq!(groups.get("show"), Some(&[0, 2, 4][..]));
        assert_eq!(groups.dropped(), 2);
    }

    #[test]
    fn test_empty_render_is_dropped() {
        let entries = vec![Item::new("x 720p").with_field("series", "")];
        let groups = group_entries(
            entries.iter().enumerate(),
            &IdentifiedBy::Template("{{series}}".to_string()),
        );
        assert!(groups.is_empty());
        assert_eq!(groups.dropped(), 1);
    }

    #[test]
    fn test_parse() {
        assert_eq!(IdentifiedBy::parse("auto").unwrap(), IdentifiedBy::Auto);
        assert!(IdentifiedBy::parse("").is_err());
    }
}
