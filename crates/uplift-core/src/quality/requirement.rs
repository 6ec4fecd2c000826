//! Quality requirements parsed from target specifications.

use super::component::{Component, ComponentKind};
use super::Quality;
use crate::error::{ErrorCode, UpliftError, UpliftResult};
use std::str::FromStr;

/// One constraint on a single component kind.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Exactly(Component),
    AtLeast(Component),
    Above(Component),
    AtMost(Component),
    Below(Component),
    Between(Component, Component),
    AnyOf(Vec<Component>),
    Not(Component),
}

impl Clause {
    fn kind(&self) -> ComponentKind {
        match self {
            Self::Exactly(c)
            | Self::AtLeast(c)
            | Self::Above(c)
            | Self::AtMost(c)
            | Self::Below(c)
            | Self::Between(c, _)
            | Self::Not(c) => c.kind(),
            Self::AnyOf(list) => list[0].kind(),
        }
    }

    fn allows(&self, actual: Component) -> bool {
        let value = actual.value();
        match self {
            Self::Exactly(c) => value == c.value(),
            Self::AtLeast(c) => value >= c.value(),
            Self::Above(c) => value > c.value(),
            Self::AtMost(c) => value <= c.value(),
            Self::Below(c) => value < c.value(),
            Self::Between(min, max) => (min.value()..=max.value()).contains(&value),
            Self::AnyOf(list) => list.iter().any(|c| c.value() == value),
            Self::Not(c) => value != c.value(),
        }
    }
}

/// A predicate over [`Quality`] values.
///
/// Built from whitespace separated clauses, each constraining one component
/// kind; a quality is allowed when every clause holds.
///
/// | clause       | meaning                         |
/// |--------------|---------------------------------|
/// | `720p`       | exactly 720p                    |
/// | `720p+`      | 720p or better (also `>=720p`)  |
/// | `>720p`      | better than 720p                |
/// | `<=1080p`    | 1080p or worse (also `<1080p`)  |
/// | `hdtv-bluray`| inclusive range                 |
/// | `h264\|h265` | any of                          |
/// | `!cam`       | anything but cam                |
/// | `any`        | no constraint                   |
#[derive(Debug, Clone)]
pub struct Requirement {
    spec: String,
    clauses: Vec<Clause>,
    nominal: Quality,
}

impl Requirement {
    /// Parse a requirement specification.
    pub fn parse(spec: &str) -> UpliftResult<Self> {
        let tokens: Vec<&str> = spec.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(UpliftError::invalid_spec(
                spec,
                "specification is empty",
                ErrorCode::SpecEmpty,
            ));
        }

        let mut clauses = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(clause) = parse_clause(spec, &token.to_lowercase())? {
                clauses.push(clause);
            }
        }

        Ok(Self {
            spec: spec.trim().to_string(),
            clauses,
            nominal: Quality::parse(spec),
        })
    }

    /// Whether `quality` satisfies every clause.
    pub fn allows(&self, quality: &Quality) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.allows(quality.component(clause.kind())))
    }

    /// The quality named by the requirement text itself.
    ///
    /// `">=1080p webrip"` names `1080p webrip`. Used to tell whether a stored
    /// quality is already beyond the target.
    pub fn nominal_quality(&self) -> Quality {
        self.nominal
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }
}

impl FromStr for Requirement {
    type Err = UpliftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.spec)
    }
}

fn parse_clause(spec: &str, token: &str) -> UpliftResult<Option<Clause>> {
    if token == "any" {
        return Ok(None);
    }

    let clause = if let Some(rest) = token.strip_prefix('!') {
        Clause::Not(lookup(spec, rest)?)
    } else if let Some(rest) = token.strip_prefix(">=") {
        Clause::AtLeast(lookup(spec, rest)?)
    } else if let Some(rest) = token.strip_prefix('>') {
        Clause::Above(lookup(spec, rest)?)
    } else if let Some(rest) = token.strip_prefix("<=") {
        Clause::AtMost(lookup(spec, rest)?)
    } else if let Some(rest) = token.strip_prefix('<') {
        Clause::Below(lookup(spec, rest)?)
    } else if let Some(rest) = token.strip_suffix('+') {
        Clause::AtLeast(lookup(spec, rest)?)
    } else if token.contains('|') {
        let options = token
            .split('|')
            .map(|part| lookup(spec, part))
            .collect::<UpliftResult<Vec<_>>>()?;
        ensure_same_kind(spec, token, &options)?;
        Clause::AnyOf(options)
    } else if let Some(component) = Component::lookup(token) {
        Clause::Exactly(component)
    } else if let Some((min, max)) = split_range(token) {
        ensure_same_kind(spec, token, &[min, max])?;
        if min.value() > max.value() {
            return Err(UpliftError::invalid_spec(
                spec,
                format!("range `{token}` has its bounds reversed"),
                ErrorCode::SpecReversedRange,
            ));
        }
        Clause::Between(min, max)
    } else {
        return Err(unknown_token(spec, token));
    };

    Ok(Some(clause))
}

/// Split `a-b` into two components, trying every dash so that names which
/// contain one (`web-dl`) still work as range bounds.
fn split_range(token: &str) -> Option<(Component, Component)> {
    token.match_indices('-').find_map(|(idx, _)| {
        let min = Component::lookup(&token[..idx])?;
        let max = Component::lookup(&token[idx + 1..])?;
        Some((min, max))
    })
}

fn lookup(spec: &str, token: &str) -> UpliftResult<Component> {
    Component::lookup(token).ok_or_else(|| unknown_token(spec, token))
}

fn unknown_token(spec: &str, token: &str) -> UpliftError {
    UpliftError::invalid_spec(
        spec,
        format!("`{token}` is not a known quality"),
        ErrorCode::SpecUnknownToken,
    )
}

fn ensure_same_kind(spec: &str, token: &str, components: &[Component]) -> UpliftResult<()> {
    let kind = components[0].kind();
    if components.iter().any(|c| c.kind() != kind) {
        return Err(UpliftError::invalid_spec(
            spec,
            format!("`{token}` mixes different kinds of quality"),
            ErrorCode::SpecMixedComponents,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str) -> Quality {
        Quality::parse(text)
    }

    #[test]
    fn test_at_least() {
        let req = Requirement::parse(">=1080p").unwrap();
        assert!(req.allows(&q("1080p")));
        assert!(req.allows(&q("2160p hdtv")));
        assert!(!req.allows(&q("720p bluray")));
        assert!(!req.allows(&Quality::unknown()));

        let plus = Requirement::parse("720p+").unwrap();
        assert!(plus.allows(&q("720p")));
        assert!(!plus.allows(&q("480p")));
    }

    #[test]
    fn test_exact_and_strict_bounds() {
        let exact = Requirement::parse("720p").unwrap();
        assert!(exact.allows(&q("720p hdtv")));
        assert!(!exact.allows(&q("1080p")));

        let above = Requirement::parse(">720p").unwrap();
        assert!(!above.allows(&q("720p")));
        assert!(above.allows(&q("1080i")));

        let below = Requirement::parse("<1080p").unwrap();
        assert!(below.allows(&q("720p")));
        assert!(!below.allows(&q("1080p")));
    }

    #[test]
    fn test_range_with_dashed_names() {
        let req = Requirement::parse("webrip-web-dl").unwrap();
        assert!(req.allows(&q("720p webrip")));
        assert!(req.allows(&q("720p web-dl")));
        assert!(!req.allows(&q("720p hdtv")));

        let resolution = Requirement::parse("720p-1080p").unwrap();
        assert!(resolution.allows(&q("1080i")));
        assert!(!resolution.allows(&q("2160p")));
    }

    #[test]
    fn test_any_of_and_not() {
        let req = Requirement::parse("h264|h265 !cam").unwrap();
        assert!(req.allows(&q("720p hdtv x264")));
        assert!(!req.allows(&q("720p cam x264")));
        assert!(!req.allows(&q("720p hdtv xvid")));
    }

    #[test]
    fn test_clauses_combine() {
        let req = Requirement::parse("720p+ webrip+").unwrap();
        assert!(req.allows(&q("1080p web-dl")));
        assert!(!req.allows(&q("1080p hdtv")));
        assert!(!req.allows(&q("480p bluray")));
    }

    #[test]
    fn test_any_allows_everything() {
        let req = Requirement::parse("any").unwrap();
        assert!(req.allows(&Quality::unknown()));
        assert!(req.allows(&q("2160p remux")));
    }

    #[test]
    fn test_nominal_quality() {
        assert_eq!(Requirement::parse(">=1080p").unwrap().nominal_quality(), q("1080p"));
        assert_eq!(
            Requirement::parse("720p+ webrip").unwrap().nominal_quality(),
            q("720p webrip")
        );
    }

    #[test]
    fn test_malformed_specs() {
        let cases = [
            ("", ErrorCode::SpecEmpty),
            ("   ", ErrorCode::SpecEmpty),
            (">=potato", ErrorCode::SpecUnknownToken),
            ("720p|hdtv", ErrorCode::SpecMixedComponents),
            ("1080p-720p", ErrorCode::SpecReversedRange),
            ("720p-hdtv", ErrorCode::SpecMixedComponents),
        ];
        for (spec, code) in cases {
            let err = Requirement::parse(spec).unwrap_err();
            assert_eq!(err.code(), code, "spec {spec:?}");
        }
    }

    #[test]
    fn test_from_str_and_display() {
        let req: Requirement = " >=1080p ".parse().unwrap();
        assert_eq!(req.to_string(), ">=1080p");
        assert_eq!(req.spec(), ">=1080p");
    }
}
