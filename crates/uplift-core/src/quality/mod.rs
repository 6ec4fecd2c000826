//! Media quality model.
//!
//! A [`Quality`] is a totally ordered value built from four components
//! (resolution, source, codec, audio) compared in that order. A
//! [`Requirement`] is a predicate over qualities parsed from a target
//! specification such as `">=1080p webrip+"`.

mod component;
mod requirement;

pub use component::{Component, ComponentKind};
pub use requirement::Requirement;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

/// Quality of a media item.
///
/// Serializes as its display text (`"1080p bluray h264 dts"`), which parses
/// back to an equal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Quality {
    resolution: Component,
    source: Component,
    codec: Component,
    audio: Component,
}

impl Quality {
    /// A quality with every component unknown. Ranks below any other quality.
    pub const fn unknown() -> Self {
        Self {
            resolution: Component::unknown(ComponentKind::Resolution),
            source: Component::unknown(ComponentKind::Source),
            codec: Component::unknown(ComponentKind::Codec),
            audio: Component::unknown(ComponentKind::Audio),
        }
    }

    /// Parse a quality out of free-form text such as a release title.
    ///
    /// Never fails: components that cannot be found are unknown.
    pub fn parse(text: &str) -> Self {
        Self {
            resolution: Component::find_best(ComponentKind::Resolution, text),
            source: Component::find_best(ComponentKind::Source, text),
            codec: Component::find_best(ComponentKind::Codec, text),
            audio: Component::find_best(ComponentKind::Audio, text),
        }
    }

    pub fn resolution(&self) -> Component {
        self.resolution
    }

    pub fn source(&self) -> Component {
        self.source
    }

    pub fn codec(&self) -> Component {
        self.codec
    }

    pub fn audio(&self) -> Component {
        self.audio
    }

    /// The component of the given kind.
    pub fn component(&self, kind: ComponentKind) -> Component {
        match kind {
            ComponentKind::Resolution => self.resolution,
            ComponentKind::Source => self.source,
            ComponentKind::Codec => self.codec,
            ComponentKind::Audio => self.audio,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.components().iter().all(Component::is_unknown)
    }

    fn components(&self) -> [Component; 4] {
        [self.resolution, self.source, self.codec, self.audio]
    }

    fn rank(&self) -> [u16; 4] {
        self.components().map(|c| c.value())
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::unknown()
    }
}

impl Ord for Quality {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Quality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unknown() {
            return f.write_str("unknown");
        }
        let names: Vec<&str> = self
            .components()
            .iter()
            .filter(|c| !c.is_unknown())
            .map(|c| c.name())
            .collect();
        f.write_str(&names.join(" "))
    }
}

impl FromStr for Quality {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Quality {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_title() {
        let q = Quality::parse("Show.Name.S01E01.1080p.BluRay.x264.DTS-GROUP");
        assert_eq!(q.resolution().name(), "1080p");
        assert_eq!(q.source().name(), "bluray");
        assert_eq!(q.codec().name(), "h264");
        assert_eq!(q.audio().name(), "dts");
        assert_eq!(q.to_string(), "1080p bluray h264 dts");
    }

    #[test]
    fn test_display_round_trips() {
        let q = Quality::parse("Movie 2160p WEB-DL HEVC DD+5.1");
        assert_eq!(Quality::parse(&q.to_string()), q);
        assert_eq!(Quality::parse("unknown"), Quality::unknown());
        assert_eq!(Quality::unknown().to_string(), "unknown");
    }

    #[test]
    fn test_resolution_dominates_ordering() {
        let hd = Quality::parse("720p bluray flac");
        let full_hd = Quality::parse("1080p hdtv");
        assert!(full_hd > hd);
        assert!(Quality::parse("480p") > Quality::unknown());
    }

    #[test]
    fn test_later_components_break_ties() {
        let hdtv = Quality::parse("1080p hdtv");
        let web = Quality::parse("1080p web-dl");
        assert!(web > hdtv);
        assert_eq!(hdtv.cmp(&Quality::parse("1080p.HDTV")), Ordering::Equal);
    }

    #[test]
    fn test_serde_uses_display_text() {
        let q = Quality::parse("720p hdtv");
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "\"720p hdtv\"");
        let back: Quality = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let mut qualities = vec![
            Quality::parse("480p"),
            Quality::parse("1080p"),
            Quality::parse("720p"),
            Quality::parse("1080p web-dl"),
        ];
        qualities.sort();
        let names: Vec<String> = qualities.iter().map(|q| q.to_string()).collect();
        assert_eq!(names, vec!["480p", "720p", "1080p", "1080p web-dl"]);
    }
}
