//! Quality components and the table of recognised tokens.
//!
//! A quality is made of one component per [`ComponentKind`]. Each known
//! component has a rank within its kind and a pattern used to spot it in
//! free-form release titles.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The dimensions a quality is measured along, in comparison priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    Resolution,
    Source,
    Codec,
    Audio,
}

/// A single ranked quality component, e.g. `1080p` or `bluray`.
///
/// `value` is the rank within the component's kind; `0` is the unknown
/// component and ranks below everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component {
    kind: ComponentKind,
    value: u16,
    name: &'static str,
}

impl Component {
    /// The unknown component of a kind.
    pub const fn unknown(kind: ComponentKind) -> Self {
        Self {
            kind,
            value: 0,
            name: "unknown",
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unknown(&self) -> bool {
        self.value == 0
    }

    /// Look up a component by its name or one of its aliases.
    ///
    /// The whole token must match; `"1080p"` and `"fullhd"` both resolve to
    /// the `1080p` resolution, `"1080p+"` resolves to nothing.
    pub fn lookup(token: &str) -> Option<Self> {
        COMPONENTS
            .iter()
            .find(|c| c.exact.is_match(token))
            .map(|c| c.component)
    }

    /// Find the best component of `kind` mentioned anywhere in `text`.
    ///
    /// A mention lying inside a longer mention of another component does not
    /// count: `"WEB-Rip"` is webrip, not the bare `web` alias of web-dl. Of
    /// the remaining mentions the highest ranked wins, so `"dts-hd"` is
    /// dtshd.
    pub(crate) fn find_best(kind: ComponentKind, text: &str) -> Self {
        let mentions: Vec<(Self, Range<usize>)> = COMPONENTS
            .iter()
            .filter(|c| c.component.kind == kind)
            .flat_map(|c| {
                c.search
                    .captures_iter(text)
                    .filter_map(|caps| caps.get(1))
                    .map(move |m| (c.component, m.range()))
            })
            .collect();

        mentions
            .iter()
            .filter(|(component, span)| {
                !mentions.iter().any(|(other, outer)| {
                    other != component
                        && outer.start <= span.start
                        && span.end <= outer.end
                        && outer.end - outer.start > span.end - span.start
                })
            })
            .map(|(component, _)| *component)
            .max_by_key(|c| c.value)
            .unwrap_or(Self::unknown(kind))
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

struct CompiledComponent {
    component: Component,
    search: Regex,
    exact: Regex,
}

const fn def(kind: ComponentKind, value: u16, name: &'static str, pattern: &'static str) -> (Component, &'static str) {
    (Component { kind, value, name }, pattern)
}

// Every name must match its own pattern so that a quality's display text
// parses back to the same quality.
const DEFINITIONS: &[(Component, &str)] = &[
    def(ComponentKind::Resolution, 10, "360p", r"360p?"),
    def(ComponentKind::Resolution, 20, "368p", r"368p?"),
    def(ComponentKind::Resolution, 30, "480p", r"480p?|640x480"),
    def(ComponentKind::Resolution, 40, "576p", r"576p?"),
    def(ComponentKind::Resolution, 50, "720i", r"720i"),
    def(ComponentKind::Resolution, 60, "720p", r"720p?|1280x720"),
    def(ComponentKind::Resolution, 70, "1080i", r"1080i"),
    def(ComponentKind::Resolution, 80, "1080p", r"1080p?|1920x1080|fullhd|fhd"),
    def(ComponentKind::Resolution, 90, "2160p", r"2160p?|3840x2160|4k|uhd"),
    def(ComponentKind::Source, 10, "workprint", r"workprint"),
    def(ComponentKind::Source, 20, "cam", r"cam(?:rip)?|hdcam"),
    def(ComponentKind::Source, 30, "ts", r"ts|telesync|hdts"),
    def(ComponentKind::Source, 40, "tc", r"tc|telecine"),
    def(ComponentKind::Source, 50, "r5", r"r5"),
    def(ComponentKind::Source, 60, "hdtv", r"hdtv|pdtv|dsr|tvrip"),
    def(ComponentKind::Source, 70, "dvdrip", r"dvd(?:rip|scr)?"),
    def(ComponentKind::Source, 80, "webrip", r"web[-. ]?rip"),
    def(ComponentKind::Source, 90, "web-dl", r"web[-. ]?dl|web"),
    def(ComponentKind::Source, 100, "bluray", r"blu[-. ]?ray|bdrip|brrip|bd"),
    def(ComponentKind::Source, 110, "remux", r"remux"),
    def(ComponentKind::Codec, 10, "divx", r"divx"),
    def(ComponentKind::Codec, 20, "xvid", r"xvid"),
    def(ComponentKind::Codec, 30, "h264", r"[hx]\.?264|avc"),
    def(ComponentKind::Codec, 40, "h265", r"[hx]\.?265|hevc"),
    def(ComponentKind::Audio, 10, "mp3", r"mp3"),
    def(ComponentKind::Audio, 20, "aac", r"aac(?:2\.0)?"),
    def(ComponentKind::Audio, 30, "dd5.1", r"dd[p+]?5\.?1|e?ac3"),
    def(ComponentKind::Audio, 40, "dts", r"dts"),
    def(ComponentKind::Audio, 50, "dtshd", r"dts[-. ]?hd(?:[-. ]?ma)?"),
    def(ComponentKind::Audio, 60, "truehd", r"truehd|atmos"),
    def(ComponentKind::Audio, 70, "flac", r"flac"),
];

static COMPONENTS: Lazy<Vec<CompiledComponent>> = Lazy::new(|| {
    DEFINITIONS
        .iter()
        .map(|(component, pattern)| CompiledComponent {
            component: *component,
            search: Regex::new(&format!(r"(?i)(?:^|[^a-z0-9])({pattern})(?:$|[^a-z0-9])"))
                .expect("component search pattern is valid"),
            exact: Regex::new(&format!(r"(?i)^(?:{pattern})$"))
                .expect("component exact pattern is valid"),
        })
        .collect()
});
