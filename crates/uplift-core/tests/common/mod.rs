//! Shared helpers for the integration tests.

#![allow(dead_code)]

use uplift_core::{Disposition, Entry, Quality, RenderError};

/// Entry that counts every disposition change applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingEntry {
    pub title: String,
    pub id: Option<String>,
    pub quality: Quality,
    pub disposition: Disposition,
    pub reason: Option<String>,
    pub actions: usize,
}

impl RecordingEntry {
    pub fn new(id: &str, quality: &str) -> Self {
        Self {
            title: format!("{id} {quality}"),
            id: Some(id.to_string()),
            quality: Quality::parse(quality),
            disposition: Disposition::Pending,
            reason: None,
            actions: 0,
        }
    }

    /// Start from a disposition set by an earlier stage, without counting it
    /// as an action.
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    fn set(&mut self, disposition: Disposition, reason: &str) {
        self.disposition = disposition;
        self.reason = Some(reason.to_string());
        self.actions += 1;
    }
}

impl Entry for RecordingEntry {
    fn title(&self) -> &str {
        &self.title
    }

    fn quality(&self) -> Quality {
        self.quality
    }

    fn native_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn render(&self, template: &str) -> Result<String, RenderError> {
        match template {
            "{{title}}" => Ok(self.title.clone()),
            other => Err(RenderError::MissingField(other.to_string())),
        }
    }

    fn disposition(&self) -> Disposition {
        self.disposition
    }

    fn accept(&mut self, reason: &str) {
        self.set(Disposition::Accepted, reason);
    }

    fn reject(&mut self, reason: &str) {
        self.set(Disposition::Rejected, reason);
    }

    fn fail(&mut self, reason: &str) {
        self.set(Disposition::Failed, reason);
    }
}

/// Resolutions in ascending order.
pub const RESOLUTIONS: [&str; 5] = ["360p", "480p", "720p", "1080p", "2160p"];
