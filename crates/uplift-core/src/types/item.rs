//! Item types.

use super::Disposition;
use crate::quality::Quality;
use crate::traits::{Entry, RenderError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// A candidate item in a batch.
///
/// Deserializing an item without a `quality` derives it from the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemDocument")]
pub struct Item {
    /// Release title.
    pub title: String,
    /// Native identifier, e.g. `"show.s01e01"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Quality of the release.
    pub quality: Quality,
    /// Extra fields available to identifier templates.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, serde_json::Value>,
    /// Current disposition.
    pub disposition: Disposition,
    /// Reason given with the last disposition change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Deserialize)]
struct ItemDocument {
    title: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    quality: Option<Quality>,
    #[serde(default)]
    fields: HashMap<String, serde_json::Value>,
    #[serde(default)]
    disposition: Disposition,
    #[serde(default)]
    reason: Option<String>,
}

impl From<ItemDocument> for Item {
    fn from(doc: ItemDocument) -> Self {
        let quality = doc.quality.unwrap_or_else(|| Quality::parse(&doc.title));
        Self {
            title: doc.title,
            id: doc.id,
            quality,
            fields: doc.fields,
            disposition: doc.disposition,
            reason: doc.reason,
        }
    }
}

impl Item {
    /// Create a pending item, reading its quality from the title.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            quality: Quality::parse(&title),
            title,
            id: None,
            fields: HashMap::new(),
            disposition: Disposition::Pending,
            reason: None,
        }
    }

    /// Set the native identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Override the quality read from the title.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set a template field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "id" => self.id.clone(),
            "quality" => Some(self.quality.to_string()),
            _ => match self.fields.get(name)? {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }

    fn set_disposition(&mut self, disposition: Disposition, reason: &str) {
        self.disposition = disposition;
        self.reason = Some(reason.to_string());
    }
}

impl Entry for Item {
    fn title(&self) -> &str {
        &self.title
    }

    fn quality(&self) -> Quality {
        self.quality
    }

    fn native_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Replace `{{ field }}` placeholders with the item's values.
    fn render(&self, template: &str) -> Result<String, RenderError> {
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = self
                .field(name.as_str())
                .ok_or_else(|| RenderError::MissingField(name.as_str().to_string()))?;
            rendered.push_str(&template[last..whole.start()]);
            rendered.push_str(&value);
            last = whole.end();
        }
        rendered.push_str(&template[last..]);
        Ok(rendered)
    }

    fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// Accepting a rejected or failed item has no effect.
    fn accept(&mut self, reason: &str) {
        if self.disposition.is_final() {
            tracing::debug!(
                title = %self.title,
                disposition = %self.disposition,
                "Ignoring accept on an item that is already {}",
                self.disposition
            );
            return;
        }
        self.set_disposition(Disposition::Accepted, reason);
    }

    fn reject(&mut self, reason: &str) {
        self.set_disposition(Disposition::Rejected, reason);
    }

    fn fail(&mut self, reason: &str) {
        self.set_disposition(Disposition::Failed, reason);
    }
}
