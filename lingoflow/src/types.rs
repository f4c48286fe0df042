//! Core, format-agnostic types for lingoflow.
//! Codecs decode into [`CanonicalEntry`] and encode from [`ExportEntry`];
//! the workflow and the store operate on [`Translation`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{error::Error, workflow::TranslationState};

/// One localizable unit extracted from a file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CanonicalEntry {
    /// Message identifier. Array members are keyed `name[index]`.
    pub key: String,

    /// Text content. Empty is allowed.
    pub value: String,

    /// Optional comment for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,

    /// Whether translators should see this entry at all.
    #[serde(default = "default_translatable")]
    pub translatable: bool,
}

fn default_translatable() -> bool {
    true
}

impl CanonicalEntry {
    /// Creates a translatable entry without a description.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
            translatable: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }
}

impl Display for CanonicalEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CanonicalEntry {{ key: {}, value: {}, translatable: {} }}",
            self.key, self.value, self.translatable
        )
    }
}

/// The shape every codec exports from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportEntry {
    pub key: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,
    /// Written back by formats that carry the flag (Android).
    #[serde(default = "default_translatable")]
    pub translatable: bool,
}

impl ExportEntry {
    pub fn new(key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
            target: None,
            description: None,
            translatable: true,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }

    /// The text written to the file: `target` when present and non-empty,
    /// otherwise `source`.
    pub fn resolved_value(&self) -> &str {
        match self.target.as_deref() {
            Some(target) if !target.is_empty() => target,
            _ => &self.source,
        }
    }

    /// The description, if it is worth writing.
    pub fn non_empty_description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Returns the key, or [`Error::MissingKey`] when it is blank.
    ///
    /// `index` is the entry's position in the export sequence.
    pub(crate) fn require_key(&self, index: usize) -> Result<&str, Error> {
        if self.key.trim().is_empty() {
            Err(Error::MissingKey { index })
        } else {
            Ok(&self.key)
        }
    }
}

/// A parsed entry exported as-is: its value becomes the source text.
impl From<CanonicalEntry> for ExportEntry {
    fn from(entry: CanonicalEntry) -> Self {
        Self {
            key: entry.key,
            source: entry.value,
            target: None,
            description: entry.description,
            translatable: entry.translatable,
        }
    }
}

impl From<&Translation> for ExportEntry {
    fn from(translation: &Translation) -> Self {
        Self {
            key: translation.key.clone(),
            source: translation.source.clone(),
            target: translation.target.clone(),
            description: translation.description.clone(),
            translatable: true,
        }
    }
}

/// Identifier of a stored translation.
pub type TranslationId = u64;

/// The stateful record behind one key in one project/locale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Translation {
    pub id: TranslationId,
    pub key: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,
    pub state: TranslationState,
    pub created_by: String,
}

impl Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Translation {{ id: {}, key: {}, state: {} }}",
            self.id, self.key, self.state
        )
    }
}

/// Builds the key of the `index`th item of a string array.
pub fn array_item_key(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}

/// Splits an array item key back into its array name and index.
///
/// Returns `None` for keys that do not end in `[<digits>]`.
pub fn split_array_item_key(key: &str) -> Option<(&str, usize)> {
    let open = key.rfind('[')?;
    let index = key[open + 1..].strip_suffix(']')?;
    if open == 0 || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&key[..open], index.parse().ok()?))
}
