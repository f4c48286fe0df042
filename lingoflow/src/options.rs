//! Options that tune how codecs read files.

/// Parse behaviour for [`crate::traits::FormatCodec::parse_with`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Keep strings marked `translatable="false"` (with
    /// [`crate::CanonicalEntry::translatable`] set to `false`) instead of
    /// dropping them. Only Android resources carry the attribute.
    pub include_non_translatable: bool,
}

impl ParseOptions {
    /// Creates default parse options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables keeping non-translatable strings.
    pub fn with_non_translatable(mut self, include: bool) -> Self {
        self.include_non_translatable = include;
        self
    }
}
