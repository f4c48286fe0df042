#![forbid(unsafe_code)]
//! Localization file codecs and a translation review workflow.
//!
//! Files are parsed into a flat list of [`CanonicalEntry`] values and exported
//! back from [`ExportEntry`] values through one [`FormatCodec`] per format.
//! Imported keys become [`Translation`] records that move through the
//! `draft → review → approved` lifecycle in [`workflow`].
//!
//! # Quick Start
//!
//! ```rust
//! use lingoflow::{CodecRegistry, ExportEntry, FormatType};
//!
//! let registry = CodecRegistry::with_defaults();
//! let android = registry.get(FormatType::AndroidStrings)?;
//! let entries = android.parse_str(r#"
//!     <resources>
//!         <string name="hello">Hello</string>
//!         <string name="app_id" translatable="false">com.example</string>
//!     </resources>
//! "#)?;
//! assert_eq!(entries.len(), 1);
//!
//! let resx = registry.get(FormatType::Resx)?;
//! let exported: Vec<ExportEntry> = entries.into_iter().map(ExportEntry::from).collect();
//! let xml = resx.export_to_string(&exported)?;
//! assert!(xml.contains(r#"<data name="hello" xml:space="preserve">"#));
//! # Ok::<(), lingoflow::Error>(())
//! ```
//!
//! # Supported Formats
//!
//! - **Android `strings.xml`**: `<string>` and `<string-array>` resources
//! - **.NET `.resx`**: `<data>` entries with optional comments
//! - **CSV**: headerless `key,value[,description]` rows

pub mod codec;
pub mod error;
pub mod formats;
pub mod import;
pub mod options;
pub mod store;
pub mod traits;
pub mod types;
pub mod workflow;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{CodecRegistry, convert, convert_auto},
    error::Error,
    formats::{FormatType, infer_format_from_path},
    import::{Actor, ImportPlan, ImportSummary, export_entries, plan_import},
    options::ParseOptions,
    store::{MemoryStore, TranslationStore},
    traits::FormatCodec,
    types::{CanonicalEntry, ExportEntry, Translation, TranslationId},
    workflow::{
        Action, Decision, DenialReason, Role, TransitionRequest, TranslationState,
        can_approve_translation, can_create_translation, can_edit_translation,
        can_review_translation, decide, next_state,
    },
};
