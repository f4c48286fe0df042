//! Merging parsed files into translation records, and back out for export.
//!
//! Both directions are pure; a [`crate::store::TranslationStore`] applies the
//! resulting plan.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    types::{CanonicalEntry, ExportEntry, Translation, TranslationId},
    workflow::{Role, can_create_translation},
};

/// The user an import or transition is performed for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Why an entry produced no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file marked the entry as not translatable.
    NonTranslatable,
    /// The key is new and the actor may not create translations.
    NotPermitted,
}

/// What importing one key does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportAction {
    /// New key: becomes a draft owned by the importing actor.
    Create(CanonicalEntry),
    /// Known key whose source text or description changed.
    UpdateSource {
        id: TranslationId,
        entry: CanonicalEntry,
    },
    /// Known key, nothing to do.
    Unchanged { id: TranslationId },
    Skipped { key: String, reason: SkipReason },
}

/// The full effect of importing one file into one project/locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    /// One action per distinct key, in the order keys first appear.
    pub actions: Vec<ImportAction>,
    /// Keys that appeared more than once; the last occurrence was planned.
    pub duplicates: Vec<String>,
}

impl ImportPlan {
    pub fn summary(&self) -> ImportSummary {
        let mut summary = ImportSummary {
            duplicates: self.duplicates.len(),
            ..ImportSummary::default()
        };
        for action in &self.actions {
            match action {
                ImportAction::Create(_) => summary.created += 1,
                ImportAction::UpdateSource { .. } => summary.updated += 1,
                ImportAction::Unchanged { .. } => summary.unchanged += 1,
                ImportAction::Skipped { .. } => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Counts of what an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Plans how `entries` (one parsed file, in document order) merge into the
/// `existing` records of the same project/locale.
///
/// Parsed values are source text. Targets and workflow states of existing
/// records are never touched.
pub fn plan_import(existing: &[Translation], entries: Vec<CanonicalEntry>, actor: &Actor) -> ImportPlan {
    let by_key: HashMap<&str, &Translation> =
        existing.iter().map(|t| (t.key.as_str(), t)).collect();

    let mut plan = ImportPlan::default();
    let mut planned: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = entry.key.clone();
        let action = plan_entry(by_key.get(key.as_str()).copied(), entry, actor);

        match planned.get(&key) {
            Some(&slot) => {
                warn!(%key, "duplicate key in imported file; keeping the last occurrence");
                plan.duplicates.push(key);
                plan.actions[slot] = action;
            }
            None => {
                planned.insert(key, plan.actions.len());
                plan.actions.push(action);
            }
        }
    }
    plan
}

fn plan_entry(current: Option<&Translation>, entry: CanonicalEntry, actor: &Actor) -> ImportAction {
    if !entry.translatable {
        return ImportAction::Skipped {
            key: entry.key,
            reason: SkipReason::NonTranslatable,
        };
    }
    match current {
        Some(record) if record.source == entry.value && record.description == entry.description => {
            ImportAction::Unchanged { id: record.id }
        }
        Some(record) => ImportAction::UpdateSource {
            id: record.id,
            entry,
        },
        None if can_create_translation(actor.role) => ImportAction::Create(entry),
        None => ImportAction::Skipped {
            key: entry.key,
            reason: SkipReason::NotPermitted,
        },
    }
}

/// The export view of stored records, in record order.
pub fn export_entries(records: &[Translation]) -> Vec<ExportEntry> {
    records.iter().map(ExportEntry::from).collect()
}
