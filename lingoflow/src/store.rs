//! The persistence seam around the codecs and the workflow.
//!
//! [`TranslationStore`] is the contract a real backend (a relational store,
//! usually) fulfils. [`MemoryStore`] is the in-process implementation: every
//! mutation happens under one lock, so two simultaneous approvals of the same
//! record cannot both succeed.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    import::{Actor, ImportAction, ImportSummary, plan_import},
    types::{CanonicalEntry, Translation, TranslationId},
    workflow::{Action, Decision, TransitionRequest, TranslationState, can_edit_translation, decide},
};

/// Storage for translation records scoped by project and locale.
pub trait TranslationStore {
    /// Merges one parsed file into the records of `project`/`locale`.
    /// New keys start as drafts owned by `actor`.
    fn upsert_entries(
        &self,
        project: &str,
        locale: &str,
        entries: Vec<CanonicalEntry>,
        actor: &Actor,
    ) -> Result<ImportSummary, Error>;

    /// Current records of `project`/`locale`, in creation order.
    fn translations(&self, project: &str, locale: &str) -> Result<Vec<Translation>, Error>;

    /// Applies `action` to one record if, and only if, its guard passes.
    /// The check and the write are atomic.
    fn apply_transition(
        &self,
        id: TranslationId,
        action: Action,
        actor: &Actor,
    ) -> Result<Decision, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct StoredTranslation {
    project: String,
    locale: String,
    #[serde(flatten)]
    translation: Translation,
}

impl StoredTranslation {
    fn in_scope(&self, project: &str, locale: &str) -> bool {
        self.project == project && self.locale == locale
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Snapshot {
    next_id: TranslationId,
    rows: Vec<StoredTranslation>,
}

/// In-memory [`TranslationStore`] with JSON snapshots.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up one record by id.
    pub fn get(&self, id: TranslationId) -> Option<Translation> {
        self.lock()
            .rows
            .iter()
            .find(|row| row.translation.id == id)
            .map(|row| row.translation.clone())
    }

    /// Replaces the target text if [`can_edit_translation`] allows it.
    /// Returns whether the edit was applied.
    pub fn edit_target(
        &self,
        id: TranslationId,
        target: impl Into<String>,
        actor: &Actor,
    ) -> Result<bool, Error> {
        let mut state = self.lock();
        let record = find_mut(&mut state, id)?;
        if !can_edit_translation(
            actor.role,
            record.state,
            &record.created_by,
            &actor.id,
        ) {
            debug!(id, actor = %actor.id, role = %actor.role, "edit denied");
            return Ok(false);
        }
        record.target = Some(target.into());
        Ok(true)
    }

    /// Writes every record to a JSON file.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(Error::Io)?);
        serde_json::to_writer_pretty(&mut writer, &*self.lock()).map_err(Error::Parse)?;
        writer.flush().map_err(Error::Io)?;
        Ok(())
    }

    /// Loads a store previously written by [`MemoryStore::save_snapshot`].
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path).map_err(Error::Io)?);
        let snapshot: Snapshot = serde_json::from_reader(reader).map_err(Error::Parse)?;
        Ok(Self {
            state: Mutex::new(snapshot),
        })
    }
}

fn find_mut(state: &mut Snapshot, id: TranslationId) -> Result<&mut Translation, Error> {
    state
        .rows
        .iter_mut()
        .map(|row| &mut row.translation)
        .find(|translation| translation.id == id)
        .ok_or_else(|| Error::NotFound(format!("translation {}", id)))
}

fn validate_locale(locale: &str) -> Result<(), Error> {
    locale
        .parse::<LanguageIdentifier>()
        .map(|_| ())
        .map_err(|_| Error::InvalidLocale(locale.to_string()))
}

impl TranslationStore for MemoryStore {
    fn upsert_entries(
        &self,
        project: &str,
        locale: &str,
        entries: Vec<CanonicalEntry>,
        actor: &Actor,
    ) -> Result<ImportSummary, Error> {
        validate_locale(locale)?;

        let mut state = self.lock();
        let existing: Vec<Translation> = state
            .rows
            .iter()
            .filter(|row| row.in_scope(project, locale))
            .map(|row| row.translation.clone())
            .collect();
        let plan = plan_import(&existing, entries, actor);

        for action in plan.actions.iter() {
            match action {
                ImportAction::Create(entry) => {
                    state.next_id += 1;
                    let id = state.next_id;
                    state.rows.push(StoredTranslation {
                        project: project.to_string(),
                        locale: locale.to_string(),
                        translation: Translation {
                            id,
                            key: entry.key.clone(),
                            source: entry.value.clone(),
                            target: None,
                            description: entry.description.clone(),
                            state: TranslationState::Draft,
                            created_by: actor.id.clone(),
                        },
                    });
                }
                ImportAction::UpdateSource { id, entry } => {
                    let record = find_mut(&mut state, *id)?;
                    record.source = entry.value.clone();
                    record.description = entry.description.clone();
                }
                ImportAction::Unchanged { .. } | ImportAction::Skipped { .. } => {}
            }
        }

        let summary = plan.summary();
        info!(
            project,
            locale,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "imported entries"
        );
        Ok(summary)
    }

    fn translations(&self, project: &str, locale: &str) -> Result<Vec<Translation>, Error> {
        validate_locale(locale)?;
        Ok(self
            .lock()
            .rows
            .iter()
            .filter(|row| row.in_scope(project, locale))
            .map(|row| row.translation.clone())
            .collect())
    }

    fn apply_transition(
        &self,
        id: TranslationId,
        action: Action,
        actor: &Actor,
    ) -> Result<Decision, Error> {
        let mut state = self.lock();
        let record = find_mut(&mut state, id)?;
        let decision = decide(&TransitionRequest {
            state: record.state,
            action,
            role: actor.role,
            created_by: &record.created_by,
            acting_user: &actor.id,
        });
        if let Decision::Allowed { to, .. } = decision {
            record.state = to;
        }
        debug!(id, %action, actor = %actor.id, ?decision, "transition evaluated");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{import::export_entries, workflow::{DenialReason, Role}};

    fn translator() -> Actor {
        Actor::new("u1", Role::Translator)
    }

    fn reviewer() -> Actor {
        Actor::new("r1", Role::Reviewer)
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .upsert_entries(
                "app",
                "fr",
                vec![
                    CanonicalEntry::new("hello", "Hello").with_description("greeting"),
                    CanonicalEntry::new("bye", "Bye"),
                ],
                &translator(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_import_creates_drafts_owned_by_importer() {
        let store = seeded();
        let rows = store.translations("app", "fr").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].key, "hello");
        assert_eq!(rows[0].state, TranslationState::Draft);
        assert_eq!(rows[0].created_by, "u1");
        assert_eq!(rows[0].description.as_deref(), Some("greeting"));
        assert!(store.translations("app", "de").unwrap().is_empty());
    }

    #[test]
    fn test_reimport_updates_source_only() {
        let store = seeded();
        assert!(store.edit_target(1, "Bonjour", &translator()).unwrap());
        let summary = store
            .upsert_entries(
                "app",
                "fr",
                vec![
                    CanonicalEntry::new("hello", "Hello there").with_description("greeting"),
                    CanonicalEntry::new("bye", "Bye"),
                ],
                &reviewer(),
            )
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        let hello = store.get(1).unwrap();
        assert_eq!(hello.source, "Hello there");
        assert_eq!(hello.target.as_deref(), Some("Bonjour"));
        assert_eq!(hello.created_by, "u1");
    }

    #[test]
    fn test_invalid_locale() {
        let store = MemoryStore::new();
        let err = store
            .upsert_entries("app", "not a locale!", Vec::new(), &translator())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLocale(_)));
    }

    #[test]
    fn test_full_review_cycle() {
        let store = seeded();
        let decision = store.apply_transition(1, Action::Submit, &translator()).unwrap();
        assert!(decision.is_allowed());

        // The author may no longer edit once submitted; a reviewer may.
        assert!(!store.edit_target(1, "Salut", &translator()).unwrap());
        assert!(store.edit_target(1, "Bonjour", &reviewer()).unwrap());

        let decision = store.apply_transition(1, Action::Approve, &translator()).unwrap();
        assert_eq!(
            decision,
            Decision::Denied {
                reason: DenialReason::NotPermitted
            }
        );
        assert_eq!(store.get(1).unwrap().state, TranslationState::Review);

        let decision = store.apply_transition(1, Action::Approve, &reviewer()).unwrap();
        assert!(decision.is_allowed());
        assert_eq!(store.get(1).unwrap().state, TranslationState::Approved);

        let exported = export_entries(&store.translations("app", "fr").unwrap());
        assert_eq!(exported[0].resolved_value(), "Bonjour");
        assert_eq!(exported[1].resolved_value(), "Bye");
    }

    #[test]
    fn test_unknown_translation() {
        let store = MemoryStore::new();
        let err = store.apply_transition(42, Action::Submit, &translator()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_concurrent_approvals_apply_once() {
        let store = seeded();
        store.apply_transition(1, Action::Submit, &translator()).unwrap();

        let decisions: Vec<Decision> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    scope.spawn(move || {
                        let actor = Actor::new(format!("r{i}"), Role::Reviewer);
                        store.apply_transition(1, Action::Approve, &actor).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(decisions.iter().filter(|d| d.is_allowed()).count(), 1);
        assert_eq!(store.get(1).unwrap().state, TranslationState::Approved);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = seeded();
        store.apply_transition(2, Action::Submit, &translator()).unwrap();
        store.save_snapshot(&path).unwrap();

        let loaded = MemoryStore::load_snapshot(&path).unwrap();
        assert_eq!(
            loaded.translations("app", "fr").unwrap(),
            store.translations("app", "fr").unwrap()
        );
        // Ids keep counting from where the snapshot left off.
        loaded
            .upsert_entries("app", "fr", vec![CanonicalEntry::new("new", "New")], &translator())
            .unwrap();
        assert_eq!(loaded.translations("app", "fr").unwrap()[2].id, 3);
    }
}
